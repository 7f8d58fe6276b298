//! Schematic Router CLI
//!
//! Usage:
//!   schematic-router [OPTIONS] <SCENE>
//!
//! Options:
//!   -c, --config <FILE>     Router configuration (TOML `[router]` table)
//!   -m, --move <PORT=DX,DY> Drag a port after routing; repeatable
//!   --crossings             Include crossing decorations in the output
//!   --trace                 Log routing decisions to stderr
//!   -h, --help              Print help

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use schematic_router::{route_scene_with_options, PortMove, RouteOptions, RouterConfig};

#[derive(Parser)]
#[command(name = "schematic-router")]
#[command(about = "Orthogonal connection routing for schematic scenes")]
struct Cli {
    /// Scene file (TOML)
    scene: PathBuf,

    /// Router configuration file, overriding the scene's [router] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drag a port by DX,DY after the initial routing
    #[arg(short = 'm', long = "move", value_name = "PORT=DX,DY")]
    moves: Vec<PortMove>,

    /// Include crossing decorations in the output
    #[arg(long)]
    crossings: bool,

    /// Log routing decisions to stderr
    #[arg(long)]
    trace: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut options = RouteOptions::new().with_crossings(cli.crossings);
    if let Some(path) = &cli.config {
        match RouterConfig::from_file(path) {
            Ok(config) => options = options.with_config(config),
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
    for request in cli.moves {
        options = options.with_move(request);
    }

    let source = match std::fs::read_to_string(&cli.scene) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.scene.display(), e);
            std::process::exit(1);
        }
    };

    match route_scene_with_options(&source, &options) {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
