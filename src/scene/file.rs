//! TOML scene files
//!
//! ```toml
//! [router]
//! grid_size = 10
//!
//! [[component]]
//! name = "cpu"
//! bounds = [0, 0, 80, 120]
//!
//! [[port]]
//! name = "cpu.bus"
//! component = "cpu"
//! position = [80, 40]
//! direction = "right"
//!
//! [[connection]]
//! from = "cpu.bus"
//! to = "mem.bus"
//! thick = true
//! ```

use std::path::Path;

use serde::Deserialize;

use super::{Port, Scene, SceneError};
use crate::routing::config::RouterTable;
use crate::routing::{BoundingBox, Point, RouterConfig, Vector};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    router: Option<RouterTable>,
    #[serde(default)]
    component: Vec<ComponentEntry>,
    #[serde(default)]
    port: Vec<PortEntry>,
    #[serde(default)]
    connection: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentEntry {
    name: String,
    /// `[x, y, width, height]`
    bounds: [f64; 4],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PortEntry {
    name: String,
    component: Option<String>,
    position: Point,
    direction: DirectionSpec,
    #[serde(default = "fixed_by_default")]
    fixed: bool,
}

fn fixed_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DirectionSpec {
    Named(String),
    Vector([f64; 2]),
}

impl DirectionSpec {
    fn resolve(&self, port: &str) -> Result<Vector, SceneError> {
        match self {
            DirectionSpec::Named(name) => match name.to_ascii_lowercase().as_str() {
                "left" => Ok(Vector::LEFT),
                "right" => Ok(Vector::RIGHT),
                "up" => Ok(Vector::UP),
                "down" => Ok(Vector::DOWN),
                other => Err(SceneError::invalid_direction(
                    port,
                    format!("unknown direction '{other}'"),
                )),
            },
            DirectionSpec::Vector([x, y]) => Ok(Vector::new(*x, *y)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectionEntry {
    from: String,
    to: String,
    #[serde(default)]
    thick: bool,
}

impl Scene {
    /// Build and route a scene from TOML source
    pub fn from_toml_str(source: &str) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(source)?;

        let config = match &file.router {
            Some(table) => table.apply(RouterConfig::default()),
            None => RouterConfig::default(),
        };
        config.validate()?;

        let mut scene = Scene::new(config);
        for entry in file.component {
            let [x, y, width, height] = entry.bounds;
            scene.add_component(entry.name, BoundingBox::new(x, y, width, height))?;
        }

        for entry in file.port {
            let component = match &entry.component {
                Some(name) => Some(
                    scene
                        .component_names
                        .get(name)
                        .copied()
                        .ok_or_else(|| SceneError::UnknownComponent(name.clone()))?,
                ),
                None => None,
            };
            let direction = entry.direction.resolve(&entry.name)?;
            scene.add_port(Port {
                name: entry.name,
                component,
                position: entry.position,
                direction,
                fixed: entry.fixed,
            })?;
        }

        for entry in file.connection {
            let from = scene
                .port_id(&entry.from)
                .ok_or_else(|| SceneError::UnknownPort(entry.from.clone()))?;
            let to = scene
                .port_id(&entry.to)
                .ok_or_else(|| SceneError::UnknownPort(entry.to.clone()))?;
            scene.connect(from, to, entry.thick)?;
        }

        tracing::debug!(
            ports = scene.ports.len(),
            components = scene.components.len(),
            connections = scene.connections.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    /// Build and route a scene from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
