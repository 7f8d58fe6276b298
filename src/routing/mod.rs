//! Orthogonal connection routing
//!
//! Pure functions over endpoint snapshots: [`build_route`] synthesizes a
//! route from scratch, [`update_route`] adapts an existing one after a drag,
//! [`simplify`] removes redundant points and [`find_crossings`] annotates a
//! stored route for drawing. None of them own or mutate endpoints.

pub mod builder;
pub mod config;
pub mod error;
pub mod grid;
pub mod overlap;
pub mod simplify;
pub mod types;
pub mod updater;

pub use builder::build_route;
pub use config::RouterConfig;
pub use error::{ConfigError, RouteError};
pub use grid::{snap, snap_point};
pub use overlap::{find_crossings, Crossing, CrossingKind, RouteView};
pub use simplify::simplify;
pub use types::*;
pub use updater::{update_route, RouteUpdate, UpdateKind};
