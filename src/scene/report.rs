//! Serializable snapshot of routed connections

use serde::Serialize;

use super::Scene;
use crate::routing::{CrossingKind, EndpointId, Point, UpdateKind};

/// One routed connection in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEntry {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub thick: bool,
    /// How the last update produced this route; absent for fresh routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    pub points: Vec<Point>,
}

/// One crossing decoration in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingEntry {
    /// Index of the connection the decoration belongs to
    pub connection: usize,
    pub segment: usize,
    pub kind: String,
    pub point: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

/// Routes and, optionally, crossings of a whole scene
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SceneReport {
    pub route: Vec<RouteEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crossing: Vec<CrossingEntry>,
}

impl SceneReport {
    /// Record how the latest update produced `connection`'s route
    pub fn mark_update(&mut self, connection: usize, kind: UpdateKind) {
        if let Some(entry) = self.route.get_mut(connection) {
            entry.update = Some(update_name(kind).to_string());
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

fn update_name(kind: UpdateKind) -> &'static str {
    match kind {
        UpdateKind::Translated => "translated",
        UpdateKind::Patched => "patched",
        UpdateKind::Rebuilt => "rebuilt",
    }
}

impl Scene {
    /// Snapshot every route, with crossings when `with_crossings` is set
    pub fn report(&self, with_crossings: bool) -> SceneReport {
        let name = |id: EndpointId| self.ports[id.0].name.clone();

        let mut report = SceneReport::default();
        for connection in &self.connections {
            report.route.push(RouteEntry {
                from: name(connection.from),
                to: name(connection.to),
                thick: connection.thick,
                update: None,
                points: connection.route.points().to_vec(),
            });

            if !with_crossings {
                continue;
            }
            for crossing in self.crossings_of(connection) {
                let (kind, exit, gap) = match crossing.kind {
                    CrossingKind::Junction => ("junction", None, None),
                    CrossingKind::Underpass { gap } => ("underpass", None, Some(gap)),
                    CrossingKind::Tunnel { exit, gap } => ("tunnel", Some(exit), Some(gap)),
                };
                report.crossing.push(CrossingEntry {
                    connection: connection.id.0,
                    segment: crossing.segment,
                    kind: kind.to_string(),
                    point: crossing.point,
                    exit,
                    gap,
                });
            }
        }
        report
    }
}
