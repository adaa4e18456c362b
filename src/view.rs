use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{Edge, GraphStore, Node, Position};

/// The two spatial projections of the one logical graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewMode {
    Topology,
    FloorPlan,
}

impl ViewMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "topology" => Some(Self::Topology),
            "floorplan" => Some(Self::FloorPlan),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Topology => "topology",
            Self::FloorPlan => "floorplan",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Topology => Self::FloorPlan,
            Self::FloorPlan => Self::Topology,
        }
    }
}

/// Camera state snapshotted per view mode on switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Per-mode camera cache. Switching views snapshots the outgoing camera and
/// restores the incoming one; the graph itself is untouched.
#[derive(Debug, Clone, Default)]
pub struct ViewportCache {
    slots: BTreeMap<ViewMode, Viewport>,
}

impl ViewportCache {
    pub fn save(&mut self, mode: ViewMode, viewport: Viewport) {
        self.slots.insert(mode, viewport);
    }

    pub fn restore(&self, mode: ViewMode) -> Viewport {
        self.slots.get(&mode).copied().unwrap_or_default()
    }
}

/// A canonical node with the position slot for one view substituted in; what
/// a renderer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedNode {
    pub position: Position,
    pub node: Node,
}

/// Nodes visible in `mode`, each carrying that mode's stored position.
pub fn project_for_view(store: &GraphStore, mode: ViewMode) -> Vec<ProjectedNode> {
    store
        .nodes()
        .values()
        .filter(|n| n.placement.visible_in(mode))
        .map(|n| ProjectedNode {
            position: n.placement.position(mode),
            node: n.clone(),
        })
        .collect()
}

/// Edges are a topology-only concept; the floor plan never draws them.
pub fn project_edges(store: &GraphStore, mode: ViewMode) -> Vec<Edge> {
    match mode {
        ViewMode::Topology => store.edges().to_vec(),
        ViewMode::FloorPlan => Vec::new(),
    }
}

/// Writes the dragged position into the slot for `mode` only; the other
/// view's stored position is untouched.
pub fn record_drag(store: &mut GraphStore, id: &str, position: Position, mode: ViewMode) {
    store.apply_patch(id, |node| node.placement.set_position(mode, position));
}
