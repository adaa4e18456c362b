use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::{BTreeMap, HashSet};

use crate::config::LayoutConfig;
use crate::graph::{GraphStore, Position};
use crate::view::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    TopDown,
    LeftRight,
}

impl LayoutDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" => Some(Self::TopDown),
            "LR" => Some(Self::LeftRight),
            _ => None,
        }
    }

    // dagre matches rankdir tokens in lowercase; anything else falls
    // through to top-bottom.
    fn rankdir(self) -> &'static str {
        match self {
            Self::TopDown => "tb",
            Self::LeftRight => "lr",
        }
    }
}

/// Ranked auto-layout over the topology view, via dagre. Returns top-left
/// positions keyed by node id; callers decide which position slot they land
/// in. Only topology-visible nodes participate, and only edges between them.
pub fn layout_positions(
    store: &GraphStore,
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> BTreeMap<String, Position> {
    let node_ids: Vec<String> = store
        .nodes()
        .values()
        .filter(|n| n.placement.visible_in(ViewMode::Topology))
        .map(|n| n.id.clone())
        .collect();
    if node_ids.is_empty() {
        return BTreeMap::new();
    }
    let layout_set: HashSet<&str> = node_ids.iter().map(String::as_str).collect();

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(direction.rankdir().to_string());
    graph_config.nodesep = Some(config.node_spacing);
    graph_config.ranksep = Some(config.rank_spacing);
    graph_config.marginx = Some(config.margin);
    graph_config.marginy = Some(config.margin);
    dagre_graph.set_graph(graph_config);

    for node_id in &node_ids {
        let mut node = DagreNode::default();
        node.width = config.node_width;
        node.height = config.node_height;
        dagre_graph.set_node(node_id.clone(), Some(node));
    }

    let mut edge_set: HashSet<(&str, &str)> = HashSet::new();
    for edge in store.edges() {
        if !layout_set.contains(edge.source.as_str()) || !layout_set.contains(edge.target.as_str())
        {
            continue;
        }
        if !edge_set.insert((edge.source.as_str(), edge.target.as_str())) {
            continue;
        }
        let edge_label = DagreEdge::default();
        let _ = dagre_graph.set_edge(&edge.source, &edge.target, Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut positions = BTreeMap::new();
    for node_id in &node_ids {
        let Some(dagre_node) = dagre_graph.node(node_id) else {
            continue;
        };
        // dagre yields centers; the document convention is top-left corners.
        positions.insert(
            node_id.clone(),
            Position::new(
                dagre_node.x - config.node_width / 2.0,
                dagre_node.y - config.node_height / 2.0,
            ),
        );
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DeviceKind, Edge, Node};

    fn store() -> GraphStore {
        let mut store = GraphStore::new();
        for id in ["a-modem", "b-router", "c-switch"] {
            store.add_node(Node::new(
                id,
                DeviceKind::Switch,
                id,
                Position::default(),
                ViewMode::Topology,
            ));
        }
        store.add_edge(Edge::new("e1", "a-modem", "b-router"));
        store.add_edge(Edge::new("e2", "b-router", "c-switch"));
        store
    }

    #[test]
    fn top_down_layout_ranks_vertically() {
        let positions = layout_positions(&store(), LayoutDirection::TopDown, &LayoutConfig::default());
        assert_eq!(positions.len(), 3);
        assert!(positions["b-router"].y > positions["a-modem"].y);
        assert!(positions["c-switch"].y > positions["b-router"].y);
    }

    #[test]
    fn left_right_layout_ranks_horizontally() {
        let positions =
            layout_positions(&store(), LayoutDirection::LeftRight, &LayoutConfig::default());
        assert!(positions["c-switch"].x > positions["a-modem"].x);
    }

    #[test]
    fn directions_produce_different_rankings() {
        let store = store();
        let tb = layout_positions(&store, LayoutDirection::TopDown, &LayoutConfig::default());
        let lr = layout_positions(&store, LayoutDirection::LeftRight, &LayoutConfig::default());
        // The chain ranks along y in TB and along x in LR; the two results
        // must not coincide.
        assert!(tb["c-switch"].y > tb["a-modem"].y);
        assert!(lr["c-switch"].x > lr["a-modem"].x);
        assert_ne!(tb["c-switch"], lr["c-switch"]);
    }

    #[test]
    fn floor_plan_only_nodes_are_skipped() {
        let mut store = store();
        store.add_node(Node::new(
            "d-camera",
            DeviceKind::Camera,
            "d-camera",
            Position::default(),
            ViewMode::FloorPlan,
        ));
        let positions = layout_positions(&store, LayoutDirection::TopDown, &LayoutConfig::default());
        assert!(!positions.contains_key("d-camera"));
    }

    #[test]
    fn empty_store_yields_no_positions() {
        let positions = layout_positions(
            &GraphStore::new(),
            LayoutDirection::TopDown,
            &LayoutConfig::default(),
        );
        assert!(positions.is_empty());
    }
}
