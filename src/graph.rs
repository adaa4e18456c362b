use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::subnet::Subnet;
use crate::view::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The device palette. Wire names (`modemNode`, ...) are a stable external
/// contract shared with saved documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceKind {
    Modem,
    Router,
    Switch,
    Wifi,
    Gateway,
    SmartHome,
    Camera,
    Terminal,
}

impl DeviceKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            DeviceKind::Modem => "modemNode",
            DeviceKind::Router => "routerNode",
            DeviceKind::Switch => "switchNode",
            DeviceKind::Wifi => "wifiNode",
            DeviceKind::Gateway => "gatewayNode",
            DeviceKind::SmartHome => "smartHomeNode",
            DeviceKind::Camera => "cameraNode",
            DeviceKind::Terminal => "deviceNode",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "modemNode" => Some(DeviceKind::Modem),
            "routerNode" => Some(DeviceKind::Router),
            "switchNode" => Some(DeviceKind::Switch),
            "wifiNode" => Some(DeviceKind::Wifi),
            "gatewayNode" => Some(DeviceKind::Gateway),
            "smartHomeNode" => Some(DeviceKind::SmartHome),
            "cameraNode" => Some(DeviceKind::Camera),
            "deviceNode" => Some(DeviceKind::Terminal),
            _ => None,
        }
    }

    /// Human label used in the exported inventory sheet.
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Modem => "Modem",
            DeviceKind::Router => "Router",
            DeviceKind::Switch => "Switch",
            DeviceKind::Wifi => "WiFi node",
            DeviceKind::Gateway => "Smart gateway",
            DeviceKind::SmartHome => "Smart home device",
            DeviceKind::Camera => "Camera",
            DeviceKind::Terminal => "Terminal device",
        }
    }

    pub fn default_profile(self) -> DeviceProfile {
        match self {
            DeviceKind::Modem => DeviceProfile::Modem { subnet: None },
            DeviceKind::Router => DeviceProfile::Router {
                mode: RouterMode::Dial,
                subnet: None,
            },
            DeviceKind::Terminal => DeviceProfile::Terminal {
                subtype: TerminalKind::Laptop,
            },
            _ => DeviceProfile::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterMode {
    /// Originates a new subnet (PPPoE-style uplink).
    Dial,
    /// Bridges the parent's subnet unchanged (AP mode).
    Inherit,
}

impl RouterMode {
    pub fn wire_name(self) -> &'static str {
        match self {
            RouterMode::Dial => "dial",
            RouterMode::Inherit => "inherit",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "dial" => Some(RouterMode::Dial),
            "inherit" => Some(RouterMode::Inherit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Laptop,
    Desktop,
    Mobile,
    Tv,
}

impl TerminalKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            TerminalKind::Laptop => "laptop",
            TerminalKind::Desktop => "desktop",
            TerminalKind::Mobile => "mobile",
            TerminalKind::Tv => "tv",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "laptop" => Some(TerminalKind::Laptop),
            "desktop" => Some(TerminalKind::Desktop),
            "mobile" => Some(TerminalKind::Mobile),
            "tv" => Some(TerminalKind::Tv),
            _ => None,
        }
    }
}

/// Kind-specific configuration. Only modems and routers carry a subnet, only
/// routers a connection mode, only terminals a subtype; carrying this as a
/// tagged variant keeps kind checks out of the propagation code.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceProfile {
    Modem { subnet: Option<Subnet> },
    Router { mode: RouterMode, subnet: Option<Subnet> },
    Terminal { subtype: TerminalKind },
    Plain,
}

impl DeviceProfile {
    pub fn configured_subnet(&self) -> Option<Subnet> {
        match self {
            DeviceProfile::Modem { subnet } => *subnet,
            DeviceProfile::Router { subnet, .. } => *subnet,
            _ => None,
        }
    }

    pub fn router_mode(&self) -> Option<RouterMode> {
        match self {
            DeviceProfile::Router { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

/// Per-view spatial state. Both views are always carried on the canonical
/// node; a projection picks one slot, it never collapses them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub topology: Position,
    pub floor_plan: Position,
    pub visible_in_topology: bool,
    pub visible_in_floor_plan: bool,
}

impl Placement {
    /// Initial placement for a node dropped in `mode`: both slots start at
    /// the drop point, only the creating view shows the node.
    pub fn at(position: Position, mode: ViewMode) -> Self {
        Self {
            topology: position,
            floor_plan: position,
            visible_in_topology: mode == ViewMode::Topology,
            visible_in_floor_plan: mode == ViewMode::FloorPlan,
        }
    }

    pub fn position(&self, mode: ViewMode) -> Position {
        match mode {
            ViewMode::Topology => self.topology,
            ViewMode::FloorPlan => self.floor_plan,
        }
    }

    pub fn set_position(&mut self, mode: ViewMode, position: Position) {
        match mode {
            ViewMode::Topology => self.topology = position,
            ViewMode::FloorPlan => self.floor_plan = position,
        }
    }

    pub fn visible_in(&self, mode: ViewMode) -> bool {
        match mode {
            ViewMode::Topology => self.visible_in_topology,
            ViewMode::FloorPlan => self.visible_in_floor_plan,
        }
    }

    pub fn set_visible(&mut self, mode: ViewMode, visible: bool) {
        match mode {
            ViewMode::Topology => self.visible_in_topology = visible,
            ViewMode::FloorPlan => self.visible_in_floor_plan = visible,
        }
    }

    /// Invisible in both views means the node is gone, not merely hidden.
    pub fn hidden_everywhere(&self) -> bool {
        !self.visible_in_topology && !self.visible_in_floor_plan
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: DeviceKind,
    pub label: String,
    pub model: String,
    pub area: String,
    /// Host part of the IP, user-assigned. Kept as text because it may be
    /// empty mid-edit.
    pub ip_suffix: String,
    /// Derived by the propagation engine, never set directly.
    pub ip: String,
    /// Derived: the /24 a non-root node inherits, e.g. `192.168.31.0/24`.
    pub inherited_subnet: Option<String>,
    pub profile: DeviceProfile,
    pub placement: Placement,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: DeviceKind, label: impl Into<String>, position: Position, mode: ViewMode) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            model: String::new(),
            area: String::new(),
            ip_suffix: "1".to_string(),
            ip: String::new(),
            inherited_subnet: None,
            profile: kind.default_profile(),
            placement: Placement::at(position, mode),
        }
    }

    pub fn configured_subnet(&self) -> Option<Subnet> {
        self.profile.configured_subnet()
    }

    /// A dial-mode router originates its own subnet even when wired under a
    /// parent, so it counts as a propagation root.
    pub fn is_dial_router(&self) -> bool {
        self.profile.router_mode() == Some(RouterMode::Dial)
    }

    /// Display value for the inherited-subnet field.
    pub fn inherited_display(&self) -> &str {
        self.inherited_subnet.as_deref().unwrap_or("not connected")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The canonical node/edge set. The store only guarantees structural
/// consistency (no dangling edges); derived subnet fields belong to the
/// propagation engine and view state to the projection layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: BTreeMap<String, Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Removing a node also removes its incident edges. Unknown ids are a
    /// no-op.
    pub fn remove_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_some() {
            self.remove_edges_touching(id);
        }
    }

    /// Drops every edge with `id` as either endpoint, leaving the node
    /// itself in place. Used by view-scoped deletion.
    pub fn remove_edges_touching(&mut self, id: &str) {
        self.edges.retain(|e| e.source != id && e.target != id);
    }

    /// Returns false (and stores nothing) for dangling endpoints or a
    /// duplicate source/target pair.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            return false;
        }
        if self
            .edges
            .iter()
            .any(|e| e.id == edge.id || (e.source == edge.source && e.target == edge.target))
        {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }

    /// Patches one node's data in place. Unknown ids are a no-op.
    pub fn apply_patch(&mut self, id: &str, patch: impl FnOnce(&mut Node)) {
        if let Some(node) = self.nodes.get_mut(id) {
            patch(node);
        }
    }

    /// Wholesale replacement for import/load. Edges referencing unknown
    /// nodes are dropped rather than rejected.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        self.edges = edges
            .into_iter()
            .filter(|e| self.nodes.contains_key(&e.source) && self.nodes.contains_key(&e.target))
            .collect();
    }

    /// Commits a recomputed node set. Connectivity is untouched.
    pub fn commit_nodes(&mut self, nodes: BTreeMap<String, Node>) {
        self.nodes = nodes;
    }

    /// The edge that determines a node's subnet parent: the first edge in
    /// insertion order targeting it, if any.
    pub fn parent_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        self.parent_edge(id).and_then(|e| self.nodes.get(&e.source))
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.source == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: DeviceKind) -> Node {
        Node::new(id, kind, id, Position::default(), ViewMode::Topology)
    }

    #[test]
    fn removing_a_node_drops_incident_edges() {
        let mut store = GraphStore::new();
        store.add_node(node("a", DeviceKind::Modem));
        store.add_node(node("b", DeviceKind::Switch));
        store.add_node(node("c", DeviceKind::Terminal));
        assert!(store.add_edge(Edge::new("e1", "a", "b")));
        assert!(store.add_edge(Edge::new("e2", "b", "c")));

        store.remove_node("b");
        assert!(store.edges().is_empty());
        assert!(store.node("b").is_none());
        assert!(store.node("a").is_some());
    }

    #[test]
    fn add_edge_rejects_dangling_and_duplicates() {
        let mut store = GraphStore::new();
        store.add_node(node("a", DeviceKind::Modem));
        store.add_node(node("b", DeviceKind::Switch));
        assert!(!store.add_edge(Edge::new("e1", "a", "missing")));
        assert!(store.add_edge(Edge::new("e1", "a", "b")));
        assert!(!store.add_edge(Edge::new("e2", "a", "b")));
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = GraphStore::new();
        store.add_node(node("a", DeviceKind::Modem));
        store.remove_node("nope");
        store.remove_edge("nope");
        store.apply_patch("nope", |n| n.label = "changed".to_string());
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn replace_all_drops_dangling_edges() {
        let mut store = GraphStore::new();
        store.replace_all(
            vec![node("a", DeviceKind::Modem)],
            vec![Edge::new("e1", "a", "ghost")],
        );
        assert!(store.edges().is_empty());
    }

    #[test]
    fn parent_edge_is_first_in_insertion_order() {
        let mut store = GraphStore::new();
        store.add_node(node("a", DeviceKind::Modem));
        store.add_node(node("b", DeviceKind::Modem));
        store.add_node(node("c", DeviceKind::Switch));
        store.add_edge(Edge::new("e1", "a", "c"));
        store.add_edge(Edge::new("e2", "b", "c"));
        assert_eq!(store.parent_of("c").unwrap().id, "a");
    }
}
