use serde::{Deserialize, Serialize};

use crate::graph::{
    DeviceKind, DeviceProfile, Edge, GraphStore, Node, Placement, Position, RouterMode,
    TerminalKind,
};
use crate::subnet::Subnet;
use crate::view::Viewport;

/// The persisted/exported graph document. Unknown JSON fields (edge styling,
/// renderer leftovers) are ignored on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDoc {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

/// Node data as serialized, everything optional so legacy single-view
/// documents load with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_subnet: Option<String>,
    /// Terminal subtype; named `type` on the wire.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_plan_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_in_topology: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_in_floor_plan: Option<bool>,
}

/// Parses a document, treating anything malformed as the empty graph. A
/// broken save file degrades to a blank canvas, never a fatal error.
pub fn parse_document(json: &str) -> Document {
    serde_json::from_str(json).unwrap_or_default()
}

/// Converts a document into store-ready nodes and edges.
///
/// Lenient by design: unknown device kinds are skipped, unknown subnet or
/// mode strings fall back to unset/defaults, and a legacy single-view node
/// gets both position slots from its `position` and both visibility flags
/// true. Derived fields are left for the propagation engine to fill.
pub fn import(doc: &Document) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = Vec::new();
    for node_doc in &doc.nodes {
        // Leniency is per node: an entry missing its id or kind is skipped,
        // not fatal to the whole document.
        if node_doc.id.is_empty() {
            continue;
        }
        let Some(kind) = DeviceKind::from_wire(&node_doc.kind) else {
            continue;
        };
        let data = &node_doc.data;
        let subnet = data
            .subnet
            .as_deref()
            .and_then(|s| s.parse::<Subnet>().ok());
        let profile = match kind {
            DeviceKind::Modem => DeviceProfile::Modem { subnet },
            DeviceKind::Router => DeviceProfile::Router {
                mode: data
                    .mode
                    .as_deref()
                    .and_then(RouterMode::from_wire)
                    .unwrap_or(RouterMode::Dial),
                // Kept even in inherit mode; it is inert there but comes
                // back when the user re-enters dial mode.
                subnet,
            },
            DeviceKind::Terminal => DeviceProfile::Terminal {
                subtype: data
                    .device_type
                    .as_deref()
                    .and_then(TerminalKind::from_wire)
                    .unwrap_or(TerminalKind::Laptop),
            },
            _ => DeviceProfile::Plain,
        };
        let placement = Placement {
            topology: data.topology_position.unwrap_or(node_doc.position),
            floor_plan: data.floor_plan_position.unwrap_or(node_doc.position),
            visible_in_topology: data.visible_in_topology.unwrap_or(true),
            visible_in_floor_plan: data.visible_in_floor_plan.unwrap_or(true),
        };
        nodes.push(Node {
            id: node_doc.id.clone(),
            kind,
            label: data.label.clone().unwrap_or_default(),
            model: data.model.clone().unwrap_or_default(),
            area: data.area.clone().unwrap_or_default(),
            ip_suffix: data.ip_suffix.clone().unwrap_or_else(|| "1".to_string()),
            ip: String::new(),
            inherited_subnet: None,
            profile,
            placement,
        });
    }
    // Invisible in both views means deleted; such nodes never enter the store.
    nodes.retain(|n| !n.placement.hidden_everywhere());
    (nodes, doc.edges.clone())
}

/// Serializes the canonical graph. `position` mirrors the topology slot so
/// legacy consumers keep working; both slots are written out explicitly.
pub fn export(store: &GraphStore, viewport: Option<Viewport>) -> Document {
    Document {
        nodes: store.nodes().values().map(node_doc).collect(),
        edges: store.edges().to_vec(),
        viewport,
    }
}

fn node_doc(node: &Node) -> NodeDoc {
    let mut data = NodeData {
        label: Some(node.label.clone()),
        model: Some(node.model.clone()),
        area: Some(node.area.clone()),
        ip_suffix: Some(node.ip_suffix.clone()),
        ip: Some(node.ip.clone()),
        inherited_subnet: node.inherited_subnet.clone(),
        topology_position: Some(node.placement.topology),
        floor_plan_position: Some(node.placement.floor_plan),
        visible_in_topology: Some(node.placement.visible_in_topology),
        visible_in_floor_plan: Some(node.placement.visible_in_floor_plan),
        ..NodeData::default()
    };
    match &node.profile {
        DeviceProfile::Modem { subnet } => {
            data.subnet = subnet.map(|s| s.network().to_string());
        }
        DeviceProfile::Router { mode, subnet } => {
            data.mode = Some(mode.wire_name().to_string());
            data.subnet = subnet.map(|s| s.network().to_string());
        }
        DeviceProfile::Terminal { subtype } => {
            data.device_type = Some(subtype.wire_name().to_string());
        }
        DeviceProfile::Plain => {}
    }
    NodeDoc {
        id: node.id.clone(),
        kind: node.kind.wire_name().to_string(),
        position: node.placement.topology,
        data,
    }
}

pub fn to_json(doc: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}
