use std::collections::BTreeMap;
use thiserror::Error;

use crate::document::{self, Document};
use crate::graph::{
    DeviceKind, DeviceProfile, Edge, GraphStore, Node, Position, RouterMode, TerminalKind,
};
use crate::propagate;
use crate::subnet::Subnet;
use crate::view::{self, ProjectedNode, ViewMode, Viewport, ViewportCache};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A dial-capable node may not pick the subnet its direct parent
    /// already originates.
    #[error("subnet {0} is already used by the direct parent")]
    DuplicateSubnet(Subnet),
    #[error("ip suffix must be empty or 1-254, got {0:?}")]
    InvalidSuffix(String),
}

/// One user-editable field. Edits that do not apply to the target's kind
/// (a mode on a switch, say) fall through as no-ops, same as unknown ids.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Label(String),
    Model(String),
    Area(String),
    IpSuffix(String),
    Subnet(Option<Subnet>),
    Mode(RouterMode),
    Subtype(TerminalKind),
}

/// The synchronous mutation pipeline. Every public operation is one
/// transaction: apply to the store, recompute derived subnet state, commit.
/// Nothing observable in between; single-writer by contract.
#[derive(Debug, Clone)]
pub struct Workspace {
    store: GraphStore,
    viewports: ViewportCache,
    active_mode: ViewMode,
    next_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            store: GraphStore::new(),
            viewports: ViewportCache::default(),
            active_mode: ViewMode::Topology,
            next_id: 0,
        }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn active_mode(&self) -> ViewMode {
        self.active_mode
    }

    /// What a renderer draws for the active view.
    pub fn visible_nodes(&self) -> Vec<ProjectedNode> {
        view::project_for_view(&self.store, self.active_mode)
    }

    pub fn visible_edges(&self) -> Vec<Edge> {
        view::project_edges(&self.store, self.active_mode)
    }

    /// Places a new device at `position` in the active view and returns its
    /// id. The node starts visible only where it was created.
    pub fn add_device(&mut self, kind: DeviceKind, label: &str, position: Position) -> String {
        self.next_id += 1;
        let id = format!("{}-{}", kind.wire_name(), self.next_id);
        self.store
            .add_node(Node::new(id.clone(), kind, label, position, self.active_mode));
        self.recompute_now();
        id
    }

    /// Draws a directed connection. Connections are a topology-view gesture;
    /// in floor-plan mode this refuses outright.
    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        if self.active_mode != ViewMode::Topology {
            return false;
        }
        let id = format!("edge-{source}-{target}");
        let added = self.store.add_edge(Edge::new(id, source, target));
        if added {
            self.recompute_now();
        }
        added
    }

    pub fn disconnect(&mut self, edge_id: &str) {
        self.store.remove_edge(edge_id);
        self.recompute_now();
    }

    /// Applies one field edit. Unknown ids and inapplicable fields are
    /// no-ops; invalid values are rejected with the field left unchanged.
    pub fn edit(&mut self, id: &str, edit: FieldEdit) -> Result<(), EditError> {
        if self.store.node(id).is_none() {
            return Ok(());
        }
        match edit {
            FieldEdit::Label(v) => self.store.apply_patch(id, |n| n.label = v),
            FieldEdit::Model(v) => self.store.apply_patch(id, |n| n.model = v),
            FieldEdit::Area(v) => self.store.apply_patch(id, |n| n.area = v),
            FieldEdit::IpSuffix(v) => {
                let in_range = v
                    .parse::<u16>()
                    .map(|n| (1..=254).contains(&n))
                    .unwrap_or(false);
                if !v.is_empty() && !in_range {
                    return Err(EditError::InvalidSuffix(v));
                }
                self.store.apply_patch(id, |n| n.ip_suffix = v);
            }
            FieldEdit::Subnet(subnet) => {
                // Only modems and dial routers take a subnet; on anything
                // else this edit is a no-op, not a conflict.
                let dial_capable = self.store.node(id).is_some_and(|n| {
                    matches!(
                        n.profile,
                        DeviceProfile::Modem { .. }
                            | DeviceProfile::Router {
                                mode: RouterMode::Dial,
                                ..
                            }
                    )
                });
                if dial_capable {
                    if let Some(subnet) = subnet {
                        if let Some(parent) = self.store.parent_of(id) {
                            if parent.configured_subnet() == Some(subnet) {
                                return Err(EditError::DuplicateSubnet(subnet));
                            }
                        }
                    }
                    self.store.apply_patch(id, |n| match &mut n.profile {
                        DeviceProfile::Modem { subnet: slot } => *slot = subnet,
                        DeviceProfile::Router { subnet: slot, .. } => *slot = subnet,
                        _ => {}
                    });
                }
            }
            FieldEdit::Mode(mode) => {
                self.store.apply_patch(id, |n| {
                    if let DeviceProfile::Router { mode: slot, .. } = &mut n.profile {
                        // The configured subnet survives mode toggles: it is
                        // inert while inheriting, and switching back to dial
                        // must not discard a choice the user already made.
                        *slot = mode;
                    }
                });
            }
            FieldEdit::Subtype(subtype) => {
                self.store.apply_patch(id, |n| {
                    if let DeviceProfile::Terminal { subtype: slot } = &mut n.profile {
                        *slot = subtype;
                    }
                });
            }
        }
        self.recompute_now();
        Ok(())
    }

    /// View-scoped deletion: clears visibility for the active view only.
    /// Topology deletion also drops incident edges; floor-plan deletion
    /// leaves edges alone. The node is purged once invisible everywhere.
    pub fn delete_node(&mut self, id: &str) {
        if self.store.node(id).is_none() {
            return;
        }
        let mode = self.active_mode;
        if mode == ViewMode::Topology {
            self.store.remove_edges_touching(id);
        }
        self.store
            .apply_patch(id, |n| n.placement.set_visible(mode, false));
        let hidden = self
            .store
            .node(id)
            .map(|n| n.placement.hidden_everywhere())
            .unwrap_or(false);
        if hidden {
            self.store.remove_node(id);
        }
        self.recompute_now();
    }

    pub fn delete_edge(&mut self, edge_id: &str) {
        self.disconnect(edge_id);
    }

    /// Records a drag end in the active view's position slot only.
    pub fn record_drag(&mut self, id: &str, position: Position) {
        view::record_drag(&mut self.store, id, position, self.active_mode);
        self.recompute_now();
    }

    /// Writes externally computed layout positions into the active view's
    /// slot. Ids unknown to the store are skipped.
    pub fn apply_layout(&mut self, positions: &BTreeMap<String, Position>) {
        let mode = self.active_mode;
        for (id, position) in positions {
            self.store
                .apply_patch(id, |n| n.placement.set_position(mode, *position));
        }
        self.recompute_now();
    }

    /// Pure view switch: snapshots the outgoing camera, restores the
    /// incoming one. The graph is not touched.
    pub fn switch_mode(&mut self, to: ViewMode, current_viewport: Viewport) -> Viewport {
        self.viewports.save(self.active_mode, current_viewport);
        self.active_mode = to;
        self.viewports.restore(to)
    }

    /// Replaces the whole graph from an imported document.
    pub fn load(&mut self, doc: &Document) {
        let (nodes, edges) = document::import(doc);
        self.store.replace_all(nodes, edges);
        self.recompute_now();
    }

    pub fn load_json(&mut self, json: &str) {
        self.load(&document::parse_document(json));
    }

    pub fn to_document(&self, viewport: Option<Viewport>) -> Document {
        document::export(&self.store, viewport)
    }

    pub fn clear(&mut self) {
        self.store = GraphStore::new();
    }

    fn recompute_now(&mut self) {
        let next = propagate::recompute(self.store.nodes(), self.store.edges());
        self.store.commit_nodes(next);
    }
}
