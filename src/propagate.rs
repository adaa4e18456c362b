use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::graph::{DeviceKind, Edge, Node};
use crate::subnet::Subnet;

/// A node whose subnet is authoritative rather than inherited: no incoming
/// edge, a modem, or a dial-mode router (a dial router stays a root even when
/// wired under a parent for visual grouping).
pub fn is_root(node: &Node, edges: &[Edge]) -> bool {
    node.kind == DeviceKind::Modem
        || node.is_dial_router()
        || !edges.iter().any(|e| e.target == node.id)
}

/// Recomputes the derived `ip` and `inherited_subnet` of every node from the
/// connectivity graph. Pure: returns a new node set, touches nothing else.
///
/// Roots take their prefix from their own configured subnet; everything else
/// inherits the prefix of the first root-reachable parent, breadth-first. A
/// single visited set shared across the whole traversal guarantees each node
/// is assigned at most once per pass and that cycles terminate. Nodes
/// unreachable from any root come out with an empty `ip` and no inherited
/// subnet.
pub fn recompute(nodes: &BTreeMap<String, Node>, edges: &[Edge]) -> BTreeMap<String, Node> {
    let mut out = nodes.clone();

    // Clear derived state first so a stale value can never survive a pass;
    // this is also what makes the pass idempotent.
    for node in out.values_mut() {
        node.ip.clear();
        node.inherited_subnet = None;
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, Option<&'static str>)> = VecDeque::new();

    // Seed every root. Map iteration order makes the traversal, and with it
    // the winner at multi-parent joins, deterministic.
    for (id, node) in nodes {
        if !is_root(node, edges) {
            continue;
        }
        let prefix = node.configured_subnet().map(Subnet::prefix);
        if let Some(prefix) = prefix {
            if let Some(root) = out.get_mut(id) {
                root.ip = compose_ip(prefix, &root.ip_suffix);
            }
        }
        visited.insert(id.clone());
        queue.push_back((id.clone(), prefix));
    }

    while let Some((id, prefix)) = queue.pop_front() {
        for edge in edges.iter().filter(|e| e.source == id) {
            if visited.contains(&edge.target) {
                continue;
            }
            let Some(child) = out.get_mut(&edge.target) else {
                continue;
            };
            visited.insert(edge.target.clone());
            if let Some(prefix) = prefix {
                child.inherited_subnet = Some(format!("{prefix}.0/24"));
                child.ip = compose_ip(prefix, &child.ip_suffix);
            }
            queue.push_back((edge.target.clone(), prefix));
        }
    }

    out
}

fn compose_ip(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        // Suffix may be empty mid-edit; show the prefix with a trailing dot.
        format!("{prefix}.")
    } else {
        format!("{prefix}.{suffix}")
    }
}
