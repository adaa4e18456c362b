use std::path::{Path, PathBuf};

use homenet_topology::GraphStore;
use homenet_topology::document;
use homenet_topology::propagate;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> GraphStore {
    let input = std::fs::read_to_string(fixture_path(name)).expect("fixture read failed");
    let (nodes, edges) = document::import(&document::parse_document(&input));
    let mut store = GraphStore::new();
    store.replace_all(nodes, edges);
    let recomputed = propagate::recompute(store.nodes(), store.edges());
    store.commit_nodes(recomputed);
    store
}

fn assert_subnet_invariants(store: &GraphStore, fixture: &str) {
    let again = propagate::recompute(store.nodes(), store.edges());
    assert_eq!(&again, store.nodes(), "{fixture}: recompute is not idempotent");

    for node in store.nodes().values() {
        if propagate::is_root(node, store.edges()) {
            assert_eq!(
                node.inherited_subnet, None,
                "{fixture}: root {} must not inherit",
                node.id
            );
            match node.configured_subnet() {
                Some(subnet) => assert!(
                    node.ip.starts_with(&format!("{}.", subnet.prefix())),
                    "{fixture}: root {} ip {:?} does not match its subnet",
                    node.id,
                    node.ip
                ),
                None => assert!(
                    node.ip.is_empty(),
                    "{fixture}: unconfigured root {} has ip {:?}",
                    node.id,
                    node.ip
                ),
            }
        } else if let Some(inherited) = &node.inherited_subnet {
            let prefix = inherited
                .strip_suffix(".0/24")
                .unwrap_or_else(|| panic!("{fixture}: bad inherited subnet {inherited:?}"));
            assert!(
                node.ip.starts_with(&format!("{prefix}.")),
                "{fixture}: node {} ip {:?} disagrees with inherited {}",
                node.id,
                node.ip,
                inherited
            );
        } else {
            assert!(
                node.ip.is_empty(),
                "{fixture}: unconnected node {} has ip {:?}",
                node.id,
                node.ip
            );
        }
    }
}

#[test]
fn all_fixtures_satisfy_subnet_invariants() {
    // Explicit list so new fixtures are added intentionally.
    for fixture in [
        "home_chain.json",
        "legacy_flat.json",
        "cycle.json",
        "dual_roots.json",
        "floorplan_mix.json",
    ] {
        assert!(fixture_path(fixture).exists(), "fixture missing: {fixture}");
        let store = load_fixture(fixture);
        assert_subnet_invariants(&store, fixture);
    }
}

#[test]
fn home_chain_resolves_expected_addresses() {
    let store = load_fixture("home_chain.json");
    let router = store.node("routerNode-1").unwrap();
    assert_eq!(router.ip, "192.168.31.1");
    assert_eq!(router.inherited_subnet, None);
    let switch = store.node("switchNode-1").unwrap();
    assert_eq!(switch.inherited_subnet.as_deref(), Some("192.168.31.0/24"));
    assert_eq!(switch.ip, "192.168.31.2");
    let device = store.node("deviceNode-1").unwrap();
    assert_eq!(device.ip, "192.168.31.5");
}

#[test]
fn legacy_document_bridges_through_inherit_router() {
    let store = load_fixture("legacy_flat.json");
    let router = store.node("routerNode-1700000000002").unwrap();
    assert_eq!(router.ip, "192.168.1.2");
    assert_eq!(router.configured_subnet(), None);
    let wifi = store.node("wifiNode-1700000000003").unwrap();
    assert_eq!(wifi.ip, "192.168.1.3");
    // Legacy nodes come up visible in both views at the legacy position.
    assert!(router.placement.visible_in_topology);
    assert!(router.placement.visible_in_floor_plan);
    assert_eq!(router.placement.topology, router.placement.floor_plan);
}

#[test]
fn rootless_cycle_stays_unconnected() {
    let store = load_fixture("cycle.json");
    for node in store.nodes().values() {
        assert_eq!(node.inherited_display(), "not connected");
        assert!(node.ip.is_empty());
    }
}

#[test]
fn shared_switch_resolves_to_exactly_one_root() {
    let store = load_fixture("dual_roots.json");
    let switch = store.node("switchNode-shared").unwrap();
    let inherited = switch.inherited_subnet.as_deref().unwrap();
    assert!(
        inherited == "192.168.0.0/24" || inherited == "10.0.0.0/24",
        "unexpected inherited subnet {inherited}"
    );
    // The downstream camera sees the same winner, never a mix.
    let camera = store.node("cameraNode-1").unwrap();
    let prefix = inherited.strip_suffix(".0/24").unwrap();
    assert_eq!(camera.ip, format!("{prefix}.30"));
}

#[test]
fn propagation_ignores_view_visibility() {
    let store = load_fixture("floorplan_mix.json");
    // The gateway is hidden in the topology view but still wired; addresses
    // flow through it regardless.
    let gateway = store.node("gatewayNode-1").unwrap();
    assert!(!gateway.placement.visible_in_topology);
    assert_eq!(gateway.ip, "192.168.50.40");
    let thermostat = store.node("smartHomeNode-1").unwrap();
    assert_eq!(thermostat.ip, "192.168.50.41");
}

#[test]
fn normalized_export_reimports_identically() {
    let store = load_fixture("home_chain.json");
    let json = document::to_json(&document::export(&store, None)).unwrap();
    let (nodes, edges) = document::import(&document::parse_document(&json));
    let mut reloaded = GraphStore::new();
    reloaded.replace_all(nodes, edges);
    let recomputed = propagate::recompute(reloaded.nodes(), reloaded.edges());
    reloaded.commit_nodes(recomputed);
    assert_eq!(reloaded.nodes(), store.nodes());
    assert_eq!(reloaded.edges(), store.edges());
}
