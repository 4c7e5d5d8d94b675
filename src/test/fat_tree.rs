use crate::net::{Node, NodeKind, PortNo, Tier, TopologyGraph};
use crate::topo::{TopoOpts, build_topology, host_ip};
use std::collections::HashSet;

fn fat_tree(k: i64) -> TopologyGraph {
    build_topology(&TopoOpts::fat_tree(k)).expect("build fat-tree")
}

fn tier_of(graph: &TopologyGraph, id: crate::net::NodeId) -> NodeKind {
    graph.node(id).expect("node exists").kind()
}

#[test]
fn k2_has_one_core_and_two_single_switch_pods() {
    let g = fat_tree(2);

    assert_eq!(g.switches(Tier::Core).count(), 1);
    assert_eq!(g.switches(Tier::Aggregation).count(), 2);
    assert_eq!(g.switches(Tier::Edge).count(), 2);
    assert_eq!(g.hosts().count(), 2);
    assert_eq!(g.links().len(), 6);

    let core = g.node_by_name("c0").expect("core c0");
    let a0 = g.node_by_name("a0").expect("agg a0");
    let e0 = g.node_by_name("e0").expect("edge e0");
    let e1 = g.node_by_name("e1").expect("edge e1");
    assert_eq!(a0.pod(), Some(0));
    assert_eq!(e1.pod(), Some(1));

    let peers = g
        .neighbors(a0.id())
        .iter()
        .map(|n| n.peer)
        .collect::<HashSet<_>>();
    assert_eq!(peers, HashSet::from([core.id(), e0.id()]));
    assert_eq!(g.degree(core.id()), 2);
}

#[test]
fn k4_counts_and_per_switch_degrees() {
    let g = fat_tree(4);

    assert_eq!(g.switches(Tier::Core).count(), 4);
    assert_eq!(g.switches(Tier::Aggregation).count(), 8);
    assert_eq!(g.switches(Tier::Edge).count(), 8);
    assert_eq!(g.hosts().count(), 16);
    assert_eq!(g.links().len(), g.counts().link_count());
    for pod in 0..4 {
        assert_eq!(g.switches_in_pod(Tier::Aggregation, pod).count(), 2);
        assert_eq!(g.switches_in_pod(Tier::Edge, pod).count(), 2);
    }

    for agg in g.switches(Tier::Aggregation) {
        let nbrs = g.neighbors(agg.id);
        let to_core = nbrs
            .iter()
            .filter(|n| tier_of(&g, n.peer) == NodeKind::Switch(Tier::Core))
            .count();
        let to_edge = nbrs
            .iter()
            .filter(|n| tier_of(&g, n.peer) == NodeKind::Switch(Tier::Edge))
            .count();
        assert_eq!(to_core, 2, "{}", agg.name);
        assert_eq!(to_edge, 2, "{}", agg.name);
    }
    for core in g.switches(Tier::Core) {
        // one aggregation switch per pod
        let pods = g
            .neighbors(core.id)
            .iter()
            .map(|n| g.node(n.peer).and_then(Node::pod).expect("agg has pod"))
            .collect::<Vec<_>>();
        assert_eq!(pods, vec![0, 1, 2, 3], "{}", core.name);
    }
    for edge in g.switches(Tier::Edge) {
        assert_eq!(g.degree(edge.id), 4, "{}", edge.name);
    }
}

#[test]
fn aggregation_switches_reach_k_half_cores_and_k_half_edges_for_many_k() {
    for k in [2_i64, 4, 6, 8, 12] {
        let g = fat_tree(k);
        let half = (k / 2) as usize;
        for agg in g.switches(Tier::Aggregation) {
            let mut core = 0;
            let mut edge = 0;
            for n in g.neighbors(agg.id) {
                let peer = g.node(n.peer).unwrap();
                match peer.kind() {
                    NodeKind::Switch(Tier::Core) => core += 1,
                    NodeKind::Switch(Tier::Edge) => {
                        assert_eq!(peer.pod(), agg.pod, "k={k} cross-pod link at {}", agg.name);
                        edge += 1;
                    }
                    other => panic!("unexpected neighbour {other:?} of {}", agg.name),
                }
            }
            assert_eq!(core, half, "k={k} {}", agg.name);
            assert_eq!(edge, half, "k={k} {}", agg.name);
        }
    }
}

#[test]
fn edge_switches_never_link_across_pods() {
    let g = fat_tree(8);
    for edge in g.switches(Tier::Edge) {
        for n in g.neighbors(edge.id) {
            let peer = g.node(n.peer).unwrap();
            if peer.kind() == NodeKind::Switch(Tier::Aggregation) {
                assert_eq!(peer.pod(), edge.pod, "{} -> {}", edge.name, peer.name());
            }
        }
    }
}

#[test]
fn hosts_have_one_uplink_and_structured_addresses() {
    let g = fat_tree(6);
    for host in g.hosts() {
        assert_eq!(host.ports.len(), 1, "{}", host.name);
        assert!(host.ports.contains_key(&PortNo(0)));
        assert_eq!(host.ip, host_ip(host.pod, host.edge, host.index).unwrap());
        assert_eq!(
            host.ip.to_string(),
            format!("10.{}.{}.{}", host.pod, host.edge, host.index + 2)
        );

        let nbrs = g.neighbors(host.id);
        assert_eq!(nbrs.len(), 1);
        let edge = g.node(nbrs[0].peer).and_then(Node::as_switch).expect("edge switch");
        assert_eq!(edge.tier, Tier::Edge);
        assert_eq!(edge.pod, Some(host.pod));
        assert_eq!(edge.index, host.edge);
        assert_eq!(nbrs[0].peer_port, PortNo::try_from(host.index).unwrap());
    }
}

#[test]
fn identifiers_and_ports_are_unique() {
    for k in (2..=16_i64).step_by(2).chain([28]) {
        let g = fat_tree(k);

        let names = g.nodes().iter().map(Node::name).collect::<HashSet<_>>();
        assert_eq!(names.len(), g.nodes().len(), "k={k}");

        let dpids = g
            .nodes()
            .iter()
            .filter_map(Node::as_switch)
            .map(|s| s.hw_id.dpid())
            .collect::<HashSet<_>>();
        assert_eq!(dpids.len(), g.counts().switch_count(), "k={k}");

        let macs = g.hosts().map(|h| h.mac).collect::<HashSet<_>>();
        assert_eq!(macs.len(), g.counts().host_count(), "k={k}");

        let mut ends = HashSet::new();
        let mut pairs = HashSet::new();
        for link in g.links() {
            assert!(ends.insert((link.a.node, link.a.port)), "k={k} {link:?}");
            assert!(ends.insert((link.b.node, link.b.port)), "k={k} {link:?}");
            let pair = (link.a.node.min(link.b.node), link.a.node.max(link.b.node));
            assert!(pairs.insert(pair), "k={k} duplicate edge {link:?}");
        }
    }
}

#[test]
fn core_ports_follow_pod_and_agg_ports_follow_column() {
    let g = fat_tree(4);
    // c3 is (row 1, col 1): links agg #1 of every pod on port 2 + 1
    let c3 = g.node_by_name("c3").and_then(Node::as_switch).unwrap();
    for n in g.neighbors(c3.id) {
        let agg = g.node(n.peer).and_then(Node::as_switch).unwrap();
        assert_eq!(agg.index, 1);
        assert_eq!(Some(n.port.0 as usize), agg.pod);
        assert_eq!(n.peer_port, PortNo(3));
    }
}

#[test]
fn building_twice_gives_structurally_equal_topologies() {
    assert_eq!(fat_tree(4), fat_tree(4));
    assert_ne!(fat_tree(4), fat_tree(6));
}

#[test]
fn disconnected_core_mode_leaves_core_isolated() {
    let opts = TopoOpts {
        core_links: false,
        ..TopoOpts::fat_tree(4)
    };
    let g = build_topology(&opts).unwrap();
    assert!(!g.core_links_wired());
    assert_eq!(g.switches(Tier::Core).count(), 4);
    for core in g.switches(Tier::Core) {
        assert_eq!(g.degree(core.id), 0);
    }
    assert_eq!(g.links().len(), 16 + 16);
    for agg in g.switches(Tier::Aggregation) {
        assert_eq!(g.degree(agg.id), 2);
    }
}
