use crate::emu::{self, EmuCall, MininetDriver, RecordingDriver, TopologyDoc};
use crate::net::{LinkOpts, NodeKind, PortNo, Tier};
use crate::topo::{TopoKind, TopoOpts, build_topology};

#[test]
fn export_emits_nodes_by_tier_then_links() {
    let g = build_topology(&TopoOpts::fat_tree(4)).unwrap();
    let mut driver = RecordingDriver::default();
    emu::export(&g, &mut driver).unwrap();

    assert_eq!(driver.node_calls(), g.nodes().len());
    assert_eq!(driver.link_calls(), g.links().len());

    let kinds = driver
        .calls
        .iter()
        .filter_map(|c| match c {
            EmuCall::CreateNode { kind, .. } => Some(*kind),
            EmuCall::CreateLink { .. } => None,
        })
        .collect::<Vec<_>>();
    let rank = |k: &NodeKind| match k {
        NodeKind::Switch(Tier::Core) => 0,
        NodeKind::Switch(Tier::Aggregation) => 1,
        NodeKind::Switch(Tier::Edge) => 2,
        NodeKind::Host => 3,
    };
    assert!(kinds.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));

    // all node calls come before the first link call
    let first_link = driver
        .calls
        .iter()
        .position(|c| matches!(c, EmuCall::CreateLink { .. }))
        .unwrap();
    assert_eq!(first_link, g.nodes().len());
}

#[test]
fn export_carries_addresses_dpids_and_ports() {
    let g = build_topology(&TopoOpts::fat_tree(2)).unwrap();
    let mut driver = RecordingDriver::default();
    emu::export(&g, &mut driver).unwrap();

    let host = driver
        .calls
        .iter()
        .find_map(|c| match c {
            EmuCall::CreateNode { name, attrs, .. } if name == "h1" => Some(attrs.clone()),
            _ => None,
        })
        .expect("h1 exported");
    assert_eq!(host.ip.map(|ip| ip.to_string()).as_deref(), Some("10.1.0.2"));
    assert_eq!(host.pod, Some(1));
    assert!(host.dpid.is_none());

    let core = driver
        .calls
        .iter()
        .find_map(|c| match c {
            EmuCall::CreateNode { name, attrs, .. } if name == "c0" => Some(attrs.clone()),
            _ => None,
        })
        .expect("c0 exported");
    assert_eq!(core.dpid.as_deref(), Some("0000000300000000"));
    assert_eq!(core.pod, None);

    let host_link = driver
        .calls
        .iter()
        .find_map(|c| match c {
            EmuCall::CreateLink {
                node_a,
                port_a,
                node_b,
                port_b,
                ..
            } if node_a == "h0" => Some((node_b.clone(), *port_a, *port_b)),
            _ => None,
        })
        .expect("h0 link exported");
    assert_eq!(host_link, ("e0".to_string(), PortNo(0), PortNo(0)));
}

#[test]
fn link_options_pass_through_untouched() {
    let link = LinkOpts {
        bandwidth_mbps: Some(10.0),
        delay: Some("5ms".into()),
        loss: Some(1.0),
        max_queue_size: Some(1000),
        use_tc: Some(true),
    };
    let opts = TopoOpts {
        link: link.clone(),
        ..TopoOpts::tree(2)
    };
    let g = build_topology(&opts).unwrap();
    let mut driver = RecordingDriver::default();
    emu::export(&g, &mut driver).unwrap();
    for call in &driver.calls {
        if let EmuCall::CreateLink { opts, .. } = call {
            assert_eq!(opts, &link);
        }
    }
}

#[test]
fn invalid_link_options_fail_the_build() {
    let opts = TopoOpts {
        link: LinkOpts {
            loss: Some(150.0),
            ..LinkOpts::default()
        },
        ..TopoOpts::fat_tree(4)
    };
    assert!(build_topology(&opts).is_err());
}

#[test]
fn json_doc_roundtrips_through_serde() {
    let g = build_topology(&TopoOpts::fat_tree(4)).unwrap();
    let doc = TopologyDoc::from_graph(&g);
    assert_eq!(doc.kind, TopoKind::FatTree);
    assert_eq!(doc.param, 4);
    assert!(doc.core_links);
    assert_eq!(doc.nodes.len(), 36);
    assert_eq!(doc.links.len(), 48);

    let raw = serde_json::to_string(&doc).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["kind"], "fat_tree");
    assert_eq!(value["nodes"][0]["name"], "c0");
    assert_eq!(value["nodes"][0]["kind"]["switch"], "core");

    let back: TopologyDoc = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn mininet_script_declares_every_node_and_link() {
    let opts = TopoOpts {
        link: LinkOpts {
            bandwidth_mbps: Some(10.0),
            delay: Some("5ms".into()),
            use_tc: Some(true),
            ..LinkOpts::default()
        },
        ..TopoOpts::tree(2)
    };
    let g = build_topology(&opts).unwrap();
    let mut driver = MininetDriver::new(&g);
    emu::export(&g, &mut driver).unwrap();
    let script = driver.finish();

    assert!(script.starts_with("from mininet.topo import Topo"));
    assert_eq!(script.matches("self.addSwitch(").count(), 7);
    assert_eq!(script.matches("self.addHost(").count(), 8);
    assert_eq!(script.matches("self.addLink(").count(), 14);
    assert!(script.contains("self.addHost('h0', ip='10.0.0.2/8', mac='00:00:0a:00:00:02')"));
    assert!(script.contains(
        "self.addLink('h0', 'e0', port1=0, port2=0, bw=10, delay='5ms', use_htb=True)"
    ));
}

#[test]
fn export_links_name_the_graph_endpoints() {
    let g = build_topology(&TopoOpts::fat_tree(4)).unwrap();
    let mut driver = RecordingDriver::default();
    emu::export(&g, &mut driver).unwrap();

    let links = driver
        .calls
        .iter()
        .filter_map(|c| match c {
            EmuCall::CreateLink {
                node_a,
                port_a,
                node_b,
                port_b,
                ..
            } => Some((node_a.as_str(), *port_a, node_b.as_str(), *port_b)),
            EmuCall::CreateNode { .. } => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(links.len(), g.links().len());
    for (call, link) in links.iter().zip(g.links()) {
        let a = g.node(link.a.node).unwrap().name();
        let b = g.node(link.b.node).unwrap().name();
        assert_eq!(*call, (a, link.a.port, b, link.b.port));
    }
}

#[test]
fn mininet_string_literals_are_escaped() {
    let opts = TopoOpts {
        link: LinkOpts {
            delay: Some("5ms', bw=999, x='".into()),
            ..LinkOpts::default()
        },
        ..TopoOpts::tree(2)
    };
    let g = build_topology(&opts).unwrap();
    let mut driver = MininetDriver::new(&g);
    emu::export(&g, &mut driver).unwrap();
    let script = driver.finish();

    assert!(script.contains(r"delay='5ms\', bw=999, x=\''"));
    assert!(!script.contains("delay='5ms', bw=999"));

    let opts = TopoOpts {
        link: LinkOpts {
            delay: Some("5ms\\".into()),
            ..LinkOpts::default()
        },
        ..TopoOpts::tree(1)
    };
    let g = build_topology(&opts).unwrap();
    let mut driver = MininetDriver::new(&g);
    emu::export(&g, &mut driver).unwrap();
    assert!(driver.finish().contains(r"delay='5ms\\'"));
}

#[test]
fn link_options_merge_field_by_field() {
    let mut base = LinkOpts {
        bandwidth_mbps: Some(100.0),
        loss: Some(1.0),
        ..LinkOpts::default()
    };
    base.merge(&LinkOpts {
        delay: Some("5ms".into()),
        loss: Some(2.0),
        ..LinkOpts::default()
    });
    assert_eq!(
        base,
        LinkOpts {
            bandwidth_mbps: Some(100.0),
            delay: Some("5ms".into()),
            loss: Some(2.0),
            ..LinkOpts::default()
        }
    );

    let before = base.clone();
    base.merge(&LinkOpts::default());
    assert_eq!(base, before);
}
