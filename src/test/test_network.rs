// EgpSim: Path-vector inter-domain routing engine for network simulators
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use pretty_assertions::assert_eq;
use test_log::test;

use crate::{
    config::{DaemonConfig, LinkProperties},
    event::EventQueue,
    formatter::TableFormatter,
    network::Network,
    types::{AsPath, Destination, InterfaceId, NetworkError, Relation, RouterAddr, RouterId},
};

fn p(dest: &str) -> Destination {
    dest.into()
}

fn i(iface: &str) -> InterfaceId {
    iface.into()
}

fn path(net: &Network, r: RouterId, dest: &str) -> Option<String> {
    net.get_router(r)
        .unwrap()
        .best_route(&p(dest))
        .map(|b| b.path.to_string())
}

fn next_hop(net: &Network, r: RouterId, dest: &str) -> Option<InterfaceId> {
    net.get_fw_table(r).unwrap().next_hop(&p(dest)).cloned()
}

/// Origin `o` (AS 100) is a customer of `r1` (AS 200), which peers with `r2` (AS 300).
///
/// ```text
/// o --- eth0 [r1] eth1 --- eth0 [r2]
/// ```
fn chain() -> (Network, RouterId, RouterId, RouterId) {
    let mut net = Network::default();
    let o = net.add_origin("o", "100");
    let r1 = net
        .add_router(
            "r1",
            DaemonConfig::new("200")
                .with_link("eth0", "o", Relation::Customer, None)
                .with_link("eth1", "r2", Relation::Peer, None),
        )
        .unwrap();
    let r2 = net
        .add_router(
            "r2",
            DaemonConfig::new("300").with_link("eth0", "r1", Relation::Peer, None),
        )
        .unwrap();
    net.add_link(o, "eth0", r1, "eth0").unwrap();
    net.add_link(r1, "eth1", r2, "eth0").unwrap();
    (net, o, r1, r2)
}

#[test]
fn propagate_along_chain() {
    let (mut net, o, r1, r2) = chain();
    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();

    assert_eq!(path(&net, r1, "P1"), Some("200 100".to_string()));
    assert_eq!(path(&net, r2, "P1"), Some("300 200 100".to_string()));
    assert_eq!(next_hop(&net, r1, "P1"), Some(i("eth0")));
    assert_eq!(next_hop(&net, r2, "P1"), Some(i("eth0")));
    assert!(net.queue().is_empty());

    // nothing changes after convergence
    assert_eq!(net.export_cycle(), 0);
}

#[test]
fn custom_origin_path() {
    let (mut net, o, _, r2) = chain();
    let advertised = net
        .advertise_route(o, "P1", Some("100 400".parse::<AsPath>().unwrap()))
        .unwrap();
    assert_eq!(advertised.to_string(), "100 400");
    net.simulate().unwrap();
    assert_eq!(path(&net, r2, "P1"), Some("300 200 100 400".to_string()));
}

#[test]
fn withdraw_along_chain() {
    let (mut net, o, r1, r2) = chain();
    net.advertise_route(o, "P1", None).unwrap();
    net.advertise_route(o, "P2", None).unwrap();
    net.simulate().unwrap();

    net.withdraw_route(o, "P1").unwrap();
    net.simulate().unwrap();
    assert_eq!(path(&net, r1, "P1"), None);
    assert_eq!(path(&net, r2, "P1"), None);
    assert_eq!(next_hop(&net, r2, "P1"), None);
    assert_eq!(next_hop(&net, r2, "P2"), Some(i("eth0")));
    assert_eq!(
        net.get_origin(o).unwrap().advertised_prefixes().collect::<Vec<_>>(),
        vec![&p("P2")]
    );

    // withdrawing twice is not an error
    net.withdraw_route(o, "P1").unwrap();
    net.simulate().unwrap();
}

#[test]
fn valley_free_export() {
    // the origin is a peer of r1. r1 has a provider (r2) and a customer (r3).
    let mut net = Network::default();
    let o = net.add_origin("o", "100");
    let r1 = net
        .add_router(
            "r1",
            DaemonConfig::new("1")
                .with_link("eth0", "o", Relation::Peer, None)
                .with_link("eth1", "r2", Relation::Provider, None)
                .with_link("eth2", "r3", Relation::Customer, None),
        )
        .unwrap();
    let r2 = net
        .add_router(
            "r2",
            DaemonConfig::new("2").with_link("eth0", "r1", Relation::Customer, None),
        )
        .unwrap();
    let r3 = net
        .add_router(
            "r3",
            DaemonConfig::new("3").with_link("eth0", "r1", Relation::Provider, None),
        )
        .unwrap();
    net.add_link(o, "eth0", r1, "eth0").unwrap();
    net.add_link(r1, "eth1", r2, "eth0").unwrap();
    net.add_link(r1, "eth2", r3, "eth0").unwrap();

    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();

    assert_eq!(path(&net, r1, "P1"), Some("1 100".to_string()));
    assert_eq!(path(&net, r2, "P1"), None);
    assert_eq!(path(&net, r3, "P1"), Some("3 1 100".to_string()));
    assert!(net.get_fw_table(r2).unwrap().is_empty());
}

#[test]
fn loops_are_not_formed() {
    // r1 is a customer of r2, r2 a customer of r3, and r3 a customer of r1.
    let mut net = Network::default();
    let o = net.add_origin("o", "100");
    let r1 = net
        .add_router(
            "r1",
            DaemonConfig::new("1")
                .with_link("eth0", "o", Relation::Customer, None)
                .with_link("eth1", "r2", Relation::Provider, None)
                .with_link("eth2", "r3", Relation::Customer, None),
        )
        .unwrap();
    let r2 = net
        .add_router(
            "r2",
            DaemonConfig::new("2")
                .with_link("eth0", "r1", Relation::Customer, None)
                .with_link("eth1", "r3", Relation::Provider, None),
        )
        .unwrap();
    let r3 = net
        .add_router(
            "r3",
            DaemonConfig::new("3")
                .with_link("eth0", "r2", Relation::Customer, None)
                .with_link("eth1", "r1", Relation::Provider, None),
        )
        .unwrap();
    net.add_link(o, "eth0", r1, "eth0").unwrap();
    net.add_link(r1, "eth1", r2, "eth0").unwrap();
    net.add_link(r2, "eth1", r3, "eth0").unwrap();
    net.add_link(r3, "eth1", r1, "eth2").unwrap();

    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();

    assert_eq!(path(&net, r1, "P1"), Some("1 100".to_string()));
    assert_eq!(path(&net, r2, "P1"), Some("2 1 100".to_string()));
    assert_eq!(path(&net, r3, "P1"), Some("3 2 1 100".to_string()));
    assert_eq!(next_hop(&net, r3, "P1"), Some(i("eth0")));
    // the route of r3 was rejected by r1.
    let r1_rib = net.get_router(r1).unwrap().received_routes();
    assert!(r1_rib[&RouterAddr::from("r3")].is_empty());
}

#[test]
fn revenue_change_moves_traffic() {
    // r1 has two customers, c1 (AS 100) and c2 (AS 101), both originating P1.
    let mut net = Network::default();
    let c1 = net.add_origin("c1", "100");
    let c2 = net.add_origin("c2", "101");
    let r1 = net
        .add_router(
            "r1",
            DaemonConfig::new("200")
                .with_link("eth0", "c1", Relation::Customer, Some("+4"))
                .with_link("eth1", "c2", Relation::Customer, Some("+2"))
                .with_link("eth2", "r2", Relation::Peer, None),
        )
        .unwrap();
    let r2 = net
        .add_router(
            "r2",
            DaemonConfig::new("300").with_link("eth0", "r1", Relation::Peer, None),
        )
        .unwrap();
    net.add_link(c1, "eth0", r1, "eth0").unwrap();
    net.add_link(c2, "eth0", r1, "eth1").unwrap();
    net.add_link(r1, "eth2", r2, "eth0").unwrap();
    net.advertise_route(c1, "P1", None).unwrap();
    net.advertise_route(c2, "P1", None).unwrap();
    net.simulate().unwrap();

    assert_eq!(next_hop(&net, r1, "P1"), Some(i("eth0")));
    assert_eq!(path(&net, r2, "P1"), Some("300 200 100".to_string()));

    net.set_link_properties(r1, "eth0", LinkProperties::revenues("+1"))
        .unwrap();
    net.simulate().unwrap();
    assert_eq!(next_hop(&net, r1, "P1"), Some(i("eth1")));
    assert_eq!(path(&net, r2, "P1"), Some("300 200 101".to_string()));
}

#[test]
fn no_convergence() {
    let (mut net, o, _, _) = chain();
    net.advertise_route(o, "P1", None).unwrap();
    net.set_msg_limit(Some(1));
    assert_eq!(net.simulate(), Err(NetworkError::NoConvergence));
    assert!(net.queue().is_empty());
}

#[test]
fn network_errors() {
    let (mut net, o, r1, _) = chain();

    assert_eq!(
        net.add_link(r1, "eth0", o, "eth5"),
        Err(NetworkError::InterfaceInUse(r1, i("eth0")))
    );
    assert_eq!(
        net.get_router(o).map(|_| ()),
        Err(NetworkError::DeviceIsOrigin(o))
    );
    assert_eq!(
        net.set_link_properties(o, "eth0", LinkProperties::revenues("1")),
        Err(NetworkError::DeviceIsOrigin(o))
    );
    assert_eq!(
        net.advertise_route(r1, "P1", None).map(|_| ()),
        Err(NetworkError::DeviceNotFound(r1))
    );
    assert_eq!(
        net.get_router_id("nobody"),
        Err(NetworkError::DeviceNameNotFound("nobody".to_string()))
    );
    assert!(matches!(
        net.add_router(
            "r9",
            DaemonConfig::new("9")
                .with_link("eth0", "r1", Relation::Peer, None)
                .with_link("eth1", "r1", Relation::Peer, None),
        ),
        Err(NetworkError::ConfigError(_))
    ));
}

#[test]
fn lookup_devices() {
    let (net, o, r1, r2) = chain();
    assert_eq!(net.get_router_id("r1"), Ok(r1));
    assert_eq!(net.get_router_id("o"), Ok(o));
    assert_eq!(net.get_routers(), vec![r1, r2]);
    assert_eq!(net.get_origins(), vec![o]);
    assert_eq!(net.get_router_address(r2).unwrap(), &RouterAddr::from("r2"));
    assert_eq!(net.link_target(r1, &i("eth1")), Some((r2, &i("eth0"))));
    assert_eq!(net.link_target(r1, &i("eth9")), None);
}

#[test]
fn tick_does_not_change_state() {
    let (mut net, o, r1, _) = chain();
    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();
    let before = net.get_router(r1).unwrap().fmt_table();
    net.tick(5.0);
    assert_eq!(net.time(), 5.0);
    assert_eq!(net.get_router(r1).unwrap().fmt_table(), before);
    assert_eq!(net.export_cycle(), 0);
}

#[test]
fn format_tables() {
    let (mut net, o, r1, _) = chain();
    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();
    assert_eq!(net.get_fw_table(r1).unwrap().fmt_table(), "P1 -> eth0");
    assert_eq!(
        net.get_router(r1).unwrap().fmt_table(),
        "P1:\n  * o: 200 100 (score = 4.3, len = 2)\n\
         advertised on eth0 (customer, o):\n  P1: 200 100\n\
         advertised on eth1 (peer, r2):\n  P1: 200 100\n"
    );
}

#[test]
fn late_link_learns_existing_routes() {
    let mut net = Network::default();
    let o = net.add_origin("o", "100");
    let r1 = net
        .add_router(
            "r1",
            DaemonConfig::new("200")
                .with_link("eth0", "o", Relation::Customer, None)
                .with_link("eth1", "r2", Relation::Peer, None),
        )
        .unwrap();
    let r2 = net
        .add_router(
            "r2",
            DaemonConfig::new("300").with_link("eth0", "r1", Relation::Peer, None),
        )
        .unwrap();
    net.add_link(o, "eth0", r1, "eth0").unwrap();
    net.advertise_route(o, "P1", None).unwrap();
    net.simulate().unwrap();

    // nothing was sent out of the unconnected interface
    let egp = net.get_router(r1).unwrap();
    assert!(egp.advertised_routes(&i("eth1")).unwrap().is_empty());
    assert!(egp.dirty_destinations(&i("eth1")).unwrap().contains(&p("P1")));
    assert_eq!(path(&net, r2, "P1"), None);

    net.add_link(r1, "eth1", r2, "eth0").unwrap();
    net.simulate().unwrap();
    assert_eq!(path(&net, r2, "P1"), Some("300 200 100".to_string()));
    assert_eq!(next_hop(&net, r2, "P1"), Some(i("eth0")));
}
