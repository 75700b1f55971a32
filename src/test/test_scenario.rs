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
    config::LinkProperties,
    scenario::{Scenario, ScenarioAction},
    types::{Destination, InterfaceId, NetworkError},
};

const SCENARIO: &str = r#"{
    "routers": [
        {
            "address": "r1",
            "config": {
                "AS-ID": 200,
                "relations": { "eth0": "customer", "eth1": "customer", "eth2": "peer" },
                "neighbours": { "eth0": "c1", "eth1": "c2", "eth2": "r2" },
                "link_properties": { "eth0": "+4", "eth1": { "revenues": "+2" } }
            }
        },
        {
            "address": "r2",
            "config": {
                "AS-ID": 300,
                "relations": { "eth0": "peer" },
                "neighbours": { "eth0": "r1" }
            }
        }
    ],
    "origins": [
        { "address": "c1", "asn": 100, "routes": [ { "dest": "P1" }, { "prefix": "P2" } ] },
        { "address": "c2", "asn": 101, "routes": [ { "dest": "P1", "path": "101 500" } ] }
    ],
    "links": [
        { "a": "c1", "iface_a": "eth0", "b": "r1", "iface_b": "eth0" },
        { "a": "c2", "iface_a": "eth0", "b": "r1", "iface_b": "eth1" },
        { "a": "r1", "iface_a": "eth2", "b": "r2", "iface_b": "eth0" }
    ],
    "events": [
        { "time": 20.0, "type": "withdraw", "origin": "c1", "prefix": "P2" },
        {
            "time": 10.0,
            "type": "link-properties",
            "router": "r1",
            "iface": "eth0",
            "properties": { "revenues": "-3" }
        }
    ]
}"#;

fn best(net: &crate::network::Network, router: &str, dest: &str) -> Option<String> {
    let id = net.get_router_id(router).unwrap();
    net.get_router(id)
        .unwrap()
        .best_route(&Destination::from(dest))
        .map(|b| b.path.to_string())
}

#[test]
fn parse_scenario() {
    let scenario = Scenario::from_json(SCENARIO).unwrap();
    assert_eq!(scenario.routers.len(), 2);
    assert_eq!(scenario.origins[0].routes.len(), 2);
    assert_eq!(scenario.origins[1].routes[0].path, Some("101 500".parse().unwrap()));
    assert_eq!(
        scenario.events[1].action,
        ScenarioAction::LinkProperties {
            router: "r1".into(),
            iface: InterfaceId::from("eth0"),
            properties: LinkProperties::revenues("-3"),
        }
    );
}

#[test]
fn build_scenario() {
    let scenario = Scenario::from_json(SCENARIO).unwrap();
    let mut net = scenario.build().unwrap();
    assert_eq!(best(&net, "r1", "P1"), None);
    net.simulate().unwrap();
    assert_eq!(best(&net, "r1", "P1"), Some("200 100".to_string()));
    assert_eq!(best(&net, "r2", "P1"), Some("300 200 100".to_string()));
    assert_eq!(best(&net, "r2", "P2"), Some("300 200 100".to_string()));
}

#[test]
fn run_scenario() {
    let scenario = Scenario::from_json(SCENARIO).unwrap();
    let net = scenario.run(None).unwrap();
    assert_eq!(best(&net, "r1", "P1"), Some("200 101 500".to_string()));
    assert_eq!(best(&net, "r2", "P1"), Some("300 200 101 500".to_string()));
    assert_eq!(best(&net, "r2", "P2"), None);
    assert_eq!(net.time(), 20.0);
}

#[test]
fn scenario_errors() {
    let bad_link = r#"{ "links": [ { "a": "x", "iface_a": "1", "b": "y", "iface_b": "2" } ] }"#;
    assert_eq!(
        Scenario::from_json(bad_link).unwrap().build().map(|_| ()),
        Err(NetworkError::DeviceNameNotFound("x".to_string()))
    );
    assert!(matches!(
        Scenario::from_json("{ \"routers\": 3 }"),
        Err(NetworkError::JsonError(_))
    ));
    assert!(matches!(
        Scenario::from_file("/this/file/does/not/exist.json"),
        Err(NetworkError::IoError(_))
    ));
    assert_eq!(Scenario::from_json("{}").unwrap(), Scenario::default());
}
