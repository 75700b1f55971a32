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

//! # Scenarios
//!
//! A scenario describes a complete simulation in a single JSON file: the routing daemons with
//! their configuration, the origin speakers with the destinations they originate, the links, and
//! a list of timed events. Events with the same time are applied together, after which the
//! network is simulated until it has converged again.
//!
//! ```json
//! {
//!     "routers": [
//!         { "address": "10.0.0.2", "config": { "AS-ID": 200, "relations": { "eth0": "customer" },
//!                                               "neighbours": { "eth0": "10.0.0.1" } } }
//!     ],
//!     "origins": [
//!         { "address": "10.0.0.1", "asn": 100, "routes": [ { "dest": "P1" } ] }
//!     ],
//!     "links": [
//!         { "a": "10.0.0.1", "iface_a": "eth0", "b": "10.0.0.2", "iface_b": "eth0" }
//!     ],
//!     "events": [
//!         { "time": 10, "type": "link-properties", "router": "10.0.0.2", "iface": "eth0",
//!           "properties": { "revenues": "-1" } },
//!         { "time": 20, "type": "withdraw", "origin": "10.0.0.1", "dest": "P1" }
//!     ]
//! }
//! ```

use std::path::Path;

use itertools::Itertools;
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DaemonConfig, LinkProperties},
    network::Network,
    types::{AsPath, Asn, Destination, InterfaceId, NetworkError, RouterAddr},
};

/// Routing daemon of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSpec {
    /// Address of the router
    pub address: RouterAddr,
    /// Configuration of the daemon
    pub config: DaemonConfig,
}

/// Destination originated by an origin speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRoute {
    /// The originated destination
    #[serde(alias = "prefix")]
    pub dest: Destination,
    /// The advertised AS path. Defaults to the AS of the origin.
    #[serde(default)]
    pub path: Option<AsPath>,
}

/// Origin speaker of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginSpec {
    /// Address of the origin speaker
    pub address: RouterAddr,
    /// AS of the origin speaker
    pub asn: Asn,
    /// Destinations advertised from the start
    #[serde(default)]
    pub routes: Vec<OriginRoute>,
}

/// Link between two interfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Address of the first device
    pub a: RouterAddr,
    /// Interface of the first device
    pub iface_a: InterfaceId,
    /// Address of the second device
    pub b: RouterAddr,
    /// Interface of the second device
    pub iface_b: InterfaceId,
}

/// Change applied during the scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScenarioAction {
    /// New properties of a link, reported to the daemon of `router`.
    LinkProperties {
        /// Address of the router
        router: RouterAddr,
        /// The interface of the link
        iface: InterfaceId,
        /// New properties
        properties: LinkProperties,
    },
    /// An origin starts advertising a destination.
    Advertise {
        /// Address of the origin speaker
        origin: RouterAddr,
        /// The destination
        #[serde(alias = "prefix")]
        dest: Destination,
        /// The advertised AS path
        #[serde(default)]
        path: Option<AsPath>,
    },
    /// An origin stops advertising a destination.
    Withdraw {
        /// Address of the origin speaker
        origin: RouterAddr,
        /// The destination
        #[serde(alias = "prefix")]
        dest: Destination,
    },
}

/// Timed change of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    /// Time at which the change happens
    pub time: f64,
    /// The change
    #[serde(flatten)]
    pub action: ScenarioAction,
}

/// Complete description of a simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// All routing daemons
    #[serde(default)]
    pub routers: Vec<RouterSpec>,
    /// All origin speakers
    #[serde(default)]
    pub origins: Vec<OriginSpec>,
    /// All links
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    /// Timed changes
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    /// Parse a scenario from a JSON string
    pub fn from_json(s: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a scenario from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json(&s)
    }

    /// Build the network at time 0, without simulating it.
    pub fn build(&self) -> Result<Network, NetworkError> {
        let mut net = Network::default();
        for r in self.routers.iter() {
            net.add_router(r.address.clone(), r.config.clone())?;
        }
        for o in self.origins.iter() {
            let id = net.add_origin(o.address.clone(), o.asn.clone());
            for route in o.routes.iter() {
                net.advertise_route(id, route.dest.clone(), route.path.clone())?;
            }
        }
        for l in self.links.iter() {
            let a = net.get_router_id(l.a.clone())?;
            let b = net.get_router_id(l.b.clone())?;
            net.add_link(a, l.iface_a.clone(), b, l.iface_b.clone())?;
        }
        Ok(net)
    }

    /// Build the network, and simulate it until it converges. Then, apply all events in the order
    /// of their time, and let the network converge after each point in time.
    pub fn run(&self, max_messages: Option<usize>) -> Result<Network, NetworkError> {
        let mut net = self.build()?;
        net.set_msg_limit(max_messages);
        net.tick(0.0);
        net.simulate()?;

        let mut events: Vec<&ScenarioEvent> = self.events.iter().collect();
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        for (time, group) in &events.into_iter().group_by(|e| e.time) {
            debug!("Apply scenario events at time {time}");
            for event in group {
                apply(&mut net, &event.action)?;
            }
            net.tick(time);
            net.simulate()?;
        }
        Ok(net)
    }
}

fn apply(net: &mut Network, action: &ScenarioAction) -> Result<(), NetworkError> {
    match action {
        ScenarioAction::LinkProperties {
            router,
            iface,
            properties,
        } => {
            let id = net.get_router_id(router.clone())?;
            net.set_link_properties(id, iface.clone(), properties.clone())
        }
        ScenarioAction::Advertise { origin, dest, path } => {
            let id = net.get_router_id(origin.clone())?;
            net.advertise_route(id, dest.clone(), path.clone()).map(|_| ())
        }
        ScenarioAction::Withdraw { origin, dest } => {
            let id = net.get_router_id(origin.clone())?;
            net.withdraw_route(id, dest.clone())
        }
    }
}
