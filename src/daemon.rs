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

//! # Routing daemon interface
//!
//! The simulator drives every routing daemon through the same set of entry points. All of them
//! run to completion before the next one is invoked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::{DaemonConfig, LinkProperties},
    fw_table::ForwardingTable,
    message::RoutingPacket,
    types::{ConfigError, InterfaceId, RouterAddr, RouterId},
};

/// Operational state of an interface, as reported on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceState {
    /// The link is up
    Up,
    /// The link is down
    Down,
}

/// Capabilities of a routing daemon, as seen from the simulator.
pub trait RoutingDaemon {
    /// Forwarding table the daemon writes into.
    type Table: ForwardingTable;

    /// Apply the configuration. This is called exactly once, before any other call.
    fn configure(&mut self, config: DaemonConfig) -> Result<(), ConfigError>;

    /// Bind the daemon to the router it runs on.
    fn bind(&mut self, router_id: RouterId, address: RouterAddr, table: Self::Table);

    /// Periodic hook, called with the current interface states and the simulation time.
    fn tick(&mut self, interfaces: &HashMap<InterfaceId, InterfaceState>, now: f64);

    /// The properties of the link on `iface` have changed.
    fn on_link_properties_changed(&mut self, iface: &InterfaceId, properties: LinkProperties);

    /// Process a packet that was received on `iface`.
    fn on_packet(&mut self, packet: &RoutingPacket, iface: &InterfaceId);

    /// Generate the packet to send out of `iface`, or `None` if there is nothing to send.
    fn generate_packet(&mut self, iface: &InterfaceId) -> Option<RoutingPacket>;
}
