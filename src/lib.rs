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

//! # EgpSim: Path-vector inter-domain routing for network simulators
//!
//! This library implements a routing daemon for an EGP/BGP-style path-vector protocol, designed to
//! be plugged into a packet-level network simulator. Each daemon belongs to a single autonomous
//! system (AS). It learns routes from neighbors as textual update and withdrawal entries, ranks
//! them by the business relation and revenue of the link they arrived on, installs the best route
//! in a forwarding table, and re-advertises it according to the valley-free export rule.
//!
//! ## Structure
//! - The module [`egp`] contains the routing engine ([`egp::Egp`]). It implements the
//!   [`daemon::RoutingDaemon`] interface that the simulator calls: configuration, packet
//!   reception, packet generation, and link property changes.
//! - The module [`message`] defines the wire format of routing packets ([`message::RoutingPacket`]).
//! - The modules [`config`] and [`link`] define the static configuration and the per-interface link
//!   context (neighbor, relation and revenue).
//! - The module [`fw_table`] defines the forwarding table the daemon writes to.
//! - The modules [`network`] and [`scenario`] provide a small in-memory host that connects daemons
//!   and origin speakers, and runs them until convergence.
//!
//! ## Example
//!
//! ```rust
//! use egpsim::prelude::*;
//!
//! fn main() -> Result<(), NetworkError> {
//!     let mut net = Network::default();
//!
//!     // The customer AS 100 originates P1.
//!     let c = net.add_origin("10.0.0.1", "100");
//!     let r1 = net.add_router(
//!         "10.0.1.1",
//!         DaemonConfig::new("200")
//!             .with_link("eth0", "10.0.0.1", Relation::Customer, None)
//!             .with_link("eth1", "10.0.2.1", Relation::Peer, None),
//!     )?;
//!     let r2 = net.add_router(
//!         "10.0.2.1",
//!         DaemonConfig::new("300").with_link("eth0", "10.0.1.1", Relation::Peer, None),
//!     )?;
//!     net.add_link(c, "eth0", r1, "eth0")?;
//!     net.add_link(r1, "eth1", r2, "eth0")?;
//!
//!     net.advertise_route(c, "P1", None)?;
//!     net.simulate()?;
//!
//!     let best = net.get_router(r2)?.best_route(&"P1".into()).unwrap();
//!     assert_eq!(best.path.to_string(), "300 200 100");
//!     Ok(())
//! }
//! ```

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod config;
pub mod daemon;
pub mod egp;
pub mod event;
pub mod formatter;
pub mod fw_table;
pub mod link;
pub mod message;
pub mod network;
pub mod origin;
pub mod scenario;
pub mod types;

#[cfg(test)]
mod test;

pub use egp::Egp;
pub use network::Network;

/// Prelude containing the most important structs and traits.
pub mod prelude {
    pub use super::config::{DaemonConfig, LinkProperties};
    pub use super::daemon::{InterfaceState, RoutingDaemon};
    pub use super::egp::Egp;
    pub use super::event::{BasicEventQueue, EventQueue};
    pub use super::formatter::TableFormatter;
    pub use super::fw_table::{ForwardingTable, FwTable};
    pub use super::message::{Entry, Payload, RoutingPacket};
    pub use super::network::Network;
    pub use super::scenario::Scenario;
    pub use super::types::{
        AsPath, Asn, ConfigError, Destination, InterfaceId, NetworkError, Relation, RouterAddr,
        RouterId,
    };
}
