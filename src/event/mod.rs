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

//! Module for defining events

use serde::{Deserialize, Serialize};

mod queue;
pub use queue::{BasicEventQueue, EventQueue};

use crate::{
    message::RoutingPacket,
    types::{InterfaceId, RouterId},
};

/// Event to handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Routing packet sent from `src` and received by `dst` on interface `iface`.
    Packet {
        /// The sending device
        src: RouterId,
        /// The receiving device
        dst: RouterId,
        /// The interface of `dst` on which the packet arrives.
        iface: InterfaceId,
        /// The packet itself
        packet: RoutingPacket,
    },
}

impl Event {
    /// Return the router where the event is processed
    pub fn router(&self) -> RouterId {
        match self {
            Event::Packet { dst, .. } => *dst,
        }
    }

    /// Returns the number of payload entries carried by the event.
    pub fn num_entries(&self) -> usize {
        match self {
            Event::Packet { packet, .. } => packet.payload().data().len(),
        }
    }
}
