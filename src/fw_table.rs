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

//! # Forwarding table
//!
//! The forwarding table is owned by the host. The routing daemon only ever installs a single
//! outgoing interface per destination, or removes the entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Destination, InterfaceId};

/// Narrow contract of a forwarding table.
pub trait ForwardingTable {
    /// Install the outgoing interfaces for a destination, replacing any previous entry.
    fn set_entry(&mut self, dest: &Destination, ifaces: Vec<InterfaceId>);

    /// Remove the entry for a destination (if it exists).
    fn remove_entry(&mut self, dest: &Destination);
}

/// Simple in-memory forwarding table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FwTable(BTreeMap<Destination, Vec<InterfaceId>>);

impl FwTable {
    /// Create an empty forwarding table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the outgoing interfaces for a destination.
    pub fn get(&self, dest: &Destination) -> Option<&[InterfaceId]> {
        self.0.get(dest).map(|x| x.as_slice())
    }

    /// Get the (first) outgoing interface for a destination.
    pub fn next_hop(&self, dest: &Destination) -> Option<&InterfaceId> {
        self.0.get(dest).and_then(|x| x.first())
    }

    /// Iterate over all entries, ordered by destination.
    pub fn iter(&self) -> impl Iterator<Item = (&Destination, &Vec<InterfaceId>)> {
        self.0.iter()
    }

    /// Number of installed destinations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no destination is installed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ForwardingTable for FwTable {
    fn set_entry(&mut self, dest: &Destination, ifaces: Vec<InterfaceId>) {
        self.0.insert(dest.clone(), ifaces);
    }

    fn remove_entry(&mut self, dest: &Destination) {
        self.0.remove(dest);
    }
}
