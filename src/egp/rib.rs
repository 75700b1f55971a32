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

//! Table entries of the routing daemon.

use std::{cmp::Ordering, collections::BTreeMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::{AsPath, Destination, InterfaceId, Relation, RouterAddr};

/// Table containing all received routes. It maps each neighbor to the routes it currently
/// announces (with the local AS already prepended). Neighbors are ordered by address, which is
/// also the order in which the decision process visits them.
pub type ReceivedRoutes = BTreeMap<RouterAddr, BTreeMap<Destination, AsPath>>;

/// Table containing the last route sent out of an interface for each destination.
pub type AdvertisedRoutes = BTreeMap<Destination, AsPath>;

/// Selected route towards a destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BestRoute {
    /// The AS path, starting with the local AS.
    pub path: AsPath,
    /// The neighbor from which the route was learned.
    pub neighbor: RouterAddr,
    /// The interface towards that neighbor, installed in the forwarding table.
    pub iface: InterfaceId,
    /// The relation over which the route was learned.
    pub relation: Relation,
}

impl BestRoute {
    /// Returns `true` if both routes use the same path over the same neighbor.
    pub fn same_route(&self, other: &Self) -> bool {
        self.path == other.path && self.neighbor == other.neighbor
    }
}

/// Result of evaluating a single candidate route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteMetric {
    /// Financial value of the egress link plus the relation bias.
    pub score: OrderedFloat<f64>,
    /// Number of AS hops
    pub path_len: usize,
    /// Relation of the egress link
    pub relation: Relation,
    /// Egress interface
    pub iface: InterfaceId,
}

impl RouteMetric {
    /// Compare the preference of two candidates. A higher score is preferred, then a shorter AS
    /// path. `Ordering::Greater` means that `self` is preferred over `other`.
    pub fn cmp_preference(&self, other: &Self) -> Ordering {
        match self.score.cmp(&other.score) {
            Ordering::Equal => {}
            o => return o,
        }

        match self.path_len.cmp(&other.path_len) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => Ordering::Less,
            Ordering::Less => Ordering::Greater,
        }
    }
}
