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

//! # Link Context
//!
//! Static and dynamic attributes of every local interface: the neighbor behind it, the business
//! relation, and the revenue descriptor. The context only changes through
//! [`LinkTable::set_revenue`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{parse_revenue, InterfaceId, Relation, Revenue, RouterAddr};

/// Attributes of a single interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkContext {
    /// Address of the neighbor on the other side of the link.
    pub neighbor: RouterAddr,
    /// Business relation with the neighbor.
    pub relation: Relation,
    /// Raw revenue descriptor (if configured).
    pub revenue: Option<String>,
}

impl LinkContext {
    /// Financial value of the link, see [`parse_revenue`].
    pub fn revenue(&self) -> Revenue {
        parse_revenue(self.relation, self.revenue.as_deref())
    }
}

/// All link contexts of a router, with a reverse lookup from the neighbor address to the
/// interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTable {
    links: BTreeMap<InterfaceId, LinkContext>,
    by_neighbor: HashMap<RouterAddr, InterfaceId>,
}

impl LinkTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the context of an interface.
    pub(crate) fn insert(&mut self, iface: InterfaceId, ctx: LinkContext) {
        if let Some(old) = self.links.get(&iface) {
            self.by_neighbor.remove(&old.neighbor);
        }
        self.by_neighbor.insert(ctx.neighbor.clone(), iface.clone());
        self.links.insert(iface, ctx);
    }

    /// Overwrite the revenue descriptor of an interface. Returns `false` if the interface is
    /// unknown.
    pub(crate) fn set_revenue(&mut self, iface: &InterfaceId, revenue: Option<String>) -> bool {
        match self.links.get_mut(iface) {
            Some(ctx) => {
                ctx.revenue = revenue;
                true
            }
            None => false,
        }
    }

    /// Get the context of an interface
    pub fn get(&self, iface: &InterfaceId) -> Option<&LinkContext> {
        self.links.get(iface)
    }

    /// Get the relation configured on an interface
    pub fn relation(&self, iface: &InterfaceId) -> Option<Relation> {
        self.links.get(iface).map(|ctx| ctx.relation)
    }

    /// Get the interface that leads to a neighbor.
    pub fn iface_of(&self, neighbor: &RouterAddr) -> Option<&InterfaceId> {
        self.by_neighbor.get(neighbor)
    }

    /// Get the context of the interface that leads to a neighbor.
    pub fn by_neighbor(&self, neighbor: &RouterAddr) -> Option<(&InterfaceId, &LinkContext)> {
        let iface = self.by_neighbor.get(neighbor)?;
        self.links.get(iface).map(|ctx| (iface, ctx))
    }

    /// Iterate over all interfaces, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&InterfaceId, &LinkContext)> {
        self.links.iter()
    }

    /// Iterate over all configured interfaces, ordered by name.
    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceId> {
        self.links.keys()
    }

    /// Number of configured interfaces
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if no interface is configured.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
