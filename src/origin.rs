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

//! # Origin speaker
//!
//! An origin speaker represents a router located in a different AS that simply originates
//! destinations. It does not process any received packet.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    egp::AdvertisedRoutes,
    message::{Entry, Payload, RoutingPacket},
    types::{AsPath, Asn, Destination, InterfaceId, RouterAddr, RouterId},
};

/// Struct representing an origin speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    router_id: RouterId,
    address: RouterAddr,
    asn: Asn,
    pub(crate) interfaces: BTreeSet<InterfaceId>,
    pub(crate) active_routes: BTreeMap<Destination, AsPath>,
    advertised: BTreeMap<InterfaceId, AdvertisedRoutes>,
}

impl Origin {
    /// Create a new origin speaker
    pub(crate) fn new(router_id: RouterId, address: RouterAddr, asn: Asn) -> Self {
        Self {
            router_id,
            address,
            asn,
            interfaces: BTreeSet::new(),
            active_routes: BTreeMap::new(),
            advertised: BTreeMap::new(),
        }
    }

    /// Return the ID of the network device
    pub fn router_id(&self) -> RouterId {
        self.router_id
    }

    /// Return the address of the network device
    pub fn address(&self) -> &RouterAddr {
        &self.address
    }

    /// Return the AS of the network device
    pub fn asn(&self) -> &Asn {
        &self.asn
    }

    /// Return all destinations which are advertised
    pub fn advertised_prefixes(&self) -> impl Iterator<Item = &Destination> {
        self.active_routes.keys()
    }

    /// Start advertising a destination. If `path` is `None`, the path only contains the AS of the
    /// origin. Neighbors learn about the route during the next export cycle.
    pub(crate) fn advertise_prefix(&mut self, dest: Destination, path: Option<AsPath>) -> AsPath {
        let path = path.unwrap_or_else(|| AsPath::new([self.asn.clone()]));
        self.active_routes.insert(dest, path.clone());
        path
    }

    /// Stop advertising a destination. Returns `false` if it was never advertised.
    pub(crate) fn withdraw_prefix(&mut self, dest: &Destination) -> bool {
        self.active_routes.remove(dest).is_some()
    }

    /// Compute the packet to send out of `iface`, by comparing the active routes with what was
    /// last advertised on that interface.
    pub(crate) fn generate(&mut self, iface: &InterfaceId) -> Option<RoutingPacket> {
        if !self.interfaces.contains(iface) {
            return None;
        }
        let advertised = self.advertised.entry(iface.clone()).or_default();
        let mut entries = vec![Entry::Speaker(self.address.clone())];

        for (dest, path) in self.active_routes.iter() {
            if advertised.get(dest) != Some(path) {
                advertised.insert(dest.clone(), path.clone());
                entries.push(Entry::Update {
                    dest: dest.clone(),
                    path: path.clone(),
                });
            }
        }
        let withdrawn: Vec<Destination> = advertised
            .keys()
            .filter(|d| !self.active_routes.contains_key(*d))
            .cloned()
            .collect();
        for dest in withdrawn {
            advertised.remove(&dest);
            entries.push(Entry::Withdrawal(dest));
        }

        if entries.len() == 1 {
            None
        } else {
            let payload: Payload = entries.into_iter().collect();
            Some(RoutingPacket::with_payload(self.address.clone(), payload))
        }
    }
}
