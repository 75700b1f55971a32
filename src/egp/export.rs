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

//! Export policy and advertisement diffing.

use log::*;

use super::Egp;
use crate::{
    message::{Entry, Payload, RoutingPacket},
    types::{AsPath, Destination, InterfaceId, Relation, RouterAddr},
};

/// returns a bool which tells to export a route learned over `from` to a neighbor with relation
/// `to`. Customers receive every route, everyone else only receives routes learned from customers.
#[inline(always)]
pub fn should_export(from: Relation, to: Relation) -> bool {
    to.is_customer() || from.is_customer()
}

impl<F> Egp<F> {
    /// Compute the packet to send out of `iface`. This function announces every exportable
    /// destination that is either dirty or differs from what was last advertised on `iface`, and
    /// withdraws destinations that are no longer exportable or no longer reachable. The dirty
    /// markers of `iface` are consumed.
    ///
    /// Returns `None` if the interface has no relation, or if there is nothing to announce or
    /// withdraw.
    pub fn generate(&mut self, iface: &InterfaceId) -> Option<RoutingPacket> {
        let relation = self.links.relation(iface)?;
        let Some(address) = self.address.clone() else {
            warn!("{}: cannot generate packets, daemon is not bound!", self.name());
            return None;
        };
        let dirty = self.dirty.remove(iface).unwrap_or_default();
        let advertised = self.advertised.entry(iface.clone()).or_default();

        let mut announce: Vec<(Destination, AsPath)> = Vec::new();
        let mut withdraw: Vec<Destination> = Vec::new();

        for (dest, best) in self.best.iter() {
            if should_export(best.relation, relation) {
                if dirty.contains(dest) || advertised.get(dest) != Some(&best.path) {
                    announce.push((dest.clone(), best.path.clone()));
                    advertised.insert(dest.clone(), best.path.clone());
                }
            } else if advertised.remove(dest).is_some() {
                withdraw.push(dest.clone());
            }
        }

        // withdraw everything that is no longer reachable at all
        let stale: Vec<Destination> = advertised
            .keys()
            .filter(|dest| !self.best.contains_key(*dest))
            .cloned()
            .collect();
        for dest in stale {
            advertised.remove(&dest);
            withdraw.push(dest);
        }

        if announce.is_empty() && withdraw.is_empty() {
            return None;
        }

        trace!(
            "{address}: send {} announcements and {} withdrawals on {iface} ({relation})",
            announce.len(),
            withdraw.len()
        );
        Some(build_packet(address, announce, withdraw))
    }
}

/// Build a packet with a speaker entry, followed by all announcements and all withdrawals.
fn build_packet(
    address: RouterAddr,
    announce: Vec<(Destination, AsPath)>,
    withdraw: Vec<Destination>,
) -> RoutingPacket {
    let payload: Payload = std::iter::once(Entry::Speaker(address.clone()))
        .chain(
            announce
                .into_iter()
                .map(|(dest, path)| Entry::Update { dest, path }),
        )
        .chain(withdraw.into_iter().map(Entry::Withdrawal))
        .collect();
    RoutingPacket::with_payload(address, payload)
}
