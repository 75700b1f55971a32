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

//! # Path-vector routing daemon
//!
//! [`Egp`] learns routes from its neighbors, selects a single best route per destination using a
//! financial metric, installs it into the forwarding table, and decides which destinations to
//! announce or withdraw on every interface.
//!
//! The processing of a packet happens in three phases, similar to a BGP speaker:
//!
//! 1. The received routes are updated (and looped routes are discarded).
//! 2. The decision process re-runs for every touched destination, which may install a new route
//!    and marks the destination as dirty.
//! 3. During the next export cycle, [`Egp::generate`] computes the announcements and withdrawals
//!    of each interface (see the `export` module).

mod export;
mod rib;

pub use export::should_export;
pub use rib::{AdvertisedRoutes, BestRoute, ReceivedRoutes, RouteMetric};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::*;
use ordered_float::OrderedFloat;

use crate::{
    config::{DaemonConfig, LinkProperties},
    daemon::{InterfaceState, RoutingDaemon},
    fw_table::{ForwardingTable, FwTable},
    link::LinkTable,
    message::{Entry, RoutingPacket},
    types::{AsPath, Asn, ConfigError, Destination, InterfaceId, RouterAddr, RouterId},
};

/// Path-vector routing daemon
#[derive(Debug, Clone)]
pub struct Egp<F = FwTable> {
    /// ID of the router the daemon is bound to
    router_id: Option<RouterId>,
    /// Address of the router the daemon is bound to
    address: Option<RouterAddr>,
    /// Forwarding table of the router
    fw_table: Option<F>,
    /// Local AS number
    asn: Option<Asn>,
    /// Context of all configured interfaces
    links: LinkTable,
    /// Routes received from each neighbor. Every configured neighbor has an entry, even if it has
    /// not announced anything yet.
    received: ReceivedRoutes,
    /// Selected route for each destination
    best: BTreeMap<Destination, BestRoute>,
    /// Routes that each interface currently believes.
    advertised: BTreeMap<InterfaceId, AdvertisedRoutes>,
    /// Destinations whose best route changed since the last export on that interface.
    dirty: HashMap<InterfaceId, BTreeSet<Destination>>,
}

impl<F> Default for Egp<F> {
    fn default() -> Self {
        Self {
            router_id: None,
            address: None,
            fw_table: None,
            asn: None,
            links: LinkTable::new(),
            received: BTreeMap::new(),
            best: BTreeMap::new(),
            advertised: BTreeMap::new(),
            dirty: HashMap::new(),
        }
    }
}

impl<F> Egp<F> {
    /// Create a new, unconfigured daemon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the ID of the router (if bound)
    pub fn router_id(&self) -> Option<RouterId> {
        self.router_id
    }

    /// Return the address of the router (if bound)
    pub fn address(&self) -> Option<&RouterAddr> {
        self.address.as_ref()
    }

    /// Return the local AS number (if configured)
    pub fn asn(&self) -> Option<&Asn> {
        self.asn.as_ref()
    }

    /// Get the context of all interfaces
    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Get the forwarding table (if bound)
    pub fn fw_table(&self) -> Option<&F> {
        self.fw_table.as_ref()
    }

    /// Get the table of received routes.
    pub fn received_routes(&self) -> &ReceivedRoutes {
        &self.received
    }

    /// Get all selected best routes.
    pub fn best_routes(&self) -> &BTreeMap<Destination, BestRoute> {
        &self.best
    }

    /// Get the selected route for a destination.
    pub fn best_route(&self, dest: &Destination) -> Option<&BestRoute> {
        self.best.get(dest)
    }

    /// Get the routes last advertised out of an interface.
    pub fn advertised_routes(&self, iface: &InterfaceId) -> Option<&AdvertisedRoutes> {
        self.advertised.get(iface)
    }

    /// Get the destinations that are pending to be re-announced on an interface.
    pub fn dirty_destinations(&self, iface: &InterfaceId) -> Option<&BTreeSet<Destination>> {
        self.dirty.get(iface)
    }

    /// Evaluate a candidate route learned from `neighbor`. Returns `None` if the neighbor is not
    /// configured on any interface.
    ///
    /// The score is the financial value of the egress link plus the bias of its relation.
    /// Advanced-peer links use the value `Y` of their `X;Y` descriptor. Missing or malformed
    /// descriptors fall back to the relation defaults.
    pub fn evaluate(
        &self,
        dest: &Destination,
        neighbor: &RouterAddr,
        path: &AsPath,
    ) -> Option<RouteMetric> {
        let (iface, ctx) = self.links.by_neighbor(neighbor)?;
        let revenue = ctx.revenue();
        if revenue.fallback {
            trace!(
                "{}: no revenue for {iface} ({}), using {} for {dest}",
                self.name(),
                ctx.relation,
                revenue.value
            );
        }
        Some(RouteMetric {
            score: OrderedFloat(revenue.value as f64 + ctx.relation.tie_break_bias()),
            path_len: path.len(),
            relation: ctx.relation,
            iface: iface.clone(),
        })
    }

    /// Name used in log messages.
    fn name(&self) -> String {
        match (&self.address, &self.asn) {
            (Some(addr), _) => addr.to_string(),
            (None, Some(asn)) => format!("AS{asn}"),
            (None, None) => String::from("?"),
        }
    }

    /// Find the best candidate for a destination among all received routes. Candidates are
    /// visited in ascending order of their neighbor address, and a later candidate only replaces
    /// the current one if it is strictly preferred.
    fn find_best(&self, dest: &Destination) -> Option<BestRoute> {
        let mut best: Option<(RouteMetric, &RouterAddr, &AsPath)> = None;
        for (neighbor, routes) in self.received.iter() {
            let Some(path) = routes.get(dest) else {
                continue;
            };
            let Some(metric) = self.evaluate(dest, neighbor, path) else {
                warn!("{}: route from unknown neighbor {neighbor}!", self.name());
                continue;
            };
            let better = match best.as_ref() {
                Some((current, _, _)) => metric.cmp_preference(current).is_gt(),
                None => true,
            };
            if better {
                best = Some((metric, neighbor, path));
            }
        }
        best.map(|(metric, neighbor, path)| BestRoute {
            path: path.clone(),
            neighbor: neighbor.clone(),
            iface: metric.iface,
            relation: metric.relation,
        })
    }

    /// Mark a destination as dirty on every interface.
    fn mark_dirty(&mut self, dest: &Destination) {
        for iface in self.links.interfaces() {
            self.dirty
                .entry(iface.clone())
                .or_default()
                .insert(dest.clone());
        }
    }
}

impl<F: ForwardingTable> Egp<F> {
    /// Apply the configuration, and reset all tables. Every neighbor starts with an empty set of
    /// received routes.
    pub fn set_config(&mut self, config: DaemonConfig) -> Result<(), ConfigError> {
        let links = config.link_table()?;
        self.received = links
            .iter()
            .map(|(_, ctx)| (ctx.neighbor.clone(), BTreeMap::new()))
            .collect();
        self.advertised = links
            .interfaces()
            .map(|iface| (iface.clone(), BTreeMap::new()))
            .collect();
        self.best.clear();
        self.dirty.clear();
        self.links = links;
        self.asn = Some(config.asn);
        debug!(
            "{}: configured with {} interfaces",
            self.name(),
            self.links.len()
        );
        Ok(())
    }

    /// Bind the daemon to a router and its forwarding table. Routes selected before the daemon
    /// was bound are installed into the new table.
    pub fn set_router(&mut self, router_id: RouterId, address: RouterAddr, mut table: F) {
        for (dest, best) in self.best.iter() {
            table.set_entry(dest, vec![best.iface.clone()]);
        }
        self.router_id = Some(router_id);
        self.address = Some(address);
        self.fw_table = Some(table);
    }

    /// Process a packet. The packet must contain a speaker entry before any update or withdrawal,
    /// otherwise these entries cannot be attributed to a neighbor and are dropped. Each
    /// destination is processed at most once per packet.
    pub fn process_packet(&mut self, packet: &RoutingPacket) {
        let mut speaker: Option<RouterAddr> = None;
        let mut processed: HashSet<Destination> = HashSet::new();
        let mut dropped = 0;

        for entry in packet.entries() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    trace!("{}: skip entry: {e}", self.name());
                    continue;
                }
            };
            match entry {
                Entry::Speaker(addr) => speaker = Some(addr),
                Entry::Update { dest, path } => match speaker.as_ref() {
                    Some(from) => {
                        if processed.insert(dest.clone()) {
                            self.learn_update(from, dest, path);
                        }
                    }
                    None => dropped += 1,
                },
                Entry::Withdrawal(dest) => match speaker.as_ref() {
                    Some(from) => {
                        if !processed.contains(&dest) && self.learn_withdrawal(from, &dest) {
                            processed.insert(dest);
                        }
                    }
                    None => dropped += 1,
                },
            }
        }

        if dropped > 0 {
            warn!(
                "{}: dropped {dropped} entries of a packet from {} without a speaker!",
                self.name(),
                packet.source()
            );
        }
    }

    /// Learn a batch of updates and withdrawals from the same speaker. Each destination is
    /// processed at most once; updates are handled before withdrawals.
    pub fn ingest(
        &mut self,
        speaker: &RouterAddr,
        updates: impl IntoIterator<Item = (Destination, AsPath)>,
        withdrawals: impl IntoIterator<Item = Destination>,
    ) {
        let mut processed: HashSet<Destination> = HashSet::new();
        for (dest, path) in updates {
            if processed.insert(dest.clone()) {
                self.learn_update(speaker, dest, path);
            }
        }
        for dest in withdrawals {
            if !processed.contains(&dest) && self.learn_withdrawal(speaker, &dest) {
                processed.insert(dest);
            }
        }
    }

    /// Store the route announced by `speaker` and re-run the decision process. A path that
    /// already contains the local AS is a loop: it is never stored, and any previous route from
    /// the same speaker is removed.
    fn learn_update(&mut self, speaker: &RouterAddr, dest: Destination, path: AsPath) {
        let Some(asn) = self.asn.clone() else {
            warn!("{}: received an update before configuration!", self.name());
            return;
        };
        let Some(routes) = self.received.get_mut(speaker) else {
            warn!(
                "{}: received an update from a non-neighbor {speaker}! Ignore it!",
                self.name()
            );
            return;
        };

        if path.contains(&asn) {
            let removed = routes.remove(&dest).is_some();
            trace!(
                "{}: reject route for {dest} from {speaker} (loop: {path})",
                self.name()
            );
            if removed {
                self.select(&dest);
            }
            return;
        }

        routes.insert(dest.clone(), path.prepend(&asn));
        self.select(&dest);
    }

    /// Remove the route of `speaker` for `dest` and re-run the decision process. Returns `false`
    /// if no such route was known.
    fn learn_withdrawal(&mut self, speaker: &RouterAddr, dest: &Destination) -> bool {
        let removed = self
            .received
            .get_mut(speaker)
            .and_then(|routes| routes.remove(dest))
            .is_some();
        if removed {
            self.select(dest);
        } else {
            trace!(
                "{}: ignore withdrawal of unknown route {dest} from {speaker}",
                self.name()
            );
        }
        removed
    }

    /// Run the decision process for a destination. This function may change the selected route
    /// and the forwarding table. Returns `true` if the selected route has changed, in which case
    /// the destination is also marked as dirty.
    pub fn select(&mut self, dest: &Destination) -> bool {
        let new = self.find_best(dest);
        let old = self.best.get(dest);
        if let (Some(new), Some(old)) = (new.as_ref(), old) {
            if new.same_route(old) {
                return false;
            }
        }
        let had_route = old.is_some();

        match new {
            Some(new) => {
                debug!(
                    "{}: new best route for {dest}: {} via {} ({})",
                    self.name(),
                    new.path,
                    new.neighbor,
                    new.relation
                );
                self.install(dest, new.iface.clone());
                self.best.insert(dest.clone(), new);
                self.mark_dirty(dest);
                true
            }
            None if had_route => {
                debug!("{}: lost all routes for {dest}", self.name());
                self.best.remove(dest);
                self.uninstall(dest);
                self.mark_dirty(dest);
                true
            }
            None => false,
        }
    }

    /// Overwrite the revenue descriptor of an interface, and re-run the decision process for all
    /// destinations with a selected route.
    pub fn update_link_properties(&mut self, iface: &InterfaceId, revenue: Option<String>) {
        debug!(
            "{}: updating revenues of {iface}: {}",
            self.name(),
            revenue.as_deref().unwrap_or("-")
        );
        if !self.links.set_revenue(iface, revenue) {
            warn!("{}: revenue update for unknown interface {iface}", self.name());
        }
        for dest in self.best.keys().cloned().collect::<Vec<_>>() {
            self.select(&dest);
        }
    }

    fn install(&mut self, dest: &Destination, iface: InterfaceId) {
        match self.fw_table.as_mut() {
            Some(table) => table.set_entry(dest, vec![iface]),
            None => warn!("{}: no forwarding table bound!", self.name()),
        }
    }

    fn uninstall(&mut self, dest: &Destination) {
        match self.fw_table.as_mut() {
            Some(table) => table.remove_entry(dest),
            None => warn!("{}: no forwarding table bound!", self.name()),
        }
    }
}

impl<F: ForwardingTable> RoutingDaemon for Egp<F> {
    type Table = F;

    fn configure(&mut self, config: DaemonConfig) -> Result<(), ConfigError> {
        self.set_config(config)
    }

    fn bind(&mut self, router_id: RouterId, address: RouterAddr, table: F) {
        self.set_router(router_id, address, table)
    }

    fn tick(&mut self, interfaces: &HashMap<InterfaceId, InterfaceState>, now: f64) {
        trace!(
            "{}: tick at {now} ({} interfaces)",
            self.name(),
            interfaces.len()
        );
    }

    fn on_link_properties_changed(&mut self, iface: &InterfaceId, properties: LinkProperties) {
        if let Some(revenue) = properties.revenues {
            self.update_link_properties(iface, Some(revenue));
        }
    }

    fn on_packet(&mut self, packet: &RoutingPacket, iface: &InterfaceId) {
        trace!(
            "{}: packet from {} on {iface}",
            self.name(),
            packet.source()
        );
        self.process_packet(packet)
    }

    fn generate_packet(&mut self, iface: &InterfaceId) -> Option<RoutingPacket> {
        self.generate(iface)
    }
}
