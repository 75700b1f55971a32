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

//! # Top-level Network module
//!
//! This module is a small, in-memory simulation host. It connects routing daemons ([`Egp`]) and
//! origin speakers ([`Origin`]) with links between pairs of interfaces, and drives them through
//! export cycles until no more packets are exchanged.

use std::collections::{BTreeSet, HashMap};

use log::*;
use petgraph::prelude::*;

use crate::{
    config::{DaemonConfig, LinkProperties},
    daemon::{InterfaceState, RoutingDaemon},
    egp::Egp,
    event::{BasicEventQueue, Event, EventQueue},
    fw_table::FwTable,
    message::RoutingPacket,
    origin::Origin,
    types::{AsPath, Asn, Destination, IndexType, InterfaceId, NetworkError, RouterAddr, RouterId},
};

static DEFAULT_STOP_AFTER: usize = 1_000_000;

/// Topology graph. Each node is a device, and each directed edge carries the interface of the
/// source device that leads to the target.
pub type Topology = StableGraph<RouterAddr, InterfaceId, Directed, IndexType>;

/// # Network struct
/// The struct manages all devices (both routing daemons and origin speakers), how they are
/// connected, and delivers the packets between them.
///
/// ```rust
/// use egpsim::prelude::*;
///
/// fn main() -> Result<(), NetworkError> {
///     let mut net = Network::default();
///
///     let o = net.add_origin("10.0.0.1", "100");
///     let r = net.add_router(
///         "10.0.0.2",
///         DaemonConfig::new("200").with_link("eth0", "10.0.0.1", Relation::Customer, Some("+4")),
///     )?;
///     net.add_link(o, "eth0", r, "eth0")?;
///
///     net.advertise_route(o, "P1", None)?;
///     net.simulate()?;
///
///     let table = net.get_fw_table(r)?;
///     assert_eq!(table.next_hop(&"P1".into()), Some(&InterfaceId::from("eth0")));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Network<Q = BasicEventQueue> {
    pub(crate) topo: Topology,
    pub(crate) routers: HashMap<RouterId, Egp<FwTable>>,
    pub(crate) origins: HashMap<RouterId, Origin>,
    pub(crate) addresses: HashMap<RouterAddr, RouterId>,
    pub(crate) links: HashMap<(RouterId, InterfaceId), (RouterId, InterfaceId)>,
    pub(crate) stop_after: Option<usize>,
    pub(crate) queue: Q,
    pub(crate) time: f64,
}

impl Default for Network<BasicEventQueue> {
    fn default() -> Self {
        Self::new(BasicEventQueue::new())
    }
}

impl<Q> Network<Q> {
    /// Generate an empty Network
    pub fn new(queue: Q) -> Self {
        Self {
            topo: Topology::default(),
            routers: HashMap::new(),
            origins: HashMap::new(),
            addresses: HashMap::new(),
            links: HashMap::new(),
            stop_after: Some(DEFAULT_STOP_AFTER),
            queue,
            time: 0.0,
        }
    }

    /// Add a new routing daemon and configure it. The daemon is bound to a fresh forwarding
    /// table. This function returns the ID of the router.
    pub fn add_router(
        &mut self,
        address: impl Into<RouterAddr>,
        config: DaemonConfig,
    ) -> Result<RouterId, NetworkError> {
        let address = address.into();
        let mut daemon: Egp<FwTable> = Egp::new();
        daemon.configure(config)?;
        let router_id = self.topo.add_node(address.clone());
        daemon.bind(router_id, address.clone(), FwTable::new());
        self.routers.insert(router_id, daemon);
        self.addresses.insert(address, router_id);
        Ok(router_id)
    }

    /// Add a new origin speaker. It does not process any packet, it just originates destinations.
    pub fn add_origin(&mut self, address: impl Into<RouterAddr>, asn: impl Into<Asn>) -> RouterId {
        let address = address.into();
        let router_id = self.topo.add_node(address.clone());
        self.origins
            .insert(router_id, Origin::new(router_id, address.clone(), asn.into()));
        self.addresses.insert(address, router_id);
        router_id
    }

    /// Connect interface `iface_a` of `a` with interface `iface_b` of `b`. Each interface can only
    /// be part of a single link.
    pub fn add_link(
        &mut self,
        a: RouterId,
        iface_a: impl Into<InterfaceId>,
        b: RouterId,
        iface_b: impl Into<InterfaceId>,
    ) -> Result<(), NetworkError> {
        let iface_a = iface_a.into();
        let iface_b = iface_b.into();
        for r in [a, b] {
            if !self.topo.contains_node(r) {
                return Err(NetworkError::DeviceNotFound(r));
            }
        }
        for (r, iface) in [(a, &iface_a), (b, &iface_b)] {
            if self.link_target(r, iface).is_some() {
                return Err(NetworkError::InterfaceInUse(r, iface.clone()));
            }
        }
        for (r, iface) in [(a, &iface_a), (b, &iface_b)] {
            if let Some(origin) = self.origins.get_mut(&r) {
                origin.interfaces.insert(iface.clone());
            }
        }
        self.links
            .insert((a, iface_a.clone()), (b, iface_b.clone()));
        self.links
            .insert((b, iface_b.clone()), (a, iface_a.clone()));
        self.topo.add_edge(a, b, iface_a);
        self.topo.add_edge(b, a, iface_b);
        Ok(())
    }

    /// Returns the device and its interface on the other end of the link connected to `iface`.
    pub fn link_target(&self, router: RouterId, iface: &InterfaceId) -> Option<(RouterId, &InterfaceId)> {
        self.links
            .get(&(router, iface.clone()))
            .map(|(target, target_iface)| (*target, target_iface))
    }

    /// Set the maximum number of delivered packets during a single call to
    /// [`Network::simulate`]. Set to `None` to never stop.
    pub fn set_msg_limit(&mut self, stop_after: Option<usize>) {
        self.stop_after = stop_after;
    }

    /// Get the ID of a device by its address.
    pub fn get_router_id(&self, address: impl Into<RouterAddr>) -> Result<RouterId, NetworkError> {
        let address = address.into();
        self.addresses
            .get(&address)
            .copied()
            .ok_or_else(|| NetworkError::DeviceNameNotFound(address.to_string()))
    }

    /// Get the address of a device.
    pub fn get_router_address(&self, router: RouterId) -> Result<&RouterAddr, NetworkError> {
        self.topo
            .node_weight(router)
            .ok_or(NetworkError::DeviceNotFound(router))
    }

    /// Get a reference to a routing daemon
    pub fn get_router(&self, router: RouterId) -> Result<&Egp<FwTable>, NetworkError> {
        match self.routers.get(&router) {
            Some(r) => Ok(r),
            None if self.origins.contains_key(&router) => Err(NetworkError::DeviceIsOrigin(router)),
            None => Err(NetworkError::DeviceNotFound(router)),
        }
    }

    /// Get a reference to an origin speaker
    pub fn get_origin(&self, router: RouterId) -> Result<&Origin, NetworkError> {
        self.origins
            .get(&router)
            .ok_or(NetworkError::DeviceNotFound(router))
    }

    /// Get the forwarding table of a routing daemon.
    pub fn get_fw_table(&self, router: RouterId) -> Result<&FwTable, NetworkError> {
        self.get_router(router)?
            .fw_table()
            .ok_or(NetworkError::DeviceNotFound(router))
    }

    /// Return the IDs of all routing daemons, in ascending order.
    pub fn get_routers(&self) -> Vec<RouterId> {
        let mut routers: Vec<RouterId> = self.routers.keys().copied().collect();
        routers.sort();
        routers
    }

    /// Return the IDs of all origin speakers, in ascending order.
    pub fn get_origins(&self) -> Vec<RouterId> {
        let mut origins: Vec<RouterId> = self.origins.keys().copied().collect();
        origins.sort();
        origins
    }

    /// Get the topology graph
    pub fn get_topology(&self) -> &Topology {
        &self.topo
    }

    /// Current simulation time, as last passed to [`Network::tick`].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Start advertising a destination from an origin speaker. If `path` is `None`, the path only
    /// contains the AS of the origin.
    pub fn advertise_route(
        &mut self,
        origin: RouterId,
        dest: impl Into<Destination>,
        path: Option<AsPath>,
    ) -> Result<AsPath, NetworkError> {
        let origin = self.origin_mut(origin)?;
        Ok(origin.advertise_prefix(dest.into(), path))
    }

    /// Stop advertising a destination from an origin speaker.
    pub fn withdraw_route(
        &mut self,
        origin: RouterId,
        dest: impl Into<Destination>,
    ) -> Result<(), NetworkError> {
        let dest = dest.into();
        if !self.origin_mut(origin)?.withdraw_prefix(&dest) {
            warn!("Origin {origin:?} does not advertise {dest}!");
        }
        Ok(())
    }

    /// Notify a routing daemon that the properties of one of its links have changed.
    pub fn set_link_properties(
        &mut self,
        router: RouterId,
        iface: impl Into<InterfaceId>,
        properties: LinkProperties,
    ) -> Result<(), NetworkError> {
        let iface = iface.into();
        self.router_mut(router)?
            .on_link_properties_changed(&iface, properties);
        Ok(())
    }

    /// Call the periodic hook of all routing daemons, with every linked interface reported as up.
    pub fn tick(&mut self, now: f64) {
        self.time = now;
        for (router_id, daemon) in self.routers.iter_mut() {
            let states: HashMap<InterfaceId, InterfaceState> = self
                .topo
                .edges_directed(*router_id, Outgoing)
                .map(|e| (e.weight().clone(), InterfaceState::Up))
                .collect();
            daemon.tick(&states, now);
        }
    }

    fn origin_mut(&mut self, origin: RouterId) -> Result<&mut Origin, NetworkError> {
        self.origins
            .get_mut(&origin)
            .ok_or(NetworkError::DeviceNotFound(origin))
    }

    fn router_mut(&mut self, router: RouterId) -> Result<&mut Egp<FwTable>, NetworkError> {
        if self.origins.contains_key(&router) {
            return Err(NetworkError::DeviceIsOrigin(router));
        }
        self.routers
            .get_mut(&router)
            .ok_or(NetworkError::DeviceNotFound(router))
    }
}

impl<Q: EventQueue> Network<Q> {
    /// Run a single export cycle: every device generates a packet for each of its interfaces,
    /// and the packets are enqueued. Returns the number of enqueued packets.
    pub fn export_cycle(&mut self) -> usize {
        let mut outgoing: Vec<(RouterId, InterfaceId, RoutingPacket)> = Vec::new();

        let mut devices: Vec<RouterId> = self.topo.node_indices().collect();
        devices.sort();
        for router in devices {
            let ifaces: BTreeSet<InterfaceId> = self
                .topo
                .edges_directed(router, Outgoing)
                .map(|e| e.weight().clone())
                .collect();
            if let Some(daemon) = self.routers.get_mut(&router) {
                // unconnected interfaces keep their dirty markers until they are linked
                for iface in daemon.links().interfaces().cloned().collect::<Vec<_>>() {
                    if !ifaces.contains(&iface) {
                        trace!("{router:?}: interface {iface} is not connected");
                        continue;
                    }
                    if let Some(packet) = daemon.generate_packet(&iface) {
                        outgoing.push((router, iface, packet));
                    }
                }
            } else if let Some(origin) = self.origins.get_mut(&router) {
                for iface in ifaces.iter() {
                    if let Some(packet) = origin.generate(iface) {
                        outgoing.push((router, iface.clone(), packet));
                    }
                }
            }
        }

        let mut num = 0;
        for (src, iface, packet) in outgoing {
            let (dst, dst_iface) = match self.link_target(src, &iface) {
                Some((dst, dst_iface)) => (dst, dst_iface.clone()),
                None => continue,
            };
            let event = Event::Packet {
                src,
                dst,
                iface: dst_iface,
                packet,
            };
            self.queue.push(event);
            num += 1;
        }
        num
    }

    /// Deliver the next event on the queue. Returns `None` if no event was enqueued.
    pub fn simulate_step(&mut self) -> Option<Event> {
        let event = self.queue.pop()?;
        trace!("deliver {} entries to {:?}", event.num_entries(), event.router());
        match &event {
            Event::Packet {
                dst, iface, packet, ..
            } => {
                if let Some(daemon) = self.routers.get_mut(dst) {
                    daemon.on_packet(packet, iface);
                } else {
                    trace!("{dst:?} does not process packets");
                }
            }
        }
        Some(event)
    }

    /// Simulate the network until it has converged. Export cycles and packet delivery alternate
    /// until an export cycle produces no packets. Fails with [`NetworkError::NoConvergence`] if
    /// more packets than allowed by [`Network::set_msg_limit`] are delivered.
    pub fn simulate(&mut self) -> Result<(), NetworkError> {
        let mut delivered = 0;
        loop {
            if self.export_cycle() == 0 && self.queue.is_empty() {
                debug!("Network converged after {delivered} packets");
                return Ok(());
            }
            while self.simulate_step().is_some() {
                delivered += 1;
                if self.stop_after.map(|max| delivered > max).unwrap_or(false) {
                    self.queue.clear();
                    return Err(NetworkError::NoConvergence);
                }
            }
        }
    }

    /// Get a reference to the queue
    pub fn queue(&self) -> &Q {
        &self.queue
    }
}
