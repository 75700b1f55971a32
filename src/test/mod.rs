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

//! Test module

use crate::{
    config::DaemonConfig,
    daemon::RoutingDaemon,
    egp::Egp,
    fw_table::FwTable,
    message::{Entry, Payload, RoutingPacket},
    types::{AsPath, Relation},
};

mod test_network;
mod test_scenario;

pub(crate) const LOCAL: &str = "10.0.0.1";
pub(crate) const CUSTOMER: &str = "10.0.1.1";
pub(crate) const PEER: &str = "10.0.2.1";
pub(crate) const PROVIDER: &str = "10.0.3.1";
pub(crate) const ADV_PEER: &str = "10.0.4.1";

/// Daemon in AS 65001 with one interface of each relation:
///
/// - `eth0`: customer
/// - `eth1`: peer
/// - `eth2`: provider
/// - `eth3`: advanced peer
pub(crate) fn config() -> DaemonConfig {
    DaemonConfig::new("65001")
        .with_link("eth0", CUSTOMER, Relation::Customer, None)
        .with_link("eth1", PEER, Relation::Peer, None)
        .with_link("eth2", PROVIDER, Relation::Provider, None)
        .with_link("eth3", ADV_PEER, Relation::AdvancedPeer, None)
}

pub(crate) fn daemon(config: DaemonConfig) -> Egp<FwTable> {
    let mut egp = Egp::new();
    egp.configure(config).unwrap();
    egp.bind(0.into(), LOCAL.into(), FwTable::new());
    egp
}

pub(crate) fn path(p: &str) -> AsPath {
    p.parse().unwrap()
}

pub(crate) fn update(dest: &str, p: &str) -> Entry {
    Entry::Update {
        dest: dest.into(),
        path: path(p),
    }
}

pub(crate) fn withdraw(dest: &str) -> Entry {
    Entry::Withdrawal(dest.into())
}

/// Build a packet that starts with the speaker entry of `speaker`.
pub(crate) fn packet(speaker: &str, entries: impl IntoIterator<Item = Entry>) -> RoutingPacket {
    let payload: Payload = std::iter::once(Entry::Speaker(speaker.into()))
        .chain(entries)
        .collect();
    RoutingPacket::with_payload(speaker.into(), payload)
}

/// Decode all entries of a packet.
pub(crate) fn entries(packet: &RoutingPacket) -> Vec<Entry> {
    packet.entries().collect::<Result<Vec<_>, _>>().unwrap()
}
