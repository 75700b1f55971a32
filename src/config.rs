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

//! # Daemon configuration
//!
//! The configuration is supplied once, before the daemon operates. It is usually read from a JSON
//! object of the following form:
//!
//! ```json
//! {
//!     "AS-ID": "65001",
//!     "relations": { "eth0": "customer", "eth1": "advanced-peer" },
//!     "neighbours": { "eth0": "10.0.0.2", "eth1": "10.0.1.2" },
//!     "link_properties": { "eth0": "+4", "eth1": { "revenues": "3;5" } }
//! }
//! ```
//!
//! `link_properties` is optional. Links without a revenue descriptor use the relation defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    link::{LinkContext, LinkTable},
    types::{Asn, ConfigError, InterfaceId, Relation, RouterAddr},
};

/// Dynamic properties of a link, as reported by the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProperties {
    /// Revenue descriptor (`+4`, `-1`, or `X;Y` for advanced peers).
    #[serde(default)]
    pub revenues: Option<String>,
}

impl LinkProperties {
    /// Create link properties that only carry a revenue descriptor.
    pub fn revenues(descriptor: impl Into<String>) -> Self {
        Self {
            revenues: Some(descriptor.into()),
        }
    }
}

/// Link property entry of the initial configuration. Either the bare revenue descriptor, or the
/// same object that is used for dynamic updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkPropertyEntry {
    /// Bare revenue descriptor
    Revenue(String),
    /// Full link properties
    Properties(LinkProperties),
}

impl LinkPropertyEntry {
    /// The revenue descriptor of the entry (if any).
    pub fn revenue(&self) -> Option<&str> {
        match self {
            LinkPropertyEntry::Revenue(r) => Some(r.as_str()),
            LinkPropertyEntry::Properties(p) => p.revenues.as_deref(),
        }
    }
}

/// Configuration of a single routing daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Local AS number
    #[serde(rename = "AS-ID", alias = "ASN", alias = "asn")]
    pub asn: Asn,
    /// Business relation of each interface
    pub relations: BTreeMap<InterfaceId, Relation>,
    /// Neighbor address behind each interface
    #[serde(alias = "neighbors")]
    pub neighbours: BTreeMap<InterfaceId, RouterAddr>,
    /// Initial link properties
    #[serde(default)]
    pub link_properties: BTreeMap<InterfaceId, LinkPropertyEntry>,
}

impl DaemonConfig {
    /// Create a new configuration without any interface.
    pub fn new(asn: impl Into<Asn>) -> Self {
        Self {
            asn: asn.into(),
            relations: BTreeMap::new(),
            neighbours: BTreeMap::new(),
            link_properties: BTreeMap::new(),
        }
    }

    /// Add an interface, and return the modified configuration.
    pub fn with_link(
        mut self,
        iface: impl Into<InterfaceId>,
        neighbor: impl Into<RouterAddr>,
        relation: Relation,
        revenue: Option<&str>,
    ) -> Self {
        let iface = iface.into();
        self.relations.insert(iface.clone(), relation);
        self.neighbours.insert(iface.clone(), neighbor.into());
        if let Some(revenue) = revenue {
            self.link_properties
                .insert(iface, LinkPropertyEntry::Revenue(revenue.to_string()));
        }
        self
    }

    /// Read a configuration from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Check that every interface with a relation has a unique neighbor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<&RouterAddr, &InterfaceId> = HashMap::new();
        for iface in self.relations.keys() {
            let neighbor = self
                .neighbours
                .get(iface)
                .ok_or_else(|| ConfigError::MissingNeighbor(iface.clone()))?;
            if let Some(other) = seen.insert(neighbor, iface) {
                return Err(ConfigError::DuplicateNeighbor(
                    neighbor.clone(),
                    other.clone(),
                    iface.clone(),
                ));
            }
        }
        Ok(())
    }

    /// Build the link table. Only interfaces with a relation are part of the table.
    pub(crate) fn link_table(&self) -> Result<LinkTable, ConfigError> {
        self.validate()?;
        let mut table = LinkTable::new();
        for (iface, relation) in self.relations.iter() {
            let neighbor = self
                .neighbours
                .get(iface)
                .ok_or_else(|| ConfigError::MissingNeighbor(iface.clone()))?
                .clone();
            let revenue = self
                .link_properties
                .get(iface)
                .and_then(|p| p.revenue())
                .map(|r| r.to_string());
            table.insert(
                iface.clone(),
                LinkContext {
                    neighbor,
                    relation: *relation,
                    revenue,
                },
            );
        }
        Ok(table)
    }
}
