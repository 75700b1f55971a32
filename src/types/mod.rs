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

//! Module containing all type definitions

use petgraph::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

mod revenue;
pub use revenue::{parse_revenue, Revenue, RevenueError, RevenueSpec};

pub(crate) type IndexType = u32;
/// Router Identification (and index into the host topology graph)
pub type RouterId = NodeIndex<IndexType>;

/// A token as it may appear in a configuration file, either as a JSON string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
    /// Textual token
    Str(String),
    /// Numeric token, like an AS number written without quotes.
    Int(i64),
}

impl From<RawToken> for String {
    fn from(value: RawToken) -> Self {
        match value {
            RawToken::Str(s) => s.trim().to_string(),
            RawToken::Int(x) => x.to_string(),
        }
    }
}

/// Declare an opaque, string-comparable identifier.
macro_rules! token_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "RawToken", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from its textual representation.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the textual representation.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawToken> for $name {
            fn from(value: RawToken) -> Self {
                Self(value.into())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

token_type!(
    /// AS Number. Compared as an opaque token, never as an integer.
    Asn
);
token_type!(
    /// Destination prefix, as it is written in the wire messages.
    Destination
);
token_type!(
    /// Address of a router (either self or a neighbor).
    RouterAddr
);
token_type!(
    /// Name of a local interface.
    InterfaceId
);

/// AS-PATH, where the most recently prepended AS comes first and the origin of the route is last.
///
/// On the wire, the path is written as space-separated tokens. Parsing never fails; an empty
/// string yields an empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AsPath(Vec<Asn>);

impl AsPath {
    /// Create a new path from an ordered sequence of AS numbers.
    pub fn new<I>(path: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Asn>,
    {
        Self(path.into_iter().map(|x| x.into()).collect())
    }

    /// Returns a new path with `asn` prepended.
    pub fn prepend(&self, asn: &Asn) -> Self {
        let mut path = Vec::with_capacity(self.0.len() + 1);
        path.push(asn.clone());
        path.extend(self.0.iter().cloned());
        Self(path)
    }

    /// Returns `true` if the AS number appears anywhere on the path.
    pub fn contains(&self, asn: &Asn) -> bool {
        self.0.contains(asn)
    }

    /// Number of AS hops.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the path has no hops.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all AS numbers, starting with the most recently prepended one.
    pub fn iter(&self) -> std::slice::Iter<'_, Asn> {
        self.0.iter()
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&itertools::join(self.0.iter(), " "))
    }
}

impl FromStr for AsPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.split_whitespace().map(Asn::from).collect()))
    }
}

impl TryFrom<String> for AsPath {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AsPath> for String {
    fn from(value: AsPath) -> Self {
        value.to_string()
    }
}

/// Business relation of a neighbor, relative to this router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// The neighbor pays us for transit.
    Customer,
    /// Settlement-free peer.
    Peer,
    /// Peer with asymmetric revenue, depending on the traffic balance.
    AdvancedPeer,
    /// We pay the neighbor for transit.
    Provider,
    /// Any relation that is not recognized.
    #[serde(other)]
    Unknown,
}

impl Relation {
    /// Financial value assumed when the link has no (parsable) revenue descriptor.
    pub fn default_revenue(&self) -> i64 {
        match self {
            Relation::Customer => 4,
            Relation::Provider => -1,
            Relation::Peer | Relation::AdvancedPeer | Relation::Unknown => 0,
        }
    }

    /// Bias added to the financial value, such that equal revenues prefer customers over
    /// advanced peers over peers over providers. Smaller than any revenue step.
    pub fn tie_break_bias(&self) -> f64 {
        match self {
            Relation::Customer => 0.3,
            Relation::AdvancedPeer => 0.2,
            Relation::Peer => 0.1,
            Relation::Provider | Relation::Unknown => 0.0,
        }
    }

    /// returns true if the relation is a customer relation
    pub fn is_customer(&self) -> bool {
        matches!(self, Self::Customer)
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Customer => write!(f, "customer"),
            Relation::Peer => write!(f, "peer"),
            Relation::AdvancedPeer => write!(f, "advanced-peer"),
            Relation::Provider => write!(f, "provider"),
            Relation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Configuration Error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An interface has a relation, but no neighbor address.
    #[error("Interface {0} has a relation but no neighbor address")]
    MissingNeighbor(InterfaceId),
    /// Two interfaces point to the same neighbor address.
    #[error("Neighbor {0} is configured on both {1} and {2}")]
    DuplicateNeighbor(RouterAddr, InterfaceId, InterfaceId),
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingNeighbor(l0), Self::MissingNeighbor(r0)) => l0 == r0,
            (Self::DuplicateNeighbor(l0, l1, l2), Self::DuplicateNeighbor(r0, r1, r2)) => {
                l0 == r0 && l1 == r1 && l2 == r2
            }
            (Self::JsonError(l), Self::JsonError(r)) => l.to_string() == r.to_string(),
            _ => false,
        }
    }
}

/// Network Errors, raised by the simulation host.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Configuration error
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ConfigError),
    /// Device is not present in the topology
    #[error("Network device was not found in topology: {0:?}")]
    DeviceNotFound(RouterId),
    /// Device name is not present in the topology
    #[error("Network device name was not found in topology: {0}")]
    DeviceNameNotFound(String),
    /// The device exists, but it is an origin speaker instead of a routing daemon.
    #[error("Network device is an origin speaker: {0:?}")]
    DeviceIsOrigin(RouterId),
    /// The interface is already used by a different link.
    #[error("Interface {1} of {0:?} is already connected")]
    InterfaceInUse(RouterId, InterfaceId),
    /// Convergence Problem
    #[error("Network cannot converge in the given time!")]
    NoConvergence,
    /// Json error
    #[error("{0}")]
    JsonError(Box<serde_json::Error>),
    /// IO error, while reading a scenario
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for NetworkError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(Box::new(value))
    }
}

impl PartialEq for NetworkError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ConfigError(l0), Self::ConfigError(r0)) => l0 == r0,
            (Self::DeviceNotFound(l0), Self::DeviceNotFound(r0)) => l0 == r0,
            (Self::DeviceNameNotFound(l0), Self::DeviceNameNotFound(r0)) => l0 == r0,
            (Self::DeviceIsOrigin(l0), Self::DeviceIsOrigin(r0)) => l0 == r0,
            (Self::InterfaceInUse(l0, l1), Self::InterfaceInUse(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::JsonError(l), Self::JsonError(r)) => l.to_string() == r.to_string(),
            (Self::IoError(l), Self::IoError(r)) => l.kind() == r.kind(),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}
