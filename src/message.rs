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

//! # Wire messages
//!
//! A routing packet carries a payload of text entries. This module converts between these text
//! lines and structured [`Entry`] values. Three kinds of entries exist:
//!
//! - `speaker: <address>` identifies the sending neighbor,
//! - `EGP-update prefix: <dest> AS-path: <asn> <asn> ...` announces a route,
//! - `EGP-withdrawal prefix: <dest>` withdraws a route.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AsPath, Destination, RouterAddr};

const SPEAKER: &str = "speaker";
const UPDATE: &str = "EGP-update";
const WITHDRAWAL: &str = "EGP-withdrawal";

/// A single structured payload entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entry {
    /// Identity of the router that sent the packet.
    Speaker(RouterAddr),
    /// Announce a route towards `dest`.
    Update {
        /// The announced destination
        dest: Destination,
        /// AS path of the announcement (as seen by the sender)
        path: AsPath,
    },
    /// Withdraw a previously announced route.
    Withdrawal(Destination),
}

/// Errors while decoding a payload entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The entry has a known kind, but misses mandatory fields.
    #[error("Malformed entry: {0:?}")]
    Malformed(String),
    /// The entry kind is not known.
    #[error("Unknown entry: {0:?}")]
    Unknown(String),
}

impl FromStr for Entry {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let malformed = || CodecError::Malformed(s.to_string());
        match tokens.first() {
            Some(kind) if kind.starts_with(SPEAKER) => tokens
                .get(1)
                .map(|addr| Entry::Speaker(RouterAddr::from(*addr)))
                .ok_or_else(malformed),
            Some(kind) if kind.starts_with(WITHDRAWAL) => tokens
                .get(2)
                .map(|dest| Entry::Withdrawal(Destination::from(*dest)))
                .ok_or_else(malformed),
            Some(kind) if kind.starts_with(UPDATE) => {
                let dest = tokens.get(2).ok_or_else(malformed)?;
                let path = AsPath::new(tokens.iter().skip(4).copied());
                Ok(Entry::Update {
                    dest: Destination::from(*dest),
                    path,
                })
            }
            _ => Err(CodecError::Unknown(s.to_string())),
        }
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Speaker(addr) => write!(f, "{SPEAKER}: {addr}"),
            Entry::Update { dest, path } => write!(f, "{UPDATE} prefix: {dest} AS-path: {path}"),
            Entry::Withdrawal(dest) => write!(f, "{WITHDRAWAL} prefix: {dest}"),
        }
    }
}

/// Generic payload, an ordered list of text entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload(Vec<String>);

impl Payload {
    /// Append a raw text entry.
    pub fn add_entry(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    /// Get all raw text entries
    pub fn data(&self) -> &[String] {
        &self.0
    }

    /// Decode all entries in order. Entries that cannot be decoded are returned as errors, such
    /// that the caller can decide to skip them.
    pub fn entries(&self) -> impl Iterator<Item = Result<Entry, CodecError>> + '_ {
        self.0.iter().map(|line| line.parse())
    }
}

impl FromIterator<Entry> for Payload {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self(iter.into_iter().map(|e| e.to_string()).collect())
    }
}

/// A routing packet, as it is delivered by the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPacket {
    source: RouterAddr,
    payload: Payload,
}

impl RoutingPacket {
    /// Create a new packet from the given payload.
    pub fn with_payload(source: RouterAddr, payload: Payload) -> Self {
        Self { source, payload }
    }

    /// The address of the router that created the packet.
    pub fn source(&self) -> &RouterAddr {
        &self.source
    }

    /// Get the payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replace the payload.
    pub fn set_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }

    /// Decode all entries of the payload.
    pub fn entries(&self) -> impl Iterator<Item = Result<Entry, CodecError>> + '_ {
        self.payload.entries()
    }
}
