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

//! Revenue descriptors of a link, and how they are turned into a financial value.
//!
//! A descriptor is either a signed integer (`+4`, `-1`), used for customers, peers and providers,
//! or a pair `X;Y` for advanced peers. `X` is the revenue when ingress traffic dominates, and `Y`
//! the revenue when egress traffic dominates. Selecting a route adds egress traffic, so the
//! marginal value of a route over an advanced-peer link is `Y`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Relation;

/// Parsed revenue descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevenueSpec {
    /// Signed scalar revenue
    Scalar(i64),
    /// Revenue pair of an advanced-peer link.
    Pair {
        /// Revenue if ingress traffic exceeds egress traffic (`X`).
        ingress: i64,
        /// Revenue if egress traffic exceeds ingress traffic (`Y`).
        egress: i64,
    },
}

/// Errors while parsing a revenue descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevenueError {
    /// The descriptor is not a signed integer
    #[error("Invalid revenue value: {0:?}")]
    InvalidScalar(String),
    /// The descriptor is not of the form `X;Y`
    #[error("Invalid revenue pair: {0:?}")]
    InvalidPair(String),
}

impl RevenueSpec {
    /// Parse a descriptor. Advanced-peer links expect the `X;Y` form, all other relations a signed
    /// integer. Any `+` sign in the descriptor is ignored.
    pub fn parse(relation: Relation, descriptor: &str) -> Result<Self, RevenueError> {
        let descriptor = descriptor.trim();
        if relation == Relation::AdvancedPeer {
            let mut parts = descriptor.split(';');
            let ingress = parts.next().map(str::trim);
            let egress = parts.next().map(str::trim);
            match (ingress, egress) {
                (Some(ingress), Some(egress)) => {
                    let egress = parse_signed(egress)
                        .ok_or_else(|| RevenueError::InvalidPair(descriptor.to_string()))?;
                    // `X` is not needed for route selection, a malformed `X` is tolerated.
                    let ingress = parse_signed(ingress).unwrap_or_default();
                    Ok(Self::Pair { ingress, egress })
                }
                _ => Err(RevenueError::InvalidPair(descriptor.to_string())),
            }
        } else {
            parse_signed(descriptor)
                .map(Self::Scalar)
                .ok_or_else(|| RevenueError::InvalidScalar(descriptor.to_string()))
        }
    }

    /// The marginal value of sending traffic over the link.
    pub fn value(&self) -> i64 {
        match self {
            Self::Scalar(x) => *x,
            Self::Pair { egress, .. } => *egress,
        }
    }
}

/// Parse a signed integer. Every `+` is ignored, as well as surrounding whitespace.
fn parse_signed(s: &str) -> Option<i64> {
    s.replace('+', "").trim().parse().ok()
}

/// Financial value of a link, and whether it was derived from the relation defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revenue {
    /// The financial value
    pub value: i64,
    /// `true` if the descriptor was missing or malformed.
    pub fallback: bool,
}

/// Compute the financial value of a link. Missing and malformed descriptors never fail; they fall
/// back to [`Relation::default_revenue`].
pub fn parse_revenue(relation: Relation, descriptor: Option<&str>) -> Revenue {
    match descriptor
        .filter(|d| !d.trim().is_empty())
        .map(|d| RevenueSpec::parse(relation, d))
    {
        Some(Ok(spec)) => Revenue {
            value: spec.value(),
            fallback: false,
        },
        Some(Err(e)) => {
            log::debug!("{e}, use the {relation} default");
            Revenue {
                value: relation.default_revenue(),
                fallback: true,
            }
        }
        None => Revenue {
            value: relation.default_revenue(),
            fallback: true,
        },
    }
}
