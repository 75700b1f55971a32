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

//! Module that introduces a formatter to display the tables of a routing daemon.

use std::fmt::Write;

use itertools::Itertools;

use crate::{
    egp::{AdvertisedRoutes, BestRoute, Egp},
    fw_table::FwTable,
    types::{Destination, InterfaceId},
};

/// Trait to format a table as multiple lines of text.
pub trait TableFormatter {
    /// Return the formatted table, one entry per line.
    fn fmt_table(&self) -> String;
}

impl TableFormatter for FwTable {
    fn fmt_table(&self) -> String {
        self.iter()
            .map(|(dest, ifaces)| {
                format!(
                    "{dest} -> {}",
                    if ifaces.is_empty() {
                        String::from("X")
                    } else {
                        ifaces.iter().join("|")
                    }
                )
            })
            .join("\n")
    }
}

impl TableFormatter for AdvertisedRoutes {
    fn fmt_table(&self) -> String {
        self.iter()
            .map(|(dest, path)| format!("{dest}: {path}"))
            .join("\n")
    }
}

impl TableFormatter for BestRoute {
    fn fmt_table(&self) -> String {
        format!(
            "{} via {} on {} ({})",
            self.path, self.neighbor, self.iface, self.relation
        )
    }
}

impl<F> Egp<F> {
    /// Get a struct to display all candidates for a destination. The selected route is marked
    /// with a `*`.
    pub fn fmt_rib(&self, dest: &Destination) -> String {
        let best = self.best_route(dest);
        let mut result = String::new();
        let f = &mut result;
        for (neighbor, routes) in self.received_routes() {
            let Some(path) = routes.get(dest) else {
                continue;
            };
            let selected = best
                .map(|b| &b.neighbor == neighbor && &b.path == path)
                .unwrap_or(false);
            let metric = self
                .evaluate(dest, neighbor, path)
                .map(|m| format!("score = {:.1}, len = {}", m.score, m.path_len))
                .unwrap_or_else(|| String::from("unknown neighbor"));
            let _ = writeln!(
                f,
                "{} {neighbor}: {path} ({metric})",
                if selected { "*" } else { " " }
            );
        }
        result
    }

    /// Get a struct to display all selected routes.
    pub fn fmt_best_routes(&self) -> String {
        self.best_routes()
            .iter()
            .map(|(dest, best)| format!("{dest}: {}", best.fmt_table()))
            .join("\n")
    }

    /// Get a struct to display the routes last advertised on an interface.
    pub fn fmt_advertised(&self, iface: &InterfaceId) -> String {
        self.advertised_routes(iface)
            .map(|table| table.fmt_table())
            .unwrap_or_default()
    }
}

impl<F> TableFormatter for Egp<F> {
    fn fmt_table(&self) -> String {
        let mut result = String::new();
        let f = &mut result;
        let dests = self
            .received_routes()
            .values()
            .flat_map(|routes| routes.keys())
            .unique()
            .sorted();
        for dest in dests {
            let _ = writeln!(f, "{dest}:");
            for line in self.fmt_rib(dest).lines() {
                let _ = writeln!(f, "  {line}");
            }
        }
        for (iface, ctx) in self.links().iter() {
            let _ = writeln!(
                f,
                "advertised on {iface} ({}, {}):",
                ctx.relation, ctx.neighbor
            );
            for line in self.fmt_advertised(iface).lines() {
                let _ = writeln!(f, "  {line}");
            }
        }
        result
    }
}
