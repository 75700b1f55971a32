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

use std::path::PathBuf;

use clap::Parser;
use log::*;

use egpsim::{formatter::TableFormatter, scenario::Scenario};

/// Run a path-vector routing scenario until it converges, and print the resulting tables.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file describing the scenario.
    scenario: PathBuf,
    /// Maximum number of packets delivered while waiting for convergence.
    #[clap(long = "max-messages", short = 'm', default_value_t = 1_000_000)]
    max_messages: usize,
    /// Also print the received, selected, and advertised routes of each router.
    #[clap(long = "dump-tables", short = 'd')]
    dump_tables: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let scenario = Scenario::from_file(&args.scenario)?;
    info!(
        "Loaded scenario with {} routers, {} origins and {} events",
        scenario.routers.len(),
        scenario.origins.len(),
        scenario.events.len()
    );
    let net = scenario.run(Some(args.max_messages))?;

    for router in net.get_routers() {
        let addr = net.get_router_address(router)?;
        let egp = net.get_router(router)?;
        println!(
            "{addr} (AS{}):",
            egp.asn().map(|a| a.to_string()).unwrap_or_default()
        );
        for line in net.get_fw_table(router)?.fmt_table().lines() {
            println!("  {line}");
        }
        if args.dump_tables {
            println!("  selected:");
            for line in egp.fmt_best_routes().lines() {
                println!("    {line}");
            }
            for line in egp.fmt_table().lines() {
                println!("  {line}");
            }
        }
        println!();
    }

    Ok(())
}
