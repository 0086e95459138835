/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

mod args;

use clap::CommandFactory;
use clap::Parser;
use eyre::WrapErr as _;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use zenstates::MSRDevice;
use zenstates::PStateSlot;
use zenstates::TscLock;
use zenstates::ZenStates;
use zenstates::ZenStatesError;
use zenstates_config::load_config;

use crate::args::Args;

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    if !args.is_actionable() {
        Args::command().print_help()?;
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(read_core) = args.read_core() {
        config.msr.read_core = read_core;
    }

    let filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .with_default_directive(Directive::from(config.logs.log_level))
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("setting global tracing subscriber failed")?;
    tracing_log::LogTracer::init()?;

    tracing::debug!("running with config {config:?}");
    let zen_states = ZenStates::from_config(&config.msr, &config.cpu).map_err(|error| {
        let context = access_context(&error);
        eyre::Report::new(error).wrap_err(context)
    })?;

    if args.list {
        list(&zen_states, args.json)?;
    }

    if let Some(index) = args.pstate {
        let slot = PStateSlot::new(index)?;
        pstate(&zen_states, &args, slot)?;
    }

    if let Some(enabled) = args.c6_switch() {
        zen_states
            .set_c6(enabled)
            .wrap_err("failed to switch C6 state")?;
        println!("{} C6 state", if enabled { "Enabled" } else { "Disabled" });
    }

    if let Some(enabled) = args.cpb_switch() {
        zen_states
            .set_cpb(enabled)
            .wrap_err("failed to switch core performance boost")?;
        println!(
            "{} core performance boost",
            if enabled { "Enabled" } else { "Disabled" }
        );
    }

    Ok(())
}

fn list(zen_states: &ZenStates<MSRDevice>, json: bool) -> eyre::Result<()> {
    let listing = zen_states.list().wrap_err("failed to read CPU state")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{listing}");
    }

    Ok(())
}

fn pstate(zen_states: &ZenStates<MSRDevice>, args: &Args, slot: PStateSlot) -> eyre::Result<()> {
    let Some(request) = args.pstate_request(slot) else {
        let raw = zen_states.read_pstate_raw(slot)?;
        println!("{slot} - {}", describe(zen_states, raw));
        return Ok(());
    };

    let outcome = zen_states
        .apply_pstate(&request)
        .wrap_err_with(|| format!("failed to change {slot}"))?;

    println!("Current {slot}: {}", describe(zen_states, outcome.before));
    for skipped in &outcome.skipped {
        println!("Ignored: {skipped}");
    }

    if !outcome.is_changed() {
        println!("{slot} is unchanged");
        return Ok(());
    }

    if outcome.tsc_lock == TscLock::LockedNow {
        println!("Locked TSC frequency");
    }
    println!("New {slot}: {}", describe(zen_states, outcome.after));

    Ok(())
}

fn describe(zen_states: &ZenStates<MSRDevice>, raw: u64) -> String {
    match zen_states.decode(raw) {
        Ok(state) => state.to_string(),
        Err(error) => format!("Malformed ({raw:#018X}) - {error}"),
    }
}

fn access_context(error: &ZenStatesError) -> &'static str {
    match error {
        ZenStatesError::MSR(error) if error.is_permission_denied() => {
            "MSR registers are accessible by root only"
        }
        ZenStatesError::MSR(error) if error.is_device_unavailable() => {
            "MSR devices are missing, load the msr kernel module"
        }
        _ => "failed to access MSR registers",
    }
}
