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

use std::path::PathBuf;

use clap::Parser;

use zenstates::LogicalCoreId;
use zenstates::MSRTarget;
use zenstates::PStateRequest;
use zenstates::PStateSlot;

#[derive(Parser, Debug)]
#[command(version, about = "Inspect and change P-states, C6 and boost of AMD Zen processors")]
pub(crate) struct Args {
    /// List all P-states, C6, boost and CPPC state
    #[arg(short, long)]
    pub(crate) list: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "list")]
    pub(crate) json: bool,

    /// P-state to show or change
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=7))]
    pub(crate) pstate: Option<u8>,

    /// Enable the P-state
    #[arg(long, requires = "pstate", overrides_with = "disable")]
    pub(crate) enable: bool,

    /// Disable the P-state
    #[arg(long, requires = "pstate", overrides_with = "enable")]
    pub(crate) disable: bool,

    /// New FID in hex
    #[arg(short, long, requires = "pstate", value_parser = parse_hex)]
    pub(crate) fid: Option<u32>,

    /// New DID in hex
    #[arg(short, long, requires = "pstate", value_parser = parse_hex)]
    pub(crate) did: Option<u32>,

    /// New VID in hex
    #[arg(short, long, requires = "pstate", value_parser = parse_hex)]
    pub(crate) vid: Option<u32>,

    /// Enable C6 state
    #[arg(long, conflicts_with = "c6_disable")]
    pub(crate) c6_enable: bool,

    /// Disable C6 state
    #[arg(long)]
    pub(crate) c6_disable: bool,

    /// Enable core performance boost
    #[arg(long, conflicts_with = "cpb_disable")]
    pub(crate) cpb_enable: bool,

    /// Disable core performance boost
    #[arg(long)]
    pub(crate) cpb_disable: bool,

    /// Core to read registers from and to write the P-state to
    #[arg(long)]
    pub(crate) core: Option<u32>,

    /// Write the P-state to every core
    #[arg(long, requires = "pstate")]
    pub(crate) all_cores: bool,

    /// Path to a TOML config
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

impl Args {
    pub(crate) fn is_actionable(&self) -> bool {
        self.list || self.pstate.is_some() || self.c6_switch().is_some() || self.cpb_switch().is_some()
    }

    pub(crate) fn read_core(&self) -> Option<LogicalCoreId> {
        self.core.map(LogicalCoreId::new)
    }

    pub(crate) fn c6_switch(&self) -> Option<bool> {
        switch(self.c6_enable, self.c6_disable)
    }

    pub(crate) fn cpb_switch(&self) -> Option<bool> {
        switch(self.cpb_enable, self.cpb_disable)
    }

    /// `None` when only the current state of the slot was asked for.
    pub(crate) fn pstate_request(&self, slot: PStateSlot) -> Option<PStateRequest> {
        let enabled = switch(self.enable, self.disable);
        if enabled.is_none() && self.fid.is_none() && self.did.is_none() && self.vid.is_none() {
            return None;
        }

        let mut request = PStateRequest::new(slot);
        request.enabled = enabled;
        request.fid = self.fid;
        request.did = self.did;
        request.vid = self.vid;
        if self.all_cores {
            request = request.target(MSRTarget::AllCores);
        }

        Some(request)
    }
}

fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u32::from_str_radix(digits, 16).map_err(|error| format!("{value:?} is not a hex number: {error}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use test_log::test;

    use zenstates::MSRTarget;
    use zenstates::PStateSlot;

    use super::parse_hex;
    use super::Args;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("zenstates").chain(args.iter().copied()))
    }

    #[test]
    fn hex_values() {
        assert_eq!(parse_hex("0x8C"), Ok(0x8C));
        assert_eq!(parse_hex("8c"), Ok(0x8C));
        assert_eq!(parse_hex("0X10"), Ok(0x10));
        assert!(parse_hex("0xZZ").is_err());
        assert!(parse_hex("").is_err());
    }

    #[test]
    fn last_enable_flag_wins() {
        let args = parse(&["-p", "1", "--enable", "--disable"]).unwrap();
        let request = args.pstate_request(PStateSlot::new(1).unwrap()).unwrap();
        assert_eq!(request.enabled, Some(false));

        let args = parse(&["-p", "1", "--disable", "--enable"]).unwrap();
        let request = args.pstate_request(PStateSlot::new(1).unwrap()).unwrap();
        assert_eq!(request.enabled, Some(true));
    }

    #[test]
    fn pstate_request_from_flags() {
        let args = parse(&["-p", "0", "-f", "0x8C", "-v", "30", "--all-cores"]).unwrap();
        let request = args.pstate_request(PStateSlot::new(0).unwrap()).unwrap();

        assert_eq!(request.fid, Some(0x8C));
        assert_eq!(request.did, None);
        assert_eq!(request.vid, Some(0x30));
        assert_eq!(request.target, Some(MSRTarget::AllCores));
    }

    #[test]
    fn pstate_without_changes_is_a_query() {
        let args = parse(&["-p", "2"]).unwrap();

        assert!(args.is_actionable());
        assert!(args.pstate_request(PStateSlot::new(2).unwrap()).is_none());
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        assert!(parse(&["-p", "8"]).is_err());
        assert!(parse(&["-f", "10"]).is_err());
        assert!(parse(&["--c6-enable", "--c6-disable"]).is_err());
        assert!(parse(&["--cpb-enable", "--cpb-disable"]).is_err());
        assert!(parse(&["--json"]).is_err());
    }

    #[test]
    fn nothing_to_do() {
        let args = parse(&["--core", "3"]).unwrap();

        assert!(!args.is_actionable());
        assert_eq!(args.read_core(), Some(zenstates::LogicalCoreId::new(3)));
    }
}
