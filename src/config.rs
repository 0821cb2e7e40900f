// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{App, Arg, ArgMatches};

pub const PROCS_FILE: &str = "procs-file";
pub const TERMINATE_SIBLINGS: &str = "terminate-siblings";
pub const TERMINATE_SIBLINGS_ENV: &str = "PROCMGR_TERMINATE_SIBLINGS";

/// Launch time settings of `procmgr`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub procs_file: PathBuf,
    pub terminate_siblings: bool,
}

impl Config {
    pub fn app() -> App<'static, 'static> {
        App::new("procmgr")
            .version(env!("CARGO_PKG_VERSION"))
            .author(env!("CARGO_PKG_AUTHORS"))
            .about(env!("CARGO_PKG_DESCRIPTION"))
            .arg(
                Arg::with_name(PROCS_FILE)
                    .value_name("PATH")
                    .help("path to the procs file listing the processes to run")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name(TERMINATE_SIBLINGS)
                    .long(TERMINATE_SIBLINGS)
                    .help(
                        "send SIGTERM to the remaining processes once the first one exits \
                         (also PROCMGR_TERMINATE_SIBLINGS=true)",
                    ),
            )
    }

    /// Parses `args`, `env` supplies environment lookups
    pub fn from_args<I, T, F>(args: I, env: F) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: Fn(&str) -> Option<String>,
    {
        let matches = Self::app().get_matches_from_safe(args)?;
        Ok(Self::from_matches(&matches, env))
    }

    pub fn from_matches<F>(matches: &ArgMatches<'_>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let procs_file = matches
            .value_of_os(PROCS_FILE)
            .map(PathBuf::from)
            .unwrap_or_default();

        let terminate_siblings = matches.is_present(TERMINATE_SIBLINGS)
            || env(TERMINATE_SIBLINGS_ENV)
                .and_then(|value| parse_bool(&value))
                .unwrap_or(false);

        Self {
            procs_file,
            terminate_siblings,
        }
    }
}

/// Lenient boolean parsing for environment switches
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
