// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Decide which processes make up the web unit
//!
//! This runs at build time, reads its inputs from environment variables and
//! hands the chosen commands to a [`ProcMgr`]. It never starts anything.

use std::path::Path;

use tracing::info;

use crate::config::parse_bool;
use crate::error::ErrorKind;
use crate::procs::{Proc, ProcMgr};
use crate::Error;

pub const HTTPD_PATH: &str = "PHP_HTTPD_PATH";
pub const NGINX_PATH: &str = "PHP_NGINX_PATH";
pub const FPM_PATH: &str = "PHP_FPM_PATH";
pub const PHPRC: &str = "PHPRC";
pub const LIVE_RELOAD: &str = "BP_LIVE_RELOAD_ENABLED";

const RELOADER: &str = "watchexec";

/// The web server fronting FPM
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Server {
    Httpd { conf: String },
    Nginx { conf: String },
}

impl Server {
    pub fn proc_name(&self) -> &'static str {
        match self {
            Server::Httpd { .. } => "httpd",
            Server::Nginx { .. } => "nginx",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Server::Httpd { .. } => "HTTPD",
            Server::Nginx { .. } => "Nginx",
        }
    }

    fn to_proc(&self, working_dir: &Path) -> Proc {
        match self {
            Server::Httpd { conf } => Proc::new(
                "httpd",
                vec!["-f", conf.as_str(), "-k", "start", "-DFOREGROUND"],
            ),
            Server::Nginx { conf } => {
                let prefix = working_dir.display().to_string();
                Proc::new("nginx", vec!["-p", prefix.as_str(), "-c", conf.as_str()])
            }
        }
    }

    /// The config directory whose changes should reload the server, if any
    fn reload_dir(&self, working_dir: &Path) -> Option<String> {
        match self {
            Server::Httpd { .. } => None,
            Server::Nginx { .. } => Some(working_dir.join(".nginx.conf.d").display().to_string()),
        }
    }
}

/// Inputs for building the process list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub server: Server,
    pub fpm_conf: String,
    pub phprc: String,
    pub live_reload: bool,
}

impl Plan {
    /// Reads the plan through `lookup`, usually `std::env::var`.
    ///
    /// Set but empty variables count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let server = match (get(HTTPD_PATH), get(NGINX_PATH)) {
            (Some(conf), None) => Server::Httpd { conf },
            (None, Some(conf)) => Server::Nginx { conf },
            _ => {
                return Err(ErrorKind::Plan(format!(
                    "need exactly one of: ${} or ${}",
                    HTTPD_PATH, NGINX_PATH
                ))
                .into())
            }
        };

        let fpm_conf = get(FPM_PATH)
            .ok_or_else(|| ErrorKind::Plan(format!("failed to lookup ${}", FPM_PATH)))?;
        let phprc = get(PHPRC)
            .ok_or_else(|| ErrorKind::Plan(format!("failed to lookup ${} path for FPM", PHPRC)))?;

        let live_reload = match get(LIVE_RELOAD) {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ErrorKind::Plan(format!("invalid ${} value: {:?}", LIVE_RELOAD, value))
            })?,
            None => false,
        };

        Ok(Self {
            server,
            fpm_conf,
            phprc,
            live_reload,
        })
    }

    /// Adds the server and FPM processes to `procs`
    pub fn apply<M: ProcMgr>(&self, working_dir: &Path, procs: &mut M) {
        info!("Determining start commands to include in procs.yml:");

        let mut server = self.server.to_proc(working_dir);
        if self.live_reload {
            if let Some(dir) = self.server.reload_dir(working_dir) {
                server = reloadable(&dir, server);
            }
        }
        info!("{}: {}", self.server.label(), server.command_line());
        procs.add(self.server.proc_name(), server);

        let mut fpm = Proc::new("php-fpm", vec!["-y", self.fpm_conf.as_str(), "-c", self.phprc.as_str()]);
        if self.live_reload {
            let dir = working_dir.join(".php.fpm.d").display().to_string();
            fpm = reloadable(&dir, fpm);
        }
        info!("FPM: {}", fpm.command_line());
        procs.add("fpm", fpm);
    }
}

/// Wraps `proc` so it receives SIGHUP whenever something under `dir` changes
fn reloadable(dir: &str, proc: Proc) -> Proc {
    let mut args: Vec<String> = vec![
        "--watch",
        dir,
        "--on-busy-update",
        "signal",
        "--signal",
        "SIGHUP",
        "--",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.push(proc.command);
    args.extend(proc.args);

    Proc::new(RELOADER, args)
}

/// Builds the process list from `lookup` and writes it to `path`
pub fn plan_processes<F, M>(
    lookup: F,
    working_dir: &Path,
    path: &Path,
    procs: &mut M,
) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
    M: ProcMgr,
{
    let plan = Plan::from_lookup(lookup)?;
    plan.apply(working_dir, procs);
    procs.write_file(path)
}
