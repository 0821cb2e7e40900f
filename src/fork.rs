// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::ErrorKind;
use crate::procs::Proc;
use crate::Error;

pub struct StdIoConf {
    pub stdin: Stdio,
    pub stderr: Stdio,
    pub stdout: Stdio,
}

impl Default for StdIoConf {
    /// Children write straight to the supervisor's own stdout and stderr
    fn default() -> Self {
        StdIoConf {
            stdin: Stdio::null(),
            stderr: Stdio::inherit(),
            stdout: Stdio::inherit(),
        }
    }
}

/// Starts `proc` as a child process.
///
/// The child is not killed when the handle is dropped, it outlives the
/// supervisor unless something terminates it explicitly.
pub fn new_process(name: &str, proc: &Proc, stdio: StdIoConf) -> Result<Child, Error> {
    let child = Command::new(&proc.command)
        .args(&proc.args)
        .kill_on_drop(false)
        .stdin(stdio.stdin)
        .stdout(stdio.stdout)
        .stderr(stdio.stderr)
        .spawn()
        .map_err(|source| ErrorKind::Spawn {
            name: name.to_string(),
            source,
        })?;

    debug!(proc_name = name, pid = ?child.id(), command = %proc.command_line(), "started process");
    Ok(child)
}

/// Asks a running child to shut down with SIGTERM.
///
/// Children that were already reaped have no pid, for those this is a noop.
pub fn terminate(child: &Child) -> Result<(), Error> {
    let pid = match child.id() {
        Some(pid) => pid,
        None => return Ok(()),
    };

    let pid = i32::try_from(pid).map_err(|_| format!("pid out of range: {}", pid))?;
    kill(Pid::from_raw(pid), Signal::SIGTERM)
        .map_err(|e| format!("failed to signal pid {}: {}", pid, e))?;
    Ok(())
}
