// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Launch all processes of a web unit and report the first one to finish

use std::fmt;
use std::process::ExitStatus;

use futures::future::{self, FutureExt};
use futures::{pin_mut, select};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::ErrorKind;
use crate::fork::{self, StdIoConf};
use crate::procs::{Proc, Procs};
use crate::Error;

/// What a single supervised process reported when it finished
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    /// `None` when the process never started, or waiting on it failed
    pub status: Option<ExitStatus>,
    pub result: Result<(), Error>,
}

impl Outcome {
    fn not_started(name: String, err: Error) -> Self {
        Self {
            name,
            status: None,
            result: Err(err),
        }
    }

    fn exited(name: String, status: ExitStatus) -> Self {
        let result = if status.success() {
            Ok(())
        } else {
            Err(ErrorKind::Exited {
                name: name.clone(),
                status,
            }
            .into())
        };

        Self {
            name,
            status: Some(status),
            result,
        }
    }

    fn status_display(&self) -> StatusDisplay<'_> {
        StatusDisplay(self.status.as_ref())
    }
}

struct StatusDisplay<'a>(Option<&'a ExitStatus>);

impl fmt::Display for StatusDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "{}", status),
            None => f.write_str("not running"),
        }
    }
}

/// Launches every process at once, the first one to finish decides the result
///
/// Rules:
///   - no ordering between processes, none waits for another
///   - stdout and stderr of the children are the supervisor's own
///   - never restarts anything
///   - siblings of the first finished process keep running unless
///     `terminate_siblings` is set
#[derive(Clone, Copy, Debug, Default)]
pub struct Supervisor {
    terminate_siblings: bool,
}

impl Supervisor {
    pub fn new(terminate_siblings: bool) -> Self {
        Self { terminate_siblings }
    }

    pub fn terminate_siblings(&self) -> bool {
        self.terminate_siblings
    }

    /// Runs all `procs`, returning the error of the first process to finish.
    pub async fn run(&self, procs: &Procs) -> Result<(), Error> {
        self.race(procs).await?.result
    }

    /// Runs all `procs` and returns the outcome of the first process to finish.
    ///
    /// The `Err` case is reserved for failures of the supervisor itself, the
    /// winning process' own failure is in [`Outcome::result`].
    pub async fn race(&self, procs: &Procs) -> Result<Outcome, Error> {
        if procs.is_empty() {
            return Err(ErrorKind::NoProcesses.into());
        }

        let (outcome_tx, mut outcomes) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        for (name, proc) in procs {
            tokio::spawn(run_proc(
                name.clone(),
                proc.clone(),
                outcome_tx.clone(),
                stop_rx.clone(),
            ));
        }
        drop(outcome_tx);
        drop(stop_rx);

        let first = outcomes
            .recv()
            .await
            .ok_or("all processes finished without reporting")?;

        info!(
            proc_name = %first.name,
            status = %first.status_display(),
            "process {} exited, status: {}",
            first.name,
            first.status_display()
        );

        if self.terminate_siblings {
            warn!(proc_name = %first.name, "terminating remaining processes");
            // errors only when every sibling already finished
            let _ = stop_tx.send(true);

            while let Some(sibling) = outcomes.recv().await {
                debug!(
                    proc_name = %sibling.name,
                    status = %sibling.status_display(),
                    "sibling process finished"
                );
            }
        }

        Ok(first)
    }
}

async fn run_proc(
    name: String,
    proc: Proc,
    outcomes: mpsc::UnboundedSender<Outcome>,
    stop: watch::Receiver<bool>,
) {
    let outcome = supervise(name, &proc, stop).await;

    // nobody listens after the first outcome was taken
    let _ = outcomes.send(outcome);
}

async fn supervise(name: String, proc: &Proc, stop: watch::Receiver<bool>) -> Outcome {
    let mut child = match fork::new_process(&name, proc, StdIoConf::default()) {
        Ok(child) => child,
        Err(err) => return Outcome::not_started(name, err),
    };

    let exited = {
        let wait = child.wait().fuse();
        let stop = stop_requested(stop).fuse();
        pin_mut!(wait, stop);

        select! {
            status = wait => Some(status),
            () = stop => None,
        }
    };

    let status = match exited {
        Some(status) => status,
        None => {
            debug!(proc_name = %name, "sending SIGTERM");
            if let Err(err) = fork::terminate(&child) {
                warn!(proc_name = %name, "{}", err);
            }
            child.wait().await
        }
    };

    match status {
        Ok(status) => {
            debug!(proc_name = %name, %status, "process exited");
            Outcome::exited(name, status)
        }
        Err(source) => {
            let err = ErrorKind::Wait {
                name: name.clone(),
                source,
            };
            Outcome::not_started(name, err.into())
        }
    }
}

/// Resolves once the supervisor asks for shutdown, never if it drops the sender
async fn stop_requested(mut stop: watch::Receiver<bool>) {
    if stop.wait_for(|stop| *stop).await.is_err() {
        future::pending::<()>().await;
    }
}
