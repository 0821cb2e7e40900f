// Copyright 2019 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::process;

use tokio::runtime;
use tracing::debug;

use procmgr::config::Config;
use procmgr::logging;
use procmgr::{Procs, Supervisor};

fn main() {
    logging::init_tracing(logging::DEFAULT_FILTER);

    // usage errors exit with 1, help and version with 0
    let config = Config::from_args(std::env::args_os(), |key| std::env::var(key).ok())
        .unwrap_or_else(|err| err.exit());

    let procs = match Procs::read_file(&config.procs_file) {
        Ok(procs) => procs,
        Err(err) => {
            eprintln!("error loading/parsing procs file: {}", err);
            process::exit(2);
        }
    };
    debug!(
        path = %config.procs_file.display(),
        count = procs.len(),
        terminate_siblings = config.terminate_siblings,
        "loaded procs file"
    );

    let runtime = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to initialize Tokio Runtime: {}", err);
            process::exit(2);
        }
    };

    let supervisor = Supervisor::new(config.terminate_siblings);
    if let Err(err) = runtime.block_on(supervisor.run(&procs)) {
        eprintln!("error running procs: {}", err);
        process::exit(2);
    }
}
