// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::path::PathBuf;
use std::process;

use clap::{App, Arg};

use procmgr::logging;
use procmgr::plan;
use procmgr::Procs;

const OUTPUT: &str = "output";
const WORKING_DIR: &str = "working-dir";

fn main() {
    logging::init_tracing(logging::DEFAULT_FILTER);

    let args = App::new("procplan")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Write the procs file for the web server and PHP-FPM chosen by the environment")
        .arg(
            Arg::with_name(OUTPUT)
                .value_name("PATH")
                .help("where to write the procs file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name(WORKING_DIR)
                .long(WORKING_DIR)
                .short("w")
                .value_name("DIR")
                .help("application directory, defaults to the current directory")
                .takes_value(true),
        )
        .get_matches();

    let output = args.value_of_os(OUTPUT).map(PathBuf::from).unwrap_or_default();
    let working_dir = match args.value_of_os(WORKING_DIR) {
        Some(dir) => PathBuf::from(dir),
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(err) => {
                eprintln!("failed to determine the working directory: {}", err);
                process::exit(2);
            }
        },
    };

    let mut procs = Procs::new();
    if let Err(err) = plan::plan_processes(
        |key| std::env::var(key).ok(),
        &working_dir,
        &output,
        &mut procs,
    ) {
        eprintln!("error planning procs: {}", err);
        process::exit(2);
    }
}
