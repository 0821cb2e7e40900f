// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Launch a web unit's processes together and report the first one to exit

pub mod config;
mod error;
pub mod fork;
pub mod logging;
pub mod plan;
pub mod procs;
pub mod supervisor;

pub use error::{Error, ErrorKind};
pub use procs::{Proc, ProcMgr, Procs};
pub use supervisor::{Outcome, Supervisor};
