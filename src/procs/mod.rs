// Copyright 2019 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The named table of processes launched together as one web unit

mod store;

pub use store::{read_procs, write_procs};

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A single process to run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proc {
    /// Executable name or path, resolved through `PATH` at spawn time
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Proc {
    pub fn new<C, I, A>(command: C, args: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The command line as it would be typed into a shell, for display only
    pub fn command_line(&self) -> String {
        let mut line = self.command.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// The list of process names and commands to run
///
/// Names are unique, adding a name twice replaces the earlier definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Procs {
    #[serde(default)]
    pub processes: BTreeMap<String, Proc>,
}

impl Procs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the process under `name`, returning any definition it replaced
    pub fn add<N: Into<String>>(&mut self, name: N, proc: Proc) -> Option<Proc> {
        self.processes.insert(name.into(), proc)
    }

    pub fn get(&self, name: &str) -> Option<&Proc> {
        self.processes.get(name)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Proc> {
        self.processes.iter()
    }

    /// Writes the list as YAML to `path`, replacing any existing file
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        write_procs(path, self)
    }

    /// See [`read_procs`]
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        read_procs(path)
    }
}

impl<'a> IntoIterator for &'a Procs {
    type Item = (&'a String, &'a Proc);
    type IntoIter = btree_map::Iter<'a, String, Proc>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Proc)> for Procs {
    fn from_iter<I: IntoIterator<Item = (N, Proc)>>(iter: I) -> Self {
        let mut procs = Self::new();
        for (name, proc) in iter {
            procs.add(name, proc);
        }
        procs
    }
}

/// Collects processes at build time and persists them for launch time
pub trait ProcMgr {
    fn add(&mut self, name: &str, proc: Proc);

    fn write_file(&self, path: &Path) -> Result<(), Error>;
}

impl ProcMgr for Procs {
    fn add(&mut self, name: &str, proc: Proc) {
        Procs::add(self, name, proc);
    }

    fn write_file(&self, path: &Path) -> Result<(), Error> {
        write_procs(path, self)
    }
}
