// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::ErrorKind;
use crate::procs::Procs;
use crate::Error;

/// Serializes `procs` as YAML into `path`, replacing the file in full.
pub fn write_procs<P: AsRef<Path>>(path: P, procs: &Procs) -> Result<(), Error> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(procs).map_err(|e| ErrorKind::Write {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;

    fs::write(path, yaml).map_err(|source| ErrorKind::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), count = procs.len(), "wrote procs file");
    Ok(())
}

/// Reads the procs file at `path`.
///
/// A missing file is not an error, it yields an empty list. Unknown fields and
/// mistyped values are rejected, and the error carries the raw file contents.
pub fn read_procs<P: AsRef<Path>>(path: P) -> Result<Procs, Error> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no procs file, nothing to run");
            return Ok(Procs::new());
        }
        Err(source) => {
            return Err(ErrorKind::Load {
                path: path.to_path_buf(),
                source,
            }
            .into())
        }
    };

    let procs: Procs = serde_yaml::from_str(&contents).map_err(|source| ErrorKind::Parse {
        path: path.to_path_buf(),
        contents,
        source,
    })?;

    Ok(procs)
}
