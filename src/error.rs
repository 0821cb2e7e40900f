// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("failed to open procs file {}: {source}", path.display())]
    Load { path: PathBuf, source: io::Error },
    #[error("invalid procs file contents in {}:\n {contents:?}: {source}", path.display())]
    Parse {
        path: PathBuf,
        contents: String,
        source: serde_yaml::Error,
    },
    #[error("failed to write procs file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to start process {name}: {source}")]
    Spawn { name: String, source: io::Error },
    #[error("failed waiting on process {name}: {source}")]
    Wait { name: String, source: io::Error },
    #[error("process {name} exited unsuccessfully, {status}")]
    Exited { name: String, status: ExitStatus },
    #[error("no processes to run")]
    NoProcesses,
    #[error("{0}")]
    Plan(String),
    #[error("io error")]
    IoError(#[from] io::Error),
    #[error("an error occured: {0}")]
    ErrorMsg(String),
    #[error("an error occured: {0}")]
    ErrorStr(&'static str),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    fn from_kind(kind: ErrorKind) -> Self {
        Self(kind)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// The name of the supervised process this error belongs to, if any
    pub fn proc_name(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::Spawn { name, .. }
            | ErrorKind::Wait { name, .. }
            | ErrorKind::Exited { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<ErrorKind>,
{
    fn from(err: E) -> Self {
        Self::from_kind(err.into())
    }
}

impl From<&'static str> for Error {
    fn from(err: &'static str) -> Self {
        Self::from_kind(ErrorKind::ErrorStr(err))
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Self::from_kind(ErrorKind::ErrorMsg(err))
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::process::ExitStatusExt;

    use super::*;

    #[test]
    fn test_exited_names_process_and_status() {
        let err = Error::from(ErrorKind::Exited {
            name: "fpm".to_string(),
            status: ExitStatus::from_raw(1 << 8),
        });

        assert_eq!(err.proc_name(), Some("fpm"));
        let msg = err.to_string();
        assert!(msg.contains("fpm"), "{}", msg);
        assert!(msg.contains("exit status: 1"), "{}", msg);
    }

    #[test]
    fn test_string_conversions() {
        let err = Error::from("static");
        assert!(matches!(err.kind(), ErrorKind::ErrorStr("static")));

        let err = Error::from(format!("owned {}", 1));
        assert_eq!(err.to_string(), "an error occured: owned 1");
        assert!(err.proc_name().is_none());
    }
}
