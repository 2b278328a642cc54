mod krb5_error;

pub use self::krb5_error::*;

use crate::Enctype;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub type ErrorCode = i32;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug)]
pub struct Krb5Error {
    pub code: ErrorCode,
    pub message: &'static str,
}

impl std::fmt::Display for Krb5Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Krb5Error {}

macro_rules! error {
    ($error:ident, $code:expr, $message:expr) => {
        pub const $error: &Krb5Error = &Krb5Error {
            code: $code,
            message: $message,
        };
    };
}

pub(self) use error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Keytab,
    Config,
    Command,
    Srvtab,
    Usage,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("{} {}: {}", .action, .path.display(), .source)]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),

    #[error("{0}")]
    Krb5(&'static Krb5Error),

    #[error("principal {0} not found in keytab")]
    EntryNotFound(String),

    #[error("no {wanted} key for {principal} (found {found})")]
    UnsupportedEnctype {
        principal: String,
        wanted: Enctype,
        found: String,
    },

    #[error("{0}")]
    Srvtab(String),

    #[error("cannot write srvtab {}: {}", .path.display(), .source)]
    SrvtabFailed {
        path: PathBuf,
        #[source]
        source: Box<WalletError>,
    },

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Command(String),

    #[error("{0}")]
    Usage(String),
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::File { .. } | Self::Output(_) => ErrorKind::Io,
            Self::Krb5(_) | Self::EntryNotFound(_) => ErrorKind::Keytab,
            Self::UnsupportedEnctype { .. } | Self::Srvtab(_) | Self::SrvtabFailed { .. } => {
                ErrorKind::Srvtab
            }
            Self::Config(_) => ErrorKind::Config,
            Self::Command(_) => ErrorKind::Command,
            Self::Usage(_) => ErrorKind::Usage,
        }
    }

    pub(crate) fn file(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_owned();
        move |source| Self::File {
            action,
            path,
            source,
        }
    }
}

impl From<&'static Krb5Error> for WalletError {
    fn from(error: &'static Krb5Error) -> Self {
        Self::Krb5(error)
    }
}

impl From<config::ConfigError> for WalletError {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
