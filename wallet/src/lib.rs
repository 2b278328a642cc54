pub mod channel;
mod command;
pub mod context;
pub mod enctype;
pub mod error;
pub mod file;
mod get;
pub mod keytab;
mod object;
pub mod principal;
mod rekey;
mod request;
mod session;
pub mod srvtab;

pub use channel::{Channel, ChannelError, MemoryChannel, Output, RemctlCommand, Stream};
pub use command::{exit_status, CommandResult, Stdout, StdoutMode, PROTOCOL_FAILURE};
pub use context::{Context, OptionOverrides, Options, Profile};
pub use enctype::{Enctype, Keyblock};
pub use error::{ErrorKind, Result, WalletError};
pub use keytab::{Keytab, KeytabEntry};
pub use principal::{NameType, Principal};
pub use request::Request;
pub use session::Session;

use std::process::ExitCode;

pub const PROGNAME: &str = "wallet";

pub type Flags = i32;
pub type Timestamp = u32;

/// Turns the outcome of a command-line driver into its exit code. Usage text
/// is printed as is; any other error is prefixed with the program name.
pub fn prefix_progname_to_error_if_needed(
    progname: &str,
    result: anyhow::Result<u8>,
) -> ExitCode {
    match result {
        Ok(status) => ExitCode::from(status),
        Err(err) if err.to_string().trim_start().starts_with("Usage:") => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{}: {:#}", progname, err);
            ExitCode::FAILURE
        }
    }
}
