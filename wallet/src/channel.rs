//! The remote-command channel a wallet session talks through.
//!
//! A channel carries one command at a time: [`Channel::command`] submits it,
//! then [`Channel::output`] is called until it returns a terminal output
//! ([`Output::Status`], [`Output::Error`] or [`Output::Done`]).

mod memory;
mod process;

pub use self::memory::MemoryChannel;
pub use self::process::RemctlCommand;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout = 1,
    Stderr = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A chunk of the remote command's output
    Data { stream: Stream, data: Vec<u8> },
    /// The remote command exited with this status
    Status(i32),
    /// The server refused or failed to run the command
    Error(String),
    /// End of output from a server that reports no status
    Done,
}

impl Output {
    pub fn stdout(data: &[u8]) -> Self {
        Self::Data {
            stream: Stream::Stdout,
            data: data.to_vec(),
        }
    }

    pub fn stderr(data: &[u8]) -> Self {
        Self::Data {
            stream: Stream::Stderr,
            data: data.to_vec(),
        }
    }
}

/// Failure of the channel itself, as opposed to a failure reported by the
/// remote command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ChannelError(pub String);

pub trait Channel {
    fn command(&mut self, args: &[&[u8]]) -> Result<(), ChannelError>;

    fn output(&mut self) -> Result<Output, ChannelError>;
}
