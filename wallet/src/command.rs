use crate::{
    channel::{Output, Stream},
    Channel, Result, Session, PROGNAME,
};
use std::io::Write;
use tracing::{debug, warn};

/// Exit status reported when the command never produced a status of its own.
pub const PROTOCOL_FAILURE: i32 = 255;

/// Narrows a command status to a process exit code. Statuses outside
/// 0..=255 become [`PROTOCOL_FAILURE`].
pub fn exit_status(status: i32) -> u8 {
    u8::try_from(status).unwrap_or(PROTOCOL_FAILURE as u8)
}

// Number of leading arguments safe to log; later ones may carry secrets.
const LOGGED_ARGS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    /// Hand standard output back to the caller
    Capture,
    /// Write standard output to the session's output sink as it arrives
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stdout {
    Captured(Vec<u8>),
    Streamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: i32,
    pub stdout: Stdout,
    /// Whether the command wrote anything to standard error
    pub stderr: bool,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Captured output, or `None` if output was streamed or empty.
    pub fn into_data(self) -> Option<Vec<u8>> {
        match self.stdout {
            Stdout::Captured(data) if !data.is_empty() => Some(data),
            _ => None,
        }
    }
}

impl<C: Channel> Session<C> {
    pub fn run_command<S: AsRef<str>>(
        &mut self,
        command: &[S],
        mode: StdoutMode,
    ) -> Result<CommandResult> {
        let command: Vec<&[u8]> = command.iter().map(|arg| arg.as_ref().as_bytes()).collect();
        self.run_commandv(&command, mode)
    }

    /// Runs a command whose arguments may be arbitrary bytes. Standard error
    /// from the server always goes to the error sink. Failures of the channel
    /// are reported there too and turned into [`PROTOCOL_FAILURE`].
    pub fn run_commandv<B: AsRef<[u8]>>(
        &mut self,
        command: &[B],
        mode: StdoutMode,
    ) -> Result<CommandResult> {
        let command: Vec<&[u8]> = command.iter().map(AsRef::as_ref).collect();
        let summary = command
            .iter()
            .take(LOGGED_ARGS)
            .map(|arg| String::from_utf8_lossy(arg))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(command = %summary, "sending command");

        let mut captured = vec![];
        let mut stderr = false;
        let status = match self.channel.command(&command) {
            Err(e) => {
                warn!(command = %summary, error = %e, "channel failure");
                writeln!(self.err, "{}: {}", PROGNAME, e)?;
                PROTOCOL_FAILURE
            }
            Ok(()) => loop {
                match self.channel.output() {
                    Ok(Output::Data {
                        stream: Stream::Stdout,
                        data,
                    }) => match mode {
                        StdoutMode::Capture => captured.extend_from_slice(&data),
                        StdoutMode::Stream => self.out.write_all(&data)?,
                    },
                    Ok(Output::Data {
                        stream: Stream::Stderr,
                        data,
                    }) => {
                        stderr = true;
                        write!(self.err, "{}: ", PROGNAME)?;
                        self.err.write_all(&data)?;
                    }
                    Ok(Output::Status(status)) => break status,
                    Ok(Output::Error(message)) => {
                        writeln!(self.err, "{}: {}", PROGNAME, message)?;
                        break PROTOCOL_FAILURE;
                    }
                    Ok(Output::Done) => break 0,
                    Err(e) => {
                        warn!(command = %summary, error = %e, "channel failure");
                        writeln!(self.err, "{}: {}", PROGNAME, e)?;
                        break PROTOCOL_FAILURE;
                    }
                }
            },
        };
        if mode == StdoutMode::Stream {
            self.out.flush()?;
        }
        self.err.flush()?;
        debug!(command = %summary, status, "command finished");

        let stdout = match mode {
            StdoutMode::Capture => Stdout::Captured(captured),
            StdoutMode::Stream => Stdout::Streamed,
        };
        Ok(CommandResult {
            status,
            stdout,
            stderr,
        })
    }
}
