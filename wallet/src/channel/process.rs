use super::{Channel, ChannelError, Output};
use std::{
    collections::VecDeque,
    ffi::OsStr,
    os::unix::ffi::OsStrExt,
    path::PathBuf,
    process::{Command, Stdio},
};
use tracing::debug;

const REMCTL_PROGRAM: &str = "remctl";
// The client reports its own failures (connect, authentication, protocol)
// with this prefix and exits non-zero.
const CLIENT_DIAGNOSTIC_PREFIX: &[u8] = b"remctl: ";

/// Runs each command through the `remctl` client program, which handles
/// GSS-API authentication with the caller's existing ticket cache.
///
/// Arguments travel on the client's command line, so they cannot contain NUL
/// bytes. Such commands fail at the channel level without running the client.
#[derive(Debug)]
pub struct RemctlCommand {
    program: PathBuf,
    server: String,
    port: u16,
    principal: Option<String>,
    pending: VecDeque<Result<Output, ChannelError>>,
}

impl RemctlCommand {
    pub fn new(server: &str, port: u16, principal: Option<&str>) -> Self {
        Self {
            program: PathBuf::from(REMCTL_PROGRAM),
            server: server.to_owned(),
            port,
            principal: principal.map(str::to_owned),
            pending: VecDeque::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn build(&self, args: &[&[u8]]) -> Command {
        let mut command = Command::new(&self.program);
        if self.port != 0 {
            command.arg("-p").arg(self.port.to_string());
        }
        if let Some(principal) = &self.principal {
            command.arg("-s").arg(principal);
        }
        command.arg("--").arg(&self.server);
        command.args(args.iter().map(|arg| OsStr::from_bytes(arg)));
        command.stdin(Stdio::null());
        command
    }
}

impl Channel for RemctlCommand {
    fn command(&mut self, args: &[&[u8]]) -> Result<(), ChannelError> {
        self.pending.clear();
        if args.iter().any(|arg| arg.contains(&0)) {
            return Err(ChannelError(
                "remctl client cannot send arguments containing NUL bytes".to_owned(),
            ));
        }
        let output = self.build(args).output().map_err(|e| {
            ChannelError(format!("cannot run {}: {}", self.program.display(), e))
        })?;
        debug!(status = ?output.status, "remctl finished");
        if !output.stdout.is_empty() {
            self.pending.push_back(Ok(Output::stdout(&output.stdout)));
        }
        let client_failure =
            !output.status.success() && output.stderr.starts_with(CLIENT_DIAGNOSTIC_PREFIX);
        if client_failure {
            let message = String::from_utf8_lossy(&output.stderr);
            self.pending
                .push_back(Err(ChannelError(message.trim_end().to_owned())));
            return Ok(());
        }
        if !output.stderr.is_empty() {
            self.pending.push_back(Ok(Output::stderr(&output.stderr)));
        }
        self.pending.push_back(match output.status.code() {
            Some(code) => Ok(Output::Status(code)),
            None => Err(ChannelError(format!(
                "{} terminated by signal",
                self.program.display()
            ))),
        });
        Ok(())
    }

    fn output(&mut self) -> Result<Output, ChannelError> {
        self.pending
            .pop_front()
            .unwrap_or_else(|| Err(ChannelError("no command in progress".to_owned())))
    }
}
