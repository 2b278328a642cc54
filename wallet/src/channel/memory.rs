use super::{Channel, ChannelError, Output};
use std::collections::{HashMap, VecDeque};

type Args = Vec<Vec<u8>>;

#[derive(Debug, Clone)]
enum Reply {
    Outputs(Vec<Result<Output, ChannelError>>),
    Refuse(String),
}

/// A channel answering from a fixed script, keyed by the exact argument
/// vector. Every submitted command is recorded. Unscripted commands get the
/// server's `Unknown command` error.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    replies: HashMap<Args, Reply>,
    commands: Vec<Args>,
    pending: VecDeque<Result<Output, ChannelError>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `command` with `outputs`, which should end with a terminal
    /// output.
    pub fn reply<S: AsRef<[u8]>>(mut self, command: &[S], outputs: Vec<Output>) -> Self {
        let outputs = outputs.into_iter().map(Ok).collect();
        self.replies.insert(to_args(command), Reply::Outputs(outputs));
        self
    }

    /// Answers `command` with optional stdout and an exit status.
    pub fn respond<S: AsRef<[u8]>>(self, command: &[S], status: i32, stdout: &[u8]) -> Self {
        let mut outputs = vec![];
        if !stdout.is_empty() {
            outputs.push(Output::stdout(stdout));
        }
        outputs.push(Output::Status(status));
        self.reply(command, outputs)
    }

    /// Makes submission of `command` fail at the channel level.
    pub fn refuse<S: AsRef<[u8]>>(mut self, command: &[S], message: &str) -> Self {
        self.replies
            .insert(to_args(command), Reply::Refuse(message.to_owned()));
        self
    }

    /// Delivers `outputs` for `command`, then fails the channel before any
    /// status arrives.
    pub fn break_after<S: AsRef<[u8]>>(
        mut self,
        command: &[S],
        outputs: Vec<Output>,
        message: &str,
    ) -> Self {
        let mut outputs: Vec<_> = outputs.into_iter().map(Ok).collect();
        outputs.push(Err(ChannelError(message.to_owned())));
        self.replies.insert(to_args(command), Reply::Outputs(outputs));
        self
    }

    pub fn commands(&self) -> &[Args] {
        &self.commands
    }

    /// Submitted commands as lossy strings joined by spaces.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|args| {
                args.iter()
                    .map(|arg| String::from_utf8_lossy(arg).into_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

fn to_args<S: AsRef<[u8]>>(command: &[S]) -> Args {
    command.iter().map(|arg| arg.as_ref().to_vec()).collect()
}

impl Channel for MemoryChannel {
    fn command(&mut self, args: &[&[u8]]) -> Result<(), ChannelError> {
        let args = to_args(args);
        self.commands.push(args.clone());
        self.pending.clear();
        match self.replies.get(&args) {
            Some(Reply::Refuse(message)) => Err(ChannelError(message.clone())),
            Some(Reply::Outputs(outputs)) => {
                self.pending.extend(outputs.iter().cloned());
                Ok(())
            }
            None => {
                self.pending
                    .push_back(Ok(Output::Error("Unknown command".to_owned())));
                Ok(())
            }
        }
    }

    fn output(&mut self) -> Result<Output, ChannelError> {
        self.pending
            .pop_front()
            .unwrap_or_else(|| Err(ChannelError("no command in progress".to_owned())))
    }
}
