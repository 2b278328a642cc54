use crate::{Channel, Result, PROGNAME};
use std::{
    fmt,
    io::{self, Write},
};

/// One client invocation: the channel to the wallet server, the command
/// prefix sent with every wallet command, and the sinks that remote output
/// and diagnostics go to.
pub struct Session<C> {
    pub(crate) channel: C,
    pub(crate) prefix: String,
    pub(crate) out: Box<dyn Write>,
    pub(crate) err: Box<dyn Write>,
}

impl<C: Channel> Session<C> {
    pub fn new(channel: C, prefix: &str) -> Self {
        Self::with_streams(
            channel,
            prefix,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    pub fn with_streams(
        channel: C,
        prefix: &str,
        out: Box<dyn Write>,
        err: Box<dyn Write>,
    ) -> Self {
        Self {
            channel,
            prefix: prefix.to_owned(),
            out,
            err,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub(crate) fn warn(&mut self, message: fmt::Arguments) -> Result<()> {
        writeln!(self.err, "{}: {}", PROGNAME, message)?;
        Ok(())
    }
}
