use anyhow::anyhow;
use clap::{CommandFactory, Parser};
use once_cell::sync::Lazy;
use std::{io, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;
use wallet::{
    exit_status, prefix_progname_to_error_if_needed, Context, OptionOverrides, RemctlCommand,
    Request, Session, WalletError, PROGNAME,
};

static ARGS: Lazy<Args> = Lazy::new(Args::parse);

#[derive(Parser)]
#[command(name = PROGNAME, version)]
struct Args {
    /// command prefix to send instead of "wallet"
    #[arg(short = 'c')]
    command_type: Option<String>,
    /// file to write an object to, or read stored data from
    #[arg(short = 'f')]
    file: Option<PathBuf>,
    /// principal of the wallet server
    #[arg(short = 'k')]
    principal: Option<String>,
    /// port of the wallet server
    #[arg(short = 'p')]
    port: Option<u16>,
    /// (for get keytab) also write a srvtab to this file
    #[arg(short = 'S')]
    srvtab: Option<PathBuf>,
    /// wallet server to connect to
    #[arg(short = 's')]
    server: Option<String>,

    command: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    prefix_progname_to_error_if_needed(PROGNAME, run())
}

fn run() -> anyhow::Result<u8> {
    let request = match Request::parse(
        &ARGS.command,
        &ARGS.args,
        ARGS.file.as_deref(),
        ARGS.srvtab.as_deref(),
    ) {
        Ok(request) => request,
        Err(WalletError::Usage(message)) => return usage(&message),
        Err(e) => return Err(e.into()),
    };

    let context = Context::init().map_err(|e| anyhow!("{} while initializing krb5", e))?;
    let options = context.default_options().merge(OptionOverrides {
        r#type: ARGS.command_type.clone(),
        server: ARGS.server.clone(),
        port: ARGS.port,
        principal: ARGS.principal.clone(),
    });
    let server = options
        .server
        .as_deref()
        .ok_or_else(|| anyhow!("no server specified in krb5.conf or with -s"))?;

    let channel = RemctlCommand::new(server, options.port, options.principal.as_deref());
    let mut session = Session::new(channel, &options.r#type);
    let status = session.dispatch(&context, &request)?;
    Ok(exit_status(status))
}

fn usage(message: &str) -> anyhow::Result<u8> {
    Err(anyhow!("{}\n\n{}", message, Args::command().render_help()))
}
