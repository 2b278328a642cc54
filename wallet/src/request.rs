use crate::{file, get::KEYTAB_TYPE, Channel, Context, Result, Session, StdoutMode, WalletError};
use std::path::{Path, PathBuf};

const STDIN_NAME: &str = "-";

/// One client request, checked for option and argument combinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Get {
        r#type: String,
        name: String,
        file: Option<PathBuf>,
        srvtab: Option<PathBuf>,
    },
    Store {
        r#type: String,
        name: String,
        /// Data given as an argument; otherwise it is read from `file` or stdin
        data: Option<Vec<u8>>,
        file: Option<PathBuf>,
    },
    Rekey {
        file: PathBuf,
    },
    /// Any other command, sent as is with its output streamed
    Other { command: String, args: Vec<String> },
}

impl Request {
    pub fn parse(
        command: &str,
        args: &[String],
        file: Option<&Path>,
        srvtab: Option<&Path>,
    ) -> Result<Self> {
        let object_type = args.first().map(String::as_str);
        if srvtab.is_some() && (command != "get" || object_type != Some(KEYTAB_TYPE)) {
            return Err(usage("-S option only supported with get keytab"));
        }
        if file.is_some() && !matches!(command, "get" | "store" | "rekey") {
            return Err(usage("-f option only supported with get, store and rekey"));
        }

        let file = file.map(Path::to_owned);
        let request = match (command, args) {
            ("get", [r#type, name]) => Self::Get {
                r#type: r#type.clone(),
                name: name.clone(),
                file,
                srvtab: srvtab.map(Path::to_owned),
            },
            ("get", _) => return Err(usage("get requires a type and a name")),
            ("store", [r#type, name]) => Self::Store {
                r#type: r#type.clone(),
                name: name.clone(),
                data: None,
                file,
            },
            ("store", [r#type, name, data]) => Self::Store {
                r#type: r#type.clone(),
                name: name.clone(),
                data: Some(data.clone().into_bytes()),
                file,
            },
            ("store", _) => {
                return Err(usage("store requires a type, a name and optional data"));
            }
            ("rekey", []) => match file {
                Some(file) => Self::Rekey { file },
                None => return Err(usage("-f option required with rekey")),
            },
            ("rekey", _) => return Err(usage("rekey takes no arguments")),
            _ => Self::Other {
                command: command.to_owned(),
                args: args.to_vec(),
            },
        };
        Ok(request)
    }
}

fn usage(message: &str) -> WalletError {
    WalletError::Usage(message.to_owned())
}

impl<C: Channel> Session<C> {
    /// Runs a request and returns its exit status. A rekey in which any
    /// principal failed gives status 1.
    pub fn dispatch(&mut self, context: &Context, request: &Request) -> Result<i32> {
        match request {
            Request::Get {
                r#type,
                name,
                file,
                srvtab,
            } if r#type == KEYTAB_TYPE => {
                self.get_keytab(context, name, file.as_deref(), srvtab.as_deref())
            }
            Request::Get {
                r#type, name, file, ..
            } => self.get_file(r#type, name, file.as_deref()),
            Request::Store {
                r#type,
                name,
                data: Some(data),
                ..
            } => self.store(r#type, name, data),
            Request::Store {
                r#type,
                name,
                data: None,
                file,
            } => {
                let data = file::read_file(file.as_deref().unwrap_or(Path::new(STDIN_NAME)))?;
                self.store(r#type, name, &data)
            }
            Request::Rekey { file } => match self.rekey_keytab(context, file)? {
                true => Ok(0),
                false => Ok(1),
            },
            Request::Other { command, args } => {
                let prefix = self.prefix.clone();
                let mut argv = vec![prefix.as_str(), command.as_str()];
                argv.extend(args.iter().map(String::as_str));
                Ok(self.run_command(&argv, StdoutMode::Stream)?.status)
            }
        }
    }
}
