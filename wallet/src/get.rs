use crate::{
    file, srvtab, Channel, Context, Result, Session, StdoutMode, WalletError, PROTOCOL_FAILURE,
};
use std::{io::Write, path::Path};
use tracing::info;

pub(crate) const KEYTAB_TYPE: &str = "keytab";

impl<C: Channel> Session<C> {
    /// Retrieves any object, creating it first if necessary, and writes it
    /// atomically to `file` or to the output sink. Returns the exit status.
    pub fn get_file(&mut self, r#type: &str, name: &str, file: Option<&Path>) -> Result<i32> {
        self.ensure_object(r#type, name)?;
        self.download(r#type, name, file)
    }

    /// Retrieves a keytab, creating the object first if necessary. With a
    /// srvtab path, also derives a srvtab from the newly written keytab; if
    /// that fails the keytab stays written and a `SrvtabFailed` error is
    /// returned.
    pub fn get_keytab(
        &mut self,
        context: &Context,
        name: &str,
        file: Option<&Path>,
        srvtab: Option<&Path>,
    ) -> Result<i32> {
        if srvtab.is_some() && file.is_none() {
            self.warn(format_args!("-S option requires -f also be used"))?;
            return Ok(1);
        }
        self.ensure_object(KEYTAB_TYPE, name)?;
        let status = self.download(KEYTAB_TYPE, name, file)?;
        if status != 0 {
            return Ok(status);
        }
        if let (Some(srvtab), Some(file)) = (srvtab, file) {
            srvtab::write_srvtab(context, srvtab, name, file).map_err(|e| {
                WalletError::SrvtabFailed {
                    path: srvtab.to_owned(),
                    source: Box::new(e),
                }
            })?;
        }
        Ok(0)
    }

    /// Sends `data` to be stored in an object, creating it first if
    /// necessary.
    pub fn store(&mut self, r#type: &str, name: &str, data: &[u8]) -> Result<i32> {
        self.ensure_object(r#type, name)?;
        let prefix = self.prefix.clone();
        let command: [&[u8]; 5] = [
            prefix.as_bytes(),
            b"store",
            r#type.as_bytes(),
            name.as_bytes(),
            data,
        ];
        Ok(self.run_commandv(&command, StdoutMode::Stream)?.status)
    }

    fn download(&mut self, r#type: &str, name: &str, file: Option<&Path>) -> Result<i32> {
        let prefix = self.prefix.clone();
        let result = self.run_command(
            &[prefix.as_str(), "get", r#type, name],
            StdoutMode::Capture,
        )?;
        if !result.success() {
            return Ok(result.status);
        }
        let data = match result.into_data() {
            Some(data) => data,
            None => {
                self.warn(format_args!("no data returned by wallet server"))?;
                return Ok(PROTOCOL_FAILURE);
            }
        };
        match file {
            Some(file) => {
                file::write_file(file, &data)?;
                info!(object_type = r#type, name, file = %file.display(), "wrote object");
            }
            None => {
                self.out.write_all(&data)?;
                self.out.flush()?;
            }
        }
        Ok(0)
    }
}
