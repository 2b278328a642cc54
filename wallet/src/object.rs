use crate::{Channel, Result, Session, Stdout, StdoutMode, WalletError};

// The check command prints exactly this for an existing object.
const EXISTS_OUTPUT: &[u8] = b"yes\n";

impl<C: Channel> Session<C> {
    /// Asks the server whether an object exists. Anything but a zero status
    /// is an error, since the server answers "no" with status 0.
    pub fn object_exists(&mut self, r#type: &str, name: &str) -> Result<bool> {
        let prefix = self.prefix.clone();
        let result = self.run_command(
            &[prefix.as_str(), "check", r#type, name],
            StdoutMode::Capture,
        )?;
        if !result.success() {
            return Err(WalletError::Command(format!(
                "cannot check for {} {} (status {})",
                r#type, name, result.status
            )));
        }
        Ok(matches!(result.stdout, Stdout::Captured(data) if data == EXISTS_OUTPUT))
    }

    pub fn object_autocreate(&mut self, r#type: &str, name: &str) -> Result<()> {
        let prefix = self.prefix.clone();
        let result = self.run_command(
            &[prefix.as_str(), "autocreate", r#type, name],
            StdoutMode::Stream,
        )?;
        if !result.success() {
            return Err(WalletError::Command(format!(
                "cannot create {} {} (status {})",
                r#type, name, result.status
            )));
        }
        Ok(())
    }

    /// Creates the object if the server does not have it yet.
    pub fn ensure_object(&mut self, r#type: &str, name: &str) -> Result<()> {
        if !self.object_exists(r#type, name)? {
            self.object_autocreate(r#type, name)?;
        }
        Ok(())
    }
}
