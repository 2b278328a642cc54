use crate::{file, Channel, Context, Keytab, Principal, Result, Session, StdoutMode};
use std::path::Path;
use tracing::{debug, info};

impl<C: Channel> Session<C> {
    /// Fetches fresh keys for every local-realm principal in the keytab at
    /// `file` and appends them after the existing entries, which stay in
    /// place so that old tickets keep working.
    ///
    /// A principal whose fetch fails is reported and skipped. The file is
    /// rewritten if any principal succeeded. Returns true only if all of
    /// them did.
    pub fn rekey_keytab(&mut self, context: &Context, file: &Path) -> Result<bool> {
        let original = file::read_file(file)?;
        let keytab = Keytab::parse(&original)?;
        if keytab.entries().is_empty() {
            return Ok(true);
        }

        let realm = context.get_default_realm()?;
        let principals = keytab
            .principals_in_realm(realm)
            .into_iter()
            .map(|principal| principal.unparse_name(Principal::UNPARSE_NO_REALM))
            .collect::<Result<Vec<_>>>()?;
        if principals.is_empty() {
            info!(file = %file.display(), "no principals in the local realm");
            return Ok(true);
        }

        let mut data = original[..keytab.end()].to_vec();
        let mut rekeyed = 0;
        let mut failed = 0;
        for principal in &principals {
            match self.fetch_keytab(principal)? {
                Some(new_keys) => {
                    let entries = new_keys.entries().len();
                    debug!(principal = %principal, entries, "rekeyed");
                    data.extend(keytab.encode_entries(new_keys.entries())?);
                    rekeyed += 1;
                }
                None => {
                    self.warn(format_args!("error rekeying for principal {}", principal))?;
                    failed += 1;
                }
            }
        }

        if rekeyed > 0 {
            file::write_file(file, &data)?;
        }
        info!(file = %file.display(), rekeyed, failed, "rekey finished");
        Ok(failed == 0)
    }

    fn fetch_keytab(&mut self, principal: &str) -> Result<Option<Keytab>> {
        let prefix = self.prefix.clone();
        let result = self.run_command(
            &[prefix.as_str(), "get", "keytab", principal],
            StdoutMode::Capture,
        )?;
        if !result.success() {
            return Ok(None);
        }
        let data = match result.into_data() {
            Some(data) => data,
            None => {
                self.warn(format_args!("no data returned by wallet server"))?;
                return Ok(None);
            }
        };
        match Keytab::parse(&data) {
            Ok(keytab) if !keytab.entries().is_empty() => Ok(Some(keytab)),
            Ok(_) => {
                self.warn(format_args!("empty keytab returned for {}", principal))?;
                Ok(None)
            }
            Err(e) => {
                self.warn(format_args!("invalid keytab returned for {}: {}", principal, e))?;
                Ok(None)
            }
        }
    }
}
