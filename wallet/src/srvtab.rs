//! Conversion of a keytab entry into a Kerberos v4 srvtab.

use crate::{file, Context, Enctype, Keytab, Principal, Result, WalletError};
use std::path::Path;
use tracing::info;

const DES_KEY_LENGTH: usize = 8;
// ANAME_SZ, INST_SZ and REALM_SZ, counting the trailing NUL.
const V4_PART_SIZE: usize = 40;

struct ServiceConversion {
    v4_name: &'static str,
    v5_name: &'static str,
    host_instance: bool,
}

macro_rules! service {
    ($v4_name:expr, $v5_name:expr, $host_instance:expr) => {
        ServiceConversion {
            v4_name: $v4_name,
            v5_name: $v5_name,
            host_instance: $host_instance,
        }
    };
}

// Services whose instance is a fully-qualified hostname in v5 and a bare
// hostname in v4, plus the few that keep their instance as is.
const SERVICES: [ServiceConversion; 33] = [
    service!("kadmin", "kadmin", false),
    service!("rcmd", "host", true),
    service!("discuss", "discuss", true),
    service!("rvdsrv", "rvdsrv", true),
    service!("sample", "sample", true),
    service!("olc", "olc", true),
    service!("pop", "pop", true),
    service!("sis", "sis", true),
    service!("rfs", "rfs", true),
    service!("imap", "imap", true),
    service!("ftp", "ftp", true),
    service!("ecat", "ecat", true),
    service!("daemon", "daemon", true),
    service!("gnats", "gnats", true),
    service!("moira", "moira", true),
    service!("prms", "prms", true),
    service!("mandarin", "mandarin", true),
    service!("register", "register", true),
    service!("changepw", "changepw", true),
    service!("sms", "sms", true),
    service!("afpserver", "afpserver", true),
    service!("gdss", "gdss", true),
    service!("news", "news", true),
    service!("abs", "abs", true),
    service!("nfs", "nfs", true),
    service!("tftp", "tftp", true),
    service!("zephyr", "zephyr", false),
    service!("http", "http", true),
    service!("khttp", "khttp", true),
    service!("pgpsigner", "pgpsigner", true),
    service!("irc", "irc", true),
    service!("mandarin-agent", "mandarin-agent", true),
    service!("write", "write", true),
];

/// A Kerberos v4 principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V4Principal {
    pub name: Vec<u8>,
    pub instance: Vec<u8>,
    pub realm: Vec<u8>,
}

/// Writes a srvtab for `principal` at `srvtab`, taking the newest
/// `des-cbc-crc` key for it from the keytab at `keytab`.
pub fn write_srvtab(
    context: &Context,
    srvtab: &Path,
    principal: &str,
    keytab: &Path,
) -> Result<()> {
    let principal = Principal::parse_name(principal, context.default_realm())?;
    let keytab = Keytab::read(keytab)?;
    let unparsed = principal.unparse_name(0)?;
    if !keytab.has_principal(&principal) {
        return Err(WalletError::EntryNotFound(unparsed));
    }
    let entry = match keytab.find_entry(&principal, Enctype::DES_CBC_CRC) {
        Some(entry) => entry,
        None => {
            let mut found: Vec<String> = vec![];
            for entry in keytab.entries() {
                let enctype = entry.key.enctype.to_string();
                if entry.principal.same_name(&principal) && !found.contains(&enctype) {
                    found.push(enctype);
                }
            }
            return Err(WalletError::UnsupportedEnctype {
                principal: unparsed,
                wanted: Enctype::DES_CBC_CRC,
                found: found.join(", "),
            });
        }
    };
    if entry.key.contents.len() != DES_KEY_LENGTH {
        return Err(WalletError::Srvtab(format!(
            "invalid key length {} for {}",
            entry.key.contents.len(),
            unparsed
        )));
    }

    let v4 = convert_principal(&principal)?;
    let record = srvtab_record(&v4, entry.vno as u8, &entry.key.contents);
    file::write_file(srvtab, &record)?;
    info!(principal = %unparsed, kvno = entry.vno, srvtab = %srvtab.display(), "wrote srvtab");
    Ok(())
}

/// Maps a v5 principal to its v4 name, instance and realm.
pub fn convert_principal(principal: &Principal) -> Result<V4Principal> {
    let (name, instance) = match principal.components.as_slice() {
        [name] => (name.clone(), vec![]),
        [name, instance] => match SERVICES
            .iter()
            .find(|service| service.v5_name.as_bytes() == name.as_slice())
        {
            Some(service) => {
                let instance = if service.host_instance {
                    let host = instance.split(|b| *b == b'.').next();
                    host.unwrap_or_default().to_vec()
                } else {
                    instance.clone()
                };
                (service.v4_name.as_bytes().to_vec(), instance)
            }
            None => (name.clone(), instance.clone()),
        },
        _ => {
            return Err(WalletError::Srvtab(format!(
                "cannot convert {} to a v4 principal",
                principal.unparse_name(0)?
            )))
        }
    };
    let v4 = V4Principal {
        name,
        instance,
        realm: principal.realm.clone(),
    };
    for part in [&v4.name, &v4.instance, &v4.realm] {
        if part.len() >= V4_PART_SIZE {
            return Err(WalletError::Srvtab(format!(
                "{} is too long for a v4 principal",
                String::from_utf8_lossy(part)
            )));
        }
    }
    Ok(v4)
}

fn srvtab_record(principal: &V4Principal, kvno: u8, key: &[u8]) -> Vec<u8> {
    let mut record = vec![];
    for part in [&principal.name, &principal.instance, &principal.realm] {
        record.extend_from_slice(part);
        record.push(0);
    }
    record.push(kvno);
    record.extend_from_slice(key);
    record
}
