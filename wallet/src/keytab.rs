mod file_data;
mod keytab_entry;

pub use self::file_data::FileFormatVersion;
pub use self::keytab_entry::{KeytabEntry, Kvno};
use crate::{file, Enctype, Principal, Result};
use std::path::Path;

/// An in-memory FILE keytab.
#[derive(Debug, Clone)]
pub struct Keytab {
    version: FileFormatVersion,
    entries: Vec<KeytabEntry>,
    end: usize,
}

impl Keytab {
    pub fn new(version: FileFormatVersion) -> Self {
        Self {
            version,
            entries: vec![],
            end: 2,
        }
    }

    /// Parses keytab file contents. An empty buffer is an empty keytab, as it
    /// is for the krb5 library.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self {
                version: FileFormatVersion::V2,
                entries: vec![],
                end: 0,
            });
        }
        let records = file_data::read_records(data)?;
        Ok(Self {
            version: records.version,
            entries: records.entries,
            end: records.end,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        Self::parse(&file::read_file(path)?)
    }

    pub fn version(&self) -> FileFormatVersion {
        self.version
    }

    pub fn entries(&self) -> &[KeytabEntry] {
        &self.entries
    }

    /// Offset just past the last record of the parsed data.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn add_entry(&mut self, entry: KeytabEntry) {
        self.entries.push(entry);
    }

    /// Distinct principals of `realm`, in the order they first appear.
    pub fn principals_in_realm(&self, realm: &[u8]) -> Vec<&Principal> {
        let mut principals: Vec<&Principal> = vec![];
        for entry in &self.entries {
            let principal = &entry.principal;
            if principal.realm == realm && !principals.iter().any(|p| p.same_name(principal)) {
                principals.push(principal);
            }
        }
        principals
    }

    /// The entry with the highest key version for `principal` and `enctype`.
    pub fn find_entry(&self, principal: &Principal, enctype: Enctype) -> Option<&KeytabEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.principal.same_name(principal) && entry.key.enctype == enctype)
            .max_by_key(|entry| entry.vno)
    }

    pub fn has_principal(&self, principal: &Principal) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.principal.same_name(principal))
    }

    /// Encodes `entries` as records of this keytab's format version, ready to
    /// be appended after [`Keytab::end`].
    pub fn encode_entries<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a KeytabEntry>,
    ) -> Result<Vec<u8>> {
        let mut buf = vec![];
        for entry in entries {
            file_data::write_entry(&mut buf, entry, self.version)?;
        }
        Ok(buf)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        file_data::write_header(&mut buf, self.version);
        buf.extend(self.encode_entries(&self.entries)?);
        Ok(buf)
    }
}
