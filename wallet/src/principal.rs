use crate::{error::KRB5_CONFIG_NODEFREALM, error::KRB5_PARSE_MALFORMED, Flags, Result};

const REALM_SEP: u8 = b'@';
const COMPONENT_SEP: u8 = b'/';
const KRB5_TGS_NAME: &str = "krbtgt";
const KRB5_WELLKNOWN_NAMESTR: &str = "WELLKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub realm: Vec<u8>,
    pub components: Vec<Vec<u8>>,
    pub name_type: NameType,
}

macro_rules! principal_flag {
    ($name:ident, $value:expr) => {
        pub const $name: Flags = $value;
    };
}

impl Principal {
    principal_flag!(UNPARSE_NO_REALM, 0x2);

    /// Parses `name[/instance...][@REALM]`, filling in `default_realm` when
    /// the name carries no realm.
    pub fn parse_name(name: &str, default_realm: Option<&[u8]>) -> Result<Self> {
        if name.is_empty() || name.ends_with('\\') {
            Err(KRB5_PARSE_MALFORMED)?
        }
        let (components, realm) = match name.split_once('@') {
            None => (name, None),
            Some((components, realm)) => (components, Some(realm)),
        };

        let components: Vec<Vec<u8>> = components
            .split('/')
            .map(|c| c.as_bytes().to_owned())
            .collect();
        if components.iter().any(|c| c.is_empty()) {
            Err(KRB5_PARSE_MALFORMED)?
        }

        let realm = match realm {
            Some(realm) if realm.is_empty() || realm.contains(['/', '@']) => {
                Err(KRB5_PARSE_MALFORMED)?
            }
            Some(realm) => realm.as_bytes().to_owned(),
            None => default_realm
                .map(<[u8]>::to_vec)
                .ok_or(KRB5_CONFIG_NODEFREALM)?,
        };

        let name_type = Self::infer_principal_type(&components);
        Ok(Principal {
            realm,
            components,
            name_type,
        })
    }

    fn infer_principal_type(components: &[Vec<u8>]) -> NameType {
        if components.len() == 2 && components[0].eq(KRB5_TGS_NAME.as_bytes()) {
            NameType::SRV_INST
        } else if components.len() >= 2 && components[0].eq(KRB5_WELLKNOWN_NAMESTR.as_bytes()) {
            NameType::WELLKNOWN
        } else {
            NameType::PRINCIPAL
        }
    }

    pub fn unparse_name(&self, flags: Flags) -> Result<String> {
        let mut name = self.components.join(&COMPONENT_SEP);
        if flags & Self::UNPARSE_NO_REALM == 0 {
            name = [name, self.realm.clone()].join(&REALM_SEP);
        }
        String::from_utf8(name).map_err(|_| KRB5_PARSE_MALFORMED.into())
    }

    /// Compares names and realms, ignoring the name type which older keytab
    /// formats do not record.
    pub fn same_name(&self, other: &Self) -> bool {
        self.realm == other.realm && self.components == other.components
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameType(pub i32);

macro_rules! name_type {
    ($name_type:ident, $int:expr) => {
        pub const $name_type: NameType = NameType($int);
    };
}

impl NameType {
    // Name type not known
    name_type!(UNKNOWN, 0);
    // Just the name of the principal as in DCE, or for users
    name_type!(PRINCIPAL, 1);
    // Service and other unique instance (krbtgt)
    name_type!(SRV_INST, 2);
    // Well-known (special) principal
    name_type!(WELLKNOWN, 11);
}
