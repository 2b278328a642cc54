mod profile;

pub use self::profile::Profile;
use crate::{error::KRB5_CONFIG_NODEFREALM, Result};

const DEFAULT_WALLET_TYPE: &str = "wallet";

pub struct Conf;

macro_rules! conf {
    ($name:ident, $value:expr) => {
        pub const $name: &'static str = $value;
    };
}

impl Conf {
    conf!(APPDEFAULTS, "appdefaults");
    conf!(DEFAULT_REALM, "default_realm");
    conf!(LIBDEFAULTS, "libdefaults");
    conf!(WALLET_PORT, "wallet_port");
    conf!(WALLET_PRINCIPAL, "wallet_principal");
    conf!(WALLET_SERVER, "wallet_server");
    conf!(WALLET_TYPE, "wallet_type");
}

/// Options controlling how to reach the wallet server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Command prefix sent as the first argument of every wallet command
    pub r#type: String,
    pub server: Option<String>,
    /// 0 means the remctl default port
    pub port: u16,
    /// Principal of the wallet server, when it is not host/<server>
    pub principal: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            r#type: DEFAULT_WALLET_TYPE.to_owned(),
            server: None,
            port: 0,
            principal: None,
        }
    }
}

impl Options {
    /// Applies values given on the command line over these options.
    pub fn merge(self, overrides: OptionOverrides) -> Self {
        Self {
            r#type: overrides.r#type.unwrap_or(self.r#type),
            server: overrides.server.or(self.server),
            port: overrides.port.unwrap_or(self.port),
            principal: overrides.principal.or(self.principal),
        }
    }
}

/// Options set explicitly by the caller; `None` keeps the profile value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub r#type: Option<String>,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub principal: Option<String>,
}

#[derive(Debug)]
pub struct Context {
    pub profile: Profile,
    default_realm: Option<Vec<u8>>,
}

impl Context {
    pub fn init() -> Result<Self> {
        Ok(Self::with_profile(Profile::new()?))
    }

    pub fn with_profile(profile: Profile) -> Self {
        let default_realm = Self::get_string(&profile, Conf::LIBDEFAULTS, Conf::DEFAULT_REALM)
            .map(String::into_bytes);
        Self {
            profile,
            default_realm,
        }
    }

    fn get_string(profile: &Profile, section: &str, name: &str) -> Option<String> {
        profile
            .get_string(&format!("{}.{}", section, name))
            .filter(|value| !value.is_empty())
    }

    fn get_int(profile: &Profile, section: &str, name: &str) -> Option<i64> {
        profile.get_int(&format!("{}.{}", section, name))
    }

    /// Wallet options from the `appdefaults` section, falling back to
    /// built-in defaults.
    pub fn default_options(&self) -> Options {
        let defaults = Options::default();
        let port = Self::get_int(&self.profile, Conf::APPDEFAULTS, Conf::WALLET_PORT)
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(defaults.port);
        Options {
            r#type: Self::get_string(&self.profile, Conf::APPDEFAULTS, Conf::WALLET_TYPE)
                .unwrap_or(defaults.r#type),
            server: Self::get_string(&self.profile, Conf::APPDEFAULTS, Conf::WALLET_SERVER),
            port,
            principal: Self::get_string(&self.profile, Conf::APPDEFAULTS, Conf::WALLET_PRINCIPAL),
        }
    }

    pub fn set_default_realm(&mut self, realm: &str) {
        self.default_realm = Some(realm.as_bytes().to_owned());
    }

    pub fn default_realm(&self) -> Option<&[u8]> {
        self.default_realm.as_deref()
    }

    pub fn get_default_realm(&self) -> Result<&[u8]> {
        Ok(self.default_realm().ok_or(KRB5_CONFIG_NODEFREALM)?)
    }
}
