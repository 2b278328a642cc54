use crate::Result;
use config::{Config, File, FileFormat};
use std::env;
use tracing::debug;

const DEFAULT_PROFILE_PATH: &str = "/etc/krb5.conf";

#[derive(Debug, Default)]
pub struct Profile {
    files: Vec<ProfileFile>,
}

macro_rules! get_value {
    ($fn:ident, $type:ident) => {
        pub fn $fn(&self, key: &str) -> Option<$type> {
            for file in &self.files {
                if let Ok(value) = file.config.$fn(key) {
                    return Some(value);
                }
            }
            None
        }
    };
}

impl Profile {
    /// Loads the profile named by `KRB5_CONFIG`, or the system default.
    pub fn new() -> Result<Self> {
        let files = Self::default_config_files();
        Self::from_files(&files)
    }

    /// Loads the given files in order; earlier files take precedence and
    /// missing files are skipped.
    pub fn from_files<S: AsRef<str>>(files: &[S]) -> Result<Self> {
        let mut profile_files = vec![];
        for file in files {
            profile_files.push(ProfileFile::new(file.as_ref())?);
        }
        Ok(Self {
            files: profile_files,
        })
    }

    fn default_config_files() -> Vec<String> {
        let filepath = env::var("KRB5_CONFIG").unwrap_or(DEFAULT_PROFILE_PATH.to_owned());
        filepath.split(':').map(|f| f.to_owned()).collect()
    }

    get_value!(get_string, String);

    get_value!(get_int, i64);
}

#[derive(Debug)]
struct ProfileFile {
    config: Config,
}

impl ProfileFile {
    fn new(filename: &str) -> Result<Self> {
        let expanded_filename = match (filename.starts_with("~/"), env::var("HOME")) {
            (true, Ok(home_env)) => format!("{}{}", home_env, &filename[1..]),
            _ => filename.to_owned(),
        };
        debug!(file = %expanded_filename, "loading profile");
        let config = Config::builder()
            .add_source(
                File::with_name(&expanded_filename)
                    .format(FileFormat::Ini)
                    .required(false),
            )
            .build()?;
        Ok(Self { config })
    }
}
