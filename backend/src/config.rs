use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::{collections::HashMap, fmt, net::IpAddr};

#[derive(Deserialize)]
pub struct Settings {
    server_port: Option<u16>,
    server_bind_address: Option<IpAddr>,
    device_lifetime_days: Option<u32>,

    #[serde(default)]
    users: HashMap<Box<str>, Box<str>>,
}

impl Settings {
    pub fn server_port(&self) -> u16 {
        self.server_port.unwrap_or(8080)
    }
    pub fn server_bind_address(&self) -> IpAddr {
        self.server_bind_address
            .unwrap_or_else(|| IpAddr::from([0u8; 16]))
    }
    /// Lifetime of devices created by a login
    pub fn device_lifetime(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.device_lifetime_days.unwrap_or(30)))
    }
    pub fn user_directory(&self) -> UserDirectory {
        UserDirectory {
            users: self.users.clone(),
        }
    }
}

/// Static list of users allowed to log in.
#[derive(Default, Clone)]
pub struct UserDirectory {
    users: HashMap<Box<str>, Box<str>>,
}

// passwords stay out of logs
impl fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.users.keys()).finish()
    }
}

impl UserDirectory {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|expected| expected.as_ref() == password)
    }
}

impl<U: Into<Box<str>>, P: Into<Box<str>>> FromIterator<(U, P)> for UserDirectory {
    fn from_iter<T: IntoIterator<Item = (U, P)>>(iter: T) -> Self {
        UserDirectory {
            users: iter
                .into_iter()
                .map(|(user, password)| (user.into(), password.into()))
                .collect(),
        }
    }
}

fn create_settings() -> Result<Settings, ConfigError> {
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::with_prefix("app"))
        .build()?;
    let settings: Settings = cfg.get("settings")?;
    Ok(settings)
}

lazy_static! {
    pub static ref CONFIG: Settings = create_settings().expect("Cannot load config.yaml");
}
