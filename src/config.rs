use eyre::{Error, WrapErr};
use std::path::Path;
use std::str::FromStr;

pub struct Config {
    conf: toml::Table,
}

impl Config {
    pub fn load(file_name: impl AsRef<Path>) -> Result<Config, Error> {
        let content =
            std::fs::read_to_string(file_name).wrap_err("cannot load configuration file")?;
        Config::from_str(&content)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Config {
            conf: toml::from_str(s).wrap_err("cannot parse configuration file")?,
        })
    }
}

pub fn get_config(config: &Config, section: &str, key: &str) -> Option<String> {
    config
        .conf
        .get(section)
        .and_then(|s| s.get(key))
        .map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Look up and parse a configuration value, falling back to `default` when
/// the key is absent.
pub fn parse_config<T>(config: &Config, section: &str, key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get_config(config, section, key) {
        Some(value) => value
            .parse()
            .wrap_err_with(|| format!("cannot parse {section}.{key} configuration parameter")),
        None => Ok(default),
    }
}
