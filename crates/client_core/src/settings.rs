//! Client settings: built-in defaults, then an optional `calc.toml`, then
//! `APP__*` environment variables.

use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::locale::Locale;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONFIG_FILE: &str = "calc";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub locale: Locale,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 10,
            locale: Locale::En,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn base_url(&self) -> anyhow::Result<Url> {
        normalize_base_url(&self.server_url)
            .with_context(|| format!("server_url '{}' is not a usable base url", self.server_url))
    }
}

/// Loads settings from `calc.toml` in the working directory (if present) or
/// from `explicit_file`, overlaid with `APP__SERVER_URL`,
/// `APP__REQUEST_TIMEOUT_SECS` and `APP__LOCALE`.
pub fn load_settings(explicit_file: Option<&Path>) -> anyhow::Result<ClientSettings> {
    load_settings_with_env_prefix(explicit_file, ENV_PREFIX)
}

pub(crate) fn load_settings_with_env_prefix(
    explicit_file: Option<&Path>,
    env_prefix: &str,
) -> anyhow::Result<ClientSettings> {
    let defaults = ClientSettings::default();
    let mut builder = Config::builder()
        .set_default("server_url", defaults.server_url)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs)?
        .set_default("locale", "en")?;

    builder = match explicit_file {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };

    let settings: ClientSettings = builder
        .add_source(Environment::with_prefix(env_prefix).separator("__"))
        .build()
        .context("failed to read client settings")?
        .try_deserialize()
        .context("invalid client settings")?;

    settings.base_url()?;
    tracing::debug!(
        server_url = %settings.server_url,
        timeout_secs = settings.request_timeout_secs,
        locale = ?settings.locale,
        "loaded client settings"
    );
    Ok(settings)
}

/// Parses `raw` and makes sure the path ends with `/` so endpoint paths
/// join underneath it instead of replacing the last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn normalizes_base_url_with_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/"
        );
        assert_eq!(
            normalize_base_url(" http://calc.internal/backend ").unwrap().as_str(),
            "http://calc.internal/backend/"
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn uses_defaults_without_file_or_env() {
        let settings =
            load_settings_with_env_prefix(None, "CALC_TEST_DEFAULTS_UNSET").expect("settings");
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn reads_explicit_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "server_url = \"http://10.0.0.5:9000\"\nrequest_timeout_secs = 3\nlocale = \"ru\""
        )
        .expect("write settings");

        let settings = load_settings_with_env_prefix(Some(file.path()), "CALC_TEST_FILE_UNSET")
            .expect("settings");
        assert_eq!(settings.server_url, "http://10.0.0.5:9000");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.locale, Locale::Ru);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "server_url = \"http://from-file:1\"").expect("write settings");

        std::env::set_var("CALC_TEST_ENV__SERVER_URL", "http://from-env:2");
        let settings =
            load_settings_with_env_prefix(Some(file.path()), "CALC_TEST_ENV").expect("settings");
        std::env::remove_var("CALC_TEST_ENV__SERVER_URL");

        assert_eq!(settings.server_url, "http://from-env:2");
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn rejects_unusable_server_url() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "server_url = \"::::\"").expect("write settings");

        let err = load_settings_with_env_prefix(Some(file.path()), "CALC_TEST_BAD_UNSET")
            .expect_err("bad url");
        assert!(format!("{err:#}").contains("not a usable base url"));
    }
}
