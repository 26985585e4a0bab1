use std::{fs, io, path::Path, str::FromStr};

use anyhow::Context;
use page_core::ControllerConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "page_sim.toml";

/// Defaults, then the TOML file, then `APP__*` environment overrides.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => match read_optional(Path::new(DEFAULT_CONFIG_FILE))? {
            Some(raw) => parse_settings(&raw)
                .with_context(|| format!("invalid config '{DEFAULT_CONFIG_FILE}'"))?,
            None => ControllerConfig::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// `None` when the file does not exist; any other read failure is an error.
fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("failed to read config '{}'", path.display()))
        }
    }
}

fn parse_settings(raw: &str) -> anyhow::Result<ControllerConfig> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(
    settings: &mut ControllerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = parsed(&lookup, "APP__BREAKPOINT_PX") {
        settings.breakpoint_px = v;
    }
    if let Some(v) = parsed(&lookup, "APP__SUBMIT_LATENCY_MS") {
        settings.submit_latency_ms = v;
    }
    if let Some(v) = parsed(&lookup, "APP__NOTIFICATION_TTL_MS") {
        settings.notification_ttl_ms = v;
    }
    if let Some(v) = parsed(&lookup, "APP__EXIT_ANIMATION_MS") {
        settings.exit_animation_ms = v;
    }
    if let Some(v) = parsed(&lookup, "APP__HEADER_HEIGHT_PX") {
        settings.header_height_px = v;
    }
    if let Some(v) = parsed(&lookup, "APP__START_ONLINE") {
        settings.start_online = v;
    }
    if let Some(v) = lookup("APP__CONFIRMATION_URL") {
        settings.confirmation_url = v;
    }
    if let Some(v) = lookup("APP__PRIVACY_POLICY_URL") {
        settings.privacy_policy_url = v;
    }
    if let Some(v) = lookup("APP__HONEYPOT_NAME") {
        settings.honeypot_name = v;
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
