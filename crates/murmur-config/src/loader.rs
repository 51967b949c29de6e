// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./murmur.toml` > `~/.config/murmur/murmur.toml` >
//! `/etc/murmur/murmur.toml`, with environment variable overrides via the
//! `MURMUR_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MurmurConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/murmur/murmur.toml` (system-wide)
/// 3. `~/.config/murmur/murmur.toml` (user XDG config)
/// 4. `./murmur.toml` (local directory)
/// 5. `MURMUR_*` environment variables
pub fn load_config() -> Result<MurmurConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MurmurConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MurmurConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MurmurConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MurmurConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MurmurConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/murmur/murmur.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "murmur.toml";

pub(crate) fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("murmur/murmur.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MURMUR_GEMINI_API_KEY` must map to `gemini.api_key`, not
/// `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MURMUR_").map(|key| {
        let mapped = map_env_key(key.as_str());
        mapped.into()
    })
}

/// Maps a prefix-stripped env key onto its dotted config path.
///
/// Figment passes the key in its original case, so it is lowercased here.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    const SECTIONS: &[&str] = &[
        "agent", "gemini", "whatsapp", "delivery", "storage", "gateway",
    ];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
