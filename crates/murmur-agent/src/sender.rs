// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sender identifier normalization.

use murmur_core::UserKey;

/// A message author, in the two forms the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Identifier as received, e.g. `5511999998888:12@s.whatsapp.net`.
    pub raw: String,
    /// Send address: the raw identifier without its `@domain` and `:device` suffixes.
    pub address: String,
    /// Storage key derived from the raw identifier.
    pub key: UserKey,
}

impl Sender {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            address: send_address(&raw).to_string(),
            key: UserKey::from_raw(&raw),
            raw,
        }
    }
}

/// Strip everything from the first `@`, then everything from the first `:`.
pub fn send_address(raw: &str) -> &str {
    let local = raw.split_once('@').map_or(raw, |(user, _)| user);
    local.split_once(':').map_or(local, |(user, _)| user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_domains() {
        assert_eq!(send_address("5511999998888@s.whatsapp.net"), "5511999998888");
        assert_eq!(send_address("5511999998888@c.us"), "5511999998888");
        assert_eq!(send_address("120363025246125486@g.us"), "120363025246125486");
    }

    #[test]
    fn strips_device_suffix() {
        assert_eq!(send_address("5511999998888:12@s.whatsapp.net"), "5511999998888");
        assert_eq!(send_address("5511999998888:3"), "5511999998888");
    }

    #[test]
    fn bare_number_unchanged() {
        assert_eq!(send_address("5511999998888"), "5511999998888");
    }

    #[test]
    fn key_and_address_are_independent() {
        let sender = Sender::new("5511999998888:12@s.whatsapp.net");
        assert_eq!(sender.address, "5511999998888");
        assert_eq!(sender.key.as_str(), "5511999998888_12_s_whatsapp_net");
        assert_eq!(sender.raw, "5511999998888:12@s.whatsapp.net");
    }
}
