// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona resolution.

use crate::diagnostic::ConfigError;
use crate::model::{AgentConfig, DEFAULT_PERSONA};

/// Resolve the system instruction sent with every completion request.
///
/// `persona_file` wins over `persona`; with neither set the built-in persona
/// is used. An unreadable file is an error so a typo'd path fails at startup.
pub fn resolve_persona(agent: &AgentConfig) -> Result<String, ConfigError> {
    if let Some(path) = &agent.persona_file {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::PersonaFile {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path, "loaded persona from file");
        return Ok(content.trim().to_string());
    }

    Ok(agent
        .persona
        .clone()
        .unwrap_or_else(|| DEFAULT_PERSONA.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_persona_when_unset() {
        let agent = AgentConfig::default();
        assert_eq!(resolve_persona(&agent).unwrap(), DEFAULT_PERSONA);
    }

    #[test]
    fn inline_persona_used() {
        let agent = AgentConfig {
            persona: Some("You are Ana.".into()),
            ..Default::default()
        };
        assert_eq!(resolve_persona(&agent).unwrap(), "You are Ana.");
    }

    #[test]
    fn file_takes_precedence_over_inline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "You are Bia, from a file.").unwrap();

        let agent = AgentConfig {
            persona: Some("inline".into()),
            persona_file: Some(file.path().display().to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_persona(&agent).unwrap(), "You are Bia, from a file.");
    }

    #[test]
    fn missing_file_is_error() {
        let agent = AgentConfig {
            persona_file: Some("/nonexistent/murmur/persona.txt".into()),
            ..Default::default()
        };
        let err = resolve_persona(&agent).unwrap_err();
        assert!(matches!(err, ConfigError::PersonaFile { .. }));
    }
}
