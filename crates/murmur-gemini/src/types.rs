// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and error types for the Gemini `generateContent` REST API.

use serde::{Deserialize, Serialize};

use murmur_core::{CompletionRequest, Role};

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemInstruction {
    pub parts: Vec<TextPart>,
}

/// One conversation entry. `role` is `user` or `model`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_output_tokens: u32,
}

impl GenerateContentRequest {
    /// History turns first, then the new user message.
    pub fn from_completion(request: &CompletionRequest, generation: GenerationConfig) -> Self {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| Content {
                role: role_name(turn.role),
                parts: vec![TextPart {
                    text: turn.content.clone(),
                }],
            })
            .collect();
        contents.push(Content {
            role: "user",
            parts: vec![TextPart {
                text: request.user_text.clone(),
            }],
        });

        Self {
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: request.system_instruction.clone(),
                }],
            },
            contents,
            generation_config: generation,
        }
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
