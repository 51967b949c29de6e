// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation over an optional [`CompletionAdapter`].
//!
//! [`ReplyGenerator::generate`] always returns text: the backend's answer,
//! the apology when no backend is configured, or the fallback when the call
//! fails or yields nothing usable. Calls are never retried.

use std::sync::Arc;

use tracing::{debug, warn};

use murmur_config::model::AgentConfig;
use murmur_core::{CompletionAdapter, CompletionRequest, CompletionResult, Conversation, Role, Turn};

/// Pulls reply text out of one result shape.
type Extractor = fn(&CompletionResult) -> Option<String>;

/// Tried in order; the first to yield non-blank text wins.
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("direct_text", direct_text),
    ("candidate_parts", candidate_parts),
];

fn direct_text(result: &CompletionResult) -> Option<String> {
    result.text.clone()
}

fn candidate_parts(result: &CompletionResult) -> Option<String> {
    let content = result.candidates.first()?.content.as_ref()?;
    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Extract trimmed, non-blank reply text from any supported shape.
pub fn extract_text(result: &CompletionResult) -> Option<String> {
    EXTRACTORS.iter().find_map(|(name, extract)| {
        let text = extract(result)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        debug!(extractor = *name, "reply text extracted");
        Some(trimmed.to_string())
    })
}

pub struct ReplyGenerator {
    completion: Option<Arc<dyn CompletionAdapter>>,
    persona: String,
    apology: String,
    fallback: String,
    max_history_turns: Option<usize>,
}

impl ReplyGenerator {
    /// `completion == None` puts the generator in apology-only mode.
    pub fn new(
        completion: Option<Arc<dyn CompletionAdapter>>,
        persona: impl Into<String>,
        apology: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            completion,
            persona: persona.into(),
            apology: apology.into(),
            fallback: fallback.into(),
            max_history_turns: None,
        }
    }

    /// Builds a generator with the messages and replay window from `agent`.
    pub fn from_config(
        completion: Option<Arc<dyn CompletionAdapter>>,
        persona: impl Into<String>,
        agent: &AgentConfig,
    ) -> Self {
        Self::new(
            completion,
            persona,
            agent.apology_message.clone(),
            agent.fallback_message.clone(),
        )
        .with_history_window(agent.max_history_turns)
    }

    /// Replay at most `turns` prior turns. `None` replays everything.
    pub fn with_history_window(mut self, turns: Option<usize>) -> Self {
        self.max_history_turns = turns;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.completion.is_some()
    }

    /// Produce a reply for `user_text` given the prior `history`.
    pub async fn generate(&self, user_text: &str, history: &Conversation) -> String {
        let Some(completion) = &self.completion else {
            debug!("no completion backend configured, sending apology");
            return self.apology.clone();
        };

        let request = CompletionRequest {
            system_instruction: self.persona.clone(),
            history: self.replay_window(history),
            user_text: user_text.to_string(),
        };
        let replayed = request.history.len();

        match completion.complete(request).await {
            Ok(result) => match extract_text(&result) {
                Some(text) => {
                    debug!(turns = replayed, chars = text.chars().count(), "reply generated");
                    text
                }
                None => {
                    warn!(
                        candidates = result.candidates.len(),
                        "completion returned no usable text"
                    );
                    self.fallback.clone()
                }
            },
            Err(e) => {
                warn!(error = %e, "completion failed");
                self.fallback.clone()
            }
        }
    }

    /// Turns sent as context, oldest first.
    ///
    /// A window never starts on a model turn so the request opens with the user.
    fn replay_window(&self, history: &Conversation) -> Vec<Turn> {
        let recent = history.recent(self.max_history_turns);
        let start = match self.max_history_turns {
            Some(_) => recent
                .iter()
                .position(|t| t.role == Role::User)
                .unwrap_or(recent.len()),
            None => 0,
        };
        recent[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::types::{Candidate, CandidateContent, Part};
    use murmur_test_utils::MockCompletion;

    fn generator(mock: Arc<MockCompletion>) -> ReplyGenerator {
        ReplyGenerator::new(Some(mock), "persona", "sorry", "fallback")
    }

    fn history(pairs: usize) -> Conversation {
        let mut convo = Conversation::new();
        for i in 0..pairs {
            convo.push_exchange(format!("u{i}"), format!("m{i}"));
        }
        convo
    }

    #[tokio::test]
    async fn unconfigured_returns_apology() {
        let generator = ReplyGenerator::new(None, "persona", "sorry", "fallback");
        assert!(!generator.is_configured());
        assert_eq!(generator.generate("hi", &Conversation::new()).await, "sorry");
    }

    #[tokio::test]
    async fn returns_trimmed_direct_text() {
        let mock = Arc::new(MockCompletion::with_replies(["  hello there \n"]));
        let reply = generator(mock).generate("hi", &Conversation::new()).await;
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn falls_back_to_candidate_parts() {
        let mock = Arc::new(MockCompletion::new());
        mock.push_result(CompletionResult::from_parts(["Olá, ", "tudo bem?"]))
            .await;
        let reply = generator(mock).generate("oi", &Conversation::new()).await;
        assert_eq!(reply, "Olá, tudo bem?");
    }

    #[tokio::test]
    async fn blank_direct_text_defers_to_candidates() {
        let mut result = CompletionResult::from_parts(["from parts"]);
        result.text = Some("   ".into());
        let mock = Arc::new(MockCompletion::new());
        mock.push_result(result).await;
        assert_eq!(
            generator(mock).generate("x", &Conversation::new()).await,
            "from parts"
        );
    }

    #[tokio::test]
    async fn no_text_anywhere_uses_fallback() {
        let mock = Arc::new(MockCompletion::new());
        mock.push_result(CompletionResult {
            text: None,
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: Some("model".into()),
                    parts: vec![Part { text: None }],
                }),
                finish_reason: Some("SAFETY".into()),
            }],
        })
        .await;
        assert_eq!(
            generator(mock).generate("x", &Conversation::new()).await,
            "fallback"
        );
    }

    #[tokio::test]
    async fn provider_error_uses_fallback_without_retry() {
        let mock = Arc::new(MockCompletion::new());
        mock.push_failure("503").await;
        let reply = generator(mock.clone())
            .generate("x", &Conversation::new())
            .await;
        assert_eq!(reply, "fallback");
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn sends_persona_and_full_history() {
        let mock = Arc::new(MockCompletion::new());
        generator(mock.clone()).generate("now", &history(2)).await;

        let request = &mock.requests().await[0];
        assert_eq!(request.system_instruction, "persona");
        assert_eq!(request.user_text, "now");
        assert_eq!(request.history, history(2).turns());
    }

    #[tokio::test]
    async fn empty_history_is_single_turn() {
        let mock = Arc::new(MockCompletion::new());
        generator(mock.clone()).generate("hi", &Conversation::new()).await;
        assert!(mock.requests().await[0].history.is_empty());
    }

    #[tokio::test]
    async fn history_window_starts_on_user_turn() {
        let mock = Arc::new(MockCompletion::new());
        let generator = generator(mock.clone()).with_history_window(Some(3));
        generator.generate("next", &history(3)).await;

        let sent = &mock.requests().await[0].history;
        assert_eq!(sent, &[Turn::user("u2"), Turn::model("m2")]);
    }

    #[test]
    fn extractor_order_prefers_direct_text() {
        let mut result = CompletionResult::from_parts(["parts"]);
        result.text = Some("direct".into());
        assert_eq!(extract_text(&result).as_deref(), Some("direct"));
    }

    #[test]
    fn extractor_uses_first_candidate_only() {
        let mut result = CompletionResult::from_parts(["first"]);
        result
            .candidates
            .extend(CompletionResult::from_parts(["second"]).candidates);
        assert_eq!(extract_text(&result).as_deref(), Some("first"));
    }
}
