// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `murmur history <sender>` command implementation.

use murmur_config::model::MurmurConfig;
use murmur_core::{Conversation, MurmurError, PersistenceAdapter, Role, UserKey};
use murmur_storage::FileStorage;

/// Prints the stored conversation for `sender`.
///
/// The sender is normalized to its storage key the same way the pipeline
/// does, so a raw identifier copied from a webhook payload works.
pub async fn run_history(
    config: &MurmurConfig,
    sender: &str,
    json: bool,
) -> Result<(), MurmurError> {
    let storage = FileStorage::new(&config.storage);
    let key = UserKey::from_raw(sender);

    match load(&storage, &key).await? {
        None => println!("no history stored for {key}"),
        Some(conversation) if json => {
            let rendered = serde_json::to_string_pretty(&conversation)
                .map_err(|e| MurmurError::Internal(format!("failed to render history: {e}")))?;
            println!("{rendered}");
        }
        Some(conversation) => print!("{}", format_conversation(&key, &conversation)),
    }
    Ok(())
}

async fn load(
    storage: &FileStorage,
    key: &UserKey,
) -> Result<Option<Conversation>, MurmurError> {
    let Some(bytes) = storage.read(key).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| MurmurError::Storage {
            source: Box::new(e),
        })
}

fn format_conversation(key: &UserKey, conversation: &Conversation) -> String {
    let mut out = format!("{key} ({} turns)\n", conversation.len());
    for turn in conversation.turns() {
        let label = match turn.role {
            Role::User => "user ",
            Role::Model => "model",
        };
        out.push_str(&format!("  {label} | {}\n", turn.content.replace('\n', "\n        | ")));
    }
    out
}
