//! Prompt assembly for the co-founder chat.

use serde::Deserialize;

use super::{ChatMessage, Role};

/// How many earlier turns are sent along with the new message.
pub const HISTORY_WINDOW: usize = 5;

/// Reply used when no chat model is configured.
pub const UNCONFIGURED_REPLY: &str = "Отличная идея! Давайте обсудим детали вашего проекта.";

/// Reply used when the chat model call fails.
pub const ERROR_REPLY: &str =
    "Интересная идея! Расскажите подробнее о вашей целевой аудитории.";

/// Reply used when the model answers with nothing.
pub const EMPTY_REPLY: &str = "Продолжайте!";

/// Persona plus the canvas directive contract.
pub const SYSTEM_PROMPT: &str = "\
Ты - AI-кофаундер, эксперт по стартапам.
Помогаешь развивать идеи от концепции до запуска.
Отвечай кратко, конкретно, на русском языке.

Если пользователь просит что-то нарисовать, добавь в ответ команды для холста:
[CANVAS_CREATE:<type>:<json>]
где <type> - rectangle, circle, text или line, а <json> - плоский JSON-объект без вложенных объектов.
Поля: rectangle - x, y, width, height, fillColor, strokeColor;
circle - x, y, radius, fillColor, strokeColor;
text - x, y, content, fontSize, fillColor;
line - x1, y1, x2, y2, strokeColor, strokeWidth.
Холст имеет размер 800x400.";

/// A prior turn as sent by the browser.
///
/// Accepts both `{ "role", "content" }` and the older
/// `{ "isAI", "text" }` layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Message {
        role: Role,
        content: String,
    },
    Legacy {
        #[serde(rename = "isAI", default)]
        is_ai: bool,
        text: String,
    },
}

impl HistoryEntry {
    fn to_message(&self) -> Option<ChatMessage> {
        let (role, content) = match self {
            HistoryEntry::Message { role, content } => (*role, content),
            HistoryEntry::Legacy { is_ai: true, text } => (Role::Assistant, text),
            HistoryEntry::Legacy { is_ai: false, text } => (Role::User, text),
        };
        // Clients may not inject their own system prompt.
        if role == Role::System || content.trim().is_empty() {
            return None;
        }
        Some(ChatMessage {
            role,
            content: content.clone(),
        })
    }
}

/// System prompt, the last [`HISTORY_WINDOW`] turns, then the new message.
pub fn build_messages(history: &[HistoryEntry], message: &str) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend(history[start..].iter().filter_map(HistoryEntry::to_message));
    messages.push(ChatMessage::user(message));
    messages
}
