//! Simulated document chat

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::model::{ChatMessage, ChatRole};
use crate::tasks::{DeferredTask, TaskScope};

/// Prompts offered while the conversation is empty
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Summarize this document",
    "Extract key requirements",
    "What risks are mentioned?",
    "Explain table #1",
];

fn message_id() -> String {
    format!("msg-{}", Uuid::new_v4())
}

/// One conversation about the open document.
///
/// Replies are canned and handed out in rotation, one per user message.
pub struct ChatSession {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    responses: Arc<Vec<ChatMessage>>,
    next_response: AtomicUsize,
    reply_delay: Duration,
}

impl ChatSession {
    pub fn new(responses: Vec<ChatMessage>, reply_delay: Duration) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(responses),
            next_response: AtomicUsize::new(0),
            reply_delay,
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        &SUGGESTED_PROMPTS
    }

    /// Post a user message and schedule the assistant reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn send(&self, scope: &TaskScope, text: &str) -> Option<DeferredTask> {
        if text.trim().is_empty() {
            return None;
        }

        self.messages.write().push(ChatMessage {
            message_id: message_id(),
            role: ChatRole::User,
            content: text.to_string(),
            citations: Vec::new(),
        });

        let reply = if self.responses.is_empty() {
            None
        } else {
            let index = self.next_response.fetch_add(1, Ordering::Relaxed) % self.responses.len();
            Some(self.responses[index].clone())
        };
        let Some(reply) = reply else {
            debug!("No canned responses configured, leaving message unanswered");
            return None;
        };

        let messages = self.messages.clone();
        Some(scope.spawn_after("chat-reply", self.reply_delay, move || {
            messages.write().push(ChatMessage {
                message_id: message_id(),
                role: ChatRole::Assistant,
                ..reply
            });
        }))
    }
}
