use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::matcher::find_relevant_info;
use crate::types::Message;

/// Why a submitted line did not become a message
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("assistant is still composing a reply")]
    Composing,
    #[error("reply does not answer the latest message of this conversation")]
    StaleReply,
}

static NEXT_CONVERSATION: AtomicU64 = AtomicU64::new(1);

/// Simulated "thinking" time before a reply is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
            jitter: Duration::from_millis(1000),
        }
    }
}

impl ReplyDelay {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// A delay in `[base, base + jitter]`
    pub fn sample(&self) -> Duration {
        self.sample_with(&mut rand::rng())
    }

    pub fn sample_with<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        self.base + Duration::from_millis(rng.random_range(0..=jitter_ms))
    }
}

/// Reply computed at submit time, appended once the delay has passed.
///
/// Only `Conversation::submit` creates one, and delivering it consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending reply keeps the conversation composing until delivered"]
pub struct PendingReply {
    conversation: u64,
    reply_to: u64,
    content: String,
    category: String,
}

impl PendingReply {
    /// Id of the user message being answered
    pub fn reply_to(&self) -> u64 {
        self.reply_to
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Ordered, append-only chat transcript with a single outstanding reply at most
#[derive(Debug)]
pub struct Conversation {
    id: u64,
    catalog: Arc<Catalog>,
    messages: Vec<Message>,
    composing: bool,
    next_id: u64,
}

impl Conversation {
    /// Starts a conversation seeded with the catalog greeting
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let greeting = Message::assistant(1, catalog.greeting.clone(), None);
        Self {
            id: NEXT_CONVERSATION.fetch_add(1, Ordering::Relaxed),
            catalog,
            messages: vec![greeting],
            composing: false,
            next_id: 2,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Appends the user's message and prepares the matching reply.
    ///
    /// Blank text and text sent while a reply is pending leave the transcript untouched.
    pub fn submit(&mut self, text: &str) -> Result<PendingReply, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.composing {
            return Err(SubmitRejected::Composing);
        }

        let id = self.push(Message::user(self.next_id, text.to_string()));
        self.composing = true;

        let result = find_relevant_info(&self.catalog, text);
        debug!(
            "Message {} answered from '{}' ({})",
            id, result.category, result.kind
        );

        Ok(PendingReply {
            conversation: self.id,
            reply_to: id,
            content: result.content.to_string(),
            category: result.category.to_string(),
        })
    }

    /// Appends the assistant reply and clears the composing flag.
    ///
    /// The reply must answer the user message that is currently waiting, in this conversation.
    pub fn deliver(&mut self, pending: PendingReply) -> Result<&Message, SubmitRejected> {
        let awaited = self
            .messages
            .last()
            .filter(|m| self.composing && m.is_user())
            .map(|m| m.id);
        if pending.conversation != self.id || awaited != Some(pending.reply_to) {
            return Err(SubmitRejected::StaleReply);
        }

        let reply = Message::assistant(self.next_id, pending.content, Some(pending.category));
        self.push(reply);
        self.composing = false;
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Waits out the thinking delay, then delivers
    pub async fn reply_after(
        &mut self,
        pending: PendingReply,
        delay: &ReplyDelay,
    ) -> Result<&Message, SubmitRejected> {
        let wait = delay.sample();
        debug!("Replying to message {} in {:?}", pending.reply_to, wait);
        tokio::time::sleep(wait).await;
        self.deliver(pending)
    }

    /// Submit and wait for the reply in one step
    pub async fn send(
        &mut self,
        text: &str,
        delay: &ReplyDelay,
    ) -> Result<&Message, SubmitRejected> {
        let pending = self.submit(text)?;
        self.reply_after(pending, delay).await
    }

    fn push(&mut self, message: Message) -> u64 {
        let id = message.id;
        self.messages.push(message);
        self.next_id = id + 1;
        id
    }
}
