//! Chat message flowing through the interceptor chain

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use super::{Player, PlayerId};
use crate::command::Command;

/// One chat line sent by a player.
///
/// Interceptors may rewrite the text, attach a resolved command, redirect the
/// message or stop the host from relaying it.
pub struct ChatMessage {
    sent_by: Player,
    message: String,
    original_message: String,
    preset_words: Option<Vec<String>>,
    words: OnceCell<Vec<String>>,
    command: Option<Arc<dyn Command>>,
    command_parameters: OnceCell<Vec<String>>,
    /// Whether the host should relay the line to everyone
    pub broadcast_forward: bool,
    /// Redirect target, if an interceptor decided to deliver privately
    pub sent_to: Option<PlayerId>,
}

impl ChatMessage {
    pub fn new(sent_by: Player, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            sent_by,
            original_message: message.clone(),
            message,
            preset_words: None,
            words: OnceCell::new(),
            command: None,
            command_parameters: OnceCell::new(),
            broadcast_forward: true,
            sent_to: None,
        }
    }

    /// Build a message whose words were already split by a custom parser
    pub fn with_words(sent_by: Player, message: impl Into<String>, words: Vec<String>) -> Self {
        let mut msg = Self::new(sent_by, message);
        msg.preset_words = Some(words);
        msg
    }

    pub fn sent_by(&self) -> &Player {
        &self.sent_by
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replace the text. The original text is kept as received.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.words = OnceCell::new();
    }

    pub fn original_message(&self) -> &str {
        &self.original_message
    }

    /// Whitespace separated words of the current text, or the preset words
    pub fn words(&self) -> &[String] {
        if let Some(words) = self.preset_words.as_deref() {
            if !words.is_empty() {
                return words;
            }
        }
        self.words
            .get_or_init(|| self.message.split_whitespace().map(str::to_owned).collect())
    }

    pub fn command(&self) -> Option<&Arc<dyn Command>> {
        self.command.as_ref()
    }

    pub fn set_command(&mut self, command: Option<Arc<dyn Command>>) {
        self.command = command;
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// Words after the command word. None unless a command is attached.
    ///
    /// Computed on first read and cached; later edits to the text are not
    /// reflected.
    pub fn command_parameters(&self) -> Option<&[String]> {
        self.command.as_ref()?;
        let params = self
            .command_parameters
            .get_or_init(|| self.words().iter().skip(1).cloned().collect());
        Some(params)
    }
}

impl fmt::Debug for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatMessage")
            .field("sent_by", &self.sent_by.id)
            .field("message", &self.message)
            .field("original_message", &self.original_message)
            .field("is_command", &self.is_command())
            .field("broadcast_forward", &self.broadcast_forward)
            .field("sent_to", &self.sent_to)
            .finish_non_exhaustive()
    }
}
