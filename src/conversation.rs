//! Conversation controller
//!
//! Owns the message list, the pending flag and the input line. State only
//! changes through [`Conversation::submit`], [`Conversation::resolve`] and the
//! input editing methods; each change publishes a fresh [`ConversationView`]
//! to subscribers.

use tokio::sync::watch;

use crate::client::{QueryError, QueryResponse};
use crate::input::InputLine;
use crate::message::Message;

pub const ERROR_REPLY: &str =
    "Sorry, there was an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationView {
    pub messages: Vec<Message>,
    pub pending: bool,
    pub input: String,
    pub cursor: usize,
}

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    phase: Phase,
    input: InputLine,
    updates: watch::Sender<ConversationView>,
}

impl Conversation {
    pub fn new() -> Self {
        let messages = vec![Message::greeting()];
        let input = InputLine::default();
        let (updates, _) = watch::channel(ConversationView {
            messages: messages.clone(),
            pending: false,
            input: String::new(),
            cursor: 0,
        });

        Self {
            messages,
            phase: Phase::Idle,
            input,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationView> {
        self.updates.subscribe()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::AwaitingReply
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    /// Idle -> AwaitingReply.
    ///
    /// Appends the user message and returns the trimmed text to send. Returns
    /// `None` without touching any state when the input is blank or a request
    /// is already pending.
    pub fn submit(&mut self) -> Option<String> {
        if self.is_pending() {
            tracing::debug!("submit rejected: request already pending");
            return None;
        }
        if self.input.is_blank() {
            return None;
        }

        let typed = self.input.take();
        let query = typed.trim().to_string();
        self.messages.push(Message::user(typed));
        self.phase = Phase::AwaitingReply;
        tracing::info!(chars = query.chars().count(), "query submitted");

        self.publish();
        Some(query)
    }

    /// AwaitingReply -> Idle. Failures become the fixed error reply.
    pub fn resolve(&mut self, result: Result<QueryResponse, QueryError>) {
        if !self.is_pending() {
            tracing::warn!("ignoring query result with no request pending");
            return;
        }

        let reply = match result {
            Ok(reply) => {
                tracing::info!(chars = reply.response.chars().count(), "reply received");
                Message::assistant(reply.response)
            }
            Err(e) => {
                tracing::error!(error = %e, "error getting response");
                Message::assistant(ERROR_REPLY)
            }
        };

        self.messages.push(reply);
        self.phase = Phase::Idle;
        self.publish();
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit(|input| input.insert(c));
    }

    pub fn backspace(&mut self) {
        self.edit(InputLine::backspace);
    }

    pub fn delete(&mut self) {
        self.edit(InputLine::delete);
    }

    pub fn move_left(&mut self) {
        self.edit(InputLine::move_left);
    }

    pub fn move_right(&mut self) {
        self.edit(InputLine::move_right);
    }

    pub fn move_home(&mut self) {
        self.edit(InputLine::move_home);
    }

    pub fn move_end(&mut self) {
        self.edit(InputLine::move_end);
    }

    // The input control is disabled while a request is pending
    fn edit(&mut self, f: impl FnOnce(&mut InputLine)) {
        if self.is_pending() {
            return;
        }
        f(&mut self.input);
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(ConversationView {
            messages: self.messages.clone(),
            pending: self.is_pending(),
            input: self.input.text().to_string(),
            cursor: self.input.cursor(),
        });
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageRole, GREETING};
    use reqwest::StatusCode;

    fn type_text(conv: &mut Conversation, text: &str) {
        text.chars().for_each(|c| conv.insert_char(c));
    }

    fn reply(text: &str) -> Result<QueryResponse, QueryError> {
        Ok(QueryResponse {
            response: text.to_string(),
        })
    }

    fn failure() -> Result<QueryResponse, QueryError> {
        Err(QueryError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    }

    fn contents(conv: &Conversation) -> Vec<(MessageRole, &str)> {
        conv.messages()
            .iter()
            .map(|m| (m.role(), m.content()))
            .collect()
    }

    #[test]
    fn test_initial_state_has_greeting() {
        let conv = Conversation::new();
        assert_eq!(contents(&conv), vec![(MessageRole::Assistant, GREETING)]);
        assert!(!conv.is_pending());
        assert_eq!(conv.phase(), Phase::Idle);
    }

    #[test]
    fn test_successful_exchange() {
        let mut conv = Conversation::new();
        type_text(&mut conv, "What is RAG?");

        assert_eq!(conv.submit().as_deref(), Some("What is RAG?"));
        assert!(conv.is_pending());
        assert_eq!(conv.input().text(), "");
        assert_eq!(conv.messages().len(), 2);

        conv.resolve(reply("Retrieval-Augmented Generation"));
        assert!(!conv.is_pending());
        assert_eq!(
            contents(&conv)[1..],
            [
                (MessageRole::User, "What is RAG?"),
                (MessageRole::Assistant, "Retrieval-Augmented Generation"),
            ]
        );
    }

    #[test]
    fn test_failed_exchange_appends_error_reply() {
        let mut conv = Conversation::new();
        type_text(&mut conv, "test");
        conv.submit();
        conv.resolve(failure());

        assert!(!conv.is_pending());
        assert_eq!(
            contents(&conv)[1..],
            [
                (MessageRole::User, "test"),
                (MessageRole::Assistant, ERROR_REPLY),
            ]
        );
    }

    #[test]
    fn test_blank_input_is_noop() {
        let mut conv = Conversation::new();
        assert_eq!(conv.submit(), None);

        type_text(&mut conv, "  \t ");
        assert_eq!(conv.submit(), None);
        assert_eq!(conv.messages().len(), 1);
        assert!(!conv.is_pending());
        assert_eq!(conv.input().text(), "  \t ");
    }

    #[test]
    fn test_query_is_trimmed_but_message_keeps_input() {
        let mut conv = Conversation::new();
        type_text(&mut conv, "  hello ");
        assert_eq!(conv.submit().as_deref(), Some("hello"));
        assert_eq!(conv.messages()[1].content(), "  hello ");
    }

    #[test]
    fn test_submit_rejected_while_pending() {
        let mut conv = Conversation::new();
        type_text(&mut conv, "first");
        conv.submit();

        // Editing is disabled, so the input stays empty
        type_text(&mut conv, "second");
        assert_eq!(conv.input().text(), "");
        assert_eq!(conv.submit(), None);
        assert_eq!(conv.messages().len(), 2);
        assert!(conv.is_pending());
    }

    #[test]
    fn test_resolve_without_pending_is_ignored() {
        let mut conv = Conversation::new();
        conv.resolve(reply("stray"));
        assert_eq!(conv.messages().len(), 1);
        assert!(!conv.is_pending());
    }

    #[test]
    fn test_each_exchange_adds_two_messages_in_order() {
        let mut conv = Conversation::new();
        let inputs = ["one", "two", "three", "four"];

        for (i, text) in inputs.iter().enumerate() {
            type_text(&mut conv, text);
            assert!(conv.submit().is_some());
            assert_eq!(conv.messages().len(), 2 + i * 2);
            if i % 2 == 0 {
                conv.resolve(reply(&format!("re: {}", text)));
            } else {
                conv.resolve(failure());
            }
            assert_eq!(conv.messages().len(), 3 + i * 2);
            assert!(!conv.is_pending());
        }

        let users: Vec<&str> = conv
            .messages()
            .iter()
            .filter(|m| m.is_user())
            .map(|m| m.content())
            .collect();
        assert_eq!(users, inputs);
        for pair in conv.messages()[1..].chunks(2) {
            assert_eq!(pair[0].role(), MessageRole::User);
            assert_eq!(pair[1].role(), MessageRole::Assistant);
        }
    }

    #[test]
    fn test_subscribers_see_every_transition() {
        let mut conv = Conversation::new();
        let mut rx = conv.subscribe();
        assert_eq!(rx.borrow_and_update().messages.len(), 1);

        type_text(&mut conv, "hi");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().input, "hi");

        conv.submit();
        {
            let view = rx.borrow_and_update();
            assert!(view.pending);
            assert_eq!(view.messages.len(), 2);
            assert_eq!(view.input, "");
        }

        conv.resolve(reply("hello"));
        let view = rx.borrow_and_update();
        assert!(!view.pending);
        assert_eq!(view.messages, conv.messages());
    }
}
