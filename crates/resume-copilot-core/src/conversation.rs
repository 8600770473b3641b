//! Conversation store for the resume copilot chat
//!
//! Holds the message history, the composer draft, the busy gate and the last
//! error. A request is started with [`Conversation::begin_submit`] and finished
//! with [`Conversation::complete`]; [`Conversation::submit`] does both for
//! callers that can simply await the client.

use log::debug;
use thiserror::Error;

use crate::ai::{AskError, ResumeQuery};
use crate::state::{ChatMessage, ChatResponse};

pub const GREETING: &str =
    "Welcome. I can answer about Sunay's projects, skills, education, growth story, and career direction.";

pub const FALLBACK_REPLY: &str =
    "I could not reach the chat backend. Verify backend server and OpenRouter key setup.";

/// One-click questions offered above the chat log
pub const STARTER_PROMPTS: [&str; 3] = [
    "What kind of backend work has Sunay done?",
    "Summarize Sunay's AI experience in 3 bullets.",
    "Which technologies are strongest in this profile?",
];

/// Questions shorter than this (after trimming) are not sent
pub const MIN_QUESTION_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("a request is still in flight")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Live,
    Busy,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Live => "Live",
            Status::Busy => "Busy",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Status::Live => "Realtime answers from portfolio knowledge",
            Status::Busy => "Generating response...",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    draft: String,
    busy: bool,
    last_error: Option<String>,
}

/// Borrowed snapshot of everything a renderer needs
#[derive(Debug, Clone, Copy)]
pub struct ConversationView<'a> {
    pub messages: &'a [ChatMessage],
    pub draft: &'a str,
    pub busy: bool,
    pub error: Option<&'a str>,
    pub can_submit: bool,
    pub can_reset: bool,
    pub status: Status,
}

fn is_question(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUESTION_CHARS
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            draft: String::new(),
            busy: false,
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Mutable access for in-place composer editing
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn can_submit(&self) -> bool {
        !self.busy && is_question(&self.draft)
    }

    pub fn status(&self) -> Status {
        if self.busy {
            Status::Busy
        } else {
            Status::Live
        }
    }

    pub fn view(&self) -> ConversationView<'_> {
        ConversationView {
            messages: &self.messages,
            draft: &self.draft,
            busy: self.busy,
            error: self.last_error.as_deref(),
            can_submit: self.can_submit(),
            can_reset: !self.busy,
            status: self.status(),
        }
    }

    /// Accept `text` as the next question if the guards allow it.
    ///
    /// On acceptance the trimmed question is appended as a user message, the
    /// draft and error are cleared, the store becomes busy and the question is
    /// returned for dispatch. Rejections leave the state untouched.
    pub fn begin_submit(&mut self, text: &str) -> Option<String> {
        if self.busy {
            debug!("Ignoring submission while a request is in flight");
            return None;
        }
        let question = text.trim();
        if !is_question(question) {
            debug!("Ignoring submission shorter than {} chars", MIN_QUESTION_CHARS);
            return None;
        }

        let question = question.to_string();
        self.messages.push(ChatMessage::user(question.clone()));
        self.draft.clear();
        self.busy = true;
        self.last_error = None;
        Some(question)
    }

    /// Apply the outcome of the request started by `begin_submit`.
    pub fn complete(&mut self, result: Result<ChatResponse, AskError>) {
        if !self.busy {
            debug!("Dropping a resume answer that arrived with no request in flight");
            return;
        }

        match result {
            Ok(response) => {
                debug!("Answer received from model {}", response.model);
                self.messages.push(ChatMessage::assistant(response.answer));
            }
            Err(err) => {
                self.last_error = Some(err.description().to_string());
                self.messages.push(ChatMessage::assistant(FALLBACK_REPLY));
            }
        }
        self.busy = false;
    }

    /// Submit and await the answer in one go. Returns whether a request was sent.
    pub async fn submit<Q>(&mut self, client: &Q, text: &str) -> bool
    where
        Q: ResumeQuery + ?Sized,
    {
        let Some(question) = self.begin_submit(text) else {
            return false;
        };
        let result = client.ask(&question).await;
        self.complete(result);
        true
    }

    /// Back to the seeded greeting. Refused while a request is in flight.
    pub fn reset(&mut self) -> Result<(), ConversationError> {
        if self.busy {
            return Err(ConversationError::Busy);
        }
        self.messages.clear();
        self.messages.push(ChatMessage::assistant(GREETING));
        self.draft.clear();
        self.last_error = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned results and records the questions it was asked
    struct ScriptedClient {
        replies: Mutex<Vec<Result<ChatResponse, AskError>>>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<ChatResponse, AskError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                asked: Mutex::new(Vec::new()),
            }
        }

        fn answering(answer: &str, model: &str) -> Self {
            Self::new(vec![Ok(ChatResponse {
                answer: answer.to_string(),
                model: model.to_string(),
            })])
        }

        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResumeQuery for ScriptedClient {
        async fn ask(&self, question: &str) -> Result<ChatResponse, AskError> {
            self.asked.lock().unwrap().push(question.to_string());
            self.replies.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn test_new_has_only_greeting() {
        let convo = Conversation::new();
        assert_eq!(convo.messages(), &[ChatMessage::assistant(GREETING)]);
        assert_eq!(convo.draft(), "");
        assert!(!convo.is_busy());
        assert!(convo.last_error().is_none());
    }

    #[tokio::test]
    async fn test_short_input_is_ignored() {
        let client = ScriptedClient::new(Vec::new());
        let mut convo = Conversation::new();
        convo.set_draft(" x ");

        for text in ["", " ", "a", "  b  ", "\n\t"] {
            assert!(!convo.submit(&client, text).await);
        }
        assert_eq!(convo.messages().len(), 1);
        assert_eq!(convo.draft(), " x ");
        assert!(client.asked().is_empty());
    }

    #[tokio::test]
    async fn test_two_chars_is_enough() {
        let client = ScriptedClient::answering("Hello!", "m1");
        let mut convo = Conversation::new();

        assert!(convo.submit(&client, "hi").await);
        assert_eq!(client.asked(), vec!["hi".to_string()]);
        assert_eq!(convo.messages().len(), 3);
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let mut convo = Conversation::new();
        assert_eq!(convo.begin_submit(" 😀 "), None);
        assert_eq!(convo.begin_submit("é"), None);
        assert_eq!(convo.messages().len(), 1);

        assert_eq!(convo.begin_submit("😀😀"), Some("😀😀".to_string()));
    }

    #[tokio::test]
    async fn test_successful_answer_scenario() {
        let client = ScriptedClient::answering("Full-stack + AI", "m1");
        let mut convo = Conversation::new();
        convo.set_draft("What stack does Sunay use?");

        assert!(convo.submit(&client, "  What stack does Sunay use?  ").await);

        assert_eq!(
            convo.messages(),
            &[
                ChatMessage::assistant(GREETING),
                ChatMessage::user("What stack does Sunay use?"),
                ChatMessage::assistant("Full-stack + AI"),
            ]
        );
        assert_eq!(client.asked(), vec!["What stack does Sunay use?".to_string()]);
        assert!(!convo.is_busy());
        assert_eq!(convo.draft(), "");
        assert!(convo.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failure_records_error_and_fallback() {
        let client = ScriptedClient::new(vec![Err(AskError::from_body("model overloaded"))]);
        let mut convo = Conversation::new();

        assert!(convo.submit(&client, "Tell me about projects").await);

        let messages = convo.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::user("Tell me about projects"));
        assert_eq!(messages[2], ChatMessage::assistant(FALLBACK_REPLY));
        assert_eq!(convo.last_error(), Some("model overloaded"));
        assert!(!convo.is_busy());
    }

    #[tokio::test]
    async fn test_next_submit_clears_previous_error() {
        let client = ScriptedClient::new(vec![
            Err(AskError::generic()),
            Ok(ChatResponse {
                answer: "Node.js and PostgreSQL".to_string(),
                model: "m2".to_string(),
            }),
        ]);
        let mut convo = Conversation::new();

        convo.submit(&client, "backend?").await;
        assert!(convo.last_error().is_some());

        assert!(convo.begin_submit("backend work?").is_some());
        assert!(convo.last_error().is_none());
        let result = client.ask("backend work?").await;
        convo.complete(result);
        assert_eq!(convo.messages().len(), 5);
        assert_eq!(convo.messages()[4].content, "Node.js and PostgreSQL");
    }

    #[test]
    fn test_busy_rejects_submissions() {
        let mut convo = Conversation::new();
        assert_eq!(convo.begin_submit("first question"), Some("first question".to_string()));
        assert!(convo.is_busy());

        convo.set_draft("second question");
        assert!(!convo.can_submit());
        assert_eq!(convo.begin_submit("second question"), None);
        assert_eq!(convo.messages().len(), 2);
        assert_eq!(convo.draft(), "second question");
    }

    #[test]
    fn test_complete_without_request_is_ignored() {
        let mut convo = Conversation::new();
        convo.complete(Ok(ChatResponse {
            answer: "stray".to_string(),
            model: "m1".to_string(),
        }));
        assert_eq!(convo.messages().len(), 1);
    }

    #[test]
    fn test_reset_restores_greeting() {
        let mut convo = Conversation::new();
        convo.begin_submit("skills?");
        convo.complete(Err(AskError::generic()));
        convo.set_draft("half typed");

        convo.reset().unwrap();
        assert_eq!(convo.messages(), &[ChatMessage::assistant(GREETING)]);
        assert_eq!(convo.draft(), "");
        assert!(convo.last_error().is_none());
    }

    #[test]
    fn test_reset_refused_while_busy() {
        let mut convo = Conversation::new();
        convo.begin_submit("education?");

        assert_eq!(convo.reset(), Err(ConversationError::Busy));
        assert_eq!(convo.messages().len(), 2);

        convo.complete(Ok(ChatResponse {
            answer: "DAIICT ICT".to_string(),
            model: "m1".to_string(),
        }));
        assert_eq!(convo.messages()[2].role, ChatRole::Assistant);
        assert!(convo.reset().is_ok());
    }

    #[test]
    fn test_view_tracks_status() {
        let mut convo = Conversation::new();
        convo.set_draft("a");
        let view = convo.view();
        assert!(!view.can_submit);
        assert!(view.can_reset);
        assert_eq!(view.status, Status::Live);
        assert_eq!(view.status.subtitle(), "Realtime answers from portfolio knowledge");

        convo.set_draft("ab");
        assert!(convo.view().can_submit);

        convo.begin_submit("ab");
        let view = convo.view();
        assert!(view.busy);
        assert!(!view.can_reset);
        assert_eq!(view.status.label(), "Busy");
        assert_eq!(view.status.subtitle(), "Generating response...");
    }

    #[test]
    fn test_set_draft_is_verbatim() {
        let mut convo = Conversation::new();
        convo.set_draft("  spaced\nlines  ");
        assert_eq!(convo.draft(), "  spaced\nlines  ");
    }
}
