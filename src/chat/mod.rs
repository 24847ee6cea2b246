//! Conversation with a hosted model about the loaded dataset.
//!
//! The transcript is a plain value: [`submit_question`] takes it, appends
//! the user's turn (and the reply, if one arrives) and hands it back.

pub mod client;
pub mod context;
pub mod transcript;

pub use client::{ChatBackend, ChatError, ChatRequest, OpenRouterClient};
pub use transcript::{Role, Transcript, Turn};

use crate::config::ChatConfig;
use crate::data::Table;

/// Result of one chat interaction.
#[derive(Debug)]
pub struct ChatExchange {
    pub transcript: Transcript,
    /// `Err` if the backend failed; the user's turn is kept regardless.
    pub result: Result<(), ChatError>,
}

/// Assemble the request: system prompt built from `table`, then every turn
/// of the transcript verbatim.
pub fn build_request(config: &ChatConfig, table: &Table, transcript: &Transcript) -> ChatRequest {
    let messages = std::iter::once(Turn::system(context::system_prompt(table)))
        .chain(transcript.turns().iter().cloned())
        .collect();
    ChatRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
    }
}

/// Ask `backend` a question about `table`.
///
/// Blank questions leave the transcript untouched. Otherwise the question
/// is appended, the backend is called once, and on success the reply is
/// appended as an assistant turn.
pub fn submit_question(
    mut transcript: Transcript,
    question: &str,
    table: &Table,
    config: &ChatConfig,
    backend: &dyn ChatBackend,
) -> ChatExchange {
    if question.trim().is_empty() {
        return ChatExchange {
            transcript,
            result: Ok(()),
        };
    }

    transcript.push_user(question);
    let request = build_request(config, table, &transcript);
    let result = backend.complete(&request).map(|reply| {
        transcript.push_assistant(reply);
    });
    if let Err(e) = &result {
        log::error!("chat request failed: {e}");
    }

    ChatExchange { transcript, result }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::{normalize, parse_csv, NormalizedTable};

    /// Records every request and answers with a canned reply.
    struct Scripted {
        reply: Option<&'static str>,
        seen: RefCell<Vec<ChatRequest>>,
    }

    impl ChatBackend for Scripted {
        fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply
                .map(str::to_string)
                .ok_or(ChatError::EmptyResponse)
        }
    }

    fn table() -> NormalizedTable {
        normalize(parse_csv("Survived,Sex\n0,male\n1,female\n".as_bytes()).unwrap())
    }

    #[test]
    fn appends_question_and_reply() {
        let backend = Scripted {
            reply: Some("Half of them."),
            seen: RefCell::default(),
        };
        let cfg = ChatConfig::default();
        let ex = submit_question(Transcript::new(), "How many survived?", &table(), &cfg, &backend);
        assert!(ex.result.is_ok());
        assert_eq!(
            ex.transcript.turns(),
            &[Turn::user("How many survived?"), Turn::assistant("Half of them.")]
        );

        let seen = backend.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 400);
        assert_eq!(seen[0].messages[0].role, Role::System);
        assert_eq!(seen[0].messages[1], Turn::user("How many survived?"));
    }

    #[test]
    fn prior_turns_are_sent_verbatim() {
        let backend = Scripted {
            reply: Some("Yes."),
            seen: RefCell::default(),
        };
        let cfg = ChatConfig::default();
        let first = submit_question(Transcript::new(), "a", &table(), &cfg, &backend);
        let second = submit_question(first.transcript, "b", &table(), &cfg, &backend);
        assert_eq!(second.transcript.len(), 4);

        let seen = backend.seen.borrow();
        let roles: Vec<Role> = seen[1].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    }

    #[test]
    fn failure_keeps_the_question() {
        let backend = Scripted {
            reply: None,
            seen: RefCell::default(),
        };
        let ex = submit_question(Transcript::new(), "hello", &table(), &ChatConfig::default(), &backend);
        assert!(matches!(ex.result, Err(ChatError::EmptyResponse)));
        assert_eq!(ex.transcript.turns(), &[Turn::user("hello")]);
    }

    #[test]
    fn blank_question_is_ignored() {
        let backend = Scripted {
            reply: Some("unused"),
            seen: RefCell::default(),
        };
        let ex = submit_question(Transcript::new(), "   ", &table(), &ChatConfig::default(), &backend);
        assert!(ex.transcript.is_empty());
        assert!(backend.seen.borrow().is_empty());
    }
}
