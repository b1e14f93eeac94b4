//! Conversation Relay
//!
//! Threads one review turn through the provider: picks the working
//! conversation, sends it with a freshly built system prompt, and appends
//! the reply.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::conversation::{Conversation, Message};
use crate::prompt::{self, BuiltPrompt, FormFields, TestType};
use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// Relay errors
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

/// Result of a successful turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Text of the model's reply
    pub reply: String,
    /// Working conversation with the reply appended
    pub conversation: Conversation,
}

/// Per-request state, decided once from the prior conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// No history: the first user message comes from the template
    FirstTurn,
    /// History supplied by the caller is used as-is
    Continuing,
}

impl TurnKind {
    pub fn of(prior: &Conversation) -> Self {
        if prior.is_empty() {
            TurnKind::FirstTurn
        } else {
            TurnKind::Continuing
        }
    }
}

/// Stateless relay between the HTTP layer and the provider
#[derive(Clone)]
pub struct ConversationRelay {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl ConversationRelay {
    pub fn new(provider: Arc<dyn CompletionProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Conversation sent to the provider for this turn
    ///
    /// `user_message` opens the conversation only on the first turn.
    pub fn working_conversation(user_message: String, prior: Conversation) -> Conversation {
        match TurnKind::of(&prior) {
            TurnKind::FirstTurn => {
                let mut conversation = Conversation::new();
                conversation.push(Message::user(user_message));
                conversation
            }
            TurnKind::Continuing => prior,
        }
    }

    /// Run one review turn
    ///
    /// On failure no conversation is returned; the caller resubmits.
    pub async fn handle_analysis_request(
        &self,
        test_type: TestType,
        fields: &FormFields,
        prior: Conversation,
    ) -> Result<AnalysisOutcome, RelayError> {
        let turn = TurnKind::of(&prior);
        let BuiltPrompt {
            system_prompt,
            user_message,
        } = prompt::build_prompt(test_type, fields);
        let mut conversation = Self::working_conversation(user_message, prior);

        info!(
            "Relaying {:?} for {} ({} messages) via {}",
            turn,
            test_type,
            conversation.len(),
            self.provider.provider_name()
        );

        let request = CompletionRequest {
            system: system_prompt,
            max_tokens: self.max_tokens,
            messages: conversation.clone(),
        };

        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!("Provider call failed: {}", e);
            e
        })?;

        if response.segments.len() > 1 {
            debug!(
                "Provider returned {} segments; using the first text segment",
                response.segments.len()
            );
        }

        let reply = response
            .first_text()
            .ok_or(ProviderError::EmptyReply)?
            .to_string();

        conversation.push(Message::assistant(reply.clone()));

        Ok(AnalysisOutcome {
            reply,
            conversation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::provider::{ContentSegment, StubProvider};

    fn relay_with(stub: Arc<StubProvider>) -> ConversationRelay {
        ConversationRelay::new(stub, 1024)
    }

    fn sat_fields() -> FormFields {
        [
            ("problem", "2x=4, find x"),
            ("choices", "A) 1 B) 2"),
            ("selectedAnswer", "A) 1"),
            ("correctAnswer", "B) 2"),
            ("work", "divided wrong"),
            ("stuck", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_working_conversation_first_turn() {
        let conversation = ConversationRelay::working_conversation(
            prompt::user_message(TestType::Sat, &sat_fields()),
            Conversation::new(),
        );

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role(), Role::User);
        assert!(conversation.messages()[0]
            .content()
            .contains("PROBLEM: 2x=4, find x"));
    }

    #[test]
    fn test_working_conversation_continuing_is_unchanged() {
        let prior: Conversation = vec![
            Message::user("original"),
            Message::assistant("reply"),
            Message::user("follow-up"),
        ]
        .into();

        let conversation =
            ConversationRelay::working_conversation("unused".to_string(), prior.clone());
        assert_eq!(conversation, prior);
    }

    #[tokio::test]
    async fn test_first_turn_sends_template_and_system_prompt() {
        let stub = Arc::new(StubProvider::with_reply("What did you divide by?"));
        let relay = relay_with(stub.clone());

        let outcome = relay
            .handle_analysis_request(TestType::Sat, &sat_fields(), Conversation::new())
            .await
            .unwrap();

        assert_eq!(outcome.reply, "What did you divide by?");
        assert_eq!(outcome.conversation.len(), 2);
        assert_eq!(outcome.conversation.messages()[1].role(), Role::Assistant);

        let built = prompt::build_prompt(TestType::Sat, &sat_fields());
        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].system, built.system_prompt);
        assert_eq!(sent[0].max_tokens, 1024);
        assert_eq!(sent[0].messages.len(), 1);
        assert_eq!(sent[0].messages.messages()[0].role(), Role::User);
        assert_eq!(sent[0].messages.messages()[0].content(), built.user_message);
    }

    #[tokio::test]
    async fn test_continuing_appends_exactly_one_reply() {
        let stub = Arc::new(StubProvider::with_reply("Good insight."));
        let relay = relay_with(stub.clone());
        let prior: Conversation = vec![
            Message::user("first"),
            Message::assistant("second"),
            Message::user("I think I confused necessary and sufficient"),
        ]
        .into();

        let outcome = relay
            .handle_analysis_request(TestType::Lsat, &FormFields::new(), prior.clone())
            .await
            .unwrap();

        assert_eq!(outcome.conversation.len(), prior.len() + 1);
        assert_eq!(
            &outcome.conversation.messages()[..prior.len()],
            prior.messages()
        );
        let last = outcome.conversation.last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), "Good insight.");

        let sent = stub.requests();
        assert_eq!(sent[0].messages, prior);
        assert_eq!(sent[0].system, prompt::system_prompt(TestType::Lsat));
    }

    #[tokio::test]
    async fn test_system_prompt_follows_test_type_not_history() {
        let stub = Arc::new(StubProvider::with_reply("ok"));
        let relay = relay_with(stub.clone());
        let prior: Conversation = vec![Message::user("an LSAT question")].into();

        relay
            .handle_analysis_request(TestType::Mcat, &FormFields::new(), prior)
            .await
            .unwrap();

        assert_eq!(stub.requests()[0].system, prompt::system_prompt(TestType::Mcat));
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let stub = Arc::new(StubProvider::with_error(ProviderError::Authentication(
            "invalid x-api-key".to_string(),
        )));
        let relay = relay_with(stub);

        let err = relay
            .handle_analysis_request(TestType::Sat, &sat_fields(), Conversation::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Authentication failed: invalid x-api-key");
    }

    #[tokio::test]
    async fn test_first_text_segment_is_used() {
        let stub = Arc::new(StubProvider::with_segments(vec![
            ContentSegment::Other("thinking".to_string()),
            ContentSegment::Text("first".to_string()),
            ContentSegment::Text("second".to_string()),
        ]));
        let relay = relay_with(stub);

        let outcome = relay
            .handle_analysis_request(TestType::Sat, &sat_fields(), Conversation::new())
            .await
            .unwrap();

        assert_eq!(outcome.reply, "first");
    }

    #[tokio::test]
    async fn test_reply_without_text_is_a_failure() {
        let stub = Arc::new(StubProvider::with_segments(vec![ContentSegment::Other(
            "tool_use".to_string(),
        )]));
        let relay = relay_with(stub);

        let err = relay
            .handle_analysis_request(TestType::Sat, &sat_fields(), Conversation::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Provider(ProviderError::EmptyReply)));
    }

    #[test]
    fn test_turn_kind() {
        assert_eq!(TurnKind::of(&Conversation::new()), TurnKind::FirstTurn);
        let prior: Conversation = vec![Message::user("x")].into();
        assert_eq!(TurnKind::of(&prior), TurnKind::Continuing);
    }
}
