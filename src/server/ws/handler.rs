use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use chrono::Utc;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};

use super::protocol::WsIncomingMessage;
use crate::core::errors::ChatError;
use crate::llm::LlmProvider;
use crate::rag::{compose_context_message, Retriever};
use crate::session::ChatSession;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // The session is owned by this connection and dropped with it.
    let mut session = ChatSession::new(&state.settings.chat.system_prompt);
    tracing::info!("Chat session {} started", session.id());

    let _ = send_json(
        &mut sender,
        json!({
            "type": "welcome",
            "message": state.settings.chat.welcome_message,
            "sessionId": session.id(),
            "timestamp": Utc::now().to_rfc3339(),
        }),
    )
    .await;

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let Ok(incoming) = serde_json::from_str::<WsIncomingMessage>(&text) else {
                    continue;
                };
                if handle_message(&mut sender, &state, &mut session, incoming)
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    tracing::info!("Chat session {} ended", session.id());
}

async fn handle_message(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    session: &mut ChatSession,
    incoming: WsIncomingMessage,
) -> Result<(), ChatError> {
    if incoming.msg_type.as_deref() == Some("reset") {
        session.reset();
        return send_json(sender, json!({"type": "reset"})).await;
    }

    let message_text = incoming.message.unwrap_or_default();
    if message_text.trim().is_empty() {
        return Ok(());
    }

    match run_turn(
        &state.retriever,
        state.llm.as_ref(),
        session,
        &message_text,
    )
    .await
    {
        Ok(reply) => {
            send_json(
                sender,
                json!({
                    "type": "reply",
                    "message": reply,
                    "timestamp": Utc::now().to_rfc3339(),
                }),
            )
            .await
        }
        Err(err) => {
            tracing::error!("Turn failed for session {}: {}", session.id(), err);
            send_json(
                sender,
                json!({"type": "error", "message": user_facing_message(&err)}),
            )
            .await
        }
    }
}

/// Run one chat turn: record the user turn, retrieve context, inject the
/// auxiliary turn when context was found, and complete.
///
/// The user turn is recorded before retrieval, so a retrieval failure leaves
/// the session with the question appended and no assistant turn.
pub async fn run_turn(
    retriever: &Retriever,
    llm: &dyn LlmProvider,
    session: &mut ChatSession,
    message: &str,
) -> Result<String, ChatError> {
    session.push_user(message);

    let snippets = retriever.retrieve(message).await?;
    if let Some(context) = compose_context_message(&snippets) {
        session.inject_context(context);
    }

    let reply = llm.chat(session.messages()).await?;
    session.push_assistant(&reply);

    Ok(reply)
}

/// Map an error to the single human-readable message shown to the user.
fn user_facing_message(err: &ChatError) -> String {
    match err {
        ChatError::Provider(_) => {
            "A backing service is unavailable right now. Please try again.".to_string()
        }
        ChatError::Shape(_) => {
            "The retrieval service returned an unusable response. Please try again.".to_string()
        }
        ChatError::Config(_) => "The assistant is misconfigured.".to_string(),
    }
}

async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    payload: Value,
) -> Result<(), ChatError> {
    let text = serde_json::to_string(&payload).map_err(ChatError::provider)?;
    sender
        .send(Message::Text(text))
        .await
        .map_err(ChatError::provider)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::core::config::settings::RetrievalSettings;
    use crate::embedding::RawEmbedding;
    use crate::rag::testing::{
        index_match, FailingEmbedder, FailingLlm, FakeEmbedder, FakeIndex, FakeLlm,
    };

    const SEED: &str = "You are a helpful assistant.";

    fn retriever_with(
        embedder: impl crate::embedding::Embedder + 'static,
        matches: Vec<crate::index::IndexMatch>,
    ) -> Retriever {
        Retriever::new(
            Arc::new(embedder),
            Arc::new(FakeIndex { matches }),
            RetrievalSettings {
                top_k: 3,
                score_threshold: 0.3,
                dimension: 3,
            },
        )
    }

    #[tokio::test]
    async fn turn_injects_context_and_appends_reply() {
        let retriever = retriever_with(
            FakeEmbedder {
                response: RawEmbedding::Flat(vec![0.1, 0.2, 0.3]),
            },
            vec![
                index_match("a", 0.9, Some("Grad year: 2024")),
                index_match("b", 0.1, Some("unrelated")),
            ],
        );
        let llm = FakeLlm::replying("The requirement is graduation in 2024.");
        let mut session = ChatSession::new(SEED);

        let reply = run_turn(
            &retriever,
            &llm,
            &mut session,
            "What is the graduation year requirement?",
        )
        .await
        .unwrap();
        assert_eq!(reply, "The requirement is graduation in 2024.");

        // The provider saw seed, auxiliary context, then the question.
        let calls = llm.calls.lock().unwrap();
        let sent = &calls[0];
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].role, "system");
        assert_eq!(sent[0].content, SEED);
        assert_eq!(sent[1].role, "system");
        assert_eq!(sent[1].content, "Relevant Documents: \nGrad year: 2024");
        assert_eq!(sent[2].role, "user");
        assert_eq!(sent[2].content, "What is the graduation year requirement?");

        // The reply was appended to the session.
        let turns = session.messages();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[3].role, "assistant");
        assert_eq!(turns[3].content, "The requirement is graduation in 2024.");
    }

    #[tokio::test]
    async fn turn_without_context_leaves_conversation_unmodified() {
        let retriever = retriever_with(
            FakeEmbedder {
                response: RawEmbedding::Flat(vec![0.1, 0.2, 0.3]),
            },
            vec![index_match("a", 0.05, Some("noise"))],
        );
        let llm = FakeLlm::replying("General answer.");
        let mut session = ChatSession::new(SEED);

        run_turn(&retriever, &llm, &mut session, "Anything new?")
            .await
            .unwrap();

        let calls = llm.calls.lock().unwrap();
        let sent = &calls[0];
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, "system");
        assert_eq!(sent[1].role, "user");
    }

    #[tokio::test]
    async fn embedding_failure_leaves_only_the_user_turn_appended() {
        let retriever = retriever_with(FailingEmbedder, vec![]);
        let llm = FakeLlm::replying("never sent");
        let mut session = ChatSession::new(SEED);

        let err = run_turn(&retriever, &llm, &mut session, "Hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));

        // No LLM call, no assistant turn; the question stays recorded.
        assert!(llm.calls.lock().unwrap().is_empty());
        let turns = session.messages();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].role, "user");
        assert_eq!(turns[1].content, "Hello?");
    }

    #[tokio::test]
    async fn completion_failure_surfaces_as_provider_error() {
        let retriever = retriever_with(
            FakeEmbedder {
                response: RawEmbedding::Flat(vec![0.1, 0.2, 0.3]),
            },
            vec![index_match("a", 0.9, Some("doc"))],
        );
        let mut session = ChatSession::new(SEED);

        let err = run_turn(&retriever, &FailingLlm, &mut session, "Hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));
        assert_ne!(session.messages().last().unwrap().role, "assistant");
    }

    #[test]
    fn error_messages_are_variant_specific() {
        let provider = user_facing_message(&ChatError::Provider("x".to_string()));
        let shape = user_facing_message(&ChatError::Shape("x".to_string()));
        assert_ne!(provider, shape);
    }
}
