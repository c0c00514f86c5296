use crate::llm::ChatMessage;

/// Conversation history for one chat connection.
///
/// Owned by the connection handler and dropped when the connection closes;
/// there is no shared session store. Turns are appended, never reordered or
/// pruned.
#[derive(Debug)]
pub struct ChatSession {
    id: String,
    system_prompt: String,
    turns: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a session seeded with the system prompt turn.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            turns: vec![ChatMessage::system(system_prompt.clone())],
            system_prompt,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.turns
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatMessage::assistant(content));
    }

    /// Insert the auxiliary retrieved-context turn immediately before the
    /// pending user turn, so the provider sees it ahead of the question.
    pub fn inject_context(&mut self, message: ChatMessage) {
        let at = self.turns.len().saturating_sub(1);
        self.turns.insert(at, message);
    }

    /// Drop all history and reseed with the system prompt.
    pub fn reset(&mut self) {
        self.turns = vec![ChatMessage::system(self.system_prompt.clone())];
    }
}
