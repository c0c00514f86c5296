use crate::llm::ChatMessage;

const CONTEXT_LABEL: &str = "Relevant Documents: ";

/// Wrap retrieved snippets into a single auxiliary `system` turn.
///
/// Snippets are joined in rank order with a blank line between them. An
/// empty context produces no message; the conversation is left untouched
/// for that turn.
pub fn compose_context_message(snippets: &[String]) -> Option<ChatMessage> {
    if snippets.is_empty() {
        return None;
    }

    Some(ChatMessage::system(format!(
        "{}\n{}",
        CONTEXT_LABEL,
        snippets.join("\n\n")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_snippets_with_blank_line() {
        let msg =
            compose_context_message(&["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, "Relevant Documents: \nA\n\nB");
    }

    #[test]
    fn single_snippet_has_no_separator() {
        let msg = compose_context_message(&["only".to_string()]).unwrap();
        assert_eq!(msg.content, "Relevant Documents: \nonly");
    }

    #[test]
    fn empty_context_emits_no_message() {
        assert!(compose_context_message(&[]).is_none());
    }
}
