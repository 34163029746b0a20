//! Bounded history assembly.
//!
//! Turns a thread's stored messages into the window presented to the model:
//! at most `n_latest` recent messages kept under an approximate token
//! budget, with chronological order preserved.

use loom_llm::ChatTurn;
use loom_persist::StoredMessage;

/// Approximate token cost of a piece of content: one token per four
/// characters, rounded up.
pub fn approx_tokens(content: &str) -> usize {
    content.chars().count().div_ceil(4)
}

/// Build the model-input window from `messages` (ordered oldest-first).
///
/// Walks from the most recent message backwards, accumulating approximate
/// token costs, and stops before the first message that would push the
/// total over `max_tokens`. The most recent message is never dropped: when
/// it alone exceeds the budget, its content is truncated instead and it
/// becomes the whole window.
pub fn build_history(
    messages: &[StoredMessage],
    n_latest: usize,
    max_tokens: usize,
) -> Vec<ChatTurn> {
    if messages.is_empty() || n_latest == 0 {
        return Vec::new();
    }

    let window = &messages[messages.len().saturating_sub(n_latest)..];
    let newest = window.len() - 1;

    let mut selected: Vec<ChatTurn> = Vec::new();
    let mut spent = 0usize;

    for (i, message) in window.iter().enumerate().rev() {
        let cost = approx_tokens(&message.content);

        if i == newest {
            if cost > max_tokens {
                let mut turn = message.as_turn();
                turn.content = truncate_chars(&turn.content, max_tokens * 4);
                selected.push(turn);
                break;
            }
            spent += cost;
            selected.push(message.as_turn());
            continue;
        }

        if spent + cost > max_tokens {
            break;
        }
        spent += cost;
        selected.push(message.as_turn());
    }

    selected.reverse();
    selected
}

fn truncate_chars(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loom_llm::Role;
    use loom_persist::{MessageRole, ObjectId};

    fn msg(role: MessageRole, content: &str) -> StoredMessage {
        StoredMessage {
            id: ObjectId::new(),
            thread_id: ObjectId::new(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            model: None,
            usage: None,
            latency_ms: None,
        }
    }

    fn conversation(contents: &[&str]) -> Vec<StoredMessage> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let role = if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                msg(role, c)
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(build_history(&[], 10, 100).is_empty());
    }

    #[test]
    fn zero_window_yields_empty_output() {
        let messages = conversation(&["hello", "hi"]);
        assert!(build_history(&messages, 0, 100).is_empty());
    }

    #[test]
    fn window_caps_message_count() {
        let messages = conversation(&["one", "two", "three", "four", "five"]);
        let history = build_history(&messages, 2, 1000);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "four");
        assert_eq!(history[1].content, "five");
    }

    #[test]
    fn output_is_chronological_oldest_first() {
        let messages = conversation(&["first", "second", "third"]);
        let history = build_history(&messages, 10, 1000);

        let contents: Vec<&str> = history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn budget_drops_oldest_messages_first() {
        // 20 chars each => 5 tokens each; budget of 12 fits the two newest.
        let messages = conversation(&[&"a".repeat(20), &"b".repeat(20), &"c".repeat(20)]);
        let history = build_history(&messages, 10, 12);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "b".repeat(20));
        assert_eq!(history[1].content, "c".repeat(20));
    }

    #[test]
    fn budget_bound_holds() {
        let messages = conversation(&["aaaa", "bbbbbbbb", "cccc", "dddddddd"]);
        for budget in 0..10 {
            let history = build_history(&messages, 10, budget);
            if history.len() > 1 {
                let total: usize = history.iter().map(|t| approx_tokens(&t.content)).sum();
                assert!(total <= budget, "budget {} exceeded: {}", budget, total);
            }
        }
    }

    #[test]
    fn newest_message_survives_even_over_budget() {
        let messages = conversation(&[&"x".repeat(400)]);
        let history = build_history(&messages, 10, 10);

        assert_eq!(history.len(), 1);
        // 10 tokens => 40 chars of content kept.
        assert_eq!(history[0].content, "x".repeat(40));
    }

    #[test]
    fn oversized_history_collapses_to_truncated_newest() {
        let messages = conversation(&[&"a".repeat(400), &"b".repeat(400), &"c".repeat(400)]);
        let history = build_history(&messages, 10, 5);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "c".repeat(20));
    }

    #[test]
    fn exact_budget_fit_is_not_truncated() {
        // 40 chars => exactly 10 tokens.
        let messages = conversation(&[&"y".repeat(40)]);
        let history = build_history(&messages, 10, 10);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "y".repeat(40));
    }

    #[test]
    fn approx_tokens_rounds_up() {
        assert_eq!(approx_tokens(""), 0);
        assert_eq!(approx_tokens("a"), 1);
        assert_eq!(approx_tokens("abcd"), 1);
        assert_eq!(approx_tokens("abcde"), 2);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let messages = conversation(&["one", "two", "three"]);
        let a = build_history(&messages, 2, 100);
        let b = build_history(&messages, 2, 100);
        assert_eq!(a, b);
    }
}
