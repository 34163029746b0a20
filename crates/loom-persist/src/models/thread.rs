use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A conversation. Field names match the persisted camelCase layout.
///
/// `messagesCount`, `updatedAt`, `lastMessageAt` and (initially) `title` are
/// aggregates maintained as side effects of message writes, not authoritative
/// over message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_message_at: DateTime<Utc>,
    pub messages_count: i64,
}

const TITLE_MAX_CHARS: usize = 50;

/// Derive a thread title from the first user message: the first 50 chars,
/// trailing whitespace trimmed, with `"..."` appended iff the content was
/// longer than 50 chars.
pub fn derive_title(content: &str) -> String {
    let prefix: String = content.chars().take(TITLE_MAX_CHARS).collect();
    let mut title = prefix.trim().to_string();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_kept_verbatim() {
        assert_eq!(derive_title("Hello"), "Hello");
    }

    #[test]
    fn exactly_fifty_chars_gets_no_ellipsis() {
        let content = "a".repeat(50);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn long_content_is_cut_at_fifty_with_ellipsis() {
        let content = "a".repeat(80);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
        assert!(title.starts_with(&"a".repeat(50)));
    }

    #[test]
    fn trailing_whitespace_inside_cut_is_trimmed() {
        let content = format!("{} {}", "a".repeat(49), "b".repeat(30));
        let title = derive_title(&content);
        assert_eq!(title, format!("{}...", "a".repeat(49)));
    }

    #[test]
    fn multibyte_content_cuts_on_char_boundary() {
        let content = "é".repeat(60);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 53);
    }
}
