use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message. Never modified once appended to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Message {
    pub fn user(id: u64, content: String) -> Self {
        Self {
            id,
            content,
            author: Author::User,
            timestamp: Local::now(),
            category: None,
        }
    }

    pub fn assistant(id: u64, content: String, category: Option<String>) -> Self {
        Self {
            id,
            content,
            author: Author::Assistant,
            timestamp: Local::now(),
            category,
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Preset query offered next to the input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub query: String,
    pub category: String,
}

impl QuickAction {
    pub fn new(label: &str, icon: &str, query: &str, category: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: icon.to_string(),
            query: query.to_string(),
            category: category.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_authorship() {
        let user = Message::user(2, "hello".to_string());
        assert!(user.is_user());
        assert_eq!(user.category, None);

        let reply = Message::assistant(3, "hi".to_string(), Some("dining".to_string()));
        assert!(!reply.is_user());
        assert_eq!(reply.author, Author::Assistant);
        assert_eq!(reply.category.as_deref(), Some("dining"));
    }

    #[test]
    fn test_message_json_omits_missing_category() {
        let user = Message::user(1, "hello".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["author"], "user");
        assert!(json.get("category").is_none());
    }
}
