use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

// A question that has not been stored yet; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Which questions a quiz draws from.
///
/// Category `0` has always meant "every category" to quiz clients, so it parses
/// as [`CategoryScope::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    Category(i64),
}

impl CategoryScope {
    pub fn from_id(id: i64) -> Self {
        if id == 0 {
            CategoryScope::All
        } else {
            CategoryScope::Category(id)
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Some(CategoryScope::All);
        }
        s.parse::<i64>().ok().map(Self::from_id)
    }

    pub fn category_id(&self) -> Option<i64> {
        match self {
            CategoryScope::All => None,
            CategoryScope::Category(id) => Some(*id),
        }
    }
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryScope::All => write!(f, "all"),
            CategoryScope::Category(id) => write!(f, "{}", id),
        }
    }
}

// On-disk dataset accepted by `trivia import`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

// JSON envelope for CLI output
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn err(code: u16, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(code),
            message: Some(msg.into()),
        }
    }
}
