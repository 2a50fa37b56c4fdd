//! Graph records returned by the Logseq API
//!
//! Only the fields this crate reads are named; everything else rides along in
//! `extra` so payloads pass through unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// == Journal Day ==
/// `journalDay` as sent by Logseq: usually an integer like `20240101`,
/// occasionally a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JournalDay {
    Number(i64),
    Text(String),
}

impl JournalDay {
    /// Numeric value used for ordering; non-numeric text counts as 0.
    pub fn as_i64(&self) -> i64 {
        match self {
            JournalDay::Number(n) => *n,
            JournalDay::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }

    /// Parses the `YYYYMMDD` form into a date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let raw = match self {
            JournalDay::Number(n) => n.to_string(),
            JournalDay::Text(s) => s.trim().to_string(),
        };
        if raw.len() != 8 {
            return None;
        }
        NaiveDate::parse_from_str(&raw, "%Y%m%d").ok()
    }
}

// == Page ==
/// A Logseq page, regular or journal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page name (Logseq lowercases this)
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Page name as the user typed it
    #[serde(
        rename = "originalName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// True for date-keyed journal pages
    #[serde(rename = "journal?", default, deserialize_with = "null_as_default")]
    pub journal: bool,
    /// Journal date as `YYYYMMDD`
    #[serde(
        rename = "journalDay",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub journal_day: Option<JournalDay>,
    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn journal_day_key(&self) -> i64 {
        self.journal_day.as_ref().map_or(0, JournalDay::as_i64)
    }
}

// == Page Reference ==
/// The page a block belongs to, as embedded in block payloads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// == Block ==
/// A node of page content, possibly nested and carrying properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Indentation level, 1 for top-level blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRef>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Block>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Top-level blocks have level 1; a missing level counts as top-level.
    pub fn is_top_level(&self) -> bool {
        self.level.unwrap_or(1) == 1
    }

    /// True if this block or any descendant contains a `[[` link marker.
    pub fn has_outgoing_link(&self) -> bool {
        self.content.contains("[[") || self.children.iter().any(Block::has_outgoing_link)
    }
}

/// Logseq sends `null` for some absent collections.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
