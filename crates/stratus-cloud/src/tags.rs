//! Resource tagging
//!
//! Every resource created by stratus carries the same base tags:
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `Name` | Logical resource name from the configuration |
//! | `Environment` | Environment name |
//! | `Created` | RFC 3339 creation timestamp (may be suppressed) |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TAG_NAME: &str = "Name";
pub const TAG_ENVIRONMENT: &str = "Environment";
pub const TAG_CREATED: &str = "Created";

/// Key/value tag as sent to AWS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn format_created_at(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// `Name` + `Environment` only
pub fn base_tags(name: &str, environment: &str) -> Vec<Tag> {
    vec![Tag::new(TAG_NAME, name), Tag::new(TAG_ENVIRONMENT, environment)]
}

/// Append the `Created` tag unless suppressed.
pub fn with_created(mut tags: Vec<Tag>, add_created: bool) -> Vec<Tag> {
    if add_created {
        tags.push(Tag::new(TAG_CREATED, format_created_at(Utc::now())));
    }
    tags
}
