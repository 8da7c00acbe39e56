use serde::{Deserialize, Serialize};

/// Case document with extracted plain text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source-specific identifier (Kanoon tid, file path)
    pub id: String,

    pub title: String,

    /// Extracted text
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}
