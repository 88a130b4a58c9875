use serde::{Deserialize, Serialize};

// ==============================================================================
// Article Content Blocks
// ==============================================================================

/// One renderable unit of an article body, in original document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, parts: Vec<InlineRun> },
    Paragraph { parts: Vec<InlineRun> },
    Image { url: String },
    Tweet { text: String, url: String, author: String },
}

/// A typed fragment within the text flow of a heading or paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineRun {
    Text { content: String },
    Link { url: String, text: String },
}

impl InlineRun {
    pub fn text(content: impl Into<String>) -> Self {
        InlineRun::Text { content: content.into() }
    }

    pub fn link(url: impl Into<String>, text: impl Into<String>) -> Self {
        InlineRun::Link { url: url.into(), text: text.into() }
    }
}
