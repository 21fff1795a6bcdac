use serde::{Deserialize, Serialize};

/// Severity assigned to one line of build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Standard,
    Warning,
    Error,
}

/// Display tag carried by every [`RenderEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Normal,
    Warning,
    Error,
    HighlightGreen,
    HighlightBlue,
}

impl From<Category> for Tag {
    fn from(category: Category) -> Self {
        match category {
            Category::Standard => Tag::Normal,
            Category::Warning => Tag::Warning,
            Category::Error => Tag::Error,
        }
    }
}

/// A piece of text bound for the viewer, together with how to color it.
///
/// Events are emitted in display order; concatenating their `text` fields
/// reproduces the transcript, including the padding newlines the highlighter adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEvent {
    pub text: String,
    pub tag: Tag,
}

impl RenderEvent {
    pub fn new(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, Tag::Normal)
    }
}

/// How a highlight marker is sliced out of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Label followed by a whitespace-delimited token (`Environment mega2560`).
    Prefix,
    /// Status word wrapped in brackets (`[SUCCESS]`).
    Bracketed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightRule {
    pub marker: &'static str,
    pub kind: MarkerKind,
    pub tag: Tag,
}
