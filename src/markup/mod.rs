pub mod adf;
pub mod jira_md;

use serde::{Deserialize, Deserializer, Serialize};

pub use adf::AdfDocument;
pub use jira_md::{from_jira_md, to_jira_md};

/// Body of a stored comment.
///
/// Cloud instances answer the v3 API with an ADF document while Server/Data
/// Center instances return Jira wiki markup as a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentBody {
    Document(AdfDocument),
    Markup(String),
}

impl Default for CommentBody {
    fn default() -> Self {
        CommentBody::Markup(String::new())
    }
}

impl CommentBody {
    /// Normalizes the stored body into editable markdown.
    pub fn to_markdown(&self) -> String {
        match self {
            CommentBody::Document(doc) => adf::to_markdown(doc),
            CommentBody::Markup(text) => from_jira_md(text),
        }
    }

    /// Deserializes a body that Jira may send as `null`.
    pub(crate) fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<CommentBody>::deserialize(deserializer)?.unwrap_or_default())
    }
}
