//! Typed TestRail entities as they come off the wire.
//!
//! Custom fields that a suite template does not define are simply absent from
//! the API payload, so every custom field is optional here. Unknown keys are
//! ignored.

use crate::pager::{CaseLink, Named};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::fmt;

/// Case identifiers are numeric in TestRail, but some proxies and exports
/// hand them back as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseId {
    Number(u64),
    Text(String),
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseId::Number(n) => write!(f, "{n}"),
            CaseId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for CaseId {
    fn from(id: u64) -> Self {
        CaseId::Number(id)
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub content: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub expected: String,
}

impl Step {
    pub fn new(content: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            expected: expected.into(),
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.content.contains(text) || self.expected.contains(text)
    }
}

/// A single test case.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub title: String,
    #[serde(rename = "custom_notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "custom_preconds", default)]
    pub preconditions: Option<String>,
    #[serde(rename = "custom_custom_comments", default)]
    pub comments: Option<String>,
    #[serde(rename = "custom_steps_separated", default)]
    pub steps: Option<Vec<Step>>,
}

impl Case {
    pub fn new(id: impl Into<CaseId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            notes: None,
            preconditions: None,
            comments: None,
            steps: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_preconditions(mut self, preconditions: impl Into<String>) -> Self {
        self.preconditions = Some(preconditions.into());
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = Some(steps);
        self
    }
}

impl CaseLink for Case {
    fn case_id(&self) -> String {
        self.id.to_string()
    }

    fn case_title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

impl Named for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub id: u64,
    pub name: String,
}

impl Named for Suite {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The authenticated account, as returned by `get_user_by_email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}
