// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyword dictionary: groups of choices supplied once per page.
//!
//! The content collaborator sends a JSON object mapping group names to choice
//! lists. Choices have a `title`, usually an `ORG_SLUG`, and any number of
//! other fields addressable by marker name:
//!
//! ```
//! use docwords_selector::Dictionary;
//!
//! let dict = Dictionary::from_json(r#"{
//!     "PROJECT": [
//!         {"title": "web", "ORG_SLUG": "acme", "DSN": "https://key@o1.ingest/1", "PROJECT_ID": 1}
//!     ],
//!     "USER": [{"title": "Jane"}]
//! }"#).unwrap();
//!
//! let web = dict.choice("PROJECT", 0).unwrap();
//! assert_eq!(web.field("DSN").as_deref(), Some("https://key@o1.ingest/1"));
//! assert_eq!(web.field("PROJECT_ID").as_deref(), Some("1"));
//! assert!(dict.is_authenticated());
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Group holding the viewer's projects; also the token flow's "current project".
pub const PROJECT_GROUP: &str = "PROJECT";

/// Group whose presence signals a signed-in viewer.
pub const USER_GROUP: &str = "USER";

/// Field naming a choice's owning organization.
pub const ORG_SLUG_FIELD: &str = "ORG_SLUG";

/// One alternative within a group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Display title, shown in dropdowns and tooltips.
    #[serde(default)]
    pub title: String,
    /// Owning organization slug.
    #[serde(rename = "ORG_SLUG", default, skip_serializing_if = "Option::is_none")]
    pub org_slug: Option<String>,
    /// Every other field, keyed by marker field name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Choice {
    /// Create a choice with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: set the owning organization.
    pub fn with_org(mut self, slug: impl Into<String>) -> Self {
        self.org_slug = Some(slug.into());
        self
    }

    /// Builder: set an extension field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Look up a field by marker name.
    ///
    /// `title` and `ORG_SLUG` resolve to the typed fields. Extension strings
    /// are borrowed, numbers and booleans are formatted, and `null`, arrays,
    /// and objects are treated as absent.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "title" => Some(Cow::Borrowed(&self.title)),
            ORG_SLUG_FIELD => self.org_slug.as_deref().map(Cow::Borrowed),
            _ => match self.extra.get(name)? {
                Value::String(s) => Some(Cow::Borrowed(s)),
                Value::Number(n) => Some(Cow::Owned(n.to_string())),
                Value::Bool(b) => Some(Cow::Owned(b.to_string())),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            },
        }
    }

    /// Whether this choice belongs to organization `slug`.
    pub fn belongs_to(&self, slug: &str) -> bool {
        self.org_slug.as_deref() == Some(slug)
    }
}

/// Immutable mapping from group name to its ordered choices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    groups: BTreeMap<String, Vec<Choice>>,
}

impl Dictionary {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the content collaborator's payload.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Dictionary)
    }

    /// Builder: set the choices of `group`.
    pub fn with_group(mut self, group: impl Into<String>, choices: Vec<Choice>) -> Self {
        self.groups.insert(group.into(), choices);
        self
    }

    /// Choices of `group`, or `None` if the group is absent.
    pub fn group(&self, group: &str) -> Option<&[Choice]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Choices of `group`; empty if the group is absent.
    pub fn choices(&self, group: &str) -> &[Choice] {
        self.group(group).unwrap_or(&[])
    }

    /// The choice at `index` in `group`.
    pub fn choice(&self, group: &str, index: usize) -> Option<&Choice> {
        self.choices(group).get(index)
    }

    /// Group names in order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Whether the viewer is signed in: the `USER` group exists and is non-empty.
    pub fn is_authenticated(&self) -> bool {
        !self.choices(USER_GROUP).is_empty()
    }

    /// Distinct organization slugs of the project choices, in first-seen order.
    pub fn org_slugs(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for slug in self
            .choices(PROJECT_GROUP)
            .iter()
            .filter_map(|c| c.org_slug.as_deref())
        {
            if !out.contains(&slug) {
                out.push(slug);
            }
        }
        out
    }

    /// Index of the first project belonging to `slug`.
    pub fn first_project_of(&self, slug: &str) -> Option<usize> {
        self.choices(PROJECT_GROUP)
            .iter()
            .position(|c| c.belongs_to(slug))
    }
}
