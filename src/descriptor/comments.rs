use std::collections::HashMap;
use std::fmt;

use prost_types::source_code_info::Location;
use prost_types::SourceCodeInfo;

/// Comments attached to a single descriptor in the source `.proto` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Comment block directly above the declaration
    pub leading: String,

    /// Comment on the same line as, or directly below, the declaration
    pub trailing: String,
}

impl Comments {
    fn from_location(location: &Location) -> Self {
        Comments {
            leading: scrub(location.leading_comments.as_deref().unwrap_or_default()),
            trailing: scrub(location.trailing_comments.as_deref().unwrap_or_default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

/// Leading and trailing text joined by a newline, trimmed.
impl fmt::Display for Comments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::with_capacity(self.leading.len() + self.trailing.len() + 1);
        if !self.leading.is_empty() {
            text.push_str(&self.leading);
            text.push('\n');
        }
        text.push_str(&self.trailing);
        f.write_str(text.trim())
    }
}

// protoc keeps the single space that follows `//` on every line
fn scrub(raw: &str) -> String {
    raw.replace("\n ", "\n").trim().to_string()
}

/// Comments of one file keyed by their descriptor path
#[derive(Debug, Default)]
pub(crate) struct CommentIndex {
    entries: HashMap<Vec<i32>, Comments>,
}

impl CommentIndex {
    pub(crate) fn new(info: Option<&SourceCodeInfo>) -> Self {
        let mut entries = HashMap::new();
        if let Some(info) = info {
            for location in &info.location {
                let comments = Comments::from_location(location);
                if !comments.is_empty() {
                    entries.insert(location.path.clone(), comments);
                }
            }
        }
        CommentIndex { entries }
    }

    pub(crate) fn get(&self, path: &[i32]) -> Comments {
        self.entries.get(path).cloned().unwrap_or_default()
    }
}
