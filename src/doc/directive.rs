use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

const EXCLUDE_TAG: &str = "@exclude";
const REQUIRED_TAG: &str = "@required";
const TITLE_TAG: &str = "@title";
const ACTION_TAG: &str = "@action";
const VERSION_TAG: &str = "@version";

lazy_static! {
    // `.` stops at the line break, so each tag captures the rest of its line.
    static ref TITLE_RE: Regex = Regex::new(r"@title.*").unwrap();
    static ref ACTION_RE: Regex = Regex::new(r"@action.*").unwrap();
    static ref VERSION_RE: Regex = Regex::new(r"@version.*").unwrap();
}

/// Control tags found in a comment, plus the comment with the tags removed.
///
/// Parsing happens once, up front: `@exclude` is removed wherever it occurs, then
/// the first `@title`, `@action` and `@version` lines are taken in that order.
/// A taken line is removed from the description everywhere it appears verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub description: String,
    pub exclude: bool,
    pub title: String,
    pub action: String,
    pub version: String,
}

impl Directives {
    pub fn parse(comment: &str) -> Self {
        let mut description = comment.to_string();

        let exclude = strip_flag(&mut description, EXCLUDE_TAG);
        let title = strip_line(&mut description, &TITLE_RE, TITLE_TAG);
        let action = strip_line(&mut description, &ACTION_RE, ACTION_TAG);
        let version = strip_line(&mut description, &VERSION_RE, VERSION_TAG);

        if exclude || !title.is_empty() || !action.is_empty() || !version.is_empty() {
            debug!(
                "Directives: exclude={} title={:?} action={:?} version={:?}",
                exclude, title, action, version
            );
        }

        Directives {
            description,
            exclude,
            title,
            action,
            version,
        }
    }
}

/// Remove every `@required` tag from a field comment, reporting whether one was present
pub fn strip_required(description: &mut String) -> bool {
    strip_flag(description, REQUIRED_TAG)
}

fn strip_flag(text: &mut String, tag: &str) -> bool {
    if !text.contains(tag) {
        return false;
    }
    *text = text.replace(tag, "");
    true
}

fn strip_line(text: &mut String, pattern: &Regex, tag: &str) -> String {
    let line = match pattern.find(text) {
        Some(m) => m.as_str().to_string(),
        None => return String::new(),
    };
    *text = text.replace(&line, "");
    line.replace(tag, "").trim().to_string()
}
