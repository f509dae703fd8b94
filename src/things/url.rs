//! Things URL-scheme construction.
//!
//! Every mutation goes through `things:///<command>?...` URLs handed to the OS.

use std::fmt::Write as _;

/// URL scheme prefix.
pub const SCHEME: &str = "things";

/// Commands that require the URL-scheme authentication token.
const AUTHENTICATED_COMMANDS: &[&str] = &["update", "update-project"];

/// A loosely-typed URL parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValue {
    /// Plain text.
    Text(String),
    /// Rendered as `true`/`false`.
    Bool(bool),
    /// Comma-joined (tags, filters).
    List(Vec<String>),
    /// Newline-joined (checklist items, project to-dos).
    Lines(Vec<String>),
    /// Dropped from the URL.
    Absent,
}

impl UrlValue {
    /// Text from an optional string.
    #[must_use]
    pub fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Text(v.to_string()))
    }

    /// Boolean from an optional flag.
    #[must_use]
    pub fn flag(value: Option<bool>) -> Self {
        value.map_or(Self::Absent, Self::Bool)
    }

    /// Comma list from an optional list.
    #[must_use]
    pub fn list(value: Option<&[String]>) -> Self {
        value.map_or(Self::Absent, |v| Self::List(v.to_vec()))
    }

    /// Newline list from an optional list.
    #[must_use]
    pub fn lines(value: Option<&[String]>) -> Self {
        value.map_or(Self::Absent, |v| Self::Lines(v.to_vec()))
    }

    fn render(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::List(items) => Some(items.join(",")),
            Self::Lines(items) => Some(items.join("\n")),
            Self::Absent => None,
        }
    }
}

/// Ordered URL parameters.
pub type UrlParams = Vec<(&'static str, UrlValue)>;

/// Whether `command` needs the authentication token.
#[must_use]
pub fn requires_auth(command: &str) -> bool {
    AUTHENTICATED_COMMANDS.contains(&command)
}

/// Build a Things URL.
///
/// Absent values are dropped and every value is percent-encoded. For
/// commands that require authentication, `auth_token` is appended as
/// `auth-token` (and silently omitted when `None`).
#[must_use]
pub fn build(command: &str, mut params: UrlParams, auth_token: Option<&str>) -> String {
    if requires_auth(command) {
        params.push(("auth-token", UrlValue::text(auth_token)));
    }

    let mut url = format!("{SCHEME}:///{command}");
    let mut first = true;
    for (key, value) in &params {
        let Some(rendered) = value.render() else {
            continue;
        };
        let sep = if first { '?' } else { '&' };
        first = false;
        let _ = write!(url, "{sep}{key}={}", urlencoding::encode(&rendered));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_are_dropped_and_lists_comma_joined() {
        let url = build(
            "add",
            vec![
                ("title", UrlValue::Text("Buy milk".to_string())),
                ("completed", UrlValue::Absent),
                ("tags", UrlValue::List(vec!["x".to_string(), "y".to_string()])),
            ],
            None,
        );
        assert_eq!(url, "things:///add?title=Buy%20milk&tags=x%2Cy");
    }

    #[test]
    fn test_checklist_items_are_newline_joined() {
        let url = build(
            "add",
            vec![("checklist-items", UrlValue::Lines(vec!["a".to_string(), "b".to_string()]))],
            None,
        );
        assert_eq!(url, "things:///add?checklist-items=a%0Ab");
    }

    #[test]
    fn test_no_params_has_no_query_string() {
        assert_eq!(build("show", vec![("id", UrlValue::Absent)], None), "things:///show");
    }

    #[test]
    fn test_booleans_render_lowercase() {
        let url = build("add", vec![("completed", UrlValue::Bool(true))], None);
        assert_eq!(url, "things:///add?completed=true");
    }

    #[test]
    fn test_auth_token_only_for_authenticated_commands() {
        let params = || vec![("id", UrlValue::Text("abc".to_string()))];
        assert_eq!(
            build("update", params(), Some("tok")),
            "things:///update?id=abc&auth-token=tok"
        );
        assert_eq!(build("show", params(), Some("tok")), "things:///show?id=abc");
    }

    #[test]
    fn test_missing_auth_token_is_omitted() {
        let url = build("update-project", vec![("id", UrlValue::Text("p1".to_string()))], None);
        assert_eq!(url, "things:///update-project?id=p1");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let url = build("search", vec![("query", UrlValue::Text("a&b=c/d?".to_string()))], None);
        assert_eq!(url, "things:///search?query=a%26b%3Dc%2Fd%3F");
    }

    #[test]
    fn test_constructors_from_options() {
        assert_eq!(UrlValue::text(None), UrlValue::Absent);
        assert_eq!(UrlValue::flag(Some(false)), UrlValue::Bool(false));
        let tags = vec!["a".to_string()];
        assert_eq!(UrlValue::list(Some(&tags)), UrlValue::List(tags.clone()));
        assert_eq!(UrlValue::lines(None), UrlValue::Absent);
    }
}
