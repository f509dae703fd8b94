//! AppleScript templates for Apple Notes.
//!
//! Every user-supplied string passes through [`escape`] before it is placed
//! inside a script string literal.

/// How multiple search terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermMatch {
    /// Title must contain every term.
    All,
    /// Title must contain at least one term.
    Any,
}

impl TermMatch {
    const fn keyword(self) -> &'static str {
        match self {
            Self::All => " and ",
            Self::Any => " or ",
        }
    }
}

/// Escape a string for use inside an AppleScript double-quoted literal.
#[must_use]
pub fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Convert plain text into the HTML body Notes expects.
///
/// Each line becomes a `<div>`; blank lines become `<div>&nbsp;</div>` so
/// Notes keeps them.
#[must_use]
pub fn format_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                "<div>&nbsp;</div>".to_string()
            } else {
                format!("<div>{}</div>", escape(line))
            }
        })
        .collect()
}

fn tell_account(account: &str, command: &str) -> String {
    format!(r#"tell application "Notes" to tell account "{}" to {command}"#, escape(account))
}

/// Script that creates a note.
#[must_use]
pub fn create(account: &str, title: &str, content: &str) -> String {
    tell_account(
        account,
        &format!(
            r#"make new note with properties {{name:"{}", body:"{}"}}"#,
            escape(title),
            format_content(content)
        ),
    )
}

/// Script that returns the titles of notes matching `terms`.
#[must_use]
pub fn search(account: &str, terms: &[&str], mode: TermMatch) -> String {
    let clause = terms
        .iter()
        .map(|term| format!(r#"name contains "{}""#, escape(term)))
        .collect::<Vec<_>>()
        .join(mode.keyword());
    tell_account(account, &format!("get name of notes where {clause}"))
}

/// Script that returns the HTML body of a note.
#[must_use]
pub fn body(account: &str, title: &str) -> String {
    tell_account(account, &format!(r#"get body of note "{}""#, escape(title)))
}

/// Script that returns the titles of every note.
#[must_use]
pub fn list(account: &str) -> String {
    tell_account(account, "get name of notes")
}

/// Script that brings Notes forward and shows a note, printing `true` or `false`.
#[must_use]
pub fn open(account: &str, title: &str) -> String {
    format!(
        r#"tell application "Notes"
    activate
    tell account "{}"
        try
            show note "{}"
            return true
        on error
            return false
        end try
    end tell
end tell"#,
        escape(account),
        escape(title)
    )
}

/// Script that deletes a note.
#[must_use]
pub fn delete(account: &str, title: &str) -> String {
    tell_account(account, &format!(r#"delete note "{}""#, escape(title)))
}

/// Split interpreter list output (`a, b, c`) into titles.
///
/// Titles that themselves contain commas are split too.
#[must_use]
pub fn parse_titles(output: &str) -> Vec<String> {
    output.split(',').map(str::trim).filter(|t| !t.is_empty()).map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape(r"trailing\"), r"trailing\\");
    }

    #[test]
    fn test_format_content() {
        assert_eq!(format_content("a\n\nb"), "<div>a</div><div>&nbsp;</div><div>b</div>");
        assert_eq!(format_content(""), "");
        assert_eq!(format_content(r#"x "y""#), r#"<div>x \"y\"</div>"#);
    }

    #[test]
    fn test_create_script() {
        let script = create("iCloud", "Plan", "line");
        assert_eq!(
            script,
            r#"tell application "Notes" to tell account "iCloud" to make new note with properties {name:"Plan", body:"<div>line</div>"}"#
        );
    }

    #[test]
    fn test_search_scripts() {
        assert_eq!(
            search("iCloud", &["Alpha", "Review"], TermMatch::All),
            r#"tell application "Notes" to tell account "iCloud" to get name of notes where name contains "Alpha" and name contains "Review""#
        );
        assert!(search("iCloud", &["a", "b"], TermMatch::Any)
            .ends_with(r#"name contains "a" or name contains "b""#));
        assert!(search("iCloud", &["Beta"], TermMatch::Any)
            .ends_with(r#"where name contains "Beta""#));
    }

    #[test]
    fn test_simple_scripts() {
        assert!(body("iCloud", "T").ends_with(r#"get body of note "T""#));
        assert!(list("iCloud").ends_with("get name of notes"));
        assert!(delete("iCloud", "T").ends_with(r#"delete note "T""#));
        let open_script = open("iCloud", r#"Q"uote"#);
        assert!(open_script.contains(r#"show note "Q\"uote""#));
        assert!(open_script.contains("activate"));
    }

    #[test]
    fn test_parse_titles() {
        assert_eq!(parse_titles("Alpha, Beta ,Gamma"), vec!["Alpha", "Beta", "Gamma"]);
        assert!(parse_titles("").is_empty());
        assert!(parse_titles(" , ").is_empty());
    }

    /// Count double quotes that are not escaped by a preceding backslash run.
    fn unescaped_quotes(s: &str) -> usize {
        let mut count = 0;
        let mut backslashes = 0;
        for c in s.chars() {
            match c {
                '\\' => backslashes += 1,
                '"' => {
                    if backslashes % 2 == 0 {
                        count += 1;
                    }
                    backslashes = 0;
                }
                _ => backslashes = 0,
            }
        }
        count
    }

    proptest! {
        #[test]
        fn escaped_text_never_closes_the_literal(input in ".*") {
            prop_assert_eq!(unescaped_quotes(&escape(&input)), 0);
        }

        #[test]
        fn delete_script_has_fixed_quote_structure(title in ".*", account in "[A-Za-z]{1,10}") {
            // "Notes", account, title: three literals, six bare quotes
            prop_assert_eq!(unescaped_quotes(&delete(&account, &title)), 6);
        }
    }
}
