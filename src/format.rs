//! Human-readable rendering of Things records.
//!
//! Every renderer produces lines that are either `Label: value` or indented
//! by two spaces, so a record never contains an empty line and therefore
//! never contains [`SEPARATOR`].

use crate::notes::Note;
use crate::things::{Area, ChecklistItem, Project, Status, Tag, Todo};
use chrono::NaiveDate;

/// Separator placed between records.
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Sentinel for empty list views and tag/search listings.
pub const NO_ITEMS: &str = "No items found";
/// Sentinel for an empty `get-todos`.
pub const NO_TODOS: &str = "No todos found";
/// Sentinel for an empty `get-projects`.
pub const NO_PROJECTS: &str = "No projects found";
/// Sentinel for an empty `get-areas`.
pub const NO_AREAS: &str = "No areas found";
/// Sentinel for an empty `get-tags`.
pub const NO_TAGS: &str = "No tags found";
/// Sentinel for an empty `search-advanced`.
pub const NO_MATCHING_TODOS: &str = "No matching todos found";
/// Sentinel for an empty `notes-list`.
pub const NO_NOTES: &str = "No notes found";
/// Sentinel for an empty `notes-search`.
pub const NO_MATCHING_NOTES: &str = "No notes found matching your query";

/// Line-oriented record builder.
#[derive(Default)]
struct Block {
    lines: Vec<String>,
}

impl Block {
    fn field(&mut self, label: &str, value: &str) -> &mut Self {
        self.lines.push(format!("{label}: {}", single_line(value)));
        self
    }

    fn optional(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.field(label, value);
        }
        self
    }

    fn date(&mut self, label: &str, value: Option<NaiveDate>) -> &mut Self {
        if let Some(date) = value {
            self.field(label, &date.format("%Y-%m-%d").to_string());
        }
        self
    }

    fn tags(&mut self, tags: &[String]) -> &mut Self {
        if !tags.is_empty() {
            self.field("Tags", &tags.join(", "));
        }
        self
    }

    fn text(&mut self, label: &str, text: &str) -> &mut Self {
        if !text.trim().is_empty() {
            self.lines.push(format!("{label}:"));
            self.lines.extend(text.lines().map(|line| format!("  {line}")));
        }
        self
    }

    fn items(&mut self, label: &str, items: impl IntoIterator<Item = String>) -> &mut Self {
        self.lines.push(format!("{label}:"));
        let start = self.lines.len();
        self.lines.extend(items.into_iter().map(|item| format!("  - {}", single_line(&item))));
        if self.lines.len() == start {
            self.lines.push("  (none)".to_string());
        }
        self
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.lines).join("\n")
    }
}

/// Collapse line breaks so inline values stay on one line.
fn single_line(value: &str) -> String {
    value.split(['\r', '\n']).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
}

fn checklist_line(item: &ChecklistItem) -> String {
    let mark = match item.status {
        Status::Completed => "[x]",
        Status::Canceled => "[-]",
        Status::Incomplete => "[ ]",
    };
    format!("{mark} {}", item.title)
}

fn todo_summary(todo: &Todo) -> String {
    if todo.status == Status::Incomplete {
        todo.title.clone()
    } else {
        format!("{} ({})", todo.title, todo.status)
    }
}

/// Render a to-do (or any task row).
#[must_use]
pub fn format_todo(todo: &Todo) -> String {
    let mut block = Block::default();
    block
        .field("Title", &todo.title)
        .field("UUID", &todo.uuid)
        .field("Type", todo.kind.as_str())
        .field("Status", todo.status.as_str());
    if todo.status == Status::Incomplete {
        block.field("List", todo.start.as_str());
    }
    block.date("Start Date", todo.start_date).date("Deadline", todo.deadline);
    if let Some(stopped) = todo.stop_date {
        let label = if todo.status == Status::Canceled { "Canceled" } else { "Completed" };
        block.field(label, &stopped.format("%Y-%m-%d %H:%M").to_string());
    }
    block
        .optional("Project", todo.project.as_deref())
        .optional("Heading", todo.heading.as_deref())
        .optional("Area", todo.area.as_deref())
        .tags(&todo.tags)
        .text("Notes", &todo.notes);
    if !todo.checklist.is_empty() {
        block.items("Checklist", todo.checklist.iter().map(checklist_line));
    }
    block.finish()
}

/// Render a project, optionally with its open to-dos.
#[must_use]
pub fn format_project(project: &Project, include_items: bool) -> String {
    let mut block = Block::default();
    block
        .field("Title", &project.title)
        .field("UUID", &project.uuid)
        .field("Status", project.status.as_str())
        .optional("Area", project.area.as_deref())
        .date("Start Date", project.start_date)
        .date("Deadline", project.deadline)
        .tags(&project.tags)
        .text("Notes", &project.notes);
    if include_items {
        block.items("Todos", project.todos.iter().map(todo_summary));
    }
    block.finish()
}

/// Render an area, optionally with its projects and to-dos.
#[must_use]
pub fn format_area(area: &Area, include_items: bool) -> String {
    let mut block = Block::default();
    block.field("Title", &area.title).field("UUID", &area.uuid).tags(&area.tags);
    if include_items {
        block
            .items("Projects", area.projects.iter().map(|p| p.title.clone()))
            .items("Todos", area.todos.iter().map(todo_summary));
    }
    block.finish()
}

/// Render a tag, optionally with the items carrying it.
#[must_use]
pub fn format_tag(tag: &Tag, include_items: bool) -> String {
    let mut block = Block::default();
    block
        .field("Title", &tag.title)
        .field("UUID", &tag.uuid)
        .optional("Shortcut", tag.shortcut.as_deref());
    if include_items {
        block.items("Items", tag.items.iter().map(todo_summary));
    }
    block.finish()
}

/// Join rendered records with [`SEPARATOR`], or return `empty` if there are none.
#[must_use]
pub fn join_records<T>(records: &[T], render: impl Fn(&T) -> String, empty: &str) -> String {
    if records.is_empty() {
        return empty.to_string();
    }
    records.iter().map(render).collect::<Vec<_>>().join(SEPARATOR)
}

/// Bullet list of note titles, or `empty` if there are none.
#[must_use]
pub fn format_note_list(notes: &[Note], empty: &str) -> String {
    if notes.is_empty() {
        return empty.to_string();
    }
    let bullets = notes.iter().map(|n| format!("• {}", n.title)).collect::<Vec<_>>().join("\n");
    format!("Found {} notes:\n{bullets}", notes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::things::{ItemType, StartBucket};
    use proptest::prelude::*;

    fn sample_todo() -> Todo {
        Todo {
            uuid: "t1".to_string(),
            title: "Write report".to_string(),
            notes: "First line\n\n---\n\nafter rule".to_string(),
            start: StartBucket::Anytime,
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
            project: Some("Work".to_string()),
            tags: vec!["Focus".to_string(), "Q2".to_string()],
            checklist: vec![
                ChecklistItem { title: "outline".to_string(), status: Status::Completed },
                ChecklistItem { title: "draft".to_string(), status: Status::Incomplete },
            ],
            ..Todo::default()
        }
    }

    #[test]
    fn test_format_todo() {
        let text = format_todo(&sample_todo());
        assert!(text.starts_with("Title: Write report\nUUID: t1\nType: to-do\nStatus: incomplete"));
        assert!(text.contains("List: Anytime"));
        assert!(text.contains("Deadline: 2025-06-01"));
        assert!(text.contains("Project: Work"));
        assert!(text.contains("Tags: Focus, Q2"));
        assert!(text.contains("Notes:\n  First line\n  \n  ---\n  \n  after rule"));
        assert!(text.contains("Checklist:\n  - [x] outline\n  - [ ] draft"));
        assert!(!text.contains(SEPARATOR));
    }

    #[test]
    fn test_format_completed_todo_has_no_list() {
        let todo = Todo {
            status: Status::Completed,
            stop_date: chrono::DateTime::from_timestamp(1_700_000_000, 0),
            ..sample_todo()
        };
        let text = format_todo(&todo);
        assert!(!text.contains("List:"));
        assert!(text.contains("Completed: 2023-11-14"));
    }

    #[test]
    fn test_format_project_with_items() {
        let project = Project {
            uuid: "p1".to_string(),
            title: "House".to_string(),
            area: Some("Home".to_string()),
            todos: vec![Todo { title: "Paint".to_string(), ..Todo::default() }],
            ..Project::default()
        };
        let text = format_project(&project, true);
        assert!(text.contains("Area: Home"));
        assert!(text.contains("Todos:\n  - Paint"));
        assert!(!format_project(&project, false).contains("Todos:"));
    }

    #[test]
    fn test_format_area_and_tag() {
        let area = Area { uuid: "a1".to_string(), title: "Home".to_string(), ..Area::default() };
        assert_eq!(format_area(&area, false), "Title: Home\nUUID: a1");
        assert!(format_area(&area, true).contains("Projects:\n  (none)"));

        let tag = Tag {
            uuid: "g1".to_string(),
            title: "Errand".to_string(),
            shortcut: Some("e".to_string()),
            items: vec![Todo {
                title: "Old".to_string(),
                status: Status::Canceled,
                kind: ItemType::Todo,
                ..Todo::default()
            }],
        };
        let text = format_tag(&tag, true);
        assert!(text.contains("Shortcut: e"));
        assert!(text.contains("Items:\n  - Old (canceled)"));
    }

    #[test]
    fn test_join_records() {
        let todos = vec![sample_todo(), sample_todo()];
        let text = join_records(&todos, format_todo, NO_ITEMS);
        assert_eq!(text.split(SEPARATOR).count(), 2);
        assert_eq!(join_records(&[] as &[Todo], format_todo, NO_ITEMS), "No items found");
    }

    #[test]
    fn test_format_note_list() {
        let notes = vec![Note::titled("Alpha"), Note::titled("Beta")];
        assert_eq!(format_note_list(&notes, NO_NOTES), "Found 2 notes:\n• Alpha\n• Beta");
        assert_eq!(format_note_list(&[], NO_MATCHING_NOTES), NO_MATCHING_NOTES);
    }

    proptest! {
        #[test]
        fn records_never_contain_the_separator(
            titles in proptest::collection::vec("(?s).{0,40}", 1..5),
            notes in "(?s).{0,80}",
        ) {
            let todos: Vec<Todo> = titles
                .iter()
                .map(|t| Todo { title: t.clone(), notes: notes.clone(), ..Todo::default() })
                .collect();
            let joined = join_records(&todos, format_todo, NO_ITEMS);
            prop_assert_eq!(joined.split(SEPARATOR).count(), todos.len());
        }
    }
}
