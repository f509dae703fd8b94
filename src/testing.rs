//! Testing utilities and fake implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]
#![allow(clippy::missing_panics_doc)]

use crate::error::{Error, Result};
use crate::things::models::encode_things_date;
use crate::things::{Area, ListView, Project, Tag, ThingsStore, Todo, TodoFilter};
use crate::traits::{AutomationResult, ScriptRunner, UrlOpener};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The subset of the Things schema the store reads.
const THINGS_SCHEMA: &str = r#"
CREATE TABLE TMArea (
    uuid TEXT PRIMARY KEY,
    title TEXT,
    "index" INTEGER
);
CREATE TABLE TMTag (
    uuid TEXT PRIMARY KEY,
    title TEXT,
    shortcut TEXT,
    "index" INTEGER
);
CREATE TABLE TMTask (
    uuid TEXT PRIMARY KEY,
    type INTEGER,
    trashed INTEGER,
    title TEXT,
    notes TEXT,
    status INTEGER,
    start INTEGER,
    startDate INTEGER,
    deadline INTEGER,
    stopDate REAL,
    creationDate REAL,
    "index" INTEGER,
    todayIndex INTEGER,
    area TEXT,
    project TEXT,
    heading TEXT
);
CREATE TABLE TMTaskTag (tasks TEXT, tags TEXT);
CREATE TABLE TMAreaTag (areas TEXT, tags TEXT);
CREATE TABLE TMChecklistItem (
    uuid TEXT PRIMARY KEY,
    title TEXT,
    status INTEGER,
    task TEXT,
    "index" INTEGER
);
CREATE TABLE TMSettings (
    uuid TEXT PRIMARY KEY,
    uriSchemeAuthenticationToken TEXT
);
"#;

/// Creation timestamp given to sample rows that should not count as recent.
const OLD_TIMESTAMP: f64 = 1_700_000_000.0;

/// One `TMTask` row.
#[derive(Debug, Clone, Default)]
pub struct TaskRow {
    /// Identifier.
    pub uuid: String,
    /// 0 to-do, 1 project, 2 heading.
    pub kind: i64,
    /// Title.
    pub title: String,
    /// Notes.
    pub notes: String,
    /// 0 incomplete, 2 canceled, 3 completed.
    pub status: i64,
    /// 0 inbox, 1 anytime, 2 someday.
    pub start: i64,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Deadline.
    pub deadline: Option<NaiveDate>,
    /// Completion timestamp.
    pub stop_date: Option<f64>,
    /// Creation timestamp.
    pub created: Option<f64>,
    /// Manual sort order.
    pub index: i64,
    /// Sort order in Today.
    pub today_index: Option<i64>,
    /// Owning area UUID.
    pub area: Option<String>,
    /// Owning project UUID.
    pub project: Option<String>,
    /// Owning heading UUID.
    pub heading: Option<String>,
    /// In the trash.
    pub trashed: bool,
}

impl TaskRow {
    /// An open anytime to-do.
    #[must_use]
    pub fn todo(uuid: &str, title: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            title: title.to_string(),
            start: 1,
            created: Some(OLD_TIMESTAMP),
            ..Self::default()
        }
    }
}

/// A throwaway Things database on disk.
pub struct ThingsFixture {
    conn: Connection,
}

impl ThingsFixture {
    /// Rows created after this Unix time count as recent in [`Self::seed_sample`].
    pub const RECENT_CUTOFF: i64 = 1_749_500_000;

    /// Create the schema in a new database at `path`.
    #[must_use]
    pub fn create(path: &Path) -> Self {
        let conn = Connection::open(path).expect("open fixture database");
        conn.execute_batch(THINGS_SCHEMA).expect("create Things schema");
        Self { conn }
    }

    /// Insert a task row.
    pub fn add_task(&self, task: &TaskRow) {
        self.conn
            .execute(
                r#"INSERT INTO TMTask (uuid, type, trashed, title, notes, status, start,
                       startDate, deadline, stopDate, creationDate, "index", todayIndex,
                       area, project, heading)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
                params![
                    task.uuid,
                    task.kind,
                    i64::from(task.trashed),
                    task.title,
                    task.notes,
                    task.status,
                    task.start,
                    task.start_date.map(encode_things_date),
                    task.deadline.map(encode_things_date),
                    task.stop_date,
                    task.created,
                    task.index,
                    task.today_index,
                    task.area,
                    task.project,
                    task.heading,
                ],
            )
            .expect("insert task");
    }

    /// Insert an area.
    pub fn add_area(&self, uuid: &str, title: &str, index: i64) {
        self.conn
            .execute(
                r#"INSERT INTO TMArea (uuid, title, "index") VALUES (?1, ?2, ?3)"#,
                params![uuid, title, index],
            )
            .expect("insert area");
    }

    /// Insert a tag.
    pub fn add_tag(&self, uuid: &str, title: &str, shortcut: Option<&str>, index: i64) {
        self.conn
            .execute(
                r#"INSERT INTO TMTag (uuid, title, shortcut, "index") VALUES (?1, ?2, ?3, ?4)"#,
                params![uuid, title, shortcut, index],
            )
            .expect("insert tag");
    }

    /// Attach a tag to a task.
    pub fn tag_task(&self, task: &str, tag: &str) {
        self.conn
            .execute("INSERT INTO TMTaskTag (tasks, tags) VALUES (?1, ?2)", params![task, tag])
            .expect("tag task");
    }

    /// Attach a tag to an area.
    pub fn tag_area(&self, area: &str, tag: &str) {
        self.conn
            .execute("INSERT INTO TMAreaTag (areas, tags) VALUES (?1, ?2)", params![area, tag])
            .expect("tag area");
    }

    /// Insert a checklist item.
    pub fn add_checklist_item(&self, task: &str, title: &str, status: i64, index: i64) {
        self.conn
            .execute(
                r#"INSERT INTO TMChecklistItem (uuid, title, status, task, "index")
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![format!("{task}-check-{index}"), title, status, task, index],
            )
            .expect("insert checklist item");
    }

    /// Store the URL-scheme authentication token.
    pub fn set_auth_token(&self, token: &str) {
        self.conn
            .execute(
                "INSERT INTO TMSettings (uuid, uriSchemeAuthenticationToken) VALUES ('settings', ?1)",
                params![token],
            )
            .expect("insert settings");
    }

    /// Populate a small library with one of everything, dated relative to `today`.
    pub fn seed_sample(&self, today: NaiveDate) {
        let days_before = |n| today.checked_sub_days(Days::new(n));
        let days_after = |n| today.checked_add_days(Days::new(n));

        self.add_area("area-home", "Home", 0);
        self.add_area("area-work", "Work", 1);
        self.add_tag("tag-errand", "Errand", Some("e"), 0);
        self.add_tag("tag-focus", "Focus", None, 1);
        self.tag_area("area-home", "tag-errand");

        self.add_task(&TaskRow {
            kind: 1,
            area: Some("area-home".to_string()),
            ..TaskRow::todo("proj-house", "House")
        });
        self.add_task(&TaskRow {
            kind: 2,
            project: Some("proj-house".to_string()),
            index: 1,
            ..TaskRow::todo("head-outside", "Outside")
        });

        #[allow(clippy::cast_precision_loss)]
        let recent = (Self::RECENT_CUTOFF + 100_000) as f64;
        self.add_task(&TaskRow {
            start: 0,
            created: Some(recent),
            index: 10,
            ..TaskRow::todo("todo-plumber", "Call plumber")
        });
        self.tag_task("todo-plumber", "tag-errand");
        self.add_task(&TaskRow {
            notes: "quarterly numbers".to_string(),
            start_date: Some(today),
            area: Some("area-work".to_string()),
            today_index: Some(0),
            index: 11,
            ..TaskRow::todo("todo-report", "Write report")
        });
        self.add_task(&TaskRow {
            deadline: days_before(9),
            today_index: Some(1),
            index: 12,
            ..TaskRow::todo("todo-rent", "Pay rent")
        });
        self.add_task(&TaskRow {
            start: 2,
            start_date: days_after(21),
            index: 13,
            ..TaskRow::todo("todo-dentist", "Dentist")
        });
        self.add_task(&TaskRow {
            start: 2,
            index: 14,
            ..TaskRow::todo("todo-macros", "Learn Rust macros")
        });
        self.add_task(&TaskRow {
            project: Some("proj-house".to_string()),
            index: 15,
            ..TaskRow::todo("todo-fence", "Paint fence")
        });
        self.add_checklist_item("todo-fence", "buy paint", 0, 0);
        self.add_checklist_item("todo-fence", "sand", 3, 1);
        self.add_task(&TaskRow {
            heading: Some("head-outside".to_string()),
            index: 16,
            ..TaskRow::todo("todo-gutter", "Fix gutter")
        });
        self.add_task(&TaskRow {
            status: 3,
            stop_date: Some(1_749_000_000.0),
            index: 17,
            ..TaskRow::todo("todo-old", "Old chore")
        });
        self.add_task(&TaskRow {
            status: 2,
            stop_date: Some(1_748_000_000.0),
            index: 18,
            ..TaskRow::todo("todo-skipped", "Skipped chore")
        });
        self.add_task(&TaskRow {
            trashed: true,
            index: 19,
            ..TaskRow::todo("todo-discarded", "Discarded idea")
        });
        self.set_auth_token("secret-token");
    }
}

/// An in-memory [`ThingsStore`] with canned results.
///
/// Records the views and filters it was asked for.
#[derive(Debug, Default)]
pub struct FakeThingsStore {
    views: Vec<(ListView, Vec<Todo>)>,
    todos: Vec<Todo>,
    items: Vec<Todo>,
    projects: Vec<Project>,
    areas: Vec<Area>,
    tags: Vec<Tag>,
    recent: Vec<Todo>,
    auth_token: Option<String>,
    failure: Option<String>,
    view_calls: Mutex<Vec<ListView>>,
    filter_calls: Mutex<Vec<TodoFilter>>,
}

impl FakeThingsStore {
    /// Results for a list view.
    #[must_use]
    pub fn with_view(mut self, view: ListView, todos: Vec<Todo>) -> Self {
        self.views.push((view, todos));
        self
    }

    /// Results for every `todos` and `search` call.
    #[must_use]
    pub fn with_todos(mut self, todos: Vec<Todo>) -> Self {
        self.todos = todos;
        self
    }

    /// An item reachable through `get`.
    #[must_use]
    pub fn with_item(mut self, item: Todo) -> Self {
        self.items.push(item);
        self
    }

    /// Projects.
    #[must_use]
    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    /// Areas.
    #[must_use]
    pub fn with_areas(mut self, areas: Vec<Area>) -> Self {
        self.areas = areas;
        self
    }

    /// Tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Results for `created_since`.
    #[must_use]
    pub fn with_recent(mut self, todos: Vec<Todo>) -> Self {
        self.recent = todos;
        self
    }

    /// The URL-scheme token.
    #[must_use]
    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Make every call fail with an I/O error carrying `message`.
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Views requested so far.
    pub fn views(&self) -> Vec<ListView> {
        lock(&self.view_calls).clone()
    }

    /// Filters requested so far.
    pub fn filters(&self) -> Vec<TodoFilter> {
        lock(&self.filter_calls).clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Io(std::io::Error::other(message.clone()))),
            None => Ok(()),
        }
    }
}

impl ThingsStore for FakeThingsStore {
    fn list_view(&self, view: ListView) -> Result<Vec<Todo>> {
        self.check()?;
        lock(&self.view_calls).push(view);
        Ok(self.views.iter().find(|(v, _)| *v == view).map(|(_, t)| t.clone()).unwrap_or_default())
    }

    fn todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        self.check()?;
        lock(&self.filter_calls).push(filter.clone());
        Ok(self.todos.clone())
    }

    fn search(&self, query: &str) -> Result<Vec<Todo>> {
        self.check()?;
        Ok(self.todos.iter().filter(|t| t.title.contains(query)).cloned().collect())
    }

    fn get(&self, uuid: &str) -> Result<Option<Todo>> {
        self.check()?;
        Ok(self.items.iter().find(|t| t.uuid == uuid).cloned())
    }

    fn projects(&self, include_items: bool) -> Result<Vec<Project>> {
        self.check()?;
        Ok(self
            .projects
            .iter()
            .cloned()
            .map(|mut p| {
                if !include_items {
                    p.todos.clear();
                }
                p
            })
            .collect())
    }

    fn areas(&self, _include_items: bool) -> Result<Vec<Area>> {
        self.check()?;
        Ok(self.areas.clone())
    }

    fn tags(&self, _include_items: bool) -> Result<Vec<Tag>> {
        self.check()?;
        Ok(self.tags.clone())
    }

    fn created_since(&self, _since: DateTime<Utc>) -> Result<Vec<Todo>> {
        self.check()?;
        Ok(self.recent.clone())
    }

    fn auth_token(&self) -> Result<Option<String>> {
        self.check()?;
        Ok(self.auth_token.clone())
    }
}

/// A [`ScriptRunner`] that replays canned results and records every script.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    results: Mutex<VecDeque<AutomationResult>>,
    fallback: AutomationResult,
    scripts: Mutex<Vec<String>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl ScriptedRunner {
    /// A runner that always succeeds with `output`.
    #[must_use]
    pub fn succeeding(output: &str) -> Self {
        Self { fallback: AutomationResult::ok(output), ..Self::default() }
    }

    /// A runner that always fails with `error`.
    #[must_use]
    pub fn failing(error: &str) -> Self {
        Self { fallback: AutomationResult::failed(error), ..Self::default() }
    }

    /// Queue results returned in order before falling back.
    #[must_use]
    pub fn with_results(self, results: Vec<AutomationResult>) -> Self {
        *lock(&self.results) = results.into();
        self
    }

    /// Scripts run so far.
    pub fn scripts(&self) -> Vec<String> {
        lock(&self.scripts).clone()
    }

    /// Timeouts passed so far.
    pub fn timeouts(&self) -> Vec<Duration> {
        lock(&self.timeouts).clone()
    }
}

#[async_trait]
impl ScriptRunner for ScriptedRunner {
    async fn run(&self, script: &str, timeout: Duration) -> AutomationResult {
        lock(&self.scripts).push(script.to_string());
        lock(&self.timeouts).push(timeout);
        lock(&self.results).pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

/// A [`ScriptRunner`] that interprets the Notes scripts against an in-memory list.
///
/// Understands exactly the scripts in [`crate::notes::script`].
#[derive(Debug, Default)]
pub struct InMemoryNotesRunner {
    notes: Mutex<Vec<(String, String)>>,
    scripts: Mutex<Vec<String>>,
}

impl InMemoryNotesRunner {
    /// Start with notes of the given titles and empty bodies.
    #[must_use]
    pub fn with_titles(titles: &[&str]) -> Self {
        let notes = titles.iter().map(|t| ((*t).to_string(), String::new())).collect();
        Self { notes: Mutex::new(notes), scripts: Mutex::default() }
    }

    /// Scripts run so far.
    pub fn scripts(&self) -> Vec<String> {
        lock(&self.scripts).clone()
    }

    /// Current note titles.
    pub fn titles(&self) -> Vec<String> {
        lock(&self.notes).iter().map(|(title, _)| title.clone()).collect()
    }

    fn interpret(&self, script: &str) -> AutomationResult {
        let mut notes = lock(&self.notes);

        if script.contains("make new note") {
            let (Some(title), Some(body)) =
                (literal_after(script, "name:\""), literal_after(script, "body:\""))
            else {
                return AutomationResult::failed("syntax error");
            };
            notes.push((title, body));
            return AutomationResult::ok("");
        }

        if script.contains("get name of notes where") {
            let terms = contains_terms(script);
            let all = script.contains("\" and name contains \"");
            let matches = |title: &str| {
                if all {
                    terms.iter().all(|t| title.contains(t.as_str()))
                } else {
                    terms.iter().any(|t| title.contains(t.as_str()))
                }
            };
            let found: Vec<&str> =
                notes.iter().map(|(t, _)| t.as_str()).filter(|&t| matches(t)).collect();
            return AutomationResult::ok(found.join(", "));
        }

        if script.contains("get name of notes") {
            let all: Vec<&str> = notes.iter().map(|(t, _)| t.as_str()).collect();
            return AutomationResult::ok(all.join(", "));
        }

        if let Some(title) = literal_after(script, "get body of note \"") {
            return match notes.iter().find(|(t, _)| *t == title) {
                Some((_, body)) => AutomationResult::ok(body.clone()),
                None => AutomationResult::failed("Can't get note. (-1728)"),
            };
        }

        if let Some(title) = literal_after(script, "show note \"") {
            let found = notes.iter().any(|(t, _)| *t == title);
            return AutomationResult::ok(found.to_string());
        }

        if let Some(title) = literal_after(script, "delete note \"") {
            let before = notes.len();
            notes.retain(|(t, _)| *t != title);
            return if notes.len() < before {
                AutomationResult::ok("")
            } else {
                AutomationResult::failed("Can't get note. (-1728)")
            };
        }

        AutomationResult::failed("unsupported script")
    }
}

#[async_trait]
impl ScriptRunner for InMemoryNotesRunner {
    async fn run(&self, script: &str, _timeout: Duration) -> AutomationResult {
        lock(&self.scripts).push(script.to_string());
        self.interpret(script)
    }
}

/// Read an escaped string literal starting right after an opening quote.
fn read_literal(rest: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return Some(out),
            _ => out.push(c),
        }
    }
    None
}

fn literal_after(script: &str, marker: &str) -> Option<String> {
    let start = script.find(marker)? + marker.len();
    read_literal(&script[start..])
}

fn contains_terms(script: &str) -> Vec<String> {
    const MARKER: &str = "name contains \"";
    script
        .match_indices(MARKER)
        .filter_map(|(i, _)| read_literal(&script[i + MARKER.len()..]))
        .collect()
}

/// A [`UrlOpener`] that records URLs instead of opening them.
#[derive(Debug, Default)]
pub struct RecordingUrlOpener {
    urls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingUrlOpener {
    /// Create a recording opener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an opener whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// URLs opened so far.
    pub fn urls(&self) -> Vec<String> {
        lock(&self.urls).clone()
    }
}

#[async_trait]
impl UrlOpener for RecordingUrlOpener {
    async fn open(&self, url: &str) -> Result<()> {
        if self.fail {
            return Err(Error::UrlDispatch("no handler for things://".to_string()));
        }
        lock(&self.urls).push(url.to_string());
        Ok(())
    }
}
