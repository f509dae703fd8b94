//! Things store trait and read-only `SQLite` implementation.

use crate::error::{Error, Result};
use crate::things::models::{
    decode_things_date, encode_things_date, timestamp_to_datetime, Area, ChecklistItem, ItemType,
    ListView, Project, StartBucket, Status, Tag, Todo,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

/// Trait for reading the Things database.
///
/// The store never writes; every mutation goes through the URL scheme.
#[allow(clippy::missing_errors_doc)]
pub trait ThingsStore: Send + Sync {
    /// Items of a built-in list view.
    fn list_view(&self, view: ListView) -> Result<Vec<Todo>>;

    /// Items matching a filter.
    fn todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;

    /// Open to-dos whose title or notes contain `query`.
    fn search(&self, query: &str) -> Result<Vec<Todo>>;

    /// Any task row (to-do, project or heading) by identifier.
    fn get(&self, uuid: &str) -> Result<Option<Todo>>;

    /// Open projects.
    fn projects(&self, include_items: bool) -> Result<Vec<Project>>;

    /// All areas.
    fn areas(&self, include_items: bool) -> Result<Vec<Area>>;

    /// All tags.
    fn tags(&self, include_items: bool) -> Result<Vec<Tag>>;

    /// To-dos and projects created after `since`, newest first.
    fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<Todo>>;

    /// The URL-scheme authentication token, if Things has one configured.
    fn auth_token(&self) -> Result<Option<String>>;
}

/// Filter options for [`ThingsStore::todos`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Only items in this project (directly or under one of its headings).
    pub project: Option<String>,
    /// Completion state. `None` means incomplete.
    pub status: Option<Status>,
    /// Exact scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Exact deadline.
    pub deadline: Option<NaiveDate>,
    /// Only items carrying this tag title.
    pub tag: Option<String>,
    /// Only items filed in this area UUID.
    pub area: Option<String>,
    /// Row kind. `None` means to-do.
    pub kind: Option<ItemType>,
    /// Load checklist entries for each result.
    pub include_checklist: bool,
}

/// Shared projection for task rows.
const TODO_SELECT: &str = r#"
    SELECT task.uuid, task.type, task.title, task.notes, task.status, task.start,
           task.startDate, task.deadline, task.stopDate, task.creationDate,
           COALESCE(project.title, heading_project.title), area.title, heading.title,
           (SELECT group_concat(tag.title, char(31))
              FROM TMTaskTag tt JOIN TMTag tag ON tag.uuid = tt.tags
             WHERE tt.tasks = task.uuid)
      FROM TMTask task
      LEFT JOIN TMTask project ON project.uuid = task.project
      LEFT JOIN TMTask heading ON heading.uuid = task.heading
      LEFT JOIN TMTask heading_project ON heading_project.uuid = heading.project
      LEFT JOIN TMArea area ON area.uuid = task.area"#;

/// Conditions shared by every "open to-do" view.
const OPEN_TODO: &str = "task.type = 0 AND task.status = 0 AND task.trashed = 0";

/// Separator used by `group_concat` for tag titles.
const TAG_SEPARATOR: char = '\u{1f}';

/// Read-only store over a Things `main.sqlite`.
#[derive(Debug, Clone)]
pub struct SqliteThingsStore {
    db_path: PathBuf,
    today: Option<NaiveDate>,
}

impl SqliteThingsStore {
    /// Open the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not a Things database.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if !db_path.exists() {
            return Err(Error::DatabaseNotFound(db_path.display().to_string()));
        }
        let store = Self { db_path, today: None };
        store.open()?.query_row("SELECT count(*) FROM TMTask", [], |row| row.get::<_, i64>(0))?;
        Ok(store)
    }

    /// Locate and open the database, see [`crate::paths::things_db_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if no database can be located or opened.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = crate::paths::things_db_path(explicit).ok_or_else(|| {
            Error::DatabaseNotFound(
                "no Things data directory found; set THINGSDB or things_db_path".to_string(),
            )
        })?;
        Self::new(path)
    }

    /// Pin the date used for the Today and Upcoming views.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Open a read-only connection to the database.
    fn open(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.db_path, flags)?)
    }

    /// Parse a task row produced by `TODO_SELECT`.
    fn parse_todo(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
        let tags: Option<String> = row.get(13)?;
        Ok(Todo {
            uuid: row.get(0)?,
            kind: ItemType::from_code(row.get(1)?),
            title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            notes: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            status: Status::from_code(row.get(4)?),
            start: StartBucket::from_code(row.get(5)?),
            start_date: row.get::<_, Option<i64>>(6)?.and_then(decode_things_date),
            deadline: row.get::<_, Option<i64>>(7)?.and_then(decode_things_date),
            stop_date: row.get::<_, Option<f64>>(8)?.and_then(timestamp_to_datetime),
            created: row.get::<_, Option<f64>>(9)?.and_then(timestamp_to_datetime),
            project: row.get(10)?,
            area: row.get(11)?,
            heading: row.get(12)?,
            tags: split_tags(tags.as_deref()),
            checklist: Vec::new(),
        })
    }

    /// Run `TODO_SELECT` with the given conditions.
    fn query_todos(
        conn: &Connection,
        conditions: &[String],
        params_vec: &[Box<dyn rusqlite::ToSql>],
        order_by: &str,
        include_checklist: bool,
    ) -> Result<Vec<Todo>> {
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("{TODO_SELECT} {where_clause} ORDER BY {order_by}");

        let params: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(AsRef::as_ref).collect();
        let mut stmt = conn.prepare(&sql)?;
        let mut todos = stmt
            .query_map(params.as_slice(), Self::parse_todo)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if include_checklist {
            for todo in &mut todos {
                todo.checklist = Self::checklist(conn, &todo.uuid)?;
            }
        }
        Ok(todos)
    }

    fn checklist(conn: &Connection, task_uuid: &str) -> Result<Vec<ChecklistItem>> {
        let mut stmt = conn.prepare(
            r#"SELECT title, status FROM TMChecklistItem WHERE task = ?1 ORDER BY "index""#,
        )?;
        let items = stmt
            .query_map(params![task_uuid], |row| {
                Ok(ChecklistItem {
                    title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    status: Status::from_code(row.get(1)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn filtered_todos(conn: &Connection, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let mut conditions = vec!["task.trashed = 0".to_string()];
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        conditions.push("task.type = ?".to_string());
        params_vec.push(Box::new(filter.kind.unwrap_or_default().code()));

        conditions.push("task.status = ?".to_string());
        params_vec.push(Box::new(filter.status.unwrap_or_default().code()));

        if let Some(project) = &filter.project {
            conditions.push("(task.project = ? OR heading.project = ?)".to_string());
            params_vec.push(Box::new(project.clone()));
            params_vec.push(Box::new(project.clone()));
        }

        if let Some(date) = filter.start_date {
            conditions.push("task.startDate = ?".to_string());
            params_vec.push(Box::new(encode_things_date(date)));
        }

        if let Some(date) = filter.deadline {
            conditions.push("task.deadline = ?".to_string());
            params_vec.push(Box::new(encode_things_date(date)));
        }

        if let Some(tag) = &filter.tag {
            conditions.push(
                "EXISTS (SELECT 1 FROM TMTaskTag tt JOIN TMTag tag ON tag.uuid = tt.tags
                          WHERE tt.tasks = task.uuid AND tag.title = ?)"
                    .to_string(),
            );
            params_vec.push(Box::new(tag.clone()));
        }

        if let Some(area) = &filter.area {
            conditions.push("task.area = ?".to_string());
            params_vec.push(Box::new(area.clone()));
        }

        Self::query_todos(
            conn,
            &conditions,
            &params_vec,
            r#"task."index""#,
            filter.include_checklist,
        )
    }

    fn query_projects(
        conn: &Connection,
        area: Option<&str>,
        include_items: bool,
    ) -> Result<Vec<Project>> {
        let mut sql = r#"
            SELECT p.uuid, p.title, p.notes, p.status, area.title, p.startDate, p.deadline,
                   (SELECT group_concat(tag.title, char(31))
                      FROM TMTaskTag tt JOIN TMTag tag ON tag.uuid = tt.tags
                     WHERE tt.tasks = p.uuid)
              FROM TMTask p
              LEFT JOIN TMArea area ON area.uuid = p.area
             WHERE p.type = 1 AND p.status = 0 AND p.trashed = 0"#
            .to_string();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(area) = area {
            sql.push_str(" AND p.area = ?");
            params_vec.push(Box::new(area.to_string()));
        }
        sql.push_str(r#" ORDER BY p."index""#);

        let params: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(AsRef::as_ref).collect();
        let mut stmt = conn.prepare(&sql)?;
        let mut projects = stmt
            .query_map(params.as_slice(), |row| {
                let tags: Option<String> = row.get(7)?;
                Ok(Project {
                    uuid: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    notes: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    status: Status::from_code(row.get(3)?),
                    area: row.get(4)?,
                    start_date: row.get::<_, Option<i64>>(5)?.and_then(decode_things_date),
                    deadline: row.get::<_, Option<i64>>(6)?.and_then(decode_things_date),
                    tags: split_tags(tags.as_deref()),
                    todos: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if include_items {
            for project in &mut projects {
                let filter = TodoFilter { project: Some(project.uuid.clone()), ..TodoFilter::default() };
                project.todos = Self::filtered_todos(conn, &filter)?;
            }
        }
        Ok(projects)
    }
}

/// Split a `group_concat` tag list.
fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(TAG_SEPARATOR).filter(|t| !t.is_empty()).map(ToString::to_string).collect()
    })
    .unwrap_or_default()
}

/// Escape `LIKE` wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

impl ThingsStore for SqliteThingsStore {
    fn list_view(&self, view: ListView) -> Result<Vec<Todo>> {
        let conn = self.open()?;
        let today = encode_things_date(self.today());

        let (condition, order_by) = match view {
            ListView::Inbox => (format!("{OPEN_TODO} AND task.start = 0"), r#"task."index""#),
            ListView::Today => (
                format!(
                    "{OPEN_TODO} AND ((task.start IN (1, 2) AND task.startDate IS NOT NULL \
                     AND task.startDate <= {today}) OR (task.startDate IS NULL \
                     AND task.deadline IS NOT NULL AND task.deadline <= {today} \
                     AND task.start = 1))"
                ),
                "task.todayIndex",
            ),
            ListView::Upcoming => (
                format!(
                    "{OPEN_TODO} AND task.start = 2 AND task.startDate IS NOT NULL \
                     AND task.startDate > {today}"
                ),
                "task.startDate",
            ),
            ListView::Anytime => (format!("{OPEN_TODO} AND task.start = 1"), r#"task."index""#),
            ListView::Someday => (
                format!("{OPEN_TODO} AND task.start = 2 AND task.startDate IS NULL"),
                r#"task."index""#,
            ),
            ListView::Logbook => (
                "task.type IN (0, 1) AND task.trashed = 0 AND task.status IN (2, 3)".to_string(),
                "task.stopDate DESC",
            ),
            ListView::Trash => {
                ("task.type IN (0, 1) AND task.trashed = 1".to_string(), r#"task."index""#)
            }
        };

        Self::query_todos(&conn, &[condition], &[], order_by, false)
    }

    fn todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let conn = self.open()?;
        Self::filtered_todos(&conn, filter)
    }

    fn search(&self, query: &str) -> Result<Vec<Todo>> {
        let conn = self.open()?;
        let pattern = like_pattern(query);
        let conditions = vec![
            OPEN_TODO.to_string(),
            r"(task.title LIKE ? ESCAPE '\' OR task.notes LIKE ? ESCAPE '\')".to_string(),
        ];
        let params_vec: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(pattern.clone()), Box::new(pattern)];
        Self::query_todos(&conn, &conditions, &params_vec, r#"task."index""#, false)
    }

    fn get(&self, uuid: &str) -> Result<Option<Todo>> {
        let conn = self.open()?;
        let params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(uuid.to_string())];
        let todos = Self::query_todos(
            &conn,
            &["task.uuid = ?".to_string()],
            &params_vec,
            "task.uuid",
            true,
        )?;
        Ok(todos.into_iter().next())
    }

    fn projects(&self, include_items: bool) -> Result<Vec<Project>> {
        let conn = self.open()?;
        Self::query_projects(&conn, None, include_items)
    }

    fn areas(&self, include_items: bool) -> Result<Vec<Area>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"SELECT area.uuid, area.title,
                      (SELECT group_concat(tag.title, char(31))
                         FROM TMAreaTag at JOIN TMTag tag ON tag.uuid = at.tags
                        WHERE at.areas = area.uuid)
                 FROM TMArea area ORDER BY area."index""#,
        )?;
        let mut areas = stmt
            .query_map([], |row| {
                let tags: Option<String> = row.get(2)?;
                Ok(Area {
                    uuid: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    tags: split_tags(tags.as_deref()),
                    projects: Vec::new(),
                    todos: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if include_items {
            for area in &mut areas {
                area.projects = Self::query_projects(&conn, Some(&area.uuid), false)?;
                let filter = TodoFilter { area: Some(area.uuid.clone()), ..TodoFilter::default() };
                area.todos = Self::filtered_todos(&conn, &filter)?;
            }
        }
        Ok(areas)
    }

    fn tags(&self, include_items: bool) -> Result<Vec<Tag>> {
        let conn = self.open()?;
        let mut stmt =
            conn.prepare(r#"SELECT uuid, title, shortcut FROM TMTag ORDER BY "index""#)?;
        let mut tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    uuid: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    shortcut: row.get::<_, Option<String>>(2)?.filter(|s| !s.is_empty()),
                    items: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if include_items {
            for tag in &mut tags {
                let filter = TodoFilter { tag: Some(tag.title.clone()), ..TodoFilter::default() };
                tag.items = Self::filtered_todos(&conn, &filter)?;
            }
        }
        Ok(tags)
    }

    #[allow(clippy::cast_precision_loss)]
    fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<Todo>> {
        let conn = self.open()?;
        let params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(since.timestamp() as f64)];
        Self::query_todos(
            &conn,
            &[
                "task.type IN (0, 1) AND task.trashed = 0".to_string(),
                "task.creationDate > ?".to_string(),
            ],
            &params_vec,
            "task.creationDate DESC",
            false,
        )
    }

    fn auth_token(&self) -> Result<Option<String>> {
        let conn = self.open()?;
        let token: Option<Option<String>> = conn
            .query_row("SELECT uriSchemeAuthenticationToken FROM TMSettings LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(token.flatten().filter(|t| !t.is_empty()))
    }
}

/// Stand-in used when no Things database could be opened.
///
/// Every query fails with the original reason, so the notes tools keep
/// working on machines without Things.
#[derive(Debug, Clone)]
pub struct UnavailableThingsStore {
    reason: String,
}

impl UnavailableThingsStore {
    /// Create a store that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(Error::DatabaseNotFound(self.reason.clone()))
    }
}

impl ThingsStore for UnavailableThingsStore {
    fn list_view(&self, _view: ListView) -> Result<Vec<Todo>> {
        self.fail()
    }

    fn todos(&self, _filter: &TodoFilter) -> Result<Vec<Todo>> {
        self.fail()
    }

    fn search(&self, _query: &str) -> Result<Vec<Todo>> {
        self.fail()
    }

    fn get(&self, _uuid: &str) -> Result<Option<Todo>> {
        self.fail()
    }

    fn projects(&self, _include_items: bool) -> Result<Vec<Project>> {
        self.fail()
    }

    fn areas(&self, _include_items: bool) -> Result<Vec<Area>> {
        self.fail()
    }

    fn tags(&self, _include_items: bool) -> Result<Vec<Tag>> {
        self.fail()
    }

    fn created_since(&self, _since: DateTime<Utc>) -> Result<Vec<Todo>> {
        self.fail()
    }

    fn auth_token(&self) -> Result<Option<String>> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ThingsFixture;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn create_test_store() -> (TempDir, SqliteThingsStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.sqlite");
        let fixture = ThingsFixture::create(&path);
        fixture.seed_sample(today());
        let store = SqliteThingsStore::new(&path).unwrap().with_today(today());
        (dir, store)
    }

    fn titles(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_missing_database_is_reported() {
        let err = SqliteThingsStore::new("/definitely/not/here/main.sqlite").unwrap_err();
        assert!(matches!(err, Error::DatabaseNotFound(_)));
    }

    #[test]
    fn test_non_things_database_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.sqlite");
        Connection::open(&path).unwrap().execute_batch("CREATE TABLE x (y TEXT);").unwrap();
        assert!(SqliteThingsStore::new(&path).is_err());
    }

    #[test]
    fn test_inbox() {
        let (_dir, store) = create_test_store();
        let inbox = store.list_view(ListView::Inbox).unwrap();
        assert_eq!(titles(&inbox), vec!["Call plumber"]);
        assert_eq!(inbox[0].tags, vec!["Errand".to_string()]);
    }

    #[test]
    fn test_today_includes_started_and_overdue() {
        let (_dir, store) = create_test_store();
        let today_items = store.list_view(ListView::Today).unwrap();
        assert_eq!(titles(&today_items), vec!["Write report", "Pay rent"]);
    }

    #[test]
    fn test_upcoming_and_someday() {
        let (_dir, store) = create_test_store();
        assert_eq!(titles(&store.list_view(ListView::Upcoming).unwrap()), vec!["Dentist"]);
        assert_eq!(titles(&store.list_view(ListView::Someday).unwrap()), vec!["Learn Rust macros"]);
    }

    #[test]
    fn test_anytime_excludes_closed_and_trashed() {
        let (_dir, store) = create_test_store();
        let anytime = titles(&store.list_view(ListView::Anytime).unwrap()).join(",");
        assert!(anytime.contains("Write report"));
        assert!(!anytime.contains("Old chore"));
        assert!(!anytime.contains("Discarded idea"));
    }

    #[test]
    fn test_logbook_newest_first_and_trash() {
        let (_dir, store) = create_test_store();
        let logbook = store.list_view(ListView::Logbook).unwrap();
        assert_eq!(titles(&logbook), vec!["Old chore", "Skipped chore"]);
        assert_eq!(logbook[0].status, Status::Completed);
        assert!(logbook[0].stop_date.is_some());

        assert_eq!(titles(&store.list_view(ListView::Trash).unwrap()), vec!["Discarded idea"]);
    }

    #[test]
    fn test_todos_by_project_includes_heading_children() {
        let (_dir, store) = create_test_store();
        let filter = TodoFilter {
            project: Some("proj-house".to_string()),
            include_checklist: true,
            ..TodoFilter::default()
        };
        let todos = store.todos(&filter).unwrap();
        assert_eq!(titles(&todos), vec!["Paint fence", "Fix gutter"]);
        assert_eq!(todos[1].heading.as_deref(), Some("Outside"));
        assert_eq!(todos[1].project.as_deref(), Some("House"));
        assert_eq!(todos[0].checklist.len(), 2);
        assert_eq!(todos[0].checklist[1].status, Status::Completed);
    }

    #[test]
    fn test_todos_by_tag_area_and_status() {
        let (_dir, store) = create_test_store();

        let tagged = store
            .todos(&TodoFilter { tag: Some("Errand".to_string()), ..TodoFilter::default() })
            .unwrap();
        assert_eq!(titles(&tagged), vec!["Call plumber"]);

        let in_area = store
            .todos(&TodoFilter { area: Some("area-work".to_string()), ..TodoFilter::default() })
            .unwrap();
        assert_eq!(titles(&in_area), vec!["Write report"]);

        let canceled = store
            .todos(&TodoFilter { status: Some(Status::Canceled), ..TodoFilter::default() })
            .unwrap();
        assert_eq!(titles(&canceled), vec!["Skipped chore"]);

        let projects = store
            .todos(&TodoFilter { kind: Some(ItemType::Project), ..TodoFilter::default() })
            .unwrap();
        assert_eq!(titles(&projects), vec!["House"]);
    }

    #[test]
    fn test_todos_by_dates() {
        let (_dir, store) = create_test_store();
        let by_deadline = store
            .todos(&TodoFilter {
                deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
                ..TodoFilter::default()
            })
            .unwrap();
        assert_eq!(titles(&by_deadline), vec!["Pay rent"]);

        let by_start = store
            .todos(&TodoFilter {
                start_date: NaiveDate::from_ymd_opt(2025, 7, 1),
                ..TodoFilter::default()
            })
            .unwrap();
        assert_eq!(titles(&by_start), vec!["Dentist"]);
    }

    #[test]
    fn test_search_matches_title_and_notes_literally() {
        let (_dir, store) = create_test_store();
        assert_eq!(titles(&store.search("report").unwrap()), vec!["Write report"]);
        assert_eq!(titles(&store.search("quarterly").unwrap()), vec!["Write report"]);
        assert!(store.search("100%").unwrap().is_empty());
        assert!(store.search("nothing like this").unwrap().is_empty());
    }

    #[test]
    fn test_get_returns_any_kind() {
        let (_dir, store) = create_test_store();
        let project = store.get("proj-house").unwrap().unwrap();
        assert_eq!(project.kind, ItemType::Project);
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_projects_with_items() {
        let (_dir, store) = create_test_store();
        let projects = store.projects(true).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].area.as_deref(), Some("Home"));
        assert_eq!(titles(&projects[0].todos), vec!["Paint fence", "Fix gutter"]);

        let bare = store.projects(false).unwrap();
        assert!(bare[0].todos.is_empty());
    }

    #[test]
    fn test_areas_with_items() {
        let (_dir, store) = create_test_store();
        let areas = store.areas(true).unwrap();
        let home = areas.iter().find(|a| a.title == "Home").unwrap();
        assert_eq!(home.projects.len(), 1);
        assert_eq!(home.tags, vec!["Errand".to_string()]);
        let work = areas.iter().find(|a| a.title == "Work").unwrap();
        assert_eq!(titles(&work.todos), vec!["Write report"]);
    }

    #[test]
    fn test_tags_with_items() {
        let (_dir, store) = create_test_store();
        let tags = store.tags(true).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].title, "Errand");
        assert_eq!(tags[0].shortcut.as_deref(), Some("e"));
        assert_eq!(titles(&tags[0].items), vec!["Call plumber"]);
        assert!(tags[1].items.is_empty());
    }

    #[test]
    fn test_created_since() {
        let (_dir, store) = create_test_store();
        let since = DateTime::from_timestamp(ThingsFixture::RECENT_CUTOFF, 0).unwrap();
        let recent = store.created_since(since).unwrap();
        assert_eq!(titles(&recent), vec!["Call plumber"]);
    }

    #[test]
    fn test_auth_token() {
        let (_dir, store) = create_test_store();
        assert_eq!(store.auth_token().unwrap().as_deref(), Some("secret-token"));
    }

    #[test]
    fn test_unavailable_store_reports_reason() {
        let store = UnavailableThingsStore::new("no Things here");
        let err = store.list_view(ListView::Inbox).unwrap_err();
        assert_eq!(err.to_string(), "Things database not found: no Things here");
        assert!(store.auth_token().is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(Some("a\u{1f}b")), vec!["a".to_string(), "b".to_string()]);
        assert!(split_tags(None).is_empty());
    }
}
