//! Tool-call routing.
//!
//! The dispatcher is the single boundary where failures become text: every
//! error raised below it is logged and returned as an error block, never
//! propagated to the protocol layer.

use crate::command::{OsaScriptRunner, SystemUrlOpener};
use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::format::{self, join_records};
use crate::logging::{self, ToolCallGuard};
use crate::notes::{AppleNotes, NotesAutomationPort};
use crate::things::url::{self, UrlValue};
use crate::things::{
    ItemType, ListView, SqliteThingsStore, ThingsStore, TodoFilter, UnavailableThingsStore,
};
use crate::tools::inputs::{
    AddProjectInput, AddTodoInput, GetTodosInput, IncludeItemsInput, NoteTitleInput,
    NotesCreateInput, QueryInput, RecentInput, SearchAdvancedInput, ShowItemInput,
    TaggedItemsInput, UpdateInput,
};
use crate::tools::registry::spec_for;
use crate::tools::{ToolName, ToolResult};
use crate::traits::UrlOpener;
use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Accepted `get-recent` periods: a count and a unit (days, weeks, months, years).
/// Reply for notes calls whose title argument is empty.
const NOTE_TITLE_REQUIRED: &str = "Note title is required";

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)([dwmy])$").unwrap());

/// Routes tool calls to the Things store, the URL scheme, or Apple Notes.
#[derive(Clone)]
pub struct Dispatcher {
    things: Arc<dyn ThingsStore>,
    notes: Arc<dyn NotesAutomationPort>,
    opener: Arc<dyn UrlOpener>,
}

impl Dispatcher {
    /// Create a dispatcher over the given collaborators.
    pub fn new(
        things: Arc<dyn ThingsStore>,
        notes: Arc<dyn NotesAutomationPort>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self { things, notes, opener }
    }

    /// Build the production dispatcher from configuration.
    ///
    /// A missing Things database is not fatal: the Things tools report it on
    /// each call and the notes tools keep working.
    pub fn from_config(config: &BridgeConfig) -> Self {
        let things: Arc<dyn ThingsStore> =
            match SqliteThingsStore::discover(config.things_db_path.as_deref()) {
                Ok(store) => {
                    logging::log_event(&format!(
                        "Using Things database at {}",
                        store.db_path().display()
                    ));
                    Arc::new(store)
                }
                Err(e) => {
                    logging::log_warning(&format!("Things tools unavailable: {e}"));
                    let reason = match e {
                        Error::DatabaseNotFound(reason) => reason,
                        other => other.to_string(),
                    };
                    Arc::new(UnavailableThingsStore::new(reason))
                }
            };
        let notes = AppleNotes::new(
            Arc::new(OsaScriptRunner::new()),
            config.notes_account.clone(),
            config.script_timeout(),
        );
        Self::new(things, Arc::new(notes), Arc::new(SystemUrlOpener::new()))
    }

    /// Execute one tool call.
    ///
    /// Always returns a result; failures are reported as error blocks.
    pub async fn dispatch(&self, name: &str, arguments: Option<Map<String, Value>>) -> ToolResult {
        let mut guard = ToolCallGuard::new(name);
        let result = match self.route(name, arguments.unwrap_or_default()).await {
            Ok(result) => result,
            Err(e) => {
                logging::log_error(&format!("Tool {name} failed: {e:?}"));
                ToolResult::error(format!("Error: {e}"))
            }
        };
        if result.is_error {
            guard.mark_error();
        }
        result
    }

    async fn route(&self, name: &str, args: Map<String, Value>) -> Result<ToolResult> {
        let tool: ToolName = name.parse()?;
        check_required(tool, &args)?;

        match tool {
            ToolName::GetInbox => self.list_view(ListView::Inbox),
            ToolName::GetToday => self.list_view(ListView::Today),
            ToolName::GetUpcoming => self.list_view(ListView::Upcoming),
            ToolName::GetAnytime => self.list_view(ListView::Anytime),
            ToolName::GetSomeday => self.list_view(ListView::Someday),
            ToolName::GetLogbook => self.list_view(ListView::Logbook),
            ToolName::GetTrash => self.list_view(ListView::Trash),
            ToolName::GetTodos => self.get_todos(parse_args(tool, args)?),
            ToolName::GetProjects => {
                let input: IncludeItemsInput = parse_args(tool, args)?;
                let projects = self.things.projects(input.include_items)?;
                Ok(ToolResult::text(join_records(
                    &projects,
                    |p| format::format_project(p, input.include_items),
                    format::NO_PROJECTS,
                )))
            }
            ToolName::GetAreas => {
                let input: IncludeItemsInput = parse_args(tool, args)?;
                let areas = self.things.areas(input.include_items)?;
                Ok(ToolResult::text(join_records(
                    &areas,
                    |a| format::format_area(a, input.include_items),
                    format::NO_AREAS,
                )))
            }
            ToolName::GetTags => {
                let input: IncludeItemsInput = parse_args(tool, args)?;
                let tags = self.things.tags(input.include_items)?;
                Ok(ToolResult::text(join_records(
                    &tags,
                    |t| format::format_tag(t, input.include_items),
                    format::NO_TAGS,
                )))
            }
            ToolName::GetTaggedItems => {
                let input: TaggedItemsInput = parse_args(tool, args)?;
                let filter = TodoFilter { tag: Some(input.tag.clone()), ..TodoFilter::default() };
                let todos = self.things.todos(&filter)?;
                let empty = format!("No items found with tag '{}'", input.tag);
                Ok(ToolResult::text(join_records(&todos, format::format_todo, &empty)))
            }
            ToolName::SearchTodos => {
                let input: QueryInput = parse_args(tool, args)?;
                let todos = self.things.search(&input.query)?;
                let empty = format!("No todos found matching '{}'", input.query);
                Ok(ToolResult::text(join_records(&todos, format::format_todo, &empty)))
            }
            ToolName::SearchAdvanced => self.search_advanced(parse_args(tool, args)?),
            ToolName::GetRecent => {
                let input: RecentInput = parse_args(tool, args)?;
                let since = period_start(&input.period, Utc::now())?;
                let todos = self.things.created_since(since)?;
                let empty = format!("No items found in the last {}", input.period);
                Ok(ToolResult::text(join_records(&todos, format::format_todo, &empty)))
            }
            ToolName::AddTodo => self.add_todo(parse_args(tool, args)?).await,
            ToolName::AddProject => self.add_project(parse_args(tool, args)?).await,
            ToolName::UpdateTodo => self.update("update", "todo", parse_args(tool, args)?).await,
            ToolName::UpdateProject => {
                self.update("update-project", "project", parse_args(tool, args)?).await
            }
            ToolName::ShowItem => {
                let input: ShowItemInput = parse_args(tool, args)?;
                let params = vec![
                    ("id", UrlValue::Text(input.id.clone())),
                    ("query", UrlValue::text(input.query.as_deref())),
                    ("filter", UrlValue::list(input.filter_tags.as_deref())),
                ];
                self.submit("show", params, &format!("show '{}'", input.id)).await
            }
            ToolName::SearchItems => {
                let input: QueryInput = parse_args(tool, args)?;
                let params = vec![("query", UrlValue::Text(input.query.clone()))];
                self.submit("search", params, &format!("search for '{}'", input.query)).await
            }
            ToolName::NotesCreate => self.notes_create(parse_args(tool, args)?).await,
            ToolName::NotesSearch => {
                let input: QueryInput = parse_args(tool, args)?;
                if input.query.is_empty() {
                    return Ok(ToolResult::error("Search query is required"));
                }
                Ok(match self.notes.search_notes(&input.query).await {
                    Ok(notes) => {
                        ToolResult::text(format::format_note_list(&notes, format::NO_MATCHING_NOTES))
                    }
                    Err(e) => ToolResult::error(format!("Error searching notes: {e}")),
                })
            }
            ToolName::NotesList => Ok(match self.notes.list_notes().await {
                Ok(notes) => ToolResult::text(format::format_note_list(&notes, format::NO_NOTES)),
                Err(e) => ToolResult::error(format!("Error listing notes: {e}")),
            }),
            ToolName::NotesGetContent => {
                let input: NoteTitleInput = parse_args(tool, args)?;
                if input.title.is_empty() {
                    return Ok(ToolResult::error(NOTE_TITLE_REQUIRED));
                }
                Ok(match self.notes.get_note_content(&input.title).await? {
                    Some(body) => ToolResult::text(format!("Title: {}\n\n{body}", input.title)),
                    None => ToolResult::error(format!("Note not found: '{}'", input.title)),
                })
            }
            ToolName::NotesOpen => {
                let input: NoteTitleInput = parse_args(tool, args)?;
                if input.title.is_empty() {
                    return Ok(ToolResult::error(NOTE_TITLE_REQUIRED));
                }
                Ok(if self.notes.open_note(&input.title).await? {
                    ToolResult::text(format!("Note opened successfully: \"{}\"", input.title))
                } else {
                    ToolResult::error(format!(
                        "Failed to open note: \"{}\". Note may not exist.",
                        input.title
                    ))
                })
            }
            ToolName::NotesDelete => {
                let input: NoteTitleInput = parse_args(tool, args)?;
                if input.title.is_empty() {
                    return Ok(ToolResult::error(NOTE_TITLE_REQUIRED));
                }
                Ok(if self.notes.delete_note(&input.title).await? {
                    ToolResult::text(format!("Note deleted successfully: \"{}\"", input.title))
                } else {
                    ToolResult::error(format!(
                        "Failed to delete note: \"{}\". Note may not exist.",
                        input.title
                    ))
                })
            }
        }
    }

    fn list_view(&self, view: ListView) -> Result<ToolResult> {
        let todos = self.things.list_view(view)?;
        Ok(ToolResult::text(join_records(&todos, format::format_todo, format::NO_ITEMS)))
    }

    fn get_todos(&self, input: GetTodosInput) -> Result<ToolResult> {
        let project = input.project_uuid.filter(|uuid| !uuid.is_empty());
        if let Some(uuid) = &project {
            let is_project =
                self.things.get(uuid)?.is_some_and(|item| item.kind == ItemType::Project);
            if !is_project {
                return Err(Error::InvalidProjectId(uuid.clone()));
            }
        }
        let filter = TodoFilter {
            project,
            include_checklist: input.include_items,
            ..TodoFilter::default()
        };
        let todos = self.things.todos(&filter)?;
        Ok(ToolResult::text(join_records(&todos, format::format_todo, format::NO_TODOS)))
    }

    fn search_advanced(&self, input: SearchAdvancedInput) -> Result<ToolResult> {
        let filter = TodoFilter {
            status: input.status,
            start_date: parse_date("start_date", input.start_date.as_deref())?,
            deadline: parse_date("deadline", input.deadline.as_deref())?,
            tag: input.tag,
            area: input.area,
            kind: input.kind,
            include_checklist: false,
            project: None,
        };
        let todos = self.things.todos(&filter)?;
        Ok(ToolResult::text(join_records(&todos, format::format_todo, format::NO_MATCHING_TODOS)))
    }

    async fn add_todo(&self, input: AddTodoInput) -> Result<ToolResult> {
        let params = vec![
            ("title", UrlValue::Text(input.title.clone())),
            ("notes", UrlValue::text(input.notes.as_deref())),
            ("when", UrlValue::text(input.when.as_deref())),
            ("deadline", UrlValue::text(input.deadline.as_deref())),
            ("checklist-items", UrlValue::lines(input.checklist_items.as_deref())),
            ("list-id", UrlValue::text(input.list_id.as_deref())),
            ("list", UrlValue::text(input.list_title.as_deref())),
            ("heading", UrlValue::text(input.heading.as_deref())),
            ("completed", UrlValue::flag(input.completed)),
            ("tags", UrlValue::list(input.tags.as_deref())),
        ];
        self.submit("add", params, &format!("add todo '{}'", input.title)).await
    }

    async fn add_project(&self, input: AddProjectInput) -> Result<ToolResult> {
        let params = vec![
            ("title", UrlValue::Text(input.title.clone())),
            ("notes", UrlValue::text(input.notes.as_deref())),
            ("when", UrlValue::text(input.when.as_deref())),
            ("deadline", UrlValue::text(input.deadline.as_deref())),
            ("area-id", UrlValue::text(input.area_id.as_deref())),
            ("area", UrlValue::text(input.area_title.as_deref())),
            ("to-dos", UrlValue::lines(input.todos.as_deref())),
            ("tags", UrlValue::list(input.tags.as_deref())),
        ];
        self.submit("add-project", params, &format!("add project '{}'", input.title)).await
    }

    async fn update(&self, command: &str, noun: &str, input: UpdateInput) -> Result<ToolResult> {
        let params = vec![
            ("id", UrlValue::Text(input.id.clone())),
            ("title", UrlValue::text(input.title.as_deref())),
            ("notes", UrlValue::text(input.notes.as_deref())),
            ("when", UrlValue::text(input.when.as_deref())),
            ("deadline", UrlValue::text(input.deadline.as_deref())),
            ("tags", UrlValue::list(input.tags.as_deref())),
            ("completed", UrlValue::flag(input.completed)),
            ("canceled", UrlValue::flag(input.canceled)),
        ];
        self.submit(command, params, &format!("update {noun} '{}'", input.id)).await
    }

    /// Build the URL, hand it to the OS and report the submission.
    async fn submit(
        &self,
        command: &str,
        params: url::UrlParams,
        action: &str,
    ) -> Result<ToolResult> {
        let token = if url::requires_auth(command) { self.auth_token() } else { None };
        let target = url::build(command, params, token.as_deref());
        self.opener.open(&target).await?;
        Ok(ToolResult::text(format!(
            "Request submitted to Things: {action}. Things does not report whether it was applied."
        )))
    }

    fn auth_token(&self) -> Option<String> {
        match self.things.auth_token() {
            Ok(token) => {
                if token.is_none() {
                    logging::log_warning("Things has no URL-scheme auth token configured");
                }
                token
            }
            Err(e) => {
                logging::log_warning(&format!("Could not read Things auth token: {e}"));
                None
            }
        }
    }

    async fn notes_create(&self, input: NotesCreateInput) -> Result<ToolResult> {
        if input.title.is_empty() {
            return Ok(ToolResult::error("Title is required"));
        }
        if input.content.is_empty() {
            return Ok(ToolResult::error("Content is required"));
        }
        Ok(match self.notes.create_note(&input.title, &input.content, &input.tags).await {
            Ok(note) => ToolResult::text(format!("Note created successfully: \"{}\"", note.title)),
            Err(e) => ToolResult::error(format!("Failed to create note: {e}")),
        })
    }
}

/// Reject calls that omit an argument the tool's schema marks as required.
fn check_required(tool: ToolName, args: &Map<String, Value>) -> Result<()> {
    let Some(spec) = spec_for(tool) else {
        return Ok(());
    };
    for name in spec.required() {
        if args.get(name).map_or(true, Value::is_null) {
            return Err(Error::MissingParameter(name.to_string()));
        }
    }
    Ok(())
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, args: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| Error::InvalidArgument(format!("Invalid arguments for {tool}: {e}")))
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                Error::InvalidArgument(format!("Invalid {field} '{v}': expected YYYY-MM-DD"))
            })
        })
        .transpose()
}

/// Start of a `get-recent` window such as `3d` or `2m`, counted back from `now`.
fn period_start(period: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let invalid = || {
        Error::InvalidArgument(format!(
            "Invalid period '{period}': expected a number followed by d, w, m or y"
        ))
    };
    let caps = PERIOD_RE.captures(period).ok_or_else(invalid)?;
    let count: u32 = caps[1].parse().map_err(|_| invalid())?;
    let start = match &caps[2] {
        "d" => now.checked_sub_days(Days::new(u64::from(count))),
        "w" => now.checked_sub_days(Days::new(u64::from(count) * 7)),
        "m" => now.checked_sub_months(Months::new(count)),
        "y" => count.checked_mul(12).and_then(|months| now.checked_sub_months(Months::new(months))),
        _ => None,
    };
    start.ok_or_else(invalid)
}
