//! Static catalog of tool names, descriptions and input schemas.

use crate::tools::inputs::{
    AddProjectInput, AddTodoInput, GetTodosInput, IncludeItemsInput, NoInput, NoteTitleInput,
    NotesCreateInput, QueryInput, RecentInput, SearchAdvancedInput, ShowItemInput,
    TaggedItemsInput, UpdateInput,
};
use crate::tools::ToolName;
use once_cell::sync::Lazy;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// One advertised tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    /// Tool name.
    pub name: ToolName,
    /// Free-text description.
    pub description: &'static str,
    /// JSON schema of the arguments object.
    pub input_schema: Map<String, Value>,
}

impl ToolSpec {
    /// Names of the required arguments, as declared by the schema.
    #[must_use]
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Derive an inline JSON schema object for `T`.
fn schema_for<T: JsonSchema>() -> Map<String, Value> {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut schema = match serde_json::to_value(root) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    schema.remove("title");
    schema.remove("description");
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.entry("properties").or_insert_with(|| Value::Object(Map::new()));
    schema
}

fn spec<T: JsonSchema>(name: ToolName, description: &'static str) -> ToolSpec {
    ToolSpec { name, description, input_schema: schema_for::<T>() }
}

static REGISTRY: Lazy<Vec<ToolSpec>> = Lazy::new(|| {
    use ToolName as T;
    vec![
        spec::<NoInput>(T::GetInbox, "Get todos from Inbox"),
        spec::<NoInput>(T::GetToday, "Get todos due today"),
        spec::<NoInput>(T::GetUpcoming, "Get upcoming todos"),
        spec::<NoInput>(T::GetAnytime, "Get todos from Anytime list"),
        spec::<NoInput>(T::GetSomeday, "Get todos from Someday list"),
        spec::<NoInput>(T::GetLogbook, "Get completed todos from Logbook"),
        spec::<NoInput>(T::GetTrash, "Get trashed todos"),
        spec::<GetTodosInput>(T::GetTodos, "Get todos from Things, optionally filtered by project"),
        spec::<IncludeItemsInput>(T::GetProjects, "Get all projects from Things"),
        spec::<IncludeItemsInput>(T::GetAreas, "Get all areas from Things"),
        spec::<IncludeItemsInput>(T::GetTags, "Get all tags"),
        spec::<TaggedItemsInput>(T::GetTaggedItems, "Get items with a specific tag"),
        spec::<QueryInput>(T::SearchTodos, "Search todos by title or notes"),
        spec::<SearchAdvancedInput>(T::SearchAdvanced, "Advanced todo search with multiple filters"),
        spec::<RecentInput>(T::GetRecent, "Get recently created items"),
        spec::<AddTodoInput>(
            T::AddTodo,
            "Create a new todo in Things. The request is handed to Things and not confirmed.",
        ),
        spec::<AddProjectInput>(
            T::AddProject,
            "Create a new project in Things. The request is handed to Things and not confirmed.",
        ),
        spec::<UpdateInput>(
            T::UpdateTodo,
            "Update an existing todo in Things. The request is handed to Things and not confirmed.",
        ),
        spec::<UpdateInput>(
            T::UpdateProject,
            "Update an existing project in Things. The request is handed to Things and not confirmed.",
        ),
        spec::<ShowItemInput>(T::ShowItem, "Show a specific item or list in Things"),
        spec::<QueryInput>(T::SearchItems, "Open the Things search for a query"),
        spec::<NotesCreateInput>(T::NotesCreate, "Create a new note in Apple Notes"),
        spec::<QueryInput>(T::NotesSearch, "Search for notes by title"),
        spec::<NoInput>(T::NotesList, "List all notes in Apple Notes"),
        spec::<NoteTitleInput>(T::NotesGetContent, "Get the content of a specific note"),
        spec::<NoteTitleInput>(T::NotesOpen, "Open a note in Apple Notes app"),
        spec::<NoteTitleInput>(T::NotesDelete, "Delete a note from Apple Notes"),
    ]
});

/// The full tool catalog, in [`ToolName::ALL`] order.
#[must_use]
pub fn registry() -> &'static [ToolSpec] {
    &REGISTRY
}

/// Look up a tool's spec.
#[must_use]
pub fn spec_for(name: ToolName) -> Option<&'static ToolSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}
