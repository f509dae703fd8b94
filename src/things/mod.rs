//! Things 3 integration: read-only database access and URL-scheme writes.

pub mod models;
pub mod store;
pub mod url;

pub use models::{Area, ChecklistItem, ItemType, ListView, Project, StartBucket, Status, Tag, Todo};
pub use store::{SqliteThingsStore, ThingsStore, TodoFilter, UnavailableThingsStore};
pub use url::{UrlParams, UrlValue};
