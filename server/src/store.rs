//! The authoritative todo list.
//!
//! # Design
//! `TodoStore` owns the item sequence and a handle to its blob storage. Every
//! operation is read-modify-persist-return: it applies whatever part of the
//! request is usable, writes the whole list back under [`STORAGE_KEY`], and
//! returns a cloned [`Snapshot`].
//!
//! No operation fails. Missing or mistyped request fields degrade the call to
//! a no-op; mistyped ones are also logged at `warn`.
//! Storage errors are logged and absorbed.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::storage::{BlobStorage, StorageError};
use crate::types::{CreateRequest, DeleteRequest, Field, Snapshot, TodoItem, UpdateRequest};

/// Key holding the JSON array of todos.
pub const STORAGE_KEY: &str = "todos";

/// Millisecond clock used to derive ids.
pub type Clock = fn() -> i64;

pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Time-derived ids that never repeat: each id is the current time, bumped
/// past the previous id when the clock has not advanced.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    last: i64,
    clock: Clock,
}

impl IdGenerator {
    pub fn new(clock: Clock, last: i64) -> Self {
        Self { last, clock }
    }

    pub fn next_id(&mut self) -> i64 {
        let now = (self.clock)();
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }
}

pub struct TodoStore {
    todos: Vec<TodoItem>,
    storage: Arc<dyn BlobStorage>,
    ids: IdGenerator,
}

impl TodoStore {
    /// Load the persisted list, or start empty if there is none.
    pub fn open(storage: Arc<dyn BlobStorage>) -> Self {
        Self::open_with_clock(storage, system_clock)
    }

    pub fn open_with_clock(storage: Arc<dyn BlobStorage>, clock: Clock) -> Self {
        let todos = load_todos(storage.as_ref());
        let last = todos.iter().map(|todo| todo.id).max().unwrap_or(i64::MIN);
        debug!(count = todos.len(), "todo store opened");
        Self {
            todos,
            storage,
            ids: IdGenerator::new(clock, last),
        }
    }

    pub fn read(&self) -> Snapshot {
        Snapshot {
            todos: self.todos.clone(),
        }
    }

    pub fn create(&mut self, request: CreateRequest) -> Snapshot {
        let Some(message) = accept(request.message, "message") else {
            return self.read();
        };

        let id = self.ids.next_id();
        self.todos.push(TodoItem {
            id,
            message,
            completed: false,
        });
        debug!(id, "todo created");
        self.persist();
        self.read()
    }

    pub fn update(&mut self, request: UpdateRequest) -> Snapshot {
        let Some(id) = accept(request.id, "id") else {
            return self.read();
        };
        let message = accept(request.message, "message");
        let completed = accept(request.completed, "completed");

        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) else {
            debug!(id, "update matched no todo");
            return self.read();
        };
        if let Some(message) = message {
            todo.message = message;
        }
        if let Some(completed) = completed {
            todo.completed = completed;
        }
        debug!(id, "todo updated");
        self.persist();
        self.read()
    }

    /// Remove every item with the given id. A missing, mistyped or zero id
    /// leaves the list and the stored blob untouched.
    pub fn delete(&mut self, request: DeleteRequest) -> Snapshot {
        let Some(id) = accept(request.id, "id").filter(|id| *id != 0) else {
            return self.read();
        };

        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        debug!(id, removed = before - self.todos.len(), "todo delete applied");
        self.persist();
        self.read()
    }

    fn persist(&self) {
        if let Err(err) = self.write_back() {
            error!(error = %err, "failed to persist todos");
        }
    }

    fn write_back(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.todos)?;
        self.storage.save(STORAGE_KEY, &encoded)
    }
}

/// Unwrap a usable field, logging the ones dropped for having the wrong type.
fn accept<T>(field: Field<T>, name: &'static str) -> Option<T> {
    if let Field::Invalid(raw) = &field {
        warn!(field = name, value = %raw, "ignoring field with unexpected type");
    }
    field.valid()
}

fn load_todos(storage: &dyn BlobStorage) -> Vec<TodoItem> {
    let raw = match storage.load(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!(error = %err, "failed to load todos, starting empty");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "persisted todos are unreadable, starting empty");
        Vec::new()
    })
}
