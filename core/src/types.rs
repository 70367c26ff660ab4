//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently so the
//! client core does not link against Axum. The live integration test catches
//! schema drift between the two crates.
//!
//! Request payloads are strongly typed: the client can only ever send fields
//! of the right type, and `None` fields are left out of the JSON entirely.

use serde::{Deserialize, Serialize};

/// A single todo item. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub message: String,
    pub completed: bool,
}

/// The whole list, in display order. Every operation responds with one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub todos: Vec<TodoItem>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub message: String,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Request payload for deleting a todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodo {
    pub id: i64,
}

/// A store operation that changes the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(CreateTodo),
    Update(UpdateTodo),
    Delete(DeleteTodo),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
        }
    }
}
