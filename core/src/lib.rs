//! Synchronous API client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the caller's
//! visible list in step with the store through `MutationClient`.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Every operation answers with the whole list, so `parse_snapshot` serves
//!   all of them.
//! - `MutationClient` applies optimistic projections and reconciles them
//!   with authoritative responses; the host supplies I/O via `Transport`.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod mutation;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use mutation::{MutateOptions, MutationClient, PendingMutation, Resolution};
pub use types::{CreateTodo, DeleteTodo, Mutation, Snapshot, TodoItem, UpdateTodo};
