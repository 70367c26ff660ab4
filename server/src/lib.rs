//! HTTP surface for the todo store.
//!
//! # Overview
//! One resource, `/todos`, with one method per store operation. Every
//! response is `200` with the full list as `{ "todos": [...] }`, so a client
//! can replace its view with whatever comes back.
//!
//! # Design
//! - The store sits behind `Arc<RwLock<_>>`; mutations take the write lock for
//!   the whole read-modify-persist step.
//! - Bodies that are not usable JSON are treated as empty payloads, which the
//!   store turns into a no-op. Clients never see a 4xx from this service.
//! - Responses carry `Cache-Control: no-cache`; the list is always live.

pub mod storage;
pub mod store;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName},
    routing::get,
    Json, Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub use storage::{BlobStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{TodoStore, STORAGE_KEY};
pub use types::{CreateRequest, DeleteRequest, Field, Snapshot, TodoItem, UpdateRequest};

pub type Db = Arc<RwLock<TodoStore>>;

type SnapshotResponse = ([(HeaderName, &'static str); 1], Json<Snapshot>);

pub fn app(store: TodoStore) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route(
            "/todos",
            get(read_todos)
                .put(create_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "todo server listening");
    }
    axum::serve(listener, app(store)).await
}

fn respond(snapshot: Snapshot) -> SnapshotResponse {
    ([(header::CACHE_CONTROL, "no-cache")], Json(snapshot))
}

/// Fall back to an empty payload when the body is missing or malformed.
fn payload<T: Default>(
    operation: &'static str,
    body: Result<Json<T>, JsonRejection>,
) -> T {
    match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!(operation, error = %rejection, "unusable request body, treating as empty");
            T::default()
        }
    }
}

async fn read_todos(State(db): State<Db>) -> SnapshotResponse {
    respond(db.read().await.read())
}

async fn create_todo(
    State(db): State<Db>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> SnapshotResponse {
    let request = payload("create", body);
    respond(db.write().await.create(request))
}

async fn update_todo(
    State(db): State<Db>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> SnapshotResponse {
    let request = payload("update", body);
    respond(db.write().await.update(request))
}

async fn delete_todo(
    State(db): State<Db>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> SnapshotResponse {
    let request = payload("delete", body);
    respond(db.write().await.delete(request))
}
