//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Every operation targets the same `/todos` resource and differs only
//! in method and body; every response is the full list, so there is a single
//! `parse_snapshot` for all of them.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeleteTodo, Mutation, Snapshot, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn todos_path(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    pub fn build_read(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.todos_path(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, input)
    }

    pub fn build_update(&self, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, input)
    }

    pub fn build_delete(&self, input: &DeleteTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Delete, input)
    }

    pub fn build_mutation(&self, mutation: &Mutation) -> Result<HttpRequest, ApiError> {
        match mutation {
            Mutation::Create(input) => self.build_create(input),
            Mutation::Update(input) => self.build_update(input),
            Mutation::Delete(input) => self.build_delete(input),
        }
    }

    /// Parse the `{ "todos": [...] }` body every operation responds with.
    pub fn parse_snapshot(&self, response: HttpResponse) -> Result<Snapshot, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    fn json_request<T: Serialize>(&self, method: HttpMethod, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: self.todos_path(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoItem;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_read_produces_correct_request() {
        let req = client().build_read();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_produces_correct_request() {
        let input = CreateTodo {
            message: "Buy milk".to_string(),
        };
        let req = client().build_create(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Buy milk"}));
    }

    #[test]
    fn build_update_omits_unset_fields() {
        let input = UpdateTodo {
            id: 7,
            message: None,
            completed: Some(true),
        };
        let req = client().build_update(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"id": 7, "completed": true}));
    }

    #[test]
    fn build_delete_sends_id_in_body() {
        let req = client().build_delete(&DeleteTodo { id: 7 }).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todos");
        assert_eq!(req.body.as_deref(), Some(r#"{"id":7}"#));
    }

    #[test]
    fn build_mutation_dispatches_on_operation() {
        let c = client();
        let create = c
            .build_mutation(&Mutation::Create(CreateTodo { message: "x".to_string() }))
            .unwrap();
        let delete = c.build_mutation(&Mutation::Delete(DeleteTodo { id: 1 })).unwrap();
        assert_eq!(create.method, HttpMethod::Put);
        assert_eq!(delete.method, HttpMethod::Delete);
    }

    #[test]
    fn parse_snapshot_success() {
        let todos = client()
            .parse_snapshot(ok(r#"{"todos":[{"id":1,"message":"Test","completed":false}]}"#))
            .unwrap();
        assert_eq!(
            todos.todos,
            vec![TodoItem { id: 1, message: "Test".to_string(), completed: false }]
        );
    }

    #[test]
    fn parse_snapshot_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_snapshot(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_snapshot_wrong_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_snapshot(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_snapshot_bad_json() {
        let err = client().parse_snapshot(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_snapshot_rejects_bare_array() {
        let err = client().parse_snapshot(ok("[]")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_read();
        assert_eq!(req.path, "http://localhost:3000/todos");
    }
}
