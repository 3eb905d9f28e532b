//! Client for the saved-programs service.

use reqwest::blocking::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::parser::decode;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },
    #[error("could not reach the program service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("program service sent an unreadable response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Entry of the program listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: String,
    pub name: String,
}

/// A saved program; `content` is the serialized editor workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProgram {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub content: Value,
}

#[derive(Serialize)]
struct ProgramBody<'a> {
    name: &'a str,
    content: &'a Value,
}

pub struct Client {
    http: HttpClient,
    base: String,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = HttpClient::builder().build()?;
        Ok(Client::with_http(http, base_url))
    }

    /// Uses an already configured HTTP client.
    pub fn with_http(http: HttpClient, base_url: &str) -> Self {
        Client {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Saves a new program and returns its id.
    pub fn create(&self, name: &str, content: &Value) -> Result<String, ApiError> {
        debug!(name, "create program");
        let response = self
            .http
            .post(self.endpoint("create"))
            .json(&ProgramBody { name, content })
            .send()?;
        let id: String = read_json(response)?;
        info!(id = %id, "created program");
        Ok(id)
    }

    pub fn read(&self, id: &str) -> Result<SavedProgram, ApiError> {
        debug!(id, "read program");
        let response = self.http.get(self.endpoint(&format!("read/{}", id))).send()?;
        let mut program: SavedProgram = read_json(response)?;
        program.id = id.to_string();
        Ok(program)
    }

    pub fn update(&self, id: &str, name: &str, content: &Value) -> Result<(), ApiError> {
        debug!(id, name, "update program");
        let response = self
            .http
            .put(self.endpoint(&format!("update/{}", id)))
            .json(&ProgramBody { name, content })
            .send()?;
        check(response)?;
        info!(id, "updated program");
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<(), ApiError> {
        debug!(id, "remove program");
        let response = self.http.delete(self.endpoint(&format!("delete/{}", id))).send()?;
        check(response)?;
        info!(id, "removed program");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<ProgramSummary>, ApiError> {
        debug!("list programs");
        let response = self.http.get(self.endpoint("list")).send()?;
        read_json(response)
    }
}

fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ApiError::RequestFailed {
        status: status.as_u16(),
        body,
    })
}

/// Saved content nests one level per chained block, so bodies go through the
/// unbounded decoder rather than `Response::json`.
fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = check(response)?.text()?;
    decode(&body).map_err(ApiError::Decode)
}
