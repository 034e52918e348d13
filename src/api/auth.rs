use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::client::{ApiClient, ApiError, ApiResponse};

pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";

/// Fields every successful login response must carry.
pub const LOGIN_SCHEMA_PATHS: [&str; 4] = ["token", "user", "user.username", "user.email"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// `200` body of the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub token: String,
    pub user: LoginUser,
}

/// `4xx` body of the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginFailure {
    pub message: String,
}

/// Typed access to the authentication endpoints.
pub struct AuthApi<'c> {
    client: &'c ApiClient,
}

impl<'c> AuthApi<'c> {
    pub fn new(client: &'c ApiClient) -> Self {
        AuthApi { client }
    }

    /// POST the credentials payload to the login endpoint.
    pub fn login(&self, payload: &Value) -> Result<ApiResponse, ApiError> {
        info!("calling login endpoint");
        self.client.post(LOGIN_ENDPOINT, payload)
    }

    pub fn login_raw(&self, json: &str) -> Result<ApiResponse, ApiError> {
        self.client.post_raw(LOGIN_ENDPOINT, json)
    }
}

/// Paths from [`LOGIN_SCHEMA_PATHS`] missing (or null) in `response`.
pub fn missing_login_fields(response: &ApiResponse) -> Vec<&'static str> {
    LOGIN_SCHEMA_PATHS
        .iter()
        .copied()
        .filter(|path| matches!(response.json_path(path), None | Some(Value::Null)))
        .collect()
}
