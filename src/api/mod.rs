pub mod auth;
pub mod client;

pub use auth::{AuthApi, LOGIN_ENDPOINT, LoginFailure, LoginSuccess};
pub use client::{ApiClient, ApiError, ApiResponse};
