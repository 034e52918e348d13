use std::time::Duration;

use tracing::info;

use crate::api::auth::missing_login_fields;
use crate::api::{ApiResponse, AuthApi};
use crate::error::HarnessError;
use crate::runner::assert::{ensure, ensure_eq};
use crate::runner::context::ScenarioContext;
use crate::runner::scenario::Scenario;

pub const SUITE: &str = "api.login";

const VALID_PAYLOAD: &str = "loginPayload.json";
const INVALID_PAYLOAD: &str = "invalidLoginPayload.json";
const INCOMPLETE_PAYLOAD: &str = "incompleteLoginPayload.json";

/// Upper bound for an acceptable login round trip.
pub const MAX_RESPONSE_TIME: Duration = Duration::from_millis(3000);

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::api(
            SUITE,
            "test_api_login_with_valid_credentials",
            "Valid credentials return 200 with a token and the user",
            valid_credentials,
        ),
        Scenario::api(
            SUITE,
            "test_api_login_with_invalid_credentials",
            "Invalid credentials return 401/403 with a message",
            invalid_credentials,
        ),
        Scenario::api(
            SUITE,
            "test_api_login_with_missing_fields",
            "A payload without password returns 400 with a message",
            missing_fields,
        ),
        Scenario::api(
            SUITE,
            "test_api_login_response_time",
            "Login responds in under 3000 ms",
            response_time,
        ),
        Scenario::api(
            SUITE,
            "test_api_login_response_schema",
            "Login response carries token, user, user.username and user.email",
            response_schema,
        ),
    ]
}

/// POST the named payload fixture to the login endpoint.
fn post_payload(ctx: &ScenarioContext, fixture: &str) -> Result<ApiResponse, HarnessError> {
    let payload = ctx.fixtures().api().read_string(fixture)?;
    info!(fixture, "request payload loaded");
    let client = ctx.api_client()?;
    ctx.step(&format!("POST login endpoint with {}", fixture));
    let response = AuthApi::new(&client).login_raw(&payload)?;
    info!(status = response.status, "response status code");
    Ok(response)
}

fn attach_body(ctx: &ScenarioContext, name: &str, response: &ApiResponse) {
    match response.json() {
        Ok(json) => ctx.attach_json(name, &json),
        Err(_) => ctx.attach_text(name, &response.body),
    };
}

fn non_empty(value: Option<String>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn valid_credentials(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let response = post_payload(ctx, VALID_PAYLOAD)?;
    attach_body(ctx, "Response Body", &response);

    ctx.step("Verify status code is 200");
    ensure_eq(response.status, 200, "status code for successful login")?;

    ctx.step("Verify token and username are present");
    ensure(non_empty(response.string_at("token")), "response should contain a non-empty token")?;
    let username = response.string_at("user.username");
    info!(username = ?username, "username in response");
    ensure(non_empty(username), "response should contain user.username")
}

fn invalid_credentials(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let response = post_payload(ctx, INVALID_PAYLOAD)?;
    attach_body(ctx, "Error Response", &response);

    ctx.step("Verify status code is 401 or 403");
    ensure(
        response.status == 401 || response.status == 403,
        format!("status code should be 401 or 403 for invalid credentials, got {}", response.status),
    )?;

    ctx.step("Verify error message is present");
    let message = response.string_at("message");
    info!(message = ?message, "error message");
    ensure(message.is_some(), "response should contain an error message")
}

fn missing_fields(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let response = post_payload(ctx, INCOMPLETE_PAYLOAD)?;
    attach_body(ctx, "Validation Error", &response);

    ctx.step("Verify status code is 400");
    ensure_eq(response.status, 400, "status code for missing required fields")?;

    ctx.step("Verify validation message is present");
    ensure(
        response.string_at("message").is_some(),
        "response should contain a validation error",
    )
}

fn response_time(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let response = post_payload(ctx, VALID_PAYLOAD)?;
    let elapsed = response.elapsed_ms();
    info!(elapsed_ms = elapsed as u64, "API response time");
    ctx.attach_text("Response Time", &format!("{} ms", elapsed));

    ctx.step("Verify response time is under 3000 ms");
    ensure(
        response.elapsed < MAX_RESPONSE_TIME,
        format!("API response time should be under {}ms, but was: {}ms", MAX_RESPONSE_TIME.as_millis(), elapsed),
    )
}

fn response_schema(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let response = post_payload(ctx, VALID_PAYLOAD)?;
    ensure_eq(response.status, 200, "status code")?;

    ctx.step("Verify response schema");
    let missing = missing_login_fields(&response);
    ensure(
        missing.is_empty(),
        format!("response is missing fields: {}", missing.join(", ")),
    )?;
    info!("response schema validation passed");
    attach_body(ctx, "Response Schema", &response);
    Ok(())
}
