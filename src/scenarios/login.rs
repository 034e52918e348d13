use std::time::Duration;

use tracing::info;

use crate::error::HarnessError;
use crate::fixtures::model::{LoginCase, LoginData};
use crate::pages::{LoginPage, Page};
use crate::runner::assert::ensure;
use crate::runner::context::ScenarioContext;
use crate::runner::scenario::Scenario;

pub const SUITE: &str = "ui.login";

const LOGIN_DATA: &str = "loginData.json";

/// How long a submitted login gets to leave the sign-in screen.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the error banner gets to appear.
const ERROR_TIMEOUT: Duration = Duration::from_secs(3);

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::ui(
            SUITE,
            "test_successful_login",
            "Valid credentials reach the dashboard/home page",
            successful_login,
        ),
        Scenario::ui(
            SUITE,
            "test_login_with_invalid_credentials",
            "Invalid credentials show an error message",
            invalid_credentials,
        ),
        Scenario::ui(
            SUITE,
            "test_login_with_empty_credentials",
            "Empty credentials keep the user on the login page or show an error",
            empty_credentials,
        ),
        Scenario::ui(
            SUITE,
            "test_login_with_remember_me",
            "Login with remember me ticked reaches the dashboard/home page",
            remember_me,
        ),
    ]
}

fn login_data(ctx: &ScenarioContext) -> Result<LoginData, HarnessError> {
    Ok(ctx.fixtures().ui().read_as(LOGIN_DATA)?)
}

fn is_landing_url(url: &str) -> bool {
    url.contains("dashboard") || url.contains("home")
}

/// Wait (bounded) for the post-login navigation, then return the URL.
fn landed_url(page: &Page<'_>) -> Result<String, HarnessError> {
    let landed = page
        .wait_for(NAVIGATION_TIMEOUT)
        .for_predicate("url contains dashboard or home", |b| {
            Ok(is_landing_url(&b.current_url()?))
        });
    if let Err(e) = landed {
        if !e.is_timeout() {
            return Err(e.into());
        }
    }
    let url = page.current_url()?;
    info!(%url, "current URL after login");
    Ok(url)
}

fn successful_login(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let LoginCase {
        username, password, ..
    } = login_data(ctx)?.valid_user;
    ctx.parameter("Username", &username);

    let login = LoginPage::new(ctx.page()?);
    ctx.step("Verify login page is displayed");
    ensure(login.is_login_page_displayed(), "login page should be displayed")?;

    ctx.step("Log in with valid credentials");
    login.login(&username, &password)?;

    ctx.step("Verify navigation to dashboard/home");
    let url = landed_url(login.page())?;
    ensure(
        is_landing_url(&url),
        format!("should navigate to dashboard/home page after successful login, got {}", url),
    )
}

fn invalid_credentials(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let case = login_data(ctx)?.invalid_user;
    ctx.parameter("Username", &case.username);

    let login = LoginPage::new(ctx.page()?);
    ctx.step("Log in with invalid credentials");
    login.login(&case.username, &case.password)?;

    ctx.step("Verify error message is displayed");
    ensure(login.wait_for_error(ERROR_TIMEOUT), "error message should be displayed")?;

    let actual = login.error_message()?;
    info!(error = %actual, "error message displayed");
    let expected = case.expected_error.unwrap_or_default().to_lowercase();
    let actual_lower = actual.to_lowercase();
    ensure(
        (!expected.is_empty() && actual_lower.contains(&expected)) || actual_lower.contains("invalid"),
        format!("error message should indicate invalid credentials, got '{}'", actual),
    )
}

fn empty_credentials(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let case = login_data(ctx)?.empty_user;

    let login = LoginPage::new(ctx.page()?);
    ctx.step("Attempt login with empty credentials");
    login.login(&case.username, &case.password)?;

    ctx.step("Verify user stays on the login page or sees an error");
    let error_shown = login.wait_for_error(ERROR_TIMEOUT);
    ensure(
        error_shown || login.is_login_page_displayed(),
        "should remain on login page or show error for empty credentials",
    )
}

fn remember_me(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let LoginCase {
        username, password, ..
    } = login_data(ctx)?.valid_user;
    ctx.parameter("Username", &username);

    let login = LoginPage::new(ctx.page()?);
    ctx.step("Log in with remember me ticked");
    login.login_with_remember_me(&username, &password)?;

    ctx.step("Verify navigation to dashboard/home");
    let url = landed_url(login.page())?;
    ensure(
        is_landing_url(&url),
        format!("should navigate to dashboard/home page after login with remember me, got {}", url),
    )
}
