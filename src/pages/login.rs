use std::time::Duration;

use tracing::info;

use crate::browser::locator::Locator;
use crate::pages::base::{Page, PageError};

const USERNAME_ID: &str = "user-name";
const PASSWORD_ID: &str = "password";
const LOGIN_BUTTON_ID: &str = "login-button";
const REMEMBER_ME_ID: &str = "remember-me";
const ERROR_CSS: &str = "[data-test='error']";
const TITLE_CSS: &str = ".login_logo";
const FORGOT_PASSWORD_TEXT: &str = "Forgot Password?";

/// The application's sign-in screen.
pub struct LoginPage<'a> {
    page: Page<'a>,
}

impl<'a> LoginPage<'a> {
    pub fn new(page: Page<'a>) -> Self {
        info!("login page bound");
        LoginPage { page }
    }

    pub fn page(&self) -> &Page<'a> {
        &self.page
    }

    pub fn enter_username(&self, username: &str) -> Result<(), PageError> {
        info!(username, "entering username");
        self.page.type_text(&Locator::id(USERNAME_ID), username)
    }

    pub fn enter_password(&self, password: &str) -> Result<(), PageError> {
        info!("entering password");
        self.page.type_text(&Locator::id(PASSWORD_ID), password)
    }

    pub fn click_login(&self) -> Result<(), PageError> {
        self.page.click(&Locator::id(LOGIN_BUTTON_ID))
    }

    /// Tick "remember me" unless it is already checked.
    pub fn check_remember_me(&self) -> Result<(), PageError> {
        let checkbox = Locator::id(REMEMBER_ME_ID);
        if self.page.attribute(&checkbox, "checked")?.is_none() {
            self.page.click(&checkbox)?;
        }
        Ok(())
    }

    pub fn click_forgot_password(&self) -> Result<(), PageError> {
        self.page.click(&Locator::link_text(FORGOT_PASSWORD_TEXT))
    }

    pub fn error_message(&self) -> Result<String, PageError> {
        self.page.text(&Locator::css(ERROR_CSS))
    }

    pub fn is_error_displayed(&self) -> bool {
        self.page.is_displayed(&Locator::css(ERROR_CSS))
    }

    /// Give the error banner up to `timeout` to appear.
    pub fn wait_for_error(&self, timeout: Duration) -> bool {
        self.page
            .wait_for(timeout)
            .visible(&Locator::css(ERROR_CSS))
            .is_ok()
    }

    pub fn login_title(&self) -> Result<String, PageError> {
        self.page.text(&Locator::css(TITLE_CSS))
    }

    pub fn is_login_page_displayed(&self) -> bool {
        self.page.is_displayed(&Locator::css(TITLE_CSS))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(), PageError> {
        info!(username, "logging in");
        self.enter_username(username)?;
        self.enter_password(password)?;
        self.click_login()
    }

    pub fn login_with_remember_me(&self, username: &str, password: &str) -> Result<(), PageError> {
        info!(username, "logging in with remember me");
        self.enter_username(username)?;
        self.enter_password(password)?;
        self.check_remember_me()?;
        self.click_login()
    }
}
