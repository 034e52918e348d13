use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::locator::Locator;
use crate::pages::base::{Page, PageError};
use crate::pages::workflow::{BasicInfo, ClaimantDetails, FnolWorkflow, PolicySearch};

// ============================================================================
// Locators
// ============================================================================

const CLAIM_TAB_EXPAND: &str = "//*[@id='TabBar-ClaimTab']/div[3]/div";
const NEW_CLAIM_ITEM: &str = "//*[@id='TabBar-ClaimTab-ClaimTab_FNOLWizard']/div";

const FIND_POLICY: &str = "FNOLWizard-FNOLWizard_FindPolicyScreen-FNOLWizardFindPolicyPanelSet";
const POLICY_TYPE_WIDGET: &str = "FNOLWizard-FNOLWizard_FindPolicyScreen-FNOLWizardFindPolicyPanelSet-ClaimLossType";
const LOSS_TYPE_WIDGET: &str = "FNOLWizard-FNOLWizard_FindPolicyScreen-FNOLWizardFindPolicyPanelSet-Type";

const FIRST_NAME: &str = "//input[contains(@name,'FirstName') or contains(@name,'first')]";
const LAST_NAME: &str = "//input[contains(@name,'LastName') or contains(@name,'last')]";
const LOSS_TIME_TEXT: &str =
    "//input[@type='text' and (@placeholder='hh:mm' or contains(@aria-label,'hh:mm'))]";

const SEARCH_BUTTON: &str =
    "//div[contains(@id,'FNOLWizardFindPolicyPanelSet-Search') and contains(@class,'gw-actionable')]";
const NEXT_BUTTON: &str =
    "//div[contains(@id,'FNOLWizard') and contains(@id,'Next') and contains(@class,'gw-action')]";
const CLICK_OVERLAY_ID: &str = "gw-click-overlay";

const SEARCH_RESULTS: &str = "//div[contains(@class,'gw-ListView') or contains(@id,'SearchResults')]";
const ERROR_MESSAGE: &str = "//div[contains(@class,'gw-error') or contains(@class,'gw-warning')]";
const NEW_CLAIM_SCREEN: &str =
    "//div[contains(@class,'FNOLWizard') or contains(text(),'First Notice of Loss')]";

const CLAIMANT_NAME: &str = "//select[contains(@name,'Name') or contains(@id,'Name')]";
const PREFERRED_CONTACT: &str = "FNOLWizard-FullWizardStepSet-FNOLWizard_BasicInfoScreen-PanelRow-BasicInfoDetailViewPanelDV-PersonContactInfoInputSet-preferred_method_of_contact";

/// Fields that some basic-info screens do not render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalField {
    RelationToInsured,
    AgreeToEmail,
    Requested,
}

impl OptionalField {
    pub fn label(&self) -> &'static str {
        match self {
            OptionalField::RelationToInsured => "Relation to Insured",
            OptionalField::AgreeToEmail => "Agree to Email Communication",
            OptionalField::Requested => "Requested",
        }
    }

    /// Substring matched case-insensitively against select names and ids.
    fn key(&self) -> &'static str {
        match self {
            OptionalField::RelationToInsured => "relation",
            OptionalField::AgreeToEmail => "emailcommunication",
            OptionalField::Requested => "requested",
        }
    }
}

/// How long Next may stay `aria-disabled` before it is clicked anyway.
const NEXT_ENABLE_TIMEOUT: Duration = Duration::from_secs(10);
const NEXT_ENABLE_POLL: Duration = Duration::from_secs(1);

fn by_name_in_search_panel(field: &str) -> Locator {
    Locator::name(format!("{}-{}", FIND_POLICY, field))
}

// ============================================================================
// FnolPage: the FNOL wizard
// ============================================================================

/// The claim tab and the First Notice of Loss wizard screens.
pub struct FnolPage<'a> {
    page: Page<'a>,
    next_timeout: Duration,
    next_poll: Duration,
}

impl<'a> FnolPage<'a> {
    pub fn new(page: Page<'a>) -> Self {
        FnolPage {
            page,
            next_timeout: NEXT_ENABLE_TIMEOUT,
            next_poll: NEXT_ENABLE_POLL,
        }
    }

    /// Bound the wait for Next to lose `aria-disabled`.
    pub fn with_next_timeout(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.next_timeout = timeout;
        self.next_poll = poll_interval;
        self
    }

    pub fn page(&self) -> &Page<'a> {
        &self.page
    }

    // ---- Navigation ----

    pub fn expand_claim_tab(&self) -> Result<(), PageError> {
        info!("expanding claim tab");
        self.page.click(&Locator::xpath(CLAIM_TAB_EXPAND))
    }

    pub fn click_new_claim(&self) -> Result<(), PageError> {
        info!("opening new claim wizard");
        self.page.click(&Locator::xpath(NEW_CLAIM_ITEM))
    }

    pub fn open_new_claim(&self) -> Result<(), PageError> {
        self.expand_claim_tab()?;
        self.click_new_claim()
    }

    // ---- Search screen ----

    pub fn select_policy_type(&self, policy_type: &str) -> Result<(), PageError> {
        info!(policy_type, "selecting policy type");
        self.select_dropdown(POLICY_TYPE_WIDGET, policy_type)
    }

    pub fn select_loss_type(&self, loss_type: &str) -> Result<(), PageError> {
        info!(loss_type, "selecting loss type");
        self.select_dropdown(LOSS_TYPE_WIDGET, loss_type)
    }

    /// Use the native `<select>` inside the widget when it is rendered,
    /// otherwise drive the custom dropdown.
    fn select_dropdown(&self, widget_id: &str, label: &str) -> Result<(), PageError> {
        let native = Locator::xpath(format!("//*[@id='{}']//select", widget_id));
        if self.page.is_displayed(&native) {
            self.page.select_by_visible_text(&native, label)
        } else {
            debug!(widget_id, "no native select rendered, using dropdown widget");
            self.page
                .select_from_custom_dropdown(&Locator::id(widget_id), label)
        }
    }

    fn click_and_type(&self, locator: &Locator, value: &str) -> Result<(), PageError> {
        self.page.click(locator)?;
        self.page.type_text(locator, value)
    }

    pub fn enter_policy_number(&self, policy_number: &str) -> Result<(), PageError> {
        info!(policy_number, "entering policy number");
        self.click_and_type(&by_name_in_search_panel("policyNumber"), policy_number)
    }

    pub fn enter_first_name(&self, first_name: &str) -> Result<(), PageError> {
        self.click_and_type(&Locator::xpath(FIRST_NAME), first_name)
    }

    pub fn enter_last_name(&self, last_name: &str) -> Result<(), PageError> {
        self.click_and_type(&Locator::xpath(LAST_NAME), last_name)
    }

    /// Loss date, `MM/DD/YYYY`.
    pub fn enter_loss_date(&self, date: &str) -> Result<(), PageError> {
        info!(date, "entering loss date");
        self.click_and_type(&by_name_in_search_panel("date"), date)
    }

    pub fn enter_loss_time(&self, time: &str) -> Result<(), PageError> {
        self.click_and_type(&by_name_in_search_panel("LossTime_time"), time)
    }

    pub fn toggle_am_pm(&self) -> Result<(), PageError> {
        self.page
            .click(&by_name_in_search_panel("LossTime_ampm-button"))
    }

    /// Set the time field to `"<time> <am_pm>"` in one assignment; typing
    /// into it triggers validation before the suffix is complete.
    pub fn enter_loss_time_with_am_pm(&self, time: &str, am_pm: &str) -> Result<(), PageError> {
        let complete = format!("{} {}", time, am_pm);
        info!(time = %complete, "entering loss time");
        self.page
            .set_value_by_script(&Locator::xpath(LOSS_TIME_TEXT), &complete)
    }

    pub fn fill_policy_search(&self, search: &PolicySearch) -> Result<(), PageError> {
        match search {
            PolicySearch::ByInsured {
                policy_type,
                loss_type,
                policy_number,
                first_name,
                last_name,
                date,
                time,
            } => {
                self.select_policy_type(policy_type)?;
                self.select_loss_type(loss_type)?;
                self.enter_policy_number(policy_number)?;
                self.enter_first_name(first_name)?;
                self.enter_last_name(last_name)?;
                self.enter_loss_date(date)?;
                self.enter_loss_time(time)?;
                self.toggle_am_pm()
            }
            PolicySearch::ByLossDetails {
                policy_number,
                loss_date,
                loss_time,
                am_pm,
            } => {
                self.enter_policy_number(policy_number)?;
                self.enter_loss_date(loss_date)?;
                self.enter_loss_time_with_am_pm(loss_time, am_pm)
            }
        }
    }

    pub fn click_search(&self) -> Result<(), PageError> {
        info!("searching for policy");
        self.page.click(&Locator::xpath(SEARCH_BUTTON))?;
        self.settle();
        Ok(())
    }

    /// Click Next once the overlay is gone and the button is enabled. A
    /// button that stays disabled is clicked anyway after a warning.
    pub fn click_next(&self) -> Result<(), PageError> {
        info!("advancing wizard");
        self.settle();

        let next = Locator::xpath(NEXT_BUTTON);
        let enabled = self
            .page
            .wait_for(self.next_timeout)
            .poll_interval(self.next_poll)
            .for_predicate("Next button to be enabled", |b| {
                let Some(button) = b.find_elements(&next)?.into_iter().next() else {
                    return Ok(false);
                };
                Ok(b.attribute(&button, "aria-disabled")?.as_deref() != Some("true"))
            });
        if let Err(e) = enabled {
            warn!(error = %e, "Next button still disabled, clicking anyway");
        }

        self.page.click(&next)?;
        self.settle();
        Ok(())
    }

    /// Wait for the click-blocking overlay to go away. Best effort.
    fn settle(&self) {
        let overlay = Locator::id(CLICK_OVERLAY_ID);
        if let Err(e) = self.page.wait().invisible(&overlay) {
            warn!(error = %e, "click overlay still present");
        }
    }

    // ---- Claimant / basic info screen ----

    pub fn select_claimant_name(&self, claimant_name: &str) -> Result<(), PageError> {
        info!(claimant_name, "selecting claimant");
        self.page
            .select_by_visible_text(&Locator::xpath(CLAIMANT_NAME), claimant_name)?;
        self.settle();
        Ok(())
    }

    /// Select `value` in an optional field, or skip it with a warning when
    /// the screen does not render it.
    pub fn select_optional(&self, field: OptionalField, value: &str) -> Result<(), PageError> {
        let selects = self.page.find_elements(&Locator::tag("select"))?;
        debug!(count = selects.len(), "select elements on screen");

        let browser = self.page.browser();
        let mut found = None;
        for select in &selects {
            let name = browser.attribute(select, "name").ok().flatten().unwrap_or_default();
            let id = browser.attribute(select, "id").ok().flatten().unwrap_or_default();
            debug!(%name, %id, "select element");
            if found.is_none()
                && (name.to_lowercase().contains(field.key()) || id.to_lowercase().contains(field.key()))
            {
                found = Some(if id.is_empty() { Locator::name(name) } else { Locator::id(id) });
            }
        }

        let Some(locator) = found else {
            self.page.skip_optional(field.label(), "not on this screen");
            return Ok(());
        };

        if let Err(e) = self.page.select_by_visible_text(&locator, value) {
            self.page.skip_optional(field.label(), &e.to_string());
        }
        Ok(())
    }

    pub fn select_preferred_contact(&self, method: &str) -> Result<(), PageError> {
        let method = method.trim();
        if method.is_empty() || method.eq_ignore_ascii_case("none") {
            info!("no preferred contact method requested");
            return Ok(());
        }
        info!(method, "selecting preferred contact method");
        self.page
            .select_by_visible_text(&Locator::name(PREFERRED_CONTACT), method)
    }

    pub fn fill_basic_info(&self, info: &BasicInfo) -> Result<(), PageError> {
        if let Some(relation) = &info.relation_to_insured {
            self.select_optional(OptionalField::RelationToInsured, relation)?;
        }
        self.select_optional(OptionalField::AgreeToEmail, "No")?;
        if let Some(method) = &info.preferred_contact {
            self.select_preferred_contact(method)?;
        }
        self.select_optional(OptionalField::Requested, "No")
    }

    pub fn fill_claimant_details(&self, details: &ClaimantDetails) -> Result<(), PageError> {
        self.select_claimant_name(&details.claimant_name)?;
        if let Some(basic) = &details.basic_info {
            self.fill_basic_info(basic)?;
        }
        Ok(())
    }

    // ---- Composite ----

    /// Drive the wizard as described by `workflow`.
    pub fn run_workflow(&self, workflow: &FnolWorkflow) -> Result<(), PageError> {
        info!(policy = workflow.search.policy_number(), "starting FNOL workflow");
        self.open_new_claim()?;
        self.fill_policy_search(&workflow.search)?;
        self.click_search()?;

        if let Some(claimant) = &workflow.claimant {
            self.click_next()?;
            self.fill_claimant_details(claimant)?;
            if workflow.advance_after_claimant {
                self.click_next()?;
            }
        }

        info!("FNOL workflow complete");
        Ok(())
    }

    // ---- Inspection ----

    pub fn is_new_claim_screen_displayed(&self) -> bool {
        self.page.is_displayed(&Locator::xpath(NEW_CLAIM_SCREEN))
    }

    pub fn is_search_results_displayed(&self) -> bool {
        self.page.is_displayed(&Locator::xpath(SEARCH_RESULTS))
    }

    /// Give the policy search results up to `timeout` to render.
    pub fn wait_for_search_results(&self, timeout: Duration) -> bool {
        self.page
            .wait_for(timeout)
            .visible(&Locator::xpath(SEARCH_RESULTS))
            .is_ok()
    }

    pub fn search_results_text(&self) -> Result<String, PageError> {
        self.page.text(&Locator::xpath(SEARCH_RESULTS))
    }

    pub fn is_error_displayed(&self) -> bool {
        self.page.is_displayed(&Locator::xpath(ERROR_MESSAGE))
    }

    pub fn error_message(&self) -> Result<String, PageError> {
        self.page.text(&Locator::xpath(ERROR_MESSAGE))
    }
}
