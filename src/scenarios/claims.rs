use std::time::Duration;

use tracing::info;

use crate::error::HarnessError;
use crate::fixtures::model::{ClaimCreationData, ClaimantDetailsData, PolicySearchData};
use crate::pages::{FnolPage, FnolWorkflow};
use crate::runner::assert::ensure;
use crate::runner::context::ScenarioContext;
use crate::runner::scenario::Scenario;

pub const SUITE: &str = "ui.claims";

const CLAIM_CREATION_DATA: &str = "claimCreationData.json";
const CLAIMANT_DETAILS_DATA: &str = "claimClaimantDetailsData.json";
const CREATION_CLAIMANT_DATA: &str = "claimCreationClaimantDetailsData.json";
const POLICY_SEARCH_DATA: &str = "claimCreationPolicySearchData.json";

const RESULTS_TIMEOUT: Duration = Duration::from_secs(10);

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::ui(
            SUITE,
            "test_create_claim_with_valid_policy_search",
            "Policy search by insured shows policy search results",
            policy_search_by_insured,
        ),
        Scenario::ui(
            SUITE,
            "test_claim_creation_with_claimant_details",
            "Search by loss details, then fill claimant and basic info",
            claimant_details,
        ),
        Scenario::ui(
            SUITE,
            "test_claim_creation_workflow_step_by_step",
            "Every wizard action driven and recorded individually",
            step_by_step,
        ),
        Scenario::ui(
            SUITE,
            "test_claim_creation_with_claimant_name",
            "Search by loss details, then select the claimant name only",
            claimant_name_only,
        ),
    ]
}

fn ensure_no_wizard_error(fnol: &FnolPage<'_>) -> Result<(), HarnessError> {
    if fnol.is_error_displayed() {
        let message = fnol.error_message().unwrap_or_default();
        return ensure(false, format!("wizard shows an error: {}", message));
    }
    Ok(())
}

fn policy_search_by_insured(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let data: ClaimCreationData = ctx.fixtures().ui().read_as(CLAIM_CREATION_DATA)?;
    let case = data.valid_policy_search;
    info!(
        policy = %case.policy_number,
        first_name = %case.first_name,
        last_name = %case.last_name,
        "test data loaded"
    );
    ctx.parameter("Policy Number", &case.policy_number);

    let fnol = FnolPage::new(ctx.page()?);
    ctx.step("Open the new claim wizard");
    fnol.open_new_claim()?;

    ctx.step("Fill policy and insured information");
    fnol.fill_policy_search(&case.to_search())?;

    ctx.step("Search for the policy");
    fnol.click_search()?;

    ctx.step("Verify search results are displayed");
    ensure(
        fnol.wait_for_search_results(RESULTS_TIMEOUT),
        "policy search results should be displayed",
    )?;
    let text = fnol.search_results_text()?;
    info!(results = %text, "search results displayed");
    ensure(
        text.contains("Policy") || text.contains("search"),
        "search results should contain policy information",
    )
}

fn claimant_details(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let data: ClaimantDetailsData = ctx.fixtures().ui().read_as(CLAIMANT_DETAILS_DATA)?;
    let case = data.valid_claim_with_claimant_details;
    ctx.parameter("Policy Number", &case.policy_number);
    ctx.parameter("Claimant", &case.claimant_name);

    let workflow = FnolWorkflow::search_only(case.to_search())
        .with_claimant(case.to_claimant_with_basic_info())
        .advancing();

    let fnol = FnolPage::new(ctx.page()?);
    ctx.step("Run FNOL wizard through claimant and basic info");
    fnol.run_workflow(&workflow)?;

    ctx.step("Verify the wizard reports no error");
    ensure_no_wizard_error(&fnol)
}

fn step_by_step(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let data: PolicySearchData = ctx.fixtures().ui().read_as(POLICY_SEARCH_DATA)?;
    let case = data.valid_claim_with_policy_search;
    ctx.parameter("Policy Number", &case.policy_number);

    let fnol = FnolPage::new(ctx.page()?);

    ctx.step("Open the new claim wizard");
    fnol.open_new_claim()?;
    ctx.step(&format!(
        "Search policy {} lost {} {} {}",
        case.policy_number, case.loss_date, case.loss_time, case.time_am_pm
    ));
    fnol.fill_policy_search(&case.to_search())?;
    ctx.step("Click search");
    fnol.click_search()?;
    ctx.step("Click next");
    fnol.click_next()?;
    ctx.step(&format!("Fill claimant {} and basic info", case.claimant_name));
    fnol.fill_claimant_details(&case.to_claimant_with_basic_info())?;
    ctx.step("Click next");
    fnol.click_next()?;

    ctx.step("Verify the wizard reports no error");
    ensure_no_wizard_error(&fnol)
}

fn claimant_name_only(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let data: ClaimantDetailsData = ctx.fixtures().ui().read_as(CREATION_CLAIMANT_DATA)?;
    let case = data.valid_claim_with_claimant_details;
    ctx.parameter("Policy Number", &case.policy_number);
    ctx.parameter("Claimant", &case.claimant_name);

    let workflow = FnolWorkflow::search_only(case.to_search()).with_claimant(case.to_claimant());

    let fnol = FnolPage::new(ctx.page()?);
    ctx.step("Run FNOL wizard through claimant name selection");
    fnol.run_workflow(&workflow)?;

    ctx.step("Verify the wizard reports no error");
    ensure_no_wizard_error(&fnol)
}
