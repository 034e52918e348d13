use std::time::Duration;

use tracing::{info, warn};

use crate::error::HarnessError;
use crate::pages::inspector;
use crate::runner::context::ScenarioContext;
use crate::runner::scenario::Scenario;

pub const SUITE: &str = "ui.inspect";

/// How long the landing page gets to finish loading before it is inspected.
const READY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn scenarios() -> Vec<Scenario> {
    vec![Scenario::ui(
        SUITE,
        "identify_page_elements",
        "Dump locator candidates of the landing page as an attachment",
        identify_page_elements,
    )]
}

fn identify_page_elements(ctx: &ScenarioContext) -> Result<(), HarnessError> {
    let page = ctx.page()?;

    ctx.step("Wait for the page to finish loading");
    let ready = page
        .wait_for(READY_TIMEOUT)
        .for_predicate("document.readyState is complete", |b| {
            let state = b.execute_script("return document.readyState;", Vec::new())?;
            Ok(state.as_str() == Some("complete"))
        });
    if let Err(e) = ready {
        warn!(error = %e, "page did not report ready, inspecting anyway");
    }

    ctx.step("Collect element inventory");
    let inventory = inspector::inventory(&page)?;
    info!(url = %inventory.url, title = %inventory.title, "element inventory collected");
    for group in &inventory.groups {
        info!(group = %group.label, found = group.total, "element group");
    }

    ctx.attach_text("Element Inventory", &inventory.to_string());
    if let Ok(json) = serde_json::to_value(&inventory) {
        ctx.attach_json("Element Inventory (JSON)", &json);
    }
    Ok(())
}
