use serde::{Deserialize, Serialize};

/// How the policy is located on the first FNOL wizard screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum PolicySearch {
    /// Policy type and loss type dropdowns, policy number, insured name and
    /// date/time of loss, with the AM/PM toggle clicked after the time.
    ByInsured {
        policy_type: String,
        loss_type: String,
        policy_number: String,
        first_name: String,
        last_name: String,
        date: String,
        time: String,
    },

    /// Policy number plus loss date and a loss time that already carries
    /// its AM/PM suffix.
    ByLossDetails {
        policy_number: String,
        loss_date: String,
        loss_time: String,
        am_pm: String,
    },
}

impl PolicySearch {
    pub fn policy_number(&self) -> &str {
        match self {
            PolicySearch::ByInsured { policy_number, .. }
            | PolicySearch::ByLossDetails { policy_number, .. } => policy_number,
        }
    }
}

/// Extra fields on the basic-info screen. Relation, email consent and the
/// "requested" question may be missing from the screen and are skipped then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub relation_to_insured: Option<String>,
    /// `none` or empty leaves the field untouched.
    pub preferred_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimantDetails {
    pub claimant_name: String,
    #[serde(default)]
    pub basic_info: Option<BasicInfo>,
}

/// One pass through the FNOL wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnolWorkflow {
    pub search: PolicySearch,
    /// When set, advance past the search screen and fill claimant details.
    #[serde(default)]
    pub claimant: Option<ClaimantDetails>,
    /// Press Next once more after the claimant details.
    #[serde(default)]
    pub advance_after_claimant: bool,
}

impl FnolWorkflow {
    pub fn search_only(search: PolicySearch) -> Self {
        FnolWorkflow {
            search,
            claimant: None,
            advance_after_claimant: false,
        }
    }

    pub fn with_claimant(mut self, claimant: ClaimantDetails) -> Self {
        self.claimant = Some(claimant);
        self
    }

    pub fn advancing(mut self) -> Self {
        self.advance_after_claimant = true;
        self
    }
}
