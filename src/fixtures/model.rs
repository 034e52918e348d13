use serde::{Deserialize, Serialize};

use crate::pages::workflow::{BasicInfo, ClaimantDetails, PolicySearch};

// ============================================================================
// ui/loginData.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCase {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub expected_page_title: Option<String>,
    #[serde(default)]
    pub expected_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub valid_user: LoginCase,
    pub invalid_user: LoginCase,
    pub empty_user: LoginCase,
}

// ============================================================================
// ui/claimCreationData.json
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuredSearchCase {
    pub policy_type: String,
    #[serde(rename = "type")]
    pub loss_type: String,
    pub policy_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub expected_result: Option<String>,
}

impl InsuredSearchCase {
    pub fn to_search(&self) -> PolicySearch {
        PolicySearch::ByInsured {
            policy_type: self.policy_type.clone(),
            loss_type: self.loss_type.clone(),
            policy_number: self.policy_number.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCreationData {
    pub valid_policy_search: InsuredSearchCase,
}

// ============================================================================
// ui/claimClaimantDetailsData.json, ui/claimCreationPolicySearchData.json
// ============================================================================

fn default_am_pm() -> String {
    "AM".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimantCase {
    pub policy_number: String,
    pub loss_date: String,
    pub loss_time: String,
    #[serde(default = "default_am_pm")]
    pub time_am_pm: String,
    pub claimant_name: String,
    #[serde(default)]
    pub relation_to_insured: Option<String>,
    #[serde(default)]
    pub preferred_method_of_contact: Option<String>,
}

impl ClaimantCase {
    pub fn to_search(&self) -> PolicySearch {
        PolicySearch::ByLossDetails {
            policy_number: self.policy_number.clone(),
            loss_date: self.loss_date.clone(),
            loss_time: self.loss_time.clone(),
            am_pm: self.time_am_pm.clone(),
        }
    }

    /// Claimant name only.
    pub fn to_claimant(&self) -> ClaimantDetails {
        ClaimantDetails {
            claimant_name: self.claimant_name.clone(),
            basic_info: None,
        }
    }

    /// Claimant name plus the basic-info fields.
    pub fn to_claimant_with_basic_info(&self) -> ClaimantDetails {
        ClaimantDetails {
            claimant_name: self.claimant_name.clone(),
            basic_info: Some(BasicInfo {
                relation_to_insured: self.relation_to_insured.clone(),
                preferred_contact: self.preferred_method_of_contact.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimantDetailsData {
    pub valid_claim_with_claimant_details: ClaimantCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySearchData {
    pub valid_claim_with_policy_search: ClaimantCase,
}
