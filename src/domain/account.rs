use serde::{Deserialize, Serialize};

use super::plugin::PaymentsPlugin;

/// Verification status reported by the payment gateway for a merchant
/// account. Mirrors the closed set of wire values; anything the API adds
/// later decodes as `Unknown` and fails the completion allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    NoAccount,
    Complete,
    Enabled,
    Restricted,
    RestrictedSoon,
    PendingVerification,
    RejectedFraud,
    RejectedListed,
    RejectedTermsOfService,
    RejectedOther,
    #[serde(other)]
    Unknown,
}

impl AccountStatus {
    pub fn is_rejected(self) -> bool {
        matches!(
            self,
            AccountStatus::RejectedFraud
                | AccountStatus::RejectedListed
                | AccountStatus::RejectedTermsOfService
                | AccountStatus::RejectedOther
        )
    }

    /// Statuses that are allowed to collect payments once every other
    /// onboarding step has been satisfied.
    pub fn allows_collection(self) -> bool {
        matches!(
            self,
            AccountStatus::Complete
                | AccountStatus::Enabled
                | AccountStatus::RestrictedSoon
                | AccountStatus::PendingVerification
        )
    }
}

/// A payment-gateway account record bound to one of the payment plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayAccount {
    pub gateway_id: String,
    pub status: AccountStatus,
    pub has_pending_requirements: bool,
    pub has_overdue_requirements: bool,
    /// Unix timestamp (seconds) by which pending requirements are due.
    pub current_deadline: Option<i64>,
    /// Whether the account can accept live (non-test) payments.
    pub is_live: bool,
    /// Whether the plugin currently routes payments through test mode.
    pub is_in_test_mode: bool,
    #[serde(default = "default_card_present_eligible")]
    pub is_card_present_eligible: bool,
}

fn default_card_present_eligible() -> bool {
    true
}

impl GatewayAccount {
    pub fn plugin(&self) -> Option<PaymentsPlugin> {
        PaymentsPlugin::from_gateway_id(&self.gateway_id)
    }

    pub fn is_in_test_mode_with_live_account(&self) -> bool {
        self.is_live && self.is_in_test_mode
    }

    pub fn is_under_review(&self) -> bool {
        self.status == AccountStatus::Restricted
            && !self.has_pending_requirements
            && !self.has_overdue_requirements
    }

    pub fn has_pending_requirement_step(&self) -> bool {
        (self.status == AccountStatus::Restricted && self.has_pending_requirements)
            || self.status == AccountStatus::RestrictedSoon
    }

    pub fn has_overdue_requirement_step(&self) -> bool {
        self.status == AccountStatus::Restricted && self.has_overdue_requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted() -> GatewayAccount {
        GatewayAccount {
            gateway_id: "woocommerce-payments".to_string(),
            status: AccountStatus::Restricted,
            has_pending_requirements: false,
            has_overdue_requirements: false,
            current_deadline: None,
            is_live: false,
            is_in_test_mode: false,
            is_card_present_eligible: true,
        }
    }

    #[test]
    fn test_restricted_without_requirements_is_under_review() {
        assert!(restricted().is_under_review());
    }

    #[test]
    fn test_restricted_with_requirements_is_not_under_review() {
        let mut account = restricted();
        account.has_pending_requirements = true;
        assert!(!account.is_under_review());
        assert!(account.has_pending_requirement_step());
    }

    #[test]
    fn test_restricted_soon_counts_as_pending_step() {
        let mut account = restricted();
        account.status = AccountStatus::RestrictedSoon;
        assert!(account.has_pending_requirement_step());
        assert!(!account.has_overdue_requirement_step());
    }

    #[test]
    fn test_unknown_status_decodes_and_blocks_collection() {
        let account: GatewayAccount = serde_json::from_str(
            r#"{
                "gateway_id": "woocommerce-payments",
                "status": "some_future_status",
                "has_pending_requirements": false,
                "has_overdue_requirements": false,
                "current_deadline": null,
                "is_live": true,
                "is_in_test_mode": false
            }"#,
        )
        .unwrap();
        assert_eq!(account.status, AccountStatus::Unknown);
        assert!(!account.status.allows_collection());
        assert!(account.is_card_present_eligible);
    }
}
