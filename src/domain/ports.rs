use async_trait::async_trait;
use thiserror::Error;

use super::account::GatewayAccount;
use super::plugin::{PaymentsPlugin, PluginInventory};

/// Failure surfaced by the remote store collaborator.
///
/// The engine only cares about one distinction: connectivity problems get
/// their own readiness state so the UI can suggest checking the connection,
/// everything else collapses into a generic failure.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("connection failed: {0}")]
    Connectivity(String),
    #[error("gateway API error: {0}")]
    Api(String),
}

impl GatewayError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, GatewayError::Connectivity(_))
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Remote store gateway: synchronization, read-through loads and plugin
/// management for a single site. Loads reflect whatever the last successful
/// sync wrote to the local store.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    async fn synchronize_site_settings(&self, site_id: i64) -> GatewayResult<()>;
    async fn synchronize_system_plugins(&self, site_id: i64) -> GatewayResult<()>;

    /// Two-letter country code of the store, if the site settings carry one.
    async fn load_site_country(&self, site_id: i64) -> GatewayResult<Option<String>>;
    async fn load_plugin_inventory(&self, site_id: i64) -> GatewayResult<PluginInventory>;
    async fn load_payment_gateway_accounts(&self, site_id: i64) -> GatewayResult<Vec<GatewayAccount>>;
    async fn is_cash_on_delivery_enabled(&self, site_id: i64) -> GatewayResult<bool>;

    /// Marks `account` as the one used for card-present collection.
    /// Fire and forget; failures are the collaborator's problem.
    async fn bind_active_account(&self, site_id: i64, account: GatewayAccount);

    async fn install_plugin(&self, site_id: i64, plugin: PaymentsPlugin) -> GatewayResult<()>;
    async fn activate_plugin(&self, site_id: i64, plugin: PaymentsPlugin) -> GatewayResult<()>;
}

/// Durable per-site settings kept outside the process.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn preferred_gateway(&self, site_id: i64) -> Option<String>;
    async fn set_preferred_gateway(&self, site_id: i64, gateway_id: &str);
    async fn forget_preferred_gateway(&self, site_id: i64);

    /// Whether the merchant dismissed the cash-on-delivery onboarding step.
    async fn cod_step_skipped(&self, site_id: i64) -> bool;
}
