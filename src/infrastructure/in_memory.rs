use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::GatewayAccount;
use crate::domain::plugin::{PaymentsPlugin, PluginInventory, SystemPluginSnapshot};
use crate::domain::ports::{GatewayError, GatewayResult, SettingsStore, StoreGateway};

/// In-memory stand-in for the remote store gateway.
///
/// Holds the site state behind `Arc<RwLock<_>>` so clones share it, and lets
/// callers script sync failures and inspect the bind calls the engine makes.
/// Backs the CLI harness and the integration tests.
#[derive(Default, Clone)]
pub struct InMemoryStoreGateway {
    state: Arc<RwLock<SiteState>>,
}

#[derive(Default)]
struct SiteState {
    country: Option<String>,
    inventory: PluginInventory,
    accounts: Vec<GatewayAccount>,
    cod_gateway_enabled: bool,
    settings_sync_failure: Option<GatewayError>,
    plugins_sync_failure: Option<GatewayError>,
    install_failure: Option<GatewayError>,
    activate_failure: Option<GatewayError>,
    bound_accounts: Vec<GatewayAccount>,
}

impl InMemoryStoreGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_country(&self, country: Option<&str>) {
        self.state.write().await.country = country.map(str::to_string);
    }

    pub async fn set_inventory(&self, inventory: PluginInventory) {
        self.state.write().await.inventory = inventory;
    }

    pub async fn set_accounts(&self, accounts: Vec<GatewayAccount>) {
        self.state.write().await.accounts = accounts;
    }

    pub async fn set_cod_gateway_enabled(&self, enabled: bool) {
        self.state.write().await.cod_gateway_enabled = enabled;
    }

    /// Makes the next (and every following) site-settings sync fail.
    pub async fn fail_settings_sync(&self, error: Option<GatewayError>) {
        self.state.write().await.settings_sync_failure = error;
    }

    pub async fn fail_plugins_sync(&self, error: Option<GatewayError>) {
        self.state.write().await.plugins_sync_failure = error;
    }

    pub async fn fail_install(&self, error: Option<GatewayError>) {
        self.state.write().await.install_failure = error;
    }

    pub async fn fail_activate(&self, error: Option<GatewayError>) {
        self.state.write().await.activate_failure = error;
    }

    /// Accounts the engine asked to bind, in call order.
    pub async fn bound_accounts(&self) -> Vec<GatewayAccount> {
        self.state.read().await.bound_accounts.clone()
    }
}

#[async_trait]
impl StoreGateway for InMemoryStoreGateway {
    async fn synchronize_site_settings(&self, _site_id: i64) -> GatewayResult<()> {
        match &self.state.read().await.settings_sync_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn synchronize_system_plugins(&self, _site_id: i64) -> GatewayResult<()> {
        match &self.state.read().await.plugins_sync_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn load_site_country(&self, _site_id: i64) -> GatewayResult<Option<String>> {
        Ok(self.state.read().await.country.clone())
    }

    async fn load_plugin_inventory(&self, _site_id: i64) -> GatewayResult<PluginInventory> {
        Ok(self.state.read().await.inventory.clone())
    }

    async fn load_payment_gateway_accounts(&self, _site_id: i64) -> GatewayResult<Vec<GatewayAccount>> {
        Ok(self.state.read().await.accounts.clone())
    }

    async fn is_cash_on_delivery_enabled(&self, _site_id: i64) -> GatewayResult<bool> {
        Ok(self.state.read().await.cod_gateway_enabled)
    }

    async fn bind_active_account(&self, _site_id: i64, account: GatewayAccount) {
        self.state.write().await.bound_accounts.push(account);
    }

    async fn install_plugin(&self, _site_id: i64, plugin: PaymentsPlugin) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        if let Some(error) = &state.install_failure {
            return Err(error.clone());
        }
        let snapshot = SystemPluginSnapshot {
            version: plugin.minimum_supported_version().to_string(),
            active: false,
        };
        match plugin {
            PaymentsPlugin::WooPayments => state.inventory.woo_payments = Some(snapshot),
            PaymentsPlugin::StripeGateway => state.inventory.stripe_gateway = Some(snapshot),
        }
        Ok(())
    }

    async fn activate_plugin(&self, _site_id: i64, plugin: PaymentsPlugin) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        if let Some(error) = &state.activate_failure {
            return Err(error.clone());
        }
        let slot = match plugin {
            PaymentsPlugin::WooPayments => state.inventory.woo_payments.as_mut(),
            PaymentsPlugin::StripeGateway => state.inventory.stripe_gateway.as_mut(),
        };
        match slot {
            Some(installed) => {
                installed.active = true;
                Ok(())
            }
            None => Err(GatewayError::Api(format!("{} is not installed", plugin.gateway_id()))),
        }
    }
}

/// In-memory durable settings: preferred gateway and the COD-step skip flag.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    state: Arc<RwLock<SettingsState>>,
}

#[derive(Default)]
struct SettingsState {
    preferred_gateway: Option<String>,
    cod_step_skipped: bool,
    preference_writes: usize,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_cod_step_skipped(&self, skipped: bool) {
        self.state.write().await.cod_step_skipped = skipped;
    }

    /// How many times a preference has been persisted. The selection
    /// coordinator must write at most once per confirmed choice.
    pub async fn preference_writes(&self) -> usize {
        self.state.read().await.preference_writes
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn preferred_gateway(&self, _site_id: i64) -> Option<String> {
        self.state.read().await.preferred_gateway.clone()
    }

    async fn set_preferred_gateway(&self, _site_id: i64, gateway_id: &str) {
        let mut state = self.state.write().await;
        state.preferred_gateway = Some(gateway_id.to_string());
        state.preference_writes += 1;
    }

    async fn forget_preferred_gateway(&self, _site_id: i64) {
        self.state.write().await.preferred_gateway = None;
    }

    async fn cod_step_skipped(&self, _site_id: i64) -> bool {
        self.state.read().await.cod_step_skipped
    }
}
