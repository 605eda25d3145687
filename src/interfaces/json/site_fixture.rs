use std::io::Read;

use serde::Deserialize;

use crate::domain::account::GatewayAccount;
use crate::domain::plugin::PluginInventory;
use crate::error::Result;
use crate::infrastructure::in_memory::{InMemorySettingsStore, InMemoryStoreGateway};

/// A site described as a JSON document, used by the CLI to run a resolution
/// against a fixed set of inputs.
///
/// ```json
/// {
///   "site_id": 42,
///   "country": "US",
///   "plugins": { "woo_payments": { "version": "3.3.0", "active": true } },
///   "accounts": [ { "gateway_id": "woocommerce-payments", "status": "complete", ... } ],
///   "cod_gateway_enabled": true
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct SiteFixture {
    #[serde(default = "default_site_id")]
    pub site_id: i64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub plugins: PluginInventory,
    #[serde(default)]
    pub accounts: Vec<GatewayAccount>,
    #[serde(default)]
    pub cod_gateway_enabled: bool,
    #[serde(default)]
    pub cod_step_skipped: bool,
    #[serde(default)]
    pub preferred_gateway: Option<String>,
}

fn default_site_id() -> i64 {
    1
}

impl SiteFixture {
    /// Parses a fixture from any `Read` source (e.g. File, Stdin).
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    /// Materializes the fixture as in-memory collaborators for the engine.
    pub async fn into_collaborators(self) -> (InMemoryStoreGateway, InMemorySettingsStore) {
        let gateway = InMemoryStoreGateway::new();
        gateway.set_country(self.country.as_deref()).await;
        gateway.set_inventory(self.plugins).await;
        gateway.set_accounts(self.accounts).await;
        gateway.set_cod_gateway_enabled(self.cod_gateway_enabled).await;

        let settings = InMemorySettingsStore::new();
        settings.set_cod_step_skipped(self.cod_step_skipped).await;
        if let Some(gateway_id) = &self.preferred_gateway {
            use crate::domain::ports::SettingsStore;
            settings.set_preferred_gateway(self.site_id, gateway_id).await;
        }

        (gateway, settings)
    }
}
