#![allow(dead_code)]

use std::sync::Arc;

use tapready::application::cache::ReadinessCache;
use tapready::application::engine::ReadinessEngine;
use tapready::domain::account::{AccountStatus, GatewayAccount};
use tapready::domain::plugin::{PaymentsPlugin, PluginInventory, SystemPluginSnapshot};
use tapready::domain::ports::{SettingsStore, StoreGateway};
use tapready::infrastructure::in_memory::{InMemorySettingsStore, InMemoryStoreGateway};

pub const SITE_ID: i64 = 1234;

/// Engine wired to scriptable in-memory collaborators.
pub struct Harness {
    pub gateway: InMemoryStoreGateway,
    pub settings: InMemorySettingsStore,
    pub engine: ReadinessEngine,
}

impl Harness {
    /// An empty site: no country, no plugins, no accounts.
    pub fn empty() -> Self {
        Self::with_cache(Arc::new(ReadinessCache::new()))
    }

    pub fn with_cache(cache: Arc<ReadinessCache>) -> Self {
        let gateway = InMemoryStoreGateway::new();
        let settings = InMemorySettingsStore::new();
        let engine = ReadinessEngine::with_cache(
            SITE_ID,
            Arc::new(gateway.clone()) as Arc<dyn StoreGateway>,
            Arc::new(settings.clone()) as Arc<dyn SettingsStore>,
            cache,
        );
        Self { gateway, settings, engine }
    }

    /// A site where WooPayments is fully onboarded and ready to collect.
    pub async fn ready() -> Self {
        let harness = Self::empty();
        harness.gateway.set_country(Some("US")).await;
        harness
            .gateway
            .set_inventory(PluginInventory {
                woo_payments: Some(installed_plugin(true)),
                stripe_gateway: None,
            })
            .await;
        harness
            .gateway
            .set_accounts(vec![account(PaymentsPlugin::WooPayments, AccountStatus::Complete)])
            .await;
        harness.gateway.set_cod_gateway_enabled(true).await;
        harness
    }

    /// Like [`ready`], but with both plugins installed and active and an
    /// eligible account for each.
    pub async fn both_plugins_ready() -> Self {
        let harness = Self::ready().await;
        harness
            .gateway
            .set_inventory(PluginInventory {
                woo_payments: Some(installed_plugin(true)),
                stripe_gateway: Some(installed_plugin(true)),
            })
            .await;
        harness
            .gateway
            .set_accounts(vec![
                account(PaymentsPlugin::WooPayments, AccountStatus::Complete),
                account(PaymentsPlugin::StripeGateway, AccountStatus::Complete),
            ])
            .await;
        harness
    }
}

pub fn installed_plugin(active: bool) -> SystemPluginSnapshot {
    SystemPluginSnapshot { version: "9.9.9".to_string(), active }
}

pub fn account(plugin: PaymentsPlugin, status: AccountStatus) -> GatewayAccount {
    GatewayAccount {
        gateway_id: plugin.gateway_id().to_string(),
        status,
        has_pending_requirements: false,
        has_overdue_requirements: false,
        current_deadline: None,
        is_live: true,
        is_in_test_mode: false,
        is_card_present_eligible: true,
    }
}
