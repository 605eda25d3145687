use std::sync::Arc;

use tokio::sync::watch;

use crate::application::cache::ReadinessCache;
use crate::application::resolver::{self, ReadinessSnapshot};
use crate::application::selection::PluginSelection;
use crate::application::skip_flags::SkipFlags;
use crate::domain::country::CountrySupport;
use crate::domain::plugin::PaymentsPlugin;
use crate::domain::ports::{GatewayError, SettingsStore, StoreGateway};
use crate::domain::readiness::ReadinessState;

/// The main entry point for in-person payments onboarding.
///
/// `ReadinessEngine` gathers the asynchronous inputs (site settings, plugin
/// inventory, gateway accounts, skip flags, plugin preference), runs the pure
/// resolver over them and publishes the resulting [`ReadinessState`] on a
/// watch channel. Every failure is published as a state, never returned as an
/// error; callers always receive a value.
///
/// Overlapping refreshes are not serialized: results are published in
/// completion order, last write wins.
pub struct ReadinessEngine {
    site_id: i64,
    gateway: Arc<dyn StoreGateway>,
    settings: Arc<dyn SettingsStore>,
    support: CountrySupport,
    cache: Arc<ReadinessCache>,
    selection: PluginSelection,
    skip_flags: SkipFlags,
    publisher: watch::Sender<ReadinessState>,
}

impl ReadinessEngine {
    pub fn new(site_id: i64, gateway: Arc<dyn StoreGateway>, settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_cache(site_id, gateway, settings, Arc::new(ReadinessCache::new()))
    }

    /// Builds an engine sharing an externally owned cache.
    pub fn with_cache(
        site_id: i64,
        gateway: Arc<dyn StoreGateway>,
        settings: Arc<dyn SettingsStore>,
        cache: Arc<ReadinessCache>,
    ) -> Self {
        let (publisher, _) = watch::channel(ReadinessState::Loading);
        Self {
            site_id,
            gateway,
            settings,
            support: CountrySupport::default(),
            cache,
            selection: PluginSelection::new(),
            skip_flags: SkipFlags::new(),
            publisher,
        }
    }

    pub fn with_country_support(mut self, support: CountrySupport) -> Self {
        self.support = support;
        self
    }

    /// Subscribes to readiness state publications.
    pub fn subscribe(&self) -> watch::Receiver<ReadinessState> {
        self.publisher.subscribe()
    }

    /// The most recently published state.
    pub fn current(&self) -> ReadinessState {
        self.publisher.borrow().clone()
    }

    /// Synchronizes the remote inputs and publishes a fresh state.
    pub async fn refresh(&self) {
        tracing::debug!(site_id = self.site_id, "refreshing in-person payments readiness");
        self.publish(ReadinessState::Loading);

        let (settings_sync, plugins_sync) = tokio::join!(
            self.gateway.synchronize_site_settings(self.site_id),
            self.gateway.synchronize_system_plugins(self.site_id),
        );
        if let Some(state) = classify_sync_failures([settings_sync.err(), plugins_sync.err()]) {
            self.publish(state);
            return;
        }

        let snapshot = match self.gather_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "failed to load readiness inputs");
                self.publish(classify_error(&error));
                return;
            }
        };

        let resolution = resolver::resolve(&snapshot);
        if let Some(account) = resolution.bind_account {
            self.gateway.bind_active_account(self.site_id, account).await;
        }
        if resolution.reset_pending_skip {
            self.skip_flags.reset_pending_requirements();
        }
        self.selection.observe(&resolution.state, &self.settings, self.site_id).await;
        self.publish(resolution.state);
    }

    /// Drops any cached state and resynchronizes from scratch.
    pub async fn force_refresh(&self) {
        self.cache.invalidate();
        self.refresh().await;
    }

    /// Re-publishes the cached state when payments were already working,
    /// otherwise performs a full refresh. The common launch path when the
    /// merchant finished onboarding long ago.
    pub async fn refresh_if_necessary(&self) {
        match self.cache.completed() {
            Some(cached) => {
                if *self.publisher.borrow() != cached {
                    self.publish(cached);
                }
            }
            None => self.refresh().await,
        }
    }

    /// Dismisses the pending-requirements step for the rest of the session.
    pub async fn skip_pending_requirements(&self) {
        self.skip_flags.skip_pending_requirements();
        self.refresh().await;
    }

    /// Records `plugin` as the merchant's choice and re-resolves. The choice
    /// is only persisted once a resolution confirms it produces a working
    /// setup.
    pub async fn select_plugin(&self, plugin: PaymentsPlugin) {
        self.selection.select(plugin);
        self.refresh().await;
    }

    /// Forgets both the in-memory and the persisted plugin choice.
    pub async fn clear_plugin_selection(&self) {
        self.selection.clear(&self.settings, self.site_id).await;
        self.refresh().await;
        // Distinguish "user reset a previous choice" from a first-time
        // prompt so the caller can phrase the screen accordingly.
        if self.current() == (ReadinessState::SelectPlugin { selection_was_cleared: false }) {
            self.publish(ReadinessState::SelectPlugin { selection_was_cleared: true });
        }
    }

    /// Installs the WooPayments plugin on the site, then re-resolves.
    pub async fn install_plugin(&self) {
        let plugin = PaymentsPlugin::WooPayments;
        match self.gateway.install_plugin(self.site_id, plugin).await {
            Ok(()) => self.refresh().await,
            Err(error) => {
                tracing::error!(%error, trigger = "install", plugin = plugin.gateway_id(), "plugin install failed");
                self.publish(ReadinessState::GenericError);
            }
        }
    }

    /// Activates the WooPayments plugin on the site, then re-resolves.
    pub async fn activate_plugin(&self) {
        let plugin = PaymentsPlugin::WooPayments;
        match self.gateway.activate_plugin(self.site_id, plugin).await {
            Ok(()) => self.refresh().await,
            Err(error) => {
                tracing::error!(%error, trigger = "activate", plugin = plugin.gateway_id(), "plugin activation failed");
                self.publish(ReadinessState::GenericError);
            }
        }
    }

    async fn gather_snapshot(&self) -> Result<ReadinessSnapshot, GatewayError> {
        let country = self.gateway.load_site_country(self.site_id).await?;
        let inventory = self.gateway.load_plugin_inventory(self.site_id).await?;
        let accounts = self.gateway.load_payment_gateway_accounts(self.site_id).await?;
        let cod_gateway_enabled = self.gateway.is_cash_on_delivery_enabled(self.site_id).await?;
        let cod_step_skipped = self.skip_flags.cod_step_skipped(&self.settings, self.site_id).await;
        let persisted_preference = self.selection.persisted_preference(&self.settings, self.site_id).await;

        Ok(ReadinessSnapshot {
            country,
            support: self.support.clone(),
            inventory,
            accounts,
            cod_gateway_enabled,
            pending_requirements_skipped: self.skip_flags.pending_requirements_skipped(),
            cod_step_skipped,
            local_preference: self.selection.local_preference(),
            persisted_preference,
        })
    }

    fn publish(&self, state: ReadinessState) {
        self.cache.update(state.clone());
        self.publisher.send_replace(state);
    }
}

fn classify_error(error: &GatewayError) -> ReadinessState {
    if error.is_connectivity() {
        ReadinessState::NoConnectionError
    } else {
        ReadinessState::GenericError
    }
}

/// Aggregate classification for the two prerequisite syncs: a connectivity
/// failure on either side dominates, any other failure is generic.
fn classify_sync_failures(errors: [Option<GatewayError>; 2]) -> Option<ReadinessState> {
    let errors: Vec<GatewayError> = errors.into_iter().flatten().collect();
    if errors.is_empty() {
        return None;
    }
    if errors.iter().any(GatewayError::is_connectivity) {
        tracing::warn!("readiness sync failed: no connection");
        Some(ReadinessState::NoConnectionError)
    } else {
        tracing::warn!(error = %errors[0], "readiness sync failed");
        Some(ReadinessState::GenericError)
    }
}
