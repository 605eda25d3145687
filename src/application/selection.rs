use std::sync::Arc;
use std::sync::Mutex;

use crate::domain::plugin::PaymentsPlugin;
use crate::domain::ports::SettingsStore;
use crate::domain::readiness::ReadinessState;

/// Tracks which plugin the merchant prefers when both are viable.
///
/// A fresh choice is held in memory and only persisted once a resolution
/// confirms it actually yields a working setup: `select` arms a one-shot
/// confirmation slot, and the first `Completed` state observed for that
/// plugin writes the durable preference and disarms the slot. Repeated
/// resolutions after that never write again.
#[derive(Debug, Default)]
pub struct PluginSelection {
    inner: Mutex<SelectionState>,
}

#[derive(Debug, Default)]
struct SelectionState {
    local_preference: Option<PaymentsPlugin>,
    awaiting_confirmation: Option<PaymentsPlugin>,
}

impl PluginSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_preference(&self) -> Option<PaymentsPlugin> {
        self.lock().local_preference
    }

    /// Sets the in-memory preference, replacing any prior one, and arms the
    /// deferred persistence slot.
    pub fn select(&self, plugin: PaymentsPlugin) {
        let mut state = self.lock();
        state.local_preference = Some(plugin);
        state.awaiting_confirmation = Some(plugin);
    }

    pub async fn clear(&self, settings: &Arc<dyn SettingsStore>, site_id: i64) {
        {
            let mut state = self.lock();
            state.local_preference = None;
            state.awaiting_confirmation = None;
        }
        settings.forget_preferred_gateway(site_id).await;
    }

    pub async fn persisted_preference(
        &self,
        settings: &Arc<dyn SettingsStore>,
        site_id: i64,
    ) -> Option<PaymentsPlugin> {
        let gateway_id = settings.preferred_gateway(site_id).await?;
        PaymentsPlugin::from_gateway_id(&gateway_id)
    }

    /// Reacts to a freshly published state. Persists the armed choice the
    /// first time a matching completed state comes through, then disarms.
    pub async fn observe(&self, state: &ReadinessState, settings: &Arc<dyn SettingsStore>, site_id: i64) {
        let ReadinessState::Completed { preferred_plugin, .. } = state else {
            return;
        };
        let confirmed = {
            let mut inner = self.lock();
            if inner.awaiting_confirmation == Some(*preferred_plugin) {
                inner.awaiting_confirmation.take()
            } else {
                None
            }
        };
        if let Some(plugin) = confirmed {
            tracing::debug!(gateway = plugin.gateway_id(), "persisting confirmed plugin choice");
            settings.set_preferred_gateway(site_id, plugin.gateway_id()).await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SelectionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct RecordingSettings {
        preferred: RwLock<Option<String>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl SettingsStore for RecordingSettings {
        async fn preferred_gateway(&self, _site_id: i64) -> Option<String> {
            self.preferred.read().await.clone()
        }

        async fn set_preferred_gateway(&self, _site_id: i64, gateway_id: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.preferred.write().await = Some(gateway_id.to_string());
        }

        async fn forget_preferred_gateway(&self, _site_id: i64) {
            *self.preferred.write().await = None;
        }

        async fn cod_step_skipped(&self, _site_id: i64) -> bool {
            false
        }
    }

    fn completed(plugin: PaymentsPlugin) -> ReadinessState {
        ReadinessState::Completed {
            preferred_plugin: plugin,
            available_plugins: vec![plugin],
        }
    }

    #[tokio::test]
    async fn test_persists_once_on_matching_completion() {
        let selection = PluginSelection::new();
        let recording = Arc::new(RecordingSettings::default());
        let settings: Arc<dyn SettingsStore> = Arc::clone(&recording) as Arc<dyn SettingsStore>;

        selection.select(PaymentsPlugin::StripeGateway);

        // A completion for the other plugin must not confirm the choice.
        selection.observe(&completed(PaymentsPlugin::WooPayments), &settings, 1).await;
        assert_eq!(recording.preferred_gateway(1).await, None);

        selection.observe(&completed(PaymentsPlugin::StripeGateway), &settings, 1).await;
        assert_eq!(
            recording.preferred_gateway(1).await.as_deref(),
            Some("woocommerce-gateway-stripe")
        );
    }

    #[tokio::test]
    async fn test_duplicate_completions_write_once() {
        let selection = PluginSelection::new();
        let recording = Arc::new(RecordingSettings::default());
        let settings: Arc<dyn SettingsStore> = Arc::clone(&recording) as Arc<dyn SettingsStore>;

        selection.select(PaymentsPlugin::WooPayments);
        for _ in 0..3 {
            selection.observe(&completed(PaymentsPlugin::WooPayments), &settings, 1).await;
        }
        assert_eq!(recording.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_forgets_persisted_preference() {
        let selection = PluginSelection::new();
        let recording = Arc::new(RecordingSettings::default());
        let settings: Arc<dyn SettingsStore> = Arc::clone(&recording) as Arc<dyn SettingsStore>;

        selection.select(PaymentsPlugin::WooPayments);
        selection.observe(&completed(PaymentsPlugin::WooPayments), &settings, 1).await;
        assert!(selection.persisted_preference(&settings, 1).await.is_some());

        selection.clear(&settings, 1).await;
        assert_eq!(selection.local_preference(), None);
        assert_eq!(selection.persisted_preference(&settings, 1).await, None);

        // A later completion must not resurrect the cleared choice.
        selection.observe(&completed(PaymentsPlugin::WooPayments), &settings, 1).await;
        assert_eq!(recording.writes.load(Ordering::SeqCst), 1);
    }
}
