use std::sync::Mutex;

use crate::domain::readiness::ReadinessState;

/// Single-slot cache of the last published readiness state.
///
/// Injected into the engine rather than held as a global so resolutions stay
/// reproducible in tests. Only ever holds fully resolved values.
#[derive(Debug, Default)]
pub struct ReadinessCache {
    slot: Mutex<Option<ReadinessState>>,
}

impl ReadinessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, state: ReadinessState) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(state);
    }

    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn current(&self) -> Option<ReadinessState> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The cached state, but only when it is `Completed`. Anything else needs
    /// a full refresh.
    pub fn completed(&self) -> Option<ReadinessState> {
        self.current().filter(ReadinessState::is_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plugin::PaymentsPlugin;

    #[test]
    fn test_update_overwrites_and_invalidate_clears() {
        let cache = ReadinessCache::new();
        assert_eq!(cache.current(), None);

        cache.update(ReadinessState::PluginNotInstalled);
        assert_eq!(cache.current(), Some(ReadinessState::PluginNotInstalled));
        assert_eq!(cache.completed(), None);

        let completed = ReadinessState::Completed {
            preferred_plugin: PaymentsPlugin::WooPayments,
            available_plugins: vec![PaymentsPlugin::WooPayments],
        };
        cache.update(completed.clone());
        assert_eq!(cache.completed(), Some(completed));

        cache.invalidate();
        assert_eq!(cache.current(), None);
    }
}
