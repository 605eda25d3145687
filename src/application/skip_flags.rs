use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::ports::SettingsStore;

/// The two user-dismissible overrides feeding the resolver.
///
/// The pending-requirements skip is deliberately session-scoped: requirements
/// are time sensitive, so the merchant is re-prompted on every launch. The
/// cash-on-delivery skip is durable and read through the settings store on
/// every resolution.
#[derive(Debug, Default)]
pub struct SkipFlags {
    pending_requirements: AtomicBool,
}

impl SkipFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_requirements_skipped(&self) -> bool {
        self.pending_requirements.load(Ordering::Relaxed)
    }

    pub fn skip_pending_requirements(&self) {
        self.pending_requirements.store(true, Ordering::Relaxed);
    }

    /// Called once the requirements step has been satisfied, so the next
    /// occurrence prompts again instead of silently skipping.
    pub fn reset_pending_requirements(&self) {
        self.pending_requirements.store(false, Ordering::Relaxed);
    }

    pub async fn cod_step_skipped(&self, settings: &Arc<dyn SettingsStore>, site_id: i64) -> bool {
        settings.cod_step_skipped(site_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_skip_set_and_reset() {
        let flags = SkipFlags::new();
        assert!(!flags.pending_requirements_skipped());
        flags.skip_pending_requirements();
        assert!(flags.pending_requirements_skipped());
        flags.reset_pending_requirements();
        assert!(!flags.pending_requirements_skipped());
    }
}
