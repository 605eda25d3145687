use serde::{Deserialize, Serialize};

use super::plugin::PaymentsPlugin;

/// The single computed readiness status for in-person payments.
///
/// Exactly one value is current at any time; every resolution produces one of
/// these, including the failure cases. Serialized with a `state` tag so the
/// CLI and log output stay greppable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReadinessState {
    /// Inputs are still being gathered.
    Loading,
    /// Both plugins are viable and the merchant has not picked one.
    SelectPlugin { selection_was_cleared: bool },
    CountryNotSupported { country: String },
    CountryNotSupportedForPlugin { plugin: PaymentsPlugin, country: String },
    PluginNotInstalled,
    PluginUnsupportedVersion { plugin: PaymentsPlugin },
    PluginNotActivated { plugin: PaymentsPlugin },
    /// Plugin is active but no gateway account has been connected yet.
    PluginSetupNotCompleted { plugin: PaymentsPlugin },
    /// The plugin is in test mode while the connected account is live.
    PluginTestModeWithLiveAccount { plugin: PaymentsPlugin },
    AccountUnderReview { plugin: PaymentsPlugin },
    AccountPendingRequirement { plugin: PaymentsPlugin, deadline: Option<i64> },
    AccountOverdueRequirement { plugin: PaymentsPlugin },
    AccountRejected { plugin: PaymentsPlugin },
    /// The cash-on-delivery fallback gateway is not enabled on the site.
    CodGatewayNotSetUp { plugin: PaymentsPlugin },
    Completed {
        preferred_plugin: PaymentsPlugin,
        available_plugins: Vec<PaymentsPlugin>,
    },
    NoConnectionError,
    GenericError,
}

impl ReadinessState {
    pub fn is_completed(&self) -> bool {
        matches!(self, ReadinessState::Completed { .. })
    }

    /// Plugin the state refers to, when it is plugin-specific.
    pub fn plugin(&self) -> Option<PaymentsPlugin> {
        match self {
            ReadinessState::CountryNotSupportedForPlugin { plugin, .. }
            | ReadinessState::PluginUnsupportedVersion { plugin }
            | ReadinessState::PluginNotActivated { plugin }
            | ReadinessState::PluginSetupNotCompleted { plugin }
            | ReadinessState::PluginTestModeWithLiveAccount { plugin }
            | ReadinessState::AccountUnderReview { plugin }
            | ReadinessState::AccountPendingRequirement { plugin, .. }
            | ReadinessState::AccountOverdueRequirement { plugin }
            | ReadinessState::AccountRejected { plugin }
            | ReadinessState::CodGatewayNotSetUp { plugin } => Some(*plugin),
            ReadinessState::Completed { preferred_plugin, .. } => Some(*preferred_plugin),
            _ => None,
        }
    }
}
