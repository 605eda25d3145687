use crate::domain::account::{AccountStatus, GatewayAccount};
use crate::domain::country::CountrySupport;
use crate::domain::plugin::{self, PaymentsPlugin, PluginInventory, SystemPluginSnapshot};
use crate::domain::readiness::ReadinessState;

/// All inputs a single resolution depends on, gathered by the engine before
/// calling [`resolve`]. Resolution is a pure function of this value.
#[derive(Debug, Clone)]
pub struct ReadinessSnapshot {
    pub country: Option<String>,
    pub support: CountrySupport,
    pub inventory: PluginInventory,
    pub accounts: Vec<GatewayAccount>,
    pub cod_gateway_enabled: bool,
    pub pending_requirements_skipped: bool,
    pub cod_step_skipped: bool,
    pub local_preference: Option<PaymentsPlugin>,
    pub persisted_preference: Option<PaymentsPlugin>,
}

impl ReadinessSnapshot {
    /// First card-present-eligible account connected for `plugin`.
    pub fn account_for(&self, plugin: PaymentsPlugin) -> Option<&GatewayAccount> {
        self.accounts
            .iter()
            .find(|a| a.gateway_id == plugin.gateway_id() && a.is_card_present_eligible)
    }
}

/// What the resolver decided, plus the deferred side effects the caller must
/// carry out. Keeping the effects in the return value keeps `resolve` pure.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub state: ReadinessState,
    /// Account to bind as the active collection account (completed only).
    pub bind_account: Option<GatewayAccount>,
    /// The pending-requirements skip was consumed and must be cleared.
    pub reset_pending_skip: bool,
}

impl Resolution {
    fn state(state: ReadinessState) -> Self {
        Self { state, bind_account: None, reset_pending_skip: false }
    }
}

/// Inputs for the per-plugin check chain.
struct PluginCheck<'a> {
    plugin: PaymentsPlugin,
    country: &'a str,
    support: &'a CountrySupport,
    installed: &'a SystemPluginSnapshot,
    account: Option<&'a GatewayAccount>,
    cod_gateway_enabled: bool,
    pending_requirements_skipped: bool,
    cod_step_skipped: bool,
}

type PluginRule = fn(&PluginCheck<'_>) -> Option<ReadinessState>;

/// Ordered onboarding checks for a single plugin. Evaluated top to bottom,
/// first producing rule wins; a plugin that passes every rule is ready.
///
/// Overdue requirements sit above pending ones on purpose: the pending step
/// can be skipped by the merchant, an overdue one never can.
const PLUGIN_RULES: &[(&str, PluginRule)] = &[
    ("country_supports_plugin", country_supports_plugin),
    ("version_supported", version_supported),
    ("plugin_active", plugin_active),
    ("account_connected", account_connected),
    ("test_mode_with_live_account", test_mode_with_live_account),
    ("account_under_review", account_under_review),
    ("overdue_requirements", overdue_requirements),
    ("pending_requirements", pending_requirements),
    ("account_rejected", account_rejected),
    ("cod_gateway_set_up", cod_gateway_set_up),
    ("status_allows_collection", status_allows_collection),
];

fn country_supports_plugin(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    // Only the Stripe gateway needs the re-check: it can reach the single
    // plugin path without having passed the combination gate.
    if check.plugin == PaymentsPlugin::StripeGateway
        && !check.support.supports_plugin(check.plugin, check.country)
    {
        return Some(ReadinessState::CountryNotSupportedForPlugin {
            plugin: check.plugin,
            country: check.country.to_string(),
        });
    }
    None
}

fn version_supported(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    if plugin::is_version_supported(&check.installed.version, check.plugin.minimum_supported_version()) {
        None
    } else {
        Some(ReadinessState::PluginUnsupportedVersion { plugin: check.plugin })
    }
}

fn plugin_active(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    if check.installed.active {
        None
    } else {
        Some(ReadinessState::PluginNotActivated { plugin: check.plugin })
    }
}

fn account_connected(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    match check.account {
        Some(account) if account.status != AccountStatus::NoAccount => None,
        // Active plugin but no usable account: setup was never finished.
        _ => Some(ReadinessState::PluginSetupNotCompleted { plugin: check.plugin }),
    }
}

fn test_mode_with_live_account(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    check
        .account?
        .is_in_test_mode_with_live_account()
        .then_some(ReadinessState::PluginTestModeWithLiveAccount { plugin: check.plugin })
}

fn account_under_review(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    check
        .account?
        .is_under_review()
        .then_some(ReadinessState::AccountUnderReview { plugin: check.plugin })
}

fn overdue_requirements(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    check
        .account?
        .has_overdue_requirement_step()
        .then_some(ReadinessState::AccountOverdueRequirement { plugin: check.plugin })
}

fn pending_requirements(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    let account = check.account?;
    if account.has_pending_requirement_step() && !check.pending_requirements_skipped {
        return Some(ReadinessState::AccountPendingRequirement {
            plugin: check.plugin,
            deadline: account.current_deadline,
        });
    }
    None
}

fn account_rejected(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    check
        .account?
        .status
        .is_rejected()
        .then_some(ReadinessState::AccountRejected { plugin: check.plugin })
}

fn cod_gateway_set_up(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    if !check.cod_gateway_enabled && !check.cod_step_skipped {
        return Some(ReadinessState::CodGatewayNotSetUp { plugin: check.plugin });
    }
    None
}

fn status_allows_collection(check: &PluginCheck<'_>) -> Option<ReadinessState> {
    // Catch-all for status combinations the rules above do not enumerate.
    if check.account?.status.allows_collection() {
        None
    } else {
        Some(ReadinessState::GenericError)
    }
}

/// Computes the readiness state for the given snapshot.
///
/// Total over every input combination; the only entry point that produces a
/// [`ReadinessState`] other than the sync-failure ones.
pub fn resolve(snapshot: &ReadinessSnapshot) -> Resolution {
    let Some(country) = snapshot.country.as_deref() else {
        return Resolution::state(ReadinessState::GenericError);
    };
    if !snapshot.support.is_country_supported(country) {
        return Resolution::state(ReadinessState::CountryNotSupported { country: country.to_string() });
    }

    let woo = snapshot.inventory.get(PaymentsPlugin::WooPayments);
    let stripe = snapshot.inventory.get(PaymentsPlugin::StripeGateway);

    match (woo, stripe) {
        (None, None) => Resolution::state(ReadinessState::PluginNotInstalled),
        (Some(_), None) => evaluate_plugin(snapshot, country, PaymentsPlugin::WooPayments),
        (None, Some(_)) => evaluate_plugin(snapshot, country, PaymentsPlugin::StripeGateway),
        (Some(woo), Some(stripe)) => resolve_both_installed(snapshot, country, woo, stripe),
    }
}

fn resolve_both_installed(
    snapshot: &ReadinessSnapshot,
    country: &str,
    woo: &SystemPluginSnapshot,
    stripe: &SystemPluginSnapshot,
) -> Resolution {
    match (woo.active, stripe.active) {
        (true, true) => {
            // When the Stripe gateway cannot serve this country the choice
            // is moot; proceed as if only WooPayments existed.
            if !snapshot.support.supports_plugin(PaymentsPlugin::StripeGateway, country) {
                return evaluate_plugin(snapshot, country, PaymentsPlugin::WooPayments);
            }
            let Some(preferred) = snapshot.local_preference.or(snapshot.persisted_preference) else {
                return Resolution::state(ReadinessState::SelectPlugin { selection_was_cleared: false });
            };
            let mut resolution = evaluate_plugin(snapshot, country, preferred);
            if let ReadinessState::Completed { preferred_plugin, .. } = resolution.state {
                resolution.state = ReadinessState::Completed {
                    preferred_plugin,
                    available_plugins: PaymentsPlugin::ALL.to_vec(),
                };
            }
            resolution
        }
        (true, false) => evaluate_plugin(snapshot, country, PaymentsPlugin::WooPayments),
        (false, true) => evaluate_plugin(snapshot, country, PaymentsPlugin::StripeGateway),
        (false, false) => {
            Resolution::state(ReadinessState::PluginNotActivated { plugin: PaymentsPlugin::WooPayments })
        }
    }
}

fn evaluate_plugin(snapshot: &ReadinessSnapshot, country: &str, plugin: PaymentsPlugin) -> Resolution {
    let Some(installed) = snapshot.inventory.get(plugin) else {
        // Callers only evaluate installed plugins; an empty slot means the
        // inventory and the preference disagree, which we treat as not set up.
        return Resolution::state(ReadinessState::PluginSetupNotCompleted { plugin });
    };
    let check = PluginCheck {
        plugin,
        country,
        support: &snapshot.support,
        installed,
        account: snapshot.account_for(plugin),
        cod_gateway_enabled: snapshot.cod_gateway_enabled,
        pending_requirements_skipped: snapshot.pending_requirements_skipped,
        cod_step_skipped: snapshot.cod_step_skipped,
    };

    for &(name, rule) in PLUGIN_RULES {
        if let Some(state) = rule(&check) {
            tracing::debug!(plugin = plugin.gateway_id(), rule = name, "onboarding check failed");
            return Resolution::state(state);
        }
    }

    Resolution {
        state: ReadinessState::Completed {
            preferred_plugin: plugin,
            available_plugins: vec![plugin],
        },
        bind_account: check.account.cloned(),
        reset_pending_skip: true,
    }
}
