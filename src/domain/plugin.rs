use serde::{Deserialize, Serialize};

/// One of the two payment extensions that can provide in-person payment
/// capability for a store.
///
/// Each variant carries a static capability table (gateway identifier,
/// minimum supported version) so callers never branch on the variant for
/// these facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentsPlugin {
    WooPayments,
    StripeGateway,
}

impl PaymentsPlugin {
    pub const ALL: [PaymentsPlugin; 2] = [PaymentsPlugin::WooPayments, PaymentsPlugin::StripeGateway];

    /// Stable identifier used for persistence and gateway account matching.
    pub fn gateway_id(self) -> &'static str {
        match self {
            PaymentsPlugin::WooPayments => "woocommerce-payments",
            PaymentsPlugin::StripeGateway => "woocommerce-gateway-stripe",
        }
    }

    /// Oldest plugin version the reader SDK still works with.
    pub fn minimum_supported_version(self) -> &'static str {
        match self {
            PaymentsPlugin::WooPayments => "3.2.1",
            PaymentsPlugin::StripeGateway => "6.2.0",
        }
    }

    pub fn from_gateway_id(id: &str) -> Option<Self> {
        PaymentsPlugin::ALL.into_iter().find(|p| p.gateway_id() == id)
    }
}

/// Installed state of a single payment plugin as last synchronized from the
/// remote site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPluginSnapshot {
    pub version: String,
    pub active: bool,
}

/// Per-plugin inventory gathered from the system-plugin sync. `None` means the
/// plugin is not installed at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInventory {
    pub woo_payments: Option<SystemPluginSnapshot>,
    pub stripe_gateway: Option<SystemPluginSnapshot>,
}

impl PluginInventory {
    pub fn get(&self, plugin: PaymentsPlugin) -> Option<&SystemPluginSnapshot> {
        match plugin {
            PaymentsPlugin::WooPayments => self.woo_payments.as_ref(),
            PaymentsPlugin::StripeGateway => self.stripe_gateway.as_ref(),
        }
    }

    pub fn is_installed(&self, plugin: PaymentsPlugin) -> bool {
        self.get(plugin).is_some()
    }

    pub fn is_active(&self, plugin: PaymentsPlugin) -> bool {
        self.get(plugin).is_some_and(|p| p.active)
    }
}

/// Compares a dotted plugin version against a required minimum.
///
/// Segments are compared numerically, left to right, with missing segments
/// treated as zero. Prerelease suffixes (`3.2.1-test-1`) compare by their
/// numeric prefix, which is how the stores publish dev builds.
pub fn is_version_supported(version: &str, minimum: &str) -> bool {
    fn segments(v: &str) -> Vec<u64> {
        v.split(['.', '-', '+'])
            .map(|s| {
                let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    }

    let lhs = segments(version);
    let rhs = segments(minimum);
    let len = lhs.len().max(rhs.len());
    for i in 0..len {
        let l = lhs.get(i).copied().unwrap_or(0);
        let r = rhs.get(i).copied().unwrap_or(0);
        if l != r {
            return l > r;
        }
    }
    true
}
