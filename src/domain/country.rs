use std::collections::HashSet;

use super::plugin::PaymentsPlugin;

/// Which countries support in-person payments, globally and per plugin.
///
/// A country can be in the global set while only one of the two plugins
/// serves it; the resolver uses both levels when picking between plugins.
#[derive(Debug, Clone)]
pub struct CountrySupport {
    supported: HashSet<String>,
    woo_payments: HashSet<String>,
    stripe_gateway: HashSet<String>,
}

fn set(codes: &[&str]) -> HashSet<String> {
    codes.iter().map(|c| (*c).to_string()).collect()
}

impl Default for CountrySupport {
    /// The production rollout: WooPayments serves all supported countries,
    /// the Stripe gateway only the North American ones.
    fn default() -> Self {
        Self::new(&["US", "CA", "GB"], &["US", "CA", "GB"], &["US", "CA"])
    }
}

impl CountrySupport {
    pub fn new(supported: &[&str], woo_payments: &[&str], stripe_gateway: &[&str]) -> Self {
        Self {
            supported: set(supported),
            woo_payments: set(woo_payments),
            stripe_gateway: set(stripe_gateway),
        }
    }

    pub fn is_country_supported(&self, country: &str) -> bool {
        self.supported.contains(country)
    }

    pub fn supports_plugin(&self, plugin: PaymentsPlugin, country: &str) -> bool {
        match plugin {
            PaymentsPlugin::WooPayments => self.woo_payments.contains(country),
            PaymentsPlugin::StripeGateway => self.stripe_gateway.contains(country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rollout() {
        let support = CountrySupport::default();
        assert!(support.is_country_supported("US"));
        assert!(!support.is_country_supported("ES"));
        assert!(support.supports_plugin(PaymentsPlugin::WooPayments, "GB"));
        assert!(!support.supports_plugin(PaymentsPlugin::StripeGateway, "GB"));
    }
}
