use std::path::PathBuf;

use clap::Parser;

use merchantdesk_selection::{ConfigError, PricingOverrides, PricingPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "merchantdesk",
    about = "Replay a recorded selection session and print the priced selection"
)]
pub struct Args {
    /// JSON array of catalog items.
    pub catalog: PathBuf,

    /// JSON array of selection steps.
    pub script: PathBuf,

    /// Tax rate in basis points (1800 = 18%).
    #[arg(long, env = "MERCHANTDESK_TAX_RATE_BPS")]
    pub tax_rate_bps: Option<u32>,

    /// Subtotal (minor units) above which shipping is free.
    #[arg(long, env = "MERCHANTDESK_FREE_SHIPPING_THRESHOLD")]
    pub free_shipping_threshold: Option<u64>,

    /// Shipping fee (minor units) charged at or below the threshold.
    #[arg(long, env = "MERCHANTDESK_FLAT_SHIPPING_FEE")]
    pub flat_shipping_fee: Option<u64>,
}

impl Args {
    pub fn overrides(&self) -> PricingOverrides {
        PricingOverrides {
            tax_rate_bps: self.tax_rate_bps,
            free_shipping_threshold: self.free_shipping_threshold,
            flat_shipping_fee: self.flat_shipping_fee,
        }
    }

    pub fn pricing(&self) -> Result<PricingPolicy, ConfigError> {
        let overrides = self.overrides();
        if !overrides.is_empty() {
            tracing::debug!(?overrides, "pricing overrides supplied");
        }
        PricingPolicy::with_overrides(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn positional_paths_are_parsed() {
        let args =
            Args::try_parse_from(["merchantdesk", "demos/catalog.json", "demos/script.json"])
                .unwrap();
        assert_eq!(args.catalog, PathBuf::from("demos/catalog.json"));
        assert_eq!(args.script, PathBuf::from("demos/script.json"));
    }

    #[test]
    fn help_flag_prints_help() {
        let err = Args::try_parse_from(["merchantdesk", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn extra_positional_is_rejected() {
        let err = Args::try_parse_from(["merchantdesk", "a.json", "b.json", "c.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn missing_script_is_rejected() {
        let err = Args::try_parse_from(["merchantdesk", "a.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn pricing_flags_override_defaults() {
        let args = Args::try_parse_from([
            "merchantdesk",
            "a.json",
            "b.json",
            "--tax-rate-bps",
            "750",
            "--flat-shipping-fee",
            "0",
        ])
        .unwrap();

        let pricing = args.pricing().unwrap();
        assert_eq!(pricing.tax_rate_bps, 750);
        assert!(pricing.flat_shipping_fee.is_zero());
        assert_eq!(
            pricing.free_shipping_threshold,
            PricingPolicy::default().free_shipping_threshold
        );
    }

    #[test]
    fn unparsable_flag_value_is_rejected() {
        let err =
            Args::try_parse_from(["merchantdesk", "a.json", "b.json", "--tax-rate-bps", "18%"])
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn excessive_tax_rate_is_a_config_error() {
        let args =
            Args::try_parse_from(["merchantdesk", "a.json", "b.json", "--tax-rate-bps", "10001"])
                .unwrap();
        assert!(matches!(args.pricing(), Err(ConfigError::Invalid(_))));
    }
}
