use anyhow::Context;
use clap::Parser;

use merchantdesk_cli::{Args, load_catalog, parse_script, replay};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    merchantdesk_observability::init();

    let pricing = args.pricing().context("invalid pricing configuration")?;
    tracing::info!(
        tax_rate_bps = pricing.tax_rate_bps,
        free_shipping_threshold = %pricing.free_shipping_threshold,
        flat_shipping_fee = %pricing.flat_shipping_fee,
        "pricing configured"
    );

    let catalog_json = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("failed to read catalog {}", args.catalog.display()))?;
    let script_json = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;

    let catalog = load_catalog(&catalog_json)?;
    let steps = parse_script(&script_json)?;
    let report = replay(&catalog, pricing, &steps)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
