use anyhow::Context;
use serde::{Deserialize, Serialize};

use merchantdesk_catalog::{CatalogQuery, InMemoryCatalog, SelectableItem};
use merchantdesk_core::{DomainResult, ItemId};
use merchantdesk_selection::{DerivedTotals, PricedLine, PricingPolicy, SelectionAggregator};

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Select {
        item_id: ItemId,
    },
    Deselect {
        item_id: ItemId,
    },
    SetQuantity {
        item_id: ItemId,
        quantity: i64,
        /// Reject out-of-range input instead of clamping.
        #[serde(default)]
        strict: bool,
    },
    Increment {
        item_id: ItemId,
    },
    Decrement {
        item_id: ItemId,
    },
    Clear,
}

impl ScriptStep {
    pub fn apply<C>(&self, aggregator: &mut SelectionAggregator<C>) -> DomainResult<()>
    where
        C: CatalogQuery,
    {
        match self {
            ScriptStep::Select { item_id } => aggregator.select(*item_id),
            ScriptStep::Deselect { item_id } => aggregator.deselect(*item_id),
            ScriptStep::SetQuantity {
                item_id,
                quantity,
                strict: false,
            } => aggregator.set_quantity(*item_id, *quantity).map(|_| ()),
            ScriptStep::SetQuantity {
                item_id,
                quantity,
                strict: true,
            } => aggregator.try_set_quantity(*item_id, *quantity).map(|_| ()),
            ScriptStep::Increment { item_id } => aggregator.increment(*item_id).map(|_| ()),
            ScriptStep::Decrement { item_id } => aggregator.decrement(*item_id).map(|_| ()),
            ScriptStep::Clear => aggregator.clear(),
        }
    }
}

/// A step the domain refused; replay carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedStep {
    pub index: usize,
    pub step: ScriptStep,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub selection: Vec<PricedLine>,
    pub totals: DerivedTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedStep>,
}

pub fn load_catalog(json: &str) -> anyhow::Result<InMemoryCatalog> {
    let items: Vec<SelectableItem> =
        serde_json::from_str(json).context("catalog is not a JSON array of items")?;
    let catalog = InMemoryCatalog::from_items(items).context("catalog contains invalid items")?;
    let items = catalog.len()?;
    tracing::info!(items, "catalog loaded");
    Ok(catalog)
}

pub fn parse_script(json: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("script is not a JSON array of steps")
}

/// Apply `steps` in order to a fresh selection over `catalog`.
pub fn replay<C>(
    catalog: C,
    pricing: PricingPolicy,
    steps: &[ScriptStep],
) -> anyhow::Result<Report>
where
    C: CatalogQuery,
{
    let mut aggregator = SelectionAggregator::with_pricing(catalog, pricing);
    let mut rejected = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        if let Err(err) = step.apply(&mut aggregator) {
            tracing::warn!(index, ?step, %err, "step rejected");
            rejected.push(RejectedStep {
                index,
                step: step.clone(),
                error: err.to_string(),
            });
        }
    }

    let selection = aggregator.priced_lines()?;
    let totals = aggregator.totals()?;
    tracing::info!(
        lines = selection.len(),
        rejected = rejected.len(),
        total_minor = totals.total.minor_units(),
        free_shipping = totals.shipping.is_zero(),
        "replay finished"
    );

    Ok(Report {
        selection,
        totals,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let id = ItemId::new();
        let json = format!(
            r#"[
                {{"op": "select", "item_id": "{id}"}},
                {{"op": "set_quantity", "item_id": "{id}", "quantity": 4}},
                {{"op": "set_quantity", "item_id": "{id}", "quantity": 9, "strict": true}},
                {{"op": "increment", "item_id": "{id}"}},
                {{"op": "decrement", "item_id": "{id}"}},
                {{"op": "deselect", "item_id": "{id}"}},
                {{"op": "clear"}}
            ]"#
        );
        let steps = parse_script(&json).unwrap();
        assert_eq!(steps.len(), 7);
        assert_eq!(
            steps[2],
            ScriptStep::SetQuantity {
                item_id: id,
                quantity: 9,
                strict: true
            }
        );
        assert_eq!(steps[6], ScriptStep::Clear);
    }

    #[test]
    fn unknown_op_is_an_error() {
        assert!(parse_script(r#"[{"op": "checkout"}]"#).is_err());
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(load_catalog(r#"{"not": "an array"}"#).is_err());
    }
}
