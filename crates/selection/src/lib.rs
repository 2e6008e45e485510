//! Selection domain module.
//!
//! Tracks which catalog entries a merchant has picked and in what quantity, and
//! derives subtotal/tax/shipping/total from that working set. Everything here is
//! pure and synchronous; the host UI drives it one user action at a time.

pub mod aggregator;
pub mod config;
pub mod pricing;
pub mod selection;

pub use aggregator::{PricedLine, SelectionAggregator};
pub use config::{ConfigError, PricingOverrides};
pub use pricing::{DerivedTotals, PricingPolicy};
pub use selection::{
    ClearSelection, DeselectItem, ItemDeselected, ItemSelected, OutOfRangePolicy,
    QuantityChanged, SelectItem, Selection, SelectionCommand, SelectionEvent, SelectionLine,
    SetQuantity,
};
