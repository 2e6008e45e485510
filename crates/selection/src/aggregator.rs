//! Host-facing selection facade.
//!
//! Resolves catalog data through the [`CatalogQuery`] port, turns user actions into
//! `Selection` commands, and notifies registered listeners of every applied event.

use chrono::Utc;
use serde::Serialize;

use merchantdesk_catalog::{CatalogQuery, SelectableItem};
use merchantdesk_core::{DomainError, DomainResult, ItemId, Money, SelectionId};
use merchantdesk_events::{Event, Listener, ListenerId, Listeners, execute};

use crate::pricing::{DerivedTotals, PricingPolicy};
use crate::selection::{
    ClearSelection, DeselectItem, OutOfRangePolicy, SelectItem, Selection, SelectionCommand,
    SelectionEvent, SetQuantity,
};

/// A selected line joined with its catalog entry, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub item: SelectableItem,
    pub quantity: u32,
    pub line_total: Money,
}

/// Selection state for one host view.
///
/// Dropping the aggregator discards the selection; nothing is persisted.
#[derive(Debug)]
pub struct SelectionAggregator<C> {
    catalog: C,
    selection: Selection,
    pricing: PricingPolicy,
    listeners: Listeners<SelectionEvent>,
}

impl<C> SelectionAggregator<C>
where
    C: CatalogQuery,
{
    pub fn new(catalog: C) -> Self {
        Self::with_pricing(catalog, PricingPolicy::default())
    }

    pub fn with_pricing(catalog: C, pricing: PricingPolicy) -> Self {
        Self {
            catalog,
            selection: Selection::empty(SelectionId::new()),
            pricing,
            listeners: Listeners::new(),
        }
    }

    pub fn id(&self) -> SelectionId {
        self.selection.id_typed()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn quantity(&self, item_id: &ItemId) -> Option<u32> {
        self.selection.quantity(item_id)
    }

    pub fn is_selected(&self, item_id: &ItemId) -> bool {
        self.selection.contains(item_id)
    }

    /// Register a listener for every event applied from now on.
    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: Listener<SelectionEvent> + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Select an item with quantity 1. No-op if already selected or out of stock.
    pub fn select(&mut self, item_id: ItemId) -> DomainResult<()> {
        let item = self.lookup(&item_id)?;
        if !item.is_selectable() {
            tracing::warn!(%item_id, "ignoring select of out-of-stock item");
        }
        self.dispatch(SelectionCommand::SelectItem(SelectItem {
            selection_id: self.id(),
            item_id,
            stock: item.stock,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Remove an item from the selection. No-op if it was not selected.
    pub fn deselect(&mut self, item_id: ItemId) -> DomainResult<()> {
        self.dispatch(SelectionCommand::DeselectItem(DeselectItem {
            selection_id: self.id(),
            item_id,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Set the quantity, clamped to `[1, stock]`. Returns the stored quantity.
    pub fn set_quantity(&mut self, item_id: ItemId, quantity: i64) -> DomainResult<u32> {
        self.change_quantity(item_id, quantity, OutOfRangePolicy::Clamp)
    }

    /// Like [`set_quantity`](Self::set_quantity) but rejects out-of-range input
    /// with `DomainError::OutOfRange` instead of clamping.
    pub fn try_set_quantity(&mut self, item_id: ItemId, quantity: i64) -> DomainResult<u32> {
        self.change_quantity(item_id, quantity, OutOfRangePolicy::Reject)
    }

    /// Add one unit, stopping at stock.
    pub fn increment(&mut self, item_id: ItemId) -> DomainResult<u32> {
        let current = self.selection.quantity(&item_id).ok_or_else(DomainError::not_found)?;
        self.set_quantity(item_id, i64::from(current) + 1)
    }

    /// Remove one unit, stopping at 1. Use [`deselect`](Self::deselect) to drop the line.
    pub fn decrement(&mut self, item_id: ItemId) -> DomainResult<u32> {
        let current = self.selection.quantity(&item_id).ok_or_else(DomainError::not_found)?;
        self.set_quantity(item_id, i64::from(current) - 1)
    }

    /// Deselect everything.
    pub fn clear(&mut self) -> DomainResult<()> {
        self.dispatch(SelectionCommand::ClearSelection(ClearSelection {
            selection_id: self.id(),
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Selected lines joined with the catalog, in selection order.
    ///
    /// Lines whose item has disappeared from the catalog are skipped.
    pub fn priced_lines(&self) -> DomainResult<Vec<PricedLine>> {
        let mut out = Vec::with_capacity(self.selection.len());
        for line in self.selection.lines() {
            let Some(item) = self.catalog.get(&line.item_id) else {
                tracing::warn!(item_id = %line.item_id, "selected item missing from catalog");
                continue;
            };
            let line_total = item
                .unit_price
                .checked_mul(line.quantity)
                .ok_or_else(|| DomainError::invariant("line total overflow"))?;
            out.push(PricedLine {
                item,
                quantity: line.quantity,
                line_total,
            });
        }
        Ok(out)
    }

    /// Subtotal, tax, shipping and total for the current selection.
    pub fn totals(&self) -> DomainResult<DerivedTotals> {
        let lines = self.priced_lines()?;
        self.pricing
            .totals(lines.iter().map(|l| (l.item.unit_price, l.quantity)))
    }

    fn change_quantity(
        &mut self,
        item_id: ItemId,
        quantity: i64,
        on_out_of_range: OutOfRangePolicy,
    ) -> DomainResult<u32> {
        let item = self.lookup(&item_id)?;
        self.dispatch(SelectionCommand::SetQuantity(SetQuantity {
            selection_id: self.id(),
            item_id,
            quantity,
            stock: item.stock,
            on_out_of_range,
            occurred_at: Utc::now(),
        }))?;
        self.selection.quantity(&item_id).ok_or_else(DomainError::not_found)
    }

    fn lookup(&self, item_id: &ItemId) -> DomainResult<SelectableItem> {
        self.catalog.get(item_id).ok_or_else(|| {
            tracing::debug!(%item_id, "item not in catalog");
            DomainError::not_found()
        })
    }

    fn dispatch(&mut self, command: SelectionCommand) -> DomainResult<Vec<SelectionEvent>> {
        let events = execute(&mut self.selection, &command)?;
        for event in &events {
            tracing::debug!(
                selection_id = %self.selection.id_typed(),
                event_type = event.event_type(),
                item_id = %event.item_id(),
                "selection changed"
            );
            if let SelectionEvent::QuantityChanged(e) = event
                && e.was_clamped()
            {
                tracing::debug!(
                    requested = e.requested,
                    stored = e.quantity,
                    "quantity clamped"
                );
            }
            self.listeners.notify(event);
        }
        Ok(events)
    }
}
