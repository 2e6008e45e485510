use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use merchantdesk_core::{Aggregate, AggregateRoot, DomainError, ItemId, SelectionId};
use merchantdesk_events::Event;

/// Smallest quantity a selected item can hold.
pub const MIN_QUANTITY: u32 = 1;

/// One selected item and its chosen quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// What to do with a requested quantity outside `[1, stock]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Pull the value into range.
    #[default]
    Clamp,
    /// Refuse with `DomainError::OutOfRange`.
    Reject,
}

/// Aggregate root: Selection.
///
/// Lines are kept in the order items were selected. Every line satisfies
/// `1 <= quantity <= stock` as of the command that last touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    id: SelectionId,
    lines: Vec<SelectionLine>,
    version: u64,
}

impl Selection {
    pub fn empty(id: SelectionId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SelectionId {
        self.id
    }

    pub fn lines(&self) -> &[SelectionLine] {
        &self.lines
    }

    pub fn quantity(&self, item_id: &ItemId) -> Option<u32> {
        self.lines
            .iter()
            .find(|l| l.item_id == *item_id)
            .map(|l| l.quantity)
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.quantity(item_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

impl AggregateRoot for Selection {
    type Id = SelectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SelectItem.
///
/// `stock` is resolved from the catalog by the caller so the aggregate stays IO-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeselectItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeselectItem {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    /// Raw user input; may be zero, negative or above stock.
    pub quantity: i64,
    pub stock: u32,
    pub on_out_of_range: OutOfRangePolicy,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearSelection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSelection {
    pub selection_id: SelectionId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCommand {
    SelectItem(SelectItem),
    DeselectItem(DeselectItem),
    SetQuantity(SetQuantity),
    ClearSelection(ClearSelection),
}

/// Event: ItemSelected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelected {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemDeselected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeselected {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub selection_id: SelectionId,
    pub item_id: ItemId,
    pub previous: u32,
    pub quantity: u32,
    /// The value the user asked for before clamping.
    pub requested: i64,
    pub occurred_at: DateTime<Utc>,
}

impl QuantityChanged {
    pub fn was_clamped(&self) -> bool {
        i64::from(self.quantity) != self.requested
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEvent {
    ItemSelected(ItemSelected),
    ItemDeselected(ItemDeselected),
    QuantityChanged(QuantityChanged),
}

impl SelectionEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            SelectionEvent::ItemSelected(e) => e.item_id,
            SelectionEvent::ItemDeselected(e) => e.item_id,
            SelectionEvent::QuantityChanged(e) => e.item_id,
        }
    }
}

impl Event for SelectionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SelectionEvent::ItemSelected(_) => "selection.item.selected",
            SelectionEvent::ItemDeselected(_) => "selection.item.deselected",
            SelectionEvent::QuantityChanged(_) => "selection.item.quantity_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SelectionEvent::ItemSelected(e) => e.occurred_at,
            SelectionEvent::ItemDeselected(e) => e.occurred_at,
            SelectionEvent::QuantityChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Selection {
    type Command = SelectionCommand;
    type Event = SelectionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SelectionEvent::ItemSelected(e) => {
                if !self.contains(&e.item_id) {
                    self.lines.push(SelectionLine {
                        item_id: e.item_id,
                        quantity: e.quantity,
                    });
                }
            }
            SelectionEvent::ItemDeselected(e) => {
                self.lines.retain(|l| l.item_id != e.item_id);
            }
            SelectionEvent::QuantityChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == e.item_id) {
                    line.quantity = e.quantity;
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SelectionCommand::SelectItem(cmd) => self.handle_select(cmd),
            SelectionCommand::DeselectItem(cmd) => self.handle_deselect(cmd),
            SelectionCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            SelectionCommand::ClearSelection(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Selection {
    fn ensure_selection_id(&self, selection_id: SelectionId) -> Result<(), DomainError> {
        if self.id != selection_id {
            return Err(DomainError::invariant("selection_id mismatch"));
        }
        Ok(())
    }

    fn handle_select(&self, cmd: &SelectItem) -> Result<Vec<SelectionEvent>, DomainError> {
        self.ensure_selection_id(cmd.selection_id)?;

        // Already selected: keep the current quantity. Nothing in stock: the host
        // should have disabled the control, treat as a no-op.
        if self.contains(&cmd.item_id) || cmd.stock < MIN_QUANTITY {
            return Ok(vec![]);
        }

        Ok(vec![SelectionEvent::ItemSelected(ItemSelected {
            selection_id: cmd.selection_id,
            item_id: cmd.item_id,
            quantity: MIN_QUANTITY,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_deselect(&self, cmd: &DeselectItem) -> Result<Vec<SelectionEvent>, DomainError> {
        self.ensure_selection_id(cmd.selection_id)?;

        if !self.contains(&cmd.item_id) {
            return Ok(vec![]);
        }

        Ok(vec![SelectionEvent::ItemDeselected(ItemDeselected {
            selection_id: cmd.selection_id,
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<SelectionEvent>, DomainError> {
        self.ensure_selection_id(cmd.selection_id)?;

        let previous = self.quantity(&cmd.item_id).ok_or_else(DomainError::not_found)?;

        if cmd.stock < MIN_QUANTITY {
            return Err(DomainError::invariant("selected item is out of stock"));
        }

        let min = i64::from(MIN_QUANTITY);
        let max = i64::from(cmd.stock);
        let in_range = (min..=max).contains(&cmd.quantity);

        if !in_range && cmd.on_out_of_range == OutOfRangePolicy::Reject {
            return Err(DomainError::out_of_range(cmd.quantity, min, max));
        }

        let quantity = clamp_quantity(cmd.quantity, cmd.stock);
        if quantity == previous {
            return Ok(vec![]);
        }

        Ok(vec![SelectionEvent::QuantityChanged(QuantityChanged {
            selection_id: cmd.selection_id,
            item_id: cmd.item_id,
            previous,
            quantity,
            requested: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearSelection) -> Result<Vec<SelectionEvent>, DomainError> {
        self.ensure_selection_id(cmd.selection_id)?;

        Ok(self
            .lines
            .iter()
            .map(|line| {
                SelectionEvent::ItemDeselected(ItemDeselected {
                    selection_id: cmd.selection_id,
                    item_id: line.item_id,
                    occurred_at: cmd.occurred_at,
                })
            })
            .collect())
    }
}

/// Constrain a requested quantity to `[1, stock]`. `stock` must be at least 1.
pub fn clamp_quantity(requested: i64, stock: u32) -> u32 {
    let max = i64::from(stock.max(MIN_QUANTITY));
    let clamped = requested.clamp(i64::from(MIN_QUANTITY), max);
    u32::try_from(clamped).unwrap_or(MIN_QUANTITY)
}
