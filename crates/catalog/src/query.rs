//! Catalog query port and listing filters.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use merchantdesk_core::ItemId;

use crate::item::{ItemKind, SelectableItem};

/// Read-only catalog access used by the selection logic and listing screens.
///
/// Implementations own the data; callers receive clones and never mutate the catalog.
pub trait CatalogQuery {
    fn get(&self, id: &ItemId) -> Option<SelectableItem>;

    /// Entries matching `filter`, in the order the filter asks for.
    fn list(&self, filter: &CatalogFilter) -> Vec<SelectableItem>;
}

impl<C> CatalogQuery for Arc<C>
where
    C: CatalogQuery + ?Sized,
{
    fn get(&self, id: &ItemId) -> Option<SelectableItem> {
        (**self).get(id)
    }

    fn list(&self, filter: &CatalogFilter) -> Vec<SelectableItem> {
        (**self).list(filter)
    }
}

impl<C> CatalogQuery for &C
where
    C: CatalogQuery + ?Sized,
{
    fn get(&self, id: &ItemId) -> Option<SelectableItem> {
        (**self).get(id)
    }

    fn list(&self, filter: &CatalogFilter) -> Vec<SelectableItem> {
        (**self).list(filter)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Stock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Listing filter: free-text search, kind, stock availability, ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on name or SKU. Blank means no search.
    pub search: Option<String>,
    pub kind: Option<ItemKind>,
    pub in_stock_only: bool,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn sort_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = key;
        self.direction = direction;
        self
    }

    pub fn matches(&self, item: &SelectableItem) -> bool {
        if self.in_stock_only && !item.is_selectable() {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != item.kind) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let needle = term.to_lowercase();
                item.name.to_lowercase().contains(&needle)
                    || item
                        .sku
                        .as_deref()
                        .is_some_and(|sku| sku.to_lowercase().contains(&needle))
            }
        }
    }

    /// Filter and sort `items`. Ties are broken by id so the output is deterministic.
    pub fn apply<I>(&self, items: I) -> Vec<SelectableItem>
    where
        I: IntoIterator<Item = SelectableItem>,
    {
        let mut out: Vec<SelectableItem> = items.into_iter().filter(|i| self.matches(i)).collect();
        out.sort_by(|a, b| {
            let primary = match self.sort {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortKey::Price => a.unit_price.cmp(&b.unit_price),
                SortKey::Stock => a.stock.cmp(&b.stock),
            };
            let primary = match self.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            match primary {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });
        out
    }
}
