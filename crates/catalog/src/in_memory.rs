//! In-memory catalog for tests/dev (stands in for a product/catalog service).

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use merchantdesk_core::{DomainError, DomainResult, ItemId};

use crate::item::SelectableItem;
use crate::query::{CatalogFilter, CatalogQuery};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<BTreeMap<ItemId, SelectableItem>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting invalid entries and duplicate ids.
    pub fn from_items<I>(items: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = SelectableItem>,
    {
        let catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    pub fn insert(&self, item: SelectableItem) -> DomainResult<()> {
        item.validate()?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&item.id) {
            return Err(DomainError::conflict(format!(
                "catalog already contains item {}",
                item.id
            )));
        }
        tracing::debug!(
            item_id = %item.id,
            name = %item.name,
            stock = item.stock,
            "catalog item added"
        );
        map.insert(item.id, item);
        Ok(())
    }

    /// Fails on a poisoned lock, like [`InMemoryCatalog::insert`].
    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, BTreeMap<ItemId, SelectableItem>>> {
        self.inner.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("catalog lock poisoned")
}

impl CatalogQuery for InMemoryCatalog {
    fn get(&self, id: &ItemId) -> Option<SelectableItem> {
        let map = self.read().ok()?;
        map.get(id).cloned()
    }

    fn list(&self, filter: &CatalogFilter) -> Vec<SelectableItem> {
        let map = match self.read() {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(%err, "catalog unreadable, listing nothing");
                return vec![];
            }
        };
        filter.apply(map.values().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merchantdesk_core::Money;
    use std::sync::Arc;

    fn item(name: &str, stock: u32) -> SelectableItem {
        SelectableItem::new(ItemId::new(), name, Money::from_major(10), stock)
    }

    #[test]
    fn get_returns_inserted_item() {
        let catalog = InMemoryCatalog::new();
        let shirt = item("Shirt", 3);
        catalog.insert(shirt.clone()).unwrap();
        assert_eq!(catalog.get(&shirt.id), Some(shirt));
        assert_eq!(catalog.get(&ItemId::new()), None);
    }

    #[test]
    fn duplicate_id_is_a_conflict() {
        let shirt = item("Shirt", 3);
        let err = InMemoryCatalog::from_items(vec![shirt.clone(), shirt]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn invalid_item_is_rejected() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.insert(item("", 1)).is_err());
        assert!(catalog.is_empty().unwrap());
    }

    #[test]
    fn list_applies_filter_through_arc() {
        let catalog = Arc::new(
            InMemoryCatalog::from_items(vec![item("Hat", 0), item("Scarf", 2)]).unwrap(),
        );
        let listed = catalog.list(&CatalogFilter::all().in_stock_only());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Scarf");
        assert_eq!(catalog.len().unwrap(), 2);
    }

    #[test]
    fn poisoned_lock_is_reported_not_hidden() {
        let catalog = Arc::new(InMemoryCatalog::from_items(vec![item("Hat", 1)]).unwrap());
        let holder = Arc::clone(&catalog);
        let crashed = std::thread::spawn(move || {
            let _guard = holder.inner.write().unwrap();
            panic!("writer crashed while holding the catalog lock");
        })
        .join();
        assert!(crashed.is_err());

        assert!(matches!(catalog.len(), Err(DomainError::InvariantViolation(_))));
        assert!(matches!(catalog.is_empty(), Err(DomainError::InvariantViolation(_))));
        assert!(matches!(
            catalog.insert(item("Scarf", 2)),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
