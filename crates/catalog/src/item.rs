use serde::{Deserialize, Serialize};

use merchantdesk_core::{DomainError, DomainResult, Entity, ItemId, Money};

/// What a catalog entry represents on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Product,
    Variant,
    Brochure,
}

/// A catalog entry eligible for quantity-based selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub kind: ItemKind,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: Money,
    /// Units available; caps the selectable quantity.
    pub stock: u32,
}

impl SelectableItem {
    pub fn new(id: ItemId, name: impl Into<String>, unit_price: Money, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            sku: None,
            kind: ItemKind::Product,
            unit_price,
            stock,
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Out-of-stock entries are listed but cannot be selected.
    pub fn is_selectable(&self) -> bool {
        self.stock > 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(sku) = &self.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("sku cannot be blank when present"));
            }
        }
        Ok(())
    }
}

impl Entity for SelectableItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stock_is_not_selectable() {
        let item = SelectableItem::new(ItemId::new(), "Poster", Money::from_major(5), 0);
        assert!(!item.is_selectable());
    }

    #[test]
    fn identity_is_the_item_id() {
        let id = ItemId::new();
        let a = SelectableItem::new(id, "Mug", Money::from_major(5), 3);
        let b = a.clone().with_sku("MUG-1").with_kind(ItemKind::Variant);
        assert_eq!(Entity::id(&a), Entity::id(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn blank_name_fails_validation() {
        let item = SelectableItem::new(ItemId::new(), "   ", Money::from_major(5), 3);
        match item.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("name") => {}
            other => panic!("expected name validation error, got {other:?}"),
        }
    }

    #[test]
    fn deserializes_with_defaults() {
        let id = ItemId::new();
        let json = format!(
            r#"{{"id":"{id}","name":"Summer brochure","unit_price":1250,"stock":40}}"#
        );
        let item: SelectableItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item.kind, ItemKind::Product);
        assert_eq!(item.sku, None);
        assert_eq!(item.unit_price, Money::from_minor(1250));
    }

    #[test]
    fn kind_uses_lowercase_names() {
        let json = serde_json::to_string(&ItemKind::Brochure).unwrap();
        assert_eq!(json, r#""brochure""#);
    }
}
