//! `merchantdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog and
//! selection crates (no IO, no UI concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{ItemId, SelectionId};
pub use value_object::{BPS_SCALE, Money, ValueObject};
