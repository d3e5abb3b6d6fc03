//! Planned state mutations.
//!
//! The core never writes anything: resolvers return [`StateUpdate`] values
//! describing the field changes a usage commits, and the host persists them
//! through its own (atomic, awaitable) mutation interface. Each update is a
//! complete new value for one logical field, so applying the same update
//! twice is harmless.

use crate::actor::AttributeRef;
use crate::item::ItemId;

/// One field change to persist on the actor or one of its items.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateUpdate {
    /// Set a numeric actor attribute (resource pool, hit points).
    ActorAttribute { attribute: AttributeRef, value: u32 },

    /// Set an item's stack quantity.
    ItemQuantity { item: ItemId, quantity: u32 },

    /// Set an item's remaining limited uses.
    ItemUses { item: ItemId, value: u32 },

    /// Set quantity and uses together (one stack was consumed and the use
    /// counter reset - this must land atomically).
    ItemQuantityAndUses {
        item: ItemId,
        quantity: u32,
        uses: u32,
    },

    /// Set an item's recharge availability flag.
    ItemRecharge { item: ItemId, charged: bool },

    /// Remove an item entirely (auto-destroy on the last use).
    DeleteItem { item: ItemId },
}
