//! In-memory entity gateway.
//!
//! Applies planned updates directly to an owned [`ActorState`]. Used by the
//! integration tests and by offline tooling that runs the workflow without a
//! host system behind it.

use std::sync::Arc;

use async_trait::async_trait;
use rules_core::{ActorState, AttributeRef, StateUpdate};
use tokio::sync::Mutex;

use crate::error::GatewayError;

use super::EntityGateway;

/// Gateway that mutates an actor held in memory.
#[derive(Clone)]
pub struct MemoryGateway {
    actor: Arc<Mutex<ActorState>>,
}

impl MemoryGateway {
    pub fn new(actor: ActorState) -> Self {
        Self {
            actor: Arc::new(Mutex::new(actor)),
        }
    }

    /// Snapshot of the current actor state.
    pub async fn actor(&self) -> ActorState {
        self.actor.lock().await.clone()
    }
}

#[async_trait]
impl EntityGateway for MemoryGateway {
    async fn apply(&self, update: StateUpdate) -> Result<(), GatewayError> {
        let mut actor = self.actor.lock().await;

        let missing_item = |id: rules_core::ItemId| {
            GatewayError::new(format!("item {id:?} not found in inventory"))
        };

        match update {
            StateUpdate::ActorAttribute { attribute, value } => {
                let meter = match attribute {
                    AttributeRef::Mana => &mut actor.pools.mana,
                    AttributeRef::Stamina => &mut actor.pools.stamina,
                    AttributeRef::Catalysts => &mut actor.pools.catalysts,
                    AttributeRef::HitPoints => &mut actor.hit_points,
                };
                meter.value = value;
            }
            StateUpdate::ItemQuantity { item, quantity } => {
                let entry = item_mut(&mut actor, item).ok_or_else(|| missing_item(item))?;
                entry.usage.quantity = quantity;
            }
            StateUpdate::ItemUses { item, value } => {
                let entry = item_mut(&mut actor, item).ok_or_else(|| missing_item(item))?;
                let uses = entry
                    .usage
                    .uses
                    .as_mut()
                    .ok_or_else(|| GatewayError::new("item has no use counter"))?;
                uses.value = value;
            }
            StateUpdate::ItemQuantityAndUses {
                item,
                quantity,
                uses,
            } => {
                let entry = item_mut(&mut actor, item).ok_or_else(|| missing_item(item))?;
                entry.usage.quantity = quantity;
                if let Some(counter) = entry.usage.uses.as_mut() {
                    counter.value = uses;
                }
            }
            StateUpdate::ItemRecharge { item, charged } => {
                let entry = item_mut(&mut actor, item).ok_or_else(|| missing_item(item))?;
                let recharge = entry
                    .usage
                    .recharge
                    .as_mut()
                    .ok_or_else(|| GatewayError::new("item has no recharge"))?;
                recharge.charged = charged;
            }
            StateUpdate::DeleteItem { item } => {
                let before = actor.inventory.len();
                actor.inventory.retain(|entry| entry.id != item);
                if actor.inventory.len() == before {
                    return Err(missing_item(item));
                }
            }
        }

        Ok(())
    }
}

fn item_mut(actor: &mut ActorState, id: rules_core::ItemId) -> Option<&mut rules_core::Item> {
    actor.inventory.iter_mut().find(|item| item.id == id)
}
