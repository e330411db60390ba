//! Assembles the read-only `ValidationContext` a candidate is evaluated
//! against (§4.2). Construction is the only place that touches the card and
//! device stores; the rule evaluators that consume the context never do
//! their own I/O.

use std::collections::{BTreeSet, VecDeque};

use vigil_core::{Card, CardId, Device, DeviceId};

use crate::error::{ContextError, ContextResult};
use crate::state::{CardHistory, TransactionSnapshot};

/// Read-only snapshot passed by reference to every rule evaluator. Built
/// once per candidate.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub card: Card,
    pub device: Device,
    /// Devices presently linked to `card`, other than `device` itself.
    pub other_devices_on_card: BTreeSet<DeviceId>,
    /// Cards presently linked to `device`, other than `card` itself.
    pub other_cards_on_device: BTreeSet<CardId>,
    /// Last 20 transactions of the card, newest-first.
    pub history: VecDeque<TransactionSnapshot>,
}

impl ValidationContext {
    pub fn device_seen_in_history(&self, device_id: &DeviceId) -> bool {
        self.history.iter().any(|tx| &tx.device_id == device_id)
    }
}

/// Trait seam so `vigil-ledger`'s in-memory stores can be queried without
/// `vigil-context` depending on the ledger crate directly (the ledger
/// depends on `vigil-context`, not the other way around).
pub trait CardStore {
    fn get_card(&self, id: &CardId) -> Option<Card>;
    fn linked_devices(&self, card_id: &CardId) -> BTreeSet<DeviceId>;
}

pub trait DeviceStore {
    fn get_device(&self, id: &DeviceId) -> Option<Device>;
    fn linked_cards(&self, device_id: &DeviceId) -> BTreeSet<CardId>;
}

pub struct ContextBuilder<'a> {
    cards: &'a dyn CardStore,
    devices: &'a dyn DeviceStore,
    history: &'a CardHistory,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(cards: &'a dyn CardStore, devices: &'a dyn DeviceStore, history: &'a CardHistory) -> Self {
        Self { cards, devices, history }
    }

    pub fn build(&self, card_id: CardId, device_id: DeviceId) -> ContextResult<ValidationContext> {
        let card = self.cards.get_card(&card_id).ok_or(ContextError::CardNotFound(card_id))?;
        let device = self
            .devices
            .get_device(&device_id)
            .ok_or(ContextError::DeviceNotFound(device_id))?;

        let mut other_devices_on_card = self.cards.linked_devices(&card_id);
        other_devices_on_card.remove(&device_id);

        let mut other_cards_on_device = self.devices.linked_cards(&device_id);
        other_cards_on_device.remove(&card_id);

        let history = self.history.window(&card_id).clone();

        Ok(ValidationContext {
            card,
            device,
            other_devices_on_card,
            other_cards_on_device,
            history,
        })
    }
}
