//! In-memory tables for the six "relational" entities §6 describes
//! (`cards_tb, devices_tb, card_devices, transactions_tb, fraud_alerts_tb`;
//! `fraud_training_tb` lives in `vigil-events`). A single authoritative
//! `card_devices` join set breaks the Card<->Device many-to-many cycle
//! (§9 redesign note) instead of each side holding the other's collection.
//!
//! Each card row carries a version counter for the optimistic-concurrency
//! check `commit` performs (§4.6).

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use vigil_core::{AlertId, AlertStatus, Card, CardId, Device, DeviceId, FraudAlert, Transaction, TransactionId};

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone)]
pub(crate) struct CardRow {
    pub version: u64,
    pub card: Card,
}

#[derive(Default)]
pub struct Ledger {
    pub(crate) cards: RwLock<HashMap<CardId, CardRow>>,
    pub(crate) devices: RwLock<HashMap<DeviceId, Device>>,
    pub(crate) card_devices: RwLock<BTreeSet<(CardId, DeviceId)>>,
    pub(crate) transactions: RwLock<HashMap<TransactionId, Transaction>>,
    pub(crate) alerts: RwLock<HashMap<AlertId, FraudAlert>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a card row at version 0. Card/device seeding
    /// itself is external plumbing (§1); this is the storage primitive a
    /// seeder would call.
    pub fn insert_card(&self, card: Card) {
        self.cards.write().unwrap().insert(card.id, CardRow { version: 0, card });
    }

    pub fn insert_device(&self, device: Device) {
        self.devices.write().unwrap().insert(device.id, device);
    }

    pub fn link_card_device(&self, card_id: CardId, device_id: DeviceId) {
        self.card_devices.write().unwrap().insert((card_id, device_id));
    }

    pub fn get_card(&self, id: &CardId) -> LedgerResult<Card> {
        self.cards
            .read()
            .unwrap()
            .get(id)
            .map(|row| row.card.clone())
            .ok_or(LedgerError::CardNotFound(*id))
    }

    /// The current version of a card row, for callers that need to capture
    /// it at context-build time and present it back to `commit` later.
    pub fn card_version(&self, id: &CardId) -> LedgerResult<u64> {
        self.cards
            .read()
            .unwrap()
            .get(id)
            .map(|row| row.version)
            .ok_or(LedgerError::CardNotFound(*id))
    }

    pub fn get_device(&self, id: &DeviceId) -> LedgerResult<Device> {
        self.devices.read().unwrap().get(id).cloned().ok_or(LedgerError::DeviceNotFound(*id))
    }

    pub fn get_transaction(&self, id: &TransactionId) -> LedgerResult<Transaction> {
        self.transactions
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound(*id))
    }

    pub fn get_alert(&self, id: &AlertId) -> Option<FraudAlert> {
        self.alerts.read().unwrap().get(id).cloned()
    }

    pub fn alert_for_transaction(&self, transaction_id: &TransactionId) -> Option<FraudAlert> {
        self.alerts.read().unwrap().values().find(|a| &a.transaction_id == transaction_id).cloned()
    }

    pub fn all_alerts(&self) -> Vec<FraudAlert> {
        self.alerts.read().unwrap().values().cloned().collect()
    }

    /// Overwrites an alert's status in place. `vigil-review` is the only
    /// caller; it has already validated the transition is legal.
    pub fn set_alert_status(&self, id: &AlertId, status: AlertStatus) -> LedgerResult<FraudAlert> {
        let mut alerts = self.alerts.write().unwrap();
        let alert = alerts.get_mut(id).ok_or(LedgerError::AlertNotFound(*id))?;
        alert.status = status;
        Ok(alert.clone())
    }

    pub fn is_linked(&self, card_id: &CardId, device_id: &DeviceId) -> bool {
        self.card_devices.read().unwrap().contains(&(*card_id, *device_id))
    }

    pub fn linked_devices(&self, card_id: &CardId) -> BTreeSet<DeviceId> {
        self.card_devices
            .read()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == card_id)
            .map(|(_, d)| *d)
            .collect()
    }

    pub fn linked_cards(&self, device_id: &DeviceId) -> BTreeSet<CardId> {
        self.card_devices
            .read()
            .unwrap()
            .iter()
            .filter(|(_, d)| d == device_id)
            .map(|(c, _)| *c)
            .collect()
    }

    /// Every `(card, device)` pair currently linked, for the scheduler's
    /// auto-candidate selection (§4.5 step 1).
    pub fn all_links(&self) -> Vec<(CardId, DeviceId)> {
        self.card_devices.read().unwrap().iter().copied().collect()
    }

    /// C9: truncates everything this store owns, in the order
    /// `alerts -> transactions -> card_devices -> devices -> cards`
    /// (`fraud_training_tb`, ordered before alerts, is owned by
    /// `vigil-events` and must be cleared by the caller first).
    pub fn reset_all(&self) {
        self.alerts.write().unwrap().clear();
        self.transactions.write().unwrap().clear();
        self.card_devices.write().unwrap().clear();
        self.devices.write().unwrap().clear();
        self.cards.write().unwrap().clear();
    }
}

impl vigil_context::CardStore for Ledger {
    fn get_card(&self, id: &CardId) -> Option<Card> {
        Ledger::get_card(self, id).ok()
    }

    fn linked_devices(&self, card_id: &CardId) -> BTreeSet<DeviceId> {
        Ledger::linked_devices(self, card_id)
    }
}

impl vigil_context::DeviceStore for Ledger {
    fn get_device(&self, id: &DeviceId) -> Option<Device> {
        Ledger::get_device(self, id).ok()
    }

    fn linked_cards(&self, device_id: &DeviceId) -> BTreeSet<CardId> {
        Ledger::linked_cards(self, device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use vigil_core::{CardBrand, CardStatus, DeviceType, NonNegative};

    fn sample_card() -> Card {
        Card {
            id: CardId::new(),
            pan: "4111".into(),
            holder_name: "Jane".into(),
            brand: CardBrand::Visa,
            expiration_date: Utc::now().date_naive(),
            credit_limit: NonNegative::new(dec!(1000)).unwrap(),
            remaining_limit: NonNegative::new(dec!(1000)).unwrap(),
            status: CardStatus::Active,
            risk_score: 0,
            created_at: Utc::now(),
            last_transaction_at: None,
            devices: Default::default(),
        }
    }

    fn sample_device() -> Device {
        Device {
            id: DeviceId::new(),
            fingerprint: "fp".into(),
            device_type: DeviceType::Mobile,
            os: "iOS".into(),
            browser: "Safari".into(),
            first_seen_at: Utc::now(),
            last_seen_at: Utc::now(),
            last_fingerprint_changed_at: None,
            cards: Default::default(),
        }
    }

    #[test]
    fn links_are_symmetric_and_exclude_self() {
        let ledger = Ledger::new();
        let card = sample_card();
        let device = sample_device();
        ledger.insert_card(card.clone());
        ledger.insert_device(device.clone());
        ledger.link_card_device(card.id, device.id);

        assert!(ledger.is_linked(&card.id, &device.id));
        assert!(ledger.linked_devices(&card.id).contains(&device.id));
        assert!(ledger.linked_cards(&device.id).contains(&card.id));
    }

    #[test]
    fn reset_all_clears_every_table() {
        let ledger = Ledger::new();
        let card = sample_card();
        let device = sample_device();
        ledger.insert_card(card.clone());
        ledger.insert_device(device.clone());
        ledger.link_card_device(card.id, device.id);

        ledger.reset_all();

        assert!(ledger.get_card(&card.id).is_err());
        assert!(ledger.get_device(&device.id).is_err());
        assert!(ledger.linked_devices(&card.id).is_empty());
    }
}
