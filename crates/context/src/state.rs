//! Per-card sliding window of the last 20 committed transactions.
//!
//! Keeps a literal `VecDeque` rather than minute-granularity buckets: the
//! rule catalog needs exact membership ("was this device present in the
//! last 20?"), not just a count, so an approximate counting structure would
//! lose the history several rules depend on.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use vigil_core::{CardId, Decision, DeviceId, Money, Transaction};

/// Maximum number of historical transactions kept per card.
pub const WINDOW_SIZE: usize = 20;

/// The subset of a committed `Transaction` that rule evaluators need from
/// history. Captured at record time so later Device/Card mutations (e.g. a
/// fingerprint rotation) never retroactively change what a rule sees.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSnapshot {
    pub device_id: DeviceId,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub decision: Decision,
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(tx: &Transaction) -> Self {
        Self {
            device_id: tx.device_id,
            amount: tx.amount,
            timestamp: tx.timestamp,
            latitude: tx.latitude,
            longitude: tx.longitude,
            country_code: tx.country_code.clone(),
            decision: tx.decision,
        }
    }
}

/// Per-card history, newest-first, capped at `WINDOW_SIZE`.
#[derive(Debug, Default, Clone)]
pub struct TransactionWindow {
    entries: VecDeque<TransactionSnapshot>,
}

impl TransactionWindow {
    pub fn push(&mut self, snapshot: TransactionSnapshot) {
        self.entries.push_front(snapshot);
        self.entries.truncate(WINDOW_SIZE);
    }

    pub fn entries(&self) -> &VecDeque<TransactionSnapshot> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn most_recent(&self) -> Option<&TransactionSnapshot> {
        self.entries.front()
    }
}

/// In-memory state for fast validation-context assembly: one sliding window
/// per card. Rebuilt trivially, since it is a fixed-size cache over
/// already-committed history, never the system of record.
#[derive(Debug, Default)]
pub struct CardHistory {
    windows: HashMap<CardId, TransactionWindow>,
}

impl CardHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, card_id: CardId, snapshot: TransactionSnapshot) {
        self.windows.entry(card_id).or_default().push(snapshot);
    }

    /// Newest-first history for a card, empty if the card has none yet.
    pub fn window(&self, card_id: &CardId) -> &VecDeque<TransactionSnapshot> {
        static EMPTY: VecDeque<TransactionSnapshot> = VecDeque::new();
        self.windows
            .get(card_id)
            .map(|w| &w.entries)
            .unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snap(amount: i64) -> TransactionSnapshot {
        TransactionSnapshot {
            device_id: DeviceId::new(),
            amount: Money::new(dec!(1) * rust_decimal::Decimal::from(amount)),
            timestamp: Utc::now(),
            latitude: 0.0,
            longitude: 0.0,
            country_code: "US".into(),
            decision: Decision::Approved,
        }
    }

    #[test]
    fn window_caps_at_20_newest_first() {
        let mut window = TransactionWindow::default();
        for i in 0..25 {
            window.push(snap(i));
        }
        assert_eq!(window.len(), WINDOW_SIZE);
        // most recent pushed (24th) is at the front
        assert_eq!(window.most_recent().unwrap().amount, snap(24).amount);
    }

    #[test]
    fn history_is_per_card() {
        let mut history = CardHistory::new();
        let card_a = CardId::new();
        let card_b = CardId::new();
        history.record(card_a, snap(1));
        assert_eq!(history.window(&card_a).len(), 1);
        assert_eq!(history.window(&card_b).len(), 0);
    }
}
