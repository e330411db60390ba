//! Request/response DTOs for the boundary described in §6. `ManualTransaction`
//! matches the spec's field list exactly; `AlertFilter`/`Page` stand in for
//! the paginated fraud-alert search endpoint.

use serde::{Deserialize, Serialize};

use vigil_core::{AlertStatus, CardId, DeviceId, Money, Severity};

#[derive(Debug, Clone, Deserialize)]
pub struct ManualTransactionRequest {
    pub card_id: CardId,
    pub device_id: DeviceId,
    pub amount: Money,
    pub merchant_category: String,
    pub ip_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Search filter for `/api/v1/fraud-alerts/search`. `None` fields match
/// everything; `page`/`size` are 0-indexed/positive respectively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    pub card_id: Option<CardId>,
    pub status: Option<AlertStatus>,
    pub min_severity: Option<Severity>,
    pub page: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn paginate(mut items: Vec<T>, page: usize, size: usize) -> Self {
        let total = items.len();
        let size = size.max(1);
        let start = page.saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        let items = items.drain(start..end).collect();
        Self { items, page, size, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_the_requested_window() {
        let items: Vec<u32> = (0..25).collect();
        let page = Page::paginate(items, 1, 10);
        assert_eq!(page.items, (10..20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let items = vec![1, 2, 3];
        let page = Page::paginate(items, 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
