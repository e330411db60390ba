//! CLI commands: thin glue between `clap`'s parsed arguments and
//! [`crate::orchestrator::Orchestrator`]. Each function owns its own
//! printing so `main.rs` stays a pure dispatch table.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use vigil_core::{AlertId, AlertStatus, CardBrand, CardId, CardStatus, Device, DeviceId, DeviceType, Money, NonNegative, Severity};

use crate::dto::{AlertFilter, ManualTransactionRequest};
use crate::orchestrator::Orchestrator;

/// Runs one transaction through the pipeline. `card`/`device`/`amount`/
/// `merchant_category`/`ip`/`lat`/`lon` are only consulted in manual mode;
/// auto mode picks its own linked card/device pair (§4.5 step 1).
#[allow(clippy::too_many_arguments)]
pub async fn process(
    orchestrator: &Orchestrator,
    manual: bool,
    success_force: bool,
    card: Option<CardId>,
    device: Option<DeviceId>,
    amount: Option<Decimal>,
    merchant_category: Option<String>,
    ip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<(), anyhow::Error> {
    let input = if manual {
        Some(ManualTransactionRequest {
            card_id: card.ok_or_else(|| anyhow::anyhow!("--card is required in manual mode"))?,
            device_id: device.ok_or_else(|| anyhow::anyhow!("--device is required in manual mode"))?,
            amount: Money::new(amount.ok_or_else(|| anyhow::anyhow!("--amount is required in manual mode"))?),
            merchant_category: merchant_category.unwrap_or_else(|| "GENERAL".to_string()),
            ip_address: ip.unwrap_or_else(|| "0.0.0.0".to_string()),
            latitude: lat.unwrap_or(0.0),
            longitude: lon.unwrap_or(0.0),
        })
    } else {
        None
    };

    let response = orchestrator.process(manual, success_force, input).await?;

    println!(
        "{} transaction {} - decision={} score={} severity={} alerts={}",
        if response.is_fraud { "🚫" } else { "✅" },
        response.transaction_id,
        response.decision,
        response.risk_score,
        response.severity,
        if response.alert_types.is_empty() {
            "none".to_string()
        } else {
            vigil_core::alert_types_to_csv(&response.alert_types)
        },
    );
    println!("   {}", response.message);

    Ok(())
}

pub async fn get_transaction(orchestrator: &Orchestrator, transaction_id: vigil_core::TransactionId) -> Result<(), anyhow::Error> {
    let transaction = orchestrator.get_transaction(&transaction_id)?;
    println!("Transaction {}", transaction.id);
    println!("  card:     {}", transaction.card_id);
    println!("  device:   {}", transaction.device_id);
    println!("  amount:   {}", transaction.amount);
    println!("  decision: {}", transaction.decision);
    println!("  fraud:    {}", transaction.is_fraud);
    println!("  reimbursement: {}", transaction.is_reimbursement);
    println!("  at:       {}", transaction.created_at);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn search_alerts(
    orchestrator: &Orchestrator,
    card: Option<CardId>,
    status: Option<AlertStatus>,
    min_severity: Option<Severity>,
    page: usize,
    size: usize,
) -> Result<(), anyhow::Error> {
    let filter = AlertFilter { card_id: card, status, min_severity, page, size };
    let result = orchestrator.search_alerts(filter);

    println!("Fraud alerts ({} of {} total):", result.items.len(), result.total);
    println!("{:-<90}", "");
    for alert in &result.items {
        println!(
            "{} | card={} | severity={:<8} | score={:>3} | status={:<14} | {}",
            alert.id, alert.card_id, alert.severity, alert.fraud_score, alert.status, alert.alert_types_csv(),
        );
    }
    Ok(())
}

pub async fn classify(orchestrator: &Orchestrator, alert_id: AlertId, new_status: AlertStatus) -> Result<(), anyhow::Error> {
    let result = orchestrator.classify(alert_id, new_status)?;

    println!("✅ alert {} is now {}", result.alert.id, result.alert.status);
    if let Some(reimbursement) = result.reimbursement {
        println!(
            "   reimbursement issued: transaction {} amount={} card={}",
            reimbursement.id, reimbursement.amount, reimbursement.card_id
        );
    }
    Ok(())
}

pub fn pause(orchestrator: &Orchestrator) {
    orchestrator.pause();
    println!("⏸  auto-processing paused");
}

pub fn resume(orchestrator: &Orchestrator) {
    orchestrator.resume();
    println!("▶  auto-processing resumed");
}

pub fn status(orchestrator: &Orchestrator) {
    println!("auto-processing is {}", if orchestrator.is_paused() { "paused" } else { "running" });
}

pub async fn reset(orchestrator: &Orchestrator) -> Result<(), anyhow::Error> {
    orchestrator.reset_all()?;
    println!("✅ all tables truncated (cards, devices, links, transactions, alerts, training rows)");
    Ok(())
}

/// Seeds a card and a linked device for manual testing. Full card/device
/// CRUD is out of scope (§1 Non-goals) — this is the minimal plumbing a
/// CLI-driven demo needs to populate data at all.
pub fn seed(ledger: &vigil_ledger::Ledger, holder_name: &str, credit_limit: Decimal) -> Result<(CardId, DeviceId), anyhow::Error> {
    let card_id = CardId::new();
    let device_id = DeviceId::new();
    let now = Utc::now();
    let limit = NonNegative::new(credit_limit)?;

    ledger.insert_card(vigil_core::Card {
        id: card_id,
        pan: Uuid::new_v4().simple().to_string()[..16].to_string(),
        holder_name: holder_name.to_string(),
        brand: CardBrand::Visa,
        expiration_date: now.date_naive() + chrono::Duration::days(365 * 3),
        credit_limit: limit,
        remaining_limit: limit,
        status: CardStatus::Active,
        risk_score: 0,
        created_at: now,
        last_transaction_at: None,
        devices: Default::default(),
    });

    ledger.insert_device(Device {
        id: device_id,
        fingerprint: Uuid::new_v4().to_string(),
        device_type: DeviceType::Mobile,
        os: "iOS".to_string(),
        browser: "Safari".to_string(),
        first_seen_at: now,
        last_seen_at: now,
        last_fingerprint_changed_at: None,
        cards: Default::default(),
    });

    ledger.link_card_device(card_id, device_id);

    println!("✅ seeded card {} linked to device {}", card_id, device_id);
    Ok((card_id, device_id))
}

pub fn link(ledger: &vigil_ledger::Ledger, card_id: CardId, device_id: DeviceId) {
    ledger.link_card_device(card_id, device_id);
    println!("✅ linked card {} to device {}", card_id, device_id);
}
