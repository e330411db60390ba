//! The Pipeline Orchestrator (C5): the nine-step `process` contract (§4.5),
//! plus the thin pass-throughs the CLI and the scheduler/reset tasks need
//! (`get_transaction`, `search_alerts`, `classify`, `pause`/`resume`,
//! `reset_all`). Grounded on the host codebase's `AppContext::commit` shape —
//! a single async method that walks a numbered flow and maps every
//! sub-crate's error into one boundary type via `#[from]`.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tokio::time::{timeout, Duration};

use vigil_context::{CardHistory, ContextBuilder, TransactionSnapshot, ValidationContext};
use vigil_control::{AutoProcessor, Resettable};
use vigil_core::{
    alert_types_to_csv, AlertId, AlertStatus, CardId, DeviceId, FraudAlert, Money,
    Transaction, TransactionCandidate, TransactionId, TransactionResponse, TrainingRow,
};
use vigil_ledger::LedgerError;
use vigil_oracle::GeoLocation;
use vigil_review::{FraudStatusResult, ReviewWorkflow};
use vigil_rules::{check_card_active, evaluate_all, RuleInputs};
use vigil_scoring::score_and_decide;

use crate::context::AppContext;
use crate::dto::{AlertFilter, ManualTransactionRequest, Page};
use crate::error::ApiError;

/// Resolved candidate inputs, before geo/IP collaborators have run.
struct ResolvedInput {
    card_id: CardId,
    device_id: DeviceId,
    amount: Money,
    merchant_category: String,
    ip_address: String,
    latitude: f64,
    longitude: f64,
}

pub struct Orchestrator {
    ctx: Arc<AppContext>,
}

impl Orchestrator {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// §4.5's nine-step contract. `manual` selects between a caller-supplied
    /// `input` and an auto-selected eligible `(card, device)` pair;
    /// `success_force` is the operator override consumed at step 6.
    pub async fn process(
        &self,
        manual: bool,
        success_force: bool,
        input: Option<ManualTransactionRequest>,
    ) -> Result<TransactionResponse, ApiError> {
        let deadline = Duration::from_millis(self.ctx.config.default_deadline_ms);
        let now = self.ctx.clock.now();

        // Step 1: resolve inputs.
        let resolved = if manual {
            let req = input.ok_or_else(|| ApiError::Validation("manual transaction requires a request body".into()))?;
            ResolvedInput {
                card_id: req.card_id,
                device_id: req.device_id,
                amount: req.amount,
                merchant_category: req.merchant_category,
                ip_address: req.ip_address,
                latitude: req.latitude,
                longitude: req.longitude,
            }
        } else {
            self.pick_auto_candidate()?
        };

        if !self.ctx.ledger.is_linked(&resolved.card_id, &resolved.device_id) {
            return Err(LedgerError::DeviceNotLinked { card: resolved.card_id, device: resolved.device_id }.into());
        }

        // Step 2: build candidate. Geo resolution and IP reputation are
        // collaborator calls that must resolve before rule evaluation, since
        // rules themselves may not do I/O (§5).
        let device = self.ctx.ledger.get_device(&resolved.device_id)?;
        let geo = self.resolve_geo(&resolved.ip_address, resolved.latitude, resolved.longitude).await;
        let ip_is_blocklisted = self.check_ip_reputation(&resolved.ip_address).await;

        let candidate = TransactionCandidate {
            id: TransactionId::new(),
            card_id: resolved.card_id,
            device_id: resolved.device_id,
            device_fingerprint_snapshot: device.fingerprint,
            merchant_category: resolved.merchant_category,
            amount: resolved.amount,
            timestamp: now,
            latitude: resolved.latitude,
            longitude: resolved.longitude,
            country_code: geo.country_code,
            state: geo.state,
            city: geo.city,
            ip_address: resolved.ip_address,
        };

        // The version observed here is presented back to `commit` at step 7;
        // the gap between this read and that write is what the optimistic
        // guard polices.
        let expected_version = self.ctx.ledger.card_version(&resolved.card_id)?;

        // Step 3: load the validation context, under the deadline.
        let validation_ctx = timeout(deadline, self.build_context(resolved.card_id, resolved.device_id))
            .await
            .map_err(|_| ApiError::Timeout)??;

        // Step 4: non-ACTIVE cards short-circuit before any rule runs.
        check_card_active(&validation_ctx)?;

        // Step 5: evaluate all rules in catalog order.
        let anomaly_model_triggered = self
            .ctx
            .anomaly_oracle
            .flag(&candidate, &validation_ctx)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "anomaly oracle unavailable, treating ANOMALY_MODEL_TRIGGERED as non-firing");
                false
            });

        let inputs = RuleInputs {
            ip_is_blocklisted,
            anomaly_model_triggered,
            high_risk_countries: self.ctx.config.high_risk_countries.clone(),
            now,
        };
        let fired = evaluate_all(&candidate, &validation_ctx, &inputs);

        // Step 6: score + decide.
        let outcome = score_and_decide(
            &fired,
            candidate.amount.value(),
            validation_ctx.card.remaining_limit.value(),
            success_force,
        );

        // Step 7: commit under a single atomic boundary, under the deadline.
        // `Ledger::commit` may block on its retry backoff, so it runs on the
        // blocking pool rather than the async worker that is driving this call.
        let ledger = self.ctx.ledger.clone();
        let config = self.ctx.config.clone();
        let commit_candidate = candidate.clone();
        let fired_for_commit = fired.clone();
        let commit_outcome = timeout(
            deadline,
            tokio::task::spawn_blocking(move || {
                ledger.commit(
                    commit_candidate,
                    expected_version,
                    &fired_for_commit,
                    outcome.decision,
                    outcome.total_score,
                    outcome.severity,
                    outcome.fraud_probability,
                    &config,
                    now,
                )
            }),
        )
        .await
        .map_err(|_| ApiError::Timeout)?
        .expect("commit task panicked")?;

        self.ctx
            .history
            .lock()
            .unwrap()
            .record(resolved.card_id, TransactionSnapshot::from(&commit_outcome.transaction));

        // Training row is written for every evaluated transaction, never for
        // a reimbursement (§9 open question 3 — reimbursements never reach
        // this code path at all).
        let row = TrainingRow::build(commit_outcome.transaction.id, &fired, outcome.total_score, outcome.decision, now);
        self.ctx.training.lock().unwrap().append(&row)?;

        let message = if fired.is_empty() {
            "approved".to_string()
        } else {
            format!("{} rule(s) fired: {}", fired.len(), alert_types_to_csv(&fired))
        };

        let response = TransactionResponse {
            transaction_id: commit_outcome.transaction.id,
            card_id: resolved.card_id,
            amount: commit_outcome.transaction.amount,
            decision: outcome.decision,
            is_fraud: outcome.decision.is_fraud(),
            is_reimbursement: false,
            alert_types: fired,
            risk_score: outcome.total_score,
            severity: outcome.severity,
            fraud_probability: outcome.fraud_probability,
            message,
            timestamp: now,
        };

        // Step 8: publish, best-effort, after the commit already succeeded.
        self.ctx.bus.publish(response.clone()).await;

        // Step 9: return the response DTO.
        Ok(response)
    }

    async fn build_context(&self, card_id: CardId, device_id: DeviceId) -> Result<ValidationContext, ApiError> {
        let history = self.ctx.history.lock().unwrap();
        let builder = ContextBuilder::new(self.ctx.ledger.as_ref(), self.ctx.ledger.as_ref(), &history);
        Ok(builder.build(card_id, device_id)?)
    }

    async fn resolve_geo(&self, ip: &str, latitude: f64, longitude: f64) -> GeoLocation {
        match self.ctx.geo_resolver.resolve(ip, latitude, longitude).await {
            Ok(location) => location,
            Err(err) => {
                tracing::warn!(ip, error = %err, "geo resolver unavailable, candidate will carry an empty location");
                GeoLocation { country_code: String::new(), state: String::new(), city: String::new() }
            }
        }
    }

    async fn check_ip_reputation(&self, ip: &str) -> bool {
        self.ctx.ip_reputation.is_anonymizing(ip).await.unwrap_or_else(|err| {
            tracing::warn!(ip, error = %err, "ip reputation lookup unavailable, treating as clean");
            false
        })
    }

    /// Auto mode (§4.5 step 1): pick a random linked `(card, device)` pair
    /// and a plausible amount. This is simulator-only behavior, same as the
    /// scheduler that drives it (§4.8) — a real deployment never synthesizes
    /// its own transactions.
    fn pick_auto_candidate(&self) -> Result<ResolvedInput, ApiError> {
        let links = self.ctx.ledger.all_links();
        if links.is_empty() {
            return Err(ApiError::NoEligibleCandidate);
        }
        let (card_id, device_id) = links[rand::thread_rng().gen_range(0..links.len())];
        let card = self.ctx.ledger.get_card(&card_id)?;

        Ok(ResolvedInput {
            card_id,
            device_id,
            amount: Money::new(auto_amount(card.remaining_limit.value())),
            merchant_category: "GENERAL".to_string(),
            ip_address: "0.0.0.0".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        })
    }

    pub fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, ApiError> {
        Ok(self.ctx.ledger.get_transaction(id)?)
    }

    pub fn search_alerts(&self, filter: AlertFilter) -> Page<FraudAlert> {
        let mut alerts = self.ctx.ledger.all_alerts();
        if let Some(card_id) = filter.card_id {
            alerts.retain(|a| a.card_id == card_id);
        }
        if let Some(status) = filter.status {
            alerts.retain(|a| a.status == status);
        }
        if let Some(min_severity) = filter.min_severity {
            alerts.retain(|a| a.severity >= min_severity);
        }
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let size = if filter.size == 0 { 20 } else { filter.size };
        Page::paginate(alerts, filter.page, size)
    }

    /// §4.6's `classify` operation.
    pub fn classify(&self, alert_id: AlertId, new_status: AlertStatus) -> Result<FraudStatusResult, ApiError> {
        let now = self.ctx.clock.now();
        let workflow = ReviewWorkflow::new(self.ctx.ledger.as_ref());
        Ok(workflow.classify(alert_id, new_status, now)?)
    }

    pub fn pause(&self) {
        self.ctx.pause_gate.pause();
    }

    pub fn resume(&self) {
        self.ctx.pause_gate.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.pause_gate.is_paused()
    }

    /// C9: training rows first (no foreign key back to cards/devices), then
    /// the ledger's own ordered truncation; the in-memory history cache is
    /// simply replaced, since it is a derived cache rather than a table.
    pub fn reset_all(&self) -> Result<(), ApiError> {
        self.ctx.training.lock().unwrap().clear_all()?;
        self.ctx.ledger.reset_all();
        *self.ctx.history.lock().unwrap() = CardHistory::new();
        Ok(())
    }
}

/// A plausible auto-generated amount: 1%-50% of whatever limit remains,
/// rounded to cents. Zero remaining limit always yields zero.
fn auto_amount(remaining_limit: Decimal) -> Decimal {
    if remaining_limit <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let fraction = Decimal::new(rand::thread_rng().gen_range(1..=50), 2);
    (remaining_limit * fraction).round_dp(2)
}

#[async_trait]
impl AutoProcessor for Orchestrator {
    async fn process_auto(&self) -> anyhow::Result<()> {
        self.process(false, false, None).await?;
        Ok(())
    }
}

#[async_trait]
impl Resettable for Orchestrator {
    async fn reset_all(&self) -> anyhow::Result<()> {
        Orchestrator::reset_all(self)?;
        Ok(())
    }
}
