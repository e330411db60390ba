//! Alert-list aggregation into a total score, severity, and decision (§4.4).

use rust_decimal::Decimal;
use vigil_core::{AlertKind, Decision, Severity};

/// The aggregate result of scoring one catalog pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringOutcome {
    pub total_score: u32,
    pub severity: Severity,
    pub fraud_probability: u8,
    pub decision: Decision,
}

fn severity_for_score(score: u32) -> Severity {
    if score >= 75 {
        Severity::Critical
    } else if score >= 50 {
        Severity::High
    } else if score >= 25 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Aggregates a fired-alert list into a [`ScoringOutcome`].
///
/// `amount`/`remaining_limit` are needed only to resolve the
/// `CREDIT_LIMIT_REACHED`-without-`LIMIT_EXCEEDED` edge of the decision rule
/// (§4.4's second bullet): `CREDIT_LIMIT_REACHED` alone can fire on an
/// amount that does *not* exceed the remaining limit (e.g. exactly equal to
/// it), which must not force `BLOCKED` the way an actual overage does.
///
/// `success_force` is the operator override (§4.4's first bullet). The
/// caller is assumed to have already confirmed the card is `ACTIVE` — a
/// non-active card short-circuits in `vigil-rules` before scoring ever
/// runs, so this function does not re-check card status.
pub fn score_and_decide(
    fired: &[AlertKind],
    amount: Decimal,
    remaining_limit: Decimal,
    success_force: bool,
) -> ScoringOutcome {
    let total_score = fired.iter().map(|a| a.weight()).sum::<u32>().min(100);
    let severity = severity_for_score(total_score);

    let limit_exceeded_fired = fired.contains(&AlertKind::LimitExceeded);
    let credit_limit_reached_over = fired.contains(&AlertKind::CreditLimitReached) && amount > remaining_limit;

    let decision = if success_force && !limit_exceeded_fired {
        Decision::Approved
    } else if limit_exceeded_fired || credit_limit_reached_over {
        Decision::Blocked
    } else if total_score >= 70 {
        Decision::Blocked
    } else if total_score >= 40 {
        Decision::Review
    } else {
        Decision::Approved
    };

    ScoringOutcome {
        total_score,
        severity,
        fraud_probability: total_score as u8,
        decision,
    }
}
