//! Vigil CLI - Main entry point. Stands in for the HTTP surface described
//! in §6: every subcommand maps 1:1 to an operation the spec's endpoint
//! table lists (DESIGN.md's Open Question 5).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use vigil_api::{commands, AppContext, Orchestrator};
use vigil_control::Scheduler;
use vigil_core::{AlertId, AlertStatus, CardId, DeviceId, Severity, TransactionId};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil - real-time card-transaction fraud scoring", long_about = None)]
struct Cli {
    /// Data directory (training-row JSONL output lives under here)
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one transaction through the pipeline (auto mode by default)
    Process {
        /// Evaluate a caller-supplied transaction instead of an auto-picked one
        #[arg(long)]
        manual: bool,
        /// Operator override: force APPROVED unless LIMIT_EXCEEDED fired
        #[arg(long)]
        success_force: bool,
        #[arg(long)]
        card: Option<CardId>,
        #[arg(long)]
        device: Option<DeviceId>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        merchant_category: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lon: Option<f64>,
    },

    /// Look up a committed transaction by id
    GetTransaction { transaction_id: TransactionId },

    /// Search fraud alerts
    SearchAlerts {
        #[arg(long)]
        card: Option<CardId>,
        #[arg(long)]
        status: Option<AlertStatus>,
        #[arg(long)]
        min_severity: Option<Severity>,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = 20)]
        size: usize,
    },

    /// Classify an alert (triggers reimbursement on FALSE_POSITIVE)
    Classify {
        alert_id: AlertId,
        status: AlertStatus,
    },

    /// Pause automatic transaction generation
    Pause,
    /// Resume automatic transaction generation
    Resume,
    /// Report whether auto-processing is paused
    Status,

    /// Truncate every table (cards, devices, links, transactions, alerts, training rows)
    Reset,

    /// Seed a card with a linked device, for manual testing
    Seed {
        #[arg(long, default_value = "Jane Doe")]
        holder_name: String,
        #[arg(long, default_value = "1000")]
        credit_limit: Decimal,
    },

    /// Link an already-seeded card to an already-seeded device
    Link { card: CardId, device: DeviceId },

    /// Run the scheduler in the foreground, ticking auto-mode transactions
    /// until interrupted (§4.8)
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = Arc::new(AppContext::new(&cli.data).await?);
    let orchestrator = Orchestrator::new(ctx.clone());

    match cli.command {
        Commands::Process { manual, success_force, card, device, amount, merchant_category, ip, lat, lon } => {
            commands::process(&orchestrator, manual, success_force, card, device, amount, merchant_category, ip, lat, lon).await?;
        }

        Commands::GetTransaction { transaction_id } => {
            commands::get_transaction(&orchestrator, transaction_id).await?;
        }

        Commands::SearchAlerts { card, status, min_severity, page, size } => {
            commands::search_alerts(&orchestrator, card, status, min_severity, page, size).await?;
        }

        Commands::Classify { alert_id, status } => {
            commands::classify(&orchestrator, alert_id, status).await?;
        }

        Commands::Pause => commands::pause(&orchestrator),
        Commands::Resume => commands::resume(&orchestrator),
        Commands::Status => commands::status(&orchestrator),

        Commands::Reset => {
            commands::reset(&orchestrator).await?;
        }

        Commands::Seed { holder_name, credit_limit } => {
            commands::seed(&ctx.ledger, &holder_name, credit_limit)?;
        }

        Commands::Link { card, device } => {
            commands::link(&ctx.ledger, card, device);
        }

        Commands::Serve => {
            println!("starting scheduler: tick={}s workers={}", ctx.config.scheduler_tick_seconds, ctx.config.scheduler_workers);
            let scheduler = Scheduler::new(
                Arc::new(orchestrator),
                ctx.pause_gate.clone(),
                ctx.config.scheduler_tick_seconds,
                ctx.config.scheduler_workers,
            );
            let daily_reset = vigil_control::DailyReset::new(Orchestrator::new(ctx.clone()));

            let scheduler_handle = scheduler.spawn();
            let reset_handle = daily_reset.spawn();
            tokio::select! {
                _ = scheduler_handle => {}
                _ = reset_handle => {}
            }
        }
    }

    Ok(())
}
