use campay_collect::application::initiator::Initiation;
use campay_collect::application::poller::{PollConfig, PollInterrupted, TerminalOutcome};
use campay_collect::application::workflow::CollectionWorkflow;
use campay_collect::config::GatewayConfig;
use campay_collect::domain::ports::PaymentGatewayRef;
use campay_collect::infrastructure::campay::CampayGateway;
use campay_collect::infrastructure::in_memory::ScriptedGateway;
use campay_collect::interfaces::console::{PaymentInput, Prompter};
use clap::Parser;
use dotenv::dotenv;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use pretty_env_logger::env_logger::{Builder, Env};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Exit code used when polling is interrupted with Ctrl-C.
const INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payer phone number, with country code. Prompted for when omitted.
    #[arg(long)]
    phone: Option<String>,

    /// Amount to debit, in XAF. Prompted for when omitted.
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,

    /// Description shown to the payer. Prompted for when omitted.
    #[arg(long)]
    description: Option<String>,

    /// Number of status queries before giving up (overrides POLL_MAX_ATTEMPTS).
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Seconds between status queries (overrides POLL_INTERVAL_SECS).
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Run the whole flow against a simulated gateway. No API key or network needed.
    #[arg(long)]
    dry_run: bool,
}

fn announce(initiation: &Initiation) {
    println!("Payment request sent. Waiting for user confirmation...");
    if let Some(ussd_code) = initiation.ussd_code.as_deref().filter(|c| !c.is_empty()) {
        let operator = initiation.operator.as_deref().unwrap_or("mobile money");
        println!("If no prompt appears, dial {ussd_code} ({operator}) to confirm.");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();

    let logger_env = Env::default().default_filter_or("info");
    Builder::from_env(logger_env).init();

    let cli = Cli::parse();

    let mut poll = PollConfig::from_env().into_diagnostic()?;
    if let Some(max_attempts) = cli.max_attempts {
        poll.max_attempts = max_attempts;
    }
    if let Some(secs) = cli.interval_secs {
        poll.interval = Duration::from_secs(secs);
    }
    log::debug!("Polling with {poll:?}");

    let gateway_config = if cli.dry_run {
        None
    } else {
        let config = GatewayConfig::from_env().into_diagnostic()?;
        log::debug!("Loaded gateway configuration: {config:?}");
        Some(config)
    };

    let known = PaymentInput {
        phone: cli.phone,
        amount: cli.amount,
        description: cli.description,
    };
    let stdin = io::stdin();
    let request = Prompter::new(stdin.lock(), io::stdout())
        .payment_request(known)
        .into_diagnostic()
        .wrap_err("Invalid input")?;

    let gateway: PaymentGatewayRef = match gateway_config {
        Some(config) => Arc::new(CampayGateway::new(&config).into_diagnostic()?),
        None => {
            log::info!("Dry run: no request leaves this machine");
            Arc::new(ScriptedGateway::dry_run(&request))
        }
    };
    let workflow = CollectionWorkflow::new(gateway, poll);

    let shutdown = async {
        // Without a signal handler, polling simply cannot be interrupted.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let (initiation, outcome) = workflow
        .run_until(&request, shutdown, announce)
        .await
        .into_diagnostic()
        .wrap_err("Payment initiation failed")?;

    match outcome {
        Ok(TerminalOutcome::Successful { snapshot, .. }) => {
            println!("\nTRANSACTION SUCCESSFUL\n{snapshot}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(TerminalOutcome::Failed { reason, .. }) => Err(miette!("TRANSACTION FAILED: {}", reason)),
        Ok(TerminalOutcome::TimedOut { report }) => {
            println!(
                "\nTRANSACTION TIMED OUT: no final status after {} attempts. Reference {} may still complete.",
                report.attempts, initiation.reference
            );
            if report.transient_errors > 0 {
                println!(
                    "{} status queries could not be completed.",
                    report.transient_errors
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(PollInterrupted { report }) => {
            println!(
                "\nINTERRUPTED after {} status queries. Reference: {}",
                report.attempts, initiation.reference
            );
            Ok(ExitCode::from(INTERRUPTED))
        }
    }
}
