//! EduBrew sponsorship client.
//!
//! A terminal client for the deployed sponsorship contract: submit a small
//! payment with a name and message, list past sponsorships, or stream new
//! ones live.
//!
//! ```text
//! edubrew-client list [--json]
//! edubrew-client send --name "Ada" --message "keep going"
//! edubrew-client watch
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use edubrew_client::config::load_config_or_default;
use edubrew_client::gateway::{ContractGateway, Sponsorship, SponsorshipGateway, TxOutcome};
use edubrew_client::notify::LogNotifier;
use edubrew_client::observability::logging;
use edubrew_client::view::SponsorshipView;
use edubrew_client::wallet::{EnvKeyProvider, WalletProvider};

#[derive(Parser)]
#[command(name = "edubrew-client")]
#[command(about = "Client for the EduBrew sponsorship contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "edubrew.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the recorded sponsorships
    List {
        /// Emit JSON instead of a human-readable listing
        #[arg(long)]
        json: bool,
    },
    /// Submit one sponsorship with the configured payment attached
    Send {
        /// Supporter name (blank falls back to "Anonymous")
        #[arg(long)]
        name: Option<String>,
        /// Supportive message (blank falls back to "No Message")
        #[arg(long)]
        message: Option<String>,
    },
    /// Print history, then stream new sponsorships until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config)?;

    tracing::info!(
        rpc_url = %config.gateway.rpc_url,
        contract = %config.gateway.contract_address,
        "Configuration loaded"
    );

    match cli.command {
        Commands::List { json } => {
            let gateway = ContractGateway::connect(&config, None).await?;
            let sponsorships = gateway.sponsorships().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sponsorships)?);
            } else {
                for sponsorship in &sponsorships {
                    print_sponsorship(sponsorship);
                }
            }
        }

        Commands::Send { name, message } => {
            let wallet = EnvKeyProvider::new();
            // Authorize up front so the gateway can sign.
            wallet.request_accounts().await?;
            let gateway = ContractGateway::connect(&config, wallet.signer()).await?;

            let mut view = SponsorshipView::mount(gateway, wallet, LogNotifier).await;
            if let Some(name) = name {
                view.set_draft_name(name);
            }
            if let Some(message) = message {
                view.set_draft_message(message);
            }

            let outcome = view.submit().await;
            view.unmount();

            if !matches!(outcome, Some(TxOutcome::Confirmed { .. })) {
                std::process::exit(1);
            }
        }

        Commands::Watch => {
            let wallet = EnvKeyProvider::new();
            // Watching works read-only; a missing key is not an error here.
            let _ = wallet.request_accounts().await;
            let gateway = ContractGateway::connect(&config, wallet.signer()).await?;

            let mut view = SponsorshipView::mount(gateway, wallet, LogNotifier).await;
            for sponsorship in view.state().sponsorships() {
                print_sponsorship(sponsorship);
            }

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = view.next_event() => match event {
                        Some(sponsorship) => print_sponsorship(&sponsorship),
                        None => break,
                    },
                }
            }

            view.unmount();
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

fn print_sponsorship(sponsorship: &Sponsorship) {
    println!(
        "{}  {}  {}\n    {}",
        sponsorship.timestamp.to_rfc3339(),
        sponsorship.address,
        sponsorship.name,
        sponsorship.message
    );
}
