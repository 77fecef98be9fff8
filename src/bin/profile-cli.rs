use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use verified_profile::config::load_or_default;
use verified_profile::lifecycle::initialize;
use verified_profile::observability::init_logging;
use verified_profile::profile::view::{NOT_FOUND_HINT, NOT_FOUND_TITLE};
use verified_profile::profile::{ProfilePage, ProfileState};
use verified_profile::withdraw::{WithdrawOutcome, WithdrawPage, WithdrawView};

#[derive(Parser)]
#[command(name = "profile-cli")]
#[command(about = "Terminal front end for verified profiles", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "VP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a public verified profile
    Profile {
        /// Profile id (the profile contract address)
        id: String,
        /// Also print the Twitter verification credential
        #[arg(long)]
        twitter_cred: bool,
        /// Also print the domain name verification credential
        #[arg(long)]
        domain_cred: bool,
    },
    /// Show the balances held by a profile contract
    Balances {
        #[arg(long)]
        profile_addr: Option<Address>,
    },
    /// Withdraw one token from the profile contract to the connected wallet
    Withdraw {
        /// Token symbol, e.g. MATIC, DAI or USDC
        symbol: String,
        #[arg(long)]
        profile_addr: Option<Address>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    let ttl = Duration::from_secs(config.ui.notification_secs);
    let frontend = initialize(config).await?;

    match cli.command {
        Commands::Profile {
            id,
            twitter_cred,
            domain_cred,
        } => {
            let mut page = ProfilePage::new(id, ttl);
            page.load(&frontend.profiles).await;
            if twitter_cred {
                page.toggle_twitter();
            }
            if domain_cred {
                page.toggle_domain();
            }
            print_profile(&page)?;
        }
        Commands::Balances { profile_addr } => {
            let page = &frontend.withdraw;
            select_profile(page, profile_addr);
            let _ = page.fetch_balances().await;
            print_withdraw(&page.view());
        }
        Commands::Withdraw {
            symbol,
            profile_addr,
        } => {
            let page = &frontend.withdraw;
            select_profile(page, profile_addr);
            let _ = page.fetch_balances().await;
            print_withdraw(&page.view());

            println!("\nWithdrawing {}...", symbol.to_ascii_uppercase());
            match page.withdraw(&symbol).await {
                Ok(WithdrawOutcome::Confirmed { block_number }) => {
                    println!("Confirmed in block {}", block_number);
                }
                Ok(WithdrawOutcome::Failed { .. }) => {}
                Err(e) => eprintln!("Error: {}", e),
            }
            print_withdraw(&page.view());
        }
    }

    Ok(())
}

fn select_profile(page: &WithdrawPage, profile_addr: Option<Address>) {
    if profile_addr.is_some() {
        page.set_profile_addr(profile_addr);
    }
}

fn print_profile(page: &ProfilePage) -> Result<(), Box<dyn std::error::Error>> {
    let view = match page.state() {
        ProfileState::Found(view) => view,
        ProfileState::Loading | ProfileState::NotFound => {
            println!("{}", NOT_FOUND_TITLE);
            println!("{}", NOT_FOUND_HINT);
            return Ok(());
        }
    };

    println!("{}", view.display_name);
    if !view.username.is_empty() {
        println!("{}", view.username);
    }
    println!("Profile Addr: {}", view.short_addr);
    if let Some(twitter) = &view.twitter {
        println!("Twitter Handle: {} <{}>", twitter.link.label, twitter.link.href);
    }
    if let Some(domain) = &view.domain {
        println!("Domain Name: {} <{}>", domain.link.label, domain.link.href);
    }

    for panel in page.visible_credentials() {
        println!("\n{} ({})", panel.kind.title(), panel.subject);
        match panel.credential {
            Some(credential) => println!("{}", serde_json::to_string_pretty(credential)?),
            None => println!("(no credential)"),
        }
    }
    Ok(())
}

fn print_withdraw(view: &WithdrawView) {
    println!(
        "Verified Profile Contract Address: {}",
        view.profile_addr.as_deref().unwrap_or("-")
    );
    println!("Wallet: {}", view.wallet.as_deref().unwrap_or("not connected"));
    println!("{:<8} {:<18} {:>28}  Action", "Token", "Name", "Balance");
    for row in &view.tokens {
        let balance = row
            .balance
            .as_ref()
            .map(|b| format!("{} {}", b, row.symbol))
            .unwrap_or_else(|| "-".to_string());
        let action = if row.withdrawing {
            "withdrawing"
        } else if row.can_withdraw {
            "withdraw"
        } else {
            "disabled"
        };
        println!("{:<8} {:<18} {:>28}  {}", row.symbol, row.name, balance, action);
    }
    if let Some(success) = &view.success {
        println!("{}", success);
    }
    if let Some(error) = &view.error {
        eprintln!("{}", error);
    }
}
