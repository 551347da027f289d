use clap::Parser;
use grouper_client::config::cli::Command;
use grouper_client::utils::error::ErrorSeverity;
use grouper_client::utils::{logger, validation::Validate};
use grouper_client::{BatchedMembershipClient, CliArgs, GrouperError};

async fn run(args: &CliArgs) -> Result<(), GrouperError> {
    let config = args.to_grouper_config()?;
    if args.verbose {
        tracing::debug!("Client config: {:?}", config);
    }

    let client = BatchedMembershipClient::from_config(&config)?;
    let group = args.command.group();

    match &args.command {
        Command::Add { replace, .. } => {
            let subject_ids = args.command.subject_ids()?;
            client.add_users_to_group(&subject_ids, group, *replace).await?;
            println!("✅ Added {} subject(s) to {}", subject_ids.len(), group);
        }
        Command::Remove { .. } => {
            let subject_ids = args.command.subject_ids()?;
            client.remove_users_from_group(&subject_ids, group).await?;
            println!("✅ Removed {} subject(s) from {}", subject_ids.len(), group);
        }
        Command::List { .. } => {
            for member in client.get_members(group).await? {
                println!("{}", member);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting grouper CLI");

    if let Err(e) = args.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args).await {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            args.command.group(),
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
