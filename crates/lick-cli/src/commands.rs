use anyhow::Context;
use colored::Colorize;
use lick_contract::{ContractConfig, LickContract};
use lick_types::{Address, ArtworkId, Timestamp};
use tracing::info;

use crate::cli::*;
use crate::scenario::{Scenario, ScenarioReport, StepResult, DEMO_SCENARIO};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, &cli.format),
        Command::Seed(args) => cmd_seed(args, &cli.format),
        Command::Demo(_) => cmd_demo(&cli.format),
    }
}

fn cmd_run(args: RunArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.path)?;
    info!(path = %args.path.display(), steps = scenario.operations.len(), "running scenario");
    let report = scenario.run()?;
    print_report(&report, format)?;
    if args.strict && report.rejected() > 0 {
        anyhow::bail!("{} operation(s) rejected", report.rejected());
    }
    Ok(())
}

fn cmd_demo(format: &OutputFormat) -> anyhow::Result<()> {
    let report = Scenario::from_toml_str(DEMO_SCENARIO)?.run()?;
    print_report(&report, format)
}

fn cmd_seed(args: SeedArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ContractConfig::load(path)?,
        None => {
            let admin = args
                .admin
                .clone()
                .unwrap_or_else(|| Address::test_account("Admin"));
            ContractConfig::new(admin).with_artworks(default_artworks(&args.prefix, args.count))
        }
    };

    let contract =
        LickContract::originate(&config, Timestamp::now()).context("seeding artworks")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&contract.snapshot()?)?);
        }
        OutputFormat::Text => {
            println!("Admin: {}", contract.admin().to_string().cyan());
            for receipt in contract.journal().receipts() {
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    format!("#{}", receipt.seq).dimmed(),
                    receipt.kind
                );
            }
            println!(
                "{} {} artwork(s) registered",
                "✓".green().bold(),
                contract.artworks()?.len()
            );
        }
    }
    Ok(())
}

/// `prefix1` through `prefixN`.
fn default_artworks(prefix: &str, count: usize) -> Vec<ArtworkId> {
    (1..=count)
        .map(|n| ArtworkId::new(format!("{prefix}{n}")))
        .collect()
}

fn print_report(report: &ScenarioReport, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }
        OutputFormat::Text => {}
    }

    for outcome in &report.outcomes {
        let index = format!("{:>3}.", outcome.index).dimmed();
        match &outcome.result {
            StepResult::Rejected { error } => {
                println!("{index} {} {}", "✗".red().bold(), outcome.description);
                println!("       {}", error.red());
            }
            result => {
                println!("{index} {} {}", "✓".green(), outcome.description);
                print_result(result);
            }
        }
    }

    println!();
    println!("Admin: {}", report.state.admin.to_string().cyan());
    println!(
        "Balance: {}  (received {})",
        report.state.balance.to_string().bold(),
        report.state.total_received
    );
    for (artwork, records) in &report.state.artworks {
        println!("{} ({} record(s))", artwork.to_string().yellow().bold(), records.len());
        for record in records {
            println!("    {record}");
        }
    }
    for transfer in &report.transfers {
        println!("Sent {} to {}", transfer.amount, transfer.to);
    }

    let valid = report.validation.iter().all(|r| r.is_valid());
    println!(
        "Ledgers: {}  Conservation: {}",
        if valid { "valid".green() } else { "invalid".red() },
        if report.conserved { "holds".green() } else { "broken".red() }
    );
    Ok(())
}

fn print_result(result: &StepResult) {
    match result {
        StepResult::Paid { pending, finalized } => {
            if let Some(pending) = pending {
                println!("       pending {pending}, {finalized} finalized");
            }
        }
        StepResult::AdminRotated { admin } => println!("       admin is now {}", admin.to_string().cyan()),
        StepResult::Withdrawn { amount } => println!("       sent {amount}"),
        StepResult::Viewed { records } => {
            for record in records {
                println!("       {record}");
            }
        }
        StepResult::Registered | StepResult::Rejected { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_artworks_are_numbered_from_one() {
        let ids = default_artworks("artwork_", 3);
        assert_eq!(
            ids,
            vec![
                ArtworkId::new("artwork_1"),
                ArtworkId::new("artwork_2"),
                ArtworkId::new("artwork_3"),
            ]
        );
        assert!(default_artworks("x", 0).is_empty());
    }

    #[test]
    fn strict_run_fails_on_rejection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"admin = \"Admin\"\n[[operations]]\nop = \"withdraw\"\nsender = \"Buyer\"\n",
        )
        .unwrap();

        let lenient = RunArgs { path: file.path().to_path_buf(), strict: false };
        assert!(cmd_run(lenient, &OutputFormat::Json).is_ok());

        let strict = RunArgs { path: file.path().to_path_buf(), strict: true };
        assert!(cmd_run(strict, &OutputFormat::Text).is_err());
    }

    #[test]
    fn seed_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"admin = \"tz1boss\"\nartworks = [\"a\", \"b\"]\n")
            .unwrap();
        let args = SeedArgs {
            config: Some(file.path().to_path_buf()),
            admin: None,
            count: 10,
            prefix: "artwork_".into(),
        };
        assert!(cmd_seed(args, &OutputFormat::Json).is_ok());
    }

    #[test]
    fn demo_runs() {
        assert!(cmd_demo(&OutputFormat::Text).is_ok());
    }
}
