use clap::Parser;
use msgbench::cli::{self, Cli, Command};
use msgbench::{Config, MessageClient, Report, Result, Scenario, ScenarioRunner, seed};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli::effective_config(&cli.global) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute(&cli.command, &config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn execute(command: &Command, config: &Config) -> Result<()> {
    let client = MessageClient::new(config)?;

    match command {
        Command::Run => {
            let runner = ScenarioRunner::new(client, config.workers);
            let results = runner.run_suite(&Scenario::standard_suite()).await?;

            for result in &results {
                println!(
                    "{} Average Roundtrip Time: {:.4} seconds",
                    result.name, result.average_secs
                );
            }

            let report = Report::from_results(&results);
            println!("Overall Average Roundtrip Time: {:.4} seconds", report.overall());
            report.write_to(&config.report_path)?;
            println!();
            print!("{}", report.render());
        }
        Command::Seed { count } => {
            let latencies = seed::seed(&client, *count).await?;
            println!(
                "Posted {} messages, average {:.4} seconds",
                latencies.len(),
                latencies.mean_secs().unwrap_or(0.0)
            );
        }
        Command::List { offset } => {
            let messages = seed::list(&client, *offset).await?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::Count => {
            let count = client.get_count().await?;
            println!("{}", count.value.count);
        }
    }

    Ok(())
}
