use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{DateSelect, Text};
use weatherdash_core::{Config, DashboardClient, StdoutNotifier, TemperatureLookup};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard CLI")]
pub struct Cli {
    /// Backend base URL, overriding the configured one.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up the average temperature for a city on a date.
    Lookup {
        /// City name; prompted for when absent.
        city: Option<String>,

        /// Date in YYYY-MM-DD format; prompted for when absent.
        #[arg(long)]
        date: Option<String>,
    },

    /// Check that the backend is up.
    Health,

    /// Drive and inspect the backend's ETL pipeline.
    Etl {
        #[command(subcommand)]
        action: EtlAction,
    },

    /// Store the backend base URL.
    Configure {
        /// Base URL; prompted for when absent.
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EtlAction {
    /// Start an ETL run.
    Run,

    /// Show the latest ETL log lines.
    Status,

    /// Show a sample of the cleaned data.
    Data,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { base_url, command } = self;

        match command {
            Command::Lookup { city, date } => {
                let client = backend_client(base_url)?;
                run_lookup(&client, city, date).await
            }
            Command::Health => {
                let client = backend_client(base_url)?;
                run_health(&client).await
            }
            Command::Etl { action } => {
                let client = backend_client(base_url)?;
                run_etl(&client, action).await
            }
            Command::Configure { url } => run_configure(url),
        }
    }
}

fn backend_client(base_url: Option<String>) -> anyhow::Result<DashboardClient> {
    let base_url = match base_url {
        Some(url) => url,
        None => Config::load()?.base_url_or_default().to_string(),
    };

    Ok(DashboardClient::new(base_url))
}

async fn run_lookup(
    client: &DashboardClient,
    city: Option<String>,
    date: Option<String>,
) -> anyhow::Result<()> {
    let city = match city {
        Some(city) => city,
        None => Text::new("City:").prompt()?,
    };

    let date = match date {
        Some(date) => date,
        None => {
            let picked: NaiveDate = DateSelect::new("Date:").prompt()?;
            picked.format("%Y-%m-%d").to_string()
        }
    };

    let notifier = StdoutNotifier;
    let lookup = TemperatureLookup::new(client, &notifier);

    // The lookup already printed the outcome, only the exit code is left.
    if lookup.run(&city, &date).await.is_err() {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_health(client: &DashboardClient) -> anyhow::Result<()> {
    let report = client.health().await?;

    println!("{}: {}", report.status, report.message);
    Ok(())
}

async fn run_etl(client: &DashboardClient, action: EtlAction) -> anyhow::Result<()> {
    match action {
        EtlAction::Run => {
            let ack = client.trigger_etl().await?;
            println!("{}", ack.message);
        }
        EtlAction::Status => {
            let status = client.etl_status().await?;
            for line in &status.status {
                // Log lines arrive with their trailing newline still attached.
                println!("{}", line.trim_end());
            }
        }
        EtlAction::Data => {
            let rows = client.cleaned_sample().await?;
            if rows.is_empty() {
                println!("No cleaned data yet. Try `weatherdash etl run` first.");
                return Ok(());
            }

            println!("{:<20} {:<12} {:>8}  {}", "City", "Date", "Avg °C", "Weather");
            for row in rows {
                println!(
                    "{:<20} {:<12} {:>8.1}  {}",
                    row.city, row.date, row.avg_temperature, row.weather
                );
            }
        }
    }

    Ok(())
}

fn run_configure(url: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = match url {
        Some(url) => url,
        None => Text::new("Backend base URL:")
            .with_initial_value(config.base_url_or_default())
            .prompt()?,
    };

    config.set_base_url(url);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
