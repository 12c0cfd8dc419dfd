use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wayfinder_agents::TravelAgent;
use wayfinder_catalog::{HotelInventory, Store};
use wayfinder_core::HotelRecord;
use wayfinder_genai::GeminiClient;
use wayfinder_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "wayfinder")]
#[command(about = "Wayfinder travel query router CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive query loop against the router.
    Chat,
    /// Route a single query and print the reply.
    Ask { text: String },
    /// Load hotel records from a JSON file into the catalog.
    Seed { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("wayfinder_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Chat => {
            let agent = build_agent().await?;
            run_chat(agent).await?;
        }
        Command::Ask { text } => {
            let agent = build_agent().await?;
            let reply = agent.route(&text).await;
            println!("{}", reply.reply_text);
        }
        Command::Seed { file } => {
            let store = build_store().await?;
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed reading {}", file.display()))?;
            let records: Vec<HotelRecord> =
                serde_json::from_str(&raw).context("seed file must be a JSON array of hotels")?;

            let count = records.len();
            for record in records {
                store.upsert_hotel(record).await?;
            }
            println!("seeded {count} hotel records");
        }
    }

    Ok(())
}

async fn run_chat(agent: TravelAgent<Store, GeminiClient>) -> Result<()> {
    println!("Wayfinder chat mode. type 'exit' to quit.");
    println!("Example queries: 'list cities', 'hotels in Zurich'");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent.route(message).await;
        println!("\n{}\n", reply.reply_text);
    }

    Ok(())
}

async fn build_store() -> Result<Store> {
    if let Ok(database_url) = env::var("WAYFINDER_DATABASE_URL") {
        Store::sqlite(&database_url).await
    } else {
        Ok(Store::memory())
    }
}

async fn build_agent() -> Result<TravelAgent<Store, GeminiClient>> {
    let metrics = AppMetrics::shared();
    let store = build_store().await?;
    let fallback = GeminiClient::from_env().context("failed to build fallback client")?;

    Ok(TravelAgent::new(
        Arc::new(store),
        Arc::new(fallback),
        metrics,
    ))
}
