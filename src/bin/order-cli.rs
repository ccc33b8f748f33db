use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "order-cli")]
#[command(about = "Command line client for the Storage Order Bridge", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Correlation id sent as x-request-id
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pin content and place a storage order for it
    Place {
        /// Content identifier
        cid: String,
    },
    /// Check bridge and chain node health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert("x-request-id", HeaderValue::from_str(id)?);
    }

    let res = match cli.command {
        Commands::Place { cid } => {
            client
                .post(format!("{}/api/v1/orders", cli.url))
                .headers(headers)
                .json(&json!({ "cid": cid }))
                .send()
                .await?
        }
        Commands::Health => {
            client
                .get(format!("{}/health", cli.url))
                .headers(headers)
                .send()
                .await?
        }
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", body);
    } else {
        eprintln!("Error: bridge returned status {}", status);
        eprintln!("{}", body);
        std::process::exit(1);
    }
    Ok(())
}
