use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "assessment-cli")]
#[command(about = "Client CLI for the Assessment Backend API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4000")]
    url: String,

    #[arg(short, long, default_value = "/api/v1")]
    prefix: String,

    /// Session token from `register` or `login`
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Create an account and print the session token
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        number: u64,
    },
    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the logged-in user (needs --token)
    Me,
    /// Page through public API entries
    GetAll {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Ether balance of an address (needs --token)
    Balance { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}{}", cli.url.trim_end_matches('/'), cli.prefix);

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(COOKIE, HeaderValue::from_str(&format!("token={}", token))?);
    }

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", cli.url)).send().await?,
        Commands::Register {
            name,
            email,
            password,
            number,
        } => {
            client
                .post(format!("{}/register", api))
                .json(&json!({ "name": name, "email": email, "password": password, "number": number }))
                .send()
                .await?
        }
        Commands::Login { email, password } => {
            client
                .post(format!("{}/login", api))
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?
        }
        Commands::Me => client.get(format!("{}/me", api)).headers(headers).send().await?,
        Commands::GetAll {
            page,
            limit,
            category,
        } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(category) = category {
                query.push(("category", category));
            }
            client.get(format!("{}/get-all", api)).query(&query).send().await?
        }
        Commands::Balance { address } => {
            client
                .get(format!("{}/balance/{}", api, address))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", json["message"].as_str().unwrap_or("no message"));
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
