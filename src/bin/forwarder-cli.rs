use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

use api_forwarder::client::{ApiClient, AuthStore, FilePersistence};

#[derive(Parser)]
#[command(name = "forwarder-cli")]
#[command(about = "Call /api routes through the forwarder with a stored auth record", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// File holding the auth record between invocations.
    #[arg(short, long, default_value = ".forwarder-auth.json")]
    auth_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an auth record (JSON); a string `token` field is sent as a bearer token
    Login { auth: String },
    /// Print the stored auth record
    Whoami,
    /// Send a JSON request, e.g. `call POST /api/login --body '{"u":"a"}'`
    Call {
        method: String,
        endpoint: String,
        #[arg(short, long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let store = AuthStore::open(FilePersistence::new(&cli.auth_file))?;

    match cli.command {
        Commands::Login { auth } => {
            let auth: Value = serde_json::from_str(&auth)?;
            store.set(Some(auth))?;
            println!("Auth record saved to {}", store.persistence().path().display());
        }
        Commands::Whoami => match store.get() {
            Some(auth) => println!("{}", serde_json::to_string_pretty(&auth)?),
            None => eprintln!("No auth record stored"),
        },
        Commands::Call { method, endpoint, body } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let body: Option<Value> = body.as_deref().map(|b| serde_json::from_str(b)).transpose()?;
            let client = ApiClient::new(&cli.url)?;
            let authorization = store.bearer_token();

            let res = client
                .call(&endpoint, method, body.as_ref(), authorization.as_deref())
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
