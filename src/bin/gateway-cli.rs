use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the unified gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the aggregate health document
    Health,
    /// Show the health of a single component (logs has no health route)
    Component {
        #[arg(value_enum)]
        group: Group,
    },
    /// Send a message to the chatbot
    Chat { message: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Group {
    Config,
    Chatbot,
    Tts,
    Email,
}

impl Group {
    fn prefix(self) -> &'static str {
        match self {
            Group::Config => "/config",
            Group::Chatbot => "/chatbot",
            Group::Tts => "/tts",
            Group::Email => "/email",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{base}/health")).send().await?,
        Commands::Component { group } => {
            client
                .get(format!("{base}{}/health", group.prefix()))
                .send()
                .await?
        }
        Commands::Chat { message } => {
            client
                .post(format!("{base}/chatbot/run"))
                .json(&json!({ "message": message }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
