use std::io::{self, Write};

use tracing::info;

use stratwatch::strategy::interpreter::{LlmClient, StrategyInterpreter};
use stratwatch::workflow::WorkflowController;
use stratwatch::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup Logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // Optional: load environment variables from a .env file
    dotenvy::dotenv().ok();

    info!("Starting stratwatch...");

    let config = AppConfig::load()?;
    info!(
        "Watching symbols {:?} (simulation: {})",
        config.symbols, config.use_simulation
    );

    let user_strategy = strategy_from_args().unwrap_or_else(|| prompt_strategy());

    let llm = LlmClient::new(&config.llm);
    let interpreter = StrategyInterpreter::new(llm);
    let controller = WorkflowController::new(config, interpreter);

    let report = controller.run(&user_strategy).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!("Trading session ended.");
    Ok(())
}

fn strategy_from_args() -> Option<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

fn prompt_strategy() -> String {
    print!("Please enter your trading strategy: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok();
    line.trim().to_string()
}
