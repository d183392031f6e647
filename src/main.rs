mod advisor;
mod comparator;
mod config;
mod console;
mod model;
mod store;

use advisor::GeminiAdvisor;
use config::load_config;
use console::Console;
use console::command_handler::handle_command;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let advisor = Arc::new(GeminiAdvisor::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.temperature,
    ));

    let mut console = Console::new(advisor, config);

    info!("SmartShop started");
    println!("SmartShop: unit price comparison. Type 'help' for commands.");
    console.render_products();

    // Main input loop: one command per line, results re-rendered after
    // every edit.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        match lines.next_line().await {
            Ok(Some(line)) => {
                if !handle_command(line.trim(), &mut console).await {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Input error: {}", e);
                break;
            }
        }
    }
    info!("Session ended.");
}
