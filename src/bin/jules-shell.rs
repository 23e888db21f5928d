use std::error::Error;
use std::io;

use jules::config::SETUP_INSTRUCTIONS;
use jules::{Agent, ConfigError};
use tokio::io::BufReader;

// Run from the root folder of the repo as follows:
// GOOGLE_API_KEY=your-key-here cargo run --bin jules-shell

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    jules::init_logger();

    println!("🤖 Jules Agent Interactive Mode");
    println!("================================\n");

    let agent = match Agent::from_env() {
        Ok(agent) => agent,
        Err(err) => {
            eprintln!("❌ {}", err);
            if err == ConfigError::MissingCredential {
                println!("\n{}", SETUP_INSTRUCTIONS);
            }
            std::process::exit(1);
        }
    };
    if !agent.initialize().await {
        eprintln!("❌ Failed to initialize Jules agent.");
        std::process::exit(1);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    jules::shell::run(&agent, stdin, &mut stdout).await?;
    Ok(())
}
