use jules::config::SETUP_INSTRUCTIONS;
use jules::{Agent, AgentResult, ConfigError, TaskParameters};
use serde_json::json;

// Run from the root folder of the repo as follows:
// GOOGLE_API_KEY=your-key-here cargo run --bin jules-demo

#[tokio::main]
async fn main() {
    jules::init_logger();

    println!("=== AmazingRace - Jules Agent Demo ===\n");

    let agent = match Agent::from_env() {
        Ok(agent) => agent,
        Err(err) => {
            eprintln!("Error running demo: {}", err);
            if err == ConfigError::MissingCredential {
                println!("\n{}", SETUP_INSTRUCTIONS);
            }
            std::process::exit(1);
        }
    };

    if !agent.initialize().await {
        eprintln!("Failed to initialize Jules agent. Please check your configuration.");
        std::process::exit(1);
    }

    println!("\n=== Running Demo Tasks ===\n");

    println!("1. Testing basic chat functionality...");
    let result = agent
        .chat("Hello Jules! Can you introduce yourself as an AI assistant for the AmazingRace project?")
        .await;
    report("Jules Response", "Chat", &result);

    println!("\n2. Testing task execution...");
    let mut parameters = TaskParameters::new();
    parameters.insert("participants".into(), json!(4));
    parameters.insert("theme".into(), json!("adventure and teamwork"));
    parameters.insert("duration".into(), json!("30 minutes"));
    parameters.insert("location".into(), json!("office or home environment"));
    let result = agent
        .run_task("Plan a simple amazing race game", &parameters)
        .await;
    report("Task Result", "Task", &result);

    println!("\n3. Testing question answering...");
    let result = agent
        .ask_question(
            "What makes a good team building activity?",
            "We are planning activities for an AmazingRace style team building event",
        )
        .await;
    report("Q&A Result", "Q&A", &result);

    println!("\n4. Testing brainstorming...");
    let result = agent
        .brainstorm("fun challenges for an office amazing race", 3)
        .await;
    report("Brainstorm Result", "Brainstorm", &result);

    println!("\n=== Demo Complete ===");
}

fn report(success_label: &str, operation: &str, result: &AgentResult) {
    match result {
        AgentResult::Success { text, .. } => println!("✅ {}: {}", success_label, text),
        AgentResult::Failure { error_message, .. } => {
            println!("❌ {} failed: {}", operation, error_message)
        }
    }
}
