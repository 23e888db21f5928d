//! Line-oriented interactive shell.
//!
//! Each input line is parsed into a [`Command`] and dispatched to an [`Agent`]. Requests are
//! handled one at a time: the next line is read only after the previous reply was printed.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::jules::agent::{Agent, AgentResult};
use crate::jules::prompt::{TaskParameters, DEFAULT_BRAINSTORM_COUNT};

pub const PROMPT: &str = "You: ";

pub const BANNER: &str = "Commands: /help, /task <description>, /brainstorm <topic>, /quit";

pub const HELP_TEXT: &str = "\
📖 Available Commands:
/help - Show this help message
/task <description> - Run a specific task
/brainstorm <topic> - Brainstorm ideas about a topic
/quit - Exit the interactive mode
Or just type any message to chat with the agent!";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Task(String),
    Brainstorm(String),
    Chat(String),
    /// `/task` or `/brainstorm` without an argument.
    MissingArgument(&'static str),
    Empty,
}

impl Command {
    /// Parse a raw line. Leading and trailing whitespace is ignored.
    ///
    /// ```rust
    /// use jules::shell::Command;
    ///
    /// assert_eq!(Command::parse("/task  plan a route "), Command::Task("plan a route".into()));
    /// assert_eq!(Command::parse("/exit"), Command::Quit);
    /// assert_eq!(Command::parse("hi there"), Command::Chat("hi there".into()));
    /// ```
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        match line {
            "" => return Command::Empty,
            "/quit" | "/exit" => return Command::Quit,
            "/help" => return Command::Help,
            _ => {}
        }

        if let Some(arg) = command_argument(line, "/task") {
            return if arg.is_empty() {
                Command::MissingArgument("/task <description>")
            } else {
                Command::Task(arg.to_string())
            };
        }
        if let Some(arg) = command_argument(line, "/brainstorm") {
            return if arg.is_empty() {
                Command::MissingArgument("/brainstorm <topic>")
            } else {
                Command::Brainstorm(arg.to_string())
            };
        }
        Command::Chat(line.to_string())
    }
}

// `/task` matches `/task` and `/task foo` but not `/tasks`.
fn command_argument<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?;
    if rest.is_empty() {
        return Some(rest);
    }
    if rest.starts_with(char::is_whitespace) {
        return Some(rest.trim());
    }
    None
}

/// Run the read-dispatch-print loop until `/quit`, `/exit` or end of input.
pub async fn run<R, W>(agent: &Agent, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "✅ {} is ready! Type your messages below.", agent.name())?;
    writeln!(out, "{}\n", BANNER)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => {
                writeln!(out)?;
                writeln!(out, "👋 Goodbye!")?;
                return Ok(());
            }
        };

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => {
                writeln!(out, "👋 Goodbye!")?;
                return Ok(());
            }
            Command::Help => writeln!(out, "\n{}\n", HELP_TEXT)?,
            Command::MissingArgument(usage) => writeln!(out, "Usage: {}", usage)?,
            Command::Task(task) => {
                writeln!(out, "🔄 Running task...")?;
                let result = agent.run_task(&task, &TaskParameters::new()).await;
                print_result(out, agent.name(), &result)?;
            }
            Command::Brainstorm(topic) => {
                writeln!(out, "🧠 Brainstorming...")?;
                let result = agent.brainstorm(&topic, DEFAULT_BRAINSTORM_COUNT).await;
                print_result(out, agent.name(), &result)?;
            }
            Command::Chat(message) => {
                writeln!(out, "💭 {} is thinking...", agent.name())?;
                let result = agent.chat(&message).await;
                print_result(out, agent.name(), &result)?;
            }
        }
    }
}

fn print_result<W: Write>(out: &mut W, name: &str, result: &AgentResult) -> std::io::Result<()> {
    match result {
        AgentResult::Success { text, .. } => writeln!(out, "\n🤖 {}: {}\n", name, text),
        AgentResult::Failure { error_message, .. } => {
            writeln!(out, "\n❌ Error: {}\n", error_message)
        }
    }
}
