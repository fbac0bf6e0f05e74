use anyhow::{Context, Result};
use campus_core::{Catalog, Conversation, ReplyDelay, SubmitRejected, find_relevant_info};
use colored::*;
use dialoguer::{Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::output::{
    OutputOptions, print_chat_commands, print_header, print_message, print_quick_actions,
};

/// A line typed in the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Blank,
    Exit,
    Help,
    Actions,
    History,
    Menu,
    Action(usize),
    Unknown(String),
    Query(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Blank;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return ChatCommand::Exit;
        }

        let Some(command) = line.strip_prefix('/') else {
            return ChatCommand::Query(line.to_string());
        };

        match command.trim().to_lowercase().as_str() {
            "help" | "?" => ChatCommand::Help,
            "actions" => ChatCommand::Actions,
            "history" => ChatCommand::History,
            "menu" => ChatCommand::Menu,
            "exit" | "quit" => ChatCommand::Exit,
            other => match other.parse::<usize>() {
                Ok(n) => ChatCommand::Action(n),
                Err(_) => ChatCommand::Unknown(line.to_string()),
            },
        }
    }
}

fn typing_spinner(assistant_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("{} is typing...", assistant_name));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Sends one line through the conversation and prints both sides of the exchange
async fn ask(
    conversation: &mut Conversation,
    text: &str,
    delay: &ReplyDelay,
    options: &OutputOptions,
) -> Result<()> {
    let pending = match conversation.submit(text) {
        Ok(pending) => pending,
        Err(SubmitRejected::Empty) => return Ok(()),
        Err(e) => {
            warn!("Ignoring input: {}", e);
            return Ok(());
        }
    };

    if let Some(user_message) = conversation.last() {
        print_message(user_message, options);
    }

    let spinner = (!delay.base.is_zero() || !delay.jitter.is_zero())
        .then(|| typing_spinner(&options.assistant_name));
    let reply = conversation.reply_after(pending, delay).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match reply {
        Ok(reply) => print_message(reply, options),
        Err(e) => warn!("Dropping reply: {}", e),
    }
    Ok(())
}

/// Runs a single query mode, answering one question and exiting
pub async fn run_single_query(
    query: String,
    catalog: Arc<Catalog>,
    delay: &ReplyDelay,
    options: &OutputOptions,
) -> Result<()> {
    info!("Running single query: {}", query);
    let mut conversation = Conversation::new(catalog);
    ask(&mut conversation, &query, delay, options).await
}

/// Matched reply as JSON, or `None` for blank input
pub fn json_reply(query: &str, catalog: &Catalog) -> Option<Value> {
    if query.trim().is_empty() {
        return None;
    }

    let result = find_relevant_info(catalog, query);
    Some(json!({
        "query": query,
        "category": result.category,
        "kind": result.kind,
        "content": result.content,
    }))
}

/// Prints the matched reply as JSON without any delay. Blank input prints nothing.
pub fn run_json_query(query: &str, catalog: &Catalog) -> Result<()> {
    let Some(output) = json_reply(query, catalog) else {
        debug!("Ignoring blank query");
        return Ok(());
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize reply")?
    );
    Ok(())
}

fn pick_quick_action(catalog: &Catalog) -> Result<Option<usize>> {
    let items: Vec<String> = catalog
        .quick_actions
        .iter()
        .map(|a| format!("{} {}", a.icon, a.label).trim().to_string())
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Quick actions")
        .items(&items)
        .default(0)
        .interact_opt()
        .context("Failed to show quick action menu")?;
    Ok(selection)
}

/// Runs an interactive chat session
pub async fn run_interactive_chat(
    catalog: Arc<Catalog>,
    delay: &ReplyDelay,
    options: &OutputOptions,
) -> Result<()> {
    let mut conversation = Conversation::new(Arc::clone(&catalog));

    print_header(options);
    print_quick_actions(&catalog);
    println!("Type /help for commands, 'exit' or 'quit' to end the session.");
    println!();
    if let Some(greeting) = conversation.last() {
        print_message(greeting, options);
    }

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            break;
        }

        let command = ChatCommand::parse(&input);
        debug!("Chat command: {:?}", command);

        match command {
            ChatCommand::Blank => continue,
            ChatCommand::Exit => break,
            ChatCommand::Help => print_chat_commands(),
            ChatCommand::Actions => print_quick_actions(&catalog),
            ChatCommand::History => {
                println!();
                for message in conversation.messages() {
                    print_message(message, options);
                }
            }
            ChatCommand::Menu => {
                if catalog.quick_actions.is_empty() {
                    println!("No quick actions are configured.");
                } else if let Some(index) = pick_quick_action(&catalog)? {
                    let query = catalog.quick_actions[index].query.clone();
                    ask(&mut conversation, &query, delay, options).await?;
                }
            }
            ChatCommand::Action(n) => match catalog.quick_action(&n.to_string()) {
                Some(action) => {
                    let query = action.query.clone();
                    ask(&mut conversation, &query, delay, options).await?;
                }
                None => println!(
                    "{}",
                    format!("No quick action {}. Type /actions to list them.", n).yellow()
                ),
            },
            ChatCommand::Unknown(text) => println!(
                "{}",
                format!("Unknown command {}. Type /help for commands.", text).yellow()
            ),
            ChatCommand::Query(text) => {
                ask(&mut conversation, &text, delay, options).await?;
            }
        }
    }

    println!("Goodbye!");
    info!(
        "Chat session ended after {} messages",
        conversation.messages().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ChatCommand::parse("  \n"), ChatCommand::Blank);
        assert_eq!(ChatCommand::parse("QUIT\n"), ChatCommand::Exit);
        assert_eq!(ChatCommand::parse("/exit"), ChatCommand::Exit);
        assert_eq!(ChatCommand::parse("/help"), ChatCommand::Help);
        assert_eq!(ChatCommand::parse("/Actions"), ChatCommand::Actions);
        assert_eq!(ChatCommand::parse("/history"), ChatCommand::History);
        assert_eq!(ChatCommand::parse("/menu"), ChatCommand::Menu);
        assert_eq!(ChatCommand::parse("/3"), ChatCommand::Action(3));
        assert_eq!(
            ChatCommand::parse("/parking"),
            ChatCommand::Unknown("/parking".to_string())
        );
        assert_eq!(
            ChatCommand::parse("What are the dining hall hours?\n"),
            ChatCommand::Query("What are the dining hall hours?".to_string())
        );
    }

    #[test]
    fn test_json_reply_ignores_blank_query() {
        let catalog = Catalog::builtin();

        for query in ["", "   ", "\t\n"] {
            assert_eq!(json_reply(query, &catalog), None);
        }

        let reply = json_reply("xyz123", &catalog).unwrap();
        assert_eq!(reply["category"], "general");
        assert_eq!(reply["kind"], "fallback");

        let reply = json_reply("What are the dining hall hours?", &catalog).unwrap();
        assert_eq!(reply["category"], "dining");
        assert!(reply["content"].as_str().unwrap().contains("Dining Hall Hours"));
    }

    #[tokio::test]
    async fn test_ask_appends_exchange() {
        colored::control::set_override(false);
        let options = OutputOptions {
            assistant_name: "Campus AI Assistant".to_string(),
            show_timestamps: false,
        };
        let mut conversation = Conversation::new(Arc::new(Catalog::builtin()));

        ask(&mut conversation, "   ", &ReplyDelay::instant(), &options)
            .await
            .unwrap();
        assert_eq!(conversation.len(), 1);

        ask(&mut conversation, "menu", &ReplyDelay::instant(), &options)
            .await
            .unwrap();
        assert_eq!(conversation.len(), 3);
        assert_eq!(
            conversation.last().unwrap().category.as_deref(),
            Some("dining")
        );
        assert!(!conversation.is_composing());
    }
}
