use campus_core::{AssistantConfig, Catalog, GENERAL_CATEGORY, Message};
use colored::*;
use pulldown_cmark::{Event as MdEvent, Options, Parser as MdParser, Tag};

/// Presentation settings taken from the configuration
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub assistant_name: String,
    pub show_timestamps: bool,
}

impl OutputOptions {
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            assistant_name: config.assistant_name().to_string(),
            show_timestamps: config.show_timestamps(),
        }
    }
}

/// Print the session banner
pub fn print_header(options: &OutputOptions) {
    println!("{}", options.assistant_name.bold());
    println!("{}", "Your 24/7 campus information companion".dimmed());
    println!();
}

/// Print one message followed by its timestamp and category badge
pub fn print_message(message: &Message, options: &OutputOptions) {
    println!("{}", format_message(message, options));
    println!();
}

/// Formats a message for the terminal. Assistant text is rendered as markdown,
/// user text is shown verbatim.
pub fn format_message(message: &Message, options: &OutputOptions) -> String {
    let (prefix, body) = if message.is_user() {
        ("You".green().bold(), message.content.clone())
    } else {
        (
            options.assistant_name.blue().bold(),
            render_markdown(&message.content),
        )
    };

    let mut meta = Vec::new();
    if options.show_timestamps {
        meta.push(message.timestamp.format("%H:%M").to_string().dimmed().to_string());
    }
    if let Some(category) = message.category.as_deref() {
        if category != GENERAL_CATEGORY {
            meta.push(format!("[{}]", category).magenta().to_string());
        }
    }

    if meta.is_empty() {
        format!("{}: {}", prefix, body)
    } else {
        format!("{}: {}\n  {}", prefix, body, meta.join(" "))
    }
}

/// Print the numbered quick-action bar
pub fn print_quick_actions(catalog: &Catalog) {
    if catalog.quick_actions.is_empty() {
        return;
    }
    println!("{}", "Quick actions:".cyan());
    for line in format_quick_actions(catalog) {
        println!("  {}", line);
    }
    println!();
}

pub fn format_quick_actions(catalog: &Catalog) -> Vec<String> {
    catalog
        .quick_actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let label = if action.icon.is_empty() {
                action.label.clone()
            } else {
                format!("{} {}", action.icon, action.label)
            };
            format!("{} {}", format!("/{}", i + 1).yellow().bold(), label)
        })
        .collect()
}

/// Commands understood by the interactive session
pub fn print_chat_commands() {
    println!("{}", "Commands:".cyan());
    println!("  /help      Show this list");
    println!("  /actions   Show the quick actions");
    println!("  /<n>       Run quick action number n");
    println!("  /menu      Pick a quick action from a menu");
    println!("  /history   Show the conversation so far");
    println!("  exit, quit End the session");
    println!();
}

/// Show usage instructions when no query or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "campus-assistant \"your question\"".green().bold());
    println!("    Ask a single question");
    println!();
    println!("  {}", "campus-assistant -i".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("  {}", "campus-assistant --action 3".green().bold());
    println!("    Run a quick action (see --list-actions)");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --catalog <PATH>  Load canned responses from a TOML file");
    println!("  --instant         Reply without the thinking delay");
    println!("  --json            Print the matched reply as JSON");
    println!("  --help            Show this help message");
    println!();
}

/// Renders the light markdown used by canned responses. Line breaks inside a
/// paragraph are kept, bold text is highlighted and lists get bullets or numbers.
pub fn render_markdown(markdown: &str) -> String {
    let parser = MdParser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);

    let mut output = String::new();
    let mut strong = 0usize;
    let mut emphasis = 0usize;
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            MdEvent::Start(Tag::Paragraph) => {
                if lists.is_empty() {
                    start_block(&mut output);
                }
            }
            MdEvent::Start(Tag::Heading(..)) => {
                start_block(&mut output);
                strong += 1;
            }
            MdEvent::End(Tag::Heading(..)) => {
                strong = strong.saturating_sub(1);
            }
            MdEvent::Start(Tag::List(first)) => {
                if lists.is_empty() {
                    start_block(&mut output);
                }
                lists.push(first);
            }
            MdEvent::End(Tag::List(_)) => {
                lists.pop();
            }
            MdEvent::Start(Tag::Item) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        output.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => output.push_str(&format!("{} ", "•".yellow())),
                }
            }
            MdEvent::Start(Tag::Strong) => strong += 1,
            MdEvent::End(Tag::Strong) => strong = strong.saturating_sub(1),
            MdEvent::Start(Tag::Emphasis) => emphasis += 1,
            MdEvent::End(Tag::Emphasis) => emphasis = emphasis.saturating_sub(1),
            MdEvent::Start(Tag::CodeBlock(_)) => {
                start_block(&mut output);
                in_code_block = true;
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
            }
            MdEvent::Text(ref text) => {
                if in_code_block {
                    output.push_str(&text.dimmed().to_string());
                } else if strong > 0 {
                    output.push_str(&text.bold().to_string());
                } else if emphasis > 0 {
                    output.push_str(&text.italic().to_string());
                } else {
                    output.push_str(text);
                }
            }
            MdEvent::Code(ref code) => {
                output.push_str(&code.on_bright_black().white().to_string());
            }
            MdEvent::SoftBreak | MdEvent::HardBreak => output.push('\n'),
            MdEvent::Rule => {
                start_block(&mut output);
                output.push_str(&"─".repeat(40).dimmed().to_string());
            }
            _ => {}
        }
    }

    output.trim_end().to_string()
}

// Separate blocks with one blank line
fn start_block(output: &mut String) {
    if output.is_empty() {
        return;
    }
    while !output.ends_with("\n\n") {
        output.push('\n');
    }
}
