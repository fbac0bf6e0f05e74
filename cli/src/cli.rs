use clap::Parser;
use std::path::PathBuf;

/// Campus information assistant for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The question to ask the assistant
    #[arg(index = 1)] // Positional argument
    pub query: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Run a quick action by number, label or category
    #[arg(short, long, value_name = "SELECTOR")]
    pub action: Option<String>,

    /// List the available quick actions
    #[arg(long, default_value_t = false)]
    pub list_actions: bool,

    /// Load the response catalog from a TOML file
    #[arg(long, env = "CAMPUS_ASSISTANT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, env = "CAMPUS_ASSISTANT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long, default_value_t = false)]
    pub init_config: bool,

    /// Print the effective catalog as TOML and exit
    #[arg(long, default_value_t = false)]
    pub dump_catalog: bool,

    /// Reply immediately instead of simulating thinking time
    #[arg(long, default_value_t = false)]
    pub instant: bool,

    /// Print single-query results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
