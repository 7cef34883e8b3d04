use clap::{Parser, Subcommand};
use wr_core::{DEFAULT_CATEGORY, OutputFormat};

#[derive(Parser)]
#[command(name = "wr")]
#[command(about = "War Room: shared project memory for coordinated AI agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory (defaults to CWD)
    #[arg(long, global = true)]
    pub cd: Option<String>,

    /// Memory log file, overriding memory.path from config
    #[arg(long, global = true)]
    pub memory_file: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append an entry to the project memory log
    Log {
        /// Writer label, e.g. CODEX or GEMINI
        source: String,

        /// Entry text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        /// Entry category
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },

    /// Print the most recent characters of the memory log
    Tail {
        /// Characters to print (defaults to memory.tail_char_limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Skip the partial leading line
        #[arg(long)]
        aligned: bool,
    },

    /// Print the context string injected into agent prompts
    Context,

    /// List parsed memory entries
    List {
        /// Only entries from this source (case-insensitive)
        #[arg(long)]
        source: Option<String>,

        /// Only entries with this category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
    },
}
