use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "epcat", bin_name = "epcat", version)]
#[command(about = "Browse a paginated episode catalog with a local cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a page of episodes
    #[command(alias = "p")]
    Page {
        /// Page number (defaults to the current page)
        number: Option<u32>,
    },

    /// Show the next page
    Next,

    /// Show the previous page
    Prev,

    /// List the current page, or filter across every cached episode
    #[command(alias = "ls")]
    List {
        /// Match episode names containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only favorites
        #[arg(short, long)]
        favorites: bool,

        /// Only watched episodes
        #[arg(short, long)]
        watched: bool,
    },

    /// Show episode details
    Show {
        /// Episode ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Toggle the favorite flag on episodes
    #[command(alias = "fav")]
    Favorite {
        /// Episode ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Toggle the watched flag on episodes
    #[command(alias = "w")]
    Watched {
        /// Episode ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show what is cached
    Status,

    /// Get or set configuration
    Config {
        /// Configuration key (api-url, timeout)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
