pub mod commands;

use crate::config::ServiceMode;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-article")]
#[command(about = "Recipe article generator - turns cooking queries into HTML articles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the article server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Service variant: `full` tries the recipe database first
        #[arg(long, value_enum)]
        mode: Option<ServiceMode>,
    },

    /// Ask a running server for an article
    Query {
        /// Cooking query, e.g. "3 quick pasta recipes"
        query: String,

        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server: String,
    },
}
