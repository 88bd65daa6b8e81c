use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a folder of CH01_001.jpg style pages, one chapter per number
    Flat {
        /// Folder holding the page images
        #[clap(short, long)]
        input: PathBuf,
        /// Book title
        #[clap(short, long)]
        title: String,
        /// Book author
        #[clap(short, long)]
        author: String,
        /// Output file, defaults to <folder name>.epub
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Book language
        #[clap(short, long, default_value = "ja")]
        language: String,
    },
    /// Converts a folder of VOL1_001.jpg style pages using a TOML chapter tree
    Tree {
        /// Folder holding the page images
        #[clap(short, long)]
        input: PathBuf,
        /// Book configuration file
        #[clap(short, long)]
        config: PathBuf,
        /// Output file, defaults to <title>.epub
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
