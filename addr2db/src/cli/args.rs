//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Address;
use crate::pipeline::DEFAULT_QUEUE_CAPACITY;

#[derive(Parser)]
#[command(
    name = "addr2db",
    version,
    about = "Resolve binary addresses to source locations and record them in SQLite",
    after_help = "\
EXAMPLES:
    addr2db resolve --binary vmlinux 0xffffffff810c1a40
    addr2db load --binary vmlinux --db kernel.db --schema schema.sql --requests work.jsonl
    addr2db strip vmlinux vmlinux.nodebug"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print file:line for each address
    Resolve {
        /// Binary with DWARF debug information
        #[arg(short, long)]
        binary: PathBuf,

        /// Addresses (0x-prefixed hex or decimal)
        #[arg(value_name = "ADDR", required = true)]
        addresses: Vec<Address>,
    },

    /// Feed a request stream through the single-writer pipeline
    Load(LoadArgs),

    /// Copy a binary without its debug sections
    Strip {
        /// External tool to run
        #[arg(long, default_value = "strip")]
        tool: String,

        input: PathBuf,

        output: PathBuf,
    },
}

#[derive(clap::Args)]
pub struct LoadArgs {
    /// Binary with DWARF debug information
    #[arg(short, long)]
    pub binary: PathBuf,

    /// SQLite database file (created if missing)
    #[arg(long, value_name = "FILE")]
    pub db: PathBuf,

    /// JSON-lines request file, `-` for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub requests: PathBuf,

    /// SQL executed once before the pipeline starts
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Work queue capacity
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue: usize,
}
