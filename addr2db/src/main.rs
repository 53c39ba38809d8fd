//! # addr2db - Main Entry Point
//!
//! Three subcommands:
//! - **resolve**: print `file:line` for addresses on the command line
//! - **load**: run a JSON-lines request stream through the pipeline into SQLite
//! - **strip**: write a copy of a binary without debug sections

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use addr2db::cli::{Args, Command, LoadArgs};
use addr2db::database::{Database, SqliteDatabase};
use addr2db::domain::Address;
use addr2db::pipeline::{Pipeline, Submitter};
use addr2db::preflight::run_preflight_checks;
use addr2db::requests::read_requests;
use addr2db::strip::strip;
use addr2db::symbolization::ResolverHandle;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("malformed request") || msg.contains("unsupported statement argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Resolve { binary, addresses } => resolve(&binary, &addresses),
        Command::Load(load_args) => load(&load_args, args.quiet),
        Command::Strip { tool, input, output } => {
            strip(&tool, &input, &output)?;
            if !args.quiet {
                println!("saved: {}", output.display());
            }
            Ok(())
        }
    }
}

fn resolve(binary: &Path, addresses: &[Address]) -> Result<()> {
    run_preflight_checks(binary)?;
    let resolver = ResolverHandle::open(binary).context("Failed to create symbolizer")?;

    for &address in addresses {
        println!("{address} {}", resolver.resolve_to_string(address));
    }
    Ok(())
}

fn load(args: &LoadArgs, quiet: bool) -> Result<()> {
    run_preflight_checks(&args.binary)?;
    let resolver = ResolverHandle::open(&args.binary).context("Failed to create symbolizer")?;

    let mut database = SqliteDatabase::open(&args.db)?;
    if let Some(ref schema) = args.schema {
        let sql = std::fs::read_to_string(schema)
            .with_context(|| format!("Failed to read schema {}", schema.display()))?;
        database.execute(&sql).context("Failed to apply schema")?;
        info!("Applied schema {}", schema.display());
    }

    let pipeline = Pipeline::start(resolver, database, args.queue)?;

    // Drain whatever was queued even when the stream breaks halfway
    let submitted = if args.requests.as_os_str() == "-" {
        submit_all(io::stdin().lock(), pipeline.submitter())
    } else {
        File::open(&args.requests)
            .with_context(|| format!("Failed to open {}", args.requests.display()))
            .and_then(|file| submit_all(BufReader::new(file), pipeline.submitter()))
    };
    let drained = pipeline.finish();
    let submitted = submitted?;

    if !quiet {
        println!("submitted: {submitted}");
        println!("{}", drained.stats);
    }
    if drained.stats.failed > 0 {
        eprintln!("warning: {} write(s) failed, see log output", drained.stats.failed);
    }

    Ok(())
}

fn submit_all<R: BufRead>(reader: R, submitter: &Submitter) -> Result<usize> {
    let mut count = 0;
    for request in read_requests(reader) {
        request?.submit(submitter)?;
        count += 1;
    }
    Ok(count)
}
