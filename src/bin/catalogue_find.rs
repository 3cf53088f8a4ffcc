//! Query a record catalogue from the command line.
//!
//! Loads a catalogue document (or the bundled library), builds a query from
//! `KEY=value` terms and prints the matches in insertion order. With `--kind`
//! the query is scoped to one category; without it the query is open and
//! crosses categories unless it names `KIND=...` itself.

use anyhow::{Context, Result, bail};
use recordmatch::{
    Catalogue, Kind, LoadOptions, Record, bundled_library, load_catalogue_from_path,
    parse_query_terms, resolve_text_mode,
};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let text_mode = resolve_text_mode(cli.mode.as_deref())?;
    let catalogue = match &cli.data {
        Some(path) => load_catalogue_from_path(
            path,
            &LoadOptions {
                text_mode,
                schema_path: cli.schema.clone(),
            },
        )?,
        None => bundled_library(text_mode)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.summary {
        write_summary(&mut out, &catalogue)?;
        if cli.terms.is_empty() {
            return Ok(());
        }
    }

    let pairs = parse_query_terms(&cli.terms)?;
    let kind = cli.kind.unwrap_or(Kind::Unspecified);
    let query = catalogue
        .query(kind, pairs)
        .context("building query")?;
    let matches = if kind.is_unspecified() {
        catalogue.find(&query)
    } else {
        catalogue.find_in(kind, &query)?
    };

    if cli.json {
        for record in matches {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }
    } else {
        write_matches(&mut out, &query, &matches)?;
    }
    Ok(())
}

fn write_matches(out: &mut impl Write, query: &Record, matches: &[&Record]) -> io::Result<()> {
    writeln!(out, "Find {query}")?;
    if matches.is_empty() {
        writeln!(out, "No matches.")?;
        return Ok(());
    }
    writeln!(out, "Matches:")?;
    for record in matches {
        writeln!(out, "  {record}")?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, catalogue: &Catalogue) -> io::Result<()> {
    writeln!(
        out,
        "{} records, text mode {}",
        catalogue.len(),
        catalogue.schemas().text_mode()
    )?;
    for (kind, count) in catalogue.count_by_kind() {
        writeln!(out, "  {kind}: {count}")?;
    }
    Ok(())
}

struct Cli {
    data: Option<PathBuf>,
    schema: Option<PathBuf>,
    kind: Option<Kind>,
    mode: Option<String>,
    json: bool,
    summary: bool,
    terms: Vec<String>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut cli = Cli {
            data: None,
            schema: None,
            kind: None,
            mode: None,
            json: false,
            summary: false,
            terms: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" | "-d" => cli.data = Some(PathBuf::from(next_value(&mut args, &arg)?)),
                "--schema" => cli.schema = Some(PathBuf::from(next_value(&mut args, &arg)?)),
                "--kind" | "-k" => {
                    let value = next_value(&mut args, &arg)?;
                    let kind = Kind::parse(&value)
                        .with_context(|| format!("unknown kind '{value}'"))?;
                    cli.kind = Some(kind);
                }
                "--mode" | "-m" => cli.mode = Some(next_value(&mut args, &arg)?),
                "--json" => cli.json = true,
                "--summary" => cli.summary = true,
                "--help" | "-h" => usage(0),
                other if other.starts_with('-') => {
                    eprintln!("unknown option: {other}");
                    usage(1);
                }
                term => cli.terms.push(term.to_string()),
            }
        }

        Ok(cli)
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    match args.next() {
        Some(value) => Ok(value),
        None => bail!("{flag} requires a value"),
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalogue-find [--data FILE] [--schema FILE] [--kind KIND] [--mode exact|prefix] [--json] [--summary] [KEY=value ...]\n\nOptions:\n  --data, -d     Catalogue document (JSON). Defaults to the bundled library.\n  --schema       Validate the document against this JSON Schema instead of the bundled one.\n  --kind, -k     Scope the query to one category: fiction, cookbook, howto.\n  --mode, -m     Text comparison: exact (default) or prefix. Falls back to RECORDMATCH_TEXT_MODE.\n  --json         Print matches as NDJSON instead of the rendered form.\n  --summary      Print record counts per category before querying.\n\nExamples:\n  catalogue-find last=King\n  catalogue-find --kind fiction --mode prefix title=life\n  catalogue-find region=china"
    );
    std::process::exit(code);
}
