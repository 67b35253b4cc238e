use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use yansi::Paint;

mod interactive;

use interactive::InteractiveMode;
use ssed::config::{ColorChoice, Config, STATUS_ENV};
use ssed::highlight::Highlighter;
use ssed::interpreter;
use ssed::parser;
use ssed::{Diagnostics, Document, Error};

#[derive(Parser)]
#[command(name = "ssed", version)]
#[command(
    about = "ssed is a line-oriented text transformer: sed-like rules with if/between blocks, line ranges and status branches."
)]
struct Cli {
    /// Rules to apply, in order (e.g. 's/foo/bar', 'p:-1', 'if/x/ { g/a/b }')
    #[arg(required_unless_present = "interactive")]
    rules: Vec<String>,

    /// Read from a file instead of stdin
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Write the result back to the input file instead of stdout
    #[arg(short = 'w', long = "write", requires = "input")]
    write: bool,

    /// Exit status of the previous command, used by `status:` rules
    #[arg(short = 's', long = "status")]
    status: Option<String>,

    /// When to color output
    #[arg(long = "color", value_enum)]
    color: Option<ColorChoice>,

    /// Output as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Edit one more rule with a live preview before running
    #[arg(short = 'I', long = "interactive", conflicts_with = "write")]
    interactive: bool,
}

/// Prints warnings to stderr.
struct StderrReporter;

impl Diagnostics for StderrReporter {
    fn warn(&mut self, error: Error) {
        eprintln!("{} {}", "warning:".yellow().bold(), error);
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut reporter = StderrReporter;
    let config = Config::load(&mut reporter);

    let color = cli
        .color
        .unwrap_or(config.color)
        .enabled(env::var_os("NO_COLOR").is_some(), io::stdout().is_tty());
    if !color {
        yansi::disable();
    }
    let json = cli.json || config.json;
    let status = cli.status.or_else(|| env::var(STATUS_ENV).ok());

    let input = match &cli.input {
        Some(path) => Document::from_file(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?,
        None => Document::from_stdin().context("cannot read stdin")?,
    };

    let mut rules = cli.rules;
    if cli.interactive {
        let mut mode = InteractiveMode::new(&input, &rules, status.clone());
        match mode.run()? {
            Some(rule) => rules.push(rule),
            None => return Ok(()),
        }
    }

    let rule_set = parser::parse_rule_set(rules.as_slice(), &mut reporter);
    let pipeline = interpreter::compile(&rule_set, &mut reporter);
    let ctx = interpreter::Context::new(status);
    let output = Document::from(pipeline.run(input.into_lines(), &ctx));

    if cli.write {
        if let Some(path) = &cli.input {
            output
                .write_back(path)
                .with_context(|| format!("cannot write '{}'", path.display()))?;
        }
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut handle, &output).context("JSON serialization failed")?;
        writeln!(handle).context("write failed")?;
    } else {
        let highlighter = Highlighter::new(&rule_set);
        for line in &output.lines {
            let written = if color && !highlighter.is_empty() {
                writeln!(handle, "{}", highlighter.paint(line))
            } else {
                writeln!(handle, "{}", line)
            };
            written.context("write failed")?;
        }
    }
    Ok(())
}
