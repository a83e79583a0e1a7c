//! Command line front end: parse a descriptor → (json | paths | tokens)
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use dtp::display;
use dtp::parser::lexer::Lexer;
use dtp::parser::parse::{parse_with, ParserConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// parse a nested data type descriptor such as `STRUCT<a INT64, b ARRAY<STRING>>`
#[derive(Parser, Debug)]
#[command(name = "dtp", version)]
pub struct CommandLineInterface {
    /// the descriptor text; read from --file or stdin when omitted
    source: Option<String>,

    /// read the descriptor from a file
    #[arg(short, long, conflicts_with = "source")]
    file: Option<PathBuf>,

    /// what to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// dump the token stream instead of parsing
    #[arg(long, default_value_t = false)]
    tokens: bool,

    /// accept unrecognised characters instead of failing: stray ones are
    /// skipped, ones inside a word stay part of it (`my-col` is one name)
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// maximum container nesting depth (1 to 256)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_parser = parse_max_depth)]
    max_depth: usize,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// the AST as pretty JSON
    Json,
    /// one `path  TYPE` line per field
    Paths,
    /// JSON followed by the path listing
    Both,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        let source = self.read_source()?;
        let config = ParserConfig {
            lenient: self.lenient,
            max_depth: self.max_depth,
        };

        let rendered = if self.tokens {
            render_tokens(&source, config)?
        } else {
            let nodes = parse_with(&source, config).context("failed to parse data type")?;
            info!("parsed {} top-level declaration(s)", nodes.len());

            match self.format {
                OutputFormat::Json => display::to_json(&nodes)?,
                OutputFormat::Paths => display::render_paths(&nodes),
                OutputFormat::Both => format!(
                    "{}\n\n{}",
                    display::to_json(&nodes)?,
                    display::render_paths(&nodes)
                ),
            }
        };

        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, &rendered)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => println!("{}", rendered.trim_end()),
        }

        Ok(())
    }

    fn read_source(&self) -> Result<String> {
        if let Some(source) = self.source.as_ref() {
            return Ok(source.clone());
        }
        if let Some(path) = self.file.as_ref() {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }

        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        Ok(source)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_max_depth(value: &str) -> std::result::Result<usize, String> {
    let depth: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
        return Err(format!("must be between 1 and {MAX_DEPTH_LIMIT}"));
    }
    Ok(depth)
}

fn render_tokens(source: &str, config: ParserConfig) -> Result<String> {
    let tokens = Lexer::new(source)
        .lenient(config.lenient)
        .tokenize()
        .context("failed to tokenize data type")?;

    let mut out = String::new();
    for token in tokens {
        let loc = token.location();
        out.push_str(&format!("{:>4}:{:<4} {}\n", loc.line, loc.column, token));
    }
    Ok(out)
}
