use crate::config::{Config, load_config};
use crate::ir::Diagram;
use crate::{from_base64, from_code, from_json, to_base64, to_json, to_tex_with_config};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info, trace};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "tikzcd", version, about = "Convert commutative diagrams between tikz-cd, JSON and base64")]
pub struct Args {
    /// Input file (.tex, .json, .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Input format
    #[arg(short = 'f', long = "from", value_enum, default_value = "tex")]
    pub from: Format,

    /// Output format
    #[arg(short = 't', long = "to", value_enum, default_value = "json")]
    pub to: Format,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Tex,
    Json,
    Base64,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(args:?; "Parsed arguments");

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("Failed to load config {:?}", args.config))?;

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let diagrams = if is_markdown {
        extract_tikzcd_blocks(&input)
    } else {
        vec![input]
    };

    if diagrams.is_empty() {
        return Err(anyhow::anyhow!("No tikzcd diagrams found in input"));
    }

    let mut outputs = Vec::with_capacity(diagrams.len());
    for (idx, source) in diagrams.iter().enumerate() {
        let converted = convert(source, args.from, args.to, &config)
            .with_context(|| format!("Failed to convert diagram {}", idx + 1))?;
        outputs.push(converted);
    }
    info!(count = outputs.len(); "Converted diagrams");

    write_output(&outputs.join("\n\n"), args.output.as_deref())
}

pub fn convert(source: &str, from: Format, to: Format, config: &Config) -> Result<String> {
    let diagram: Diagram = match from {
        Format::Tex => from_code(source)?,
        Format::Json => from_json(source)?,
        Format::Base64 => from_base64(source)?,
    };
    let output = match to {
        Format::Tex => to_tex_with_config(&diagram, &config.tex)?,
        Format::Json => to_json(&diagram)?,
        Format::Base64 => to_base64(&diagram)?,
    };
    Ok(output)
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let is_markdown = path
                .extension()
                .is_some_and(|ext| ext == "md" || ext == "markdown");
            Ok((content, is_markdown))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok((buf, false))
        }
    }
}

fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}

/// Info-string languages whose fenced blocks hold tikzcd markup.
const DIAGRAM_LANGUAGES: [&str; 2] = ["tikzcd", "latex"];

/// Opening fence of a Markdown code block holding a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let marker = line.chars().next().filter(|ch| matches!(ch, '`' | '~'))?;
        let len = line.chars().take_while(|&ch| ch == marker).count();
        if len < 3 {
            return None;
        }
        let language = line[len..].split_whitespace().next()?;
        DIAGRAM_LANGUAGES
            .contains(&language)
            .then_some(Self { marker, len })
    }

    /// Same marker, at least as long as the opening run, nothing after it.
    fn closes(&self, line: &str) -> bool {
        let run = line.chars().take_while(|&ch| ch == self.marker).count();
        run >= self.len && line[run..].trim().is_empty()
    }
}

/// Collects the bodies of diagram blocks. A block left open runs to the end
/// of the input.
fn extract_tikzcd_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let Some(fence) = Fence::open(line.trim()) else {
            continue;
        };
        let body: Vec<&str> = lines
            .by_ref()
            .take_while(|line| !fence.closes(line.trim()))
            .collect();
        trace!(fence:?, lines = body.len(); "Found diagram block");
        blocks.push(body.join("\n"));
    }
    blocks
}
