//! Chiffon command line
//!
//! Tokenizes, parses or minifies a script file (or stdin), or applies one of
//! those operations to each line typed at an interactive prompt.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chiffon::{MinifyOptions, ParseOptions, TokenizeOptions, minify, parse, tokenize};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, value_parser};
use eyre::WrapErr;
use log::{LevelFilter, debug};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

#[derive(Debug, Parser)]
#[command(version, about = "ECMAScript tokenizer, ESTree parser and minifier")]
struct App {
    #[command(flatten)]
    logging: LoggingArgs,
    #[command(subcommand)]
    command: Command,
}

/// Logging level from `-v[v]` or `-q[q]`
#[derive(Debug, Clone, Copy, Args)]
struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::Off,
            -1 => LevelFilter::Error,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token stream as JSON
    Tokenize {
        /// Script to read; stdin when omitted
        file: Option<PathBuf>,
        #[command(flatten)]
        options: TokenizeArgs,
    },
    /// Print the syntax tree as JSON
    Parse {
        file: Option<PathBuf>,
        #[command(flatten)]
        options: ParseArgs,
    },
    /// Print the minified source
    Minify {
        file: Option<PathBuf>,
        /// Soft limit on output line length
        #[arg(long, default_value_t = chiffon::options::DEFAULT_MAX_LINE_LEN)]
        max_line_len: usize,
    },
    /// Apply an operation to each line read interactively
    Repl {
        #[arg(long, value_enum, default_value_t = Mode::Parse)]
        mode: Mode,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct TokenizeArgs {
    /// Keep comments
    #[arg(long)]
    comment: bool,
    /// Keep line terminators
    #[arg(long)]
    line_terminator: bool,
    /// Keep whitespace
    #[arg(long)]
    white_space: bool,
    /// Record byte ranges
    #[arg(long)]
    range: bool,
    /// Record line/column locations
    #[arg(long)]
    loc: bool,
}

impl From<TokenizeArgs> for TokenizeOptions {
    fn from(args: TokenizeArgs) -> Self {
        TokenizeOptions {
            comment: args.comment,
            line_terminator: args.line_terminator,
            white_space: args.white_space,
            range: args.range,
            loc: args.loc,
        }
    }
}

#[derive(Debug, Clone, Copy, Args)]
struct ParseArgs {
    #[arg(long)]
    range: bool,
    #[arg(long)]
    loc: bool,
}

impl From<ParseArgs> for ParseOptions {
    fn from(args: ParseArgs) -> Self {
        ParseOptions {
            range: args.range,
            loc: args.loc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Tokenize,
    Parse,
    Minify,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let app = App::parse();
    env_logger::builder()
        .filter_level(app.logging.log_level_filter())
        .init();
    debug!("starting chiffon with args {app:?}");

    match app.command {
        Command::Tokenize { file, options } => {
            let source = read_source(file.as_deref())?;
            let tokens = tokenize(&source, &options.into());
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Command::Parse { file, options } => {
            let source = read_source(file.as_deref())?;
            let program = parse(&source, &options.into())?;
            println!("{}", serde_json::to_string_pretty(&program)?);
        }
        Command::Minify { file, max_line_len } => {
            let source = read_source(file.as_deref())?;
            print!("{}", minify(&source, &MinifyOptions { max_line_len }));
        }
        Command::Repl { mode } => run_repl(mode)?,
    }
    Ok(())
}

fn read_source(file: Option<&Path>) -> eyre::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).wrap_err_with(|| format!("could not read {}", path.display())),
        None => io::read_to_string(io::stdin()).wrap_err("could not read stdin"),
    }
}

fn run_repl(mode: Mode) -> eyre::Result<()> {
    println!("Chiffon ({mode:?} mode)");
    println!("Type JavaScript to process, Ctrl+D to exit.\n");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        editor.add_history_entry(line.as_str())?;

        match mode {
            Mode::Tokenize => {
                let tokens = tokenize(&line, &TokenizeOptions::default());
                println!("{}", serde_json::to_string(&tokens)?);
            }
            Mode::Parse => match parse(&line, &ParseOptions::default()) {
                Ok(program) => println!("{}", serde_json::to_string_pretty(&program)?),
                Err(e) => println!("SyntaxError: {e}"),
            },
            Mode::Minify => println!("{}", minify(&line, &MinifyOptions::default())),
        }
    }
    Ok(())
}
