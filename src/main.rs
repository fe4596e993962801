//! colorcode - format source code as syntax-colored HTML
//!
//! Reads a file (or standard input) and writes the HTML fragment to
//! standard output.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use colorcode::error::{ColorCodeError, Result};
use colorcode::formatter::{LOG_PARAM, SYNTAX_PARAM};
use colorcode::syntax::builtin;
use colorcode::{BuiltinBundles, ChainedResolver, DirectoryBundles, Formatter, Params};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    syntax: Option<String>,
    bundle_dirs: Vec<PathBuf>,
    defines: Vec<(String, String)>,
    log: bool,
    file: Option<PathBuf>,
}

enum Command {
    Format(Options),
    Help,
    Version,
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args)? {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            print_version();
            return Ok(());
        }
        Command::Format(options) => options,
    };

    if options.log {
        init_logging();
    }

    let source = match &options.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut resolver = ChainedResolver::new();
    for dir in &options.bundle_dirs {
        resolver = resolver.then(DirectoryBundles::new(dir));
    }
    let formatter = Formatter::with_resolver(resolver.then(BuiltinBundles));

    let html = formatter.format(Some(&source), &build_params(&options));

    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--syntax" | "-s" => options.syntax = Some(value_for(arg, iter.next())?.to_string()),
            "--bundle-dir" | "-d" => options.bundle_dirs.push(PathBuf::from(value_for(arg, iter.next())?)),
            "--define" | "-D" => options.defines.push(parse_define(value_for(arg, iter.next())?)?),
            "--log" => options.log = true,
            "-" => options.file = None,
            s if s.starts_with("-D") && s.len() > 2 => options.defines.push(parse_define(&s[2..])?),
            s if s.starts_with('-') => {
                return Err(ColorCodeError::Usage(format!("unknown option: {}", s)));
            }
            s => {
                if options.file.is_some() {
                    return Err(ColorCodeError::Usage("only one input file may be given".to_string()));
                }
                options.file = Some(PathBuf::from(s));
            }
        }
    }

    Ok(Command::Format(options))
}

fn value_for<'a>(option: &str, value: Option<&'a String>) -> Result<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| ColorCodeError::Usage(format!("{} requires a value", option)))
}

fn parse_define(define: &str) -> Result<(String, String)> {
    match define.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(ColorCodeError::Usage(format!("expected key=value, got: {}", define))),
    }
}

fn build_params(options: &Options) -> Params {
    let mut params = Params::new();
    if let Some(syntax) = &options.syntax {
        params.insert(SYNTAX_PARAM, syntax.as_str());
    }
    for (key, value) in &options.defines {
        params.insert(key, value.as_str());
    }
    if options.log {
        params.insert(LOG_PARAM, "true");
    }
    params
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("colorcode=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_usage() {
    println!("colorcode {} - format source code as syntax-colored HTML", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: colorcode [OPTIONS] [FILE]");
    println!();
    println!("Reads FILE (or standard input) and writes HTML to standard output.");
    println!();
    println!("Options:");
    println!("  -s, --syntax NAME       Use the syntax bundle NAME");
    println!("  -d, --bundle-dir DIR    Look for NAME.properties / NAME.toml in DIR");
    println!("  -D, --define KEY=VALUE  Override a single property");
    println!("      --log               Log diagnostics to stderr (RUST_LOG filters)");
    println!("  -h, --help              Show this help message");
    println!("  -V, --version           Show version information");
    println!();
    println!("Built-in syntaxes: {}", builtin::NAMES.join(", "));
}

fn print_version() {
    println!("colorcode {}", env!("CARGO_PKG_VERSION"));
}
