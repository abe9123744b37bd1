use std::fs;
use std::process;

use chrono::Utc;
use clap::{Arg, ArgMatches, Command};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use slang::repl::{self, paint};
use slang::{parse, tokenize, Error, Session};

struct Options {
  file: Option<String>,
  source: Option<String>,
  tokens: bool,
  ast: bool,
  time: bool,
}

impl Options {
  fn from_matches(matches: &ArgMatches) -> Self {
    Options {
      file: matches.value_of("file").map(str::to_owned),
      source: matches.value_of("eval").map(str::to_owned),
      tokens: matches.is_present("tokens"),
      ast: matches.is_present("ast"),
      time: matches.is_present("time"),
    }
  }
}

fn cli() -> Command<'static> {
  Command::new("slang")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Run slang programs, or start a REPL when no input is given")
    .arg(Arg::new("file")
      .value_name("FILE")
      .help("Source file to run")
      .index(1))
    .arg(Arg::new("eval")
      .short('e')
      .long("eval")
      .value_name("SOURCE")
      .takes_value(true)
      .conflicts_with("file")
      .help("Evaluate SOURCE instead of reading a file"))
    .arg(Arg::new("tokens")
      .long("tokens")
      .help("Print the token stream instead of evaluating"))
    .arg(Arg::new("ast")
      .long("ast")
      .conflicts_with("tokens")
      .help("Print the parsed program instead of evaluating"))
    .arg(Arg::new("time")
      .long("time")
      .help("Report how long evaluation took"))
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn run_source(source: &str, options: &Options) -> Result<(), String> {
  if options.tokens {
    let tokens = tokenize(source).map_err(|e| Error::from(e).report(source))?;
    for token in tokens {
      println!("{:<14} {:<10} {:?}", format!("{:?}", token.kind), token.span.to_string(), token.slice);
    }
    return Ok(());
  }

  if options.ast {
    let program = parse(source).map_err(|e| e.report(source))?;
    println!("{:#?}", program);
    return Ok(());
  }

  let mut session = Session::new();
  let started = Utc::now();
  let value = session.run(source).map_err(|e| e.report(source))?;
  let elapsed = Utc::now() - started;

  println!("{}", paint(&value));
  if options.time {
    eprintln!("evaluated in ~{} µs (wall clock)", elapsed.num_microseconds().unwrap_or(i64::MAX));
  }

  Ok(())
}

fn run(options: Options) -> Result<(), String> {
  if let Some(source) = &options.source {
    return run_source(source, &options);
  }

  if let Some(path) = &options.file {
    info!(path = %path, "running file");
    let source = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    return run_source(&source, &options);
  }

  println!("slang {} (type exit or press Ctrl-D to quit)", env!("CARGO_PKG_VERSION"));
  let mut session = Session::new();
  repl::start(&mut session).map_err(|e| e.to_string())?;
  debug!("repl finished");

  Ok(())
}

fn main() {
  init_tracing();

  let options = Options::from_matches(&cli().get_matches());

  if let Err(message) = run(options) {
    eprintln!("error: {}", message);
    process::exit(1);
  }
}
