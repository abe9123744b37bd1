use std::io::{self, Write};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::object::Object;
use crate::session::Session;

const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Continue,
  Exit,
}

/// Renders a value for the terminal.
pub fn paint(value: &Object) -> String {
  match value {
    Object::Null | Object::Boolean(_) => value.to_string().cyan().to_string(),
    Object::Number(_) => value.to_string().yellow().to_string(),
    Object::String(s) => format!("{:?}", s).green().to_string(),
    Object::Object(_) => value.to_string(),
  }
}

/// Handles one line of input against `session`, writing the result or the
/// error to `output`.
pub fn handle_line<W: Write>(session: &mut Session, line: &str, output: &mut W) -> io::Result<Command> {
  let trimmed = line.trim();

  match trimmed {
    "" => return Ok(Command::Continue),
    "exit" | "quit" => return Ok(Command::Exit),
    ":env" => {
      let env = session.env();
      for name in env.names() {
        if let Ok(value) = env.lookup(&name) {
          let keyword = if env.is_constant(&name) { "const" } else { "let" };
          writeln!(output, "{} {} = {}", keyword, name, paint(&value))?;
        }
      }
      return Ok(Command::Continue);
    }
    _ => {}
  }

  match session.run(line) {
    Ok(value) => writeln!(output, "{}", paint(&value))?,
    Err(e) => writeln!(output, "{} {}", "error:".red(), e.report(line))?,
  }

  Ok(Command::Continue)
}

pub fn start(session: &mut Session) -> Result<(), ReadlineError> {
  let mut editor = DefaultEditor::new()?;
  let mut stdout = io::stdout();

  loop {
    match editor.readline(PROMPT) {
      Ok(line) => {
        editor.add_history_entry(line.as_str())?;
        if handle_line(session, &line, &mut stdout)? == Command::Exit {
          break;
        }
      }
      Err(ReadlineError::Interrupted) => {
        debug!("interrupted");
        continue;
      }
      Err(ReadlineError::Eof) => break,
      Err(e) => return Err(e),
    }
  }

  Ok(())
}
