use tracing::instrument;

use crate::env::Env;
use crate::error::Error;
use crate::evaluator::evaluate;
use crate::object::Object;
use crate::parser::parse;

/// One interpreter session: a global scope that outlives individual runs, so
/// a REPL line can use what an earlier line declared.
#[derive(Debug)]
pub struct Session {
  env: Env,
}

impl Session {
  pub fn new() -> Self {
    Session {
      env: Env::global(),
    }
  }

  pub fn with_env(env: Env) -> Self {
    Session {
      env,
    }
  }

  pub fn env(&self) -> &Env {
    &self.env
  }

  #[instrument(level = "debug", skip(self))]
  pub fn run(&mut self, source: &str) -> Result<Object, Error> {
    let program = parse(source)?;
    Ok(evaluate(&program, &self.env)?)
  }
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}
