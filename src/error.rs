use thiserror::Error;

use crate::token::{Span, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
  #[error("unrecognized character '{character}' found in source")]
  UnrecognizedCharacter { character: char, span: Span },

  #[error("unterminated string literal")]
  UnterminatedString { span: Span },
}

impl LexError {
  pub fn span(&self) -> Span {
    match self {
      LexError::UnrecognizedCharacter { span, .. } => *span,
      LexError::UnterminatedString { span } => *span,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
  #[error("unexpected token {kind} '{slice}'")]
  UnexpectedToken { kind: TokenKind, slice: String, span: Span },

  #[error("expected {expected}, found {found}")]
  ExpectedToken { expected: TokenKind, found: TokenKind, span: Span },

  #[error("constant '{name}' requires a value")]
  MissingConstantValue { name: String, span: Span },

  #[error("number literal '{slice}' is too large")]
  InvalidNumber { slice: String, span: Span },

  #[error("expression nests deeper than {limit} levels")]
  NestingTooDeep { limit: usize, span: Span },
}

impl ParseError {
  pub fn span(&self) -> Span {
    match self {
      ParseError::UnexpectedToken { span, .. }
      | ParseError::ExpectedToken { span, .. }
      | ParseError::MissingConstantValue { span, .. }
      | ParseError::InvalidNumber { span, .. }
      | ParseError::NestingTooDeep { span, .. } => *span,
    }
  }
}

/// Errors raised while evaluating. Errors coming out of the scope chain have
/// no span until the evaluator attaches the offending node's span with
/// [`RuntimeError::at`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
  #[error("cannot resolve '{name}', as it does not exist")]
  UnresolvedSymbol { name: String, span: Option<Span> },

  #[error("cannot declare '{name}', as it is already defined")]
  DuplicateDeclaration { name: String, span: Option<Span> },

  #[error("cannot reassign '{name}', as it was declared constant")]
  ConstantReassignment { name: String, span: Option<Span> },

  #[error("invalid assignment target, expected an identifier")]
  InvalidAssignee { span: Option<Span> },

  #[error("division by zero")]
  DivisionByZero { span: Option<Span> },
}

impl RuntimeError {
  pub fn unresolved(name: &str) -> Self {
    RuntimeError::UnresolvedSymbol { name: name.to_owned(), span: None }
  }

  pub fn span(&self) -> Option<Span> {
    match self {
      RuntimeError::UnresolvedSymbol { span, .. }
      | RuntimeError::DuplicateDeclaration { span, .. }
      | RuntimeError::ConstantReassignment { span, .. }
      | RuntimeError::InvalidAssignee { span }
      | RuntimeError::DivisionByZero { span } => *span,
    }
  }

  /// Attaches `at` unless the error already carries a span.
  pub fn at(mut self, at: Span) -> Self {
    let slot = match &mut self {
      RuntimeError::UnresolvedSymbol { span, .. }
      | RuntimeError::DuplicateDeclaration { span, .. }
      | RuntimeError::ConstantReassignment { span, .. }
      | RuntimeError::InvalidAssignee { span }
      | RuntimeError::DivisionByZero { span } => span,
    };
    if slot.is_none() {
      *slot = Some(at);
    }
    self
  }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("lex error: {0}")]
  Lex(#[from] LexError),

  #[error("parse error: {0}")]
  Parse(#[from] ParseError),

  #[error("runtime error: {0}")]
  Runtime(#[from] RuntimeError),
}

impl Error {
  pub fn span(&self) -> Option<Span> {
    match self {
      Error::Lex(e) => Some(e.span()),
      Error::Parse(e) => Some(e.span()),
      Error::Runtime(e) => e.span(),
    }
  }

  /// Renders the error with a line/column position resolved against `source`.
  pub fn report(&self, source: &str) -> String {
    match self.span() {
      Some(span) => {
        let (line, column) = span.location(source);
        format!("{} at line {}, column {}", self, line, column)
      }
      None => self.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn at_keeps_the_innermost_span() {
    let error = RuntimeError::unresolved("x").at(Span(4, 5)).at(Span(0, 9));
    assert_eq!(error.span(), Some(Span(4, 5)));
  }

  #[test]
  fn report_includes_position() {
    let error = Error::from(LexError::UnrecognizedCharacter { character: '$', span: Span(10, 11) });
    assert_eq!(
      error.report("let a = 1\n$"),
      "lex error: unrecognized character '$' found in source at line 2, column 1"
    );
  }
}
