use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Number,
  String,
  Identifier,

  Equals,
  Comma,
  Colon,
  OpenBrace,
  CloseBrace,
  OpenParen,
  CloseParen,
  BinaryOperator,

  Let,
  Const,

  EndOfInput,
}

impl TokenKind {
  /// Keyword lookup. Case sensitive: `Let` is an identifier.
  pub fn keyword(ident: &str) -> Option<TokenKind> {
    match ident {
      "let" => Some(TokenKind::Let),
      "const" => Some(TokenKind::Const),
      _ => None,
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TokenKind::Number => "number",
      TokenKind::String => "string",
      TokenKind::Identifier => "identifier",
      TokenKind::Equals => "'='",
      TokenKind::Comma => "','",
      TokenKind::Colon => "':'",
      TokenKind::OpenBrace => "'{'",
      TokenKind::CloseBrace => "'}'",
      TokenKind::OpenParen => "'('",
      TokenKind::CloseParen => "')'",
      TokenKind::BinaryOperator => "operator",
      TokenKind::Let => "'let'",
      TokenKind::Const => "'const'",
      TokenKind::EndOfInput => "end of input",
    };
    f.write_str(name)
  }
}

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span(pub usize, pub usize);

impl Span {
  /// 1-based line and column of the start of the span.
  pub fn location(&self, source: &str) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (offset, c) in source.char_indices() {
      if offset >= self.0 {
        break;
      }
      if c == '\n' {
        line += 1;
        column = 1;
      } else {
        column += 1;
      }
    }

    (line, column)
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}", self.0, self.1)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub kind: TokenKind,
  pub slice: String,
  pub span: Span,
}

impl Token {
  pub fn new(kind: TokenKind, slice: String, span: Span) -> Token {
    Token {
      kind,
      slice,
      span,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keywords_are_case_sensitive() {
    assert_eq!(TokenKind::keyword("let"), Some(TokenKind::Let));
    assert_eq!(TokenKind::keyword("const"), Some(TokenKind::Const));
    assert_eq!(TokenKind::keyword("Let"), None);
    assert_eq!(TokenKind::keyword("variable"), None);
  }

  #[test]
  fn location_counts_lines_and_columns() {
    let source = "let a = 1\nlet b = 2";
    assert_eq!(Span(0, 3).location(source), (1, 1));
    assert_eq!(Span(4, 5).location(source), (1, 5));
    assert_eq!(Span(14, 15).location(source), (2, 5));
  }
}
