use std::iter::Peekable;
use std::str::CharIndices;

use tracing::trace;

use crate::error::LexError;
use crate::token::{Span, Token, TokenKind};

fn is_alpha(c: char) -> bool {
    c.to_uppercase().ne(c.to_lowercase())
}

fn is_skippable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn is_binary_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%')
}

fn structural(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        '{' => Some(TokenKind::OpenBrace),
        '}' => Some(TokenKind::CloseBrace),
        ',' => Some(TokenKind::Comma),
        ':' => Some(TokenKind::Colon),
        '=' => Some(TokenKind::Equals),
        _ => None,
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            tokens: Vec::new(),
        }
    }

    /// Consumes the whole source. The result always ends with a single
    /// `EndOfInput` token.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(&(start, c)) = self.chars.peek() {
            if c == '"' {
                self.string(start)?;
            } else if c == '#' {
                self.skip_while(|c| c != '\n');
            } else if let Some(kind) = structural(c) {
                self.chars.next();
                self.push(kind, start, start + c.len_utf8());
            } else if is_binary_operator(c) {
                self.chars.next();
                self.push(TokenKind::BinaryOperator, start, start + c.len_utf8());
            } else if c.is_ascii_digit() {
                let end = self.skip_while(|c| c.is_ascii_digit());
                self.push(TokenKind::Number, start, end);
            } else if is_alpha(c) {
                let end = self.skip_while(is_alpha);
                let kind = TokenKind::keyword(&self.source[start..end]).unwrap_or(TokenKind::Identifier);
                self.push(kind, start, end);
            } else if is_skippable(c) {
                self.chars.next();
            } else {
                return Err(LexError::UnrecognizedCharacter {
                    character: c,
                    span: Span(start, start + c.len_utf8()),
                });
            }
        }

        let end = self.source.len();
        self.tokens.push(Token::new(TokenKind::EndOfInput, String::new(), Span(end, end)));

        Ok(self.tokens)
    }

    fn string(&mut self, start: usize) -> Result<(), LexError> {
        self.chars.next();

        let content_start = start + 1;
        let content_end = self.skip_while(|c| c != '"');

        match self.chars.next() {
            Some((_, '"')) => {
                let slice = self.source[content_start..content_end].to_owned();
                trace!(kind = ?TokenKind::String, %slice, "token");
                self.tokens.push(Token::new(TokenKind::String, slice, Span(start, content_end + 1)));
                Ok(())
            }
            _ => Err(LexError::UnterminatedString { span: Span(start, content_end) }),
        }
    }

    /// Advances past every character matching `predicate` and returns the
    /// byte offset of the first one that does not.
    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        while let Some(&(offset, c)) = self.chars.peek() {
            if !predicate(c) {
                return offset;
            }
            self.chars.next();
        }

        self.source.len()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let slice = &self.source[start..end];
        trace!(?kind, slice, "token");
        self.tokens.push(Token::new(kind, slice.to_owned(), Span(start, end)));
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}
