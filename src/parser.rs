use tracing::{debug, instrument};

use crate::ast::{BinaryOperator, Expression, Program, Property, Statement};
use crate::error::{Error, ParseError};
use crate::lexer::tokenize;
use crate::token::{Span, Token, TokenKind};

/// Deepest nesting of parenthesised expressions, object literals and chained
/// assignments the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// Tallest operator tree the parser builds, measured with
/// [`Expression::height`]. A flat chain of `+ - * / %` holds at most this
/// many operators. Evaluating and dropping a tree recurse along its height.
pub const MAX_HEIGHT: usize = 1024;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    /// `tokens` must end with an `EndOfInput` token, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        while self.at().kind != TokenKind::EndOfInput {
            let statement = self.parse_statement()?;
            debug!(?statement, "parsed statement");
            program.body.push(statement);
        }

        Ok(program)
    }

    fn at(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    /// Returns the current token and advances, never moving past the end.
    fn eat(&mut self) -> Token {
        let token = self.at().clone();
        if token.kind != TokenKind::EndOfInput {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let token = self.eat();
        if token.kind != expected {
            return Err(ParseError::ExpectedToken {
                expected,
                found: token.kind,
                span: token.span,
            });
        }
        Ok(token)
    }

    /// The operator at the current position, if it is one of `accepted`.
    fn operator(&self, accepted: &[BinaryOperator]) -> Option<BinaryOperator> {
        let token = self.at();
        if token.kind != TokenKind::BinaryOperator {
            return None;
        }
        token
            .slice
            .parse::<BinaryOperator>()
            .ok()
            .filter(|operator| accepted.contains(operator))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.at().kind {
            TokenKind::Let | TokenKind::Const => self.parse_var_declaration(),
            _ => Ok(Statement::Expression(self.parse_expression()?)),
        }
    }

    fn parse_var_declaration(&mut self) -> Result<Statement, ParseError> {
        let keyword = self.eat();
        let constant = keyword.kind == TokenKind::Const;
        let identifier = self.expect(TokenKind::Identifier)?;
        let span = Span(keyword.span.0, identifier.span.1);

        if self.at().kind != TokenKind::Equals {
            if constant {
                return Err(ParseError::MissingConstantValue {
                    name: identifier.slice,
                    span: identifier.span,
                });
            }

            return Ok(Statement::VarDeclaration {
                name: identifier.slice,
                constant,
                value: None,
                span,
            });
        }

        self.eat();
        let value = self.parse_expression()?;

        Ok(Statement::VarDeclaration {
            name: identifier.slice,
            constant,
            value: Some(value),
            span,
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        self.depth += 1;
        let result = if self.depth > MAX_DEPTH {
            Err(ParseError::NestingTooDeep {
                limit: MAX_DEPTH,
                span: self.at().span,
            })
        } else {
            self.parse_assignment_tail()
        };
        self.depth -= 1;
        result
    }

    /// Height of `left <op> right` given the height of `left`.
    fn fold_height(left: usize, right: &Expression, span: Span) -> Result<usize, ParseError> {
        let height = left.max(right.height()) + 1;
        if height > MAX_HEIGHT {
            return Err(ParseError::NestingTooDeep { limit: MAX_HEIGHT, span });
        }
        Ok(height)
    }

    fn parse_assignment_tail(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_object()?;

        if self.at().kind != TokenKind::Equals {
            return Ok(left);
        }

        let equals = self.eat();
        let value = self.parse_assignment()?;

        Ok(Expression::Assignment {
            assignee: Box::new(left),
            value: Box::new(value),
            span: equals.span,
        })
    }

    fn parse_object(&mut self) -> Result<Expression, ParseError> {
        if self.at().kind != TokenKind::OpenBrace {
            return self.parse_additive();
        }

        self.eat();
        let mut properties = Vec::new();

        while !matches!(self.at().kind, TokenKind::EndOfInput | TokenKind::CloseBrace) {
            let key = self.expect(TokenKind::Identifier)?;

            match self.at().kind {
                TokenKind::Comma => {
                    self.eat();
                    properties.push(Property { key: key.slice, value: None, span: key.span });
                    continue;
                }
                TokenKind::CloseBrace => {
                    properties.push(Property { key: key.slice, value: None, span: key.span });
                    continue;
                }
                _ => {}
            }

            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression()?;
            properties.push(Property { key: key.slice, value: Some(value), span: key.span });

            if self.at().kind != TokenKind::CloseBrace {
                self.expect(TokenKind::Comma)?;
            }
        }

        self.expect(TokenKind::CloseBrace)?;

        Ok(Expression::Object(properties))
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let mut height = left.height();

        while let Some(operator) = self.operator(&[BinaryOperator::Add, BinaryOperator::Subtract]) {
            let span = self.eat().span;
            let right = self.parse_multiplicative()?;
            height = Self::fold_height(height, &right, span)?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_primary()?;
        let mut height = left.height();

        while let Some(operator) = self.operator(&[
            BinaryOperator::Multiply,
            BinaryOperator::Divide,
            BinaryOperator::Modulo,
        ]) {
            let span = self.eat().span;
            let right = self.parse_primary()?;
            height = Self::fold_height(height, &right, span)?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.eat();

        match token.kind {
            TokenKind::Identifier => Ok(Expression::Identifier {
                name: token.slice,
                span: token.span,
            }),
            TokenKind::Number => match token.slice.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Expression::NumericLiteral(value)),
                _ => Err(ParseError::InvalidNumber {
                    slice: token.slice,
                    span: token.span,
                }),
            },
            TokenKind::String => Ok(Expression::StringLiteral(token.slice)),
            TokenKind::OpenParen => {
                let value = self.parse_expression()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(value)
            }
            kind => Err(ParseError::UnexpectedToken {
                kind,
                slice: token.slice,
                span: token.span,
            }),
        }
    }
}

#[instrument(level = "debug", skip_all)]
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).parse()?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::LexError;

    fn expression(source: &str) -> Expression {
        let mut program = parse(source).unwrap();
        assert_eq!(program.body.len(), 1);
        match program.body.remove(0) {
            Statement::Expression(expression) => expression,
            statement => panic!("expected an expression, got {:?}", statement),
        }
    }

    fn parse_error(source: &str) -> ParseError {
        match parse(source) {
            Err(Error::Parse(error)) => error,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    fn number(value: f64) -> Expression {
        Expression::NumericLiteral(value)
    }

    fn binary(left: Expression, operator: BinaryOperator, right: Expression, at: usize) -> Expression {
        Expression::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: Span(at, at + 1),
        }
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(
            expression("2 + 3 * 4"),
            binary(
                number(2.0),
                BinaryOperator::Add,
                binary(number(3.0), BinaryOperator::Multiply, number(4.0), 6),
                2
            )
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            expression("(2 + 3) * 4"),
            binary(
                binary(number(2.0), BinaryOperator::Add, number(3.0), 3),
                BinaryOperator::Multiply,
                number(4.0),
                8
            )
        );
    }

    #[test]
    fn additive_is_left_associative() {
        assert_eq!(
            expression("1 - 2 - 3"),
            binary(
                binary(number(1.0), BinaryOperator::Subtract, number(2.0), 2),
                BinaryOperator::Subtract,
                number(3.0),
                6
            )
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        let parsed = expression("a = b = 1");
        let Expression::Assignment { assignee, value, .. } = parsed else {
            panic!("expected an assignment");
        };
        assert_eq!(*assignee, Expression::Identifier { name: "a".to_owned(), span: Span(0, 1) });
        assert!(matches!(*value, Expression::Assignment { .. }));
    }

    #[test]
    fn assignee_is_not_validated() {
        assert!(matches!(expression("1 = 2"), Expression::Assignment { .. }));
    }

    #[test]
    fn declarations() {
        let program = parse("let a = 1 let b const c = \"x\"").unwrap();
        assert_eq!(
            program.body,
            vec![
                Statement::VarDeclaration {
                    name: "a".to_owned(),
                    constant: false,
                    value: Some(number(1.0)),
                    span: Span(0, 5),
                },
                Statement::VarDeclaration {
                    name: "b".to_owned(),
                    constant: false,
                    value: None,
                    span: Span(10, 15),
                },
                Statement::VarDeclaration {
                    name: "c".to_owned(),
                    constant: true,
                    value: Some(Expression::StringLiteral("x".to_owned())),
                    span: Span(16, 23),
                },
            ]
        );
    }

    #[test]
    fn object_literal_with_shorthand_and_trailing_comma() {
        assert_eq!(
            expression("{ a: 1, b, c: { d }, }"),
            Expression::Object(vec![
                Property { key: "a".to_owned(), value: Some(number(1.0)), span: Span(2, 3) },
                Property { key: "b".to_owned(), value: None, span: Span(8, 9) },
                Property {
                    key: "c".to_owned(),
                    value: Some(Expression::Object(vec![Property {
                        key: "d".to_owned(),
                        value: None,
                        span: Span(16, 17),
                    }])),
                    span: Span(11, 12),
                },
            ])
        );
    }

    #[test]
    fn empty_object() {
        assert_eq!(expression("{}"), Expression::Object(Vec::new()));
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse("  # nothing here").unwrap(), Program::default());
    }

    #[test]
    fn constant_requires_a_value() {
        assert_eq!(
            parse_error("const c"),
            ParseError::MissingConstantValue { name: "c".to_owned(), span: Span(6, 7) }
        );
    }

    #[test]
    fn missing_closing_paren() {
        assert_eq!(
            parse_error("(1 + 2"),
            ParseError::ExpectedToken {
                expected: TokenKind::CloseParen,
                found: TokenKind::EndOfInput,
                span: Span(6, 6),
            }
        );
    }

    #[test]
    fn missing_colon_in_object() {
        assert_eq!(
            parse_error("{ a 1 }"),
            ParseError::ExpectedToken {
                expected: TokenKind::Colon,
                found: TokenKind::Number,
                span: Span(4, 5),
            }
        );
    }

    #[test]
    fn missing_comma_in_object() {
        assert_eq!(
            parse_error("{ a: 1 b: 2 }"),
            ParseError::ExpectedToken {
                expected: TokenKind::Comma,
                found: TokenKind::Identifier,
                span: Span(7, 8),
            }
        );
    }

    #[test]
    fn missing_identifier_after_let() {
        assert!(matches!(
            parse_error("let = 1"),
            ParseError::ExpectedToken { expected: TokenKind::Identifier, found: TokenKind::Equals, .. }
        ));
    }

    #[test]
    fn unexpected_token_in_primary_position() {
        assert_eq!(
            parse_error("1 + * 2"),
            ParseError::UnexpectedToken {
                kind: TokenKind::BinaryOperator,
                slice: "*".to_owned(),
                span: Span(4, 5),
            }
        );
    }

    #[test]
    fn object_does_not_continue_into_additive() {
        assert!(matches!(parse_error("{ a: 1 } + 1"), ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn lex_errors_pass_through() {
        assert!(matches!(parse("let $"), Err(Error::Lex(LexError::UnrecognizedCharacter { .. }))));
    }

    #[test]
    fn number_literal_must_be_finite() {
        let digits = "9".repeat(400);
        assert_eq!(
            parse_error(&digits),
            ParseError::InvalidNumber { slice: digits.clone(), span: Span(0, 400) }
        );
        assert_eq!(expression(&"9".repeat(300)), number("9".repeat(300).parse().unwrap()));
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let source = format!("1{}", " + 1".repeat(20_000));
        assert!(matches!(parse_error(&source), ParseError::NestingTooDeep { limit: MAX_HEIGHT, .. }));

        let source = format!("2{}", " * 2 - 1".repeat(20_000));
        assert!(matches!(parse_error(&source), ParseError::NestingTooDeep { limit: MAX_HEIGHT, .. }));
    }

    #[test]
    fn nested_chains_share_the_height_budget() {
        let chain = " + 1".repeat(MAX_HEIGHT / 4);
        let source = format!("{}1{}", "(".repeat(8), format!("{})", chain).repeat(8));
        assert!(matches!(parse_error(&source), ParseError::NestingTooDeep { limit: MAX_HEIGHT, .. }));

        let source = format!("{}1{}", "(".repeat(3), format!("{})", chain).repeat(3));
        assert_eq!(expression(&source).height(), 3 * (MAX_HEIGHT / 4));
    }

    #[test]
    fn chain_at_the_height_limit_parses() {
        let source = format!("1{}", " + 1".repeat(MAX_HEIGHT));
        assert_eq!(expression(&source).height(), MAX_HEIGHT);
    }

    #[test]
    fn nesting_is_bounded() {
        let source = format!("{}1{}", "(".repeat(MAX_DEPTH + 10), ")".repeat(MAX_DEPTH + 10));
        assert!(matches!(parse_error(&source), ParseError::NestingTooDeep { limit: MAX_DEPTH, .. }));

        let source = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(expression(&source), number(1.0));
    }
}
