use tracing::instrument;

use crate::ast::{BinaryOperator, Expression, Program, Property, Statement};
use crate::env::Env;
use crate::error::RuntimeError;
use crate::object::{Object, Properties};
use crate::token::Span;

#[derive(Debug)]
pub struct Evaluator {
  pub env: Env,
}

impl Evaluator {
  pub fn new(env: Env) -> Self {
    Evaluator {
      env
    }
  }

  fn eval_numeric_binary_expression(left: f64, op: BinaryOperator, right: f64, span: Span) -> Result<Object, RuntimeError> {
    let result = match op {
      BinaryOperator::Add => left + right,
      BinaryOperator::Subtract => left - right,
      BinaryOperator::Multiply => left * right,
      BinaryOperator::Divide => {
        if right == 0.0 {
          return Err(RuntimeError::DivisionByZero { span: Some(span) });
        }
        left / right
      }
      BinaryOperator::Modulo => left % right,
    };

    Ok(Object::Number(result))
  }

  fn eval_binary_expression(&self, left: &Expression, op: BinaryOperator, right: &Expression, span: Span) -> Result<Object, RuntimeError> {
    let left = self.eval_expression(left)?;
    let right = self.eval_expression(right)?;

    match (left, right) {
      (Object::Number(left), Object::Number(right)) => Self::eval_numeric_binary_expression(left, op, right, span),
      // Anything but two numbers yields null rather than an error.
      _ => Ok(Object::Null),
    }
  }

  fn eval_identifier(&self, name: &str, span: Span) -> Result<Object, RuntimeError> {
    self.env.lookup(name).map_err(|e| e.at(span))
  }

  fn eval_assignment_expression(&self, assignee: &Expression, value: &Expression, span: Span) -> Result<Object, RuntimeError> {
    let (name, name_span) = match assignee {
      Expression::Identifier { name, span } => (name, *span),
      _ => return Err(RuntimeError::InvalidAssignee { span: Some(span) }),
    };

    let value = self.eval_expression(value)?;
    self.env.assign(name, value).map_err(|e| e.at(name_span))
  }

  fn eval_object_expression(&self, properties: &[Property]) -> Result<Object, RuntimeError> {
    let mut object = Properties::new();

    for property in properties {
      let value = match &property.value {
        Some(value) => self.eval_expression(value)?,
        None => self.eval_identifier(&property.key, property.span)?,
      };
      object.insert(property.key.clone(), value);
    }

    Ok(Object::Object(object))
  }

  pub fn eval_expression(&self, expression: &Expression) -> Result<Object, RuntimeError> {
    match expression {
      Expression::Identifier { name, span } => self.eval_identifier(name, *span),
      Expression::NumericLiteral(value) => Ok(Object::Number(*value)),
      Expression::StringLiteral(value) => Ok(Object::String(value.clone())),
      Expression::Binary { left, operator, right, span } => self.eval_binary_expression(left, *operator, right, *span),
      Expression::Assignment { assignee, value, span } => self.eval_assignment_expression(assignee, value, *span),
      Expression::Object(properties) => self.eval_object_expression(properties),
    }
  }

  pub fn eval_statement(&self, statement: &Statement) -> Result<Object, RuntimeError> {
    match statement {
      Statement::VarDeclaration { name, constant, value, span } => {
        let value = match value {
          Some(value) => self.eval_expression(value)?,
          None => Object::Null,
        };

        self.env.declare(name, value, *constant).map_err(|e| e.at(*span))
      },
      Statement::Expression(expression) => self.eval_expression(expression),
    }
  }

  pub fn eval_program(&self, program: &Program) -> Result<Object, RuntimeError> {
    let mut result = Object::Null;

    for statement in &program.body {
      result = self.eval_statement(statement)?;
    }

    Ok(result)
  }
}

/// Evaluates `program` against `env`. Declarations and assignments stay
/// visible in `env` afterwards, even when a later statement fails.
#[instrument(level = "debug", skip_all)]
pub fn evaluate(program: &Program, env: &Env) -> Result<Object, RuntimeError> {
  Evaluator::new(env.clone()).eval_program(program)
}
