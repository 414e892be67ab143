//! Whitelist-based expression evaluator
//!
//! Evaluates the arithmetic and boolean expressions templates carry:
//! `+ - * /`, comparisons, `&&` / `||`, unary minus, parentheses and
//! the functions ceil, floor, min and max. Variables resolve against a
//! caller-supplied map at tokenization time; anything else is rejected.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,

    #[error("variable '{0}' not found in context")]
    UnknownVariable(String),

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("missing closing parenthesis")]
    MissingParen,

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{func} requires {expected} argument(s), got {got}")]
    WrongArity {
        func: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("unexpected token")]
    UnexpectedToken,

    #[error("trailing input after expression")]
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Function(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    Comma,
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
    And,
    Or,
}

/// Evaluate a numeric expression against the variable context
pub fn eval_numeric(expr: &str, vars: &HashMap<String, f64>) -> Result<f64, ExprError> {
    let tokens = tokenize(expr, vars)?;
    let mut parser = Parser::new(tokens);
    let value = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(value)
}

/// Evaluate a boolean expression; a bare numeric expression is true
/// when non-zero
pub fn eval_bool(expr: &str, vars: &HashMap<String, f64>) -> Result<bool, ExprError> {
    let tokens = tokenize(expr, vars)?;
    let mut parser = Parser::new(tokens);
    let value = parser.parse_or()?;
    parser.expect_end()?;
    Ok(value)
}

fn tokenize(expr: &str, vars: &HashMap<String, f64>) -> Result<Vec<Token>, ExprError> {
    if expr.trim().is_empty() {
        return Err(ExprError::Empty);
    }

    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(literal))?;
            tokens.push(Token::Number(value));
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();

            // A name followed by '(' is a function call; otherwise it
            // must resolve in the variable whitelist
            if i < chars.len() && chars[i] == '(' {
                tokens.push(Token::Function(name));
            } else {
                let value = vars
                    .get(&name)
                    .ok_or_else(|| ExprError::UnknownVariable(name))?;
                tokens.push(Token::Number(*value));
            }
            continue;
        }

        if i + 1 < chars.len() {
            let two: String = chars[i..i + 2].iter().collect();
            if let Some(token) = operator_token(&two) {
                tokens.push(token);
                i += 2;
                continue;
            }
        }

        let one = c.to_string();
        match operator_token(&one) {
            Some(token) => {
                tokens.push(token);
                i += 1;
            }
            None => return Err(ExprError::UnexpectedChar(c)),
        }
    }

    Ok(tokens)
}

fn operator_token(op: &str) -> Option<Token> {
    match op {
        "+" => Some(Token::Plus),
        "-" => Some(Token::Minus),
        "*" => Some(Token::Multiply),
        "/" => Some(Token::Divide),
        "(" => Some(Token::LParen),
        ")" => Some(Token::RParen),
        "," => Some(Token::Comma),
        ">=" => Some(Token::Gte),
        "<=" => Some(Token::Lte),
        "==" => Some(Token::Eq),
        "!=" => Some(Token::Neq),
        ">" => Some(Token::Gt),
        "<" => Some(Token::Lt),
        "&&" => Some(Token::And),
        "||" => Some(Token::Or),
        _ => None,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn matches(&self, token: &Token) -> bool {
        self.current() == Some(token)
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        if self.pos < self.tokens.len() {
            return Err(ExprError::TrailingInput);
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<bool, ExprError> {
        let mut left = self.parse_and()?;
        while self.matches(&Token::Or) {
            self.consume();
            let right = self.parse_and()?;
            left = left || right;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<bool, ExprError> {
        let mut left = self.parse_comparison()?;
        while self.matches(&Token::And) {
            self.consume();
            let right = self.parse_comparison()?;
            left = left && right;
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<bool, ExprError> {
        let left = self.parse_expression()?;
        let op = match self.current() {
            Some(
                t @ (Token::Gt | Token::Lt | Token::Gte | Token::Lte | Token::Eq | Token::Neq),
            ) => t.clone(),
            _ => return Ok(left != 0.0),
        };
        self.consume();
        let right = self.parse_expression()?;
        // Equality on floats uses an absolute epsilon
        Ok(match op {
            Token::Gt => left > right,
            Token::Lt => left < right,
            Token::Gte => left >= right,
            Token::Lte => left <= right,
            Token::Eq => (left - right).abs() < 0.0001,
            Token::Neq => (left - right).abs() >= 0.0001,
            _ => unreachable!(),
        })
    }

    fn parse_expression(&mut self) -> Result<f64, ExprError> {
        let mut result = self.parse_term()?;
        loop {
            if self.matches(&Token::Plus) {
                self.consume();
                result += self.parse_term()?;
            } else if self.matches(&Token::Minus) {
                self.consume();
                result -= self.parse_term()?;
            } else {
                break;
            }
        }
        Ok(result)
    }

    fn parse_term(&mut self) -> Result<f64, ExprError> {
        let mut result = self.parse_factor()?;
        loop {
            if self.matches(&Token::Multiply) {
                self.consume();
                result *= self.parse_factor()?;
            } else if self.matches(&Token::Divide) {
                self.consume();
                let divisor = self.parse_factor()?;
                if divisor == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                result /= divisor;
            } else {
                break;
            }
        }
        Ok(result)
    }

    fn parse_factor(&mut self) -> Result<f64, ExprError> {
        let token = self.current().cloned().ok_or(ExprError::UnexpectedEnd)?;

        match token {
            Token::Minus => {
                self.consume();
                Ok(-self.parse_factor()?)
            }
            Token::Number(value) => {
                self.consume();
                Ok(value)
            }
            Token::LParen => {
                self.consume();
                let result = self.parse_expression()?;
                if !self.matches(&Token::RParen) {
                    return Err(ExprError::MissingParen);
                }
                self.consume();
                Ok(result)
            }
            Token::Function(name) => {
                self.consume();
                if !self.matches(&Token::LParen) {
                    return Err(ExprError::UnexpectedToken);
                }
                self.consume();

                let mut args = Vec::new();
                if !self.matches(&Token::RParen) {
                    args.push(self.parse_expression()?);
                    while self.matches(&Token::Comma) {
                        self.consume();
                        args.push(self.parse_expression()?);
                    }
                }
                if !self.matches(&Token::RParen) {
                    return Err(ExprError::MissingParen);
                }
                self.consume();

                apply_function(&name, &args)
            }
            _ => Err(ExprError::UnexpectedToken),
        }
    }
}

fn apply_function(name: &str, args: &[f64]) -> Result<f64, ExprError> {
    match name.to_lowercase().as_str() {
        "ceil" => match args {
            [x] => Ok(x.ceil()),
            _ => Err(ExprError::WrongArity {
                func: "ceil",
                expected: 1,
                got: args.len(),
            }),
        },
        "floor" => match args {
            [x] => Ok(x.floor()),
            _ => Err(ExprError::WrongArity {
                func: "floor",
                expected: 1,
                got: args.len(),
            }),
        },
        "min" => match args {
            [a, b] => Ok(a.min(*b)),
            _ => Err(ExprError::WrongArity {
                func: "min",
                expected: 2,
                got: args.len(),
            }),
        },
        "max" => match args {
            [a, b] => Ok(a.max(*b)),
            _ => Err(ExprError::WrongArity {
                func: "max",
                expected: 2,
                got: args.len(),
            }),
        },
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}
