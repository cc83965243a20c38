//! Arithmetic expression evaluation.
//!
//! The formula text is never executed as code: token contributions are
//! spliced in with word-boundary matching, the remaining arithmetic is
//! parsed by a recursive-descent grammar into a small AST, and the AST is
//! folded. Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := number | '(' expr ')' | '-' factor
//! ```

use thiserror::Error;

use crate::coerce::TokenMap;

/// Errors terminating a single price computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The substituted expression is not a well-formed arithmetic string.
    #[error("syntax error in formula: {0}")]
    Syntax(String),

    #[error("division by zero")]
    DivisionByZero,

    /// The arithmetic overflowed into an infinite or undefined value.
    #[error("formula result is not a finite number")]
    NonFinite,
}

/// Splices token contributions into the expression.
///
/// The expression is scanned left to right; each maximal identifier run
/// (bounded by non-identifier characters) is replaced as a whole, so one
/// token can never match inside another: `sqft` never hits `sqft2`.
/// All-digit runs pass through as numeric literals. Identifier runs with no
/// entry in `tokens` substitute as literal `0` and are returned for the
/// caller to surface as warnings.
pub fn substitute(expression: &str, tokens: &TokenMap) -> (String, Vec<String>) {
    let mut out: Vec<u8> = Vec::with_capacity(expression.len());
    let mut unknown: Vec<String> = Vec::new();
    let bytes = expression.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len {
        if is_ident(bytes[i]) {
            let start = i;
            while i < len && is_ident(bytes[i]) {
                i += 1;
            }
            let run = &expression[start..i];
            if let Some(substitution) = tokens.get(run) {
                out.extend_from_slice(substitution.render().as_bytes());
            } else if run.bytes().all(|b| b.is_ascii_digit()) {
                out.extend_from_slice(run.as_bytes());
            } else {
                if !unknown.iter().any(|u| u == run) {
                    unknown.push(run.to_string());
                }
                out.push(b'0');
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    // Identifier runs are ASCII and everything else is copied verbatim.
    let substituted = String::from_utf8(out).expect("substitution preserves UTF-8");
    (substituted, unknown)
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Evaluates a substituted arithmetic expression to a raw number.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let tokens = lex(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let ast = parser.expr()?;
    parser.expect_end()?;
    let value = ast.eval()?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

/// Rounds half away from zero, then clamps to the optional price bounds.
/// Clamping happens strictly after rounding.
pub fn round_and_clamp(value: f64, min_price: Option<i64>, max_price: Option<i64>) -> i64 {
    let mut price = value.round() as i64;
    if let Some(min) = min_price {
        if price < min {
            price = min;
        }
    }
    if let Some(max) = max_price {
        if price > max {
            price = max;
        }
    }
    price
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Plus => "'+'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Slash => "'/'".to_string(),
            Self::Open => "'('".to_string(),
            Self::Close => "')'".to_string(),
        }
    }
}

/// Tokenizes the substituted expression. Only digits, `.`, the four
/// operators, parentheses, and whitespace may remain after substitution;
/// anything else is a syntax error.
fn lex(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = text
                    .parse()
                    .map_err(|_| EvalError::Syntax(format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            other => {
                return Err(EvalError::Syntax(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }
    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser and AST
// ---------------------------------------------------------------------------

/// Arithmetic AST. Grouping parentheses are structural in the tree;
/// negation is explicit.
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    fn eval(&self) -> Result<f64, EvalError> {
        Ok(match self {
            Self::Literal(n) => *n,
            Self::Add(lhs, rhs) => lhs.eval()? + rhs.eval()?,
            Self::Sub(lhs, rhs) => lhs.eval()? - rhs.eval()?,
            Self::Mul(lhs, rhs) => lhs.eval()? * rhs.eval()?,
            Self::Div(lhs, rhs) => {
                let denominator = rhs.eval()?;
                if denominator == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs.eval()? / denominator
            }
            Self::Neg(inner) => -inner.eval()?,
        })
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut node = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            node = match op {
                Token::Plus => Expr::Add(Box::new(node), Box::new(rhs)),
                _ => Expr::Sub(Box::new(node), Box::new(rhs)),
            };
        }
        Ok(node)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut node = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            node = match op {
                Token::Star => Expr::Mul(Box::new(node), Box::new(rhs)),
                _ => Expr::Div(Box::new(node), Box::new(rhs)),
            };
        }
        Ok(node)
    }

    // factor := number | '(' expr ')' | '-' factor
    fn factor(&mut self) -> Result<Expr, EvalError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Literal(n)),
            Some(Token::Minus) => Ok(Expr::Neg(Box::new(self.factor()?))),
            Some(Token::Open) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(EvalError::Syntax("unbalanced parentheses".to_string())),
                }
            }
            Some(token) => Err(EvalError::Syntax(format!(
                "unexpected {}",
                token.describe()
            ))),
            None => Err(EvalError::Syntax("unexpected end of expression".to_string())),
        }
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(token) => Err(EvalError::Syntax(format!(
                "unexpected {} after expression",
                token.describe()
            ))),
        }
    }
}
