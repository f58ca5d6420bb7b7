//! Static reduction of `calc()` expressions to a single `<number><unit>`.
//!
//! Only expressions that reduce statically succeed: addition and
//! subtraction require matching units, multiplication needs a unitless
//! factor and division a non-zero unitless divisor. Anything else (mixed
//! units, unknown functions, malformed input) returns `None`, which the
//! root-size conversion surfaces as an invalid root font-size.

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64, Option<String>),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
struct Quantity {
    number: f64,
    unit: Option<String>,
}

/// Reduces an expression such as `calc(.625em * 1)` to `"0.625em"`.
pub fn reduce_calc(expression: &str) -> Option<String> {
    let tokens = tokenize(expression)?;
    let mut parser = ExprParser { tokens: &tokens, index: 0 };
    let quantity = parser.expression()?;
    if parser.index != tokens.len() {
        return None;
    }
    Some(match quantity.unit {
        Some(unit) => format!("{}{}", quantity.number, unit),
        None => format!("{}", quantity.number),
    })
}

fn tokenize(expression: &str) -> Option<Vec<Token>> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let number: f64 = expression[start..i].parse().ok()?;
                let unit_start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'%') {
                    i += 1;
                }
                let unit = if i > unit_start {
                    Some(expression[unit_start..i].to_string())
                } else {
                    None
                };
                tokens.push(Token::Number(number, unit));
            }
            b if b.is_ascii_alphabetic() => {
                // Only the calc() function itself is reducible.
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
                    i += 1;
                }
                if !expression[start..i].eq_ignore_ascii_case("calc") {
                    return None;
                }
                if bytes.get(i) != Some(&b'(') {
                    return None;
                }
                tokens.push(Token::Open);
                i += 1;
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct ExprParser<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expression(&mut self) -> Option<Quantity> {
        let mut left = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.index += 1;
                    let right = self.term()?;
                    left = add(left, right, 1.0)?;
                }
                Some(Token::Minus) => {
                    self.index += 1;
                    let right = self.term()?;
                    left = add(left, right, -1.0)?;
                }
                _ => return Some(left),
            }
        }
    }

    fn term(&mut self) -> Option<Quantity> {
        let mut left = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.index += 1;
                    let right = self.factor()?;
                    left = multiply(left, right)?;
                }
                Some(Token::Slash) => {
                    self.index += 1;
                    let right = self.factor()?;
                    left = divide(left, right)?;
                }
                _ => return Some(left),
            }
        }
    }

    fn factor(&mut self) -> Option<Quantity> {
        match self.bump()? {
            Token::Number(number, unit) => Some(Quantity { number, unit }),
            Token::Open => {
                let inner = self.expression()?;
                match self.bump()? {
                    Token::Close => Some(inner),
                    _ => None,
                }
            }
            Token::Minus => {
                let inner = self.factor()?;
                Some(Quantity {
                    number: -inner.number,
                    unit: inner.unit,
                })
            }
            Token::Plus => self.factor(),
            _ => None,
        }
    }
}

fn add(left: Quantity, right: Quantity, sign: f64) -> Option<Quantity> {
    let unit = match (&left.unit, &right.unit) {
        (None, None) => None,
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => Some(a.clone()),
        _ => return None,
    };
    Some(Quantity {
        number: left.number + sign * right.number,
        unit,
    })
}

fn multiply(left: Quantity, right: Quantity) -> Option<Quantity> {
    let unit = match (&left.unit, &right.unit) {
        (Some(_), Some(_)) => return None,
        (Some(u), None) | (None, Some(u)) => Some(u.clone()),
        (None, None) => None,
    };
    Some(Quantity {
        number: left.number * right.number,
        unit,
    })
}

fn divide(left: Quantity, right: Quantity) -> Option<Quantity> {
    if right.unit.is_some() || right.number == 0.0 {
        return None;
    }
    Some(Quantity {
        number: left.number / right.number,
        unit: left.unit,
    })
}
