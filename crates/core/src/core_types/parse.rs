//! Unit expression parser
//!
//! Grammar (left associative, `*` and `/` share precedence, `^` binds tighter):
//!
//! ```text
//! expr     := term (('*' | '·' | '/' | <whitespace>) term)*
//! term     := primary ('^' exponent)?
//! primary  := SYMBOL | '1' | '(' expr ')'
//! exponent := SIGNED_NUMBER | '(' SIGNED_NUMBER ('/' SIGNED_NUMBER)? ')'
//! ```
//!
//! Examples: `km`, `cm/yr`, `Pa s`, `J/mol/K`, `MPa^-3.05*s^-1`, `m^(1/2)`.

use super::unit::Unit;
use super::unit_table::{self, UnitTable};
use crate::error::{Result, ScalingError};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Symbol(String),
    Number(f64),
    Star,
    Slash,
    Caret,
    Plus,
    Minus,
    LParen,
    RParen,
}

/// Parse against the process-wide unit table
pub(crate) fn parse_unit(expr: &str) -> Result<Unit> {
    parse_with(unit_table::init(), expr)
}

/// Parse against an explicit table
pub(crate) fn parse_with(table: &UnitTable, expr: &str) -> Result<Unit> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(error(expr, "empty unit expression"));
    }
    let mut parser = Parser {
        input: expr,
        tokens,
        pos: 0,
        table,
    };
    let unit = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(error(expr, &format!("unexpected token {tok:?}")));
    }
    Ok(unit)
}

fn error(input: &str, reason: &str) -> ScalingError {
    ScalingError::UnitParse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '°' | 'µ' | 'μ' | '_' | '%')
}

fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expr.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 2;
            }
            '*' | '·' | '⋅' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation only when followed by a digit or sign+digit
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| error(expr, &format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            c if is_symbol_char(c) => {
                let start = i;
                while i < chars.len() && is_symbol_char(chars[i]) {
                    i += 1;
                }
                tokens.push(Token::Symbol(chars[start..i].iter().collect()));
            }
            other => return Err(error(expr, &format!("unexpected character '{other}'"))),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    table: &'a UnitTable,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(ref tok) if tok == expected => Ok(()),
            other => Err(error(
                self.input,
                &format!("expected {expected:?}, found {other:?}"),
            )),
        }
    }

    fn expr(&mut self) -> Result<Unit> {
        let mut unit = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    unit = &unit * &self.term()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    unit = &unit / &self.term()?;
                }
                // Juxtaposition: "Pa s"
                Some(Token::Symbol(_) | Token::Number(_) | Token::LParen) => {
                    unit = &unit * &self.term()?;
                }
                _ => return Ok(unit),
            }
        }
    }

    fn term(&mut self) -> Result<Unit> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exp = self.exponent()?;
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Unit> {
        match self.advance() {
            Some(Token::Symbol(sym)) => self
                .table
                .lookup(&sym)
                .ok_or_else(|| error(self.input, &format!("unknown unit '{sym}'"))),
            Some(Token::Number(1.0)) => Ok(Unit::dimensionless()),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(error(
                self.input,
                &format!("expected a unit, found {other:?}"),
            )),
        }
    }

    fn signed_number(&mut self) -> Result<f64> {
        let sign = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                -1.0
            }
            Some(Token::Plus) => {
                self.pos += 1;
                1.0
            }
            _ => 1.0,
        };
        match self.advance() {
            Some(Token::Number(n)) => Ok(sign * n),
            other => Err(error(
                self.input,
                &format!("expected an exponent, found {other:?}"),
            )),
        }
    }

    fn exponent(&mut self) -> Result<f64> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let mut value = self.signed_number()?;
            if self.peek() == Some(&Token::Slash) {
                self.pos += 1;
                let denom = self.signed_number()?;
                if denom == 0.0 {
                    return Err(error(self.input, "zero denominator in exponent"));
                }
                value /= denom;
            }
            self.expect(&Token::RParen)?;
            return Ok(value);
        }
        self.signed_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::dimension::BaseDimension;
    use crate::core_types::unit_table::SECONDS_PER_YEAR;
    use approx::assert_relative_eq;

    fn parse(expr: &str) -> Unit {
        parse_with(&UnitTable::standard(), expr).unwrap()
    }

    #[test]
    fn test_velocity() {
        let u = parse("cm/yr");
        assert_relative_eq!(u.factor(), 0.01 / SECONDS_PER_YEAR);
        assert_eq!(u.dimension().exponent(BaseDimension::Length), 1.0);
        assert_eq!(u.dimension().exponent(BaseDimension::Time), -1.0);
    }

    #[test]
    fn test_fractional_negative_exponent() {
        let u = parse("MPa^-3.05*s^-1");
        assert_relative_eq!(u.factor(), 1e6_f64.powf(-3.05), max_relative = 1e-12);
        assert_relative_eq!(u.dimension().exponent(BaseDimension::Mass), -3.05);
        assert_relative_eq!(u.dimension().exponent(BaseDimension::Time), 5.1, epsilon = 1e-12);
    }

    #[test]
    fn test_left_associative_division() {
        let u = parse("J/mol/K");
        assert_eq!(u.dimension().exponent(BaseDimension::Amount), -1.0);
        assert_eq!(u.dimension().exponent(BaseDimension::Temperature), -1.0);
    }

    #[test]
    fn test_juxtaposition_and_parentheses() {
        let a = parse("Pa s");
        let b = parse("Pa*s");
        let c = parse("(Pa*s)");
        assert!(a.dimension().approx_eq(&b.dimension()));
        assert!(c.dimension().approx_eq(&b.dimension()));
        assert!(parse("1/s").dimension().approx_eq(&parse("Hz").dimension()));
    }

    #[test]
    fn test_fraction_exponent() {
        let u = parse("m^(1/2)");
        assert_relative_eq!(u.dimension().exponent(BaseDimension::Length), 0.5);
        let v = parse("m**2");
        assert_eq!(v.dimension().exponent(BaseDimension::Length), 2.0);
    }

    #[test]
    fn test_errors() {
        let table = UnitTable::standard();
        assert!(parse_with(&table, "").is_err());
        assert!(parse_with(&table, "furlong").is_err());
        assert!(parse_with(&table, "m^").is_err());
        assert!(parse_with(&table, "(m").is_err());
        assert!(parse_with(&table, "2 m").is_err());
        assert!(matches!(
            parse_with(&table, "m$"),
            Err(ScalingError::UnitParse { .. })
        ));
    }
}
