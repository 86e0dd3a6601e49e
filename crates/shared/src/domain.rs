use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary operator accepted by `POST /api/calc/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
        }
    }

    /// Symbol shown on the keypad and in the pending-operation indicator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' | 'x' | 'X' | '×' => Some(Operator::Mul),
            '/' | '÷' => Some(Operator::Div),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operator '{0}' (expected add, sub, mul, div or + - * /)")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "add" => return Ok(Operator::Add),
            "sub" => return Ok(Operator::Sub),
            "mul" => return Ok(Operator::Mul),
            "div" => return Ok(Operator::Div),
            _ => {}
        }

        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => {
                Operator::from_symbol(symbol).ok_or_else(|| UnknownOperator(s.to_string()))
            }
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Operator;

    #[test]
    fn serializes_with_wire_names() {
        assert_eq!(serde_json::to_string(&Operator::Div).unwrap(), "\"div\"");
        for op in [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div] {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.wire_name()));
        }
    }

    #[test]
    fn parses_names_and_keyboard_symbols() {
        assert_eq!("add".parse::<Operator>().unwrap(), Operator::Add);
        assert_eq!(" MUL ".parse::<Operator>().unwrap(), Operator::Mul);
        assert_eq!("x".parse::<Operator>().unwrap(), Operator::Mul);
        assert_eq!("÷".parse::<Operator>().unwrap(), Operator::Div);
        assert_eq!("-".parse::<Operator>().unwrap(), Operator::Sub);
        assert!("mod".parse::<Operator>().is_err());
        assert!("++".parse::<Operator>().is_err());
    }
}
