//! Calculator input state machine.
//!
//! The keypad owns everything the calculator shows: the display text, the
//! pending `first op _` operation, the error line and the in-flight flag.
//! Arithmetic is never done here; [`Keypad::press`] hands back an
//! [`EvaluationRequest`] when `=` needs the compute service, and the caller
//! reports the outcome through [`Keypad::finish_evaluation`].

use shared::domain::Operator;

use crate::{error::EvalFailure, locale::Messages};

const ZERO: &str = "0";

/// A single key or button on the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Delete,
}

impl KeyPress {
    /// Maps a typed character. `,` is accepted as a decimal separator.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(KeyPress::Digit(c as u8 - b'0')),
            '.' | ',' => Some(KeyPress::Decimal),
            '=' | '\n' | '\r' => Some(KeyPress::Equals),
            '\u{8}' | '\u{7f}' => Some(KeyPress::Delete),
            '\u{1b}' => Some(KeyPress::Clear),
            other => Operator::from_symbol(other).map(KeyPress::Operator),
        }
    }

    /// Maps a keypad button label (`AC`, `DEL`, `÷`, `7`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "AC" | "C" => Some(KeyPress::Clear),
            "DEL" => Some(KeyPress::Delete),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyPress::from_char(c),
                    _ => None,
                }
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            KeyPress::Digit(d) => d.to_string(),
            KeyPress::Decimal => ".".to_string(),
            KeyPress::Operator(op) => op.symbol().to_string(),
            KeyPress::Equals => "=".to_string(),
            KeyPress::Clear => "AC".to_string(),
            KeyPress::Delete => "DEL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    OperatorSelected { first: f64, op: Operator },
    EnteringSecondOperand { first: f64, op: Operator },
}

impl Phase {
    pub fn pending(self) -> Option<(f64, Operator)> {
        match self {
            Phase::Idle => None,
            Phase::OperatorSelected { first, op } | Phase::EnteringSecondOperand { first, op } => {
                Some((first, op))
            }
        }
    }
}

/// Work the caller must send to the compute service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRequest {
    pub a: f64,
    pub b: f64,
    pub op: Operator,
}

#[derive(Debug, Clone)]
pub struct Keypad {
    display: String,
    phase: Phase,
    error: Option<EvalFailure>,
    loading: bool,
    messages: &'static Messages,
}

impl Keypad {
    pub fn new(messages: &'static Messages) -> Self {
        Self {
            display: ZERO.to_string(),
            phase: Phase::Idle,
            error: None,
            loading: false,
            messages,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `(first operand, operator symbol)` for the "3 +" indicator.
    pub fn pending(&self) -> Option<(String, char)> {
        self.phase
            .pending()
            .map(|(first, op)| (format_number(first), op.symbol()))
    }

    pub fn error(&self) -> Option<&EvalFailure> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|failure| self.messages.describe(failure))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the equals control is enabled.
    pub fn can_evaluate(&self) -> bool {
        !self.loading
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Applies one key. Returns a request only when `=` has to be evaluated
    /// remotely; the keypad is then loading until
    /// [`finish_evaluation`](Self::finish_evaluation) is called.
    pub fn press(&mut self, key: KeyPress) -> Option<EvaluationRequest> {
        match key {
            KeyPress::Digit(digit) => {
                self.digit(digit);
                None
            }
            KeyPress::Decimal => {
                self.decimal();
                None
            }
            KeyPress::Operator(op) => {
                self.operator(op);
                None
            }
            KeyPress::Equals => self.equals(),
            KeyPress::Clear => {
                self.clear();
                None
            }
            KeyPress::Delete => {
                self.delete();
                None
            }
        }
    }

    fn digit(&mut self, digit: u8) {
        self.error = None;
        let digit = char::from(b'0' + digit.min(9));
        if let Phase::OperatorSelected { first, op } = self.phase {
            self.phase = Phase::EnteringSecondOperand { first, op };
            self.display = digit.to_string();
        } else if self.display == ZERO {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    fn decimal(&mut self) {
        self.error = None;
        if let Phase::OperatorSelected { first, op } = self.phase {
            self.phase = Phase::EnteringSecondOperand { first, op };
            self.display = "0.".to_string();
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn operator(&mut self, next: Operator) {
        self.error = None;
        match self.phase {
            Phase::Idle => {
                // A display that is not a finite number cannot become an operand.
                if let Some(first) = parse_finite(&self.display) {
                    self.phase = Phase::OperatorSelected { first, op: next };
                }
            }
            Phase::OperatorSelected { first, .. } | Phase::EnteringSecondOperand { first, .. } => {
                self.phase = Phase::OperatorSelected { first, op: next };
            }
        }
    }

    fn equals(&mut self) -> Option<EvaluationRequest> {
        if self.loading {
            return None;
        }
        self.error = None;

        let (a, op) = self.phase.pending()?;
        let Some(b) = parse_finite(&self.display) else {
            self.error = Some(EvalFailure::InvalidInput);
            return None;
        };

        self.loading = true;
        tracing::debug!(a, b, op = op.wire_name(), "evaluation requested");
        Some(EvaluationRequest { a, b, op })
    }

    fn clear(&mut self) {
        self.error = None;
        self.display = ZERO.to_string();
        self.phase = Phase::Idle;
    }

    fn delete(&mut self) {
        self.error = None;
        if let Phase::OperatorSelected { first, op } = self.phase {
            self.phase = Phase::EnteringSecondOperand { first, op };
            self.display = ZERO.to_string();
            return;
        }

        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = ZERO.to_string();
        }
    }

    /// Applies the outcome of the request returned by [`press`](Self::press).
    ///
    /// In-flight requests are not cancelled, so this also lands after a
    /// clear.
    pub fn finish_evaluation(&mut self, outcome: Result<f64, EvalFailure>) {
        self.loading = false;
        match outcome {
            Ok(result) if result.is_finite() => {
                self.display = format_number(result);
                self.phase = Phase::Idle;
                self.error = None;
            }
            Ok(result) => {
                tracing::warn!(result, "compute service returned a non-finite result");
                self.error = Some(EvalFailure::Unavailable);
            }
            Err(failure) => {
                self.error = Some(failure);
            }
        }
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Shortest text that reads back as `value`; integral values carry no
/// fraction and negative zero shows as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return ZERO.to_string();
    }
    value.to_string()
}

#[cfg(test)]
#[path = "tests/keypad_tests.rs"]
mod tests;
