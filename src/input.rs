use serde::Serialize;

use crate::Error;

/// Numbers recovered from free text, plus the tokens that were dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParsedInput {
    #[serde(rename = "Values")]
    pub values: Vec<f64>,

    #[serde(rename = "Rejected")]
    pub rejected: Vec<String>,
}

impl ParsedInput {
    /// Values if at least `min` of them survived parsing.
    pub fn require(self, min: usize) -> Result<Vec<f64>, Error> {
        if self.values.len() < min {
            Err(Error::InsufficientData {
                required: min,
                found: self.values.len(),
            })
        } else {
            Ok(self.values)
        }
    }

    pub fn push_token(&mut self, token: &str) {
        match parse_token(token) {
            Some(v) => self.values.push(v),
            None => self.rejected.push(token.to_owned()),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

/// Finite number or nothing. "nan" and "inf" parse as f64 but are not samples.
pub fn parse_token(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits on commas, semicolons and whitespace; bad tokens are kept aside, not fatal.
pub fn parse_numbers(text: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();
    for token in text.split(is_separator).filter(|t| !t.is_empty()) {
        parsed.push_token(token);
    }
    parsed
}
