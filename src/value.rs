//! @ai:module:intent Typed example values and the literal-structure grammar used to read them
//! @ai:module:layer domain
//! @ai:module:public_api Value, parse_literal, integer_digits
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent A value written in an EXAMPLE line after coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// The absent value (`None`), also recorded for arguments that failed to read.
    None,
    Bool(bool),
    Int(i64),
    /// An integer literal too wide for `i64`, kept as its normalized digits.
    BigInt(String),
    Float(f64),
    Complex { re: f64, im: f64 },
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// @ai:intent Check whether the value compares with a tolerance rather than exactly
    pub fn is_float_like(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Complex { .. })
    }
}

/// @ai:intent Parse literal syntax: None, booleans, numbers, quoted strings, lists, tuples, dicts
/// @ai:pre text is a single token produced by the value tokenizer
/// @ai:post Some only when the whole text is one literal
/// @ai:example ("[1,2]") -> Some(List([Int(1), Int(2)]))
/// @ai:example ("x") -> None
/// @ai:effects pure
pub fn parse_literal(text: &str) -> Option<Value> {
    let mut reader = LiteralReader {
        chars: text.chars().collect(),
        pos: 0,
    };
    let value = reader.value()?;
    reader.skip_ws();
    if reader.pos == reader.chars.len() {
        Some(value)
    } else {
        None
    }
}

/// @ai:intent Normalize signed decimal digit text, whatever its width
/// @ai:example ("+007") -> Some("7")
/// @ai:example ("1.5") -> None
pub fn integer_digits(text: &str) -> Option<String> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Some("0".to_string());
    }
    Some(format!("{}{}", sign, trimmed))
}

/// Recursive-descent reader over the literal grammar.
struct LiteralReader {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralReader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            '[' => {
                self.pos += 1;
                self.sequence(']').map(|(items, _)| Value::List(items))
            }
            '(' => {
                self.pos += 1;
                let (items, trailing_comma) = self.sequence(')')?;
                // `(x)` is just a parenthesized value, `(x,)` is a tuple.
                if items.len() == 1 && !trailing_comma {
                    items.into_iter().next()
                } else {
                    Some(Value::Tuple(items))
                }
            }
            '{' => {
                self.pos += 1;
                self.dict()
            }
            '"' | '\'' => self.string().map(Value::Str),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            c if c.is_alphabetic() => self.word(),
            _ => None,
        }
    }

    /// Reads comma separated values up to `close`; reports whether a trailing comma was seen.
    fn sequence(&mut self, close: char) -> Option<(Vec<Value>, bool)> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some((items, trailing_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            trailing_comma = self.eat(',');
            if !trailing_comma {
                self.skip_ws();
                return if self.eat(close) {
                    Some((items, false))
                } else {
                    None
                };
            }
        }
    }

    fn dict(&mut self) -> Option<Value> {
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Some(Value::Dict(entries));
            }
            let key = self.value()?;
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            let val = self.value()?;
            entries.push((key, val));
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                return if self.eat('}') {
                    Some(Value::Dict(entries))
                } else {
                    None
                };
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => {
                    let escaped = match self.bump()? {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    };
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
        {
            // A sign is only part of the number at the start or right after an exponent.
            if matches!(self.peek(), Some('+' | '-')) && self.pos > start {
                let prev = self.chars[self.pos - 1];
                if prev != 'e' && prev != 'E' {
                    break;
                }
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();

        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Int(i));
        }
        if let Some(digits) = integer_digits(&text) {
            return Some(Value::BigInt(digits));
        }
        if text.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(x) = text.parse::<f64>() {
                return Some(Value::Float(x));
            }
        }
        None
    }

    fn word(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Some(Value::None),
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            _ => None,
        }
    }
}
