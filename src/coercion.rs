//! @ai:module:intent Convert a token into a typed value according to a declared type tag
//! @ai:module:layer domain
//! @ai:module:public_api coerce, CoercionError
//! @ai:module:depends_on value
//! @ai:module:stateless true

use crate::value::{integer_digits, parse_literal, Value};
use thiserror::Error;

/// @ai:intent A token that could not be read as its declared primitive type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value '{token}' is not a valid {tag}")]
pub struct CoercionError {
    pub token: String,
    pub tag: String,
}

/// @ai:intent Coerce a token using its declared type tag
/// @ai:pre recognized_types holds the primitive tags the caller accepts
/// @ai:post Err only when the tag is a recognized primitive and the token does not convert
/// @ai:example ("None", "int") -> Ok(Value::None)
/// @ai:example ("False", "bool") -> Ok(Value::Bool(false))
/// @ai:example ("abc", "float") -> Err
/// @ai:example ("[1,2]", "list") -> Ok(List)
/// @ai:effects pure
pub fn coerce(token: &str, tag: &str, recognized_types: &[String]) -> Result<Value, CoercionError> {
    if token == "None" {
        return Ok(Value::None);
    }

    if !recognized_types.iter().any(|t| t == tag) {
        return Ok(parse_literal(token).unwrap_or_else(|| Value::Str(token.to_string())));
    }

    let fail = || CoercionError {
        token: token.to_string(),
        tag: tag.to_string(),
    };
    let trimmed = token.trim();

    match tag {
        "int" => {
            let cleaned = trimmed.replace('_', "");
            match cleaned.parse::<i64>() {
                Ok(i) => Ok(Value::Int(i)),
                Err(_) => integer_digits(&cleaned).map(Value::BigInt).ok_or_else(fail),
            }
        }
        "float" => parse_float(trimmed).map(Value::Float).ok_or_else(fail),
        "complex" => parse_complex(trimmed)
            .map(|(re, im)| Value::Complex { re, im })
            .ok_or_else(fail),
        "str" => Ok(Value::Str(unquote(token).to_string())),
        "chr" => {
            let text = unquote(token);
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(_), None) => Ok(Value::Str(text.to_string())),
                _ => Err(fail()),
            }
        }
        "bool" => Ok(Value::Bool(token != "False" && !token.is_empty())),
        // A configured tag with no dedicated conversion reads like an undeclared one.
        _ => Ok(parse_literal(token).unwrap_or_else(|| Value::Str(token.to_string()))),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    let cleaned = text.replace('_', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Reads `a`, `bj`, `a+bj` or `a-bj`, optionally wrapped in parentheses.
fn parse_complex(text: &str) -> Option<(f64, f64)> {
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text)
        .trim();

    let Some(body) = text.strip_suffix(['j', 'J']) else {
        return parse_float(text).map(|re| (re, 0.0));
    };

    // Split at the last sign that is not the leading sign or part of an exponent.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    let imaginary = |s: &str| match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => parse_float(s),
    };

    match split {
        Some(i) => Some((parse_float(&body[..i])?, imaginary(&body[i..])?)),
        None => Some((0.0, imaginary(body)?)),
    }
}

/// Strips one pair of matching surrounding quotes.
fn unquote(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}
