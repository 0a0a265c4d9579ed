//! Strict scalar parsers.
//!
//! Every parser takes one already-isolated token and either consumes it fully
//! or rejects it. Trailing whitespace is the only accepted terminator, and the
//! empty token stands for "absent" (zero, `0.0` or `false`).

use crate::error::ParseError;
use crate::whitelist::Whitelist;

/// Characters allowed to end a numeric token.
fn is_terminator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Strips trailing terminators, rejecting the token if anything but more
/// terminators follows the first one.
fn strip_terminators(token: &str) -> Result<&str, ParseError> {
    match token.char_indices().find(|&(_, c)| is_terminator(c)) {
        None => Ok(token),
        Some((end, _)) => match token[end..].char_indices().find(|&(_, c)| !is_terminator(c)) {
            None => Ok(&token[..end]),
            Some((offset, ch)) => Err(ParseError::InvalidChar {
                ch,
                position: end + offset,
            }),
        },
    }
}

/// Splits an optional leading sign. Returns `(negative, rest, sign_len)`.
fn split_sign(token: &str, allow_minus: bool) -> (bool, &str, usize) {
    if let Some(rest) = token.strip_prefix('+') {
        (false, rest, 1)
    } else if let Some(rest) = token.strip_prefix('-').filter(|_| allow_minus) {
        (true, rest, 1)
    } else {
        (false, token, 0)
    }
}

/// Accumulates a run of ASCII digits into a `u64`.
fn digits_to_u64(digits: &str, offset: usize, original: &str) -> Result<u64, ParseError> {
    if digits.is_empty() {
        return Err(ParseError::NoDigits(original.to_string()));
    }
    let mut value: u64 = 0;
    for (i, ch) in digits.char_indices() {
        let digit = ch.to_digit(10).ok_or(ParseError::InvalidChar {
            ch,
            position: offset + i,
        })?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| ParseError::OutOfRange(original.to_string()))?;
    }
    Ok(value)
}

/// Parses `'+'? digit+`. The empty token is `0`.
///
/// # Example
/// ```
/// # use tabledb::parser::parse_uint;
/// assert_eq!(parse_uint("+42"), Ok(42));
/// assert_eq!(parse_uint(""), Ok(0));
/// assert!(parse_uint("12a").is_err());
/// ```
pub fn parse_uint(token: &str) -> Result<u64, ParseError> {
    if token.is_empty() {
        return Ok(0);
    }
    let body = strip_terminators(token)?;
    let (_, digits, offset) = split_sign(body, false);
    digits_to_u64(digits, offset, token)
}

/// Parses `('+'|'-')? digit+`. The empty token is `0`.
pub fn parse_int(token: &str) -> Result<i64, ParseError> {
    if token.is_empty() {
        return Ok(0);
    }
    let body = strip_terminators(token)?;
    let (negative, digits, offset) = split_sign(body, true);
    let magnitude = digits_to_u64(digits, offset, token)?;
    let out_of_range = || ParseError::OutOfRange(token.to_string());
    if negative {
        0i64.checked_sub_unsigned(magnitude).ok_or_else(out_of_range)
    } else {
        i64::try_from(magnitude).map_err(|_| out_of_range())
    }
}

/// Parses `('+'|'-')? int_part ('.' frac_part)?` with at least one digit.
/// The empty token is `0.0`, and `"3."` is `3.0`.
///
/// The result is the correctly rounded value of
/// `int_part + frac_part / 10^digits(frac_part)`.
pub fn parse_float(token: &str) -> Result<f64, ParseError> {
    if token.is_empty() {
        return Ok(0.0);
    }
    let body = strip_terminators(token)?;
    let (negative, unsigned, offset) = split_sign(body, true);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if let Some((i, ch)) = int_part.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(ParseError::InvalidChar {
            ch,
            position: offset + i,
        });
    }
    let frac_offset = offset + int_part.len() + 1;
    if let Some((i, ch)) = frac_part.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(ParseError::InvalidChar {
            ch,
            position: frac_offset + i,
        });
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseError::NoDigits(token.to_string()));
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
    let sign = if negative { "-" } else { "" };
    let value: f64 = format!("{sign}{int_part}.{frac_part}")
        .parse()
        .map_err(|_| ParseError::OutOfRange(token.to_string()))?;

    if !value.is_finite() {
        return Err(ParseError::OutOfRange(token.to_string()));
    }
    Ok(value)
}

/// Parses a boolean.
///
/// Accepts the empty token (`false`), any token [parse_uint] accepts
/// (non-zero is `true`), or exactly one of `true`, `TRUE`, `false`, `FALSE`.
pub fn parse_bool(token: &str) -> Result<bool, ParseError> {
    if let Ok(number) = parse_uint(token) {
        return Ok(number != 0);
    }
    match token {
        "true" | "TRUE" => Ok(true),
        "false" | "FALSE" => Ok(false),
        _ => Err(ParseError::InvalidBool(token.to_string())),
    }
}

/// Accepts `token` only if every character is whitelisted and it has at most
/// `max_len` characters. Nothing is truncated.
pub fn parse_str(token: &str, whitelist: &Whitelist, max_len: usize) -> Result<String, ParseError> {
    let len = token.chars().count();
    if len > max_len {
        return Err(ParseError::TooLong { len, max: max_len });
    }
    if let Some(ch) = token.chars().find(|&c| !whitelist.contains(c)) {
        return Err(ParseError::NotAllowed(ch));
    }
    Ok(token.to_string())
}
