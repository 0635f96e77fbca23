use super::{arg, FunctionError};

/// Number of characters to take for a requested `count` on a string of
/// `len` characters. Negative counts take nothing, overlong counts take all.
fn clamp_count(count: i64, len: usize) -> usize {
    if count <= 0 {
        0
    } else {
        usize::try_from(count).map_or(len, |c| c.min(len))
    }
}

/// An absent count reads as zero; present text must be an integer as is.
fn parse_count(function: &'static str, raw: Option<&str>) -> Result<i64, FunctionError> {
    match raw {
        None => Ok(0),
        Some(text) => text.parse().map_err(|_| FunctionError::InvalidArgument {
            function,
            message: format!("number has to be an integer, got '{text}'"),
        }),
    }
}

pub(super) fn left(function: &'static str, args: &[Option<String>]) -> Result<String, FunctionError> {
    let count = parse_count(function, args.get(1).and_then(Option::as_deref))?;
    let text = arg(args, 0);
    let take = clamp_count(count, text.chars().count());
    Ok(text.chars().take(take).collect())
}

/// Rightmost `count` characters: reverse, take the clamped prefix, reverse back.
pub(super) fn right(function: &'static str, args: &[Option<String>]) -> Result<String, FunctionError> {
    let count = parse_count(function, args.get(1).and_then(Option::as_deref))?;
    let reversed: Vec<char> = arg(args, 0).chars().rev().collect();
    let take = clamp_count(count, reversed.len());
    Ok(reversed[..take].iter().rev().collect())
}

pub(super) fn length(args: &[Option<String>]) -> String {
    arg(args, 0).chars().count().to_string()
}

pub(super) fn concatenate(args: &[Option<String>]) -> String {
    args.iter().flatten().map(String::as_str).collect()
}
