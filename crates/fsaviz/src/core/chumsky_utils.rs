//! Shared chumsky parser utilities for the save format
//!
//! This module provides the literal parsers the field parsers are built
//! from: inline whitespace, decimal numbers and parenthesised pairs.

use chumsky::prelude::*;

/// Error-carrying parser extras used by every save-format parser
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Parse inline whitespace only (spaces and tabs, no newlines).
///
/// Fields are single lines, so newlines are never padding.
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse a decimal number as written by `f64`'s `Display`.
///
/// Accepts an optional sign, a fraction and an exponent.
pub fn number<'src>() -> impl Parser<'src, &'src str, f64, Extra<'src>> + Clone {
    one_of("+-0123456789.eE")
        .repeated()
        .at_least(1)
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<f64>()
                .map_err(|e| Rich::custom(span, format!("invalid number '{}': {}", s, e)))
        })
}

/// Parse a literal coordinate pair: `(a,b)`
pub fn number_pair<'src>() -> impl Parser<'src, &'src str, (f64, f64), Extra<'src>> + Clone {
    let ws = inline_whitespace();

    just('(')
        .ignore_then(number().padded_by(ws.clone()))
        .then_ignore(just(','))
        .then(number().padded_by(ws))
        .then_ignore(just(')'))
}
