//! Character classes and token grammars.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{Keyword, Number, Symbol};

/// Commas count as whitespace.
#[inline]
pub(crate) fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

/// Characters that have a reader macro.
#[inline]
pub(crate) fn is_macro(ch: char) -> bool {
    matches!(
        ch,
        '"' | ';' | '\'' | '@' | '^' | '`' | '~' | '(' | ')' | '[' | ']' | '{' | '}' | '\\' | '%' | '#'
    )
}

/// Macro characters that end a token. `#`, `'` and `%` may appear inside
/// symbols.
#[inline]
pub(crate) fn is_terminating_macro(ch: char) -> bool {
    ch != '#' && ch != '\'' && ch != '%' && is_macro(ch)
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn int() -> &'static Regex {
        static INT: OnceLock<Regex> = OnceLock::new();
        INT.get_or_init(|| {
            Regex::new(
                r"^([-+]?)(?:(0)|([1-9][0-9]*)|0[xX]([0-9A-Fa-f]+)|0([0-7]+)|([1-9][0-9]?)[rR]([0-9A-Za-z]+)|0[0-9]+)(N)?$",
            )
            .expect("could not compile regex for integers")
        })
    }

    pub(super) fn ratio() -> &'static Regex {
        static RATIO: OnceLock<Regex> = OnceLock::new();
        RATIO.get_or_init(|| {
            Regex::new(r"^([-+]?[0-9]+)/([0-9]+)$").expect("could not compile regex for ratios")
        })
    }

    pub(super) fn float() -> &'static Regex {
        static FLOAT: OnceLock<Regex> = OnceLock::new();
        FLOAT.get_or_init(|| {
            Regex::new(r"^([-+]?[0-9]+(\.[0-9]*)?([eE][-+]?[0-9]+)?)(M)?$")
                .expect("could not compile regex for floats")
        })
    }

    pub(super) fn symbol() -> &'static Regex {
        static SYMBOL: OnceLock<Regex> = OnceLock::new();
        SYMBOL.get_or_init(|| {
            Regex::new(r"^:?([^0-9/].*/)?(/|[^0-9/][^/]*)$")
                .expect("could not compile regex for symbols")
        })
    }
}

/// Interpret a token that starts like a number.
///
/// Integer syntax is tried first, then floating point, then ratios.
pub(crate) fn match_number(token: &str) -> Option<Number> {
    if let Some(caps) = regex::int().captures(token) {
        let bigint = caps.get(8).is_some();
        if caps.get(2).is_some() {
            let zero = BigInt::from(0);
            return Some(if bigint {
                Number::bigint(zero)
            } else {
                Number::from(0)
            });
        }
        let (digits, radix) = if let Some(m) = caps.get(3) {
            (m.as_str(), 10)
        } else if let Some(m) = caps.get(4) {
            (m.as_str(), 16)
        } else if let Some(m) = caps.get(5) {
            (m.as_str(), 8)
        } else if let (Some(r), Some(m)) = (caps.get(6), caps.get(7)) {
            (m.as_str(), r.as_str().parse::<u32>().ok()?)
        } else {
            return None;
        };
        if !(2..=36).contains(&radix) {
            return None;
        }
        let mut n = BigInt::parse_bytes(digits.as_bytes(), radix)?;
        if &caps[1] == "-" {
            n = -n;
        }
        return Some(if bigint {
            Number::bigint(n)
        } else {
            Number::integer(n)
        });
    }
    if let Some(caps) = regex::float().captures(token) {
        let text = &caps[1];
        if caps.get(4).is_some() {
            return parse_decimal(text).map(Number::decimal);
        }
        return f64::from_str(text).ok().map(Number::from);
    }
    if let Some(caps) = regex::ratio().captures(token) {
        let numerator = BigInt::from_str(caps[1].trim_start_matches('+')).ok()?;
        let denominator = BigInt::from_str(&caps[2]).ok()?;
        return Number::ratio(numerator, denominator);
    }
    None
}

// Drop what `BigDecimal` does not accept: a leading `+` and a dot without
// fraction digits.
fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let text = text.trim_start_matches('+');
    let normalized = match text.find('.') {
        Some(i) if !text[i + 1..].starts_with(|c: char| c.is_ascii_digit()) => {
            format!("{}{}", &text[..i], &text[i + 1..])
        }
        _ => text.to_owned(),
    };
    BigDecimal::from_str(&normalized).ok()
}

/// A token classified as a symbol or keyword.
#[derive(Debug, PartialEq)]
pub(crate) enum SymbolToken<'a> {
    Symbol(Symbol),
    Keyword(Keyword),
    /// `::name` or `::ns/name`, to be resolved against the current namespace.
    AutoKeyword { ns: Option<&'a str>, name: &'a str },
}

/// Classify a token as a symbol, keyword or auto-resolved keyword.
///
/// Returns `None` if the token is malformed.
pub(crate) fn match_symbol(token: &str) -> Option<SymbolToken<'_>> {
    let caps = regex::symbol().captures(token)?;
    let ns = caps.get(1).map(|m| m.as_str());
    let name = caps.get(2).map_or("", |m| m.as_str());
    if ns.map_or(false, |ns| ns.ends_with(":/")) || name.ends_with(':') {
        return None;
    }
    if token.get(1..).map_or(false, |rest| rest.contains("::")) {
        return None;
    }
    // At most one namespace separator.
    if ns.map_or(false, |ns| ns[..ns.len() - 1].contains('/')) {
        return None;
    }
    if let Some(rest) = token.strip_prefix("::") {
        return Some(match rest.find('/') {
            Some(i) if rest != "/" => SymbolToken::AutoKeyword {
                ns: Some(&rest[..i]),
                name: &rest[i + 1..],
            },
            _ => SymbolToken::AutoKeyword {
                ns: None,
                name: rest,
            },
        });
    }
    Some(match token.strip_prefix(':') {
        Some(rest) => SymbolToken::Keyword(Keyword::parse(rest)),
        None => SymbolToken::Symbol(Symbol::parse(token)),
    })
}
