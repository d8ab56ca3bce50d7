#![cfg_attr(tarpaulin, skip)]

use super::*;
use crate::{Keyword, Number, Set};

use num_bigint::BigInt;

#[test]
fn test_options_size() {
    // Printer options are a pair of flags.
    assert!(std::mem::size_of::<Options>() <= std::mem::size_of::<u32>());
}

#[test]
fn test_atoms() {
    for (form, expected) in &[
        (Form::Nil, "nil"),
        (Form::Bool(true), "true"),
        (Form::Bool(false), "false"),
        (Form::symbol("clojure.core/map"), "clojure.core/map"),
        (Form::symbol("/"), "/"),
        (Form::Keyword(Keyword::qualified("user", "id")), ":user/id"),
        (Form::keyword("a"), ":a"),
    ] {
        assert_eq!(to_string(form).unwrap(), *expected);
    }
}

#[test]
fn test_numbers() {
    let big = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
    for (number, expected) in &[
        (Number::from(-42), "-42"),
        (Number::from(1.0), "1.0"),
        (Number::from(1e100), "1e100"),
        (Number::from(f64::INFINITY), "##Inf"),
        (Number::from(f64::NEG_INFINITY), "##-Inf"),
        (Number::from(f64::NAN), "##NaN"),
        (Number::bigint(BigInt::from(7)), "7N"),
        (Number::integer(big), "123456789012345678901234567890N"),
        (
            Number::ratio(BigInt::from(-6), BigInt::from(4)).unwrap(),
            "-3/2",
        ),
    ] {
        assert_eq!(to_string(&Form::Number(number.clone())).unwrap(), *expected);
    }
}

#[test]
fn test_decimal() {
    let form = crate::from_str("1.5M").unwrap();
    assert_eq!(to_string(&form).unwrap(), "1.5M");
}

#[test]
fn test_str_escapes() {
    // Only Clojure's shorthands are used, other control characters are
    // represented as `\uNNNN`.
    assert_eq!(
        to_string(&Form::string(
            "\u{07}\u{08}\u{09}\n\u{0b}\u{0c}\r\u{0e}\"\\\u{7f}"
        ))
        .unwrap(),
        r#""\u0007\b\t\n\u000b\f\r\u000e\"\\\u007f""#
    );
}

#[test]
fn test_chars() {
    for (c, expected) in &[
        ('a', r"\a"),
        ('\\', r"\\"),
        ('(', r"\("),
        ('\n', r"\newline"),
        (' ', r"\space"),
        ('\t', r"\tab"),
        ('\u{0}', r"\u0000"),
        ('\u{a0}', r"\u00a0"),
        ('λ', r"\λ"),
    ] {
        assert_eq!(to_string(&Form::Char(*c)).unwrap(), *expected);
    }
}

#[test]
fn test_regex() {
    let pattern = Pattern::new(r#"a"b\"c\d"#).unwrap();
    assert_eq!(
        to_string(&Form::Regex(pattern)).unwrap(),
        r#"#"a\"b\"c\d""#
    );
}

#[test]
fn test_collections() {
    let form = Form::list(vec![
        Form::symbol("f"),
        Form::vector(vec![1, 2]),
        Form::Set(Set::from_items(vec![Form::keyword("a")]).unwrap()),
        Form::map(vec![(Form::keyword("a"), 1), (Form::keyword("b"), 2)]),
        Form::empty_list(),
    ]);
    assert_eq!(
        to_string(&form).unwrap(),
        "(f [1 2] #{:a} {:a 1, :b 2} ())"
    );
}

#[test]
fn test_map_commas() {
    let form = Form::map(vec![(Form::keyword("a"), 1), (Form::keyword("b"), 2)]);
    let options = Options::new().with_map_commas(false);
    assert_eq!(to_string_custom(&form, options).unwrap(), "{:a 1 :b 2}");
    assert_eq!(
        to_string_custom(&form, Options::new()).unwrap(),
        "{:a 1, :b 2}"
    );
}

#[test]
fn test_meta() {
    let mut meta = Map::new();
    meta.insert(Form::keyword("private"), Form::Bool(true));
    let form = Form::symbol("secret").with_meta(meta);
    assert_eq!(to_string(&form).unwrap(), "secret");
    assert_eq!(
        to_string_custom(&form, Options::new().with_meta(true)).unwrap(),
        "^{:private true} secret"
    );
}

#[test]
fn test_tagged_and_conditional() {
    let tagged = Form::Tagged(Symbol::new("inst"), Box::new(Form::from("2020-01-01")));
    assert_eq!(to_string(&tagged).unwrap(), r#"#inst "2020-01-01""#);

    let cond = Form::Conditional {
        form: Box::new(Form::list(vec![Form::keyword("clj"), Form::from(1)])),
        splicing: true,
    };
    assert_eq!(to_string(&cond).unwrap(), "#?@(:clj 1)");
}

#[test]
fn test_display() {
    let form = Form::vector(vec![Form::from("x"), Form::Char('y')]);
    assert_eq!(form.to_string(), r#"["x" \y]"#);
}
