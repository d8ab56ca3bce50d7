//! Basic sanity checking on the `Form` type.
//!
//! These tests primarily test the round-trip (i.e converting to text and back)
//! behavior of `Form` using quickcheck.

#![cfg_attr(tarpaulin, skip)]

use quickcheck::{Arbitrary, Gen, QuickCheck};
use quickcheck_macros::quickcheck;
use rand::Rng;

use bigdecimal::BigDecimal;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::str;
use std::str::FromStr;

use crate as lform;

use lform::reader::{Options as ReadOptions, ReadCond};
use lform::{print, Form, Keyword, Map, Number, Pattern, Symbol};

enum FormKind {
    Nil,
    Bool,
    Number,
    Char,
    String,
    Regex,
    Symbol,
    Keyword,
    List,
    Vector,
    Map,
    Set,
}

fn gen_form(g: &mut Gen, depth: usize) -> Form {
    use FormKind::*;
    let choices = if depth >= g.size() {
        &[Nil, Bool, Number, Char, String, Regex, Symbol, Keyword] as &[FormKind]
    } else {
        &[
            Nil, Bool, Number, Char, String, Regex, Symbol, Keyword, List, Vector, Map, Set,
        ]
    };
    match g.choose(choices).unwrap() {
        Nil => Form::Nil,
        Bool => Form::Bool(Arbitrary::arbitrary(g)),
        Number => Form::Number(Arbitrary::arbitrary(g)),
        Char => Form::Char(Arbitrary::arbitrary(g)),
        String => {
            let choices = ["", "foo", "\"", "\t", "\x01", "back\\slash", "λ → ∞"];
            Form::string(*g.choose(&choices).unwrap())
        }
        Regex => {
            let choices = ["a+b", r"\d+\.\d*", "[a-z]*", r"\\"];
            Form::Regex(Pattern::new(g.choose(&choices).unwrap()).unwrap())
        }
        Symbol => {
            let choices = [
                "foo",
                "a-symbol",
                "clojure.core/map",
                "+",
                "-foo",
                "->>",
                "..",
                ".method",
                "foo#",
                "a'b",
                "*ns*",
                "/",
                "ns//",
            ];
            Form::symbol(g.choose(&choices).unwrap())
        }
        Keyword => {
            let choices = ["foo", "a-keyword", "user/id", "?!", "x.y/z"];
            Form::keyword(g.choose(&choices).unwrap())
        }
        List => Form::list(gen_items(g, depth)),
        Vector => Form::vector(gen_items(g, depth)),
        Map => {
            let keys = gen_items(g, depth);
            let values = gen_items(g, depth);
            Form::map(keys.into_iter().zip(values))
        }
        Set => Form::set(gen_items(g, depth)),
    }
}

fn gen_items(g: &mut Gen, depth: usize) -> Vec<Form> {
    let len = usize::arbitrary(g) % 4;
    (0..len).map(|_| gen_form(g, depth + 1)).collect()
}

impl Arbitrary for Form {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_form(g, 0)
    }
}

enum NumberKind {
    I64,
    BigInt,
    F64,
    Decimal,
    Ratio,
}

impl Arbitrary for Number {
    fn arbitrary(g: &mut Gen) -> Self {
        use NumberKind::*;
        let choices = [I64, BigInt, F64, Decimal, Ratio];
        // We do not use the `Arbitrary` implementations for the
        // numbers, as we want to cover the whole range.
        let mut rng = rand::thread_rng();
        match g.choose(&choices).unwrap() {
            I64 => Number::from(rng.gen::<i64>()),
            BigInt => {
                let n = num_bigint::BigInt::from(rng.gen::<i64>()) * rng.gen::<u64>();
                Number::bigint(n)
            }
            F64 => {
                let scale = *g.choose(&[-1e300, -1.0, 1.0, 1e-300, 123.45e10]).unwrap();
                Number::from(rng.gen::<f64>() * scale)
            }
            Decimal => {
                let text = *g.choose(&["0", "-1.5", "12.50", "3.14159265358979323846"]).unwrap();
                Number::decimal(BigDecimal::from_str(text).unwrap())
            }
            Ratio => {
                let numerator = num_bigint::BigInt::from(rng.gen::<i32>());
                let denominator = num_bigint::BigInt::from(rng.gen_range(1..1000));
                Number::ratio(numerator, denominator).unwrap()
            }
        }
    }
}

#[quickcheck]
fn print_read_number(input: Number) -> bool {
    let bytes = lform::to_vec(&Form::from(input.clone())).expect("conversion to bytes failed");
    let read = lform::from_slice(&bytes).expect("reading failed");
    let output = read.as_number().expect("read as a non-number");
    input == *output
}

#[test]
fn print_number() {
    #[allow(clippy::unreadable_literal)]
    let form = Form::from(Number::from(-11.287888289184039));
    let bytes = lform::to_vec(&form).expect("conversion to bytes failed");
    assert_eq!(str::from_utf8(&bytes).unwrap(), "-11.287888289184039");
}

#[test]
fn print_read_roundtrip_default() {
    fn prop(input: Form) -> bool {
        let string = lform::to_string(&input).expect("conversion to string failed");
        let output = lform::from_str(&string).expect("reading failed");
        input == output
    }
    QuickCheck::new()
        .tests(1000)
        .max_tests(2000)
        .gen(Gen::new(4))
        .quickcheck(prop as fn(Form) -> bool);
}

// The printer uses different code paths depending on whether it was customized,
// so do a roundtrip test using this path as well.
#[test]
fn print_read_roundtrip_custom() {
    fn prop(input: Form) -> bool {
        let options = print::Options::default().with_map_commas(false);
        let string = lform::to_string_custom(&input, options).expect("conversion to string failed");
        let output =
            lform::from_str_custom(&string, ReadOptions::default()).expect("reading failed");
        input == output
    }
    QuickCheck::new()
        .tests(1000)
        .max_tests(2000)
        .gen(Gen::new(4))
        .quickcheck(prop as fn(Form) -> bool);
}

#[test]
fn print_read_roundtrip_io() {
    use std::io::Cursor;
    fn prop(input: Form) -> bool {
        let mut vec = Vec::new();
        lform::to_writer(Cursor::new(&mut vec), &input).expect("conversion to string failed");
        let output = lform::from_reader(Cursor::new(&vec)).expect("reading failed");
        input == output
    }
    QuickCheck::new()
        .tests(1000)
        .max_tests(2000)
        .gen(Gen::new(4))
        .quickcheck(prop as fn(Form) -> bool);
}

// Printing is idempotent across a read: the second print matches the first.
#[test]
fn print_read_print_idempotent() {
    fn prop(input: Form) -> bool {
        let first = lform::to_string(&input).expect("conversion to string failed");
        let read = lform::from_str(&first).expect("reading failed");
        let second = lform::to_string(&read).expect("conversion to string failed");
        first == second
    }
    QuickCheck::new()
        .tests(500)
        .gen(Gen::new(4))
        .quickcheck(prop as fn(Form) -> bool);
}

#[test]
fn print_read_preserved() {
    let options = ReadOptions::new().with_read_cond(ReadCond::Preserve);
    for text in &[
        r#"#inst "2020-01-01T00:00:00Z""#,
        "#?(:clj 1 :cljs 2)",
        "[#?@(:clj [1 2]) 3]",
        "#my.ns/point [1 2]",
    ] {
        let form = lform::from_str_custom(text, options.clone()).expect("reading failed");
        assert_eq!(lform::to_string(&form).unwrap(), *text);
    }
}

fn hash_of(form: &Form) -> u64 {
    let mut hasher = DefaultHasher::new();
    form.hash(&mut hasher);
    hasher.finish()
}

#[quickcheck]
fn hash_ignores_meta(input: Form) -> bool {
    let mut meta = Map::new();
    meta.insert(Form::keyword("line"), Form::from(1));
    let annotated = input.clone().with_meta(meta);
    annotated == input && hash_of(&annotated) == hash_of(&input)
}

#[test]
fn test_number_equality() {
    let big_one = Number::bigint(num_bigint::BigInt::from(1));
    assert_eq!(Number::from(1), big_one);
    assert_eq!(hash_of(&Form::from(1)), hash_of(&Form::Number(big_one)));
    assert_ne!(Number::from(1), Number::from(1.0));
    assert_ne!(Number::from(1), Number::decimal(BigDecimal::from(1i64)));
    assert_eq!(Number::from(0.0), Number::from(-0.0));
    assert_eq!(hash_of(&Form::from(0.0)), hash_of(&Form::from(-0.0)));
    assert_ne!(Number::from(f64::NAN), Number::from(f64::NAN));
}

#[test]
fn test_collection_hash_ignores_order() {
    let a = lform::from_str("{:a 1 :b #{1 2 3}}").unwrap();
    let b = lform::from_str("{:b #{3 2 1} :a 1N}").unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    let list = lform::from_str("(1 2)").unwrap();
    let vector = lform::from_str("[1 2]").unwrap();
    assert_ne!(hash_of(&list), hash_of(&vector));
}

#[test]
fn test_seq_index() {
    let list = Form::list(vec![23, 24, 25]);
    assert_eq!(list[0], Form::from(23));
    assert_eq!(list[2], Form::from(25));
    assert_eq!(list[3], Form::Nil);
    let vector = Form::vector(vec!["a", "b"]);
    assert_eq!(vector[1], Form::from("b"));
}

#[test]
fn test_map_index() {
    let map = Form::map(vec![
        (Form::keyword("foo"), Form::from(42)),
        (Form::Keyword(Keyword::qualified("my", "bar")), Form::from(23)),
        (Form::from("baz"), Form::from(127)),
    ]);
    assert_eq!(map["foo"], Form::from(42));
    assert_eq!(map["bar"], Form::Nil);
    assert_eq!(map[Form::keyword("my/bar")], Form::from(23));
    assert_eq!(map[Form::from("baz")], Form::from(127));
}

#[test]
fn test_equality_ignores_meta_and_order() {
    let a = lform::from_str("^:private {:a 1 :b #{1 2}}").unwrap();
    let b = lform::from_str("{:b #{2 1} :a 1}").unwrap();
    assert_eq!(a, b);
    assert_ne!(
        lform::from_str("(1 2)").unwrap(),
        lform::from_str("[1 2]").unwrap()
    );
}

#[test]
fn test_unidiomatic_space() {
    let nested = Form::list(vec![
        Form::symbol("feedback"),
        Form::list(vec![Form::symbol("nested")]),
    ]);
    let form = lform::from_str("(feedback(nested))").expect("failed to read");
    assert_eq!(form, nested);
    let form = lform::from_str("feedback; some comment").expect("failed to read");
    assert_eq!(form, Form::symbol("feedback"));
    let form = lform::from_str("[a,b,,c]").expect("failed to read");
    assert_eq!(form, Form::vector(vec![Form::symbol("a"), Form::symbol("b"), Form::symbol("c")]));

    use std::io::Cursor;
    let form = lform::from_reader(Cursor::new("(feedback(nested))")).expect("failed to read");
    assert_eq!(form, nested);
}

#[test]
fn test_symbol_parts() {
    let form = lform::from_str("clojure.string/join").unwrap();
    let sym = form.as_symbol().unwrap();
    assert_eq!(sym.ns(), Some("clojure.string"));
    assert_eq!(sym.name(), "join");
    assert_eq!(*sym, Symbol::qualified("clojure.string", "join"));
}
