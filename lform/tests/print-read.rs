use lform::reader::{Options as ReadOptions, ReadCond};
use lform::{print, Form, Keyword, Map, Printer, Reader, Symbol};
use lform_macros::form;

fn check_roundtrip_default(input: Form, printed: &str) {
    let string = lform::to_string(&input).expect("printing failed");
    assert_eq!(&string, printed);
    let output = lform::from_str(&string).expect("reading failed");
    assert_eq!(input, output);
}

fn check_roundtrip_compact(input: Form, printed: &str) {
    let options = print::Options::new().with_map_commas(false);
    let string = lform::to_string_custom(&input, options).expect("printing failed");
    assert_eq!(&string, printed);
    let output = lform::from_str(&string).expect("reading failed");
    assert_eq!(input, output);
}

#[test]
fn test_number() {
    check_roundtrip_default(form!(1.5), "1.5");
    check_roundtrip_default(form!(-1.0015065576612683), "-1.0015065576612683");
    check_roundtrip_default(form!(-1.360438755021694e308), "-1.360438755021694e308");
    check_roundtrip_default(form!(0), "0");
    check_roundtrip_default(lform::from_str("42N").unwrap(), "42N");
    check_roundtrip_default(lform::from_str("-6/4").unwrap(), "-3/2");
    check_roundtrip_default(lform::from_str("0.10M").unwrap(), "0.10M");
    check_roundtrip_default(Form::from(f64::NEG_INFINITY), "##-Inf");
}

#[test]
fn test_symbol() {
    check_roundtrip_default(form!(#"clojure.core/map"), "clojure.core/map");
    check_roundtrip_default(form!(#"?!<>"), "?!<>");
}

static SPECIAL_INITIALS: &str = "*+!-_?<>=$&%";

#[test]
fn test_special_symbols() {
    for initial in SPECIAL_INITIALS.chars() {
        let s = initial.to_string();
        check_roundtrip_default(Form::symbol(&s), &s);
        let s = format!("{}x", initial);
        check_roundtrip_default(Form::symbol(&s), &s);
    }
}

#[test]
fn test_peculiar_symbols() {
    for &peculiar in &["+", "-", "+foo", "-foo", "..", ".foo", "->>", "/", "ns//", "a'b", "x#"] {
        check_roundtrip_default(Form::symbol(peculiar), peculiar);
    }
}

#[test]
fn test_keyword() {
    check_roundtrip_default(form!(:foo), ":foo");
    check_roundtrip_default(form!(:"a-keyword"), ":a-keyword");
    check_roundtrip_default(
        Form::Keyword(Keyword::qualified("user", "id")),
        ":user/id",
    );
}

#[test]
fn test_string() {
    check_roundtrip_default(form!("a\n\t\"b\"\\"), r#""a\n\t\"b\"\\""#);
    check_roundtrip_default(form!("λ → ∞"), "\"λ → ∞\"");
}

#[test]
fn test_char() {
    check_roundtrip_default(form!('a'), r"\a");
    check_roundtrip_default(form!('\n'), r"\newline");
    check_roundtrip_default(form!(' '), r"\space");
    check_roundtrip_default(Form::Char('\u{0}'), r"\u0000");
}

#[test]
fn test_regex() {
    let form = lform::from_str(r#"#"[a-z]+\d\"""#).unwrap();
    check_roundtrip_default(form, r#"#"[a-z]+\d\"""#);
}

#[test]
fn test_collections() {
    check_roundtrip_default(form!(()), "()");
    check_roundtrip_default(form!([]), "[]");
    check_roundtrip_default(form!({}), "{}");
    check_roundtrip_default(form!(#{}), "#{}");
    check_roundtrip_default(
        form!([1 (a b) {:k #{nil}}]),
        "[1 (a b) {:k #{nil}}]",
    );
    check_roundtrip_default(form!({:a 1 :b [true]}), "{:a 1, :b [true]}");
    check_roundtrip_compact(form!({:a 1 :b [true]}), "{:a 1 :b [true]}");
}

#[test]
fn test_meta_roundtrip() {
    let mut meta = Map::new();
    meta.insert(Form::keyword("private"), Form::Bool(true));
    meta.insert(Form::keyword("tag"), Form::symbol("String"));
    let input = form!([x]).with_meta(meta.clone());

    let options = print::Options::new().with_meta(true);
    let string = lform::to_string_custom(&input, options).expect("printing failed");
    assert_eq!(string, "^{:private true, :tag String} [x]");
    let output = lform::from_str(&string).expect("reading failed");
    assert_eq!(output, input);
    assert_eq!(output.meta(), Some(&meta));
}

#[test]
fn test_preserved_syntax() {
    let options = ReadOptions::new().with_read_cond(ReadCond::Preserve);
    for text in &[
        "#?(:clj (java.util.Date.) :cljs (js/Date.))",
        "[#?@(:clj [1 2]) 3]",
        "#uuid \"0f6fd0b1-31e3-4c34-a1a6-1b8c6b1b0b0e\"",
        "#js {:a 1}",
    ] {
        let form = lform::from_str_custom(text, options.clone()).expect("reading failed");
        assert_eq!(lform::to_string(&form).unwrap(), *text);
        let again = lform::from_str_custom(text, options.clone()).unwrap();
        assert_eq!(form, again);
    }
}

#[test]
fn test_stream() {
    let forms = vec![
        form!((ns demo)),
        form!((def x ~42)),
        Form::Symbol(Symbol::qualified("demo", "x")),
    ];
    let mut printer = Printer::new(Vec::new());
    for form in &forms {
        printer.print(form).unwrap();
        std::io::Write::write_all(&mut printer, b"\n").unwrap();
    }
    let bytes = printer.into_inner();

    let mut reader = Reader::from_slice(&bytes).unwrap();
    let mut output = Vec::new();
    while let Some(form) = reader.read().unwrap() {
        output.push(form);
    }
    assert_eq!(output, forms);
}
