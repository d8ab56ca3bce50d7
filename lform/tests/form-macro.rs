use lform::{Form, Keyword, Symbol};
use lform_macros::form;

#[test]
fn test_atoms() {
    assert_eq!(form!(nil), Form::Nil);
    assert_eq!(form!(true), Form::Bool(true));
    assert_eq!(form!(false), Form::Bool(false));
    assert_eq!(form!("text"), Form::from("text"));
    assert_eq!(form!('x'), Form::Char('x'));
}

#[test]
fn test_numbers() {
    assert_eq!(form!(123), Form::from(123));
    assert_eq!(form!(123.4), Form::from(123.4));
    assert_eq!(form!(-123), Form::from(-123));
    assert_eq!(form!(-64.0), Form::from(-64.0));
}

#[test]
fn test_symbols() {
    assert_eq!(form!(foo), Form::symbol("foo"));
    assert_eq!(form!(#"a-symbol"), Form::symbol("a-symbol"));
    assert_eq!(form!(->>), Form::symbol("->>"));
    assert_eq!(form!(+), Form::symbol("+"));
    assert_eq!(form!(<=), Form::symbol("<="));
    assert_eq!(
        form!(#"clojure.core/map"),
        Form::Symbol(Symbol::qualified("clojure.core", "map"))
    );
}

#[test]
fn test_keywords() {
    assert_eq!(form!(:foo), Form::keyword("foo"));
    assert_eq!(form!(:"a-keyword"), Form::keyword("a-keyword"));
    assert_eq!(
        form!(:"user/id"),
        Form::Keyword(Keyword::qualified("user", "id"))
    );
}

#[test]
fn test_collections() {
    assert_eq!(form!(()), Form::empty_list());
    assert_eq!(
        form!((a b)),
        Form::list(vec![Form::symbol("a"), Form::symbol("b")])
    );
    assert_eq!(form!([1 2 3]), Form::vector(vec![1, 2, 3]));
    assert_eq!(form!([1, 2, 3]), Form::vector(vec![1, 2, 3]));
    assert_eq!(
        form!({:a 1, :b 2}),
        Form::map(vec![(Form::keyword("a"), 1), (Form::keyword("b"), 2)])
    );
    assert_eq!(form!(#{1 2}), Form::set(vec![2, 1]));
}

#[test]
fn test_same_as_reader() {
    let text = r#"(defn greet [name] {:greeting "hello" :to name :tags #{:a}})"#;
    assert_eq!(
        form!((defn greet [name] {:greeting "hello" :to name :tags #{:a}})),
        lform::from_str(text).unwrap()
    );
}

#[test]
fn test_unquote() {
    let n = 5;
    let name = "x";
    assert_eq!(
        form!((inc ~n)),
        Form::list(vec![Form::symbol("inc"), Form::from(5)])
    );
    assert_eq!(form!(~name), Form::from("x"));
    assert_eq!(form!([~(1 + 2)]), Form::vector(vec![3]));
    let inner = form!((a b));
    assert_eq!(form!((quote ~inner)), lform::from_str("(quote (a b))").unwrap());
    assert_eq!(form!({:n ~n}), form!({:n 5}));
}

#[test]
fn test_unquote_splicing() {
    let items = vec![1, 2];
    assert_eq!(form!([0 ~@items 3]), Form::vector(vec![0, 1, 2, 3]));
    let items = vec![Form::keyword("a")];
    assert_eq!(
        form!((f ~@items)),
        Form::list(vec![Form::symbol("f"), Form::keyword("a")])
    );
    assert_eq!(form!(#{~@(vec![1, 1, 2])}), Form::set(vec![1, 2]));
    assert_eq!(form!((f ~@(Vec::<i64>::new()))), form!((f)));
}
