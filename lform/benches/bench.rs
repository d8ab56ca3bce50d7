use criterion::*;

use lform::reader::{Options, ReadCond};
use lform::{from_str, from_str_custom, to_string, Reader};

static SOURCE: &str = r#"
(ns app.core
  (:require [clojure.string :as str]))

(defn greet
  "Greets someone."
  [{:keys [name] :as person}]
  #?(:clj  (str "Hello, " name \!)
     :cljs (js/alert name)))

(defmacro unless [test & body]
  `(if ~test nil (do ~@body)))

(def config {:port 8080 :hosts #{"a" "b"} :ratio 3/4 :big 12345678901234567890N})
(map #(* % %2) [1 2 3] [4 5 6])
"#;

fn bench_float_reading(c: &mut Criterion) {
    c.bench_function("float reading", |b| {
        b.iter(|| black_box(from_str("-1.360438755021694e308")))
    });
}

fn bench_reading_source(c: &mut Criterion) {
    c.bench_function("source reading", |b| {
        b.iter(|| {
            let mut reader = Reader::from_str(black_box(SOURCE));
            let mut count = 0;
            while let Some(form) = reader.read().unwrap() {
                black_box(form);
                count += 1;
            }
            count
        })
    });
}

fn bench_reading_preserved(c: &mut Criterion) {
    let options = Options::new().with_read_cond(ReadCond::Preserve);
    c.bench_function("reading with preserved conditionals", |b| {
        b.iter(|| black_box(from_str_custom("[#?(:clj 1 :cljs 2) #inst \"2020\"]", options.clone())))
    });
}

fn bench_printing(c: &mut Criterion) {
    let form = from_str("{:port 8080 :hosts #{\"a\" \"b\"} :nested [(a b) 1.5 \\x]}").unwrap();
    c.bench_function("printing", |b| b.iter(|| black_box(to_string(&form))));
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_float_reading, bench_reading_source, bench_reading_preserved, bench_printing
}
criterion_main!(benches);
