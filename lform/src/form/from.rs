use std::borrow::Cow;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{Form, Keyword, Map, Number, Pattern, Set, Symbol};

macro_rules! impl_from_number {
    (
        $($ty:ty),*
    ) => {
        $(
            impl From<$ty> for Form {
                #[inline]
                fn from(n: $ty) -> Self {
                    Form::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<BigInt> for Form {
    fn from(n: BigInt) -> Self {
        Form::Number(Number::bigint(n))
    }
}

impl From<BigDecimal> for Form {
    fn from(d: BigDecimal) -> Self {
        Form::Number(Number::decimal(d))
    }
}

impl From<Number> for Form {
    fn from(n: Number) -> Self {
        Form::Number(n)
    }
}

impl From<&str> for Form {
    #[inline]
    fn from(s: &str) -> Self {
        Form::String(s.into())
    }
}

impl<'a> From<Cow<'a, str>> for Form {
    #[inline]
    fn from(s: Cow<'a, str>) -> Self {
        Form::from(s.as_ref())
    }
}

impl From<Box<str>> for Form {
    #[inline]
    fn from(s: Box<str>) -> Self {
        Form::String(s)
    }
}

impl From<String> for Form {
    #[inline]
    fn from(s: String) -> Self {
        Form::String(s.into_boxed_str())
    }
}

impl From<bool> for Form {
    #[inline]
    fn from(v: bool) -> Self {
        Form::Bool(v)
    }
}

impl From<char> for Form {
    #[inline]
    fn from(c: char) -> Self {
        Form::Char(c)
    }
}

impl From<Symbol> for Form {
    fn from(sym: Symbol) -> Self {
        Form::Symbol(sym)
    }
}

impl From<Keyword> for Form {
    fn from(kw: Keyword) -> Self {
        Form::Keyword(kw)
    }
}

impl From<Map> for Form {
    fn from(map: Map) -> Self {
        Form::Map(map)
    }
}

impl From<Set> for Form {
    fn from(set: Set) -> Self {
        Form::Set(set)
    }
}

impl From<Pattern> for Form {
    fn from(pattern: Pattern) -> Self {
        Form::Regex(pattern)
    }
}

impl<T> From<Vec<T>> for Form
where
    T: Into<Form>,
{
    /// A `Vec` becomes a vector form.
    fn from(items: Vec<T>) -> Self {
        Form::vector(items)
    }
}

impl<T> From<Option<T>> for Form
where
    T: Into<Form>,
{
    /// `None` becomes `nil`.
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Form::Nil, Into::into)
    }
}
