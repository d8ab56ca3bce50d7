use crate::{Form, Keyword};

/// A type that can be used to index into a `lform::Form`.
///
/// The [`get`] method of `Form` accepts any type that implements `Index`, as
/// does the square-bracket indexing operator. This trait is implemented for
/// `usize`, which indexes into lists and vectors by position, for strings,
/// which look up a map entry keyed by the unqualified keyword of that name,
/// and for `Form`, which looks up a map entry by an arbitrary key.
///
/// [`get`]: enum.Form.html#method.get
///
/// This trait is sealed and cannot be implemented for types outside of
/// `lform`.
///
/// # Examples
///
/// ```
/// # use lform::Form;
/// let data = lform::from_str("{:deps [foo bar] \"x\" 1}").unwrap();
///
/// let deps = &data["deps"];
/// assert_eq!(deps[1], Form::symbol("bar"));
/// assert_eq!(data[Form::from("x")], Form::from(1));
/// ```
pub trait Index: private::Sealed {
    /// Return None if the key is not present.
    #[doc(hidden)]
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form>;
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<'a, T: ?Sized> Sealed for &'a T where T: Sealed {}
    impl Sealed for super::Form {}
}

impl Index for usize {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        v.as_seq().and_then(|items| items.get(*self))
    }
}

impl Index for str {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        let key = Form::Keyword(Keyword::new(self));
        v.as_map().and_then(|map| map.get(&key))
    }
}

impl Index for String {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        self[..].index_into(v)
    }
}

impl<'a, T: ?Sized> Index for &'a T
where
    T: Index,
{
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        (**self).index_into(v)
    }
}

impl Index for Form {
    fn index_into<'v>(&self, v: &'v Form) -> Option<&'v Form> {
        v.as_map().and_then(|map| map.get(self))
    }
}
