use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::slice;

use crate::Form;

/// Positions of entries, grouped by the hash of their key.
#[derive(Clone, Default)]
struct Buckets {
    state: RandomState,
    slots: HashMap<u64, Vec<usize>>,
}

impl Buckets {
    fn hash(&self, form: &Form) -> u64 {
        let mut hasher = self.state.build_hasher();
        form.hash(&mut hasher);
        hasher.finish()
    }

    fn find(&self, hash: u64, mut is_match: impl FnMut(usize) -> bool) -> Option<usize> {
        self.slots
            .get(&hash)?
            .iter()
            .copied()
            .find(|&pos| is_match(pos))
    }

    fn push(&mut self, hash: u64, pos: usize) {
        self.slots.entry(hash).or_default().push(pos);
    }
}

/// An insertion-ordered map from forms to forms.
///
/// Keys are compared with [`Form`] equality, so metadata attached to a key
/// does not distinguish it from an otherwise identical key. Entries are
/// kept in a vector, with a hash index over the keys for lookups.
///
/// Equality between maps does not depend on the order of entries.
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Form, Form)>,
    index: Buckets,
}

impl Map {
    /// Construct an empty map.
    pub fn new() -> Self {
        Map::default()
    }

    /// Build a map from key-value pairs, rejecting duplicate keys.
    ///
    /// On failure, the first key that occurs twice is returned.
    ///
    /// ```
    /// # use lform::{Form, Map};
    /// let ok = Map::from_pairs(vec![(Form::from(1), Form::from("a"))]);
    /// assert!(ok.is_ok());
    /// let dup = Map::from_pairs(vec![(Form::from(1), Form::Nil), (Form::from(1), Form::Nil)]);
    /// assert_eq!(dup.unwrap_err(), Form::from(1));
    /// ```
    pub fn from_pairs<I>(pairs: I) -> Result<Self, Form>
    where
        I: IntoIterator<Item = (Form, Form)>,
    {
        let mut map = Map::new();
        for (key, value) in pairs {
            let hash = map.index.hash(&key);
            if map.position(hash, &key).is_some() {
                return Err(key);
            }
            map.push(hash, key, value);
        }
        Ok(map)
    }

    /// Insert an entry, replacing the value of an existing equal key.
    ///
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: Form, value: Form) -> Option<Form> {
        let hash = self.index.hash(&key);
        match self.position(hash, &key) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.push(hash, key, value);
                None
            }
        }
    }

    fn position(&self, hash: u64, key: &Form) -> Option<usize> {
        self.index.find(hash, |pos| self.entries[pos].0 == *key)
    }

    fn push(&mut self, hash: u64, key: Form, value: Form) {
        self.index.push(hash, self.entries.len());
        self.entries.push((key, value));
    }

    /// Look up the value stored for `key`.
    pub fn get(&self, key: &Form) -> Option<&Form> {
        let pos = self.position(self.index.hash(key), key)?;
        Some(&self.entries[pos].1)
    }

    /// Returns true if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &Form) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Form> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Copy all entries of `other` into this map, overriding existing keys.
    pub fn merge(&mut self, other: &Map) {
        for (key, value) in other {
            self.insert(key.clone(), value.clone());
        }
    }
}

/// Iterator over the entries of a [`Map`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (Form, Form)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Form, &'a Form);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Form, &'a Form);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Map {
    type Item = (Form, Form);
    type IntoIter = std::vec::IntoIter<(Form, Form)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Later entries win over earlier ones with an equal key.
impl FromIterator<(Form, Form)> for Map {
    fn from_iter<T: IntoIterator<Item = (Form, Form)>>(iter: T) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Map) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

/// An insertion-ordered set of forms.
///
/// Like [`Map`], membership is decided by [`Form`] equality and equality
/// between sets ignores order.
#[derive(Clone, Default)]
pub struct Set {
    items: Vec<Form>,
    index: Buckets,
}

impl Set {
    /// Construct an empty set.
    pub fn new() -> Self {
        Set::default()
    }

    /// Build a set, rejecting duplicate elements.
    ///
    /// On failure, the first element that occurs twice is returned.
    pub fn from_items<I>(items: I) -> Result<Self, Form>
    where
        I: IntoIterator<Item = Form>,
    {
        let mut set = Set::new();
        for item in items {
            let hash = set.index.hash(&item);
            if set.position(hash, &item).is_some() {
                return Err(item);
            }
            set.push(hash, item);
        }
        Ok(set)
    }

    /// Add an element. Returns false if an equal element was already present.
    pub fn insert(&mut self, item: Form) -> bool {
        let hash = self.index.hash(&item);
        if self.position(hash, &item).is_some() {
            false
        } else {
            self.push(hash, item);
            true
        }
    }

    /// Returns true if an element equal to `item` is present.
    pub fn contains(&self, item: &Form) -> bool {
        self.position(self.index.hash(item), item).is_some()
    }

    fn position(&self, hash: u64, item: &Form) -> Option<usize> {
        self.index.find(hash, |pos| self.items[pos] == *item)
    }

    fn push(&mut self, hash: u64, item: Form) {
        self.index.push(hash, self.items.len());
        self.items.push(item);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Form> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Form;
    type IntoIter = slice::Iter<'a, Form>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Set {
    type Item = Form;
    type IntoIter = std::vec::IntoIter<Form>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<Form> for Set {
    fn from_iter<T: IntoIterator<Item = Form>>(iter: T) -> Self {
        let mut set = Set::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Set) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}
