use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// A string key that compares and hashes without regard to case.
///
/// Characters are compared by their simple upper-case mapping, one character at a time. Characters
/// whose upper case spans several characters (like `ß`) only match themselves, and so do characters
/// that are already upper case (like `İ` or the Kelvin sign).
///
/// The original spelling is retained, so the key can still be displayed the way it was first
/// offered.
#[derive(Clone, Debug)]
pub struct IgnoreCase(Cow<'static, str>);

impl IgnoreCase {
    /// Creates a new instance.
    ///
    /// # Parameters
    /// * `value`: The key text.
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// Retrieves the key text as it was provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().map(fold)
    }
}

fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

impl PartialEq for IgnoreCase {
    fn eq(&self, other: &Self) -> bool {
        self.folded().eq(other.folded())
    }
}

impl Eq for IgnoreCase {}

impl Hash for IgnoreCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.folded() {
            state.write_u32(c as u32);
        }
        // Prefix-free, like `str`.
        state.write_u8(0xFF);
    }
}

impl Display for IgnoreCase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IgnoreCase {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl From<String> for IgnoreCase {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A concurrent get-or-create cache.
///
/// Values are created at most once per key from the point of view of callers: when two threads race
/// to create a value for the same key, the first insert wins and every caller receives that value.
/// The losing value is dropped.
///
/// # Generic types
/// * `K`: The key type. This type should implement [`Eq`] and [`Hash`].
/// * `V`: The value type. This type should be cheap to [`Clone`] (usually an [`Arc`](std::sync::Arc)).
pub struct KeyedCache<K, V> {
    values: DashMap<K, V>,
}

impl<K, V> Debug for KeyedCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedCache")
            .field("values", &self.values)
            .finish()
    }
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash,
{
    /// Creates a new instance.
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the cache holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes all values.
    pub fn clear(&self) {
        self.values.clear();
    }
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Retrieves the value for a key, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    /// Retrieves the value for a key or creates it.
    ///
    /// The `create` function is called without holding any lock on the cache, so it is allowed to
    /// access the cache itself.
    ///
    /// # Parameters
    /// * `key`: The key.
    /// * `create`: A function that creates the value if it is not present yet.
    ///
    /// # Return
    /// The cached value.
    pub fn get_or_insert_with(&self, key: K, create: impl FnOnce(&K) -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = create(&key);
        match self.values.entry(key) {
            // Another caller got there first.
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(value).value().clone(),
        }
    }
}

impl<K, V> Default for KeyedCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
