//! Ordered name → value lookup table.
//!
//! The table is searched newest-first, so a later [`PairTable::add`] of an
//! existing name overrides the earlier entry without removing it. Lookups come
//! in exact and prefix flavours, each case-sensitive or ASCII
//! case-insensitive. Prefix lookup is what streaming decoders use: the source
//! may continue past the match and the returned length tells the caller how
//! far to advance.
//!
//! A table either borrows an immutable slice ([`PairTable::from_static`]) or
//! owns a growable store ([`PairTable::new`]). Mutating a borrowed table copies
//! it into owned storage first; the borrowed slice itself is never touched.

/// One `(name, value)` pair.
///
/// Names are borrowed, never copied: the table cannot outlive the strings it
/// was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a, V> {
    /// Lookup key.
    pub name: &'a str,
    /// Associated value.
    pub value: V,
}

impl<'a, V> Entry<'a, V> {
    /// Create an entry. Usable in `static` tables.
    #[must_use]
    pub const fn new(name: &'a str, value: V) -> Self {
        Self { name, value }
    }
}

/// Backing store of a [`PairTable`]: a borrowed slice until the first
/// mutation, an owned copy after.
///
/// Unlike `Cow<[Entry]>` this stays covariant in `'a`, so a
/// `&'static PairTable<'static, V>` can stand in for any shorter-lived table.
#[derive(Debug, Clone)]
struct Entries<'a, V> {
    borrowed: &'a [Entry<'a, V>],
    owned: Option<Vec<Entry<'a, V>>>,
}

impl<'a, V: Clone> Entries<'a, V> {
    fn as_slice(&self) -> &[Entry<'a, V>] {
        self.owned.as_deref().unwrap_or(self.borrowed)
    }

    /// Copy a borrowed slice into owned storage.
    fn to_mut(&mut self) -> &mut Vec<Entry<'a, V>> {
        let borrowed = self.borrowed;
        self.owned.get_or_insert_with(|| borrowed.to_vec())
    }
}

/// Name → value table searched most-recently-added first.
#[derive(Debug, Clone)]
pub struct PairTable<'a, V>
where
    V: Clone,
{
    entries: Entries<'a, V>,
}

impl<'a, V: Clone> PairTable<'a, V> {
    /// Default capacity of an owned table.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create an empty owned table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty owned table with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Entries {
                borrowed: &[],
                owned: Some(Vec::with_capacity(capacity)),
            },
        }
    }

    /// Create a table over a caller-supplied slice it does not own.
    ///
    /// The last element of the slice is searched first.
    #[must_use]
    pub const fn from_static(entries: &'a [Entry<'a, V>]) -> Self {
        Self {
            entries: Entries {
                borrowed: entries,
                owned: None,
            },
        }
    }

    /// Number of entries, overridden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_slice().len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.as_slice().is_empty()
    }

    /// Whether the table still borrows its initial slice.
    #[must_use]
    pub const fn is_borrowed(&self) -> bool {
        self.entries.owned.is_none()
    }

    /// Append a pair without checking for duplicates.
    ///
    /// The new pair shadows any older pair with the same name.
    pub fn add(&mut self, name: &'a str, value: V) {
        self.entries.to_mut().push(Entry::new(name, value));
    }

    /// Replace the value of the newest entry called `name`.
    ///
    /// Returns the previous value. If there is no such entry the pair is
    /// added and `None` is returned.
    pub fn replace(&mut self, name: &'a str, value: V) -> Option<V> {
        match self.entries.as_slice().iter().rposition(|entry| entry.name == name) {
            Some(index) => {
                let entries = self.entries.to_mut();
                Some(std::mem::replace(&mut entries[index].value, value))
            }
            None => {
                self.add(name, value);
                None
            }
        }
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&V> {
        self.iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    /// Exact, ASCII case-insensitive lookup.
    #[must_use]
    pub fn find_case(&self, name: &str) -> Option<&V> {
        self.iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| &entry.value)
    }

    /// Find the newest entry whose name is a leading substring of `src`.
    ///
    /// Returns the value and the length of the matched name.
    #[must_use]
    pub fn find_prefix(&self, src: &[u8]) -> Option<(&V, usize)> {
        self.iter()
            .find(|entry| !entry.name.is_empty() && src.starts_with(entry.name.as_bytes()))
            .map(|entry| (&entry.value, entry.name.len()))
    }

    /// Like [`PairTable::find_prefix`] but ASCII case-insensitive.
    #[must_use]
    pub fn find_case_prefix(&self, src: &[u8]) -> Option<(&V, usize)> {
        self.iter()
            .find(|entry| {
                let name = entry.name.as_bytes();
                !name.is_empty()
                    && src.len() >= name.len()
                    && src[..name.len()].eq_ignore_ascii_case(name)
            })
            .map(|entry| (&entry.value, entry.name.len()))
    }

    /// Iterate entries in search order (newest first).
    pub fn iter(&self) -> impl Iterator<Item = &Entry<'a, V>> {
        self.entries.as_slice().iter().rev()
    }
}

impl<V: Clone> Default for PairTable<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}
