//! Ordered, case-insensitive header storage with copy-on-write updates.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use tracing::trace;
use triomphe::Arc;

use super::name::HeaderName;
use super::value::{IntoHeaderValues, validate_and_trim};
use crate::error::InvalidArgument;

/// The header names used for host priming.
const HOST: &str = "Host";
const HOST_KEY: &str = "host";

/// An immutable collection of HTTP headers.
///
/// - names are matched case-insensitively, while the casing seen at first
///   insertion (or at the last [`with_header`](Self::with_header)) is kept for output
/// - each name maps to an ordered sequence of trimmed values
/// - iteration follows insertion order
///
/// Every operation returning a collection leaves the receiver untouched. The
/// storage is shared between handles, so cloning is cheap, and a no-op
/// [`without_header`](Self::without_header) hands back the identical instance
/// (see [`HeaderCollection::ptr_eq`]).
#[derive(Clone)]
pub struct HeaderCollection {
    entries: Arc<IndexMap<String, Entry>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    name: HeaderName,
    values: Vec<String>,
}

impl HeaderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from `(name, value(s))` pairs.
    ///
    /// Names repeated under a different casing are merged into the first entry,
    /// their values appended in order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] on the first invalid name, invalid value or
    /// empty value sequence.
    pub fn from_iter_checked<I, K, V>(headers: I) -> Result<Self, InvalidArgument>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoHeaderValues,
    {
        let mut entries = IndexMap::new();
        for (name, values) in headers {
            merge(&mut entries, name.as_ref(), values)?;
        }
        Ok(Self { entries: Arc::new(entries) })
    }

    /// Returns `true` when both handles point to the same storage.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.entries, &other.entries)
    }

    /// Number of distinct header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive existence check.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns the values of `name`, or an empty slice if there is none.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries.get(&name.to_ascii_lowercase()).map(|entry| entry.values.as_slice()).unwrap_or_default()
    }

    /// Returns the values of `name` joined with `", "`.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Returns the declared name stored for `name`.
    pub fn declared_name(&self, name: &str) -> Option<&HeaderName> {
        self.entries.get(&name.to_ascii_lowercase()).map(|entry| &entry.name)
    }

    /// Iterates `(name, values)` in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.values() }
    }

    /// Iterates declared header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &HeaderName> {
        self.entries.values().map(|entry| &entry.name)
    }

    /// Returns a collection where `name` holds exactly `value`.
    ///
    /// An existing entry for the name, under any casing, is removed and the new
    /// entry, declared with the given casing, goes to the end of the order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] for an invalid name, an invalid value or an
    /// empty value sequence.
    pub fn with_header<V: IntoHeaderValues>(&self, name: &str, value: V) -> Result<Self, InvalidArgument> {
        let name = HeaderName::new(name)?;
        let values = validate_and_trim(name.as_str(), value.into_header_values())?;
        let key = name.key();

        let mut new = self.clone();
        let entries = Arc::make_mut(&mut new.entries);
        if let Some(previous) = entries.shift_remove(&key) {
            trace!(header = %previous.name, "replace header");
        }
        entries.insert(key, Entry { name, values });
        Ok(new)
    }

    /// Returns a collection with `value` appended to the values of `name`.
    ///
    /// An existing entry keeps its position and declared casing.
    ///
    /// # Errors
    ///
    /// Same as [`with_header`](Self::with_header).
    pub fn with_added_header<V: IntoHeaderValues>(&self, name: &str, value: V) -> Result<Self, InvalidArgument> {
        let mut entries = IndexMap::clone(&self.entries);
        merge(&mut entries, name, value)?;
        Ok(Self { entries: Arc::new(entries) })
    }

    /// Returns a collection without `name`, or the identical instance when the
    /// name is absent.
    pub fn without_header(&self, name: &str) -> Self {
        let key = name.to_ascii_lowercase();
        if !self.entries.contains_key(&key) {
            return self.clone();
        }

        let mut new = self.clone();
        Arc::make_mut(&mut new.entries).shift_remove(&key);
        new
    }

    /// Returns a collection whose first entry is `Host: host`, followed by every
    /// other header in its current order.
    ///
    /// The previously declared casing of `Host` is reused if there was one.
    pub(crate) fn with_host_first(&self, host: String) -> Self {
        let name = self
            .entries
            .get(HOST_KEY)
            .map_or_else(|| HeaderName::from_static(HOST), |entry| entry.name.clone());
        trace!(%host, "prime host header");

        let mut entries = IndexMap::with_capacity(self.entries.len() + 1);
        entries.insert(HOST_KEY.to_string(), Entry { name, values: vec![host] });
        entries.extend(
            self.entries
                .iter()
                .filter(|(key, _)| key.as_str() != HOST_KEY)
                .map(|(key, entry)| (key.clone(), entry.clone())),
        );
        Self { entries: Arc::new(entries) }
    }
}

/// Validates one `(name, values)` pair and folds it into `entries`.
///
/// Values for a known name are appended to the existing entry, otherwise a new
/// entry is created with the given casing.
fn merge<V: IntoHeaderValues>(
    entries: &mut IndexMap<String, Entry>,
    name: &str,
    values: V,
) -> Result<(), InvalidArgument> {
    let name = HeaderName::new(name)?;
    let values = validate_and_trim(name.as_str(), values.into_header_values())?;

    match entries.entry(name.key()) {
        MapEntry::Occupied(mut occupied) => occupied.get_mut().values.extend(values),
        MapEntry::Vacant(vacant) => {
            vacant.insert(Entry { name, values });
        }
    }
    Ok(())
}

impl Default for HeaderCollection {
    fn default() -> Self {
        Self { entries: Arc::new(IndexMap::new()) }
    }
}

impl PartialEq for HeaderCollection {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || self.iter().eq(other.iter())
    }
}

impl Eq for HeaderCollection {}

impl fmt::Debug for HeaderCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(name, values)` pairs of a [`HeaderCollection`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: indexmap::map::Values<'a, String, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a HeaderName, &'a [String]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.name, entry.values.as_slice()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HeaderCollection {
    type Item = (&'a HeaderName, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<&http::HeaderMap> for HeaderCollection {
    type Error = InvalidArgument;

    fn try_from(map: &http::HeaderMap) -> Result<Self, Self::Error> {
        let mut entries = IndexMap::with_capacity(map.keys_len());
        for (name, value) in map {
            let value = std::str::from_utf8(value.as_bytes())
                .map_err(|e| InvalidArgument::invalid_header_value(format!("{name}: {e}")))?;
            merge(&mut entries, name.as_str(), value)?;
        }
        Ok(Self { entries: Arc::new(entries) })
    }
}

impl TryFrom<&HeaderCollection> for http::HeaderMap {
    type Error = InvalidArgument;

    fn try_from(headers: &HeaderCollection) -> Result<Self, Self::Error> {
        let mut map = http::HeaderMap::with_capacity(headers.len());
        for (name, values) in headers {
            let header_name = http::HeaderName::from_bytes(name.as_str().as_bytes())
                .map_err(|e| InvalidArgument::invalid_header_name(format!("{name}: {e}")))?;
            for value in values {
                let header_value = http::HeaderValue::from_bytes(value.as_bytes())
                    .map_err(|e| InvalidArgument::invalid_header_value(format!("{value}: {e}")))?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}
