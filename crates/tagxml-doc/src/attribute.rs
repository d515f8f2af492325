//! Ordered attribute storage for a single tag.

use tagxml_common::number;

/// Conversion of a value into attribute text.
///
/// Integers are written as decimal text, floating point values via
/// [`number::format_f32`]/[`number::format_f64`], and booleans as `1`/`0`.
pub trait ToAttribute {
    /// Format the value as it is stored in a tag.
    fn to_attribute(&self) -> String;
}

/// Conversion of attribute text back into a value.
///
/// Conversions never fail on malformed text; they degrade to whatever the
/// lenient number parser yields, usually zero. `None` means "use the
/// caller's default", which numeric types report for an empty value.
pub trait FromAttribute: Sized {
    /// Parse stored attribute text.
    fn from_attribute(text: &str) -> Option<Self>;
}

impl ToAttribute for str {
    fn to_attribute(&self) -> String {
        self.to_owned()
    }
}

impl ToAttribute for String {
    fn to_attribute(&self) -> String {
        self.clone()
    }
}

impl<T: ToAttribute + ?Sized> ToAttribute for &T {
    fn to_attribute(&self) -> String {
        (**self).to_attribute()
    }
}

impl ToAttribute for i32 {
    fn to_attribute(&self) -> String {
        self.to_string()
    }
}

impl ToAttribute for i64 {
    fn to_attribute(&self) -> String {
        self.to_string()
    }
}

impl ToAttribute for f32 {
    fn to_attribute(&self) -> String {
        number::format_f32(*self)
    }
}

impl ToAttribute for f64 {
    fn to_attribute(&self) -> String {
        number::format_f64(*self)
    }
}

impl ToAttribute for bool {
    fn to_attribute(&self) -> String {
        (if *self { "1" } else { "0" }).to_string()
    }
}

impl FromAttribute for String {
    fn from_attribute(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }
}

impl FromAttribute for i32 {
    fn from_attribute(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| number::parse_i32(text))
    }
}

impl FromAttribute for i64 {
    fn from_attribute(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| number::parse_i64(text))
    }
}

impl FromAttribute for f32 {
    fn from_attribute(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| number::parse_f32(text))
    }
}

impl FromAttribute for f64 {
    fn from_attribute(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| number::parse_f64(text))
    }
}

impl FromAttribute for bool {
    fn from_attribute(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| number::parse_i64(text) != 0)
    }
}

/// The `key=value` pairs of one tag, in insertion order.
///
/// Duplicate keys are kept as separate entries; lookups by key return the
/// first match unless an instance index is given. Keys compare
/// case-insensitively (ASCII).
///
/// # Example
///
/// ```
/// use tagxml_doc::AttributeMap;
///
/// let mut attributes = AttributeMap::new();
/// attributes.push("CHANNEL", 0);
/// attributes.push("CHANNEL", 1);
/// attributes.set("RATE", 48000);
///
/// assert_eq!(attributes.len(), 3);
/// assert_eq!(attributes.get_instance("channel", 1, -1), 1);
/// assert_eq!(attributes.get("RATE", 0), 48000);
/// assert_eq!(attributes.get("BITS", 16), 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Set `key` to `value`, overwriting the first existing entry for `key`
    /// or appending a new one.
    pub fn set(&mut self, key: &str, value: impl ToAttribute) {
        let value = value.to_attribute();
        if !Self::accepts(key, &value) {
            return;
        }

        match self.position(key, 0) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key.to_owned(), value)),
        }
    }

    /// Append an entry even if `key` is already present.
    pub fn push(&mut self, key: &str, value: impl ToAttribute) {
        let value = value.to_attribute();
        if Self::accepts(key, &value) {
            self.entries.push((key.to_owned(), value));
        }
    }

    /// Remove the first entry for `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.position(key, 0)?;
        Some(self.entries.remove(index).1)
    }

    /// Check if any entry has `key`.
    pub fn has(&self, key: &str) -> bool {
        self.position(key, 0).is_some()
    }

    /// Check if any entry has both `key` and `value`, ignoring ASCII case.
    pub fn test(&self, key: &str, value: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(key) && v.eq_ignore_ascii_case(value))
    }

    /// Number of entries for `key`.
    pub fn instances(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .count()
    }

    /// Get the raw text of the first entry for `key`.
    #[inline]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.text_instance(key, 0)
    }

    /// Get the raw text of the `instance`-th (0-based) entry for `key`.
    pub fn text_instance(&self, key: &str, instance: usize) -> Option<&str> {
        self.position(key, instance)
            .map(|index| self.entries[index].1.as_str())
    }

    /// Get the first value for `key`, or `default` if there is none.
    #[inline]
    pub fn get<T: FromAttribute>(&self, key: &str, default: T) -> T {
        self.get_instance(key, 0, default)
    }

    /// Get the `instance`-th value for `key`, or `default` if fewer than
    /// `instance + 1` entries exist.
    pub fn get_instance<T: FromAttribute>(&self, key: &str, instance: usize, default: T) -> T {
        self.text_instance(key, instance)
            .and_then(T::from_attribute)
            .unwrap_or(default)
    }

    /// Key of the entry at `index`.
    #[inline]
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(k, _)| k.as_str())
    }

    /// Value of the entry at `index`.
    #[inline]
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, v)| v.as_str())
    }

    /// Iterate over all entries in insertion order, duplicates included.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Index of the `instance`-th entry for `key`.
    fn position(&self, key: &str, instance: usize) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (k, _))| k.eq_ignore_ascii_case(key))
            .nth(instance)
            .map(|(index, _)| index)
    }

    /// Reject an entry with both an empty key and an empty value, which would
    /// serialize to a bare `=` and break positional round trips.
    ///
    /// An empty key with a value is kept, but [`Tag::parse`](crate::Tag::parse)
    /// drops keyless pairs, so it does not survive a write/parse round trip.
    fn accepts(key: &str, value: &str) -> bool {
        if key.is_empty() {
            if value.is_empty() {
                log::error!("attribute with empty key and empty value rejected");
                return false;
            }
            log::warn!("attribute {:?} has an empty key and will not be read back", value);
        }
        true
    }
}

impl<K: AsRef<str>, V: ToAttribute> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V: ToAttribute> Extend<(K, V)> for AttributeMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key.as_ref(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_first_match() {
        let mut map = AttributeMap::new();
        map.set("SRC", "a.mov");
        map.set("src", "b.mov");

        assert_eq!(map.len(), 1);
        assert_eq!(map.key_at(0), Some("SRC"));
        assert_eq!(map.text("SRC"), Some("b.mov"));
    }

    #[test]
    fn test_duplicate_keys_preserved() {
        let mut map = AttributeMap::new();
        for value in ["left", "right", "center"] {
            map.push("CHANNEL", value);
        }

        assert_eq!(map.len(), 3);
        assert_eq!(map.instances("CHANNEL"), 3);
        assert_eq!(map.get_instance("CHANNEL", 0, String::new()), "left");
        assert_eq!(map.get_instance("CHANNEL", 1, String::new()), "right");
        assert_eq!(map.get_instance("CHANNEL", 2, String::new()), "center");
        assert_eq!(map.get_instance("CHANNEL", 3, "none".to_string()), "none");
        assert_eq!(map.get("CHANNEL", String::new()), "left");
    }

    #[test]
    fn test_set_only_touches_first_duplicate() {
        let mut map: AttributeMap = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        map.set("A", 9);

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("A", "9"), ("B", "2"), ("A", "3")]);
    }

    #[test]
    fn test_typed_values() {
        let mut map = AttributeMap::new();
        map.set("RATE", 48000);
        map.set("LENGTH", 1i64 << 40);
        map.set("ASPECT", 1.5f32);
        map.set("FRAMERATE", 29.97f64);
        map.set("WHOLE", 25.0f64);
        map.set("SIGNED", true);

        assert_eq!(map.text("RATE"), Some("48000"));
        assert_eq!(map.text("ASPECT"), Some("1.500000e+00"));
        assert_eq!(map.text("WHOLE"), Some("25"));
        assert_eq!(map.text("SIGNED"), Some("1"));

        assert_eq!(map.get("RATE", 0), 48000);
        assert_eq!(map.get("LENGTH", 0i64), 1i64 << 40);
        assert_eq!(map.get("ASPECT", 0.0f32), 1.5);
        assert_eq!(map.get("FRAMERATE", 0.0f64), 29.97);
        assert_eq!(map.get("WHOLE", 0.0f64), 25.0);
        assert!(map.get("SIGNED", false));
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let map: AttributeMap = [("PRESENT", "1")].into_iter().collect();
        let before = map.clone();

        assert_eq!(map.get("missing-key", 7), 7);
        assert_eq!(map.get("missing-key", -7i64), -7);
        assert_eq!(map.get("missing-key", 2.5f32), 2.5);
        assert_eq!(map.get("missing-key", 0.125f64), 0.125);
        assert_eq!(map.get("missing-key", "dflt".to_string()), "dflt");
        assert!(map.get("missing-key", true));
        assert_eq!(map, before);
    }

    #[test]
    fn test_empty_value_uses_numeric_default() {
        let map: AttributeMap = [("EMPTY", "")].into_iter().collect();
        assert_eq!(map.get("EMPTY", 5), 5);
        assert_eq!(map.get("EMPTY", "x".to_string()), "");
    }

    #[test]
    fn test_malformed_numbers_degrade() {
        let map: AttributeMap = [("BAD", "abc"), ("HALF", "12px")].into_iter().collect();
        assert_eq!(map.get("BAD", 3), 0);
        assert_eq!(map.get("BAD", 3.0f64), 0.0);
        assert_eq!(map.get("HALF", 0), 12);
    }

    #[test]
    fn test_degenerate_pair_rejected() {
        let mut map = AttributeMap::new();
        map.set("A", "1");
        map.set("", "");
        map.push("", "");

        assert_eq!(map.len(), 1);
        map.push("", "orphan");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_has_test_remove() {
        let mut map: AttributeMap = [("TYPE", "QuickTime"), ("USE_HEADER", "1")].into_iter().collect();

        assert!(map.has("type"));
        assert!(map.test("TYPE", "quicktime"));
        assert!(!map.test("TYPE", "mpeg"));
        assert_eq!(map.remove("TYPE"), Some("QuickTime".to_string()));
        assert!(!map.has("TYPE"));
        assert_eq!(map.remove("TYPE"), None);
    }

    #[test]
    fn test_positional_access() {
        let map: AttributeMap = [("X", "1"), ("Y", "2")].into_iter().collect();
        assert_eq!(map.key_at(1), Some("Y"));
        assert_eq!(map.value_at(1), Some("2"));
        assert_eq!(map.key_at(2), None);
        assert_eq!(map.value_at(2), None);
    }
}
