//! A single tag: title plus attributes.

use std::fmt;

use tagxml_common::{codec, TextCursor};

use crate::{AttributeMap, FromAttribute, ToAttribute};

/// The characters that open and close a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Delimiters {
    /// Opening character, `<` by default.
    pub left: char,
    /// Closing character, `>` by default.
    pub right: char,
}

impl Delimiters {
    /// The usual `<` and `>` pair.
    pub const ANGLE: Self = Self::new('<', '>');

    /// Create a delimiter pair.
    pub const fn new(left: char, right: char) -> Self {
        Self { left, right }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::ANGLE
    }
}

/// One tag, such as `<ASSET SRC="foo.mov">`.
///
/// A closing tag is simply a tag whose title starts with `/`; the parser
/// treats all tags alike.
///
/// Values are escaped with [`codec`] when written, so any value survives a
/// write/parse round trip as long as it does not contain a non-standard
/// closing delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tag {
    title: String,
    attributes: AttributeMap,
    #[cfg_attr(feature = "serde", serde(skip))]
    delimiters: Delimiters,
}

impl Tag {
    /// Create an empty tag with `<` `>` delimiters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tag with custom delimiters.
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            ..Self::default()
        }
    }

    /// Create a tag with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Get the delimiters.
    #[inline]
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Replace the delimiters.
    pub fn set_delimiters(&mut self, delimiters: Delimiters) {
        self.delimiters = delimiters;
    }

    /// Clear title and attributes, keeping the delimiters.
    pub fn reset(&mut self) {
        self.title.clear();
        self.attributes.clear();
    }

    /// Get the title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Compare the title, ignoring ASCII case.
    #[inline]
    pub fn title_is(&self, title: &str) -> bool {
        self.title.eq_ignore_ascii_case(title)
    }

    /// Get the attributes.
    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Get the attributes mutably.
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }

    /// Append an attribute. Repeated keys produce repeated entries.
    pub fn set_property(&mut self, key: &str, value: impl ToAttribute) {
        self.attributes.push(key, value);
    }

    /// Get the first value for `key`, or `default`.
    pub fn property<T: FromAttribute>(&self, key: &str, default: T) -> T {
        self.attributes.get(key, default)
    }

    /// Get the raw text of the first value for `key`.
    pub fn property_text(&self, key: &str) -> Option<&str> {
        self.attributes.text(key)
    }

    /// Check if the tag has an attribute named `key`.
    pub fn has_property(&self, key: &str) -> bool {
        self.attributes.has(key)
    }

    /// Parse the next tag in `input` starting at byte offset `start`.
    ///
    /// Returns the offset just past the consumed text and whether a tag was
    /// found. The tag is cleared first. Parsing fails when there is no
    /// opening delimiter before the end of `input`, when the input ends
    /// inside the title, or when the tag has neither a title nor attributes.
    ///
    /// Attribute values may be bare (ending at a space) or double quoted.
    /// A tag that starts with `KEY=` has no title.
    pub fn parse(&mut self, input: &str, start: usize) -> (usize, bool) {
        let Delimiters { left, right } = self.delimiters;
        let separator = move |c: char| c == ' ' || c == '\n' || c == left;

        self.reset();
        let mut cursor = TextCursor::new_at(input, start);

        cursor.skip_to(left);
        cursor.skip_while(separator);
        if cursor.is_empty() {
            return (cursor.position(), false);
        }

        let title_start = cursor.position();
        let title = cursor.take_until(|c| c == '=' || c == ' ' || c == right);
        if cursor.is_empty() {
            return (cursor.position(), false);
        }

        if cursor.peek() == Some('=') {
            cursor.seek(title_start);
        } else {
            self.title.push_str(title);
        }

        while cursor.peek().is_some_and(|c| c != right) {
            cursor.skip_while(separator);
            let key = cursor.take_until(|c| c == right || c == ' ' || c == '\n' || c == '=');

            cursor.skip_while(|c| c == ' ' || c == '\n' || c == '=');
            let terminator = if cursor.eat('"') { '"' } else { ' ' };
            let value = cursor.take_until(|c| c == right || c == '\n' || c == terminator);

            if !key.is_empty() {
                self.attributes.push(key, &*codec::decode(value));
            }

            if cursor.peek().is_some_and(|c| c != right) {
                cursor.next_char();
            }
        }
        cursor.eat(right);

        let found = !self.title.is_empty() || !self.attributes.is_empty();
        (cursor.position(), found)
    }

    /// Append the text form of this tag to `out`.
    ///
    /// Values are quoted when empty or when they contain a space. Other
    /// values are written bare, so a value starting with `=` reads back
    /// without it: the parser skips every `=` after a key.
    pub fn write_to(&self, out: &mut String) {
        let Delimiters { left, right } = self.delimiters;

        out.push(left);
        out.push_str(&self.title);

        for (key, value) in self.attributes.iter() {
            out.push(' ');
            out.push_str(key);
            out.push('=');

            let quoted = value.is_empty() || value.contains(' ');
            if quoted {
                out.push('"');
            }
            codec::encode_into(value, out);
            if quoted {
                out.push('"');
            }
        }

        out.push(right);
    }

    /// Get the text form of this tag.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.title.len() + 16 * self.attributes.len() + 2);
        self.write_to(&mut out);
        out
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> (Tag, usize, bool) {
        let mut tag = Tag::new();
        let (end, found) = tag.parse(input, 0);
        (tag, end, found)
    }

    #[test]
    fn test_parse_title_and_attributes() {
        let (tag, end, found) = parsed(r#"<ASSET SRC="a.mov" LAYERS=1>rest"#);
        assert!(found);
        assert_eq!(end, 28);
        assert_eq!(tag.title(), "ASSET");
        assert_eq!(tag.property_text("SRC"), Some("a.mov"));
        assert_eq!(tag.property("LAYERS", 0), 1);
        assert_eq!(tag.attributes().len(), 2);
    }

    #[test]
    fn test_parse_skips_leading_text() {
        let input = "junk\n  < VIDEO HEIGHT=480>";
        let (tag, end, found) = parsed(input);
        assert!(found);
        assert_eq!(end, input.len());
        assert_eq!(tag.title(), "VIDEO");
        assert_eq!(tag.property("HEIGHT", 0), 480);
    }

    #[test]
    fn test_parse_untitled() {
        let (tag, _, found) = parsed("<KEY=1 OTHER=\"two words\">");
        assert!(found);
        assert_eq!(tag.title(), "");
        assert_eq!(tag.property_text("KEY"), Some("1"));
        assert_eq!(tag.property_text("OTHER"), Some("two words"));
    }

    #[test]
    fn test_parse_closing_tag() {
        let (tag, end, found) = parsed("</FOLDER>\n");
        assert!(found);
        assert_eq!(end, 9);
        assert!(tag.title_is("/folder"));
        assert!(tag.attributes().is_empty());
    }

    #[test]
    fn test_parse_failures() {
        assert!(!parsed("no tag here").2);
        assert!(!parsed("").2);
        assert!(!parsed("<>").2);
        assert!(!parsed("<   \n").2);
        assert!(!parsed("<UNTERMINATED").2);
    }

    #[test]
    fn test_parse_decodes_values() {
        let (tag, _, _) = parsed(r#"<T EXPR="a &lt; b &amp;&amp; c&#xAd" Q=&quot;x&quot;>"#);
        assert_eq!(tag.property_text("EXPR"), Some("a < b && c\nd"));
        assert_eq!(tag.property_text("Q"), Some("\"x\""));
    }

    #[test]
    fn test_parse_newline_separated_attributes() {
        let (tag, _, found) = parsed("<PLUGIN TITLE=Blur\nRADIUS=5\n>");
        assert!(found);
        assert_eq!(tag.title(), "PLUGIN");
        let entries: Vec<_> = tag.attributes().iter().collect();
        assert_eq!(entries, vec![("TITLE", "Blur"), ("RADIUS", "5")]);
    }

    #[test]
    fn test_parse_from_offset() {
        let input = "<A X=1><B Y=2>";
        let mut tag = Tag::new();
        let (end, found) = tag.parse(input, 0);
        assert!(found);
        assert_eq!(end, 7);

        let (end, found) = tag.parse(input, end);
        assert!(found);
        assert_eq!(end, input.len());
        assert_eq!(tag.title(), "B");
        assert!(!tag.has_property("X"));
        assert!(tag.has_property("Y"));
    }

    #[test]
    fn test_serialize() {
        let mut tag = Tag::titled("FORMAT");
        tag.set_property("TYPE", "QuickTime for Linux");
        tag.set_property("USE_HEADER", 1);
        tag.set_property("EMPTY", "");
        tag.set_property("NOTE", "<b>&\"\n");

        assert_eq!(
            tag.serialize(),
            r#"<FORMAT TYPE="QuickTime for Linux" USE_HEADER=1 EMPTY="" NOTE=&lt;b&gt;&amp;&quot;&#xA>"#
        );
        assert_eq!(tag.to_string(), tag.serialize());
    }

    #[test]
    fn test_round_trip_with_duplicates() {
        let mut tag = Tag::titled("TRACK");
        tag.set_property("CHANNEL", 0);
        tag.set_property("TITLE", "Audio 1");
        tag.set_property("CHANNEL", 1);
        tag.set_property("EMPTY", "");
        tag.set_property("SPECIAL", "x < y & \"z\"\nnext line");
        tag.set_property("GAIN", 0.5f64);

        let (reparsed, _, found) = parsed(&tag.serialize());
        assert!(found);
        assert_eq!(reparsed, tag);
    }

    #[test]
    fn test_bare_value_starting_with_equals_is_lost() {
        let mut tag = Tag::titled("T");
        tag.set_property("K", "=5");
        assert_eq!(tag.serialize(), "<T K==5>");

        let (reparsed, _, _) = parsed(&tag.serialize());
        assert_eq!(reparsed.property_text("K"), Some("5"));
    }

    #[test]
    fn test_keyless_attribute_not_read_back() {
        let mut tag = Tag::titled("T");
        tag.set_property("A", 1);
        tag.set_property("", "orphan");
        assert_eq!(tag.attributes().len(), 2);
        assert_eq!(tag.serialize(), "<T A=1 =orphan>");

        let (reparsed, _, found) = parsed(&tag.serialize());
        assert!(found);
        assert_eq!(reparsed.attributes().len(), 1);
        assert_eq!(reparsed.property_text("A"), Some("1"));
    }

    #[test]
    fn test_parse_start_inside_multibyte_char() {
        let mut tag = Tag::new();
        let (end, found) = tag.parse("é<A X=1>", 1);
        assert!(found);
        assert_eq!(end, "é<A X=1>".len());
        assert_eq!(tag.title(), "A");
        assert_eq!(tag.property("X", 0), 1);
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = Delimiters::new('[', ']');
        let mut tag = Tag::with_delimiters(delimiters);
        tag.set_title("SECTION");
        tag.set_property("NAME", "main");
        assert_eq!(tag.serialize(), "[SECTION NAME=main]");

        let mut reparsed = Tag::with_delimiters(delimiters);
        let (_, found) = reparsed.parse("<ignored> [SECTION NAME=main]", 0);
        assert!(found);
        assert_eq!(reparsed.title(), "SECTION");
        assert_eq!(reparsed.property_text("NAME"), Some("main"));
    }

    #[test]
    fn test_reset_keeps_delimiters() {
        let mut tag = Tag::with_delimiters(Delimiters::new('{', '}'));
        tag.set_title("X");
        tag.set_property("A", 1);
        tag.reset();
        assert_eq!(tag.title(), "");
        assert!(tag.attributes().is_empty());
        assert_eq!(tag.delimiters(), Delimiters::new('{', '}'));
    }
}
