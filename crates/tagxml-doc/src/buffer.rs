//! Backing storage of a document.

use std::ops::Deref;

/// The text a [`Document`](crate::Document) reads from and writes to.
///
/// A shared buffer belongs to someone else, typically a keyframe holding its
/// payload as a string. The document edits it in place and the borrow ends
/// when the document is dropped, leaving the string with its owner.
///
/// A borrowed buffer is read without copying; the first write turns it into
/// an owned copy, so the original is never modified.
#[derive(Debug)]
pub enum Buffer<'a> {
    /// Text owned by the document.
    Owned(String),
    /// Text borrowed mutably from a longer-lived owner.
    Shared(&'a mut String),
    /// Text borrowed for reading.
    Borrowed(&'a str),
}

impl Buffer<'_> {
    /// Check if writes reach a string owned elsewhere.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Get the text.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Owned(text) => text,
            Self::Shared(text) => text,
            Self::Borrowed(text) => text,
        }
    }

    /// Get the text for writing, copying it first if it is only borrowed.
    pub fn to_mut(&mut self) -> &mut String {
        if let Self::Borrowed(text) = *self {
            *self = Self::Owned(text.to_owned());
        }

        match self {
            Self::Owned(text) => text,
            Self::Shared(text) => text,
            Self::Borrowed(_) => unreachable!("borrowed buffer converted above"),
        }
    }

    /// Replace the whole text.
    pub fn replace(&mut self, text: String) {
        match self {
            Self::Shared(shared) => **shared = text,
            _ => *self = Self::Owned(text),
        }
    }

    /// Take the text out, copying it if it is borrowed.
    pub fn into_string(self) -> String {
        match self {
            Self::Owned(text) => text,
            Self::Shared(text) => text.clone(),
            Self::Borrowed(text) => text.to_owned(),
        }
    }
}

impl Default for Buffer<'_> {
    fn default() -> Self {
        Self::Owned(String::new())
    }
}

impl Deref for Buffer<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_writes_reach_owner() {
        let mut owner = String::from("old");
        {
            let mut buffer = Buffer::Shared(&mut owner);
            assert!(buffer.is_shared());
            let text = buffer.to_mut();
            text.clear();
            text.push_str("new");
        }
        assert_eq!(owner, "new");
    }

    #[test]
    fn test_borrowed_copies_on_write() {
        let original = String::from("keep");
        let mut buffer = Buffer::Borrowed(&original);
        assert_eq!(&*buffer, "keep");

        buffer.to_mut().push_str(" me");
        assert!(matches!(buffer, Buffer::Owned(_)));
        assert_eq!(buffer.as_str(), "keep me");
        assert_eq!(original, "keep");
    }

    #[test]
    fn test_replace() {
        let mut owner = String::from("a");
        let mut shared = Buffer::Shared(&mut owner);
        shared.replace("b".to_string());
        drop(shared);
        assert_eq!(owner, "b");

        let mut borrowed = Buffer::Borrowed("x");
        borrowed.replace("y".to_string());
        assert_eq!(borrowed.as_str(), "y");
    }

    #[test]
    fn test_into_string() {
        let mut owner = String::from("kept");
        assert_eq!(Buffer::Shared(&mut owner).into_string(), "kept");
        assert_eq!(owner, "kept");
        assert_eq!(Buffer::Owned("mine".into()).into_string(), "mine");
        assert_eq!(Buffer::Borrowed("seen").into_string(), "seen");
        assert!(!Buffer::default().is_shared());
    }
}
