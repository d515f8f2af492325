//! Streaming reader and writer over one text buffer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tagxml_common::{codec, find_char, TextCursor};

use crate::{Buffer, Delimiters, Error, Result, Tag};

/// Line written at the start of every saved file. Not required when reading.
pub const HEADER: &str = "<?xml version=\"1.0\"?>\n";

/// A text buffer with one cursor, read and written as a stream of tags and
/// free text.
///
/// Reading walks the cursor forward: [`read_tag`](Self::read_tag) parses the
/// next tag into [`tag`](Self::tag), [`read_text`](Self::read_text) returns
/// the text up to the next tag. Writing always happens at the cursor and
/// discards whatever followed it, so the first write into a freshly loaded or
/// rewound document replaces its content. [`rewind`](Self::rewind) moves the
/// cursor back to the start to read what was just written.
///
/// # Example
///
/// ```
/// use tagxml_doc::Document;
///
/// let mut doc = Document::new();
/// doc.tag_mut().set_title("FOLDER");
/// doc.append_tag();
/// doc.append_text("Clips");
/// doc.tag_mut().set_title("/FOLDER");
/// doc.append_tag();
/// assert_eq!(doc.as_str(), "<FOLDER>Clips</FOLDER>");
///
/// doc.rewind();
/// assert!(doc.read_tag());
/// assert!(doc.tag().title_is("folder"));
/// assert_eq!(doc.read_text(), "Clips");
/// ```
#[derive(Debug)]
pub struct Document<'a> {
    text: Buffer<'a>,
    position: usize,
    tag_start: usize,
    filename: Option<PathBuf>,
    tag: Tag,
    delimiters: Delimiters,
}

impl<'a> Document<'a> {
    /// Create an empty document with `<` `>` delimiters.
    pub fn new() -> Self {
        Self::with_delimiters(Delimiters::default())
    }

    /// Create an empty document with custom delimiters.
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            text: Buffer::default(),
            position: 0,
            tag_start: 0,
            filename: None,
            tag: Tag::with_delimiters(delimiters),
            delimiters,
        }
    }

    /// Create a document that reads `text` from the start.
    pub fn from_string(text: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.text = Buffer::Owned(text.into());
        doc
    }

    /// Create a document over a borrowed buffer.
    ///
    /// Reads and writes act on `buffer` directly; the owner gets it back,
    /// edits included, when the document is dropped.
    pub fn shared(buffer: &'a mut String) -> Self {
        let delimiters = Delimiters::default();
        Self {
            text: Buffer::Shared(buffer),
            position: 0,
            tag_start: 0,
            filename: None,
            tag: Tag::with_delimiters(delimiters),
            delimiters,
        }
    }

    /// Create a document that reads `text` without copying it.
    ///
    /// Writing is still allowed; the first write works on a private copy.
    pub fn borrowed(text: &'a str) -> Self {
        let mut doc = Self::new();
        doc.text = Buffer::Borrowed(text);
        doc
    }

    /// Switch to a borrowed buffer, dropping any owned text.
    pub fn set_shared_string(&mut self, buffer: &'a mut String) {
        self.text = Buffer::Shared(buffer);
        self.position = 0;
        self.tag_start = 0;
        self.filename = None;
    }

    /// Check if writes go to a buffer owned elsewhere.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.text.is_shared()
    }

    /// Get the delimiters.
    #[inline]
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Get the working tag: the last tag read, or the next tag to write.
    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Get the working tag mutably.
    #[inline]
    pub fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }

    /// Get the cursor's byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset of the opening delimiter of the last tag read.
    #[inline]
    pub fn tag_start(&self) -> usize {
        self.tag_start
    }

    /// Length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the whole buffer.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Get the text after the cursor.
    #[inline]
    pub fn remaining(&self) -> &str {
        &self.text[self.position..]
    }

    /// Path of the last file read or written.
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Take the buffer, copying it if it is borrowed.
    pub fn into_string(self) -> String {
        self.text.into_string()
    }

    /// Log the buffer at debug level.
    pub fn dump(&self) {
        log::debug!("Document::dump:\n{}", self.as_str());
    }

    // Reading

    /// Read the next tag into [`tag`](Self::tag).
    ///
    /// Text before the tag is skipped; call [`read_text`](Self::read_text)
    /// first to keep it. Returns `false` at the end of the document, with the
    /// cursor left at the end of the buffer.
    pub fn read_tag(&mut self) -> bool {
        let text = self.text.as_str();
        self.tag.reset();

        let Some(start) = find_char(text, self.position, self.delimiters.left) else {
            self.position = text.len();
            return false;
        };

        self.tag_start = start;
        let (end, found) = self.tag.parse(text, start);
        self.position = end;

        log::trace!("read tag {:?} at {}", self.tag.title(), start);
        found
    }

    /// Read and decode the text up to the next tag.
    ///
    /// A single newline directly at the cursor is dropped; it is the line
    /// break writers put after the previous tag.
    pub fn read_text(&mut self) -> String {
        self.scan_text(true)
    }

    /// Read the text up to the next tag without decoding escapes.
    pub fn read_raw_text(&mut self) -> String {
        self.scan_text(false)
    }

    fn scan_text(&mut self, decode: bool) -> String {
        let left = self.delimiters.left;
        let mut cursor = TextCursor::new_at(self.text.as_str(), self.position);
        let mut output = String::new();

        cursor.eat('\n');
        loop {
            output.push_str(cursor.take_until(|c| c == left || (decode && c == '&')));

            match cursor.peek() {
                Some(c) if c != left => match codec::decode_at(cursor.remaining()) {
                    Some((decoded, len)) => {
                        output.push(decoded);
                        cursor.seek(cursor.position() + len);
                    }
                    None => {
                        output.push(c);
                        cursor.next_char();
                    }
                },
                _ => break,
            }
        }

        self.position = cursor.position();
        output
    }

    /// Copy raw text to `output` until a tag whose text starts with `end_tag`.
    ///
    /// Other tags are copied verbatim, so arbitrary tag-like content passes
    /// through. When the end tag is found the cursor stays on its opening
    /// delimiter, ready for [`read_tag`](Self::read_tag), and `true` is
    /// returned. Otherwise everything up to the end of the buffer is copied.
    pub fn read_text_until(&mut self, end_tag: &str, output: &mut String) -> bool {
        let left = self.delimiters.left;
        let mut cursor = TextCursor::new_at(self.text.as_str(), self.position);

        let found = loop {
            output.push_str(cursor.skip_to(left));
            if cursor.is_empty() {
                break false;
            }
            if cursor.remaining()[left.len_utf8()..].starts_with(end_tag) {
                break true;
            }
            output.push(left);
            cursor.next_char();
        };

        self.position = cursor.position();
        found
    }

    // Writing

    /// Write the working tag at the cursor, then clear it for the next one.
    pub fn append_tag(&mut self) {
        let tag = self.tag.serialize();
        self.append_text(&tag);
        self.tag.reset();
    }

    /// Write `text` at the cursor as is.
    pub fn append_text(&mut self, text: &str) {
        let buffer = self.text.to_mut();
        buffer.truncate(self.position);
        buffer.push_str(text);
        self.position = buffer.len();
    }

    /// Write a newline at the cursor.
    pub fn append_newline(&mut self) {
        self.append_text("\n");
    }

    /// Write `text` at the cursor with special characters escaped.
    pub fn encode_text(&mut self, text: &str) {
        self.append_text(&codec::encode(text));
    }

    /// Move the cursor back to the start.
    ///
    /// Writes always leave the buffer ending at the cursor, so what was
    /// written is exactly what will be read.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.tag_start = 0;
    }

    // Loading and saving

    /// Replace the buffer content with `text` and rewind.
    pub fn read_from_string(&mut self, text: &str) {
        self.filename = None;
        self.load(text.to_owned());
    }

    /// Replace the buffer content with the file at `path` and rewind.
    ///
    /// Failures are logged unless `ignore_error` is set; the error is
    /// returned either way and the buffer is left untouched. A file that is
    /// not valid UTF-8 is refused with [`Error::Encoding`].
    pub fn read_from_file(&mut self, path: impl AsRef<Path>, ignore_error: bool) -> Result<()> {
        let path = path.as_ref();
        self.filename = Some(path.to_path_buf());

        let bytes = fs::read(path).map_err(|source| {
            if !ignore_error {
                log::error!("Document::read_from_file \"{}\": {}", path.display(), source);
            }
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let text = String::from_utf8(bytes).map_err(|e| {
            let offset = e.utf8_error().valid_up_to();
            if !ignore_error {
                log::error!(
                    "Document::read_from_file \"{}\": invalid UTF-8 at offset {}",
                    path.display(),
                    offset
                );
            }
            Error::Encoding {
                path: path.to_path_buf(),
                offset,
            }
        })?;

        self.load(text);
        Ok(())
    }

    /// Save the header line and the buffer to `path`.
    pub fn write_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.filename = Some(path.to_path_buf());

        let result = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(HEADER.as_bytes())?;
            writer.write_all(self.text.as_bytes())?;
            writer.flush()
        });

        result.map_err(|source| {
            log::error!("Document::write_to_file \"{}\": {}", path.display(), source);
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Write the header line and the buffer to a stream.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(HEADER.as_bytes())?;
        writer.write_all(self.text.as_bytes())?;
        Ok(())
    }

    fn load(&mut self, text: String) {
        self.text.replace(text);
        self.position = 0;
        self.tag_start = 0;
    }
}

impl Default for Document<'_> {
    fn default() -> Self {
        Self::new()
    }
}
