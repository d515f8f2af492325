//! Streaming tag document model for project, keyframe, and plugin files.
//!
//! Documents are flat streams of tags and free text:
//!
//! ```text
//! <?xml version="1.0"?>
//! <ASSET SRC="/media/clip one.mov">
//! <FOLDER>Clips</FOLDER>
//! <AUDIO CHANNELS=2 RATE=48000>
//! </ASSET>
//! ```
//!
//! This is not conformant XML. There are no namespaces, CDATA sections, or
//! nested element trees; closing tags are ordinary tags titled `/NAME` and
//! it is up to the reader to pair them.
//!
//! # Example
//!
//! ```
//! use tagxml_doc::Document;
//!
//! let mut doc = Document::from_string(r#"<AUDIO CHANNELS=2 RATE=48000><VIDEO WIDTH=720>"#);
//!
//! while doc.read_tag() {
//!     let tag = doc.tag();
//!     if tag.title_is("AUDIO") {
//!         assert_eq!(tag.property("CHANNELS", 1), 2);
//!         assert_eq!(tag.property("BITS", 16), 16);
//!     }
//! }
//! ```

mod attribute;
mod buffer;
mod document;
mod error;
mod tag;

pub use attribute::{AttributeMap, FromAttribute, ToAttribute};
pub use buffer::Buffer;
pub use document::{Document, HEADER};
pub use error::{Error, Result};
pub use tag::{Delimiters, Tag};

/// Re-export the character codec used for values and text.
pub use tagxml_common::codec;
