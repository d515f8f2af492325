//! Tagxml - a small XML-like document model for project files.
//!
//! Projects, keyframes, and plugin configurations are all stored as flat
//! sequences of tags with free text in between. This crate bundles the
//! pieces for reading and writing them.
//!
//! # Crates
//!
//! - [`tagxml_common`] - Character escapes, number formatting, text cursor
//! - [`tagxml_doc`] - Attributes, tags, and the cursor-based document
//! - [`tagxml_keyframe`] - Keyframe payloads parsed as nested documents
//!
//! # Example
//!
//! ```
//! use tagxml::prelude::*;
//!
//! let mut keyframe = Keyframe::with_data(0, "<BLUR RADIUS=5>");
//! let params: AttributeMap = [("RADIUS", 9)].into_iter().collect();
//! keyframe.update_parameter(Some(&params), None, None);
//!
//! let mut doc = Document::new();
//! keyframe.save(&mut doc, 0, false);
//! assert_eq!(doc.as_str(), "<KEYFRAME POSITION=0><BLUR RADIUS=9></KEYFRAME>\n");
//! ```

// Re-export all sub-crates
pub use tagxml_common as common;
pub use tagxml_doc as doc;
pub use tagxml_keyframe as keyframe;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tagxml_common::codec;
    pub use tagxml_doc::{AttributeMap, Delimiters, Document, FromAttribute, Tag, ToAttribute};
    pub use tagxml_keyframe::{Contents, Diff, Keyframe};
}

pub use tagxml_doc::{Document, Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
