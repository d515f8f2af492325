//! Keyframe payloads stored as nested tag documents.
//!
//! A keyframe keeps its parameters as one opaque string, itself a small tag
//! document: one tag carrying the parameters, optionally followed by free
//! text and further data.
//!
//! ```text
//! <KEYFRAME POSITION=48000><BLUR VERTICAL=1 HORIZONTAL=1 RADIUS=5></KEYFRAME>
//!                          \_______________ payload _______________/
//! ```
//!
//! The payload is read by wrapping the string in a [`Document`] and written
//! back whole whenever a parameter changes.
//!
//! [`Document`]: tagxml_doc::Document

mod contents;
mod keyframe;

pub use contents::{Contents, Diff};
pub use keyframe::{Keyframe, END_TAG, TITLE};
