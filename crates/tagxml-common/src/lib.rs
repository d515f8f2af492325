//! Common utilities for tagxml.
//!
//! This crate provides the leaf-level building blocks used by the document crates:
//!
//! - [`codec`] - Escaping and unescaping of the five special characters
//! - [`number`] - Number text in the exact form project files store it
//! - [`TextCursor`] - Position-tracking scanner over a text buffer

mod cursor;

pub mod codec;
pub mod number;

pub use cursor::{find_char, TextCursor};

/// Re-export memchr for fast delimiter searching
pub use memchr;
