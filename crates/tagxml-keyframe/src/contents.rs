//! Parsed view of a keyframe payload.

use tagxml_doc::{AttributeMap, Document};

/// The pieces of a keyframe payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contents {
    /// Title of the parameter tag, usually the plugin's name.
    pub title: String,
    /// Parameters of the tag. A repeated key keeps its last value.
    pub params: AttributeMap,
    /// Text following the tag, kept escaped so a rewrite reproduces it.
    pub text: String,
    /// Everything after the text, starting at the next tag.
    pub extra: String,
}

impl Contents {
    /// Parse a payload. Returns `None` if it holds no tag.
    pub fn read(payload: &str) -> Option<Self> {
        let mut doc = Document::borrowed(payload);
        if !doc.read_tag() {
            return None;
        }

        let tag = doc.tag();
        let title = tag.title().to_owned();
        let mut params = AttributeMap::new();
        for (key, value) in tag.attributes().iter() {
            params.set(key, value);
        }

        let text = doc.read_raw_text();
        let extra = doc.remaining().to_owned();

        Some(Self {
            title,
            params,
            text,
            extra,
        })
    }

    /// Compare against `src`, collecting what `src` has that differs.
    ///
    /// Parameters are walked pairwise by position over the shorter of the
    /// two lists; each of `src`'s keys is looked up in `self` by name.
    pub fn diff(&self, src: &Contents) -> Diff {
        let mut diff = Diff::default();
        let paired = self.params.len().min(src.params.len());

        for (key, src_value) in src.params.iter().take(paired) {
            let this_value = self.params.text(key).unwrap_or("");
            if src_value != this_value {
                diff.params
                    .get_or_insert_with(AttributeMap::new)
                    .set(key, src_value);
            }
        }

        if self.text != src.text {
            diff.text = Some(src.text.clone());
        }
        if self.extra != src.extra {
            diff.extra = Some(src.extra.clone());
        }

        diff
    }
}

/// Differences between two keyframe payloads, as values from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Parameters whose value changed.
    pub params: Option<AttributeMap>,
    /// New text, if it changed.
    pub text: Option<String>,
    /// New trailing data, if it changed.
    pub extra: Option<String>,
}

impl Diff {
    /// Check if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.text.is_none() && self.extra.is_none()
    }
}
