use tagxml_doc::{AttributeMap, Document};

use crate::{Contents, Diff};

/// Title of a keyframe element.
pub const TITLE: &str = "KEYFRAME";

/// Closing tag that ends a keyframe body.
pub const END_TAG: &str = "/KEYFRAME";

/// A keyframe: a position on the timeline plus an opaque payload.
///
/// The payload is usually one parameter tag followed by optional text, for
/// example `<BLUR VERTICAL=1 RADIUS=5>`. It is stored raw and parsed on
/// demand as a small document of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyframe {
    /// Position on the timeline, in the owner's units.
    pub position: i64,
    /// Whether this is the default keyframe of its track.
    pub is_default: bool,
    data: String,
}

impl Keyframe {
    /// Create an empty keyframe at `position`.
    pub fn new(position: i64) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Create a keyframe with a payload.
    pub fn with_data(position: i64, data: impl Into<String>) -> Self {
        Self {
            position,
            is_default: false,
            data: data.into(),
        }
    }

    /// Get the raw payload.
    #[inline]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Replace the raw payload.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Load from `doc`, whose current tag is the `KEYFRAME` opening tag.
    ///
    /// The body is copied raw up to the closing tag, which is left unread.
    /// Returns `false` if the closing tag is missing; the body then runs to
    /// the end of the document.
    pub fn load(&mut self, doc: &mut Document<'_>) -> bool {
        let tag = doc.tag();
        self.position = tag.property("POSITION", self.position);
        self.is_default = tag.property("DEFAULT", false);

        self.data.clear();
        let closed = doc.read_text_until(END_TAG, &mut self.data);
        if !closed {
            log::warn!("keyframe at {} has no closing tag", self.position);
        }
        closed
    }

    /// Write this keyframe to `doc` as a `KEYFRAME` element.
    ///
    /// The position is written relative to `start`. With `default_auto` the
    /// keyframe is written at position 0 as an ordinary keyframe.
    pub fn save(&self, doc: &mut Document<'_>, start: i64, default_auto: bool) {
        let tag = doc.tag_mut();
        tag.set_title(TITLE);
        tag.set_property(
            "POSITION",
            if default_auto { 0 } else { self.position - start },
        );
        if self.is_default && !default_auto {
            tag.set_property("DEFAULT", 1);
        }
        doc.append_tag();

        // No newlines around the payload; they would pile up on every save.
        doc.append_text(&self.data);

        doc.tag_mut().set_title(END_TAG);
        doc.append_tag();
        doc.append_newline();
    }

    /// Parse the payload.
    pub fn contents(&self) -> Option<Contents> {
        Contents::read(&self.data)
    }

    /// Rewrite the payload with new parameter values.
    ///
    /// Existing parameters keep their order and take the value from
    /// `params` when present; keys only in `params` are appended. `text`
    /// and `extra` replace the old ones when given. Returns `false`, leaving
    /// the payload alone, if it holds no tag.
    pub fn update_parameter(
        &mut self,
        params: Option<&AttributeMap>,
        text: Option<&str>,
        extra: Option<&str>,
    ) -> bool {
        let Some(current) = self.contents() else {
            return false;
        };

        let mut doc = Document::shared(&mut self.data);
        let tag = doc.tag_mut();
        tag.set_title(current.title.as_str());

        for (key, value) in current.params.iter() {
            let value = params.and_then(|params| params.text(key)).unwrap_or(value);
            tag.set_property(key, value);
        }
        if let Some(params) = params {
            for (key, value) in params.iter() {
                if !current.params.has(key) {
                    tag.set_property(key, value);
                }
            }
        }

        doc.append_tag();
        doc.append_text(text.unwrap_or(&current.text));
        doc.append_text(extra.unwrap_or(&current.extra));
        true
    }

    /// Collect what `src` has that differs from this keyframe.
    ///
    /// An unparsable payload compares as empty.
    pub fn get_diff(&self, src: &Keyframe) -> Diff {
        let this = self.contents().unwrap_or_default();
        let src = src.contents().unwrap_or_default();
        this.diff(&src)
    }

    /// Compare payloads, ignoring ASCII case.
    pub fn identical(&self, other: &Keyframe) -> bool {
        self.data.eq_ignore_ascii_case(&other.data)
    }
}
