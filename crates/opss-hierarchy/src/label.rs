//! Label canonicalization and keyed node identity.
//!
//! The chart library groups segments by label equality, so the same
//! standard appearing under two parents needs two distinct labels. Inside
//! the engine that distinction is a [`NodeKey`]: canonical identifier plus
//! occurrence index. Invisible marks only appear when a key is rendered.

use std::fmt;

use serde::{Serialize, Serializer};

/// Mark appended when a key is rendered for display.
pub const VARIANT_MARK: char = '\u{2060}';

/// Every mark recognised and stripped by [`canonicalize`].
pub const DISAMBIGUATION_MARKS: [char; 2] = ['\u{200B}', '\u{2060}'];

/// Tag the source data appends to identifiers with no accessible full text.
pub const INACCESSIBLE_TAG: &str = "(inaccessible)";

/// Parent values meaning "top of the hierarchy".
pub const ROOT_SENTINELS: [&str; 2] = ["Standard", "root"];

pub fn is_mark(c: char) -> bool {
    DISAMBIGUATION_MARKS.contains(&c)
}

/// Does the label carry at least one disambiguation mark?
pub fn has_marks(label: &str) -> bool {
    label.chars().any(is_mark)
}

/// Strip every disambiguation mark and inaccessibility tag.
///
/// Total and idempotent. The tag is removed until none is left, since
/// removing one occurrence can splice a new one together.
pub fn canonicalize(label: &str) -> String {
    let mut out: String = label.chars().filter(|c| !is_mark(*c)).collect();
    while out.contains(INACCESSIBLE_TAG) {
        out = out.replace(INACCESSIBLE_TAG, "");
    }
    out
}

/// Is this raw parent value the root sentinel? Empty parents count as root.
pub fn is_root_sentinel(parent: &str) -> bool {
    let trimmed = parent.trim();
    trimmed.is_empty() || ROOT_SENTINELS.contains(&trimmed)
}

/// Identity of one occurrence of a standard in the hierarchy.
///
/// `variant == 0` is the bare identifier. Ordering is by canonical string
/// first, so keys of the same standard sort together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    canonical: String,
    variant: usize,
}

impl NodeKey {
    /// Build a key; the identifier is canonicalized on the way in.
    pub fn new(identifier: &str, variant: usize) -> Self {
        Self {
            canonical: canonicalize(identifier),
            variant,
        }
    }

    pub fn plain(identifier: &str) -> Self {
        Self::new(identifier, 0)
    }

    /// Recover a key from its display form: the variant is the number of
    /// marks carried by the string.
    pub fn parse(display: &str) -> Self {
        let variant = display.chars().filter(|c| is_mark(*c)).count();
        Self::new(display, variant)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn variant(&self) -> usize {
        self.variant
    }

    /// Marked occurrence (anything but the first)?
    pub fn is_variant(&self) -> bool {
        self.variant > 0
    }

    pub fn to_plain(&self) -> NodeKey {
        self.with_variant(0)
    }

    pub fn with_variant(&self, variant: usize) -> NodeKey {
        NodeKey {
            canonical: self.canonical.clone(),
            variant,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)?;
        for _ in 0..self.variant {
            write!(f, "{VARIANT_MARK}")?;
        }
        Ok(())
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_marks_and_tag() {
        assert_eq!(canonicalize("BS EN 71-1\u{200B}\u{200B}"), "BS EN 71-1");
        assert_eq!(canonicalize("\u{2060}BS 1363"), "BS 1363");
        assert_eq!(canonicalize("ISO 9001(inaccessible)"), "ISO 9001");
    }

    #[test]
    fn test_canonicalize_is_total_on_plain_input() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("EN 60335-1"), "EN 60335-1");
    }

    #[test]
    fn test_canonicalize_handles_spliced_tags() {
        let nested = "A((inaccessible)inaccessible)";
        assert_eq!(canonicalize(nested), "A");
        let marked_tag = "B(inacc\u{200B}essible)";
        assert_eq!(canonicalize(marked_tag), "B");
    }

    #[test]
    fn test_root_sentinels() {
        assert!(is_root_sentinel("Standard"));
        assert!(is_root_sentinel("root"));
        assert!(is_root_sentinel("  "));
        assert!(!is_root_sentinel("BS 1363"));
    }

    #[test]
    fn test_node_key_display_and_parse() {
        let key = NodeKey::new("BS 8888", 2);
        let shown = key.to_string();
        assert_eq!(shown.chars().filter(|c| *c == VARIANT_MARK).count(), 2);
        assert_eq!(canonicalize(&shown), "BS 8888");
        assert_eq!(NodeKey::parse(&shown), key);
        assert!(key.is_variant());
        assert!(!key.to_plain().is_variant());
    }

    #[test]
    fn test_node_key_new_canonicalizes() {
        let key = NodeKey::new("EN 1\u{200B}(inaccessible)", 0);
        assert_eq!(key.canonical(), "EN 1");
        assert!(!has_marks(&key.to_string()));
    }
}
