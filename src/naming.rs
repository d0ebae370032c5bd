//! Label derivation for the `NN-name` path convention.
//!
//! Directory and file names in a documentation tree carry an optional ordinal
//! prefix used purely for ordering on disk, and an optional `--` suffix used
//! for variant metadata. Neither is shown to readers. Every label in the
//! navigation tree, and every group key, goes through [`derive_label`] so the
//! two always agree.
//!
//! ```text
//! 03-syntax            → "syntax"
//! 1.2 Ownership        → "Ownership"
//! 02-types--draft      → "types"
//! 2024-01-notes        → "notes"
//! getting-started      → "getting-started"   (untouched)
//! 001                  → "001"               (nothing left after stripping)
//! ```

use tracing::debug;

/// Separator between the display name and variant metadata.
const VARIANT_DELIMITER: &str = "--";

/// Characters allowed between an ordinal and the name it precedes.
const ORDINAL_SEPARATORS: &[char] = &['.', '-', '_', ' '];

/// Derive the human-readable label for a single path segment.
///
/// Cuts the name at the first `--`, then strips leading ordinals (a run of
/// ASCII digits plus one optional separator) for as long as something is left.
/// If stripping would leave nothing, the name is returned with only the
/// variant suffix removed.
///
/// The result is stable under re-application: `derive_label(derive_label(s))`
/// equals `derive_label(s)`.
pub fn derive_label(segment: &str) -> String {
    let name = strip_variant(segment);
    match strip_ordinal(name) {
        Some(label) => label.to_string(),
        None => {
            debug!(segment, "ordinal prefix consumes the whole name, keeping it");
            name.to_string()
        }
    }
}

/// Strip all leading ordinals from `name`.
///
/// Returns `None` only when stripping would leave an empty string. Names with
/// no ordinal prefix come back unchanged.
pub fn strip_ordinal(name: &str) -> Option<&str> {
    let mut rest = name;
    while let Some(next) = strip_one_ordinal(rest) {
        if next.is_empty() {
            return if rest.len() == name.len() {
                None
            } else {
                Some(rest)
            };
        }
        rest = next;
    }
    Some(rest)
}

fn strip_one_ordinal(name: &str) -> Option<&str> {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &name[digits..];
    Some(rest.strip_prefix(ORDINAL_SEPARATORS).unwrap_or(rest))
}

fn strip_variant(segment: &str) -> &str {
    match segment.find(VARIANT_DELIMITER) {
        Some(pos) if pos > 0 => &segment[..pos],
        _ => segment,
    }
}

/// Key used to cluster a catalogue path into a navigation group.
///
/// With `hierarchy` on, the key comes from the first path segment (the
/// top-level directory, or the file itself for top-level documents). With it
/// off, every document stands alone and the key comes from the last segment.
pub fn group_key(path: &str, hierarchy: bool) -> String {
    let segment = if hierarchy {
        path.split('/').next()
    } else {
        path.rsplit('/').next()
    };
    derive_label(segment.unwrap_or(path))
}

/// Last segment of a `/`-separated catalogue path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
