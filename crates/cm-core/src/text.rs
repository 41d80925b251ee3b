//! Display-text helpers shared by the menu and the popup list.

use std::borrow::Cow;

/// Maximum characters of a snippet title shown as a menu label.
pub const MENU_LABEL_MAX_CHARS: usize = 30;

/// Maximum characters of snippet content shown as a popup preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max_chars` characters, appending [`ELLIPSIS`]
/// when anything was cut.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
/// Text that already fits is returned borrowed and unmodified.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&text[..cut]);
            out.push_str(ELLIPSIS);
            Cow::Owned(out)
        }
    }
}
