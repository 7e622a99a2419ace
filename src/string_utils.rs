//! UTF-8 Safe String Utilities
//!
//! Caret offsets arrive as raw byte positions into a text run. Rust strings
//! are UTF-8 encoded, so slicing at an arbitrary byte position panics when it
//! falls inside a multi-byte character (`ø`, `中`, `🎉`). These helpers clamp
//! offsets to valid character boundaries so run splitting is always safe,
//! even when the host hands us a stale or mid-character position.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index less than or equal to `index` that lies on a
/// UTF-8 character boundary. Indices past the end clamp to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Returns the smallest index greater than or equal to `index` that lies on a
/// UTF-8 character boundary. Indices past the end clamp to `s.len()`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe Slicing
// ─────────────────────────────────────────────────────────────────────────────

/// Slice `s` between two byte positions, clamping both to character
/// boundaries. Returns an empty string when the adjusted range is inverted.
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = floor_char_boundary(s, end);
    if start >= end {
        return "";
    }
    &s[start..end]
}

/// Slice `s` from a byte position to the end, clamping to a boundary.
pub fn safe_slice_from(s: &str, start: usize) -> &str {
    let start = floor_char_boundary(s, start);
    &s[start..]
}

/// Slice `s` from the start to a byte position, clamping to a boundary.
pub fn safe_slice_to(s: &str, end: usize) -> &str {
    let end = floor_char_boundary(s, end);
    &s[..end]
}

/// Split `s` at a byte position, clamping to a character boundary.
///
/// This is the primitive used when a text run is divided around the caret:
/// the left half is everything the detector inspects for block triggers, the
/// right half becomes leftover text.
pub fn split_at_boundary(s: &str, index: usize) -> (&str, &str) {
    let index = floor_char_boundary(s, index);
    s.split_at(index)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_boundary_ascii() {
        let s = "hello";
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 3), 3);
        assert_eq!(floor_char_boundary(s, 10), 5);
    }

    #[test]
    fn test_floor_boundary_multibyte() {
        let s = "på"; // 'å' is two bytes, starting at index 1
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
    }

    #[test]
    fn test_ceil_boundary_multibyte() {
        let s = "på";
        assert_eq!(ceil_char_boundary(s, 2), 3);
        assert_eq!(ceil_char_boundary(s, 1), 1);
    }

    #[test]
    fn test_safe_slice_mid_character() {
        let s = "a🎉b"; // emoji occupies bytes 1..5
        assert_eq!(safe_slice(s, 0, 3), "a");
        assert_eq!(safe_slice(s, 0, 5), "a🎉");
        assert_eq!(safe_slice(s, 3, 2), "");
    }

    #[test]
    fn test_safe_slice_from_to() {
        let s = "héllo";
        assert_eq!(safe_slice_from(s, 0), "héllo");
        assert_eq!(safe_slice_to(s, s.len()), "héllo");
        // Index 2 falls inside 'é' (bytes 1..3) and floors to 1
        assert_eq!(safe_slice_to(s, 2), "h");
    }

    #[test]
    fn test_split_at_boundary() {
        let s = "# Title extra";
        let (left, right) = split_at_boundary(s, 7);
        assert_eq!(left, "# Title");
        assert_eq!(right, " extra");

        let s = "日本語";
        let (left, right) = split_at_boundary(s, 4); // inside second char
        assert_eq!(left, "日");
        assert_eq!(right, "本語");
    }
}
