//! Fixed-capacity text buffers.
//!
//! Every string on the face is written into a [`TextBuffer`] sized for the
//! longest value it should hold. Anything past the capacity is dropped at a
//! character boundary; the buffer remembers that it truncated but never fails.

use std::fmt;

/// Display text bounded to `N` bytes of UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer<const N: usize> {
    text: heapless::String<N>,
    truncated: bool,
}

impl<const N: usize> TextBuffer<N> {
    pub fn new() -> Self {
        Self {
            text: heapless::String::new(),
            truncated: false,
        }
    }

    /// Build a buffer from formatting arguments, truncating on overflow.
    pub fn from_fmt(args: fmt::Arguments<'_>) -> Self {
        let mut buffer = Self::new();
        // write_str never returns an error, so neither does write_fmt
        let _ = fmt::Write::write_fmt(&mut buffer, args);
        if buffer.truncated {
            log::trace!("text truncated to {} bytes: {:?}", N, buffer.text);
        }
        buffer
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Maximum number of bytes the buffer holds.
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if some input did not fit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.truncated = false;
    }
}

impl<const N: usize> fmt::Write for TextBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for c in s.chars() {
            if self.text.push(c).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Display for TextBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> AsRef<str> for TextBuffer<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_fits_without_truncation() {
        let buffer = TextBuffer::<16>::from_fmt(format_args!("Battery:{}%", 57));
        assert_eq!(buffer.as_str(), "Battery:57%");
        assert_eq!(buffer.len(), 11);
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn test_overflow_truncates_silently() {
        let buffer = TextBuffer::<5>::from_fmt(format_args!("{}", "Wednesday"));
        assert_eq!(buffer.as_str(), "Wedne");
        assert!(buffer.is_truncated());
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 'ñ' takes two bytes, so 'o' no longer fits
        let mut buffer = TextBuffer::<3>::new();
        buffer.write_str("añoß").unwrap();
        assert_eq!(buffer.as_str(), "añ");
        assert!(buffer.is_truncated());
    }

    #[test]
    fn test_nothing_is_appended_after_truncation() {
        // A narrow char must not sneak in after a wide one was dropped
        let mut buffer = TextBuffer::<2>::new();
        buffer.write_str("aß").unwrap();
        buffer.write_str("b").unwrap();
        assert_eq!(buffer.as_str(), "a");
        assert!(buffer.is_truncated());
    }

    #[test]
    fn test_clear_resets_flags() {
        let mut buffer = TextBuffer::<2>::from_fmt(format_args!("abc"));
        assert!(buffer.is_truncated());
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.is_truncated());
    }
}
