//! Bounded text accumulation.

use crate::{BlobtextError, Result, SizeUnit};

/// Position in a [`ContentBuffer`] that can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferMark {
    bytes: usize,
    chars: usize,
}

/// Output buffer that enforces the per-record character limit.
///
/// Text is appended in pieces as parsers walk a document. The limit is
/// checked on every append, so oversized content fails as soon as it crosses
/// the bound rather than after the whole document was decoded.
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    text: String,
    chars: usize,
    max_chars: Option<usize>,
}

impl ContentBuffer {
    pub fn new(max_chars: Option<usize>) -> Self {
        Self {
            text: String::new(),
            chars: 0,
            max_chars,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Append `s`.
    ///
    /// # Errors
    ///
    /// `BlobtextError::ContentTooLarge` if the buffer would exceed its limit.
    /// The buffer is left unchanged in that case.
    pub fn push_str(&mut self, s: &str) -> Result<()> {
        let added = s.chars().count();
        if let Some(max) = self.max_chars
            && self.chars + added > max
        {
            return Err(BlobtextError::ContentTooLarge {
                limit: max as u64,
                unit: SizeUnit::Chars,
            });
        }
        self.text.push_str(s);
        self.chars += added;
        Ok(())
    }

    pub fn push(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.push_str(c.encode_utf8(&mut buf))
    }

    /// Start a new line unless the buffer is empty or already at a line start.
    pub fn start_block(&mut self) -> Result<()> {
        if self.text.is_empty() || self.text.ends_with('\n') {
            return Ok(());
        }
        self.push('\n')
    }

    pub fn mark(&self) -> BufferMark {
        BufferMark {
            bytes: self.text.len(),
            chars: self.chars,
        }
    }

    /// Discard everything appended since `mark` was taken.
    pub fn rollback(&mut self, mark: BufferMark) {
        if mark.bytes <= self.text.len() {
            self.text.truncate(mark.bytes);
            self.chars = mark.chars;
        }
    }

    pub fn len_chars(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
