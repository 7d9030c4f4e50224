//! Keyword tokenizer
//!
//! A token is a maximal run of ASCII letters and underscores that is at least
//! [`MIN_TOKEN_LEN`] bytes long, folded to lowercase. Anything else (digits,
//! punctuation, whitespace, non-ASCII) ends the current run.

/// Shortest run that counts as a keyword
pub const MIN_TOKEN_LEN: usize = 3;

/// Check whether a byte may appear inside a token
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Lazily tokenize one line
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens {
        bytes: line.as_bytes(),
        pos: 0,
    }
}

/// Iterator over the keywords of a line
///
/// Scans bytes with two states: outside a run (skip non-word bytes) and
/// inside a run (extend while word bytes continue). Runs shorter than
/// [`MIN_TOKEN_LEN`] are discarded and scanning resumes after them.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let bytes = self.bytes;

        loop {
            while self.pos < bytes.len() && !is_word_byte(bytes[self.pos]) {
                self.pos += 1;
            }
            if self.pos >= bytes.len() {
                return None;
            }

            let start = self.pos;
            while self.pos < bytes.len() && is_word_byte(bytes[self.pos]) {
                self.pos += 1;
            }

            let run = &bytes[start..self.pos];
            if run.len() >= MIN_TOKEN_LEN {
                // Word bytes are ASCII, so the run is valid UTF-8 on its own.
                let token: String = run.iter().map(|b| b.to_ascii_lowercase() as char).collect();
                return Some(token);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len().saturating_sub(self.pos);
        (0, Some(remaining / MIN_TOKEN_LEN))
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
