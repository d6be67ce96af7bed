use crate::error::RenderError;
use crate::tags::{SongSnapshot, Token, TOKENS};

/// String builder that refuses to grow past a fixed byte capacity.
#[derive(Debug)]
pub struct BoundedWriter {
    buf: String,
    capacity: usize,
}

impl BoundedWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            capacity,
        }
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    pub fn push_str(&mut self, s: &str) -> Result<(), RenderError> {
        if s.len() > self.remaining() {
            return Err(RenderError::BufferOverflow {
                capacity: self.capacity,
            });
        }
        self.buf.push_str(s);
        Ok(())
    }

    pub fn push(&mut self, c: char) -> Result<(), RenderError> {
        self.push_str(c.encode_utf8(&mut [0; 4]))
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// The healthy-path format string and the text shown when there is nothing to format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    pub format: String,
    pub fallback: String,
}

#[derive(Debug)]
pub struct Renderer {
    tokens: &'static [Token],
    capacity: usize,
}

impl Renderer {
    pub fn new(capacity: usize) -> Self {
        Self::with_tokens(&TOKENS, capacity)
    }

    pub fn with_tokens(tokens: &'static [Token], capacity: usize) -> Self {
        Self { tokens, capacity }
    }

    /// Renders `spec.format` against `song`, or copies `spec.fallback` verbatim when there
    /// is no song.
    ///
    /// `%%` is a literal percent. `%` followed by a token name is replaced by that token's
    /// value, the first matching name in table order winning. A `%` that starts neither is
    /// kept as-is and scanning resumes at the next character.
    pub fn render(
        &self,
        spec: &FormatSpec,
        song: Option<&SongSnapshot>,
    ) -> Result<String, RenderError> {
        let mut out = BoundedWriter::new(self.capacity);

        let song = match song {
            Some(song) => song,
            None => {
                out.push_str(&spec.fallback)?;
                return Ok(out.into_string());
            }
        };

        let mut rest = spec.format.as_str();
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos])?;
            let after = &rest[pos + 1..];

            if let Some(stripped) = after.strip_prefix('%') {
                out.push('%')?;
                rest = stripped;
            } else if let Some(token) = self.tokens.iter().find(|t| after.starts_with(t.name)) {
                out.push_str(token.resolve(song))?;
                rest = &after[token.name.len()..];
            } else {
                out.push('%')?;
                rest = after;
            }
        }
        out.push_str(rest)?;

        Ok(out.into_string())
    }

    /// The fallback text cut down to capacity, for when even rejection must produce output.
    pub fn truncated_fallback(&self, spec: &FormatSpec) -> String {
        let mut end = spec.fallback.len().min(self.capacity);
        while !spec.fallback.is_char_boundary(end) {
            end -= 1;
        }
        spec.fallback[..end].to_string()
    }
}
