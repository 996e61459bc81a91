/// Character sets the collations decode their input with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Utf8mb4,
    /// MySQL's three-byte UTF-8: anything past the BMP is undecodable
    Utf8mb3,
}

impl Charset {
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8mb4 => "utf8mb4",
            Charset::Utf8mb3 => "utf8mb3",
        }
    }

    /// Decodes the first code point of `src`, returning it with its width in bytes.
    ///
    /// Empty input, malformed or truncated sequences and (for utf8mb3) four-byte sequences all
    /// yield `None`, which callers treat as the end of the string.
    pub fn decode(self, src: &[u8]) -> Option<(u32, usize)> {
        let max_width = match self {
            Charset::Utf8mb4 => 4,
            Charset::Utf8mb3 => 3,
        };

        let width = match *src.first()? {
            0x00..=0x7F => return Some((u32::from(src[0]), 1)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return None,
        };

        if width > max_width {
            return None;
        }

        let c = std::str::from_utf8(src.get(..width)?).ok()?.chars().next()?;
        Some((c as u32, width))
    }
}
