//! MySQL-compatible collations: comparison and weight strings under the UCA 9.0.0 (`*_0900_*`),
//! legacy UCA 4.0.0 (`*_unicode_ci`) and binary algorithms.
//!
//! ```
//! use std::cmp::Ordering;
//! use mysql_uca::{catalog, WeightPadding};
//!
//! let collation = catalog::from_name("utf8mb4_0900_ai_ci").unwrap();
//! assert_eq!(collation.collate(b"Apple", b"apple", false), Ordering::Equal);
//!
//! let mut key = Vec::new();
//! collation.weight_string(&mut key, b"a", WeightPadding::None);
//! assert_eq!(key, [0x1C, 0x47]);
//! ```

use std::cmp::Ordering;

pub mod binary;
pub mod catalog;
pub mod charset;
pub mod error;
mod fast;
pub mod iter900;
pub mod legacy;
pub mod options;
pub mod tailoring;
pub mod uca900;
pub mod weights;

pub use binary::BinaryCollation;
pub use charset::Charset;
pub use error::TableError;
pub use legacy::LegacyCollation;
pub use options::{CollationOptions, Strength, WeightPadding};
pub use uca900::Uca900Collation;
pub use weights::{WeightTable, Weights};

//
// Structs etc.
//

/// One collation of any supported algorithm.
pub enum Collation {
    Uca900(Uca900Collation),
    Legacy(LegacyCollation),
    Binary(BinaryCollation),
}

//
// Functions, public
//

impl Collation {
    pub fn id(&self) -> u16 {
        match self {
            Collation::Uca900(c) => c.id(),
            Collation::Legacy(c) => c.id(),
            Collation::Binary(c) => c.id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collation::Uca900(c) => c.name(),
            Collation::Legacy(c) => c.name(),
            Collation::Binary(c) => c.name(),
        }
    }

    pub fn charset(&self) -> Charset {
        match self {
            Collation::Uca900(c) => c.charset(),
            Collation::Legacy(c) => c.charset(),
            Collation::Binary(c) => c.charset(),
        }
    }

    /// The effective weight table, built on first call. Binary collations have none.
    pub fn weights(&self) -> Option<&WeightTable> {
        match self {
            Collation::Uca900(c) => Some(c.weights()),
            Collation::Legacy(c) => Some(c.weights()),
            Collation::Binary(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Collation::Binary(_))
    }

    /// Orders `left` against `right`. With `right_is_prefix`, a `right` that is a prefix of `left`
    /// under this collation compares `Equal`.
    pub fn collate(&self, left: &[u8], right: &[u8], right_is_prefix: bool) -> Ordering {
        match self {
            Collation::Uca900(c) => c.collate(left, right, right_is_prefix),
            Collation::Legacy(c) => c.collate(left, right, right_is_prefix),
            Collation::Binary(c) => c.collate(left, right, right_is_prefix),
        }
    }

    /// Appends the weight string of `src` to `dst`. Byte-wise comparison of weight strings built
    /// with the same padding and starting capacity agrees with `collate`.
    pub fn weight_string(&self, dst: &mut Vec<u8>, src: &[u8], padding: WeightPadding) {
        match self {
            Collation::Uca900(c) => c.weight_string(dst, src, padding),
            Collation::Legacy(c) => c.weight_string(dst, src, padding),
            Collation::Binary(c) => c.weight_string(dst, src, padding),
        }
    }

    /// Capacity that always holds the weight string of a `num_bytes`-byte input.
    ///
    /// # Panics
    ///
    /// For UCA 9.0.0 collations, if `num_bytes` is not a multiple of 4.
    pub fn weight_string_len(&self, num_bytes: usize) -> usize {
        match self {
            Collation::Uca900(c) => c.weight_string_len(num_bytes),
            Collation::Legacy(c) => c.weight_string_len(num_bytes),
            Collation::Binary(c) => c.weight_string_len(num_bytes),
        }
    }
}

impl std::fmt::Debug for Collation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collation")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("charset", &self.charset())
            .finish()
    }
}
