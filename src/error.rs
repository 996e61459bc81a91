use thiserror::Error;

/// Failures while building or loading weight tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("line {line}: missing ';' between code points and weights")]
    MissingSeparator { line: usize },
    #[error("line {line}: no code points before ';'")]
    NoCodepoints { line: usize },
    #[error("line {line}: no collation elements after ';'")]
    NoWeights { line: usize },
    #[error("line {line}: {count} collation elements, at most {max} allowed")]
    TooManyElements { line: usize, count: usize, max: usize },
    #[error("contraction {path:04X?} has {len} code points, expected 2..={max}")]
    ContractionLength { path: Vec<u32>, len: usize, max: usize },
    #[error("code point {0:#X} is outside the Unicode range")]
    CodepointOutOfRange(u32),
    #[error("table has {found} pages, expected {expected}")]
    PageCount { found: usize, expected: usize },
    #[error("page {page} has {found} slots, expected {expected}")]
    PageSize { page: usize, found: usize, expected: usize },
    #[error("reorder of {from_min:#06X}..={from_max:#06X} to {to_min:#06X} leaves the primary range")]
    ReorderOutOfRange { from_min: u16, from_max: u16, to_min: u16 },
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),
}
