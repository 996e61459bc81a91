/// How many UCA levels a comparison looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    /// base letters only (`_ai_ci`)
    Primary = 1,
    /// plus accents (`_as_ci`)
    Secondary = 2,
    /// plus case (`_as_cs`)
    Tertiary = 3,
}

impl Strength {
    pub fn levels(self) -> usize {
        self as usize
    }
}

/// Per-collation settings, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollationOptions {
    pub strength: Strength,
    pub upper_case_first: bool,
}

impl Default for CollationOptions {
    fn default() -> Self {
        Self {
            strength: Strength::Primary,
            upper_case_first: false,
        }
    }
}

/// Padding applied after the weights of a weight string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightPadding {
    None,
    /// fill the destination up to its capacity, producing a fixed-width key
    ToCapacity,
    /// pad with space weights up to this many code points (legacy collations only)
    Codepoints(usize),
}
