use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::error::TableError;
use crate::weights::{parse_allkeys, BaseTable, WeightTable, Weights};

//
// Structs etc.
//

/// Replaces the elements of one code point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightPatch {
    pub codepoint: u32,
    pub weights: Vec<Weights>,
}

/// A run of code points that collates as a unit.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contraction {
    pub path: Vec<u32>,
    pub weights: Vec<Weights>,
}

/// Moves the primaries in `from_min..=from_max` so that `from_min` lands on `to_min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reorder {
    pub from_min: u16,
    pub from_max: u16,
    pub to_min: u16,
}

/// Everything a locale layers over its base table. Only needed until the collation is finalized.
#[derive(Clone, Debug, Default)]
pub struct Tailoring {
    pub patches: Vec<WeightPatch>,
    pub contractions: Vec<Contraction>,
    pub reorder: Vec<Reorder>,
}

/// Contractions keyed by path, plus the longest path starting at each code point, which bounds
/// how far an iterator has to look ahead.
#[derive(Clone, Debug, Default)]
pub struct ContractionSet {
    paths: HashMap<Vec<u32>, Vec<Weights>>,
    lookahead: HashMap<u32, usize>,
}

/// A contraction found at the iterator's position.
#[derive(Debug, PartialEq, Eq)]
pub struct ContractionMatch<'a> {
    pub weights: &'a [Weights],
    /// Input bytes the match covers
    pub bytes: usize,
    pub codepoints: usize,
}

/// The result of folding a tailoring into its base.
pub struct FoldedTable {
    pub weights: WeightTable,
    pub contractions: ContractionSet,
}

//
// Static/const
//

pub const MAX_CONTRACTION_LENGTH: usize = 4;

//
// Functions, public
//

impl Reorder {
    /// New position of `primary`, or `None` when the rule doesn't cover it (or would move it
    /// past `0xFFFF`).
    #[inline]
    pub fn apply(&self, primary: u16) -> Option<u16> {
        if (self.from_min..=self.from_max).contains(&primary) {
            (primary - self.from_min).checked_add(self.to_min)
        } else {
            None
        }
    }

    /// Whole source range lands inside `0..=0xFFFF`.
    pub fn check(&self) -> Result<(), TableError> {
        let fits = self.from_min <= self.from_max
            && (self.from_max - self.from_min)
                .checked_add(self.to_min)
                .is_some();

        if fits {
            Ok(())
        } else {
            Err(TableError::ReorderOutOfRange {
                from_min: self.from_min,
                from_max: self.from_max,
                to_min: self.to_min,
            })
        }
    }
}

impl Tailoring {
    /// Builds a tailoring from allkeys-format rule text: single code point rows become patches,
    /// multi code point rows become contractions.
    pub fn from_rules(rules: &str, reorder: Vec<Reorder>) -> Result<Self, TableError> {
        let parsed = parse_allkeys(rules)?;

        Ok(Self {
            patches: parsed
                .singles
                .into_iter()
                .map(|(codepoint, weights)| WeightPatch { codepoint, weights })
                .collect(),
            contractions: parsed
                .multis
                .into_iter()
                .map(|(path, weights)| Contraction { path, weights })
                .collect(),
            reorder,
        })
    }

    /// Concatenates tailorings; later rules override earlier ones.
    #[must_use]
    pub fn then(mut self, other: Tailoring) -> Self {
        self.patches.extend(other.patches);
        self.contractions.extend(other.contractions);
        self.reorder.extend(other.reorder);
        self
    }
}

impl ContractionSet {
    pub fn new<'c>(contractions: impl IntoIterator<Item = &'c Contraction>) -> Result<Self, TableError> {
        let mut set = Self::default();

        for contraction in contractions {
            let len = contraction.path.len();
            if !(2..=MAX_CONTRACTION_LENGTH).contains(&len) {
                return Err(TableError::ContractionLength {
                    path: contraction.path.clone(),
                    len,
                    max: MAX_CONTRACTION_LENGTH,
                });
            }

            let longest = set.lookahead.entry(contraction.path[0]).or_insert(0);
            *longest = (*longest).max(len);

            set.paths
                .insert(contraction.path.clone(), contraction.weights.clone());
        }

        Ok(set)
    }

    /// Longest contraction starting with `cp`, or 0 when none does.
    #[inline]
    pub fn lookahead(&self, cp: u32) -> usize {
        self.lookahead.get(&cp).copied().unwrap_or(0)
    }

    #[inline]
    pub fn get(&self, path: &[u32]) -> Option<&[Weights]> {
        self.paths.get(path).map(Vec::as_slice)
    }

    /// Longest contraction at the start of `input`, whose first code point (already decoded)
    /// is `first` with the given byte width. Only looks forward.
    pub fn longest_match(
        &self,
        charset: Charset,
        input: &[u8],
        first: u32,
        first_width: usize,
    ) -> Option<ContractionMatch<'_>> {
        let lookahead = self.lookahead(first);
        if lookahead < 2 {
            return None;
        }

        let mut path = [0u32; MAX_CONTRACTION_LENGTH];
        let mut ends = [0usize; MAX_CONTRACTION_LENGTH];
        path[0] = first;
        ends[0] = first_width;

        let mut len = 1;
        while len < lookahead {
            match charset.decode(&input[ends[len - 1]..]) {
                Some((cp, width)) => {
                    path[len] = cp;
                    ends[len] = ends[len - 1] + width;
                    len += 1;
                }
                None => break,
            }
        }

        (2..=len).rev().find_map(|n| {
            self.get(&path[..n]).map(|weights| ContractionMatch {
                weights,
                bytes: ends[n - 1],
                codepoints: n,
            })
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    fn for_each_weights_mut(&mut self, mut f: impl FnMut(&mut Weights)) {
        self.paths
            .values_mut()
            .flat_map(|weights| weights.iter_mut())
            .for_each(|weights| f(weights));
    }
}

/// Folds `tailoring` over `base`: patches first, then contractions (locale rows override base
/// rows with the same path), then reordering of every primary, then the case-first swap.
pub fn fold(
    base: &BaseTable,
    tailoring: &Tailoring,
    upper_case_first: bool,
) -> Result<FoldedTable, TableError> {
    let mut weights = base.weights.clone();

    for patch in &tailoring.patches {
        weights.insert(patch.codepoint, patch.weights.clone())?;
    }

    let mut contractions =
        ContractionSet::new(base.contractions.iter().chain(&tailoring.contractions))?;

    if !tailoring.reorder.is_empty() {
        for rule in &tailoring.reorder {
            rule.check()?;
        }

        let reorder = |w: &mut Weights| w.primary = reorder_primary(&tailoring.reorder, w.primary);
        weights.for_each_weights_mut(reorder);
        contractions.for_each_weights_mut(reorder);
    }

    if upper_case_first {
        weights.for_each_weights_mut(swap_case_first);
        contractions.for_each_weights_mut(swap_case_first);
    }

    Ok(FoldedTable {
        weights,
        contractions,
    })
}

/// First matching rule wins; primaries no rule covers stay put.
pub fn reorder_primary(reorder: &[Reorder], primary: u16) -> u16 {
    reorder
        .iter()
        .find_map(|rule| rule.apply(primary))
        .unwrap_or(primary)
}

/// Swaps the lowercase and uppercase tertiary bands so uppercase sorts first.
pub fn swap_case_first(weights: &mut Weights) {
    weights.tertiary = match weights.tertiary {
        t @ 0x0008..=0x000C => t - 6,
        t @ 0x0002..=0x0006 => t + 6,
        t => t,
    };
}
