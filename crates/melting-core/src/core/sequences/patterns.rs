//! Structural predicates over duplex ranges and strand-level helpers.
//!
//! Range predicates return `false` for ranges outside the duplex instead of
//! failing; accessors that must produce text return a [`SequenceError`].

use super::SequenceError;
use super::duplex::Duplex;
use super::hybridization::Hybridization;
use super::pair::BasePair;
use super::token::ModifiedAcid;

/// End of the strand an unpaired terminal base hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingSense {
    FivePrime,
    ThreePrime,
}

impl DanglingSense {
    pub fn as_key(&self) -> &'static str {
        match self {
            DanglingSense::FivePrime => "5",
            DanglingSense::ThreePrime => "3",
        }
    }
}

impl Duplex {
    fn range(&self, pos1: usize, pos2: usize) -> &[BasePair] {
        &self.pairs()[pos1..=pos2]
    }

    pub fn is_perfect_match(&self, pos1: usize, pos2: usize) -> bool {
        self.is_in_range(pos1, pos2) && self.range(pos1, pos2).iter().all(BasePair::is_complementary)
    }

    /// One strand is entirely gaps over the range and the other strand holds
    /// standard bases only.
    fn is_one_sided_gap(&self, pos1: usize, pos2: usize) -> bool {
        if !self.is_in_range(pos1, pos2) {
            return false;
        }
        let (Ok(top), Ok(bottom)) = (self.sequence(pos1, pos2), self.complementary(pos1, pos2)) else {
            return false;
        };
        if top.contains('-') == bottom.contains('-') {
            return false;
        }

        let width = pos2 - pos1 + 1;
        let mut top_gaps = 0;
        let mut bottom_gaps = 0;
        for pair in self.range(pos1, pos2) {
            if pair.top() == "-" {
                top_gaps += 1;
                if !pair.is_frequent_bottom_base() {
                    return false;
                }
            } else if pair.bottom() == "-" {
                bottom_gaps += 1;
                if !pair.is_frequent_top_base() {
                    return false;
                }
            }
        }
        top_gaps == width || bottom_gaps == width
    }

    /// Unpaired bases on one strand at either end of the duplex.
    pub fn is_dangling_end(&self, pos1: usize, pos2: usize) -> bool {
        let terminal = pos1 == 0 || pos2 + 1 == self.len();
        terminal && self.is_one_sided_gap(pos1, pos2)
    }

    /// Unpaired bases on one strand. Whether the range is terminal is not checked.
    pub fn is_bulge_loop(&self, pos1: usize, pos2: usize) -> bool {
        self.is_one_sided_gap(pos1, pos2)
    }

    pub fn is_gu_sequences(&self, pos1: usize, pos2: usize) -> bool {
        self.is_in_range(pos1, pos2)
            && self
                .range(pos1, pos2)
                .iter()
                .all(|pair| pair.is_equal_to("G", "U"))
    }

    pub fn is_mismatch_pair(&self, pos: usize) -> bool {
        self.pair(pos).is_some_and(BasePair::is_mismatch)
    }

    /// Every pair is a mismatch or a gap facing a standard base, with gaps on
    /// both strands or none.
    pub fn is_mismatch(&self, pos1: usize, pos2: usize) -> bool {
        if !self.is_in_range(pos1, pos2) {
            return false;
        }
        let width = pos2 - pos1 + 1;
        let mut top_gaps = 0;
        let mut bottom_gaps = 0;
        for pair in self.range(pos1, pos2) {
            if pair.is_mismatch() {
                continue;
            }
            if !pair.is_unpaired() || (!pair.is_frequent_bottom_base() && !pair.is_frequent_top_base()) {
                return false;
            }
            if pair.top() == "-" {
                top_gaps += 1;
            } else {
                bottom_gaps += 1;
            }
        }
        top_gaps != width && bottom_gaps != width
    }

    /// `G(CNG)nC` over the whole duplex with at least 8 base pairs and at most 7 repeats.
    pub fn is_cng_pattern(&self, pos1: usize, pos2: usize) -> bool {
        let length = self.len();
        if pos1 != 0 || pos2 + 1 != length || length < 8 || (pos2 - pos1 - 1) / 3 > 7 {
            return false;
        }
        let pairs = self.pairs();
        if pairs[0].top() != "G" || pairs[length - 1].top() != "C" {
            return false;
        }
        let repeat = format!("C{}G", pairs[2].top());
        let mut index = 1;
        while index + 4 <= length {
            match self.sequence(index, index + 2) {
                Ok(triplet) if triplet == repeat => index += 3,
                _ => return false,
            }
        }
        true
    }

    pub fn is_registered_acid(&self, pos: usize) -> bool {
        self.pair(pos).is_some_and(BasePair::is_registered)
    }

    pub fn modified_acid_at(&self, pos: usize) -> Option<ModifiedAcid> {
        self.pair(pos).and_then(BasePair::modified_acid)
    }

    pub fn is_base_pair(&self, base1: &str, base2: &str, pos: usize) -> bool {
        self.pair(pos).is_some_and(|pair| pair.is_equal_to(base1, base2))
    }

    /// G·G next to A·A or next to a pair carrying a pyrimidine.
    pub fn is_tandem_mismatch_gg_penalty_necessary(&self, pos: usize) -> bool {
        let (Some(first), Some(second)) = (self.pair(pos), self.pair(pos + 1)) else {
            return false;
        };
        let first_gg = first.is_strictly_equal_to("G", "G");
        let second_gg = second.is_strictly_equal_to("G", "G");
        (first_gg && second.is_strictly_equal_to("A", "A"))
            || (second_gg && first.is_strictly_equal_to("A", "A"))
            || (first_gg && second.has_pyrimidine())
            || (second_gg && first.has_pyrimidine())
    }

    /// A·G next to C·U or C·C, or U·U next to A·A.
    pub fn is_tandem_mismatch_delta_p_penalty_necessary(&self, pos: usize) -> bool {
        let (Some(first), Some(second)) = (self.pair(pos), self.pair(pos + 1)) else {
            return false;
        };
        let either = |b1: &str, b2: &str| first.is_equal_to(b1, b2) || second.is_equal_to(b1, b2);
        if either("A", "G") {
            either("C", "U") || either("C", "C")
        } else {
            (first.is_equal_to("U", "U") && second.is_equal_to("A", "A"))
                || (second.is_equal_to("U", "U") && first.is_equal_to("A", "A"))
        }
    }

    pub fn is_no_gap(&self, pos1: usize, pos2: usize) -> bool {
        match (self.sequence(pos1, pos2), self.complementary(pos1, pos2)) {
            (Ok(top), Ok(bottom)) => !top.contains('-') && !bottom.contains('-'),
            _ => false,
        }
    }

    /// The range reads the same on both strands in the 5'→3' direction.
    pub fn is_symmetric(&self, pos1: usize, pos2: usize) -> bool {
        if !self.is_in_range(pos1, pos2) {
            return false;
        }
        let pairs = self.pairs();
        (pos1..pos2).all(|i| pairs[i].top() == pairs[pos2 - (i - pos1)].bottom())
    }

    pub fn is_asymmetric_internal_loop(&self, pos1: usize, pos2: usize) -> bool {
        self.inner(pos1, pos2).iter().any(BasePair::is_unpaired)
    }

    fn inner(&self, pos1: usize, pos2: usize) -> &[BasePair] {
        if pos2 <= pos1 + 1 || pos2 > self.len() {
            return &[];
        }
        &self.pairs()[pos1 + 1..pos2]
    }

    /// Loop-shape bucket of the loop enclosed by the paired positions `pos1` and `pos2`.
    ///
    /// Sizes count the non-gap tokens of each strand strictly inside the loop.
    /// Asymmetric loops distinguish `1x2`, `2x3`, one base against more than two
    /// and everything else; symmetric loops distinguish `1x1`, `2x2` and everything else.
    /// The one-against-many bucket is named after the top strand size, so a single
    /// base on the bottom strand gives `{top}xn_n>2`.
    pub fn internal_loop_type(&self, pos1: usize, pos2: usize) -> Result<String, SequenceError> {
        if !self.is_in_range(pos1, pos2) || pos2 < pos1 + 2 {
            return Err(SequenceError::Structure(format!(
                "no internal loop is enclosed by the positions {} and {}",
                pos1, pos2
            )));
        }
        let (top_size, bottom_size) = self.internal_loop_sizes(pos1, pos2);
        let (small, large) = (top_size.min(bottom_size), top_size.max(bottom_size));

        let loop_type = if self.is_asymmetric_internal_loop(pos1, pos2) {
            match (small, large) {
                (1, n) if n > 2 => format!("{}xn_n>2", top_size),
                (1, 2) | (2, 3) => format!("{}x{}", small, large),
                _ => "others_non_2x2".to_string(),
            }
        } else {
            match (small, large) {
                (1, 1) | (2, 2) => format!("{}x{}", small, large),
                _ => "others_non_2x2".to_string(),
            }
        };
        Ok(loop_type)
    }

    /// Non-gap tokens `(top, bottom)` strictly inside the loop enclosed by `pos1` and `pos2`.
    pub fn internal_loop_sizes(&self, pos1: usize, pos2: usize) -> (usize, usize) {
        let inner = self.inner(pos1, pos2);
        let top = inner.iter().filter(|pair| pair.top() != "-").count();
        let bottom = inner.iter().filter(|pair| pair.bottom() != "-").count();
        (top, bottom)
    }

    /// Number of unpaired nucleotides in the loop enclosed by `pos1` and `pos2`.
    pub fn internal_loop_length(&self, pos1: usize, pos2: usize) -> usize {
        let inner = self.inner(pos1, pos2);
        let gaps = inner.iter().filter(|pair| pair.is_unpaired()).count();
        2 * inner.len() - gaps
    }

    /// First mismatch of a loop: the closing base as purine/pyrimidine class
    /// followed by the first loop base, on each strand.
    pub fn loop_first_mismatch(&self, pos1: usize) -> Result<(String, String), SequenceError> {
        let closing = self.pair_or_err(pos1)?;
        let first = self.pair_or_err(pos1 + 1)?;
        Ok((
            to_purine_pyrimidine(closing.top())? + first.top(),
            to_purine_pyrimidine(closing.bottom())? + first.bottom(),
        ))
    }

    /// The stack formed by the two pairs flanking a single bulged base at `pos1 + 1`.
    pub fn single_bulge_neighbors(&self, pos1: usize) -> Result<(String, String), SequenceError> {
        let left = self.pair_or_err(pos1)?;
        let right = self.pair_or_err(pos1 + 2)?;
        Ok((
            format!("{}{}", left.top(), right.top()),
            format!("{}{}", left.bottom(), right.bottom()),
        ))
    }

    pub fn percent_gc(&self) -> f64 {
        let gc = self.pairs().iter().filter(|pair| pair.is_equal_to("G", "C")).count();
        gc as f64 / self.len() as f64 * 100.0
    }

    pub fn percent_mismatching(&self) -> f64 {
        let mismatching = self.pairs().iter().filter(|pair| !pair.is_complementary()).count();
        mismatching as f64 / self.len() as f64 * 100.0
    }

    pub fn has_gc_pair(&self) -> bool {
        self.pairs().iter().any(|pair| pair.is_equal_to("G", "C"))
    }

    /// How many of the two terminal pairs `pos1` and `pos2` equal `base1`·`base2`.
    pub fn terminal_count(&self, base1: &str, base2: &str, pos1: usize, pos2: usize) -> usize {
        [pos1, pos2]
            .into_iter()
            .filter(|&pos| self.is_base_pair(base1, base2, pos))
            .count()
    }

    /// Terminal T·A at the 5' end of the sequence strand plus A·T at its 3' end.
    pub fn terminal_5ta_count(&self, pos1: usize, pos2: usize) -> usize {
        let first = self.pair(pos1).is_some_and(|pair| pair.is_strictly_equal_to("T", "A"));
        let last = self.pair(pos2).is_some_and(|pair| pair.is_strictly_equal_to("A", "T"));
        usize::from(first) + usize::from(last)
    }

    /// First and last paired positions, skipping terminal unpaired columns.
    pub fn paired_range(&self) -> Result<(usize, usize), SequenceError> {
        let pairs = self.pairs();
        let start = pairs.iter().position(|pair| !pair.is_unpaired());
        let end = pairs.iter().rposition(|pair| !pair.is_unpaired());
        match (start, end) {
            (Some(start), Some(end)) if start < end => Ok((start, end)),
            _ => Err(SequenceError::NoHybridization {
                sequence: self.full_sequence().to_string(),
                complementary: self.full_complementary().to_string(),
            }),
        }
    }
}

/// Complementary strand, written 3'→5', of a sequence given 5'→3'.
///
/// Azobenzene markers produce no partner base.
pub fn complementary_sequence(sequence: &str, hybridization: Hybridization) -> String {
    let mut complementary = String::with_capacity(sequence.len());
    let mut previous = None;
    for base in sequence.chars() {
        let after_marker = previous == Some('_');
        match base {
            'A' => complementary.push(hybridization.adenine_partner()),
            'T' if !after_marker => complementary.push('A'),
            'C' if !after_marker => complementary.push('G'),
            'G' => complementary.push('C'),
            'U' => complementary.push('A'),
            '-' => complementary.push('-'),
            _ => {}
        }
        previous = Some(base);
    }
    complementary
}

/// Whether a single strand pairs with itself once terminal gaps are removed.
pub fn is_self_complementary(sequence: &str) -> Result<bool, SequenceError> {
    let trimmed = sequence.trim_matches('-');
    if trimmed.is_empty() {
        return Err(SequenceError::NoHybridization {
            sequence: sequence.to_string(),
            complementary: sequence.to_string(),
        });
    }
    let bytes = trimmed.as_bytes();
    let length = bytes.len();
    Ok((0..length.saturating_sub(1)).all(|i| {
        let top = &trimmed[i..i + 1];
        let bottom = &trimmed[length - i - 1..length - i];
        BasePair::new(top, bottom, 0).is_complementary()
    }))
}

pub fn reversed(sequence: &str) -> String {
    sequence.chars().rev().collect()
}

/// Raw text of an encoded strand: padding removed, azobenzene written `X`.
pub fn decode(sequence: &str) -> String {
    sequence
        .replace("X_T", "X")
        .replace("X_C", "X")
        .replace(' ', "")
}

/// Purine (`R`) / pyrimidine (`Y`) class of each base.
pub fn to_purine_pyrimidine(sequence: &str) -> Result<String, SequenceError> {
    sequence
        .chars()
        .map(|base| match base {
            'A' | 'G' => Ok('R'),
            'U' | 'T' | 'C' => Ok('Y'),
            '-' => Ok('-'),
            _ => Err(SequenceError::Structure(format!(
                "'{}' holds non Watson-Crick bases and has no purine/pyrimidine form",
                sequence
            ))),
        })
        .collect()
}

/// Side of the dangling end in the stack `seq1`/`seq2`, or `None` without gaps.
pub fn dangling_sense(seq1: &str, seq2: &str) -> Result<Option<DanglingSense>, SequenceError> {
    let sense = if seq1.is_empty() {
        DanglingSense::ThreePrime
    } else if seq2.is_empty() {
        DanglingSense::FivePrime
    } else if seq2.starts_with('-') {
        DanglingSense::FivePrime
    } else if seq1.starts_with('-') {
        DanglingSense::ThreePrime
    } else if seq2.ends_with('-') {
        DanglingSense::ThreePrime
    } else if seq1.ends_with('-') {
        DanglingSense::FivePrime
    } else if !seq1.contains('-') && !seq2.contains('-') {
        return Ok(None);
    } else {
        return Err(SequenceError::Structure(format!(
            "cannot determine the side of the dangling end {}/{}",
            seq1, seq2
        )));
    };
    Ok(Some(sense))
}

/// Rebuilds a tandem mismatch `PXYS/QWZT` as the palindromic tandem `PXWQ/QWXP`.
pub fn symmetric_tandem(seq1: &str, seq2: &str) -> Result<Duplex, SequenceError> {
    let (Some(head1), Some(head2)) = (seq1.get(..2), seq2.get(..2)) else {
        return Err(SequenceError::Structure(format!(
            "'{}/{}' is too short for a tandem mismatch",
            seq1, seq2
        )));
    };
    let mirrored = |head: &str, other: &str| -> String {
        let mut out = head.to_string();
        out.push_str(&other[1..2]);
        out.push_str(&other[0..1]);
        out
    };
    Duplex::new(&mirrored(head1, head2), &mirrored(head2, head1))
}
