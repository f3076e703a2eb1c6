use super::SequenceError;
use super::hybridization::Alphabet;
use super::pair::BasePair;
use super::token::{TokenMatch, token_at, tokenize};
use std::sync::{Arc, OnceLock};

/// Which strand a substring was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandSense {
    /// The sequence strand, read 5' to 3'.
    FiveToThree,
    /// The complementary strand, read 3' to 5'.
    ThreeToFive,
}

/// An aligned pair of strands decomposed into base pairs.
///
/// The encoded strings carry space padding so that every multi-character token
/// occupies the same character columns on both strands. Equivalent DNA or RNA
/// views share the base-pair vector and are materialized at most once.
#[derive(Debug, Clone)]
pub struct Duplex {
    sequence: String,
    complementary: String,
    pairs: Arc<[BasePair]>,
    alphabet: Option<Alphabet>,
    dna_view: OnceLock<Box<Duplex>>,
    rna_view: OnceLock<Box<Duplex>>,
}

/// Inserts the alignment padding that `other`'s wide tokens require into `target`.
fn pad_against(target: &str, other: &str) -> Result<String, SequenceError> {
    let mut padded = target.to_string();
    for (pos, token) in tokenize(other)? {
        let insertions: &[usize] = if token == "X_T" || token == "X_C" {
            &[0, 1, 2]
        } else if token == "A*" || token.as_bytes().get(1) == Some(&b'L') {
            &[1]
        } else {
            &[]
        };
        for &shift in insertions {
            let at = pos + shift;
            if at > padded.len() {
                return Err(SequenceError::LengthMismatch {
                    sequence: target.to_string(),
                    complementary: other.to_string(),
                });
            }
            padded.insert(at, ' ');
        }
    }
    Ok(padded)
}

/// Drops the columns that are gaps on both strands.
fn strip_gap_columns(sequence: &str, complementary: &str) -> (String, String) {
    let mut kept_sequence = String::with_capacity(sequence.len());
    let mut kept_complementary = String::with_capacity(complementary.len());
    let mut top = sequence.chars();
    let mut bottom = complementary.chars();
    loop {
        match (top.next(), bottom.next()) {
            (Some('-'), Some('-')) => {}
            (None, None) => break,
            (t, b) => {
                kept_sequence.extend(t);
                kept_complementary.extend(b);
            }
        }
    }
    (kept_sequence, kept_complementary)
}

/// Aligns two raw strands so that wide tokens occupy matching columns.
pub fn encode(sequence: &str, complementary: &str) -> Result<(String, String), SequenceError> {
    for raw in [sequence, complementary] {
        if !raw.is_ascii() {
            return Err(SequenceError::UnknownToken(raw.to_string()));
        }
    }
    let padded_sequence = pad_against(sequence, complementary)?;
    let padded_complementary = pad_against(complementary, sequence)?;
    let (sequence, complementary) = strip_gap_columns(&padded_sequence, &padded_complementary);
    if sequence.len() != complementary.len() {
        return Err(SequenceError::LengthMismatch {
            sequence,
            complementary,
        });
    }
    Ok((sequence, complementary))
}

fn pair_at(sequence: &str, complementary: &str, pos: usize) -> Result<BasePair, SequenceError> {
    let top = token_at(sequence, pos)?;
    let bottom = token_at(complementary, pos)?;
    let slice = |raw: &str, width: usize| -> Result<String, SequenceError> {
        raw.get(pos..pos + width)
            .map(str::to_string)
            .ok_or_else(|| SequenceError::LengthMismatch {
                sequence: sequence.to_string(),
                complementary: complementary.to_string(),
            })
    };
    match (top, bottom) {
        (Some(TokenMatch::Known(t)), Some(TokenMatch::Known(b))) => Ok(BasePair::new(t, b, pos)),
        (Some(TokenMatch::Known(t)), _) => Ok(BasePair::new(t, slice(complementary, t.len())?, pos)),
        (_, Some(TokenMatch::Known(b))) => Ok(BasePair::new(slice(sequence, b.len())?, b, pos)),
        _ => Err(SequenceError::UnknownToken(format!(
            "no nucleic acid at position {} of the duplex {}/{}",
            pos, sequence, complementary
        ))),
    }
}

fn convert(raw: &str, alphabet: Alphabet) -> String {
    match alphabet {
        Alphabet::Dna => raw.replace('U', "T"),
        Alphabet::Rna => raw.replace('T', "U"),
    }
}

impl Duplex {
    /// Encodes and decomposes two strands given 5'→3' and 3'→5'.
    pub fn new(sequence: &str, complementary: &str) -> Result<Self, SequenceError> {
        let (sequence, complementary) = encode(sequence, complementary)?;
        Self::from_encoded(sequence, complementary)
    }

    /// Builds a duplex from strings that are already aligned.
    pub fn from_encoded(sequence: String, complementary: String) -> Result<Self, SequenceError> {
        if sequence.len() != complementary.len() {
            return Err(SequenceError::LengthMismatch {
                sequence,
                complementary,
            });
        }
        let mut pairs = Vec::new();
        let mut pos = 0;
        while pos < sequence.len() {
            let pair = pair_at(&sequence, &complementary, pos)?;
            pos += pair.width();
            pairs.push(pair);
        }
        if pairs.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self {
            sequence,
            complementary,
            pairs: pairs.into(),
            alphabet: None,
            dna_view: OnceLock::new(),
            rna_view: OnceLock::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[BasePair] {
        &self.pairs
    }

    pub fn pair(&self, index: usize) -> Option<&BasePair> {
        self.pairs.get(index)
    }

    pub(crate) fn pair_or_err(&self, index: usize) -> Result<&BasePair, SequenceError> {
        self.pairs.get(index).ok_or(SequenceError::OutOfRange {
            pos1: index,
            pos2: index,
            length: self.len(),
        })
    }

    /// The encoded sequence strand, padding included.
    pub fn encoded_sequence(&self) -> &str {
        &self.sequence
    }

    pub fn encoded_complementary(&self) -> &str {
        &self.complementary
    }

    pub fn is_in_range(&self, pos1: usize, pos2: usize) -> bool {
        pos1 <= pos2 && pos2 < self.len()
    }

    fn char_range(&self, pos1: usize, pos2: usize) -> Result<(usize, usize), SequenceError> {
        if !self.is_in_range(pos1, pos2) {
            return Err(SequenceError::OutOfRange {
                pos1,
                pos2,
                length: self.len(),
            });
        }
        let first = &self.pairs[pos1];
        let last = &self.pairs[pos2];
        Ok((first.position(), last.position() + last.width()))
    }

    /// Sequence-strand text of base pairs `pos1..=pos2`.
    pub fn sequence(&self, pos1: usize, pos2: usize) -> Result<&str, SequenceError> {
        let (start, end) = self.char_range(pos1, pos2)?;
        Ok(&self.sequence[start..end])
    }

    /// Complementary-strand text of base pairs `pos1..=pos2`.
    pub fn complementary(&self, pos1: usize, pos2: usize) -> Result<&str, SequenceError> {
        let (start, end) = self.char_range(pos1, pos2)?;
        Ok(&self.complementary[start..end])
    }

    pub fn full_sequence(&self) -> &str {
        &self.sequence
    }

    pub fn full_complementary(&self) -> &str {
        &self.complementary
    }

    /// Both strands of the nearest-neighbor stack starting at `pos`.
    pub fn nn_pair(&self, pos: usize) -> Result<(&str, &str), SequenceError> {
        Ok((self.sequence(pos, pos + 1)?, self.complementary(pos, pos + 1)?))
    }

    /// The stack at `pos` with locked-acid markers and padding removed.
    pub fn nn_pair_unlocked(&self, pos: usize) -> Result<(String, String), SequenceError> {
        let (top, bottom) = self.nn_pair(pos)?;
        let strip = |s: &str| s.replace('L', "").replace(' ', "");
        Ok((strip(top), strip(bottom)))
    }

    /// The stack at `pos` with any 8-hydroxyadenine pair replaced by A·T.
    pub fn nn_pair_without_hydroxyadenine(
        &self,
        pos: usize,
    ) -> Result<(String, String), SequenceError> {
        let replace = |pair: &BasePair| -> (String, String) {
            if pair.top() == "A*" {
                ("A".to_string(), "T".to_string())
            } else if pair.bottom() == "A*" {
                ("T".to_string(), "A".to_string())
            } else {
                (pair.top().to_string(), pair.bottom().to_string())
            }
        };
        let (top1, bottom1) = replace(self.pair_or_err(pos)?);
        let (top2, bottom2) = replace(self.pair_or_err(pos + 1)?);
        Ok((top1 + &top2, bottom1 + &bottom2))
    }

    /// Whichever strand of `pos1..=pos2` contains `pattern`, sequence strand first.
    pub fn strand_containing(
        &self,
        pattern: &str,
        pos1: usize,
        pos2: usize,
    ) -> Result<Option<&str>, SequenceError> {
        let top = self.sequence(pos1, pos2)?;
        if top.contains(pattern) {
            return Ok(Some(top));
        }
        let bottom = self.complementary(pos1, pos2)?;
        Ok(bottom.contains(pattern).then_some(bottom))
    }

    /// The opposite strand of `strand` over `pos1..=pos2`.
    pub fn opposite_of(&self, strand: &str, pos1: usize, pos2: usize) -> Result<&str, SequenceError> {
        let top = self.sequence(pos1, pos2)?;
        let bottom = self.complementary(pos1, pos2)?;
        if strand == top {
            Ok(bottom)
        } else if strand == bottom {
            Ok(top)
        } else {
            Err(SequenceError::Structure(format!(
                "'{}' is not a strand of the range [{}, {}]",
                strand, pos1, pos2
            )))
        }
    }

    pub fn sense_of(&self, strand: &str, pos1: usize, pos2: usize) -> Result<StrandSense, SequenceError> {
        if strand == self.sequence(pos1, pos2)? {
            Ok(StrandSense::FiveToThree)
        } else if strand == self.complementary(pos1, pos2)? {
            Ok(StrandSense::ThreeToFive)
        } else {
            Err(SequenceError::Structure(format!(
                "'{}' is not a strand of the range [{}, {}]",
                strand, pos1, pos2
            )))
        }
    }

    /// Sequence-strand text of `pos1..=pos2` written in `alphabet`.
    pub fn sequence_in(&self, pos1: usize, pos2: usize, alphabet: Alphabet) -> Result<String, SequenceError> {
        Ok(convert(self.sequence(pos1, pos2)?, alphabet))
    }

    /// The same duplex with U and T normalized to `alphabet`.
    ///
    /// The view is created on first request and reused afterwards; a view asked
    /// for its own alphabet returns itself.
    pub fn equivalent(&self, alphabet: Alphabet) -> &Duplex {
        if self.alphabet == Some(alphabet) {
            return self;
        }
        let cell = match alphabet {
            Alphabet::Dna => &self.dna_view,
            Alphabet::Rna => &self.rna_view,
        };
        cell.get_or_init(|| {
            Box::new(Duplex {
                sequence: convert(&self.sequence, alphabet),
                complementary: convert(&self.complementary, alphabet),
                pairs: Arc::clone(&self.pairs),
                alphabet: Some(alphabet),
                dna_view: OnceLock::new(),
                rna_view: OnceLock::new(),
            })
        })
    }

    pub(crate) fn shares_pairs_with(&self, other: &Duplex) -> bool {
        Arc::ptr_eq(&self.pairs, &other.pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strands_encode_unchanged() {
        let (s, c) = encode("ACGT", "TGCA").unwrap();
        assert_eq!(s, "ACGT");
        assert_eq!(c, "TGCA");
    }

    #[test]
    fn locked_token_pads_the_opposite_strand() {
        let (s, c) = encode("ALCG", "TGC").unwrap();
        assert_eq!(s, "ALCG");
        assert_eq!(c, "T GC");
        let duplex = Duplex::new("ALCG", "TGC").unwrap();
        assert_eq!(duplex.len(), 3);
        assert_eq!(duplex.pairs()[0].top(), "AL");
        assert_eq!(duplex.pairs()[0].bottom(), "T");
        assert_eq!(duplex.pairs()[1].position(), 2);
        assert_eq!(duplex.sequence(0, 1).unwrap(), "ALC");
        assert_eq!(duplex.complementary(0, 1).unwrap(), "T G");
    }

    #[test]
    fn azobenzene_token_pads_three_columns() {
        let duplex = Duplex::new("AX_CG", "TC").unwrap();
        assert_eq!(duplex.encoded_complementary(), "T   C");
        assert_eq!(duplex.len(), 3);
        assert_eq!(duplex.pairs()[1].top(), "X_C");
        assert_eq!(duplex.pairs()[1].bottom(), "   ");
        assert_eq!(duplex.pairs()[2].position(), 4);
    }

    #[test]
    fn double_gap_columns_are_removed() {
        let duplex = Duplex::new("AC-GT", "TG-CA").unwrap();
        assert_eq!(duplex.full_sequence(), "ACGT");
        assert_eq!(duplex.len(), 4);
    }

    #[test]
    fn unequal_strands_are_rejected() {
        assert!(matches!(
            Duplex::new("ACGT", "TGC"),
            Err(SequenceError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn empty_strands_are_rejected() {
        assert_eq!(Duplex::new("", "").err(), Some(SequenceError::Empty));
        assert_eq!(Duplex::new("--", "--").err(), Some(SequenceError::Empty));
    }

    #[test]
    fn out_of_range_slices_fail_hard() {
        let duplex = Duplex::new("ACGT", "TGCA").unwrap();
        assert!(matches!(
            duplex.sequence(2, 4),
            Err(SequenceError::OutOfRange { .. })
        ));
        assert!(duplex.nn_pair(3).is_err());
    }

    #[test]
    fn equivalent_views_are_memoized_and_share_pairs() {
        let duplex = Duplex::new("ACGU", "UGCA").unwrap();
        let dna = duplex.equivalent(Alphabet::Dna);
        assert_eq!(dna.full_sequence(), "ACGT");
        assert_eq!(dna.full_complementary(), "TGCA");
        assert!(std::ptr::eq(dna, duplex.equivalent(Alphabet::Dna)));
        assert!(std::ptr::eq(dna, dna.equivalent(Alphabet::Dna)));
        assert!(dna.shares_pairs_with(&duplex));
    }

    #[test]
    fn strand_helpers_locate_the_gap_strand() {
        let duplex = Duplex::new("-ACG", "TTGC").unwrap();
        let gapped = duplex.strand_containing("-", 0, 1).unwrap();
        assert_eq!(gapped, Some("-A"));
        assert_eq!(duplex.opposite_of("-A", 0, 1).unwrap(), "TT");
        assert_eq!(
            duplex.sense_of("TT", 0, 1).unwrap(),
            StrandSense::ThreeToFive
        );
        assert!(duplex.opposite_of("GG", 0, 1).is_err());
    }

    #[test]
    fn hydroxyadenine_is_replaced_by_watson_crick_pair() {
        let duplex = Duplex::new("TA*A", "ATT").unwrap();
        assert_eq!(duplex.encoded_complementary(), "AT T");
        assert_eq!(
            duplex.nn_pair_without_hydroxyadenine(0).unwrap(),
            ("TA".to_string(), "AT".to_string())
        );
    }
}
