use super::token::{ModifiedAcid, is_known_token, modified_acid};

/// One aligned column of a duplex.
///
/// `position` is the byte offset of the column in the encoded strand strings.
/// The column is as wide as its widest token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePair {
    top: String,
    bottom: String,
    position: usize,
}

fn is_frequent_base(acid: &str) -> bool {
    matches!(acid, "A" | "T" | "C" | "G" | "U")
}

fn is_pyrimidine(acid: &str) -> bool {
    matches!(acid, "T" | "C" | "U")
}

impl BasePair {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>, position: usize) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
            position,
        }
    }

    pub fn top(&self) -> &str {
        &self.top
    }

    pub fn bottom(&self) -> &str {
        &self.bottom
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn width(&self) -> usize {
        self.top.len().max(self.bottom.len())
    }

    /// Watson-Crick pairing of two single-letter bases.
    pub fn is_complementary(&self) -> bool {
        matches!(
            (self.top.as_str(), self.bottom.as_str()),
            ("A", "T") | ("A", "U") | ("T", "A") | ("G", "C") | ("C", "G") | ("U", "A")
        )
    }

    pub fn is_frequent_top_base(&self) -> bool {
        is_frequent_base(&self.top)
    }

    pub fn is_frequent_bottom_base(&self) -> bool {
        is_frequent_base(&self.bottom)
    }

    pub fn is_top_pyrimidine(&self) -> bool {
        is_pyrimidine(&self.top)
    }

    pub fn is_bottom_pyrimidine(&self) -> bool {
        is_pyrimidine(&self.bottom)
    }

    pub fn has_pyrimidine(&self) -> bool {
        self.is_top_pyrimidine() || self.is_bottom_pyrimidine()
    }

    /// Matches `base1`/`base2` in either orientation.
    pub fn is_equal_to(&self, base1: &str, base2: &str) -> bool {
        (self.top == base1 && self.bottom == base2) || (self.top == base2 && self.bottom == base1)
    }

    pub fn is_strictly_equal_to(&self, base1: &str, base2: &str) -> bool {
        self.top == base1 && self.bottom == base2
    }

    pub fn is_unpaired(&self) -> bool {
        self.top == "-" || self.bottom == "-"
    }

    /// Non-complementary pair of two standard bases.
    pub fn is_mismatch(&self) -> bool {
        !self.is_complementary() && self.is_frequent_bottom_base() && self.is_frequent_top_base()
    }

    pub fn is_registered(&self) -> bool {
        is_known_token(&self.top) || is_known_token(&self.bottom)
    }

    pub fn modified_acid(&self) -> Option<ModifiedAcid> {
        modified_acid(&self.top).or_else(|| modified_acid(&self.bottom))
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.top == token || self.bottom == token
    }
}
