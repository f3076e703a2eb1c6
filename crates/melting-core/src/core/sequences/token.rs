use super::SequenceError;
use phf::{phf_map, phf_set};
use std::fmt;

/// Every token the duplex encoder recognizes, standard bases and modified acids alike.
static KNOWN_TOKENS: phf::Set<&'static str> = phf_set! {
    "A", "T", "U", "G", "C", "I", "-",
    "A*", "AL", "TL", "GL", "CL", "UL",
    "X_C", "X_T",
};

static MODIFIED_ACIDS: phf::Map<&'static str, ModifiedAcid> = phf_map! {
    "I" => ModifiedAcid::Inosine,
    "AL" => ModifiedAcid::LockedNucleicAcid,
    "TL" => ModifiedAcid::LockedNucleicAcid,
    "CL" => ModifiedAcid::LockedNucleicAcid,
    "GL" => ModifiedAcid::LockedNucleicAcid,
    "A*" => ModifiedAcid::Hydroxyadenine,
    "X_C" => ModifiedAcid::Azobenzene,
    "X_T" => ModifiedAcid::Azobenzene,
};

const LONGEST_TOKEN: usize = 3;

/// Family of a non-standard nucleotide token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifiedAcid {
    Inosine,
    LockedNucleicAcid,
    Hydroxyadenine,
    Azobenzene,
}

impl fmt::Display for ModifiedAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifiedAcid::Inosine => "inosine",
            ModifiedAcid::LockedNucleicAcid => "locked nucleic acid",
            ModifiedAcid::Hydroxyadenine => "8-hydroxyadenine",
            ModifiedAcid::Azobenzene => "azobenzene",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMatch<'a> {
    /// A registered token starting at the probed offset.
    Known(&'a str),
    /// Alignment padding inserted by the encoder.
    Padding,
}

pub fn is_known_token(text: &str) -> bool {
    KNOWN_TOKENS.contains(text)
}

pub fn modified_acid(token: &str) -> Option<ModifiedAcid> {
    MODIFIED_ACIDS.get(token).copied()
}

/// Longest registered token starting at byte `offset` of `raw`.
///
/// Returns `Ok(None)` when `offset` is past the end of the string. Any
/// character that starts no registered token is rejected unless it is a space.
pub fn token_at(raw: &str, offset: usize) -> Result<Option<TokenMatch<'_>>, SequenceError> {
    let Some(rest) = raw.get(offset..) else {
        return Err(SequenceError::UnknownToken(format!(
            "offset {} is not a character boundary of '{}'",
            offset, raw
        )));
    };
    if rest.is_empty() {
        return Ok(None);
    }

    for width in (1..=LONGEST_TOKEN.min(rest.len())).rev() {
        if let Some(candidate) = rest.get(..width) {
            if KNOWN_TOKENS.contains(candidate) {
                return Ok(Some(TokenMatch::Known(candidate)));
            }
        }
    }

    if rest.starts_with(' ') {
        Ok(Some(TokenMatch::Padding))
    } else {
        Err(SequenceError::UnknownToken(format!(
            "unknown nucleic acid at position {} of '{}'; recognized tokens are A, T, G, C, U, I, A*, AL, TL, GL, CL, UL, X_C, X_T and '-'",
            offset, raw
        )))
    }
}

/// Splits a raw strand into its registered tokens, skipping padding.
pub fn tokenize(raw: &str) -> Result<Vec<(usize, &str)>, SequenceError> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    while let Some(found) = token_at(raw, offset)? {
        match found {
            TokenMatch::Known(text) => {
                tokens.push((offset, text));
                offset += text.len();
            }
            TokenMatch::Padding => offset += 1,
        }
    }
    Ok(tokens)
}

/// Checks that every character of `raw` belongs to a registered token.
pub fn check_sequence(raw: &str) -> Result<(), SequenceError> {
    if raw.is_empty() {
        return Err(SequenceError::Empty);
    }
    tokenize(raw).map(|_| ())
}
