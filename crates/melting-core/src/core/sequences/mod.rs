//! # Sequences
//!
//! Aligned duplex representation and the structural predicates the pattern
//! strategies classify ranges with.
//!
//! ## Key Components
//!
//! - **[`token`]**: registry of recognized nucleotide tokens and longest-match lookup.
//! - **[`pair`]**: [`pair::BasePair`], one aligned column of the duplex.
//! - **[`duplex`]**: [`duplex::Duplex`], the encoded strand pair with range slicing
//!   and memoized DNA/RNA equivalents.
//! - **[`patterns`]**: range predicates (perfect match, mismatch, bulge, dangling end,
//!   CNG repeat, internal loop typing) and strand utilities.
//! - **[`hybridization`]**: hybridization type and alphabet tags.

use thiserror::Error;

pub mod duplex;
pub mod hybridization;
pub mod pair;
pub mod patterns;
pub mod token;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Unrecognized sequence content: {0}")]
    UnknownToken(String),

    #[error(
        "The strands '{sequence}' and '{complementary}' have different lengths after alignment; write gaps with '-'"
    )]
    LengthMismatch {
        sequence: String,
        complementary: String,
    },

    #[error("The sequence is empty")]
    Empty,

    #[error("Range [{pos1}, {pos2}] is outside a duplex of {length} base pairs")]
    OutOfRange {
        pos1: usize,
        pos2: usize,
        length: usize,
    },

    #[error("No hybridization is possible between '{sequence}' and '{complementary}'")]
    NoHybridization {
        sequence: String,
        complementary: String,
    },

    #[error("Unexpected structure: {0}")]
    Structure(String),
}
