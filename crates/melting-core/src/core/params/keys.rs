//! Canonical key space of the parameter tables.
//!
//! Every key is a category prefix followed by the pattern, e.g. `neighborAC/TG`
//! or `danglingCA/Gsens3`. Tables store one orientation per duplex pattern; a
//! lookup that misses the direct key retries with both strands reversed and
//! swapped.

use super::table::ParameterTable;
use crate::core::sequences::patterns::{DanglingSense, decode, reversed};
use crate::core::thermo::term::Thermodynamics;
use std::fmt;

/// The direct key a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey(pub String);

impl fmt::Display for MissingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type Lookup = Result<Thermodynamics, MissingKey>;

/// Mirror of a pair of strands: `reverse(seq2)/reverse(seq1)`.
pub fn symmetric_pair(seq1: &str, seq2: &str) -> String {
    format!("{}/{}", reversed(seq2), reversed(seq1))
}

/// Mirror keeping each azobenzene marker written before its isomer letter.
pub fn symmetric_azobenzene_pair(seq1: &str, seq2: &str) -> String {
    let relocate = |s: &str| reversed(s).replace("C_X", "X_C").replace("T_X", "X_T");
    format!("{}/{}", relocate(seq2), relocate(seq1))
}

/// Mirror keeping each locked marker `L` after the base it modifies.
pub fn symmetric_locked_pair(seq1: &str, seq2: &str) -> String {
    format!("{}/{}", relocate_locked(&reversed(seq2)), relocate_locked(&reversed(seq1)))
}

fn relocate_locked(reversed: &str) -> String {
    let mut out = String::with_capacity(reversed.len());
    let mut chars = reversed.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('L', Some(&base)) if base != 'L' => {
                out.push(base);
                out.push('L');
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Mirror keeping each `*` after the adenine it modifies.
pub fn symmetric_hydroxyadenine_pair(seq1: &str, seq2: &str) -> String {
    let relocate = |s: &str| reversed(s).replace("*A", "A*");
    format!("{}/{}", relocate(seq2), relocate(seq1))
}

fn without_gaps(seq: &str) -> String {
    seq.replace('-', "")
}

impl ParameterTable {
    fn single(&self, key: String) -> Lookup {
        self.get(&key).ok_or(MissingKey(key))
    }

    fn oriented(&self, direct: String, mirrored: String) -> Lookup {
        self.get(&direct)
            .or_else(|| self.get(&mirrored))
            .ok_or(MissingKey(direct))
    }

    /// `prefix + seq1/seq2 + suffix`, falling back on the mirrored pair.
    pub fn lookup_pair(&self, prefix: &str, seq1: &str, seq2: &str, suffix: &str) -> Lookup {
        self.oriented(
            format!("{prefix}{seq1}/{seq2}{suffix}"),
            format!("{prefix}{}{suffix}", symmetric_pair(seq1, seq2)),
        )
    }

    pub fn neighbor(&self, seq1: &str, seq2: &str) -> Lookup {
        self.lookup_pair("neighbor", seq1, seq2, "")
    }

    pub fn initiation(&self) -> Option<Thermodynamics> {
        self.get("initiation")
    }

    pub fn initiation_of(&self, kind: &str) -> Lookup {
        self.single(format!("initiation{kind}"))
    }

    pub fn symmetry(&self) -> Lookup {
        self.single("symmetry".to_string())
    }

    pub fn terminal(&self, kind: &str) -> Lookup {
        self.single(format!("terminal{kind}"))
    }

    pub fn mismatch(&self, seq1: &str, seq2: &str) -> Lookup {
        self.lookup_pair("mismatch", seq1, seq2, "")
    }

    pub fn closed_mismatch(&self, seq1: &str, seq2: &str, closing: &str) -> Lookup {
        self.lookup_pair("mismatch", seq1, seq2, &format!("close{closing}"))
    }

    pub fn internal_loop(&self, size: &str) -> Lookup {
        self.single(format!("mismatchsize{size}"))
    }

    pub fn loop_initiation(&self, size: &str) -> Lookup {
        self.single(format!("mismatchinitiationsize{size}"))
    }

    /// Initiation of a loop whose table carries a single, size-free entry.
    pub fn loop_initiation_unsized(&self) -> Lookup {
        self.single("mismatchinitiation".to_string())
    }

    pub fn mismatch_parameter(&self, base1: &str, base2: &str) -> Lookup {
        self.lookup_pair("parameters", base1, base2, "")
    }

    pub fn closure(&self, base1: &str, base2: &str) -> Lookup {
        self.single(format!("closureper_{base1}/{base2}"))
    }

    pub fn penalty(&self, kind: &str) -> Lookup {
        self.single(format!("penalty{kind}"))
    }

    pub fn asymmetry(&self) -> Lookup {
        self.single("asymmetry".to_string())
    }

    pub fn first_mismatch(&self, seq1: &str, seq2: &str, loop_type: &str) -> Lookup {
        self.lookup_pair(
            &format!("mismatchfirst_non_canonical_pairloop{loop_type}"),
            seq1,
            seq2,
            "",
        )
    }

    /// Dangling-end stack; gaps are dropped from the key, the sense is kept as given.
    pub fn dangling(&self, seq1: &str, seq2: &str, sense: Option<DanglingSense>) -> Lookup {
        let suffix = format!("sens{}", sense.map_or("", |s| s.as_key()));
        self.lookup_pair("dangling", &without_gaps(seq1), &without_gaps(seq2), &suffix)
    }

    pub fn single_bulge(&self, seq1: &str, seq2: &str) -> Lookup {
        self.lookup_pair("bulge", &without_gaps(seq1), &without_gaps(seq2), "")
    }

    pub fn bulge_loop(&self, size: &str) -> Lookup {
        self.single(format!("bulgesize{size}"))
    }

    pub fn bulge_initiation(&self, size: &str) -> Lookup {
        self.single(format!("bulgeinitiationsize{size}"))
    }

    pub fn cng(&self, repeats: usize, base: &str) -> Lookup {
        self.single(format!("CNGrepeats{repeats}{base}"))
    }

    pub fn modified(&self, seq1: &str, seq2: &str) -> Lookup {
        self.lookup_pair("modified", seq1, seq2, "")
    }

    pub fn modified_with_sense(&self, seq1: &str, seq2: &str, sense: DanglingSense) -> Lookup {
        self.lookup_pair("modified", seq1, seq2, &format!("sens{}", sense.as_key()))
    }

    /// Azobenzene stacks are keyed by isomer (`trans` for `X_T`, `cys` for `X_C`).
    pub fn azobenzene(&self, seq1: &str, seq2: &str) -> Lookup {
        let isomer = if seq1.contains("X_T") || seq2.contains("X_T") {
            "trans"
        } else if seq1.contains("X_C") || seq2.contains("X_C") {
            "cys"
        } else {
            ""
        };
        let (seq1, seq2) = (decode(seq1), decode(seq2));
        self.oriented(
            format!("modified{isomer}{seq1}/{seq2}"),
            format!("modified{isomer}{}", symmetric_azobenzene_pair(&seq1, &seq2)),
        )
    }

    pub fn locked_acid(&self, seq1: &str, seq2: &str) -> Lookup {
        let (seq1, seq2) = (decode(seq1), decode(seq2));
        self.oriented(
            format!("modified{seq1}/{seq2}"),
            format!("modified{}", symmetric_locked_pair(&seq1, &seq2)),
        )
    }

    /// 8-hydroxyadenine stack, or a terminal one when `sense` is given.
    pub fn hydroxyadenine(&self, seq1: &str, seq2: &str, sense: Option<DanglingSense>) -> Lookup {
        let (seq1, seq2) = (decode(seq1), decode(seq2));
        match sense {
            Some(sense) => self.modified_with_sense(&seq1, &seq2, sense),
            None => self.oriented(
                format!("modified{seq1}/{seq2}"),
                format!("modified{}", symmetric_hydroxyadenine_pair(&seq1, &seq2)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64, f64)]) -> ParameterTable {
        ParameterTable::from_entries(
            entries
                .iter()
                .map(|&(k, h, s)| (k.to_string(), Thermodynamics::new(h, s))),
        )
    }

    #[test]
    fn mirrored_orientation_is_found_when_direct_key_is_absent() {
        let t = table(&[("neighborAC/TG", -8400.0, -22.4)]);
        assert_eq!(t.neighbor("AC", "TG"), t.neighbor("GT", "CA"));
        assert_eq!(t.neighbor("GT", "CA").unwrap(), Thermodynamics::new(-8400.0, -22.4));
    }

    #[test]
    fn direct_key_wins_over_mirror() {
        let t = table(&[("mismatchAG/TT", 1.0, 1.0), ("mismatchTT/GA", 2.0, 2.0)]);
        assert_eq!(t.mismatch("AG", "TT").unwrap(), Thermodynamics::new(1.0, 1.0));
    }

    #[test]
    fn missing_key_reports_the_direct_key() {
        let t = table(&[]);
        assert_eq!(
            t.neighbor("AA", "TT"),
            Err(MissingKey("neighborAA/TT".to_string()))
        );
        assert_eq!(t.terminal("per_A/T"), Err(MissingKey("terminalper_A/T".to_string())));
    }

    #[test]
    fn dangling_keys_drop_gaps_and_keep_sense() {
        let t = table(&[("danglingCA/Gsens3", -1.1, -2.0)]);
        assert!(t.dangling("CA", "G-", Some(DanglingSense::ThreePrime)).is_ok());
        assert!(t.dangling("-G", "AC", Some(DanglingSense::ThreePrime)).is_ok());
        assert!(t.dangling("CA", "G-", Some(DanglingSense::FivePrime)).is_err());
    }

    #[test]
    fn locked_mirror_keeps_marker_after_its_base() {
        assert_eq!(symmetric_locked_pair("ALC", "TG"), "GT/CAL");
        assert_eq!(symmetric_locked_pair("CA", "GTL"), "TLG/AC");
    }

    #[test]
    fn hydroxyadenine_mirror_keeps_star_after_adenine() {
        assert_eq!(symmetric_hydroxyadenine_pair("TA*", "AT"), "TA/A*T");
    }

    #[test]
    fn azobenzene_keys_carry_the_isomer() {
        let t = table(&[("modifiedtransAX/T", -2.0, -5.0), ("modifiedcysAX/T", -1.0, -3.0)]);
        assert_eq!(t.azobenzene("AX_T", "T   ").unwrap(), Thermodynamics::new(-2.0, -5.0));
        assert_eq!(t.azobenzene("AX_C", "T   ").unwrap(), Thermodynamics::new(-1.0, -3.0));
        assert_eq!(t.azobenzene("XA", "T").unwrap_err().0, "modifiedXA/T");
    }

    #[test]
    fn closing_pair_suffix_is_part_of_the_key() {
        let t = table(&[("mismatchGA/AGcloseC/G", -3.0, -9.0)]);
        assert!(t.closed_mismatch("GA", "AG", "C/G").is_ok());
    }
}
