use std::fmt;
use std::str::FromStr;

/// Chemical nature of the two strands, written `<sequence><complementary>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybridization {
    DnaDna,
    RnaRna,
    MrnaRna,
    RnaMrna,
    DnaRna,
    RnaDna,
}

/// Alphabet a duplex view is materialized in (U versus T).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alphabet {
    Dna,
    Rna,
}

impl Hybridization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hybridization::DnaDna => "dnadna",
            Hybridization::RnaRna => "rnarna",
            Hybridization::MrnaRna => "mrnarna",
            Hybridization::RnaMrna => "rnamrna",
            Hybridization::DnaRna => "dnarna",
            Hybridization::RnaDna => "rnadna",
        }
    }

    pub fn is_dna(&self) -> bool {
        matches!(self, Hybridization::DnaDna)
    }

    pub fn is_rna(&self) -> bool {
        matches!(self, Hybridization::RnaRna)
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, Hybridization::DnaRna | Hybridization::RnaDna)
    }

    pub fn is_modified_rna(&self) -> bool {
        matches!(self, Hybridization::MrnaRna | Hybridization::RnaMrna)
    }

    /// Whether the strands are given with the RNA strand first and must be swapped.
    pub fn is_reversed(&self) -> bool {
        matches!(self, Hybridization::RnaDna | Hybridization::RnaMrna)
    }

    /// Base written opposite an adenine when the complementary strand is generated.
    pub fn adenine_partner(&self) -> char {
        match self {
            Hybridization::DnaDna | Hybridization::RnaDna => 'T',
            _ => 'U',
        }
    }
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hybridization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dnadna" => Ok(Hybridization::DnaDna),
            "rnarna" => Ok(Hybridization::RnaRna),
            "mrnarna" => Ok(Hybridization::MrnaRna),
            "rnamrna" => Ok(Hybridization::RnaMrna),
            "dnarna" => Ok(Hybridization::DnaRna),
            "rnadna" => Ok(Hybridization::RnaDna),
            other => Err(format!(
                "unknown hybridization type '{}'; expected dnadna, rnarna, mrnarna, rnamrna, dnarna or rnadna",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively_and_round_trips_names() {
        let parsed: Hybridization = "DNADNA".parse().unwrap();
        assert_eq!(parsed, Hybridization::DnaDna);
        assert_eq!(parsed.to_string(), "dnadna");
        assert!("dnaprotein".parse::<Hybridization>().is_err());
    }

    #[test]
    fn only_rna_first_types_are_reversed() {
        assert!(Hybridization::RnaDna.is_reversed());
        assert!(Hybridization::RnaMrna.is_reversed());
        assert!(!Hybridization::DnaRna.is_reversed());
        assert!(!Hybridization::DnaDna.is_reversed());
    }

    #[test]
    fn adenine_partner_depends_on_the_complementary_strand() {
        assert_eq!(Hybridization::DnaDna.adenine_partner(), 'T');
        assert_eq!(Hybridization::RnaDna.adenine_partner(), 'T');
        assert_eq!(Hybridization::DnaRna.adenine_partner(), 'U');
        assert_eq!(Hybridization::RnaRna.adenine_partner(), 'U');
    }
}
