use super::{Contribution, Params, advise_hybridization, closures, terminal_au_count, terminal_gu_count, widen};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::sequences::patterns::to_purine_pyrimidine;
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

/// Models for one mismatched pair between two Watson-Crick pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleMismatchModel {
    /// DNA mismatch stacks.
    AllawiSantaLuciaPeyret,
    /// DNA/RNA mismatch stacks.
    Watkins11,
    /// RNA, purine/pyrimidine trinucleotide plus closing penalties.
    Znosko07,
    /// Like [`SingleMismatchModel::Znosko07`], fitted on mismatches next to a G·U pair.
    Znosko08,
    /// RNA loop initiation with first-mismatch bonuses.
    Turner06,
}

impl SingleMismatchModel {
    pub fn reference(&self) -> &'static str {
        match self {
            SingleMismatchModel::AllawiSantaLuciaPeyret => "Allawi, SantaLucia and Peyret (1997, 1998, 1999)",
            SingleMismatchModel::Watkins11 => "Watkins et al. (2011)",
            SingleMismatchModel::Znosko07 => "Davis and Znosko (2007)",
            SingleMismatchModel::Znosko08 => "Davis and Znosko (2008)",
            SingleMismatchModel::Turner06 => "Lu et al. (2006)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        let hybridization = env.hybridization();
        let model = self.reference();
        match self {
            SingleMismatchModel::AllawiSantaLuciaPeyret => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
            }
            SingleMismatchModel::Watkins11 => {
                advise_hybridization(env, hybridization.is_hybrid(), model, "DNA/RNA duplexes");
            }
            SingleMismatchModel::Znosko07 | SingleMismatchModel::Turner06 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
            }
            SingleMismatchModel::Znosko08 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                let duplex = env.duplex();
                let (start, end) = widen(duplex, pos1, pos2);
                if terminal_gu_count(duplex, start, end) == 0 {
                    warn!(model, pos1, pos2, "Parameters are established for mismatches adjacent to a G·U pair");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    pub fn compute(
        &self,
        params: &Params,
        duplex: &Duplex,
        pos1: usize,
        pos2: usize,
    ) -> Result<Contribution, MeltingError> {
        let (start, end) = widen(duplex, pos1, pos2);
        let thermo = match self {
            SingleMismatchModel::AllawiSantaLuciaPeyret => mismatch_stacks(params, duplex.equivalent(Alphabet::Dna), start, end)?,
            SingleMismatchModel::Watkins11 => hybrid_stacks(params, duplex, start, end)?,
            SingleMismatchModel::Znosko07 | SingleMismatchModel::Znosko08 => {
                znosko(params, duplex.equivalent(Alphabet::Rna), start, end)?
            }
            SingleMismatchModel::Turner06 => turner(params, duplex.equivalent(Alphabet::Rna), start, end)?,
        };
        debug!(
            model = self.reference(),
            start,
            end,
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "Single mismatch"
        );
        Ok(Contribution::new(thermo))
    }
}

/// Sum of the mismatch stacks `start..end`.
pub(crate) fn mismatch_stacks(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let mut total = Thermodynamics::default();
    for pos in start..end {
        let (top, bottom) = view.nn_pair(pos)?;
        total += params.need(params.mismatch(top, bottom))?;
    }
    Ok(total)
}

fn hybrid_stacks(params: &Params, duplex: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let mut total = Thermodynamics::default();
    for pos in start..end {
        let (top, bottom) = duplex.nn_pair(pos)?;
        total += params.need(params.mismatch(&format!("d{top}"), &format!("r{bottom}")))?;
    }
    Ok(total)
}

fn znosko(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    // Both the mismatch parameter and the trinucleotide term are optional.
    let middle = start + 1;
    let mut total = params
        .mismatch_parameter(view.sequence(middle, middle)?, view.complementary(middle, middle)?)
        .unwrap_or_default();
    let top = to_purine_pyrimidine(view.sequence(start, end)?)?;
    let bottom = to_purine_pyrimidine(view.complementary(start, end)?)?;
    total += params.mismatch(&top, &bottom).unwrap_or_default();

    // The G·U closure is weighted by the A·U pair count.
    let au = terminal_au_count(view, start, end) as f64;
    if au > 0.0 {
        total += params.need(params.closure("A", "U"))? * au;
    }
    if terminal_gu_count(view, start, end) > 0 {
        total += params.need(params.closure("G", "U"))? * au;
    }
    Ok(total)
}

fn turner(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let mut total = params.need(params.loop_initiation("2"))?;
    total += closures(params, view, start, end)?;

    let middle = start + 1;
    if view.is_base_pair("G", "G", middle) {
        total += params.need(params.first_mismatch("G", "G", "1x1"))?;
    } else {
        let (top, bottom) = view.loop_first_mismatch(start)?;
        if top == "RU" && bottom == "YU" {
            total += params.need(params.first_mismatch("RU", "YU", "1x1"))?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::patterns::test_support::{close, environment, table};

    #[test]
    fn dna_mismatch_sums_both_flanking_stacks() {
        let table = table(&[("mismatchCA/GA", 170.0, -0.9), ("mismatchAT/AA", -400.0, -1.2)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCATC", "CGAAG").unwrap();
        let sum = SingleMismatchModel::AllawiSantaLuciaPeyret.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(sum.thermo, 170.0 - 400.0, -0.9 - 1.2));
    }

    #[test]
    fn hybrid_mismatch_keys_carry_strand_prefixes() {
        let table = table(&[("mismatchdCA/rGA", 100.0, 1.0), ("mismatchdAU/rAA", 200.0, 2.0)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAUC", "CGAAG").unwrap();
        let sum = SingleMismatchModel::Watkins11.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(sum.thermo, 300.0, 3.0));
    }

    #[test]
    fn znosko_terms_are_optional_but_closures_are_not() {
        let table = table(&[("closureper_A/U", 500.0, 1.5), ("mismatchRRY/YRR", -800.0, -2.0)]);
        let params = Params::new(&table, "test");
        // A·U and U·A close the mismatch.
        let duplex = Duplex::new("GAGUC", "CUGAG").unwrap();
        let sum = SingleMismatchModel::Znosko07.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(sum.thermo, 2.0 * 500.0 - 800.0, 2.0 * 1.5 - 2.0));

        let empty = crate::engine::patterns::test_support::table(&[]);
        let params = Params::new(&empty, "test");
        let error = SingleMismatchModel::Znosko07.compute(&params, &duplex, 2, 2).unwrap_err();
        assert!(matches!(error, MeltingError::MissingParameter { ref key, .. } if key == "closureper_A/U"));
    }

    #[test]
    fn znosko_gu_closure_follows_the_au_count() {
        let table = table(&[("closureper_A/U", 500.0, 1.5), ("closureper_G/U", 700.0, 2.0)]);
        let params = Params::new(&table, "test");
        // A·U on the left, G·U on the right.
        let mixed = Duplex::new("GAGGC", "CUGUG").unwrap();
        let sum = SingleMismatchModel::Znosko07.compute(&params, &mixed, 2, 2).unwrap();
        assert!(close(sum.thermo, 500.0 + 700.0, 1.5 + 2.0));
        // G·U on both sides and no A·U pair.
        let wobbles = Duplex::new("GGGGC", "CUGUG").unwrap();
        let sum = SingleMismatchModel::Znosko07.compute(&params, &wobbles, 2, 2).unwrap();
        assert!(close(sum.thermo, 0.0, 0.0));
    }

    #[test]
    fn znosko08_needs_an_adjacent_gu_pair() {
        let env = environment("GCAGC", "CGACG", Hybridization::RnaRna);
        assert!(!SingleMismatchModel::Znosko08.is_applicable(&env, 2, 2).unwrap());
        let env = environment("GGAGC", "CUAUG", Hybridization::RnaRna);
        assert!(SingleMismatchModel::Znosko08.is_applicable(&env, 2, 2).unwrap());
    }

    #[test]
    fn turner_adds_gg_bonus() {
        let table = table(&[
            ("mismatchinitiationsize2", 0.0, 1.0),
            ("mismatchfirst_non_canonical_pairloop1x1G/G", -1000.0, -2.0),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCGCC", "CGGGG").unwrap();
        let sum = SingleMismatchModel::Turner06.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(sum.thermo, -1000.0, -1.0));
    }
}
