use super::mismatch::mismatch_stacks;
use super::{Contribution, Params, advise_hybridization, widen};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::sequences::patterns::{reversed, symmetric_tandem};
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::debug;

/// Models for two adjacent mismatched pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TandemMismatchModel {
    AllawiSantaLuciaPeyret,
    Turner06,
}

impl TandemMismatchModel {
    pub fn reference(&self) -> &'static str {
        match self {
            TandemMismatchModel::AllawiSantaLuciaPeyret => "Allawi, SantaLucia and Peyret (1997, 1998, 1999)",
            TandemMismatchModel::Turner06 => "Lu et al. (2006)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, _pos1: usize, _pos2: usize) -> Result<bool, MeltingError> {
        let hybridization = env.hybridization();
        match self {
            TandemMismatchModel::AllawiSantaLuciaPeyret => {
                advise_hybridization(env, hybridization.is_dna(), self.reference(), "DNA duplexes")
            }
            TandemMismatchModel::Turner06 => {
                advise_hybridization(env, hybridization.is_rna(), self.reference(), "RNA duplexes")
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
            TandemMismatchModel::AllawiSantaLuciaPeyret => {
                mismatch_stacks(params, duplex.equivalent(Alphabet::Dna), start, end)?
            }
            TandemMismatchModel::Turner06 => turner(params, duplex.equivalent(Alphabet::Rna), start, end)?,
        };
        debug!(
            model = self.reference(),
            start,
            end,
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "Tandem mismatch"
        );
        Ok(Contribution::new(thermo))
    }
}

fn turner(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    if view.is_symmetric(start, end) {
        return symmetric(params, view, start, end);
    }

    // An asymmetric tandem is the mean of the two symmetric tandems built from its halves.
    let top = view.sequence(start, end)?;
    let bottom = view.complementary(start, end)?;
    let first = symmetric_tandem(top, bottom)?;
    let second = symmetric_tandem(&reversed(bottom), &reversed(top))?;
    let mut total = (symmetric(params, &first, 0, first.len() - 1)?
        + symmetric(params, &second, 0, second.len() - 1)?)
        * 0.5;

    let inner = start + 1;
    if view.is_tandem_mismatch_gg_penalty_necessary(inner) {
        total += params.need(params.penalty("G/G_adjacent_AA_or_nonCanonicalPyrimidine"))?;
    } else if view.is_tandem_mismatch_delta_p_penalty_necessary(inner) {
        total += params.need(params.penalty("AG_GA_UU_adjacent_UU_CU_CC_AA"))?;
    }
    Ok(total)
}

/// The tabulated value of a symmetric tandem, keyed by its closing pair.
fn symmetric(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let top = view.sequence(start, end)?;
    let bottom = view.complementary(start, end)?;
    let closing = format!("{}/{}", &top[..1], &bottom[..1]);
    params.need(params.closed_mismatch(
        view.sequence(start + 1, end - 1)?,
        view.complementary(start + 1, end - 1)?,
        &closing,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::patterns::test_support::{close, table};

    #[test]
    fn dna_tandem_sums_three_stacks() {
        let table = table(&[
            ("mismatchCA/GG", 100.0, 1.0),
            ("mismatchAG/GA", 200.0, 2.0),
            ("mismatchGT/AA", 300.0, 3.0),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAGTC", "CGGAAG").unwrap();
        let sum = TandemMismatchModel::AllawiSantaLuciaPeyret.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(sum.thermo, 600.0, 6.0));
    }

    #[test]
    fn symmetric_rna_tandem_is_looked_up_with_its_closing_pair() {
        let table = table(&[("mismatchGA/AGcloseC/G", -1500.0, -4.0)]);
        let params = Params::new(&table, "test");
        // CGAG/GAGC reads the same on both strands.
        let duplex = Duplex::new("ACGAGU", "UGAGCA").unwrap();
        let sum = TandemMismatchModel::Turner06.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(sum.thermo, -1500.0, -4.0));
    }

    #[test]
    fn asymmetric_rna_tandem_averages_two_symmetric_tandems() {
        let table = table(&[
            ("mismatchGA/AGcloseC/G", -1000.0, -2.0),
            ("mismatchCA/ACcloseC/G", -3000.0, -6.0),
        ]);
        let params = Params::new(&table, "test");
        // CGAG/GACC rebuilds as CGAG/GAGC and CCAG/GACC.
        let duplex = Duplex::new("ACGAGU", "UGACCA").unwrap();
        let sum = TandemMismatchModel::Turner06.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(sum.thermo, -2000.0, -4.0));
    }
}
