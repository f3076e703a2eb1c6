use super::{Contribution, Params, advise_hybridization};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::debug;

/// Models for runs of G·U wobble pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WobbleModel {
    Turner99,
}

impl WobbleModel {
    pub fn reference(&self) -> &'static str {
        match self {
            WobbleModel::Turner99 => "Turner et al. (1999)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, _pos1: usize, _pos2: usize) -> Result<bool, MeltingError> {
        advise_hybridization(env, env.hybridization().is_rna(), self.reference(), "RNA duplexes");
        Ok(true)
    }

    pub fn compute(
        &self,
        params: &Params,
        duplex: &Duplex,
        pos1: usize,
        pos2: usize,
    ) -> Result<Contribution, MeltingError> {
        let (start, end) = widen_over_pairs(duplex, pos1, pos2);
        let view = duplex.equivalent(Alphabet::Rna);
        let mut total = Thermodynamics::default();

        let (top, bottom) = (view.sequence(start, end)?, view.complementary(start, end)?);
        // The G·C-closed motif is only read in a duplex of five pairs.
        if view.len() == 5 && top == "GGUC" && bottom == "CUGG" {
            total += params.need(params.closed_mismatch(top, bottom, "G/C"))?;
        } else {
            for pos in start..end {
                let (top, bottom) = view.nn_pair(pos)?;
                total += if top == "GU" && bottom == "UG" {
                    params.need(params.closed_mismatch(top, bottom, "not_G/C"))?
                } else {
                    params.need(params.mismatch(top, bottom))?
                };
            }
        }

        // Terminal penalties look at the pairs as written, so a DNA G·T end has none.
        if start == 0 && duplex.is_base_pair("G", "U", start) {
            total += params.need(params.terminal("per_G/U"))?;
        }
        if end + 1 == duplex.len() && duplex.is_base_pair("G", "U", end) {
            total += params.need(params.terminal("per_G/U"))?;
        }
        debug!(model = self.reference(), start, end, enthalpy = total.enthalpy, entropy = total.entropy, "Wobble pairs");
        Ok(Contribution::new(total))
    }
}

/// Extends the run by each neighbour that is a Watson-Crick pair.
fn widen_over_pairs(duplex: &Duplex, pos1: usize, pos2: usize) -> (usize, usize) {
    let paired = |pos: usize| duplex.pair(pos).is_some_and(|pair| pair.is_complementary());
    let start = if pos1 > 0 && paired(pos1 - 1) { pos1 - 1 } else { pos1 };
    let end = if paired(pos2 + 1) { pos2 + 1 } else { pos2 };
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::patterns::test_support::{close, table};

    #[test]
    fn internal_wobble_uses_both_flanking_stacks() {
        let table = table(&[("mismatchAG/UU", -500.0, -1.0), ("mismatchGC/UG", -1500.0, -4.0)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("CAGCA", "GUUGU").unwrap();
        let sum = WobbleModel::Turner99.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(sum.thermo, -2000.0, -5.0));
    }

    #[test]
    fn gu_stacks_are_keyed_by_their_closing() {
        let table = table(&[
            ("mismatchAG/UU", -500.0, -1.0),
            ("mismatchGU/UGclosenot_G/C", 300.0, 1.0),
            ("mismatchUC/GG", -1500.0, -4.0),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("CAGUCA", "GUUGGU").unwrap();
        let sum = WobbleModel::Turner99.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(sum.thermo, -1700.0, -4.0));
    }

    #[test]
    fn terminal_wobble_adds_its_penalty() {
        let table = table(&[("mismatchGC/UG", -1500.0, -4.0), ("terminalper_G/U", 400.0, 1.0)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAC", "UGUG").unwrap();
        let sum = WobbleModel::Turner99.compute(&params, &duplex, 0, 0).unwrap();
        assert!(close(sum.thermo, -1100.0, -3.0));
    }

    #[test]
    fn closed_motif_needs_a_five_pair_duplex() {
        let table = table(&[
            ("mismatchGGUC/CUGGcloseG/C", -4000.0, -10.0),
            ("mismatchGG/CU", -1000.0, -2.0),
            ("mismatchGU/UGclosenot_G/C", 300.0, 1.0),
            ("mismatchUC/GG", -1500.0, -4.0),
        ]);
        let params = Params::new(&table, "test");
        let five = Duplex::new("GGUCA", "CUGGU").unwrap();
        let sum = WobbleModel::Turner99.compute(&params, &five, 1, 2).unwrap();
        assert!(close(sum.thermo, -4000.0, -10.0));

        // The same motif inside a longer duplex is summed stack by stack.
        let six = Duplex::new("AGGUCA", "UCUGGU").unwrap();
        let sum = WobbleModel::Turner99.compute(&params, &six, 2, 3).unwrap();
        assert!(close(sum.thermo, -1000.0 + 300.0 - 1500.0, -2.0 + 1.0 - 4.0));
    }

    #[test]
    fn widening_stops_at_non_canonical_neighbours() {
        let duplex = Duplex::new("CAGAC", "GUUGG").unwrap();
        assert_eq!(widen_over_pairs(&duplex, 2, 2), (1, 2));
    }
}
