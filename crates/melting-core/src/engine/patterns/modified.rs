//! Models for duplexes carrying a registered modified nucleotide.

use super::{Contribution, Params, advise_hybridization, is_terminal, widen};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::sequences::patterns::dangling_sense;
use crate::core::sequences::token::ModifiedAcid;
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedModel {
    SantaLucia05Inosine,
    /// I·U pairs in RNA, with a terminal I·U penalty.
    Znosko07Inosine,
    /// 8-hydroxyadenine in `TA*A` or `GA*C` contexts.
    Sugimoto01Hydroxyadenine,
    Asanuma05Azobenzene,
    McTigue04LockedAcid,
}

impl ModifiedModel {
    pub fn reference(&self) -> &'static str {
        match self {
            ModifiedModel::SantaLucia05Inosine => "Watkins and SantaLucia (2005)",
            ModifiedModel::Znosko07Inosine => "Wright et al. (2007)",
            ModifiedModel::Sugimoto01Hydroxyadenine => "Kawakami et al. (2001)",
            ModifiedModel::Asanuma05Azobenzene => "Asanuma et al. (2005)",
            ModifiedModel::McTigue04LockedAcid => "McTigue et al. (2004)",
        }
    }

    /// The acid family the model is fitted on.
    pub fn acid(&self) -> ModifiedAcid {
        match self {
            ModifiedModel::SantaLucia05Inosine | ModifiedModel::Znosko07Inosine => ModifiedAcid::Inosine,
            ModifiedModel::Sugimoto01Hydroxyadenine => ModifiedAcid::Hydroxyadenine,
            ModifiedModel::Asanuma05Azobenzene => ModifiedAcid::Azobenzene,
            ModifiedModel::McTigue04LockedAcid => ModifiedAcid::LockedNucleicAcid,
        }
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        let duplex = env.duplex();
        let hybridization = env.hybridization();
        let model = self.reference();
        let (start, end) = widen(duplex, pos1, pos2);
        match self {
            ModifiedModel::Znosko07Inosine => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                let stray = duplex
                    .pairs()
                    .iter()
                    .any(|pair| pair.contains_token("I") && !pair.is_equal_to("I", "U") && !pair.is_equal_to("I", "T"));
                if stray {
                    warn!(model, "Parameters are established for I·U pairs only");
                    return Ok(false);
                }
            }
            ModifiedModel::SantaLucia05Inosine => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
            }
            ModifiedModel::Asanuma05Azobenzene => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
                let edge = [start, end]
                    .into_iter()
                    .any(|pos| duplex.modified_acid_at(pos) == Some(ModifiedAcid::Azobenzene));
                if edge {
                    warn!(model, pos1, pos2, "Parameters are not established for terminal azobenzenes");
                    return Ok(false);
                }
            }
            ModifiedModel::McTigue04LockedAcid => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
                let locked_edge = [start, end]
                    .into_iter()
                    .any(|pos| duplex.modified_acid_at(pos) == Some(ModifiedAcid::LockedNucleicAcid));
                if is_terminal(duplex, start, end) && locked_edge {
                    warn!(model, pos1, pos2, "Parameters are not established for terminal locked nucleic acids");
                    return Ok(false);
                }
            }
            ModifiedModel::Sugimoto01Hydroxyadenine => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
                if !is_terminal(duplex, start, end) && !is_hydroxyadenine_context(duplex, start, end) {
                    warn!(model, pos1, pos2, "Parameters are established for TA*A/ANT and GA*C/CNG contexts");
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
            ModifiedModel::SantaLucia05Inosine => modified_stacks(params, duplex.equivalent(Alphabet::Dna), start, end)?,
            ModifiedModel::Znosko07Inosine => {
                let view = duplex.equivalent(Alphabet::Rna);
                let mut total = modified_stacks(params, view, start, end)?;
                let terminal_iu = view.terminal_count("I", "U", start, end) + view.terminal_count("I", "T", start, end);
                if is_terminal(view, start, end) && terminal_iu > 0 {
                    total += params.need(params.terminal("per_I/U"))? * terminal_iu as f64;
                }
                total
            }
            ModifiedModel::Asanuma05Azobenzene => {
                let view = duplex.equivalent(Alphabet::Dna);
                params.need(params.azobenzene(view.sequence(start, end)?, view.complementary(start, end)?))?
            }
            ModifiedModel::McTigue04LockedAcid => {
                let view = duplex.equivalent(Alphabet::Dna);
                let mut total = Thermodynamics::default();
                for pos in start..end {
                    let (top, bottom) = view.nn_pair_unlocked(pos)?;
                    total += params.need(params.neighbor(&top, &bottom))?;
                    let (top, bottom) = view.nn_pair(pos)?;
                    total += params.need(params.locked_acid(top, bottom))?;
                }
                total
            }
            ModifiedModel::Sugimoto01Hydroxyadenine => {
                let view = duplex.equivalent(Alphabet::Dna);
                let mut total = Thermodynamics::default();
                for pos in start..end {
                    let (top, bottom) = view.nn_pair_without_hydroxyadenine(pos)?;
                    total += params.need(params.neighbor(&top, &bottom))?;
                }
                let top = view.sequence(start, end)?;
                let bottom = view.complementary(start, end)?;
                total += params.need(params.hydroxyadenine(top, bottom, dangling_sense(top, bottom)?))?;
                total
            }
        };
        debug!(
            model = self.reference(),
            acid = %self.acid(),
            start,
            end,
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "Modified nucleotide"
        );
        Ok(Contribution::new(thermo))
    }
}

fn modified_stacks(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let mut total = Thermodynamics::default();
    for pos in start..end {
        let (top, bottom) = view.nn_pair(pos)?;
        total += params.need(params.modified(top, bottom))?;
    }
    Ok(total)
}

/// `T A* A` over `A N T`, or `G A* C` over `C N G`.
///
/// The triplet is read on the strand holding `A*`. The flanking bases are then
/// checked on the top strand and only the left pair must be Watson-Crick.
fn is_hydroxyadenine_context(duplex: &Duplex, start: usize, end: usize) -> bool {
    if end != start + 2 {
        return false;
    }
    let (Some(left), Some(middle), Some(right)) = (duplex.pair(start), duplex.pair(start + 1), duplex.pair(end)) else {
        return false;
    };
    let (own, other) = if middle.top() == "A*" {
        ((left.top(), right.top()), (left.bottom(), right.bottom()))
    } else if middle.bottom() == "A*" {
        ((left.bottom(), right.bottom()), (left.top(), right.top()))
    } else {
        return false;
    };
    let triplet = matches!((own, other), (("T", "A"), ("A", "T")) | (("G", "C"), ("C", "G")));
    let top_flanks = matches!(left.top(), "T" | "G") && matches!(right.top(), "A" | "C");
    triplet && top_flanks && left.is_complementary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::patterns::test_support::{close, environment, table};

    #[test]
    fn locked_acid_adds_increments_to_unlocked_stacks() {
        let table = table(&[
            ("neighborCA/GT", -8500.0, -22.7),
            ("neighborAG/TC", -7800.0, -21.0),
            ("modifiedCAL/GT", -200.0, -0.5),
            ("modifiedALG/TC", -300.0, -0.7),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCALGC", "CGTCG").unwrap();
        let value = ModifiedModel::McTigue04LockedAcid.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, -16800.0, -44.9));
    }

    #[test]
    fn terminal_locked_acid_is_refused() {
        let env = environment("ALCGT", "TGCA", Hybridization::DnaDna);
        assert!(!ModifiedModel::McTigue04LockedAcid.is_applicable(&env, 0, 0).unwrap());
    }

    #[test]
    fn hydroxyadenine_context_is_checked_on_its_strand() {
        let env = environment("CTA*AG", "GATTC", Hybridization::DnaDna);
        assert!(ModifiedModel::Sugimoto01Hydroxyadenine.is_applicable(&env, 2, 2).unwrap());
        let env = environment("CCA*AG", "GGTTC", Hybridization::DnaDna);
        assert!(!ModifiedModel::Sugimoto01Hydroxyadenine.is_applicable(&env, 2, 2).unwrap());
    }

    #[test]
    fn hydroxyadenine_flanks_are_read_on_the_top_strand() {
        let top = Duplex::new("CTA*AG", "GATTC").unwrap();
        assert!(is_hydroxyadenine_context(&top, 1, 3));
        // TA*A sits on the bottom strand, so the top flanks are A and T.
        let bottom = Duplex::new("CAGTG", "GTA*AC").unwrap();
        assert!(!is_hydroxyadenine_context(&bottom, 1, 3));
    }

    #[test]
    fn hydroxyadenine_sums_replaced_stacks_and_its_increment() {
        let table = table(&[
            ("neighborTA/AT", -7200.0, -20.4),
            ("neighborAA/TT", -7900.0, -22.2),
            ("modifiedTA*A/ATT", 1000.0, 3.0),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("CTA*AG", "GATTC").unwrap();
        let value = ModifiedModel::Sugimoto01Hydroxyadenine.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, -14100.0, -39.6));
    }

    #[test]
    fn znosko_inosine_counts_terminal_iu_pairs() {
        let table = table(&[("modifiedIC/UG", -1000.0, -3.0), ("terminalper_I/U", 500.0, 1.0)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("ICGA", "UGCU").unwrap();
        let value = ModifiedModel::Znosko07Inosine.compute(&params, &duplex, 0, 0).unwrap();
        assert!(close(value.thermo, -500.0, -2.0));
    }

    #[test]
    fn znosko_inosine_refuses_other_partners() {
        let env = environment("GICGA", "CCGCU", Hybridization::RnaRna);
        assert!(!ModifiedModel::Znosko07Inosine.is_applicable(&env, 1, 1).unwrap());
    }

    #[test]
    fn azobenzene_lookup_uses_the_isomer() {
        let table = table(&[("modifiedtransAXC/TG", -1200.0, -2.5), ("modifiedcysAXC/TG", 2100.0, 5.9)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GAX_TCG", "CTGC").unwrap();
        let value = ModifiedModel::Asanuma05Azobenzene.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, -1200.0, -2.5));
        let duplex = Duplex::new("GAX_CCG", "CTGC").unwrap();
        let value = ModifiedModel::Asanuma05Azobenzene.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, 2100.0, 5.9));
    }
}
