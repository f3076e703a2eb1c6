use super::{Contribution, Params, advise_hybridization, is_terminal, widen};
use crate::core::sequences::SequenceError;
use crate::core::sequences::duplex::{Duplex, StrandSense};
use crate::core::sequences::hybridization::Alphabet;
use crate::core::sequences::patterns::{DanglingSense, dangling_sense, to_purine_pyrimidine};
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

/// Models for unpaired nucleotides hanging from a duplex end.
///
/// Single models cover one unpaired base, the Serra double models a second
/// one stacked on the first, and the Sugimoto models poly-A tails of any
/// length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingModel {
    Bommarito00,
    Serra08,
    Serra05,
    Serra06,
    SugimotoDna02,
    SugimotoRna02,
}

impl DanglingModel {
    pub fn reference(&self) -> &'static str {
        match self {
            DanglingModel::Bommarito00 => "Bommarito et al. (2000)",
            DanglingModel::Serra08 => "Miller et al. (2008)",
            DanglingModel::Serra05 => "O'Toole et al. (2005)",
            DanglingModel::Serra06 => "O'Toole et al. (2006)",
            DanglingModel::SugimotoDna02 => "Ohmichi et al. (2002), DNA",
            DanglingModel::SugimotoRna02 => "Ohmichi et al. (2002), RNA",
        }
    }

    fn alphabet(&self) -> Alphabet {
        match self {
            DanglingModel::Bommarito00 | DanglingModel::SugimotoDna02 => Alphabet::Dna,
            _ => Alphabet::Rna,
        }
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        let duplex = env.duplex();
        let hybridization = env.hybridization();
        let model = self.reference();
        let (start, end) = widen(duplex, pos1, pos2);
        match self {
            DanglingModel::Bommarito00 => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
            }
            DanglingModel::Serra08 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
            }
            DanglingModel::Serra05 | DanglingModel::Serra06 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                let sense = dangling_sense(duplex.sequence(start, end)?, duplex.complementary(start, end)?)?;
                if sense == Some(DanglingSense::FivePrime) {
                    warn!(model, pos1, pos2, "Parameters are established for 3' double dangling ends");
                    return Ok(false);
                }
            }
            DanglingModel::SugimotoDna02 | DanglingModel::SugimotoRna02 => {
                let expected = if *self == DanglingModel::SugimotoDna02 {
                    hybridization.is_dna()
                } else {
                    hybridization.is_rna()
                };
                advise_hybridization(env, expected, model, "self-complementary duplexes of the same acid");
                if !env.is_self_complementary() {
                    warn!(model, "Long dangling end parameters are established for self-complementary duplexes");
                }
                if (pos1..=pos2).any(|pos| !duplex.is_base_pair("A", "-", pos)) {
                    warn!(model, pos1, pos2, "Long dangling end parameters cover poly-A tails only");
                    return Ok(false);
                }
            }
        }
        if !is_terminal(duplex, start, end) {
            warn!(model, pos1, pos2, "Dangling ends must sit at a duplex end");
            return Ok(false);
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
        let view = duplex.equivalent(self.alphabet());
        let thermo = match self {
            DanglingModel::Bommarito00
            | DanglingModel::Serra08
            | DanglingModel::SugimotoDna02
            | DanglingModel::SugimotoRna02 => whole_range(params, view, start, end)?,
            DanglingModel::Serra05 | DanglingModel::Serra06 => {
                let mut total = inner_single(params, view, start, end)?;
                total += if *self == DanglingModel::Serra05 {
                    serra05_second(params, view, start, end)?
                } else {
                    serra06_second(params, view, start, end)?
                };
                total
            }
        };
        debug!(
            model = self.reference(),
            start,
            end,
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "Dangling end"
        );
        Ok(Contribution::new(thermo))
    }
}

fn whole_range(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let top = view.sequence(start, end)?;
    let bottom = view.complementary(start, end)?;
    params.need(params.dangling(top, bottom, dangling_sense(top, bottom)?))
}

/// The strand of `start..=end` carrying the unpaired bases.
fn gap_strand(view: &Duplex, start: usize, end: usize) -> Result<&str, MeltingError> {
    view.strand_containing("-", start, end)?.ok_or_else(|| {
        MeltingError::Sequence(SequenceError::Structure(format!(
            "no unpaired base between positions {} and {}",
            start, end
        )))
    })
}

/// The first unpaired base stacked on the closing pair.
fn inner_single(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let (first, last) = if gap_strand(view, start, end)?.starts_with('-') {
        (start + 1, end)
    } else {
        (start, end - 1)
    };
    whole_range(params, view, first, last)
}

/// Second dangling base, keyed by whether the first one is a pyrimidine.
fn serra05_second(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let gaps = gap_strand(view, start, end)?;
    let opposite = to_purine_pyrimidine(view.opposite_of(gaps, start, end)?)?;
    let on_top = view.sense_of(gaps, start, end)? == StrandSense::FiveToThree;

    let partner = if opposite.as_bytes().get(1) == Some(&b'Y') {
        "Y".to_string()
    } else if gaps.starts_with('-') {
        opposite.chars().take(2).collect()
    } else {
        opposite.chars().skip(1).collect()
    };
    let lookup = if on_top {
        params.dangling("", &partner, dangling_sense(gaps, &partner)?)
    } else {
        params.dangling(&partner, "", dangling_sense(&partner, gaps)?)
    };
    params.need(lookup)
}

/// Both dangling bases and the closing pair, as purine/pyrimidine classes.
fn serra06_second(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let gaps = gap_strand(view, start, end)?;
    let on_top = view.sense_of(gaps, start, end)? == StrandSense::FiveToThree;
    let classes = to_purine_pyrimidine(gaps)?;
    let mut opposite = to_purine_pyrimidine(view.opposite_of(gaps, start, end)?)?;

    let pyrimidine_at = |text: &str, index: usize| text.as_bytes().get(index) == Some(&b'Y');
    if classes.starts_with('-') {
        if pyrimidine_at(&opposite, 1) || pyrimidine_at(&opposite, 2) {
            opposite = opposite.chars().skip(1).take(2).collect();
        }
    } else if pyrimidine_at(&opposite, 1) || pyrimidine_at(&opposite, 0) {
        opposite = opposite.chars().take(2).collect();
    }

    let (top, bottom) = if on_top {
        (classes.as_str(), opposite.as_str())
    } else {
        (opposite.as_str(), classes.as_str())
    };
    params.need(params.dangling(top, bottom, dangling_sense(top, bottom)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::patterns::test_support::{close, environment, table};

    #[test]
    fn single_dangling_end_is_keyed_by_its_side() {
        let table = table(&[("danglingCA/Gsens3", -500.0, -1.1)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCA", "CG-").unwrap();
        let value = DanglingModel::Bommarito00.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, -500.0, -1.1));
    }

    #[test]
    fn mirrored_dangling_key_is_accepted() {
        let table = table(&[("danglingG/ACsens3", -300.0, -0.5)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCA", "CG-").unwrap();
        let value = DanglingModel::Bommarito00.compute(&params, &duplex, 2, 2).unwrap();
        assert!(close(value.thermo, -300.0, -0.5));
    }

    #[test]
    fn serra05_adds_the_second_base_on_top_of_the_first() {
        let table = table(&[("danglingCA/Gsens3", -1000.0, -2.0), ("danglingRR/sens3", -200.0, -0.4)]);
        let params = Params::new(&table, "test");
        // Two unpaired A on the 3' end of the sequence strand.
        let duplex = Duplex::new("GCAA", "CG--").unwrap();
        let value = DanglingModel::Serra05.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(value.thermo, -1200.0, -2.4));
    }

    #[test]
    fn serra06_keys_the_whole_tail_by_class() {
        let table = table(&[("danglingCA/Gsens3", -1000.0, -2.0), ("danglingYR/Rsens3", -300.0, -0.8)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAA", "CG--").unwrap();
        let value = DanglingModel::Serra06.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(value.thermo, -1300.0, -2.8));
    }

    #[test]
    fn double_dangling_models_refuse_five_prime_tails() {
        let env = environment("AAGCGC", "--CGCG", Hybridization::RnaRna);
        assert!(!DanglingModel::Serra05.is_applicable(&env, 0, 1).unwrap());
    }

    #[test]
    fn long_dangling_requires_poly_a() {
        let env = environment("GCGCAAA", "CGCG---", Hybridization::RnaRna);
        assert!(DanglingModel::SugimotoRna02.is_applicable(&env, 4, 6).unwrap());
        let env = environment("GCGCACA", "CGCG---", Hybridization::RnaRna);
        assert!(!DanglingModel::SugimotoRna02.is_applicable(&env, 4, 6).unwrap());
    }
}
