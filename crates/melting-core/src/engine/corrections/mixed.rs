use super::Adjustment;
use super::magnesium::{self, MagnesiumCorrection, OwczarzyCoefficients};
use super::sodium;
use super::sodium_equivalent::Cations;
use crate::engine::environment::Environment;
use tracing::warn;

/// Corrections for solutions where neither sodium nor magnesium dominates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixedCorrection {
    Owczarzy08,
    Tan07,
}

impl MixedCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            MixedCorrection::Owczarzy08 => "Owczarzy et al. (2008), mixed Na/Mg",
            MixedCorrection::Tan07 => "Tan and Chen (2007), mixed Na/Mg",
        }
    }

    pub fn is_applicable(&self, env: &Environment, cations: &Cations) -> bool {
        match self {
            MixedCorrection::Owczarzy08 => {
                cations.monovalent > 0.0
                    && MagnesiumCorrection::Owczarzy08.is_applicable(env, cations)
            }
            MixedCorrection::Tan07 => {
                if env.solution().mg <= 0.0 || cations.free_magnesium <= 0.0 || cations.na <= 0.0 {
                    return false;
                }
                let hybridization = env.hybridization();
                if !hybridization.is_dna() && !hybridization.is_rna() {
                    warn!(
                        model = self.reference(),
                        hybridization = hybridization.as_str(),
                        "Correction established for DNA and RNA duplexes; per-stack terms are dropped"
                    );
                }
                true
            }
        }
    }

    pub fn adjustment(&self, env: &Environment, cations: &Cations) -> Adjustment {
        match self {
            MixedCorrection::Owczarzy08 => {
                let ln_m = cations.monovalent.ln();
                let square = ln_m * ln_m;
                let coefficients = OwczarzyCoefficients {
                    a: 3.92e-5 * (0.843 - 0.352 * cations.monovalent.sqrt() * ln_m),
                    d: 1.42e-5 * (1.279 - 4.03e-3 * ln_m - 8.03e-3 * square),
                    g: 8.31e-5 * (0.486 - 0.258 * ln_m + 5.25e-3 * square * ln_m),
                    ..OwczarzyCoefficients::default()
                };
                coefficients.adjustment(env, cations.free_magnesium)
            }
            MixedCorrection::Tan07 => Adjustment::Entropy(tan07_mixed_entropy(env, cations)),
        }
    }
}

/// `−3.22·((N − 1)·(x1·g1 + x2·g2) + g12)` with the sodium fraction `x1`.
fn tan07_mixed_entropy(env: &Environment, cations: &Cations) -> f64 {
    let na = cations.na;
    let mg = cations.free_magnesium;
    let length = env.duplex().len();
    let n = length as f64;

    let x1 = na / (na + (8.1 - 32.4 / n) * (5.2 - na.ln()) * mg);
    let x2 = 1.0 - x1;
    let g12 = -0.6 * x1 * x2 * na.ln() * ((1.0 / x1 - 1.0) * na).ln() / n;

    let hybridization = env.hybridization();
    let (g1, g2) = if hybridization.is_rna() {
        (
            sodium::tan07_stack_energy(na, length),
            magnesium::tan07_stack_energy(mg, length),
        )
    } else if hybridization.is_dna() {
        (
            sodium::tan06_stack_energy(na, length),
            magnesium::tan06_stack_energy(mg, length),
        )
    } else {
        (0.0, 0.0)
    };

    -3.22 * ((n - 1.0) * (x1 * g1 + x2 * g2) + g12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::config::MeltingOptionsBuilder;
    use crate::engine::corrections::sodium_equivalent::SodiumEquivalentModel;

    fn environment(solution: &str, hybridization: Hybridization) -> Environment {
        let sequence = if hybridization.is_rna() { "GACCUUAGCA" } else { "GACCTTAGCA" };
        let options = MeltingOptionsBuilder::new()
            .sequence(sequence)
            .hybridization(hybridization)
            .solution(solution)
            .strand_concentration(0.0001)
            .build()
            .unwrap();
        let mut env = Environment::new(&options).unwrap();
        env.result.enthalpy = -75000.0;
        env.result.entropy = -200.0;
        env.result.tm = 60.0;
        env
    }

    #[test]
    fn tan_mixed_combines_both_cation_terms() {
        let env = environment("Na=0.1:Mg=0.01", Hybridization::RnaRna);
        let cations = Cations::new(env.solution(), SodiumEquivalentModel::Ahsen01);
        assert!(MixedCorrection::Tan07.is_applicable(&env, &cations));

        let (na, mg, n) = (0.1f64, 0.01f64, 10.0f64);
        let x1 = na / (na + (8.1 - 32.4 / n) * (5.2 - na.ln()) * mg);
        let x2 = 1.0 - x1;
        let g12 = -0.6 * x1 * x2 * na.ln() * ((1.0 / x1 - 1.0) * na).ln() / n;
        let g1 = sodium::tan07_stack_energy(na, 10);
        let g2 = magnesium::tan07_stack_energy(mg, 10);
        let expected = -3.22 * (9.0 * (x1 * g1 + x2 * g2) + g12);

        let Adjustment::Entropy(delta) = MixedCorrection::Tan07.adjustment(&env, &cations) else {
            panic!("Tan shifts the entropy");
        };
        assert!((delta - expected).abs() < 1e-9);
    }

    #[test]
    fn owczarzy_mixed_needs_both_cations() {
        let env = environment("Mg=0.01", Hybridization::DnaDna);
        let cations = Cations::new(env.solution(), SodiumEquivalentModel::Ahsen01);
        assert!(!MixedCorrection::Owczarzy08.is_applicable(&env, &cations));

        let env = environment("Na=0.05:Mg=0.01", Hybridization::DnaDna);
        let cations = Cations::new(env.solution(), SodiumEquivalentModel::Ahsen01);
        assert!(MixedCorrection::Owczarzy08.is_applicable(&env, &cations));
        assert!(matches!(
            MixedCorrection::Owczarzy08.adjustment(&env, &cations),
            Adjustment::Temperature(_)
        ));
    }
}
