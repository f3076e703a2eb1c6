use crate::core::sequences::hybridization::Hybridization;
use crate::engine::environment::SolutionComposition;
use tracing::{debug, warn};

/// Published conversions of a mixed cation solution into one sodium concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SodiumEquivalentModel {
    Ahsen01,
    Peyret00,
    Mitsuhashi96,
}

impl SodiumEquivalentModel {
    pub fn reference(&self) -> &'static str {
        match self {
            SodiumEquivalentModel::Ahsen01 => "von Ahsen et al. (2001)",
            SodiumEquivalentModel::Peyret00 => "Peyret (2000)",
            SodiumEquivalentModel::Mitsuhashi96 => "Mitsuhashi (1996)",
        }
    }

    /// Weight of the free magnesium term.
    pub fn magnesium_coefficient(&self) -> f64 {
        match self {
            SodiumEquivalentModel::Ahsen01 => 3.79,
            SodiumEquivalentModel::Peyret00 => 3.3,
            SodiumEquivalentModel::Mitsuhashi96 => 4.0,
        }
    }

    pub fn advise(&self, hybridization: Hybridization) {
        if !hybridization.is_dna() {
            warn!(
                model = self.reference(),
                hybridization = hybridization.as_str(),
                "Sodium equivalence is established for DNA duplexes"
            );
        }
    }

    /// `Na + K + Tris/2 + b·√(Mg − dNTP)`; magnesium chelated away entirely contributes 0.
    pub fn compute(&self, solution: &SolutionComposition) -> f64 {
        let free_magnesium = solution.free_magnesium().max(0.0);
        let na_eq = solution.monovalent() + self.magnesium_coefficient() * free_magnesium.sqrt();
        debug!(model = self.reference(), na_eq, "Sodium equivalent computed");
        na_eq
    }
}

/// Cation concentrations the ionic corrections read, fixed before any correction runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cations {
    pub na: f64,
    /// `Na + K + Tris/2`.
    pub monovalent: f64,
    pub na_eq: f64,
    /// `Mg − dNTP`.
    pub free_magnesium: f64,
}

impl Cations {
    pub fn new(solution: &SolutionComposition, model: SodiumEquivalentModel) -> Self {
        let monovalent = solution.monovalent();
        let na_eq = if solution.has_other_cations() {
            model.compute(solution)
        } else {
            monovalent
        };
        Self {
            na: solution.na,
            monovalent,
            na_eq,
            free_magnesium: solution.free_magnesium(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(text: &str) -> SolutionComposition {
        text.parse().unwrap()
    }

    #[test]
    fn coefficients_follow_each_publication() {
        let mixed = solution("Na=0.05:Mg=0.0041:dNTP=0.0001");
        let free = (0.0041f64 - 0.0001).sqrt();
        assert!((SodiumEquivalentModel::Ahsen01.compute(&mixed) - (0.05 + 3.79 * free)).abs() < 1e-12);
        assert!((SodiumEquivalentModel::Peyret00.compute(&mixed) - (0.05 + 3.3 * free)).abs() < 1e-12);
        assert!((SodiumEquivalentModel::Mitsuhashi96.compute(&mixed) - (0.05 + 4.0 * free)).abs() < 1e-12);
    }

    #[test]
    fn chelated_magnesium_adds_nothing() {
        let chelated = solution("Na=0.1:Mg=0.001:dNTP=0.002:Tris=0.02");
        assert!((SodiumEquivalentModel::Ahsen01.compute(&chelated) - 0.11).abs() < 1e-12);
    }

    #[test]
    fn sodium_only_solution_keeps_its_concentration() {
        let cations = Cations::new(&solution("Na=0.2"), SodiumEquivalentModel::Ahsen01);
        assert_eq!(cations.na_eq, 0.2);
        assert_eq!(cations.monovalent, 0.2);
        assert_eq!(cations.free_magnesium, 0.0);
    }
}
