use super::config::{GlobalMode, MethodCategory};
use super::corrections::sodium_equivalent_model;
use super::environment::Environment;
use super::error::MeltingError;
use super::registry::{MethodKind, Registry};
use crate::core::thermo::result::ComputationMode;
use tracing::{info, instrument, warn};

/// Closed-form melting temperature from GC content, length and sodium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproximativeFormula {
    Ahsen01,
    MarmurChester93,
    MarmurChester93Corrected,
    MarmurSchildkrautDoty,
    Owen69,
    SantaLucia98,
    WetmurDna91,
    WetmurRna91,
    WetmurDnaRna91,
}

impl ApproximativeFormula {
    pub fn reference(&self) -> &'static str {
        match self {
            ApproximativeFormula::Ahsen01 => "von Ahsen et al. (2001)",
            ApproximativeFormula::MarmurChester93 => "Marmur (1962), Chester et al. (1993)",
            ApproximativeFormula::MarmurChester93Corrected => {
                "von Ahsen et al. (2001), Marmur (1962), Chester et al. (1993)"
            }
            ApproximativeFormula::MarmurSchildkrautDoty => "Marmur, Schildkraut and Doty (1965 - 1993)",
            ApproximativeFormula::Owen69 => "Owen et al. (1969)",
            ApproximativeFormula::SantaLucia98 => "SantaLucia (1998)",
            ApproximativeFormula::WetmurDna91 => "Wetmur (1991), DNA duplexes",
            ApproximativeFormula::WetmurRna91 => "Wetmur (1991), RNA duplexes",
            ApproximativeFormula::WetmurDnaRna91 => "Wetmur (1991), DNA/RNA duplexes",
        }
    }

    fn is_wetmur(&self) -> bool {
        matches!(
            self,
            ApproximativeFormula::WetmurDna91
                | ApproximativeFormula::WetmurRna91
                | ApproximativeFormula::WetmurDnaRna91
        )
    }

    /// The Marmur-Chester formulas are fitted at a fixed buffer and ignore the cations.
    pub fn uses_sodium_equivalent(&self) -> bool {
        !matches!(
            self,
            ApproximativeFormula::MarmurChester93 | ApproximativeFormula::MarmurChester93Corrected
        )
    }

    /// A duplex exactly as long as the threshold is accepted in the default mode.
    pub fn is_applicable(&self, env: &Environment) -> bool {
        let model = self.reference();
        let duplex = env.duplex();
        let mut applicable = true;

        let mismatching = duplex.percent_mismatching();
        if mismatching != 0.0 {
            if self.is_wetmur() {
                warn!(model, mismatching, "Approximative formulas handle mismatches only coarsely");
            } else {
                applicable = false;
            }
        }
        if duplex.len() < env.threshold() {
            warn!(
                model,
                length = duplex.len(),
                threshold = env.threshold(),
                "Approximative formulas are established for duplexes at least as long as the threshold"
            );
            if env.mode() == GlobalMode::Default {
                applicable = false;
            }
        }

        let hybridization = env.hybridization();
        let validated = match self {
            ApproximativeFormula::WetmurRna91 => hybridization.is_rna(),
            ApproximativeFormula::WetmurDnaRna91 => hybridization.is_hybrid(),
            _ => hybridization.is_dna(),
        };
        if !validated {
            warn!(model, hybridization = hybridization.as_str(), "Formula used outside its hybridization type");
        }

        if matches!(
            self,
            ApproximativeFormula::MarmurChester93 | ApproximativeFormula::MarmurChester93Corrected
        ) {
            let solution = env.solution();
            if solution.na != 0.0 || solution.mg != 0.0015 || solution.tris != 0.01 || solution.k != 0.05 {
                warn!(model, "Formula established at Na = 0, Mg = 1.5 mM, Tris = 10 mM and K = 50 mM");
            }
        }
        applicable
    }

    /// Melting temperature in °C for a sodium concentration `na`.
    pub fn temperature(&self, env: &Environment, na: f64) -> f64 {
        let duplex = env.duplex();
        let gc = duplex.percent_gc();
        let mismatching = duplex.percent_mismatching();
        let length = duplex.len() as f64;
        let wetmur_salt = 16.6 * (na / (1.0 + 0.7 * na)).log10();

        match self {
            ApproximativeFormula::Ahsen01 => {
                80.4 + 0.345 * gc + na.log10() * (17.0 - 0.135 * gc) - 550.0 / length
            }
            ApproximativeFormula::MarmurChester93 => 69.3 + 0.41 * gc - 650.0 / length,
            ApproximativeFormula::MarmurChester93Corrected => 69.3 + 0.41 * gc - 535.0 / length,
            ApproximativeFormula::MarmurSchildkrautDoty => {
                81.5 + 16.6 * na.log10() + 0.41 * gc - 675.0 / length
            }
            ApproximativeFormula::Owen69 => 87.16 + 0.345 * gc + na.log10() * (20.17 - 0.066 * gc),
            ApproximativeFormula::SantaLucia98 => 77.1 + 11.7 * na.log10() + 0.41 * gc - 528.0 / length,
            ApproximativeFormula::WetmurDna91 => {
                81.5 + wetmur_salt + 0.41 * gc - 500.0 / length - mismatching
            }
            ApproximativeFormula::WetmurRna91 => 78.0 + wetmur_salt + 0.7 * gc - 500.0 / length - mismatching,
            ApproximativeFormula::WetmurDnaRna91 => {
                67.0 + wetmur_salt + 0.8 * gc - 500.0 / length - mismatching
            }
        }
    }
}

/// Runs the selected approximative formula; only `env.result.tm` is meaningful afterwards.
#[instrument(skip_all, name = "approximative_mode")]
pub fn run(env: &mut Environment, registry: &Registry) -> Result<(), MeltingError> {
    let descriptor = registry
        .selected(env, MethodCategory::Approximative)?
        .ok_or_else(|| {
            MeltingError::Configuration(format!(
                "no approximative formula is available for {} duplexes",
                env.hybridization()
            ))
        })?;
    let MethodKind::Approximative(formula) = descriptor.kind else {
        return Err(registry.wrong_kind(MethodCategory::Approximative, descriptor.name));
    };

    if !formula.is_applicable(env) {
        return Err(MeltingError::not_applicable(
            formula.reference(),
            "the duplex is mismatched or shorter than the threshold",
        ));
    }

    let solution = env.solution();
    let na = if formula.uses_sodium_equivalent() && solution.has_other_cations() {
        sodium_equivalent_model(env, registry)?.compute(solution)
    } else {
        solution.na
    };

    env.result.mode = ComputationMode::Approximative;
    env.result.enthalpy = 0.0;
    env.result.entropy = 0.0;
    env.result.tm = formula.temperature(env, na);
    env.result.record_model(formula.reference());
    info!(model = formula.reference(), na, tm = env.result.tm, "Approximative melting temperature");
    Ok(())
}
