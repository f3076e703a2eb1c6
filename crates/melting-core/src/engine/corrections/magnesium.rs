use super::Adjustment;
use super::sodium_equivalent::Cations;
use crate::engine::environment::Environment;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnesiumCorrection {
    Owczarzy08,
    Tan06,
    Tan07,
}

/// Coefficients `a..g` of the Owczarzy (2008) magnesium correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OwczarzyCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

impl Default for OwczarzyCoefficients {
    fn default() -> Self {
        Self {
            a: 3.92e-5,
            b: -9.11e-6,
            c: 6.26e-5,
            d: 1.42e-5,
            e: -4.82e-4,
            f: 5.25e-4,
            g: 8.31e-5,
        }
    }
}

impl OwczarzyCoefficients {
    /// `1/Tm(Mg) = 1/Tm + a + b·ln Mg + fGC·(c + d·ln Mg) + (e + f·ln Mg + g·ln² Mg) / (2(N − 1))`.
    pub fn adjustment(&self, env: &Environment, magnesium: f64) -> Adjustment {
        let ln_mg = magnesium.ln();
        let f_gc = env.duplex().percent_gc() / 100.0;
        let stacks = env.duplex().len() as f64 - 1.0;
        let shift = self.a
            + self.b * ln_mg
            + f_gc * (self.c + self.d * ln_mg)
            + 1.0 / (2.0 * stacks) * (self.e + self.f * ln_mg + self.g * ln_mg * ln_mg);
        Adjustment::inverse_shift(env.result.tm, shift)
    }
}

impl MagnesiumCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            MagnesiumCorrection::Owczarzy08 => "Owczarzy et al. (2008)",
            MagnesiumCorrection::Tan06 => "Tan and Chen (2006)",
            MagnesiumCorrection::Tan07 => "Tan and Chen (2007)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, cations: &Cations) -> bool {
        let model = self.reference();
        let mg = env.solution().mg;
        if mg <= 0.0 || cations.free_magnesium <= 0.0 {
            return false;
        }
        let hybridization = env.hybridization();
        match self {
            MagnesiumCorrection::Owczarzy08 => {
                if !(0.0005..=0.6).contains(&mg) {
                    warn!(model, mg, "Accurate for magnesium between 0.5 mM and 600 mM");
                }
                if !hybridization.is_dna() {
                    warn!(model, hybridization = hybridization.as_str(), "Correction established for DNA duplexes");
                }
            }
            MagnesiumCorrection::Tan06 => {
                if env.duplex().len() < 6 {
                    warn!(model, length = env.duplex().len(), "Valid for duplexes of at least 6 bp");
                }
                if !hybridization.is_dna() {
                    warn!(model, hybridization = hybridization.as_str(), "Correction established for DNA duplexes");
                }
            }
            MagnesiumCorrection::Tan07 => {
                if !hybridization.is_rna() {
                    warn!(model, hybridization = hybridization.as_str(), "Correction established for RNA duplexes");
                }
            }
        }
        true
    }

    pub fn adjustment(&self, env: &Environment, cations: &Cations) -> Adjustment {
        let magnesium = cations.free_magnesium;
        let length = env.duplex().len();
        let stacks = length as f64 - 1.0;
        match self {
            MagnesiumCorrection::Owczarzy08 => OwczarzyCoefficients::default().adjustment(env, magnesium),
            MagnesiumCorrection::Tan06 => {
                Adjustment::Entropy(-3.22 * stacks * tan06_stack_energy(magnesium, length))
            }
            MagnesiumCorrection::Tan07 => {
                Adjustment::Entropy(-3.22 * stacks * tan07_stack_energy(magnesium, length))
            }
        }
    }
}

/// `g2 = a2 + b2/N²` with the DNA coefficients of Tan and Chen (2006).
pub(crate) fn tan06_stack_energy(magnesium: f64, length: usize) -> f64 {
    let ln_mg = magnesium.ln();
    let square = ln_mg * ln_mg;
    let length = length as f64;
    let a = 0.02 * ln_mg + 0.0068 * square;
    let b = 1.18 * ln_mg + 0.344 * square;
    a + b / (length * length)
}

/// `g2 = a2 + b2/N²` with the RNA coefficients of Tan and Chen (2007).
pub(crate) fn tan07_stack_energy(magnesium: f64, length: usize) -> f64 {
    let ln_mg = magnesium.ln();
    let square = ln_mg * ln_mg;
    let length = length as f64;
    let a = -0.6 / length + 0.025 * ln_mg + 0.0068 * square;
    let b = ln_mg + 0.38 * square;
    a + b / (length * length)
}
