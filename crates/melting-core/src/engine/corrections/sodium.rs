use super::Adjustment;
use super::sodium_equivalent::Cations;
use crate::engine::environment::Environment;
use tracing::warn;

/// Corrections for a solution reduced to one (equivalent) sodium concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SodiumCorrection {
    SchildkrautLifson65,
    SantaLucia96,
    Wetmur91,
    FrankKamenetskii71,
    Owczarzy04Eq19,
    Owczarzy04Eq20,
    Owczarzy04Eq21,
    Owczarzy04Eq22,
    Ahsen01,
    SantaLucia04,
    Tan06,
    Tan07,
}

impl SodiumCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            SodiumCorrection::SchildkrautLifson65 => "Schildkraut and Lifson (1965)",
            SodiumCorrection::SantaLucia96 => "SantaLucia et al. (1996)",
            SodiumCorrection::Wetmur91 => "Wetmur (1991)",
            SodiumCorrection::FrankKamenetskii71 => "Frank-Kamenetskii (1971)",
            SodiumCorrection::Owczarzy04Eq19 => "Owczarzy et al. (2004) (19)",
            SodiumCorrection::Owczarzy04Eq20 => "Owczarzy et al. (2004) (20)",
            SodiumCorrection::Owczarzy04Eq21 => "Owczarzy et al. (2004) (21)",
            SodiumCorrection::Owczarzy04Eq22 => "Owczarzy et al. (2004) (22)",
            SodiumCorrection::Ahsen01 => "von Ahsen et al. (2001)",
            SodiumCorrection::SantaLucia04 => "SantaLucia et al. (1998, 2004)",
            SodiumCorrection::Tan06 => "Tan and Chen (2006)",
            SodiumCorrection::Tan07 => "Tan and Chen (2007)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, cations: &Cations) -> bool {
        let na_eq = cations.na_eq;
        if na_eq <= 0.0 {
            return false;
        }
        let model = self.reference();
        let validated_range = match self {
            SodiumCorrection::SchildkrautLifson65 => Some((0.07, 0.12)),
            SodiumCorrection::FrankKamenetskii71 => Some((0.069, 1.02)),
            SodiumCorrection::SantaLucia96 => Some((0.1, f64::INFINITY)),
            SodiumCorrection::SantaLucia04 => Some((0.05, 1.1)),
            SodiumCorrection::Tan07 => Some((0.003, 1.0)),
            _ => None,
        };
        if let Some((low, high)) = validated_range {
            if na_eq < low || na_eq > high {
                warn!(model, na_eq, low, high, "Sodium concentration outside the validated range");
            }
        }

        let hybridization = env.hybridization();
        match self {
            SodiumCorrection::Wetmur91 => {}
            SodiumCorrection::Tan07 if !hybridization.is_rna() => {
                warn!(model, hybridization = hybridization.as_str(), "Correction established for RNA duplexes");
            }
            SodiumCorrection::Tan07 => {}
            _ if !hybridization.is_dna() => {
                warn!(model, hybridization = hybridization.as_str(), "Correction established for DNA duplexes");
            }
            _ => {}
        }
        if *self == SodiumCorrection::SantaLucia04 && env.duplex().len() > 16 {
            warn!(model, length = env.duplex().len(), "Correction established for duplexes up to 16 bp");
        }
        true
    }

    pub fn adjustment(&self, env: &Environment, cations: &Cations) -> Adjustment {
        let na_eq = cations.na_eq;
        let tm = env.result.tm;
        let f_gc = env.duplex().percent_gc() / 100.0;
        let stacks = env.duplex().len() as f64 - 1.0;
        let ln_na = na_eq.ln();

        match self {
            SodiumCorrection::SchildkrautLifson65 => Adjustment::Temperature(tm + 16.6 * na_eq.log10()),
            SodiumCorrection::SantaLucia96 => Adjustment::Temperature(tm + 12.5 * na_eq.log10()),
            SodiumCorrection::Wetmur91 => {
                Adjustment::Temperature(tm + 16.6 * (na_eq / (1.0 + 0.7 * na_eq)).log10() + 3.83)
            }
            SodiumCorrection::FrankKamenetskii71 => {
                Adjustment::Temperature(tm + (7.95 - 3.06 * f_gc) * ln_na)
            }
            SodiumCorrection::Owczarzy04Eq19 => {
                Adjustment::Temperature(tm + (-3.22 * f_gc + 6.39) * ln_na)
            }
            SodiumCorrection::Owczarzy04Eq20 => {
                Adjustment::inverse_shift(tm, (3.85 * f_gc - 6.18) * 1e-5 * ln_na)
            }
            SodiumCorrection::Owczarzy04Eq21 => {
                Adjustment::Temperature(tm + (-4.62 * f_gc + 4.52) * ln_na - 0.985 * ln_na * ln_na)
            }
            SodiumCorrection::Owczarzy04Eq22 => Adjustment::inverse_shift(
                tm,
                (4.29 * f_gc - 3.95) * 1e-5 * ln_na + 9.40e-6 * ln_na * ln_na,
            ),
            SodiumCorrection::Ahsen01 => Adjustment::Entropy(0.847 * stacks * na_eq.log10()),
            SodiumCorrection::SantaLucia04 => Adjustment::Entropy(0.368 * stacks * ln_na),
            SodiumCorrection::Tan06 => {
                Adjustment::Entropy(-3.22 * stacks * tan06_stack_energy(na_eq, env.duplex().len()))
            }
            SodiumCorrection::Tan07 => {
                Adjustment::Entropy(-3.22 * stacks * tan07_stack_energy(na_eq, env.duplex().len()))
            }
        }
    }
}

/// Free energy per stack `g1 = a1 + b1/N` of Tan and Chen (2006), DNA.
pub(crate) fn tan06_stack_energy(na: f64, length: usize) -> f64 {
    let ln_na = na.ln();
    let square = ln_na * ln_na;
    let a = -0.07 * ln_na + 0.012 * square;
    let b = 0.013 * square;
    a + b / length as f64
}

/// Free energy per stack `g1 = a1 + b1/N` of Tan and Chen (2007), RNA.
pub(crate) fn tan07_stack_energy(na: f64, length: usize) -> f64 {
    let ln_na = na.ln();
    let square = ln_na * ln_na;
    let a = -0.075 * ln_na + 0.012 * square;
    let b = 0.018 * square;
    a + b / length as f64
}
