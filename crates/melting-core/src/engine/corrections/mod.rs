//! Ionic-strength and co-solvent corrections applied to an uncorrected melting temperature.
//!
//! The pipeline order is fixed: sodium equivalence, ionic correction (explicit
//! or automatically selected), DMSO, then formamide. Every correction either
//! replaces the temperature directly or shifts the total entropy, in which case
//! the temperature is recomputed from the van't Hoff relation.

pub mod cosolvent;
pub mod magnesium;
pub mod mixed;
pub mod sodium;
pub mod sodium_equivalent;

use self::cosolvent::{DmsoCorrection, FormamideCorrection};
use self::magnesium::MagnesiumCorrection;
use self::mixed::MixedCorrection;
use self::sodium::SodiumCorrection;
use self::sodium_equivalent::{Cations, SodiumEquivalentModel};
use super::config::MethodCategory;
use super::environment::Environment;
use super::error::MeltingError;
use super::registry::{MethodKind, Registry};
use crate::core::thermo::term::KELVIN_OFFSET;
use tracing::{debug, info};

/// What a correction does to the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// New melting temperature in °C.
    Temperature(f64),
    /// Entropy added to the total before the temperature is recomputed.
    Entropy(f64),
}

impl Adjustment {
    /// `1/Tm' = 1/(Tm + 273.15) + shift`, back in °C.
    pub fn inverse_shift(tm: f64, shift: f64) -> Self {
        let inverse = 1.0 / (tm + KELVIN_OFFSET) + shift;
        Adjustment::Temperature(1.0 / inverse - KELVIN_OFFSET)
    }

    pub fn apply(self, env: &mut Environment) {
        match self {
            Adjustment::Temperature(tm) => env.result.tm = tm,
            Adjustment::Entropy(entropy) => {
                env.result.entropy += entropy;
                env.result.tm = env.melting_temperature();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonCorrection {
    Sodium(SodiumCorrection),
    Magnesium(MagnesiumCorrection),
    Mixed(MixedCorrection),
}

impl IonCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            IonCorrection::Sodium(correction) => correction.reference(),
            IonCorrection::Magnesium(correction) => correction.reference(),
            IonCorrection::Mixed(correction) => correction.reference(),
        }
    }

    pub fn is_applicable(&self, env: &Environment, cations: &Cations) -> bool {
        match self {
            IonCorrection::Sodium(correction) => correction.is_applicable(env, cations),
            IonCorrection::Magnesium(correction) => correction.is_applicable(env, cations),
            IonCorrection::Mixed(correction) => correction.is_applicable(env, cations),
        }
    }

    pub fn adjustment(&self, env: &Environment, cations: &Cations) -> Adjustment {
        match self {
            IonCorrection::Sodium(correction) => correction.adjustment(env, cations),
            IonCorrection::Magnesium(correction) => correction.adjustment(env, cations),
            IonCorrection::Mixed(correction) => correction.adjustment(env, cations),
        }
    }
}

/// Picks the ionic correction from the cation ratio `√(Mg − dNTP) / monovalent`.
///
/// A sodium-only pick treats the magnesium as absent, so the solution is
/// updated in place before the sodium equivalent is computed.
pub fn select_ion_correction(env: &mut Environment) -> IonCorrection {
    let hybridization = env.hybridization();
    if hybridization.is_hybrid() {
        return IonCorrection::Sodium(SodiumCorrection::Wetmur91);
    }
    let is_dna = hybridization.is_dna();
    let monovalent = env.solution().monovalent();
    if monovalent == 0.0 {
        return if is_dna {
            IonCorrection::Magnesium(MagnesiumCorrection::Owczarzy08)
        } else {
            IonCorrection::Magnesium(MagnesiumCorrection::Tan07)
        };
    }

    let ratio = env.solution().free_magnesium().max(0.0).sqrt() / monovalent;
    debug!(ratio, monovalent, "Cation ratio for the ionic correction");
    if ratio < 0.22 {
        env.solution_mut().mg = 0.0;
        if is_dna {
            IonCorrection::Sodium(SodiumCorrection::Owczarzy04Eq22)
        } else {
            IonCorrection::Sodium(SodiumCorrection::Tan07)
        }
    } else if ratio < 6.0 {
        if is_dna {
            IonCorrection::Mixed(MixedCorrection::Owczarzy08)
        } else {
            IonCorrection::Mixed(MixedCorrection::Tan07)
        }
    } else if is_dna {
        IonCorrection::Magnesium(MagnesiumCorrection::Owczarzy08)
    } else {
        IonCorrection::Magnesium(MagnesiumCorrection::Tan07)
    }
}

/// The sodium-equivalence model selected for the computation.
pub fn sodium_equivalent_model(
    env: &Environment,
    registry: &Registry,
) -> Result<SodiumEquivalentModel, MeltingError> {
    match registry.selected(env, MethodCategory::SodiumEquivalent)? {
        Some(descriptor) => match descriptor.kind {
            MethodKind::SodiumEquivalent(model) => Ok(model),
            _ => Err(registry.wrong_kind(MethodCategory::SodiumEquivalent, descriptor.name)),
        },
        None => Ok(SodiumEquivalentModel::Ahsen01),
    }
}

/// Applies the explicit or automatically selected ionic correction to `env.result`.
pub fn correct_ionic_strength(env: &mut Environment, registry: &Registry) -> Result<(), MeltingError> {
    let correction = match registry.selected(env, MethodCategory::IonCorrection)? {
        Some(descriptor) => match descriptor.kind {
            MethodKind::IonCorrection(correction) => correction,
            _ => return Err(registry.wrong_kind(MethodCategory::IonCorrection, descriptor.name)),
        },
        None => select_ion_correction(env),
    };

    let equivalence = sodium_equivalent_model(env, registry)?;
    if env.solution().has_other_cations() {
        equivalence.advise(env.hybridization());
    }
    let cations = Cations::new(env.solution(), equivalence);
    if !correction.is_applicable(env, &cations) {
        return Err(MeltingError::not_applicable(
            correction.reference(),
            "the ionic correction does not apply to this solution",
        ));
    }

    let before = env.result.tm;
    let adjustment = correction.adjustment(env, &cations);
    adjustment.apply(env);
    env.result.record_model(correction.reference());
    info!(
        model = correction.reference(),
        na_eq = cations.na_eq,
        tm = env.result.tm,
        delta = env.result.tm - before,
        "Ionic correction applied"
    );
    Ok(())
}

/// DMSO then formamide, each only when the agent is present.
pub fn correct_cosolvents(env: &mut Environment, registry: &Registry) -> Result<(), MeltingError> {
    if env.solution().dmso > 0.0 {
        let correction = match registry.selected(env, MethodCategory::Dmso)? {
            Some(descriptor) => match descriptor.kind {
                MethodKind::Dmso(correction) => correction,
                _ => return Err(registry.wrong_kind(MethodCategory::Dmso, descriptor.name)),
            },
            None => DmsoCorrection::Ahsen01,
        };
        if !correction.is_applicable(env) {
            return Err(MeltingError::not_applicable(correction.reference(), "DMSO correction"));
        }
        env.result.tm = correction.corrected_temperature(env);
        env.result.record_model(correction.reference());
        debug!(model = correction.reference(), tm = env.result.tm, "DMSO correction applied");
    }

    if env.solution().formamide > 0.0 {
        let correction = match registry.selected(env, MethodCategory::Formamide)? {
            Some(descriptor) => match descriptor.kind {
                MethodKind::Formamide(correction) => correction,
                _ => return Err(registry.wrong_kind(MethodCategory::Formamide, descriptor.name)),
            },
            None => FormamideCorrection::Blake96,
        };
        if !correction.is_applicable(env) {
            return Err(MeltingError::not_applicable(
                correction.reference(),
                format!("not applicable to {} duplexes", env.hybridization()),
            ));
        }
        env.result.tm = correction.corrected_temperature(env);
        env.result.record_model(correction.reference());
        debug!(model = correction.reference(), tm = env.result.tm, "Formamide correction applied");
    }
    Ok(())
}
