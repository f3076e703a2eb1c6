//! # Thermodynamics
//!
//! Value types for enthalpy/entropy contributions and the final melting result.
//!
//! ## Key Components
//!
//! - **[`term::Thermodynamics`]**: an enthalpy/entropy pair with additive arithmetic.
//! - **[`result::ThermoResult`]**: accumulated totals, the melting temperature, the
//!   salt-independent entropy bucket and the models that produced them.

pub mod result;
pub mod term;
