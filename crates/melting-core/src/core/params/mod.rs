//! # Parameters
//!
//! Thermodynamic parameter tables, their canonical key space and the shared
//! load-once cache.
//!
//! ## Key Components
//!
//! - **[`table::ParameterTable`]**: string-keyed [`Thermodynamics`](crate::core::thermo::term::Thermodynamics)
//!   values loaded from TOML or CSV files.
//! - **[`keys`]**: category accessors with the orientation-symmetric fallback and the
//!   marker-relocating mirrors used for modified acids.
//! - **[`store::ParameterStore`]**: the cross-request cache of parsed tables.

pub mod keys;
pub mod store;
pub mod table;
