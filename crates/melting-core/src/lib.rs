//! # MELTING Core Library
//!
//! Melting temperature, enthalpy and entropy of nucleic-acid duplexes from
//! nearest-neighbor thermodynamics, with ionic and denaturing-agent corrections.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data and pure functions: token
//!   recognition, the aligned `Duplex` and its pattern predicates, `Thermodynamics`
//!   values, and parameter tables with canonical key lookups and a shared cache.
//!
//! - **[`engine`]: The Logic Core.** Options, the computation `Environment`, the
//!   immutable model `Registry`, one tagged variant per published model, the
//!   correction pipeline and the nearest-neighbor orchestration.
//!
//! - **[`workflows`]: The Public API.** Complete computations from options to a
//!   `ThermoResult`, plus the stand-alone sodium-equivalent computation.

pub mod core;
pub mod engine;
pub mod workflows;
