//! # Core Module
//!
//! Stateless building blocks of the melting-temperature engine.
//!
//! ## Overview
//!
//! Everything here is a pure data structure or a pure function: the aligned duplex
//! and its structural predicates, the enthalpy/entropy value types, and the
//! parameter tables with their canonical keys. The only shared state is the
//! append-only [`params::store::ParameterStore`] cache.
//!
//! ## Architecture
//!
//! - **Sequences** ([`sequences`]) - Token recognition, base pairs, duplex encoding and pattern predicates
//! - **Thermodynamics** ([`thermo`]) - Enthalpy/entropy values and the final result
//! - **Parameters** ([`params`]) - Parameter tables, key canonicalization and caching

pub mod params;
pub mod sequences;
pub mod thermo;
