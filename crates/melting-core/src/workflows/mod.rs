//! # Workflows Module
//!
//! Top-level entry points of the library.
//!
//! ## Overview
//!
//! A workflow takes validated options, a model [`crate::engine::registry::Registry`]
//! and a [`crate::core::params::store::ParameterStore`], and returns a finished
//! result. The registry and the store are built once and shared by reference
//! between any number of computations.
//!
//! ## Architecture
//!
//! - **Melting Workflow** ([`melting`]) - Mode selection, thermodynamic computation
//!   and corrections, plus the sodium-equivalent concentration of a solution.

pub mod melting;
