//! # Engine Module
//!
//! Stateful logic of a melting computation: options, environment, model
//! registry, pattern strategies, corrections and the two computation modes.
//!
//! ## Overview
//!
//! A computation starts from validated [`config::MeltingOptions`], which become an
//! [`environment::Environment`] holding the encoded duplex, the solution and the
//! running result. Either the nearest-neighbor decomposition
//! ([`nearest_neighbor`]) or a closed-form formula ([`approximate`]) fills that
//! result, after which the correction pipeline ([`corrections`]) brings it to the
//! requested solution.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Options, builder, method categories and per-hybridization defaults
//! - **Environment** ([`environment`]) - Solution composition, duplex orientation and the accumulated result
//! - **Registry** ([`registry`]) - Immutable catalogue mapping `(category, name)` to a model
//! - **Patterns** ([`patterns`]) - Nearest-neighbor, mismatch, loop, dangling-end and modified-acid models
//! - **Corrections** ([`corrections`]) - Sodium equivalence, ionic strength, DMSO and formamide
//! - **Error Handling** ([`error`]) - The single error type of the crate
//!
//! ## Key Capabilities
//!
//! - **Segment-wise decomposition** routing each structural pattern to its selected model
//! - **Fail-fast parameter checks** so no partial sum is ever committed
//! - **Automatic ion correction selection** from the cation ratio
//! - **Salt-independent loop entropy** kept apart from the ionic correction

pub mod approximate;
pub mod config;
pub mod corrections;
pub mod environment;
pub mod error;
pub mod nearest_neighbor;
pub mod patterns;
pub mod registry;
