//! # Pattern Strategies
//!
//! One tagged variant per published model, each able to tell whether it covers
//! a duplex range and to compute that range's enthalpy/entropy contribution.
//!
//! ## Overview
//!
//! Models never touch the accumulated result. [`PatternModel::compute`] returns a
//! [`Contribution`] and the orchestrator commits every contribution at once, so
//! a missing parameter or an inapplicable model leaves nothing half-summed.
//!
//! Localized models receive the bare anomalous range and widen it by the
//! flanking pairs they need themselves (see [`widen`]).

pub mod bulge;
pub mod crick;
pub mod dangling;
pub mod internal_loop;
pub mod mismatch;
pub mod modified;
pub mod repeats;
pub mod tandem;
pub mod wobble;

use self::bulge::BulgeModel;
use self::crick::CrickModel;
use self::dangling::DanglingModel;
use self::internal_loop::InternalLoopModel;
use self::mismatch::SingleMismatchModel;
use self::modified::ModifiedModel;
use self::repeats::CngModel;
use self::tandem::TandemMismatchModel;
use self::wobble::WobbleModel;
use super::config::MethodCategory;
use super::environment::Environment;
use super::error::MeltingError;
use super::registry::{MethodKind, Registry};
use crate::core::params::keys::Lookup;
use crate::core::params::store::ParameterStore;
use crate::core::params::table::ParameterTable;
use crate::core::sequences::duplex::Duplex;
use crate::core::thermo::term::Thermodynamics;
use std::ops::{Add, AddAssign, Deref};
use std::sync::Arc;
use tracing::{debug, warn};

/// Enthalpy/entropy of one range, with the part of the entropy that must not be salt corrected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contribution {
    pub thermo: Thermodynamics,
    pub salt_independent_entropy: f64,
}

impl Contribution {
    pub fn new(thermo: Thermodynamics) -> Self {
        Self {
            thermo,
            salt_independent_entropy: 0.0,
        }
    }

    /// `thermo` receives the ionic correction later on; `entropy` never does.
    pub fn salt_independent(thermo: Thermodynamics, entropy: f64) -> Self {
        Self {
            thermo,
            salt_independent_entropy: entropy,
        }
    }
}

impl From<Thermodynamics> for Contribution {
    fn from(thermo: Thermodynamics) -> Self {
        Self::new(thermo)
    }
}

impl Add for Contribution {
    type Output = Contribution;

    fn add(self, other: Contribution) -> Contribution {
        Contribution {
            thermo: self.thermo + other.thermo,
            salt_independent_entropy: self.salt_independent_entropy + other.salt_independent_entropy,
        }
    }
}

impl AddAssign for Contribution {
    fn add_assign(&mut self, other: Contribution) {
        *self = *self + other;
    }
}

/// A parameter table seen through one model: misses become [`MeltingError::MissingParameter`].
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    table: &'a ParameterTable,
    model: &'a str,
}

impl<'a> Params<'a> {
    pub fn new(table: &'a ParameterTable, model: &'a str) -> Self {
        Self { table, model }
    }

    pub fn model(&self) -> &str {
        self.model
    }

    pub fn need(&self, lookup: Lookup) -> Result<Thermodynamics, MeltingError> {
        lookup.map_err(|missing| MeltingError::MissingParameter {
            model: self.model.to_string(),
            key: missing.0,
        })
    }
}

impl Deref for Params<'_> {
    type Target = ParameterTable;

    fn deref(&self) -> &ParameterTable {
        self.table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternModel {
    Crick(CrickModel),
    SingleMismatch(SingleMismatchModel),
    TandemMismatch(TandemMismatchModel),
    InternalLoop(InternalLoopModel),
    Wobble(WobbleModel),
    Dangling(DanglingModel),
    Bulge(BulgeModel),
    Repeats(CngModel),
    Modified(ModifiedModel),
}

impl PatternModel {
    pub fn reference(&self) -> &'static str {
        match self {
            PatternModel::Crick(model) => model.reference(),
            PatternModel::SingleMismatch(model) => model.reference(),
            PatternModel::TandemMismatch(model) => model.reference(),
            PatternModel::InternalLoop(model) => model.reference(),
            PatternModel::Wobble(model) => model.reference(),
            PatternModel::Dangling(model) => model.reference(),
            PatternModel::Bulge(model) => model.reference(),
            PatternModel::Repeats(model) => model.reference(),
            PatternModel::Modified(model) => model.reference(),
        }
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        match self {
            PatternModel::Crick(model) => model.is_applicable(env),
            PatternModel::SingleMismatch(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::TandemMismatch(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::InternalLoop(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::Wobble(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::Dangling(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::Bulge(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::Repeats(model) => model.is_applicable(env, pos1, pos2),
            PatternModel::Modified(model) => model.is_applicable(env, pos1, pos2),
        }
    }

    pub fn compute(
        &self,
        params: &Params,
        duplex: &Duplex,
        pos1: usize,
        pos2: usize,
    ) -> Result<Contribution, MeltingError> {
        match self {
            PatternModel::Crick(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::SingleMismatch(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::TandemMismatch(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::InternalLoop(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::Wobble(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::Dangling(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::Bulge(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::Repeats(model) => model.compute(params, duplex, pos1, pos2),
            PatternModel::Modified(model) => model.compute(params, duplex, pos1, pos2),
        }
    }
}

/// A pattern model bound to its merged parameter table.
#[derive(Debug, Clone)]
pub struct Strategy {
    category: MethodCategory,
    name: String,
    model: PatternModel,
    table: Arc<ParameterTable>,
}

impl Strategy {
    pub fn new(
        category: MethodCategory,
        name: impl Into<String>,
        model: PatternModel,
        table: Arc<ParameterTable>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            model,
            table,
        }
    }

    /// Resolves the method selected for `category` and loads its table.
    ///
    /// The tables of the companion categories' selected methods are merged
    /// after the method's own table. A companion category without a selected
    /// method is skipped.
    pub fn load(
        category: MethodCategory,
        env: &Environment,
        registry: &Registry,
        store: &ParameterStore,
    ) -> Result<Self, MeltingError> {
        let choice = env.method(category).ok_or_else(|| {
            MeltingError::Configuration(format!(
                "no {} method is selected for {} duplexes",
                category,
                env.hybridization()
            ))
        })?;
        let descriptor = registry.resolve(category, choice)?;
        let MethodKind::Pattern(model) = descriptor.kind else {
            return Err(registry.wrong_kind(category, descriptor.name));
        };
        let file = choice
            .file
            .as_deref()
            .or(descriptor.default_file)
            .ok_or_else(|| MeltingError::Configuration(format!("{} names no parameter file", descriptor.name)))?;
        let own = store.load(file)?;

        let mut companions = Vec::new();
        for &companion in descriptor.companions {
            let Some(companion_choice) = env.method(companion) else {
                debug!(model = descriptor.name, %companion, "No companion method selected");
                continue;
            };
            let companion_descriptor = registry.resolve(companion, companion_choice)?;
            if let Some(file) = companion_choice.file.as_deref().or(companion_descriptor.default_file) {
                companions.push(store.load(file)?);
            }
        }

        let table = if companions.is_empty() {
            own
        } else {
            let mut merged = ParameterTable::clone(&own);
            for companion in &companions {
                merged.merge(companion);
            }
            Arc::new(merged)
        };
        debug!(%category, model = descriptor.name, file, entries = table.len(), "Strategy loaded");
        Ok(Self::new(category, descriptor.name, model, table))
    }

    pub fn category(&self) -> MethodCategory {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> PatternModel {
        self.model
    }

    pub fn reference(&self) -> &'static str {
        self.model.reference()
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn params(&self) -> Params<'_> {
        Params::new(&self.table, self.model.reference())
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        self.model.is_applicable(env, pos1, pos2)
    }

    pub fn compute(&self, duplex: &Duplex, pos1: usize, pos2: usize) -> Result<Contribution, MeltingError> {
        self.model.compute(&self.params(), duplex, pos1, pos2)
    }

    /// Initiation and symmetry terms of a nearest-neighbor strategy.
    pub fn initiation(&self, env: &Environment) -> Result<Contribution, MeltingError> {
        match self.model {
            PatternModel::Crick(model) => {
                model.initiation(&self.params(), env.duplex(), env.is_self_complementary())
            }
            _ => Err(MeltingError::Configuration(format!(
                "{} is not a nearest-neighbor model and has no initiation",
                self.reference()
            ))),
        }
    }
}

/// The range extended by one flanking pair on each side, clamped to the duplex.
pub(crate) fn widen(duplex: &Duplex, pos1: usize, pos2: usize) -> (usize, usize) {
    let start = pos1.saturating_sub(1);
    let end = if pos2 + 1 < duplex.len() { pos2 + 1 } else { pos2 };
    (start, end)
}

pub(crate) fn is_terminal(duplex: &Duplex, pos1: usize, pos2: usize) -> bool {
    pos1 == 0 || pos2 + 1 == duplex.len()
}

/// Count of terminal A·T or A·U pairs among `pos1` and `pos2`.
pub(crate) fn terminal_au_count(duplex: &Duplex, pos1: usize, pos2: usize) -> usize {
    duplex.terminal_count("A", "T", pos1, pos2) + duplex.terminal_count("A", "U", pos1, pos2)
}

/// Count of terminal G·T or G·U pairs among `pos1` and `pos2`.
pub(crate) fn terminal_gu_count(duplex: &Duplex, pos1: usize, pos2: usize) -> usize {
    duplex.terminal_count("G", "T", pos1, pos2) + duplex.terminal_count("G", "U", pos1, pos2)
}

/// AU and GU closure penalties of a loop closed by the pairs `pos1` and `pos2`.
pub(crate) fn closures(params: &Params, duplex: &Duplex, pos1: usize, pos2: usize) -> Result<Thermodynamics, MeltingError> {
    let mut total = Thermodynamics::default();
    let au = terminal_au_count(duplex, pos1, pos2);
    if au > 0 {
        total += params.need(params.closure("A", "U"))? * au as f64;
    }
    let gu = terminal_gu_count(duplex, pos1, pos2);
    if gu > 0 {
        total += params.need(params.closure("G", "U"))? * gu as f64;
    }
    Ok(total)
}

/// Logs that `model` runs outside the hybridization type it was fitted on.
pub(crate) fn advise_hybridization(env: &Environment, validated: bool, model: &str, expected: &str) {
    if !validated {
        warn!(
            model,
            hybridization = env.hybridization().as_str(),
            "Parameters are established for {}",
            expected
        );
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::table;
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::config::{MeltingOptionsBuilder, MethodChoice};

    #[test]
    fn widening_is_clamped_to_the_duplex() {
        let duplex = Duplex::new("ACGTA", "TGCAT").unwrap();
        assert_eq!(widen(&duplex, 0, 1), (0, 2));
        assert_eq!(widen(&duplex, 2, 3), (1, 4));
        assert_eq!(widen(&duplex, 3, 4), (2, 4));
    }

    #[test]
    fn missing_lookup_names_model_and_key() {
        let empty = ParameterTable::new();
        let params = Params::new(&empty, "Xia et al. (1998)");
        let error = params.need(params.neighbor("AC", "UG")).unwrap_err();
        assert!(matches!(
            error,
            MeltingError::MissingParameter { ref model, ref key }
                if model == "Xia et al. (1998)" && key == "neighborAC/UG"
        ));
    }

    #[test]
    fn load_merges_companion_tables() {
        let store = ParameterStore::new("unused");
        store.insert("own.toml", table(&[("mismatchAA/TA", 1.0, 2.0)]));
        store.insert("single.toml", table(&[("mismatchAC/TT", 3.0, 4.0)]));
        let options = MeltingOptionsBuilder::new()
            .sequence("ACGTCA")
            .hybridization(Hybridization::DnaDna)
            .solution("Na=1")
            .strand_concentration(0.0001)
            .method(MethodCategory::TandemMismatch, MethodChoice::with_file("allsanpey", "own.toml"))
            .method(MethodCategory::SingleMismatch, MethodChoice::with_file("allsanpey", "single.toml"))
            .build()
            .unwrap();
        let env = Environment::new(&options).unwrap();

        let strategy = Strategy::load(MethodCategory::TandemMismatch, &env, &Registry::standard(), &store).unwrap();
        assert_eq!(strategy.name(), "allsanpey");
        assert!(strategy.table().contains("mismatchAA/TA"));
        assert!(strategy.table().contains("mismatchAC/TT"));
    }

    #[test]
    fn contributions_add_both_buckets() {
        let a = Contribution::salt_independent(Thermodynamics::new(1.0, -2.0), -2.0);
        let b = Contribution::new(Thermodynamics::new(3.0, -4.0));
        let sum = a + b;
        assert_eq!(sum.thermo, Thermodynamics::new(4.0, -6.0));
        assert_eq!(sum.salt_independent_entropy, -2.0);
    }
}
