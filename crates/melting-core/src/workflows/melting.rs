use crate::core::params::store::ParameterStore;
use crate::core::thermo::result::{ComputationMode, ThermoResult};
use crate::engine::approximate;
use crate::engine::config::{GlobalMode, MeltingOptions, MethodCategory, MethodChoice};
use crate::engine::corrections::correct_cosolvents;
use crate::engine::environment::{Environment, SolutionComposition};
use crate::engine::error::MeltingError;
use crate::engine::nearest_neighbor;
use crate::engine::registry::{MethodKind, Registry};
use tracing::{info, instrument};

/// Computation family for the environment.
///
/// In the default mode, duplexes at least as long as the threshold use the
/// approximative formulas: a duplex exactly as long as the threshold is
/// approximative, and only strictly shorter ones are decomposed.
pub fn select_mode(env: &Environment) -> ComputationMode {
    match env.mode() {
        GlobalMode::Approximative => ComputationMode::Approximative,
        GlobalMode::NearestNeighbor => ComputationMode::NearestNeighbor,
        GlobalMode::Default if env.duplex().len() >= env.threshold() => ComputationMode::Approximative,
        GlobalMode::Default => ComputationMode::NearestNeighbor,
    }
}

/// Runs a complete melting computation and returns its result.
#[instrument(skip_all, name = "melting_workflow")]
pub fn compute(
    options: &MeltingOptions,
    registry: &Registry,
    store: &ParameterStore,
) -> Result<ThermoResult, MeltingError> {
    let mut env = Environment::new(options)?;
    run(&mut env, registry, store)?;
    Ok(env.result)
}

/// Fills `env.result` for an already prepared environment.
pub fn run(env: &mut Environment, registry: &Registry, store: &ParameterStore) -> Result<(), MeltingError> {
    // === Phase 1: Mode selection ===
    let mode = select_mode(env);
    info!(
        %mode,
        length = env.duplex().len(),
        threshold = env.threshold(),
        hybridization = env.hybridization().as_str(),
        "Computation mode selected"
    );

    // === Phase 2: Thermodynamics and ionic correction ===
    match mode {
        ComputationMode::NearestNeighbor => {
            if !nearest_neighbor::is_applicable(env) {
                return Err(MeltingError::not_applicable(
                    "nearest-neighbor decomposition",
                    "the duplex is at least as long as the threshold",
                ));
            }
            nearest_neighbor::run(env, registry, store)?;
        }
        ComputationMode::Approximative => approximate::run(env, registry)?,
    }

    // === Phase 3: Denaturing agents ===
    correct_cosolvents(env, registry)?;

    info!(
        enthalpy = env.result.enthalpy,
        entropy = env.result.entropy,
        tm = env.result.tm,
        models = env.result.models.len(),
        "Melting computation complete"
    );
    Ok(())
}

/// Sodium-equivalent concentration of a solution, in mol/L.
///
/// `method` selects the equivalence model; `ahs01` is used when it is `None`.
#[instrument(skip_all, name = "sodium_equivalent_workflow")]
pub fn sodium_equivalent(
    solution: &SolutionComposition,
    method: Option<&MethodChoice>,
    registry: &Registry,
) -> Result<f64, MeltingError> {
    let default = MethodChoice::new("ahs01");
    let choice = method.unwrap_or(&default);
    let descriptor = registry.resolve(MethodCategory::SodiumEquivalent, choice)?;
    let MethodKind::SodiumEquivalent(model) = descriptor.kind else {
        return Err(registry.wrong_kind(MethodCategory::SodiumEquivalent, descriptor.name));
    };
    let na_eq = model.compute(solution);
    info!(model = model.reference(), na_eq, "Sodium equivalent");
    Ok(na_eq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::table::ParameterTable;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::core::thermo::term::Thermodynamics;
    use crate::engine::config::MeltingOptionsBuilder;

    fn nn_store() -> ParameterStore {
        let store = ParameterStore::new("unused");
        store.insert(
            "AllawiSantaLucia1997nn.toml",
            ParameterTable::from_entries(
                [
                    ("neighborAA/TT", -7900.0, -22.2),
                    ("neighborAC/TG", -8400.0, -22.4),
                    ("neighborCG/GC", -10600.0, -27.2),
                    ("initiationper_A/T", 2300.0, 4.1),
                    ("initiationper_G/C", 100.0, -2.8),
                ]
                .into_iter()
                .map(|(key, enthalpy, entropy)| (key.to_string(), Thermodynamics::new(enthalpy, entropy))),
            ),
        );
        store
    }

    fn options(sequence: &str, solution: &str) -> MeltingOptionsBuilder {
        MeltingOptionsBuilder::new()
            .sequence(sequence)
            .hybridization(Hybridization::DnaDna)
            .solution(solution)
            .strand_concentration(0.0001)
    }

    #[test]
    fn default_mode_switches_at_the_threshold() {
        let short = options("ACGTACGTAC", "Na=0.1").threshold(11).build().unwrap();
        assert_eq!(select_mode(&Environment::new(&short).unwrap()), ComputationMode::NearestNeighbor);

        let long = options("ACGTACGTAC", "Na=0.1").threshold(10).build().unwrap();
        assert_eq!(select_mode(&Environment::new(&long).unwrap()), ComputationMode::Approximative);

        let forced = options("ACGTACGTAC", "Na=0.1")
            .threshold(10)
            .mode(GlobalMode::NearestNeighbor)
            .build()
            .unwrap();
        assert_eq!(select_mode(&Environment::new(&forced).unwrap()), ComputationMode::NearestNeighbor);
    }

    #[test]
    fn dmso_is_applied_after_the_ionic_correction() {
        let store = nn_store();
        let registry = Registry::standard();
        let plain = options("AACG", "Na=1")
            .complementary("TTGC")
            .method(MethodCategory::IonCorrection, MethodChoice::new("san96"))
            .build()
            .unwrap();
        let with_dmso = options("AACG", "Na=1:DMSO=10")
            .complementary("TTGC")
            .method(MethodCategory::IonCorrection, MethodChoice::new("san96"))
            .build()
            .unwrap();

        let plain = compute(&plain, &registry, &store).unwrap();
        let with_dmso = compute(&with_dmso, &registry, &store).unwrap();
        assert!((plain.tm - 0.75 * 10.0 - with_dmso.tm).abs() < 1e-9);
        assert_eq!(plain.enthalpy, with_dmso.enthalpy);
        assert!(with_dmso.models.iter().any(|model| model == "von Ahsen et al. (2001)"));
    }

    #[test]
    fn bundled_unified_stacks_sum_to_the_published_totals() {
        let options = options("ACGTCATG", "Na=1").build().unwrap();
        let result = compute(&options, &Registry::standard(), &ParameterStore::bundled()).unwrap();
        assert_eq!(result.mode, ComputationMode::NearestNeighbor);
        assert!((result.enthalpy - -57400.0).abs() < 1e-6);
        assert!((result.entropy - -158.7).abs() < 1e-6);
        assert_eq!(result.models[0], "Allawi and SantaLucia (1997)");
    }

    #[test]
    fn approximative_mode_needs_no_parameter_file() {
        let store = ParameterStore::new("unused");
        let options = options("ACGTACGTACGTACGTACGT", "Na=0.1")
            .threshold(10)
            .build()
            .unwrap();
        let result = compute(&options, &Registry::standard(), &store).unwrap();
        assert_eq!(result.mode, ComputationMode::Approximative);
        assert_eq!(store.parse_count(), 0);
    }

    #[test]
    fn sodium_equivalent_uses_the_selected_model() {
        let solution: SolutionComposition = "Na=0.05:Mg=0.0015:dNTP=0.0005:K=0.01".parse().unwrap();
        let registry = Registry::standard();
        let free = (0.0015f64 - 0.0005).sqrt();

        let default = sodium_equivalent(&solution, None, &registry).unwrap();
        assert!((default - (0.06 + 3.79 * free)).abs() < 1e-12);

        let peyret = sodium_equivalent(&solution, Some(&MethodChoice::new("pey00")), &registry).unwrap();
        assert!((peyret - (0.06 + 3.3 * free)).abs() < 1e-12);

        let unknown = sodium_equivalent(&solution, Some(&MethodChoice::new("nope")), &registry);
        assert!(matches!(unknown, Err(MeltingError::Configuration(_))));
    }
}
