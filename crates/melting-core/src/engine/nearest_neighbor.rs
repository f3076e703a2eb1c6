use super::config::{GlobalMode, MethodCategory};
use super::corrections::{Adjustment, correct_ionic_strength};
use super::environment::Environment;
use super::error::MeltingError;
use super::patterns::repeats::CngModel;
use super::patterns::{Strategy, is_terminal};
use super::registry::Registry;
use crate::core::params::store::ParameterStore;
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::pair::BasePair;
use crate::core::sequences::token::ModifiedAcid;
use crate::core::thermo::result::ComputationMode;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// CNG repeat duplexes with more repeats than this melt as hairpins.
const HAIRPIN_REPEATS: usize = 4;

/// A duplex range handed to the strategy of one method category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub pos1: usize,
    pub pos2: usize,
    pub category: MethodCategory,
}

impl Segment {
    pub fn width(&self) -> usize {
        self.pos2 - self.pos1 + 1
    }
}

/// Whether the nearest-neighbor decomposition may run on this environment.
///
/// Duplexes at or beyond the threshold length are only refused in the
/// default mode; an explicit `NN` mode keeps them with a warning. A duplex
/// exactly as long as the threshold is refused, so the default mode hands it
/// to the approximative formulas.
///
/// Self-complementary duplexes always reach this point with a factor of 1,
/// since [`Environment::new`] forces it.
pub fn is_applicable(env: &Environment) -> bool {
    let length = env.duplex().len();
    if length < env.threshold() {
        return true;
    }
    warn!(
        length,
        threshold = env.threshold(),
        "The nearest-neighbor model is accurate for duplexes shorter than the threshold"
    );
    env.mode() != GlobalMode::Default
}

/// Last position of the run of similar pairs opened at `pos1`.
///
/// Runs are made of complementary pairs, of G·U pairs, or of anything else.
fn segment_end(duplex: &Duplex, pos1: usize) -> usize {
    let pairs = duplex.pairs();
    let last = pairs.len().saturating_sub(1);
    let is_gu = |pair: &BasePair| pair.is_equal_to("G", "U");
    let first = &pairs[pos1];
    let extends = |pair: &BasePair| {
        if first.is_complementary() {
            pair.is_complementary()
        } else if is_gu(first) {
            is_gu(pair)
        } else {
            !pair.is_complementary() && !is_gu(pair)
        }
    };

    let mut pos2 = pos1;
    while pos2 < last && extends(&pairs[pos2 + 1]) {
        pos2 += 1;
    }
    pos2
}

fn no_method(duplex: &Duplex, pos1: usize, pos2: usize, reason: &str) -> MeltingError {
    let structure = match (duplex.sequence(pos1, pos2), duplex.complementary(pos1, pos2)) {
        (Ok(top), Ok(bottom)) => format!("{}/{}", top, bottom),
        _ => String::from("?"),
    };
    MeltingError::NoMethod {
        pos1,
        pos2,
        reason: format!("{} ({})", reason, structure),
    }
}

/// The method category in charge of `pos1..=pos2`.
fn classify(env: &Environment, pos1: usize, pos2: usize) -> Result<MethodCategory, MeltingError> {
    use MethodCategory as C;
    let duplex = env.duplex();
    let width = pos2 - pos1 + 1;

    if is_terminal(duplex, pos1, pos2) {
        if env.is_self_complementary() && duplex.is_cng_pattern(pos1, pos2) {
            return Ok(C::CngRepeats);
        }
        if duplex.is_dangling_end(pos1, pos2) {
            return Ok(match width {
                1 => C::SingleDanglingEnd,
                2 => C::SecondDanglingEnd,
                _ => C::LongDanglingEnd,
            });
        }
        if duplex.is_gu_sequences(pos1, pos2) {
            return Ok(C::Wobble);
        }
        if duplex.is_mismatch_pair(pos1) || duplex.is_mismatch_pair(pos2) {
            return Err(no_method(duplex, pos1, pos2, "terminal mismatches are not covered by any model"));
        }
    }

    if duplex.is_perfect_match(pos1, pos2) {
        return Ok(C::NearestNeighbor);
    }
    if duplex.is_gu_sequences(pos1, pos2) {
        return Ok(C::Wobble);
    }
    if duplex.is_mismatch(pos1, pos2) {
        return Ok(match width {
            1 => C::SingleMismatch,
            2 if duplex.is_no_gap(pos1, pos2) => C::TandemMismatch,
            _ => C::InternalLoop,
        });
    }
    if duplex.is_bulge_loop(pos1, pos2) {
        return Ok(if width == 1 { C::SingleBulgeLoop } else { C::LongBulgeLoop });
    }
    match duplex.modified_acid_at(pos1) {
        Some(ModifiedAcid::Inosine) => Ok(C::Inosine),
        Some(ModifiedAcid::Azobenzene) => Ok(C::Azobenzene),
        Some(ModifiedAcid::Hydroxyadenine) => Ok(C::Hydroxyadenine),
        Some(ModifiedAcid::LockedNucleicAcid) => Ok(C::LockedAcid),
        None => Err(no_method(duplex, pos1, pos2, "no model covers this structure")),
    }
}

/// Splits the duplex into consecutive segments, each assigned a method category.
///
/// A self-complementary `G(CNG)nC` duplex is a single segment.
pub fn segments(env: &Environment) -> Result<Vec<Segment>, MeltingError> {
    let duplex = env.duplex();
    let last = duplex.len().saturating_sub(1);
    if env.is_self_complementary() && duplex.is_cng_pattern(0, last) {
        return Ok(vec![Segment {
            pos1: 0,
            pos2: last,
            category: MethodCategory::CngRepeats,
        }]);
    }

    let mut segments = Vec::new();
    let mut pos1 = 0;
    let mut pos2 = 0;
    while pos2 < last {
        pos2 = segment_end(duplex, pos1);
        let category = classify(env, pos1, pos2)?;
        debug!(pos1, pos2, %category, "Segment classified");
        segments.push(Segment { pos1, pos2, category });
        pos1 = pos2 + 1;
    }
    Ok(segments)
}

fn strategy_for(
    strategies: &BTreeMap<MethodCategory, Strategy>,
    category: MethodCategory,
) -> Result<&Strategy, MeltingError> {
    strategies
        .get(&category)
        .ok_or_else(|| MeltingError::Configuration(format!("no {} strategy was loaded", category)))
}

/// Sums the pattern contributions of the duplex and derives the corrected melting temperature.
///
/// Every strategy is checked before anything is computed, and every
/// contribution is computed before any is added, so a failure leaves
/// `env.result` untouched.
#[instrument(skip_all, name = "nearest_neighbor_mode")]
pub fn run(env: &mut Environment, registry: &Registry, store: &ParameterStore) -> Result<(), MeltingError> {
    // === Phase 1: Segmentation ===
    let segments = segments(env)?;
    let repeats = segments
        .iter()
        .any(|segment| segment.category == MethodCategory::CngRepeats);
    info!(segments = segments.len(), length = env.duplex().len(), "Duplex decomposed");

    // === Phase 2: Strategy loading and applicability ===
    let mut strategies: BTreeMap<MethodCategory, Strategy> = BTreeMap::new();
    let initiation = (!repeats).then_some(MethodCategory::NearestNeighbor);
    for category in segments.iter().map(|segment| segment.category).chain(initiation) {
        if !strategies.contains_key(&category) {
            let strategy = Strategy::load(category, env, registry, store)?;
            strategies.insert(category, strategy);
        }
    }

    for segment in &segments {
        let strategy = strategy_for(&strategies, segment.category)?;
        if !strategy.is_applicable(env, segment.pos1, segment.pos2)? {
            return Err(MeltingError::not_applicable(
                strategy.reference(),
                format!(
                    "{} between positions {} and {}",
                    segment.category, segment.pos1, segment.pos2
                ),
            ));
        }
    }
    let has_stacks = segments
        .iter()
        .any(|segment| segment.category == MethodCategory::NearestNeighbor);
    if let Some(category) = initiation.filter(|_| !has_stacks) {
        let strategy = strategy_for(&strategies, category)?;
        if !strategy.is_applicable(env, 0, env.duplex().len().saturating_sub(1))? {
            return Err(MeltingError::not_applicable(strategy.reference(), "helix initiation"));
        }
    }

    // === Phase 3: Contributions ===
    let mut contributions = Vec::with_capacity(segments.len() + 1);
    for segment in &segments {
        let strategy = strategy_for(&strategies, segment.category)?;
        let contribution = strategy.compute(env.duplex(), segment.pos1, segment.pos2)?;
        info!(
            category = %segment.category,
            model = strategy.reference(),
            pos1 = segment.pos1,
            pos2 = segment.pos2,
            enthalpy = contribution.thermo.enthalpy,
            entropy = contribution.thermo.entropy,
            "Segment computed"
        );
        contributions.push((strategy.reference(), contribution));
    }
    if let Some(category) = initiation {
        let strategy = strategy_for(&strategies, category)?;
        let contribution = strategy.initiation(env)?;
        info!(
            model = strategy.reference(),
            enthalpy = contribution.thermo.enthalpy,
            entropy = contribution.thermo.entropy,
            "Initiation computed"
        );
        contributions.push((strategy.reference(), contribution));
    }

    // === Phase 4: Accumulation ===
    env.result.mode = ComputationMode::NearestNeighbor;
    for (model, contribution) in contributions {
        env.result.add(contribution.thermo);
        env.result.salt_independent_entropy += contribution.salt_independent_entropy;
        env.result.record_model(model);
    }

    // === Phase 5: Melting temperature at 1 M Na ===
    let hairpin = repeats && CngModel::repeats(0, env.duplex().len().saturating_sub(1)) > HAIRPIN_REPEATS;
    env.result.tm = if hairpin {
        env.result.hairpin_temperature()
    } else {
        env.melting_temperature()
    };
    info!(
        enthalpy = env.result.enthalpy,
        entropy = env.result.entropy,
        tm = env.result.tm,
        hairpin,
        "Uncorrected melting temperature"
    );
    if hairpin {
        debug!("Hairpin repeats melt independently of the salt concentration");
        return Ok(());
    }

    // === Phase 6: Ionic correction ===
    correct_ionic_strength(env, registry)?;
    let salt_independent = env.result.salt_independent_entropy;
    if salt_independent != 0.0 {
        let before = env.result.tm;
        Adjustment::inverse_shift(before, salt_independent / env.result.enthalpy).apply(env);
        debug!(
            salt_independent_entropy = salt_independent,
            tm = env.result.tm,
            delta = env.result.tm - before,
            "Salt-independent loop entropy restored"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::core::thermo::term::{GAS_CONSTANT, KELVIN_OFFSET};
    use crate::engine::config::{MeltingOptionsBuilder, MethodChoice};
    use crate::engine::patterns::test_support::table;

    fn builder(sequence: &str, hybridization: Hybridization) -> MeltingOptionsBuilder {
        MeltingOptionsBuilder::new()
            .sequence(sequence)
            .hybridization(hybridization)
            .solution("Na=1")
            .strand_concentration(0.0001)
    }

    fn environment(sequence: &str, complementary: &str, hybridization: Hybridization) -> Environment {
        let options = builder(sequence, hybridization)
            .complementary(complementary)
            .build()
            .unwrap();
        Environment::new(&options).unwrap()
    }

    fn categories(env: &Environment) -> Vec<(usize, usize, MethodCategory)> {
        segments(env)
            .unwrap()
            .into_iter()
            .map(|segment| (segment.pos1, segment.pos2, segment.category))
            .collect()
    }

    #[test]
    fn single_mismatch_splits_the_stacks() {
        let env = environment("GCAGC", "CGCCG", Hybridization::DnaDna);
        assert_eq!(
            categories(&env),
            vec![
                (0, 1, MethodCategory::NearestNeighbor),
                (2, 2, MethodCategory::SingleMismatch),
                (3, 4, MethodCategory::NearestNeighbor),
            ]
        );
    }

    #[test]
    fn five_prime_unpaired_base_is_a_dangling_end() {
        let env = environment("AGCGC", "-CGCG", Hybridization::DnaDna);
        assert_eq!(
            categories(&env),
            vec![
                (0, 0, MethodCategory::SingleDanglingEnd),
                (1, 4, MethodCategory::NearestNeighbor),
            ]
        );
    }

    #[test]
    fn inner_gap_is_a_bulge() {
        let env = environment("GCAAGC", "CG--CG", Hybridization::DnaDna);
        assert_eq!(categories(&env)[1], (2, 3, MethodCategory::LongBulgeLoop));
    }

    #[test]
    fn terminal_mismatch_has_no_method() {
        let env = environment("AGCGC", "CCGCG", Hybridization::DnaDna);
        assert!(matches!(
            segments(&env),
            Err(MeltingError::NoMethod { pos1: 0, pos2: 0, .. })
        ));
    }

    #[test]
    fn locked_acid_routes_to_its_category() {
        let env = environment("GCALGC", "CGTCG", Hybridization::DnaDna);
        assert_eq!(categories(&env)[1], (2, 2, MethodCategory::LockedAcid));
    }

    #[test]
    fn self_complementary_repeat_is_one_segment() {
        let options = builder("GCAGCAGC", Hybridization::RnaRna)
            .self_complementary(true)
            .build()
            .unwrap();
        let env = Environment::new(&options).unwrap();
        assert_eq!(categories(&env), vec![(0, 7, MethodCategory::CngRepeats)]);
    }

    #[test]
    fn long_duplexes_are_refused_only_in_default_mode() {
        let sequence = "ACGTTGCA".repeat(8);
        let options = builder(&sequence, Hybridization::DnaDna).build().unwrap();
        assert!(!is_applicable(&Environment::new(&options).unwrap()));

        let options = builder(&sequence, Hybridization::DnaDna)
            .mode(GlobalMode::NearestNeighbor)
            .build()
            .unwrap();
        assert!(is_applicable(&Environment::new(&options).unwrap()));
    }

    #[test]
    fn threshold_length_is_left_to_the_approximative_formulas() {
        let options = builder("ACGTTGCA", Hybridization::DnaDna).threshold(8).build().unwrap();
        assert!(!is_applicable(&Environment::new(&options).unwrap()));
        let options = builder("ACGTTGCA", Hybridization::DnaDna).threshold(9).build().unwrap();
        assert!(is_applicable(&Environment::new(&options).unwrap()));
    }

    #[test]
    fn self_complementary_factor_never_blocks_the_decomposition() {
        let options = builder("GGATCC", Hybridization::DnaDna)
            .self_complementary(true)
            .factor(4)
            .build()
            .unwrap();
        let env = Environment::new(&options).unwrap();
        assert_eq!(env.factor(), 1);
        assert!(is_applicable(&env));
    }

    #[test]
    fn perfect_match_sums_stacks_and_initiation() {
        let store = ParameterStore::new("unused");
        store.insert(
            "AllawiSantaLucia1997nn.toml",
            table(&[
                ("neighborAA/TT", -7900.0, -22.2),
                ("neighborAC/TG", -8400.0, -22.4),
                ("neighborCG/GC", -10600.0, -27.2),
                ("initiationper_A/T", 2300.0, 4.1),
                ("initiationper_G/C", 100.0, -2.8),
            ]),
        );
        let options = builder("AACG", Hybridization::DnaDna)
            .complementary("TTGC")
            .method(MethodCategory::IonCorrection, MethodChoice::new("san96"))
            .build()
            .unwrap();
        let mut env = Environment::new(&options).unwrap();

        run(&mut env, &Registry::standard(), &store).unwrap();

        let enthalpy = -7900.0 - 8400.0 - 10600.0 + 2300.0 + 100.0;
        let entropy = -22.2 - 22.4 - 27.2 + 4.1 - 2.8;
        assert!((env.result.enthalpy - enthalpy).abs() < 1e-9);
        assert!((env.result.entropy - entropy).abs() < 1e-9);
        let tm = enthalpy / (entropy + GAS_CONSTANT * (0.0001f64 / 4.0).ln()) - KELVIN_OFFSET;
        assert!((env.result.tm - tm).abs() < 1e-9);
        assert_eq!(env.result.mode, ComputationMode::NearestNeighbor);
        assert!(env.result.models.iter().any(|model| model == "Allawi and SantaLucia (1997)"));
    }

    #[test]
    fn missing_stack_leaves_the_result_untouched() {
        let store = ParameterStore::new("unused");
        store.insert("AllawiSantaLucia1997nn.toml", table(&[("neighborAA/TT", -7900.0, -22.2)]));
        let options = builder("AACG", Hybridization::DnaDna)
            .complementary("TTGC")
            .build()
            .unwrap();
        let mut env = Environment::new(&options).unwrap();

        let error = run(&mut env, &Registry::standard(), &store).unwrap_err();
        assert!(matches!(error, MeltingError::MissingParameter { ref key, .. } if key == "neighborAC/TG"));
        assert_eq!(env.result.enthalpy, 0.0);
        assert!(env.result.models.is_empty());
    }

    #[test]
    fn long_repeats_melt_as_a_hairpin_without_salt_correction() {
        let store = ParameterStore::new("unused");
        store.insert("Broda2005CNG.toml", table(&[("CNGrepeats5CAG", -60000.0, -170.0)]));
        let options = builder("GCAGCAGCAGCAGCAGC", Hybridization::RnaRna)
            .self_complementary(true)
            .build()
            .unwrap();
        let mut env = Environment::new(&options).unwrap();

        run(&mut env, &Registry::standard(), &store).unwrap();

        let tm = -60000.0 / -170.0 - KELVIN_OFFSET;
        assert!((env.result.tm - tm).abs() < 1e-9);
        assert_eq!(env.result.models, vec!["Broda et al. (2005)".to_string()]);
    }
}
