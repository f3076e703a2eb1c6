use super::{Contribution, Params, advise_hybridization, closures, widen};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::thermo::term::{GAS_CONSTANT, Thermodynamics};
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

/// Loops longer than this keep their loop entropy out of the ionic correction.
const SALT_DEPENDENT_LOOP_LENGTH: usize = 4;

/// Largest loop tabulated by SantaLucia and Hicks.
const SANTALUCIA_MAX_LOOP: f64 = 30.0;

/// Largest loop tabulated by Lu et al.; longer loops read the `>6` row.
const TURNER_MAX_LOOP: f64 = 6.0;

/// Temperature, in K, at which the Turner free energies are tabulated.
const TURNER_TEMPERATURE: f64 = 310.15;

/// Models for internal loops of at least two unpaired nucleotides per strand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalLoopModel {
    SantaLucia04,
    Turner06,
    /// 1×2 loops only.
    Znosko07,
}

impl InternalLoopModel {
    pub fn reference(&self) -> &'static str {
        match self {
            InternalLoopModel::SantaLucia04 => "SantaLucia and Hicks (2004)",
            InternalLoopModel::Turner06 => "Lu et al. (2006)",
            InternalLoopModel::Znosko07 => "Badhwar et al. (2007)",
        }
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        let duplex = env.duplex();
        let hybridization = env.hybridization();
        let model = self.reference();
        let (start, end) = widen(duplex, pos1, pos2);
        match self {
            InternalLoopModel::SantaLucia04 => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
                if duplex.internal_loop_length(start, end) == 2 {
                    warn!(model, pos1, pos2, "Internal loop parameters do not cover single mismatches");
                    return Ok(false);
                }
            }
            InternalLoopModel::Turner06 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                if duplex.internal_loop_sizes(start, end) == (3, 3) && duplex.is_base_pair("A", "G", start + 2) {
                    warn!(model, pos1, pos2, "3x3 loops with a middle G·A pair are excluded from the parameter set");
                    return Ok(false);
                }
            }
            InternalLoopModel::Znosko07 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                if duplex.internal_loop_type(start, end)? != "1x2" {
                    warn!(model, pos1, pos2, "Parameters are established for 1x2 internal loops only");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    pub fn compute(
        &self,
        params: &Params,
        duplex: &Duplex,
        pos1: usize,
        pos2: usize,
    ) -> Result<Contribution, MeltingError> {
        let (start, end) = widen(duplex, pos1, pos2);
        let contribution = match self {
            InternalLoopModel::SantaLucia04 => santalucia(params, duplex.equivalent(Alphabet::Dna), start, end)?,
            InternalLoopModel::Turner06 => turner(params, duplex.equivalent(Alphabet::Rna), start, end)?,
            InternalLoopModel::Znosko07 => znosko(params, duplex.equivalent(Alphabet::Rna), start, end)?,
        };
        debug!(
            model = self.reference(),
            start,
            end,
            enthalpy = contribution.thermo.enthalpy,
            entropy = contribution.thermo.entropy,
            salt_independent_entropy = contribution.salt_independent_entropy,
            "Internal loop"
        );
        Ok(contribution)
    }
}

/// Loop terms whose entropy escapes the ionic correction once the loop is long enough.
#[derive(Debug, Default)]
struct LoopTerms {
    length: usize,
    contribution: Contribution,
}

impl LoopTerms {
    fn new(length: usize) -> Self {
        Self {
            length,
            contribution: Contribution::default(),
        }
    }

    fn add_stack(&mut self, thermo: Thermodynamics) {
        self.contribution.thermo += thermo;
    }

    fn add_loop(&mut self, thermo: Thermodynamics) {
        if self.length > SALT_DEPENDENT_LOOP_LENGTH {
            self.contribution.thermo.enthalpy += thermo.enthalpy;
            self.contribution.salt_independent_entropy += thermo.entropy;
        } else {
            self.contribution.thermo += thermo;
        }
    }
}

fn santalucia(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Contribution, MeltingError> {
    let mut terms = LoopTerms::new(view.internal_loop_length(start, end));
    for pos in [start, end - 1] {
        let (top, bottom) = view.nn_pair(pos)?;
        terms.add_stack(params.need(params.mismatch(top, bottom))?);
    }

    let size = terms.length.to_string();
    // S(n) = S(30) + 2.44·R·ln(n / 30)
    let entropy = match params.internal_loop(&size) {
        Ok(tabulated) => tabulated.entropy,
        Err(_) => {
            let largest = params.need(params.internal_loop("30"))?;
            largest.entropy + 2.44 * GAS_CONSTANT * (terms.length as f64 / SANTALUCIA_MAX_LOOP).ln()
        }
    };
    terms.add_loop(Thermodynamics::new(0.0, entropy));

    if view.is_asymmetric_internal_loop(start, end) {
        terms.add_loop(params.need(params.asymmetry())?);
    }
    Ok(terms.contribution)
}

fn turner(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Contribution, MeltingError> {
    let mut terms = LoopTerms::new(view.internal_loop_length(start, end));
    let size = terms.length.to_string();
    let initiation = match params.loop_initiation(&size) {
        Ok(tabulated) => tabulated,
        Err(_) => {
            // The size-6 row must exist even though the value comes from the `>6` row.
            params.need(params.loop_initiation("6"))?;
            let longer = params.need(params.loop_initiation(">6"))?;
            let penalty = 1.08 * (terms.length as f64 / TURNER_MAX_LOOP).ln() / TURNER_TEMPERATURE;
            Thermodynamics::new(longer.enthalpy, longer.entropy - penalty)
        }
    };
    terms.add_loop(initiation);
    terms.add_stack(closures(params, view, start, end)?);

    let (top_size, bottom_size) = view.internal_loop_sizes(start, end);
    let asymmetry = top_size.abs_diff(bottom_size);
    if asymmetry > 0 {
        terms.add_loop(params.need(params.asymmetry())? * asymmetry as f64);
    }

    let loop_type = view.internal_loop_type(start, end)?;
    if loop_type != "1xn_n>2" {
        let (top, bottom) = view.loop_first_mismatch(start)?;
        let lookup = match (&top[1..], &bottom[1..]) {
            (first @ ("G" | "U"), second) if first == second => params.first_mismatch(first, second, &loop_type),
            _ => params.first_mismatch(&top, &bottom, &loop_type),
        };
        terms.add_stack(lookup.unwrap_or_default());
    }
    Ok(terms.contribution)
}

fn znosko(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Contribution, MeltingError> {
    let mut total = params.need(params.loop_initiation_unsized())?;
    let first_mismatch = if view.is_base_pair("G", "A", start + 1) {
        params.first_mismatch("A", "G_not_RA/YG", "1x2")
    } else {
        let (top, bottom) = view.loop_first_mismatch(start)?;
        params.first_mismatch(&top, &bottom, "1x2")
    };
    total += first_mismatch.unwrap_or_default();
    total += closures(params, view, start, end)?;
    Ok(Contribution::new(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::patterns::test_support::{close, environment, table};

    #[test]
    fn santalucia_short_loop_keeps_entropy_salt_dependent() {
        let table = table(&[
            ("mismatchCA/GC", 100.0, 1.0),
            ("mismatchAG/CC", 200.0, 2.0),
            ("mismatchsize4", 0.0, -10.0),
        ]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAAGC", "CGCCCG").unwrap();
        let loop_ = InternalLoopModel::SantaLucia04.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(loop_.thermo, 300.0, 3.0 - 10.0));
        assert_eq!(loop_.salt_independent_entropy, 0.0);
    }

    #[test]
    fn santalucia_long_loop_grows_from_the_size_30_entry() {
        let mut entries = vec![("mismatchsize30", 0.0, -30.0), ("asymmetry", 0.0, -1.0)];
        entries.extend([("mismatchCA/GC", 0.0, 0.0), ("mismatchAG/-C", 0.0, 0.0)]);
        let table = table(&entries);
        let params = Params::new(&table, "test");
        let top = format!("GC{}GC", "A".repeat(20));
        let bottom = format!("CG{}{}CG", "C".repeat(19), "-");
        let duplex = Duplex::new(&top, &bottom).unwrap();
        let loop_ = InternalLoopModel::SantaLucia04.compute(&params, &duplex, 2, 21).unwrap();
        // S(39) = S(30) + 2.44 x 1.99 x ln(39 / 30), then the asymmetry term.
        let expected = -30.0 + 2.44 * 1.99 * (39.0f64 / 30.0).ln() - 1.0;
        assert!((loop_.salt_independent_entropy - expected).abs() < 1e-9);
        assert!((loop_.salt_independent_entropy - -29.72606407745165).abs() < 1e-9);
        assert_eq!(loop_.thermo.entropy, 0.0);
    }

    #[test]
    fn turner_loop_beyond_six_reads_the_open_ended_row() {
        let table = table(&[
            ("mismatchinitiationsize6", 2000.0, -7.0),
            ("mismatchinitiationsize>6", 0.0, -10.0),
        ]);
        let params = Params::new(&table, "test");
        // Four against four, closed by G·C pairs on both sides.
        let duplex = Duplex::new("GCAAAAGC", "CGCCCCCG").unwrap();
        let loop_ = InternalLoopModel::Turner06.compute(&params, &duplex, 2, 5).unwrap();
        let expected = -10.0 - 1.08 * (8.0f64 / 6.0).ln() / 310.15;
        assert!((loop_.salt_independent_entropy - expected).abs() < 1e-12);
        assert!((loop_.salt_independent_entropy - -10.0010018).abs() < 1e-7);
        assert_eq!(loop_.thermo.enthalpy, 0.0);
    }

    #[test]
    fn turner_loop_beyond_six_needs_the_size_six_row() {
        let table = table(&[("mismatchinitiationsize>6", 0.0, -10.0)]);
        let params = Params::new(&table, "test");
        let duplex = Duplex::new("GCAAAAGC", "CGCCCCCG").unwrap();
        let error = InternalLoopModel::Turner06.compute(&params, &duplex, 2, 5).unwrap_err();
        assert!(matches!(error, MeltingError::MissingParameter { ref key, .. } if key == "mismatchinitiationsize6"));
    }

    #[test]
    fn turner_counts_asymmetry_per_unpaired_base() {
        let table = table(&[
            ("mismatchinitiationsize3", 1000.0, -1.0),
            ("asymmetry", 600.0, 1.0),
            ("closureper_A/U", 300.0, 0.5),
        ]);
        let params = Params::new(&table, "test");
        // One A against two C, closed by A·U and G·C: a 1x2 loop.
        let duplex = Duplex::new("GAA-GC", "CUCCCG").unwrap();
        let loop_ = InternalLoopModel::Turner06.compute(&params, &duplex, 2, 3).unwrap();
        assert!(close(loop_.thermo, 1000.0 + 600.0 + 300.0, -1.0 + 1.0 + 0.5));
    }

    #[test]
    fn znosko_requires_a_1x2_loop() {
        let env = environment("GAA-GC", "CUCCCG", Hybridization::RnaRna);
        assert!(InternalLoopModel::Znosko07.is_applicable(&env, 2, 3).unwrap());
        let env = environment("GAAAGC", "CUCCCG", Hybridization::RnaRna);
        assert!(!InternalLoopModel::Znosko07.is_applicable(&env, 2, 3).unwrap());
    }

    #[test]
    fn santalucia_refuses_single_mismatches() {
        let env = environment("GCAGC", "CGCCG", Hybridization::DnaDna);
        assert!(!InternalLoopModel::SantaLucia04.is_applicable(&env, 2, 2).unwrap());
    }
}
