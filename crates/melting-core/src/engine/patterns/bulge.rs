use super::{Contribution, Params, advise_hybridization, closures, widen};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::thermo::term::{GAS_CONSTANT, Thermodynamics};
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::debug;

/// Largest bulge tabulated by SantaLucia and Hicks.
const SANTALUCIA_MAX_BULGE: f64 = 30.0;

/// Largest bulge tabulated by Lu et al.; longer bulges read the `>6` row.
const TURNER_MAX_BULGE: f64 = 6.0;

/// Temperature, in K, at which the Turner free energies are tabulated.
const TURNER_TEMPERATURE: f64 = 310.15;

/// Models for unpaired nucleotides on one strand inside the duplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulgeModel {
    SantaLucia04Single,
    Turner06Single,
    /// Whole single-bulge motifs looked up as they are.
    GenericSingle,
    SantaLucia04Long,
    Turner06Long,
}

impl BulgeModel {
    pub fn reference(&self) -> &'static str {
        match self {
            BulgeModel::SantaLucia04Single | BulgeModel::SantaLucia04Long => "SantaLucia and Hicks (2004)",
            BulgeModel::Turner06Single | BulgeModel::Turner06Long => "Lu et al. (2006)",
            BulgeModel::GenericSingle => "tabulated single bulge",
        }
    }

    pub fn is_applicable(&self, env: &Environment, _pos1: usize, _pos2: usize) -> Result<bool, MeltingError> {
        let hybridization = env.hybridization();
        let model = self.reference();
        match self {
            BulgeModel::SantaLucia04Single | BulgeModel::SantaLucia04Long => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
            }
            BulgeModel::Turner06Single | BulgeModel::Turner06Long => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
            }
            BulgeModel::GenericSingle => {}
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
        let thermo = match self {
            BulgeModel::SantaLucia04Long => santalucia(params, duplex.equivalent(Alphabet::Dna), start, end)?,
            BulgeModel::SantaLucia04Single => {
                let view = duplex.equivalent(Alphabet::Dna);
                let (top, bottom) = view.single_bulge_neighbors(start)?;
                // The long-bulge terms are read over the range widened a second time.
                let (outer_start, outer_end) = widen(view, start, end);
                santalucia(params, view, outer_start, outer_end)? + params.need(params.neighbor(&top, &bottom))?
            }
            BulgeModel::Turner06Long => turner(params, duplex.equivalent(Alphabet::Rna), start, end)?,
            BulgeModel::Turner06Single => {
                let view = duplex.equivalent(Alphabet::Rna);
                let (top, bottom) = view.single_bulge_neighbors(start)?;
                // The stack closed over the bulge keeps a wobble value when either side is G·U.
                let stack = if view.is_base_pair("G", "U", start) || view.is_base_pair("G", "U", start + 2) {
                    params.mismatch(&top, &bottom)
                } else {
                    params.neighbor(&top, &bottom)
                };
                let (outer_start, outer_end) = widen(view, start, end);
                turner(params, view, outer_start, outer_end)? + params.need(stack)?
            }
            BulgeModel::GenericSingle => {
                params.need(params.single_bulge(duplex.sequence(start, end)?, duplex.complementary(start, end)?))?
            }
        };
        debug!(
            model = self.reference(),
            start,
            end,
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "Bulge loop"
        );
        Ok(Contribution::new(thermo))
    }
}

/// Loop entropy of the bases between `start` and `end`, plus the A·T closing terms.
///
/// Both parts of each A·T closure are added to the enthalpy.
fn santalucia(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let size = end - start - 1;
    // S(n) = S(30) - 2.44·R·ln(n / 30)
    let entropy = match params.bulge_loop(&size.to_string()) {
        Ok(tabulated) => tabulated.entropy,
        Err(_) => {
            let largest = params.need(params.bulge_loop("30"))?;
            largest.entropy - 2.44 * GAS_CONSTANT * (size as f64 / SANTALUCIA_MAX_BULGE).ln()
        }
    };
    let mut total = Thermodynamics::new(0.0, entropy);

    let at = view.terminal_count("A", "T", start, end) as f64;
    if let Ok(closure) = params.closure("A", "T") {
        total.enthalpy += at * (closure.enthalpy + closure.entropy);
    }
    Ok(total)
}

/// Bulge initiation of the bases between `start` and `end`, plus the A·U and G·U closures.
fn turner(params: &Params, view: &Duplex, start: usize, end: usize) -> Result<Thermodynamics, MeltingError> {
    let size = end - start - 1;
    let initiation = match params.bulge_initiation(&size.to_string()) {
        Ok(tabulated) => tabulated,
        Err(_) => {
            // S(n) = S(>6) / 310.15 · (8.7 - 1085.5·ln(n / 6))
            let longer = params.need(params.bulge_initiation(">6"))?;
            let scale = 8.7 - 1085.5 * (size as f64 / TURNER_MAX_BULGE).ln();
            Thermodynamics::new(longer.enthalpy, longer.entropy / TURNER_TEMPERATURE * scale)
        }
    };
    Ok(initiation + closures(params, view, start, end)?)
}
