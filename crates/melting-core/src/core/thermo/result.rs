use super::term::{GAS_CONSTANT, KELVIN_OFFSET, Thermodynamics};
use std::fmt;

/// Which family of formulas produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputationMode {
    /// Nearest-neighbor decomposition; enthalpy and entropy are meaningful.
    #[default]
    NearestNeighbor,
    /// Closed-form GC%/length formula; only the temperature is meaningful.
    Approximative,
}

impl fmt::Display for ComputationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationMode::NearestNeighbor => f.write_str("nearest-neighbor"),
            ComputationMode::Approximative => f.write_str("approximative"),
        }
    }
}

/// Accumulated thermodynamics of a duplex and its melting temperature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThermoResult {
    pub enthalpy: f64,
    pub entropy: f64,
    /// Melting temperature in °C.
    pub tm: f64,
    /// Loop entropy that must not receive the ionic correction.
    pub salt_independent_entropy: f64,
    pub mode: ComputationMode,
    /// Names of the models that contributed, in the order they were applied.
    pub models: Vec<String>,
}

impl ThermoResult {
    pub fn new(mode: ComputationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn thermodynamics(&self) -> Thermodynamics {
        Thermodynamics::new(self.enthalpy, self.entropy)
    }

    pub fn add(&mut self, contribution: Thermodynamics) {
        self.enthalpy += contribution.enthalpy;
        self.entropy += contribution.entropy;
    }

    pub fn record_model(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.models.contains(&name) {
            self.models.push(name);
        }
    }

    /// `Tm = ΔH / (ΔS + R·ln(Ct / F)) − 273.15`.
    pub fn melting_temperature(&self, strand_concentration: f64, factor: f64) -> f64 {
        self.enthalpy / (self.entropy + GAS_CONSTANT * (strand_concentration / factor).ln())
            - KELVIN_OFFSET
    }

    /// Unimolecular melting: `Tm = ΔH / ΔS − 273.15`.
    pub fn hairpin_temperature(&self) -> f64 {
        self.enthalpy / self.entropy - KELVIN_OFFSET
    }

    pub fn enthalpy_in_joules(&self) -> f64 {
        self.enthalpy * 4.18
    }

    pub fn entropy_in_joules(&self) -> f64 {
        self.entropy * 4.18
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_contributions() {
        let mut result = ThermoResult::default();
        result.add(Thermodynamics::new(-7900.0, -22.2));
        result.add(Thermodynamics::new(-8500.0, -22.7));
        assert_eq!(result.thermodynamics(), Thermodynamics::new(-7900.0 + -8500.0, -22.2 + -22.7));
    }

    #[test]
    fn melting_temperature_follows_van_t_hoff() {
        let result = ThermoResult {
            enthalpy: -60000.0,
            entropy: -170.0,
            ..ThermoResult::default()
        };
        let expected = -60000.0 / (-170.0 + 1.99 * (0.0001_f64 / 4.0).ln()) - 273.15;
        assert_eq!(result.melting_temperature(0.0001, 4.0), expected);
        assert_eq!(result.hairpin_temperature(), -60000.0 / -170.0 - 273.15);
    }

    #[test]
    fn record_model_keeps_first_occurrence_only() {
        let mut result = ThermoResult::new(ComputationMode::NearestNeighbor);
        result.record_model("all97");
        result.record_model("allsanpey");
        result.record_model("all97");
        assert_eq!(result.models, vec!["all97", "allsanpey"]);
    }
}
