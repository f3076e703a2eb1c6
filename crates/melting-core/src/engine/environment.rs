use super::config::{ConfigError, GlobalMode, MeltingOptions, MethodCategory, MethodChoice};
use super::error::MeltingError;
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Hybridization;
use crate::core::sequences::patterns::{is_self_complementary, reversed};
use crate::core::thermo::result::{ComputationMode, ThermoResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Molar concentrations of the cations and denaturing agents in the solution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolutionComposition {
    pub na: f64,
    pub mg: f64,
    pub k: f64,
    pub tris: f64,
    pub dntp: f64,
    /// Percent DMSO.
    pub dmso: f64,
    /// Formamide, percent or molar depending on the correction.
    pub formamide: f64,
}

impl SolutionComposition {
    /// `Na + K + Tris / 2`.
    pub fn monovalent(&self) -> f64 {
        self.na + self.k + self.tris / 2.0
    }

    /// Magnesium left once dNTPs have chelated their share.
    pub fn free_magnesium(&self) -> f64 {
        self.mg - self.dntp
    }

    pub fn has_other_cations(&self) -> bool {
        self.mg > 0.0 || self.k > 0.0 || self.tris > 0.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("Na", self.na),
            ("Mg", self.mg),
            ("K", self.k),
            ("Tris", self.tris),
            ("dNTP", self.dntp),
            ("DMSO", self.dmso),
            ("formamide", self.formamide),
        ];
        if let Some((agent, value)) = values.iter().find(|(_, value)| !(*value >= 0.0)) {
            return Err(ConfigError::InvalidValue {
                option: "solution",
                reason: format!("the concentration of {} must be positive, got {}", agent, value),
            });
        }
        if self.na > 0.0 || self.k > 0.0 || self.mg > 0.0 || self.tris > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                option: "solution",
                reason: "at least one of Na, Mg, K or Tris must be strictly positive".to_string(),
            })
        }
    }
}

impl FromStr for SolutionComposition {
    type Err = ConfigError;

    /// Parses `Na=0.05:Mg=0.002:...`; agents left out are 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut composition = SolutionComposition::default();
        for entry in s.split(':').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (agent, value) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                option: "solution",
                reason: format!("'{}' is not written Name=value", entry),
            })?;
            let value: f64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                option: "solution",
                reason: format!("'{}' is not a numeric concentration", value),
            })?;
            let slot = match agent.trim() {
                "Na" | "na" => &mut composition.na,
                "Mg" | "mg" => &mut composition.mg,
                "K" | "k" => &mut composition.k,
                "Tris" | "tris" => &mut composition.tris,
                "dNTP" | "dntp" => &mut composition.dntp,
                "DMSO" | "dmso" => &mut composition.dmso,
                "formamide" | "Formamide" => &mut composition.formamide,
                other => {
                    return Err(ConfigError::InvalidValue {
                        option: "solution",
                        reason: format!(
                            "unknown agent '{}'; expected Na, Mg, K, Tris, dNTP, DMSO or formamide",
                            other
                        ),
                    });
                }
            };
            *slot = value;
        }
        composition.validate()?;
        Ok(composition)
    }
}

impl fmt::Display for SolutionComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Na={}:Mg={}:K={}:Tris={}:dNTP={}:DMSO={}:formamide={}",
            self.na, self.mg, self.k, self.tris, self.dntp, self.dmso, self.formamide
        )
    }
}

/// Everything one computation reads and accumulates into.
///
/// The duplex is oriented with the DNA (or unmodified) strand on top for
/// `rnadna` and `rnamrna` inputs.
#[derive(Debug, Clone)]
pub struct Environment {
    duplex: Duplex,
    hybridization: Hybridization,
    solution: SolutionComposition,
    strand_concentration: f64,
    self_complementary: bool,
    factor: u32,
    threshold: usize,
    mode: GlobalMode,
    methods: BTreeMap<MethodCategory, MethodChoice>,
    pub result: ThermoResult,
}

impl Environment {
    pub fn new(options: &MeltingOptions) -> Result<Self, MeltingError> {
        options.solution.validate()?;

        let detected = is_self_complementary(&options.sequence)?
            && is_self_complementary(&options.complementary)?;
        let self_complementary = options.self_complementary || detected;
        let factor = if self_complementary { 1 } else { options.factor };

        let duplex = if options.hybridization.is_reversed() {
            Duplex::new(&reversed(&options.complementary), &reversed(&options.sequence))?
        } else {
            Duplex::new(&options.sequence, &options.complementary)?
        };
        debug!(
            sequence = duplex.full_sequence(),
            complementary = duplex.full_complementary(),
            length = duplex.len(),
            self_complementary,
            "Duplex encoded"
        );

        Ok(Self {
            duplex,
            hybridization: options.hybridization,
            solution: options.solution,
            strand_concentration: options.strand_concentration,
            self_complementary,
            factor,
            threshold: options.threshold,
            mode: options.mode,
            methods: options.methods.clone(),
            result: ThermoResult::new(ComputationMode::NearestNeighbor),
        })
    }

    pub fn duplex(&self) -> &Duplex {
        &self.duplex
    }

    pub fn hybridization(&self) -> Hybridization {
        self.hybridization
    }

    pub fn solution(&self) -> &SolutionComposition {
        &self.solution
    }

    pub fn solution_mut(&mut self) -> &mut SolutionComposition {
        &mut self.solution
    }

    pub fn strand_concentration(&self) -> f64 {
        self.strand_concentration
    }

    pub fn is_self_complementary(&self) -> bool {
        self.self_complementary
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn mode(&self) -> GlobalMode {
        self.mode
    }

    pub fn method(&self, category: MethodCategory) -> Option<&MethodChoice> {
        self.methods.get(&category)
    }

    /// `Tm = ΔH / (ΔS + R·ln(Ct / F)) − 273.15` on the accumulated result.
    pub fn melting_temperature(&self) -> f64 {
        self.result
            .melting_temperature(self.strand_concentration, f64::from(self.factor))
    }
}
