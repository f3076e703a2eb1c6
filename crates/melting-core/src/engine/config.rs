use super::environment::SolutionComposition;
use crate::core::sequences::hybridization::Hybridization;
use crate::core::sequences::patterns::{complementary_sequence, is_self_complementary, reversed};
use crate::core::sequences::token::check_sequence;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_THRESHOLD: usize = 60;
pub const DEFAULT_FACTOR: u32 = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {option}: {reason}")]
    InvalidValue { option: &'static str, reason: String },

    #[error("Unknown method category '{0}'")]
    UnknownCategory(String),
}

/// The kinds of structure or correction a model can be chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodCategory {
    NearestNeighbor,
    SingleMismatch,
    Wobble,
    TandemMismatch,
    InternalLoop,
    SingleDanglingEnd,
    SecondDanglingEnd,
    LongDanglingEnd,
    SingleBulgeLoop,
    LongBulgeLoop,
    CngRepeats,
    Inosine,
    Hydroxyadenine,
    Azobenzene,
    LockedAcid,
    Approximative,
    IonCorrection,
    SodiumEquivalent,
    Dmso,
    Formamide,
}

impl MethodCategory {
    pub const ALL: [MethodCategory; 20] = [
        MethodCategory::NearestNeighbor,
        MethodCategory::SingleMismatch,
        MethodCategory::Wobble,
        MethodCategory::TandemMismatch,
        MethodCategory::InternalLoop,
        MethodCategory::SingleDanglingEnd,
        MethodCategory::SecondDanglingEnd,
        MethodCategory::LongDanglingEnd,
        MethodCategory::SingleBulgeLoop,
        MethodCategory::LongBulgeLoop,
        MethodCategory::CngRepeats,
        MethodCategory::Inosine,
        MethodCategory::Hydroxyadenine,
        MethodCategory::Azobenzene,
        MethodCategory::LockedAcid,
        MethodCategory::Approximative,
        MethodCategory::IonCorrection,
        MethodCategory::SodiumEquivalent,
        MethodCategory::Dmso,
        MethodCategory::Formamide,
    ];

    /// Short option name of the category, as written on the command line.
    pub fn option_name(&self) -> &'static str {
        match self {
            MethodCategory::NearestNeighbor => "nn",
            MethodCategory::SingleMismatch => "sinMM",
            MethodCategory::Wobble => "GU",
            MethodCategory::TandemMismatch => "tan",
            MethodCategory::InternalLoop => "intLP",
            MethodCategory::SingleDanglingEnd => "sinDE",
            MethodCategory::SecondDanglingEnd => "secDE",
            MethodCategory::LongDanglingEnd => "lonDE",
            MethodCategory::SingleBulgeLoop => "sinBU",
            MethodCategory::LongBulgeLoop => "lonBU",
            MethodCategory::CngRepeats => "CNG",
            MethodCategory::Inosine => "ino",
            MethodCategory::Hydroxyadenine => "ha",
            MethodCategory::Azobenzene => "azo",
            MethodCategory::LockedAcid => "lck",
            MethodCategory::Approximative => "am",
            MethodCategory::IonCorrection => "ion",
            MethodCategory::SodiumEquivalent => "naeq",
            MethodCategory::Dmso => "DMSO",
            MethodCategory::Formamide => "for",
        }
    }
}

impl fmt::Display for MethodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

impl FromStr for MethodCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim_start_matches('-');
        MethodCategory::ALL
            .into_iter()
            .find(|category| category.option_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// A model name with an optional replacement parameter file, written `name[:file]`.
///
/// An empty name (`:file`) keeps the default model of the category and only
/// swaps its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodChoice {
    pub name: String,
    pub file: Option<String>,
}

impl MethodChoice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: None,
        }
    }

    pub fn with_file(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: Some(file.into()),
        }
    }
}

impl fmt::Display for MethodChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", self.name, file),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for MethodChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((_, "")) => Err(ConfigError::InvalidValue {
                option: "method",
                reason: format!("'{}' names no parameter file after ':'", s),
            }),
            Some((name, file)) => Ok(MethodChoice::with_file(name, file)),
            None if s.is_empty() => Err(ConfigError::InvalidValue {
                option: "method",
                reason: "the method name is empty".to_string(),
            }),
            None => Ok(MethodChoice::new(s)),
        }
    }
}

/// How the computation family is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalMode {
    /// Nearest-neighbor up to the threshold length, approximative beyond.
    #[default]
    Default,
    Approximative,
    NearestNeighbor,
}

impl FromStr for GlobalMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "def" | "default" => Ok(GlobalMode::Default),
            "A" | "a" | "approximative" => Ok(GlobalMode::Approximative),
            "NN" | "nn" | "nearest-neighbor" => Ok(GlobalMode::NearestNeighbor),
            other => Err(ConfigError::InvalidValue {
                option: "mode",
                reason: format!("'{}' is not one of def, A or NN", other),
            }),
        }
    }
}

/// Default model of each category for a hybridization type.
///
/// The ion correction has no default entry; it is selected from the solution.
pub fn default_methods(hybridization: Hybridization) -> Vec<(MethodCategory, &'static str)> {
    use MethodCategory::*;
    let mut methods = match hybridization {
        Hybridization::DnaDna => vec![
            (NearestNeighbor, "all97"),
            (SingleMismatch, "allsanpey"),
            (TandemMismatch, "allsanpey"),
            (InternalLoop, "san04"),
            (SingleDanglingEnd, "bom00"),
            (SecondDanglingEnd, "sugdna02"),
            (LongDanglingEnd, "sugdna02"),
            (SingleBulgeLoop, "san04"),
            (LongBulgeLoop, "san04"),
            (Inosine, "san05"),
            (Hydroxyadenine, "sug01"),
            (Azobenzene, "asa05"),
            (LockedAcid, "mct04"),
            (Approximative, "wetdna91"),
        ],
        Hybridization::RnaRna => vec![
            (NearestNeighbor, "xia98"),
            (SingleMismatch, "zno07"),
            (Wobble, "tur99"),
            (TandemMismatch, "tur06"),
            (InternalLoop, "tur06"),
            (SingleDanglingEnd, "ser08"),
            (SecondDanglingEnd, "ser06"),
            (LongDanglingEnd, "sugrna02"),
            (SingleBulgeLoop, "tur06"),
            (LongBulgeLoop, "tur06"),
            (CngRepeats, "bro05"),
            (Inosine, "zno07"),
            (Approximative, "wetrna91"),
        ],
        Hybridization::DnaRna | Hybridization::RnaDna => vec![
            (NearestNeighbor, "sug95"),
            (SingleMismatch, "wat11"),
            (Approximative, "wetdnarna91"),
        ],
        Hybridization::MrnaRna | Hybridization::RnaMrna => vec![(NearestNeighbor, "tur06")],
    };
    methods.extend([
        (SodiumEquivalent, "ahs01"),
        (Dmso, "ahs01"),
        (Formamide, "bla96"),
    ]);
    methods
}

/// Validated options of one melting computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltingOptions {
    /// Sequence strand, 5'→3', upper case.
    pub sequence: String,
    /// Complementary strand, 3'→5', upper case.
    pub complementary: String,
    pub hybridization: Hybridization,
    pub solution: SolutionComposition,
    /// Strand concentration in mol/L.
    pub strand_concentration: f64,
    pub self_complementary: bool,
    pub factor: u32,
    pub threshold: usize,
    pub mode: GlobalMode,
    pub methods: BTreeMap<MethodCategory, MethodChoice>,
}

impl MeltingOptions {
    pub fn method(&self, category: MethodCategory) -> Option<&MethodChoice> {
        self.methods.get(&category)
    }
}

#[derive(Default)]
pub struct MeltingOptionsBuilder {
    sequence: Option<String>,
    complementary: Option<String>,
    hybridization: Option<Hybridization>,
    solution: Option<String>,
    strand_concentration: Option<f64>,
    self_complementary: bool,
    factor: Option<u32>,
    threshold: Option<usize>,
    mode: Option<GlobalMode>,
    methods: Vec<(MethodCategory, MethodChoice)>,
}

impl MeltingOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }
    pub fn complementary(mut self, complementary: impl Into<String>) -> Self {
        self.complementary = Some(complementary.into());
        self
    }
    pub fn hybridization(mut self, hybridization: Hybridization) -> Self {
        self.hybridization = Some(hybridization);
        self
    }
    pub fn solution(mut self, composition: impl Into<String>) -> Self {
        self.solution = Some(composition.into());
        self
    }
    pub fn strand_concentration(mut self, concentration: f64) -> Self {
        self.strand_concentration = Some(concentration);
        self
    }
    pub fn self_complementary(mut self, flag: bool) -> Self {
        self.self_complementary = flag;
        self
    }
    pub fn factor(mut self, factor: u32) -> Self {
        self.factor = Some(factor);
        self
    }
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = Some(threshold);
        self
    }
    pub fn mode(mut self, mode: GlobalMode) -> Self {
        self.mode = Some(mode);
        self
    }
    /// Overrides the model of one category; later calls win.
    pub fn method(mut self, category: MethodCategory, choice: MethodChoice) -> Self {
        self.methods.push((category, choice));
        self
    }

    pub fn build(self) -> Result<MeltingOptions, ConfigError> {
        let hybridization = self
            .hybridization
            .ok_or(ConfigError::MissingParameter("hybridization"))?;

        let sequence = self
            .sequence
            .ok_or(ConfigError::MissingParameter("sequence"))?
            .trim()
            .to_ascii_uppercase();
        check_sequence(&sequence).map_err(|e| ConfigError::InvalidValue {
            option: "sequence",
            reason: e.to_string(),
        })?;

        let strand_concentration = self
            .strand_concentration
            .ok_or(ConfigError::MissingParameter("strand_concentration"))?;
        if !(strand_concentration > 0.0) {
            return Err(ConfigError::InvalidValue {
                option: "strand_concentration",
                reason: format!("{} is not strictly positive", strand_concentration),
            });
        }

        let solution: SolutionComposition = self
            .solution
            .ok_or(ConfigError::MissingParameter("solution"))?
            .parse()?;

        let mut self_complementary = self.self_complementary;
        let mut factor = if self_complementary {
            1
        } else {
            self.factor.unwrap_or(DEFAULT_FACTOR)
        };

        let complementary = match self.complementary {
            Some(complementary) => {
                let complementary = complementary.trim().to_ascii_uppercase();
                check_sequence(&complementary).map_err(|e| ConfigError::InvalidValue {
                    option: "complementary",
                    reason: e.to_string(),
                })?;
                complementary
            }
            None => {
                let needs_complementary = (sequence.contains('I') && !self_complementary)
                    || sequence.contains("A*");
                if needs_complementary {
                    return Err(ConfigError::MissingParameter("complementary"));
                }
                let palindromic = is_self_complementary(&sequence).map_err(|e| {
                    ConfigError::InvalidValue {
                        option: "sequence",
                        reason: e.to_string(),
                    }
                })?;
                if palindromic || self_complementary {
                    self_complementary = true;
                    factor = 1;
                    reversed(&sequence)
                } else {
                    complementary_sequence(&sequence, hybridization)
                }
            }
        };

        let mut methods: BTreeMap<MethodCategory, MethodChoice> = default_methods(hybridization)
            .into_iter()
            .map(|(category, name)| (category, MethodChoice::new(name)))
            .collect();
        for (category, choice) in self.methods {
            let choice = if choice.name.is_empty() {
                let default = methods.get(&category).ok_or_else(|| ConfigError::InvalidValue {
                    option: "method",
                    reason: format!(
                        "no default {} model exists for {} to attach the file '{}' to",
                        category,
                        hybridization,
                        choice.file.as_deref().unwrap_or_default()
                    ),
                })?;
                MethodChoice {
                    name: default.name.clone(),
                    file: choice.file,
                }
            } else {
                choice
            };
            methods.insert(category, choice);
        }

        Ok(MeltingOptions {
            sequence,
            complementary,
            hybridization,
            solution,
            strand_concentration,
            self_complementary,
            factor,
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
            mode: self.mode.unwrap_or_default(),
            methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna_builder(sequence: &str) -> MeltingOptionsBuilder {
        MeltingOptionsBuilder::new()
            .sequence(sequence)
            .hybridization(Hybridization::DnaDna)
            .solution("Na=0.05")
            .strand_concentration(0.0001)
    }

    #[test]
    fn build_fills_defaults_for_the_hybridization() {
        let options = dna_builder("acgtcatg").build().unwrap();
        assert_eq!(options.sequence, "ACGTCATG");
        assert_eq!(options.complementary, "TGCAGTAC");
        assert_eq!(options.factor, DEFAULT_FACTOR);
        assert_eq!(options.threshold, DEFAULT_THRESHOLD);
        assert_eq!(options.mode, GlobalMode::Default);
        assert_eq!(options.method(MethodCategory::NearestNeighbor), Some(&MethodChoice::new("all97")));
        assert!(options.method(MethodCategory::IonCorrection).is_none());
    }

    #[test]
    fn palindromic_sequence_becomes_self_complementary() {
        let options = dna_builder("ACGCGT").build().unwrap();
        assert!(options.self_complementary);
        assert_eq!(options.factor, 1);
        assert_eq!(options.complementary, "TGCGCA");
    }

    #[test]
    fn missing_required_options_are_reported_by_name() {
        let result = MeltingOptionsBuilder::new()
            .sequence("ACGT")
            .hybridization(Hybridization::DnaDna)
            .solution("Na=1")
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("strand_concentration")));

        let result = dna_builder("AA*CG").build();
        assert_eq!(result, Err(ConfigError::MissingParameter("complementary")));
    }

    #[test]
    fn file_only_override_keeps_the_default_model() {
        let options = dna_builder("ACGTCATG")
            .method(MethodCategory::NearestNeighbor, ":custom.toml".parse().unwrap())
            .build()
            .unwrap();
        assert_eq!(
            options.method(MethodCategory::NearestNeighbor),
            Some(&MethodChoice::with_file("all97", "custom.toml"))
        );
    }

    #[test]
    fn categories_parse_from_option_names() {
        assert_eq!("-sinMM".parse::<MethodCategory>(), Ok(MethodCategory::SingleMismatch));
        assert_eq!("dmso".parse::<MethodCategory>(), Ok(MethodCategory::Dmso));
        assert!("nope".parse::<MethodCategory>().is_err());
        assert_eq!("NN".parse::<GlobalMode>(), Ok(GlobalMode::NearestNeighbor));
    }

    #[test]
    fn non_positive_concentration_is_rejected() {
        let result = dna_builder("ACGT").strand_concentration(0.0).build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { option: "strand_concentration", .. })));
    }
}
