mod defaults;

pub use defaults::DefaultsConfig;

use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use melting::core::sequences::hybridization::Hybridization;
use melting::engine::config::{GlobalMode, MeltingOptions, MeltingOptionsBuilder, MethodCategory, MethodChoice};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings of a `compute` run that may come from a TOML file.
///
/// ```toml
/// hybridization = "rnarna"
/// solution = "Na=0.1:Mg=0.002"
/// concentration = 0.0001
/// data-dir = "params"
///
/// [methods]
/// sinMM = "zno08"
/// nn = ":my-stacks.toml"
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialComputeConfig {
    pub hybridization: Option<String>,
    pub solution: Option<String>,
    pub concentration: Option<f64>,
    pub factor: Option<u32>,
    pub threshold: Option<usize>,
    pub mode: Option<String>,
    #[serde(rename = "self-complementary")]
    pub self_complementary: Option<bool>,
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub methods: BTreeMap<String, String>,
}

/// A fully merged `compute` configuration.
#[derive(Debug)]
pub struct ComputeConfig {
    pub options: MeltingOptions,
    pub data_dir: Option<PathBuf>,
}

impl PartialComputeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Command-line values win over file values, which win over the defaults.
    pub fn merge_with_cli(self, args: &ComputeArgs) -> Result<ComputeConfig> {
        let defaults = DefaultsConfig::default();

        let hybridization: Hybridization = args
            .hybridization
            .as_deref()
            .or(self.hybridization.as_deref())
            .ok_or_else(|| CliError::Config("a hybridization type is required (-H)".to_string()))?
            .parse()
            .map_err(CliError::Argument)?;
        let solution = args
            .solution
            .clone()
            .or(self.solution)
            .ok_or_else(|| CliError::Config("a solution composition is required (-E)".to_string()))?;
        let concentration = args
            .concentration
            .or(self.concentration)
            .ok_or_else(|| CliError::Config("a strand concentration is required (-P)".to_string()))?;
        let mode: GlobalMode = args
            .mode
            .as_deref()
            .or(self.mode.as_deref())
            .unwrap_or(defaults.mode.as_str())
            .parse()
            .map_err(|e| CliError::Argument(format!("{}", e)))?;

        let mut builder = MeltingOptionsBuilder::new()
            .sequence(args.sequence.as_str())
            .hybridization(hybridization)
            .solution(solution)
            .strand_concentration(concentration)
            .self_complementary(args.self_complementary || self.self_complementary.unwrap_or(false))
            .factor(args.factor.or(self.factor).unwrap_or(defaults.factor))
            .threshold(args.threshold.or(self.threshold).unwrap_or(defaults.threshold))
            .mode(mode);
        if let Some(complement) = &args.complement {
            builder = builder.complementary(complement.as_str());
        }

        let mut methods = BTreeMap::new();
        for (category, choice) in &self.methods {
            let (category, choice) = parse_method(category, choice)?;
            methods.insert(category, choice);
        }
        for assignment in &args.methods {
            let (category, choice) = parse_method_assignment(assignment)?;
            methods.insert(category, choice);
        }
        for (category, choice) in methods {
            debug!("Method override: {} = {}", category, choice);
            builder = builder.method(category, choice);
        }

        let options = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(ComputeConfig {
            options,
            data_dir: args.data_dir.clone().or(self.data_dir),
        })
    }
}

/// Parses a `CATEGORY=NAME[:FILE]` override.
pub fn parse_method_assignment(raw: &str) -> Result<(MethodCategory, MethodChoice)> {
    let (category, choice) = raw
        .split_once('=')
        .ok_or_else(|| CliError::Argument(format!("'{}' is not of the form CATEGORY=NAME[:FILE]", raw)))?;
    parse_method(category, choice)
}

fn parse_method(category: &str, choice: &str) -> Result<(MethodCategory, MethodChoice)> {
    let category: MethodCategory = category
        .trim()
        .parse()
        .map_err(|e| CliError::Argument(format!("{}", e)))?;
    let choice: MethodChoice = choice.parse().map_err(|e| CliError::Argument(format!("{}", e)))?;
    Ok((category, choice))
}
