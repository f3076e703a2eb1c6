use crate::cli::ComputeArgs;
use crate::config::PartialComputeConfig;
use crate::error::Result;
use melting::core::params::store::ParameterStore;
use melting::core::thermo::result::{ComputationMode, ThermoResult};
use melting::engine::config::MeltingOptions;
use melting::engine::registry::Registry;
use melting::workflows;
use std::fmt::Write;
use tracing::info;

pub fn run(args: ComputeArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            PartialComputeConfig::from_file(path)?
        }
        None => PartialComputeConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let store = match &config.data_dir {
        Some(dir) => ParameterStore::new(dir),
        None => ParameterStore::bundled(),
    };
    info!("Reading parameter files from {:?}", store.data_dir());

    let registry = Registry::standard();
    let result = workflows::melting::compute(&config.options, &registry, &store)?;
    info!("Workflow finished after {} parameter file(s) were parsed.", store.parse_count());

    print!("{}", render_report(&config.options, &result));
    Ok(())
}

fn render_report(options: &MeltingOptions, result: &ThermoResult) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Sequence:      5'-{}-3'", options.sequence);
    let _ = writeln!(report, "Complementary: 3'-{}-5'", options.complementary);
    let _ = writeln!(report, "Hybridization: {}", options.hybridization);
    let _ = writeln!(report, "Solution:      {}", options.solution);
    let _ = writeln!(report, "Mode:          {}", result.mode);
    if result.mode == ComputationMode::NearestNeighbor {
        let _ = writeln!(
            report,
            "Enthalpy:      {:.0} cal/mol ({:.2} kJ/mol)",
            result.enthalpy,
            result.enthalpy_in_joules() / 1000.0
        );
        let _ = writeln!(
            report,
            "Entropy:       {:.2} cal/mol/K ({:.2} J/mol/K)",
            result.entropy,
            result.entropy_in_joules()
        );
    }
    let _ = writeln!(report, "Melting temperature: {:.2} °C", result.tm);
    let _ = writeln!(report, "Models:");
    for model in &result.models {
        let _ = writeln!(report, "  - {}", model);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use melting::core::sequences::hybridization::Hybridization;
    use melting::engine::config::MeltingOptionsBuilder;
    use std::fs;

    const STACKS: &str = r#"
[parameters]
"neighborAA/TT" = { enthalpy = -7900.0, entropy = -22.2 }
"neighborAC/TG" = { enthalpy = -8400.0, entropy = -22.4 }
"neighborCG/GC" = { enthalpy = -10600.0, entropy = -27.2 }
"initiationper_A/T" = { enthalpy = 2300.0, entropy = 4.1 }
"initiationper_G/C" = { enthalpy = 100.0, entropy = -2.8 }
"#;

    fn args(sequence: &str, complement: &str) -> ComputeArgs {
        ComputeArgs {
            sequence: sequence.to_string(),
            complement: Some(complement.to_string()),
            hybridization: Some("dnadna".to_string()),
            solution: Some("Na=1".to_string()),
            concentration: Some(0.0001),
            ..Default::default()
        }
    }

    #[test]
    fn computes_with_a_custom_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("AllawiSantaLucia1997nn.toml"), STACKS).unwrap();

        let mut args = args("AACG", "TTGC");
        args.data_dir = Some(dir.path().to_path_buf());
        assert!(run(args).is_ok());
    }

    #[test]
    fn missing_parameter_file_is_a_core_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args("AACG", "TTGC");
        args.data_dir = Some(dir.path().to_path_buf());
        assert!(matches!(run(args), Err(CliError::Core(_))));
    }

    #[test]
    fn report_lists_thermodynamics_only_for_nearest_neighbor_results() {
        let options = MeltingOptionsBuilder::new()
            .sequence("AACG")
            .complementary("TTGC")
            .hybridization(Hybridization::DnaDna)
            .solution("Na=1")
            .strand_concentration(0.0001)
            .build()
            .unwrap();
        let mut result = ThermoResult::new(ComputationMode::NearestNeighbor);
        result.enthalpy = -24500.0;
        result.entropy = -70.5;
        result.tm = 12.3456;
        result.record_model("Allawi and SantaLucia (1997)");

        let report = render_report(&options, &result);
        assert!(report.contains("Enthalpy:      -24500 cal/mol"));
        assert!(report.contains("Entropy:       -70.50 cal/mol/K"));
        assert!(report.contains("Melting temperature: 12.35 °C"));
        assert!(report.contains("  - Allawi and SantaLucia (1997)"));

        result.mode = ComputationMode::Approximative;
        let report = render_report(&options, &result);
        assert!(!report.contains("Enthalpy"));
        assert!(report.contains("Mode:          approximative"));
    }
}
