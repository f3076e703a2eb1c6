use crate::cli::SodiumEquivalentArgs;
use crate::config::{DefaultsConfig, parse_method_assignment};
use crate::error::{CliError, Result};
use melting::engine::config::{MethodCategory, MethodChoice};
use melting::engine::environment::SolutionComposition;
use melting::engine::registry::Registry;
use melting::workflows;
use tracing::info;

pub fn run(args: SodiumEquivalentArgs) -> Result<()> {
    let solution: SolutionComposition = args
        .solution
        .parse()
        .map_err(|e| CliError::Config(format!("{}", e)))?;
    let choice = resolve_choice(args.method.as_deref())?;
    info!("Computing the sodium equivalent of {} with '{}'", solution, choice);

    let na_eq = workflows::melting::sodium_equivalent(&solution, Some(&choice), &Registry::standard())?;
    println!("Sodium equivalent: {:.6e} M ({})", na_eq, choice.name);
    Ok(())
}

fn resolve_choice(method: Option<&str>) -> Result<MethodChoice> {
    let Some(raw) = method else {
        return Ok(MethodChoice::new(DefaultsConfig::default().sodium_equivalent));
    };
    let (category, choice) = parse_method_assignment(raw)?;
    if category != MethodCategory::SodiumEquivalent {
        return Err(CliError::Argument(format!(
            "'{}' selects a {} model; only naeq is accepted here",
            raw, category
        )));
    }
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_choice_is_von_ahsen() {
        assert_eq!(resolve_choice(None).unwrap(), MethodChoice::new("ahs01"));
        assert_eq!(resolve_choice(Some("naeq=mit96")).unwrap(), MethodChoice::new("mit96"));
    }

    #[test]
    fn other_categories_are_rejected() {
        assert!(matches!(resolve_choice(Some("nn=san04")), Err(CliError::Argument(_))));
    }

    #[test]
    fn unknown_models_surface_as_core_errors() {
        let args = SodiumEquivalentArgs {
            solution: "Na=0.05:Mg=0.002".to_string(),
            method: Some("naeq=nope".to_string()),
        };
        assert!(matches!(run(args), Err(CliError::Core(_))));
    }

    #[test]
    fn malformed_solutions_are_configuration_errors() {
        let args = SodiumEquivalentArgs {
            solution: "Na=0.05:Xe=1".to_string(),
            method: None,
        };
        assert!(matches!(run(args), Err(CliError::Config(_))));
    }
}
