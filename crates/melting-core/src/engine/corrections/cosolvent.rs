use crate::engine::environment::Environment;
use tracing::warn;

/// Linear DMSO corrections `Tm − p·%DMSO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmsoCorrection {
    Ahsen01,
    Cullen76,
    Escara80,
    Musielski81,
}

impl DmsoCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            DmsoCorrection::Ahsen01 => "von Ahsen et al. (2001)",
            DmsoCorrection::Cullen76 => "Cullen and Bick (1976)",
            DmsoCorrection::Escara80 => "Escara and Hutton (1980)",
            DmsoCorrection::Musielski81 => "Musielski et al. (1981)",
        }
    }

    /// Degrees lost per percent of DMSO.
    pub fn coefficient(&self) -> f64 {
        match self {
            DmsoCorrection::Ahsen01 => 0.75,
            DmsoCorrection::Cullen76 => 0.5,
            DmsoCorrection::Escara80 => 0.675,
            DmsoCorrection::Musielski81 => 0.6,
        }
    }

    pub fn is_applicable(&self, env: &Environment) -> bool {
        if !env.hybridization().is_dna() {
            warn!(
                model = self.reference(),
                hybridization = env.hybridization().as_str(),
                "DMSO correction established for DNA duplexes"
            );
        }
        true
    }

    pub fn corrected_temperature(&self, env: &Environment) -> f64 {
        env.result.tm - self.coefficient() * env.solution().dmso
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormamideCorrection {
    /// Molar formamide, GC dependent.
    Blake96,
    /// Percent formamide, DNA only.
    Linear,
}

impl FormamideCorrection {
    pub fn reference(&self) -> &'static str {
        match self {
            FormamideCorrection::Blake96 => "Blake and Delcourt (1996)",
            FormamideCorrection::Linear => "linear formamide correction",
        }
    }

    pub fn is_applicable(&self, env: &Environment) -> bool {
        let is_dna = env.hybridization().is_dna();
        match self {
            FormamideCorrection::Blake96 => {
                if !is_dna {
                    warn!(
                        model = self.reference(),
                        hybridization = env.hybridization().as_str(),
                        "Formamide correction established for DNA duplexes"
                    );
                }
                true
            }
            FormamideCorrection::Linear => is_dna,
        }
    }

    pub fn corrected_temperature(&self, env: &Environment) -> f64 {
        let formamide = env.solution().formamide;
        match self {
            FormamideCorrection::Blake96 => {
                let f_gc = env.duplex().percent_gc() / 100.0;
                env.result.tm + (0.453 * f_gc - 2.88) * formamide
            }
            FormamideCorrection::Linear => env.result.tm - 0.65 * formamide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequences::hybridization::Hybridization;
    use crate::engine::config::MeltingOptionsBuilder;

    fn environment(hybridization: Hybridization, sequence: &str) -> Environment {
        let options = MeltingOptionsBuilder::new()
            .sequence(sequence)
            .hybridization(hybridization)
            .solution("Na=0.1:DMSO=5:formamide=2")
            .strand_concentration(0.0001)
            .build()
            .unwrap();
        let mut env = Environment::new(&options).unwrap();
        env.result.tm = 62.0;
        env
    }

    #[test]
    fn dmso_lowers_the_temperature_linearly() {
        let env = environment(Hybridization::DnaDna, "ACGGTCAT");
        assert_eq!(DmsoCorrection::Ahsen01.corrected_temperature(&env), 62.0 - 0.75 * 5.0);
        assert_eq!(DmsoCorrection::Cullen76.corrected_temperature(&env), 62.0 - 2.5);
    }

    #[test]
    fn blake_formamide_depends_on_gc_content() {
        let env = environment(Hybridization::DnaDna, "ACGGTCAT");
        let expected = 62.0 + (0.453 * 0.5 - 2.88) * 2.0;
        assert!((FormamideCorrection::Blake96.corrected_temperature(&env) - expected).abs() < 1e-12);
    }

    #[test]
    fn linear_formamide_is_dna_only() {
        let env = environment(Hybridization::RnaRna, "ACGGUCAU");
        assert!(!FormamideCorrection::Linear.is_applicable(&env));
        assert!(FormamideCorrection::Blake96.is_applicable(&env));
    }
}
