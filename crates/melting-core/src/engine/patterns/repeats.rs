use super::{Contribution, Params, advise_hybridization};
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

/// Models for whole `G(CNG)nC` repeat duplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CngModel {
    Broda05,
}

impl CngModel {
    pub fn reference(&self) -> &'static str {
        match self {
            CngModel::Broda05 => "Broda et al. (2005)",
        }
    }

    /// Number of `CNG` triplets between the terminal G and C of `pos1..=pos2`.
    pub fn repeats(pos1: usize, pos2: usize) -> usize {
        (pos2 - pos1 - 1) / 3
    }

    pub fn is_applicable(&self, env: &Environment, pos1: usize, pos2: usize) -> Result<bool, MeltingError> {
        let model = self.reference();
        advise_hybridization(env, env.hybridization().is_rna(), model, "RNA duplexes");

        let duplex = env.duplex();
        let heads_with_g = duplex.pair(pos1).is_some_and(|pair| pair.top() == "G");
        let tails_with_c = duplex.pair(pos2).is_some_and(|pair| pair.top() == "C");
        if !heads_with_g && !tails_with_c {
            warn!(model, "Parameters are established for repeats opened by G·C and closed by C·G");
        }
        if !env.is_self_complementary() {
            warn!(model, "Parameters are established for self-complementary repeats");
            return Ok(false);
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
        let repeats = Self::repeats(pos1, pos2);
        let triplet = duplex.sequence_in(pos1 + 1, pos1 + 3, Alphabet::Rna)?;
        let thermo = params.need(params.cng(repeats, &triplet))?;
        debug!(
            model = self.reference(),
            repeats,
            triplet = triplet.as_str(),
            enthalpy = thermo.enthalpy,
            entropy = thermo.entropy,
            "CNG repeats"
        );
        Ok(Contribution::new(thermo))
    }
}
