use super::{Contribution, Params, advise_hybridization};
use crate::core::params::keys::Lookup;
use crate::core::sequences::duplex::Duplex;
use crate::core::sequences::hybridization::Alphabet;
use crate::core::thermo::term::Thermodynamics;
use crate::engine::environment::Environment;
use crate::engine::error::MeltingError;
use tracing::{debug, warn};

/// Watson-Crick nearest-neighbor models summed over the whole paired region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrickModel {
    AllawiSantaLucia97,
    SantaLucia96,
    SantaLucia04,
    Sugimoto95,
    Turner06,
    Xia98,
}

/// How a model accounts for the ends of the helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitiationShape {
    /// One term per terminal A·T (or A·U) and per terminal G·C.
    Decomposed,
    /// One term for the whole duplex, depending on whether it holds any G·C pair,
    /// plus a penalty per 5'-terminal T·A.
    Global,
    /// A flat initiation plus a penalty per terminal pair of the given kind.
    TerminalPenalty(&'static str),
    Fixed,
}

/// How a stack is written in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackKey {
    Plain,
    /// DNA strand prefixed `d`, RNA strand prefixed `r`.
    Hybrid,
    /// 2'-O-methyl strand prefixed `m`.
    Methylated,
}

impl CrickModel {
    pub fn reference(&self) -> &'static str {
        match self {
            CrickModel::AllawiSantaLucia97 => "Allawi and SantaLucia (1997)",
            CrickModel::SantaLucia96 => "SantaLucia et al. (1996)",
            CrickModel::SantaLucia04 => "SantaLucia and Hicks (2004)",
            CrickModel::Sugimoto95 => "Sugimoto et al. (1995)",
            CrickModel::Turner06 => "Kierzek et al. (2006)",
            CrickModel::Xia98 => "Xia et al. (1998)",
        }
    }

    fn alphabet(&self) -> Option<Alphabet> {
        match self {
            CrickModel::AllawiSantaLucia97 | CrickModel::SantaLucia96 | CrickModel::SantaLucia04 => {
                Some(Alphabet::Dna)
            }
            CrickModel::Xia98 => Some(Alphabet::Rna),
            CrickModel::Sugimoto95 | CrickModel::Turner06 => None,
        }
    }

    fn stack_key(&self) -> StackKey {
        match self {
            CrickModel::Sugimoto95 => StackKey::Hybrid,
            CrickModel::Turner06 => StackKey::Methylated,
            _ => StackKey::Plain,
        }
    }

    fn initiation_shape(&self) -> InitiationShape {
        match self {
            CrickModel::AllawiSantaLucia97 => InitiationShape::Decomposed,
            CrickModel::SantaLucia96 => InitiationShape::Global,
            CrickModel::SantaLucia04 => InitiationShape::TerminalPenalty("per_A/T"),
            CrickModel::Xia98 | CrickModel::Turner06 => InitiationShape::TerminalPenalty("per_A/U"),
            CrickModel::Sugimoto95 => InitiationShape::Fixed,
        }
    }

    fn view<'d>(&self, duplex: &'d Duplex) -> &'d Duplex {
        match self.alphabet() {
            Some(alphabet) => duplex.equivalent(alphabet),
            None => duplex,
        }
    }

    pub fn is_applicable(&self, env: &Environment) -> Result<bool, MeltingError> {
        let hybridization = env.hybridization();
        let model = self.reference();
        match self {
            CrickModel::AllawiSantaLucia97 | CrickModel::SantaLucia96 | CrickModel::SantaLucia04 => {
                advise_hybridization(env, hybridization.is_dna(), model, "DNA duplexes");
                Ok(true)
            }
            CrickModel::Xia98 => {
                advise_hybridization(env, hybridization.is_rna(), model, "RNA duplexes");
                Ok(true)
            }
            CrickModel::Sugimoto95 => {
                if env.is_self_complementary() {
                    return Err(MeltingError::not_applicable(
                        model,
                        "DNA/RNA hybrids cannot be self-complementary",
                    ));
                }
                advise_hybridization(env, hybridization.is_hybrid(), model, "DNA/RNA duplexes");
                Ok(true)
            }
            CrickModel::Turner06 => {
                if env.is_self_complementary() {
                    return Err(MeltingError::not_applicable(
                        model,
                        "2'-O-methyl RNA/RNA duplexes cannot be self-complementary",
                    ));
                }
                if !hybridization.is_modified_rna() {
                    warn!(
                        model,
                        hybridization = hybridization.as_str(),
                        "Parameters are established for 2'-O-methyl RNA/RNA duplexes"
                    );
                    return Ok(false);
                }
                Ok(true)
            }
        }
    }

    fn stack(&self, params: &Params, duplex: &Duplex, pos: usize) -> Result<Thermodynamics, MeltingError> {
        let (top, bottom) = duplex.nn_pair(pos)?;
        let lookup = match self.stack_key() {
            StackKey::Plain => params.neighbor(top, bottom),
            StackKey::Hybrid => params.neighbor(&format!("d{top}"), &format!("r{bottom}")),
            StackKey::Methylated => params.neighbor(&format!("m{top}"), bottom),
        };
        params.need(lookup)
    }

    /// Sum of the stacks `pos1..pos2`.
    pub fn compute(
        &self,
        params: &Params,
        duplex: &Duplex,
        pos1: usize,
        pos2: usize,
    ) -> Result<Contribution, MeltingError> {
        let view = self.view(duplex);
        let mut total = Thermodynamics::default();
        for pos in pos1..pos2 {
            let stack = self.stack(params, view, pos)?;
            debug!(pos, enthalpy = stack.enthalpy, entropy = stack.entropy, "Stack");
            total += stack;
        }
        if *self == CrickModel::Turner06 {
            // Parameters are measured at 0.1 M Na; bring the entropy back to 1 M.
            total.entropy -= 0.368 * (pos2 - pos1) as f64 * 0.1f64.ln();
        }
        Ok(Contribution::new(total))
    }

    /// Initiation, terminal penalties and the symmetry term of self-complementary duplexes.
    pub fn initiation(
        &self,
        params: &Params,
        duplex: &Duplex,
        self_complementary: bool,
    ) -> Result<Contribution, MeltingError> {
        let view = self.view(duplex);
        let mut total = params.initiation().unwrap_or_default();
        if self_complementary {
            total += params.need(params.symmetry())?;
        }

        let (first, last) = view.paired_range()?;
        match self.initiation_shape() {
            InitiationShape::Decomposed => {
                let at = view.terminal_count("A", "T", first, last);
                let au = view.terminal_count("A", "U", first, last);
                let gc = view.terminal_count("G", "C", first, last);
                if at > 0 {
                    total += scaled(params, at, params.initiation_of("per_A/T"))?;
                } else {
                    total += scaled(params, au, params.initiation_of("per_A/U"))?;
                }
                total += scaled(params, gc, params.initiation_of("per_G/C"))?;
            }
            InitiationShape::Global => {
                total += if view.has_gc_pair() {
                    params.need(params.initiation_of("one_GC_Pair"))?
                } else {
                    params.need(params.initiation_of("all_AT_pairs"))?
                };
                let terminal_ta = view.terminal_5ta_count(first, last);
                total += scaled(params, terminal_ta, params.terminal("5_T/A"))?;
            }
            InitiationShape::TerminalPenalty(kind) => {
                let count = match kind {
                    "per_A/T" => view.terminal_count("A", "T", first, last),
                    _ => view.terminal_count("A", "U", first, last),
                };
                total += scaled(params, count, params.terminal(kind))?;
            }
            InitiationShape::Fixed => {}
        }

        debug!(
            model = self.reference(),
            enthalpy = total.enthalpy,
            entropy = total.entropy,
            "Helix initiation"
        );
        Ok(Contribution::new(total))
    }
}

/// `count` times the looked-up value; the entry is only required when `count > 0`.
fn scaled(params: &Params, count: usize, lookup: Lookup) -> Result<Thermodynamics, MeltingError> {
    if count == 0 {
        return Ok(Thermodynamics::default());
    }
    Ok(params.need(lookup)? * count as f64)
}
