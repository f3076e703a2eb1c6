use super::approximate::ApproximativeFormula;
use super::config::{MethodCategory, MethodChoice};
use super::corrections::IonCorrection;
use super::corrections::cosolvent::{DmsoCorrection, FormamideCorrection};
use super::corrections::magnesium::MagnesiumCorrection;
use super::corrections::mixed::MixedCorrection;
use super::corrections::sodium::SodiumCorrection;
use super::corrections::sodium_equivalent::SodiumEquivalentModel;
use super::environment::Environment;
use super::error::MeltingError;
use super::patterns::PatternModel;
use super::patterns::bulge::BulgeModel;
use super::patterns::crick::CrickModel;
use super::patterns::dangling::DanglingModel;
use super::patterns::internal_loop::InternalLoopModel;
use super::patterns::mismatch::SingleMismatchModel;
use super::patterns::modified::ModifiedModel;
use super::patterns::repeats::CngModel;
use super::patterns::tandem::TandemMismatchModel;
use super::patterns::wobble::WobbleModel;
use std::collections::BTreeMap;

/// What a registered method computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodKind {
    Pattern(PatternModel),
    Approximative(ApproximativeFormula),
    IonCorrection(IonCorrection),
    SodiumEquivalent(SodiumEquivalentModel),
    Dmso(DmsoCorrection),
    Formamide(FormamideCorrection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Short name selected on the command line.
    pub name: &'static str,
    pub reference: &'static str,
    pub kind: MethodKind,
    /// Parameter file used when the choice names none.
    pub default_file: Option<&'static str>,
    /// Categories whose selected table is merged into this method's table.
    pub companions: &'static [MethodCategory],
}

/// Immutable catalogue of every published method, keyed by category and name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    methods: BTreeMap<MethodCategory, Vec<MethodDescriptor>>,
}

impl Registry {
    pub fn standard() -> Self {
        use MethodCategory as C;
        let mut registry = Registry::default();

        let nn = [
            ("all97", CrickModel::AllawiSantaLucia97, "AllawiSantaLucia1997nn.toml"),
            ("san96", CrickModel::SantaLucia96, "SantaLucia1996nn.toml"),
            ("san04", CrickModel::SantaLucia04, "SantaLucia2004nn.toml"),
            ("sug95", CrickModel::Sugimoto95, "Sugimoto1995nn.toml"),
            ("tur06", CrickModel::Turner06, "Turner2006nn.toml"),
            ("xia98", CrickModel::Xia98, "Xia1998nn.toml"),
        ];
        for (name, model, file) in nn {
            registry.pattern(C::NearestNeighbor, name, PatternModel::Crick(model), file, &[]);
        }

        let single_mismatch = [
            ("allsanpey", SingleMismatchModel::AllawiSantaLuciaPeyret, "AllawiSantaLuciaPeyret1997_1998_1999mm.toml"),
            ("wat11", SingleMismatchModel::Watkins11, "Watkins2011mm.toml"),
            ("zno07", SingleMismatchModel::Znosko07, "Znosko2007mm.toml"),
            ("zno08", SingleMismatchModel::Znosko08, "Znosko2008mm.toml"),
            ("tur06", SingleMismatchModel::Turner06, "Turner1999_2006longmm.toml"),
        ];
        for (name, model, file) in single_mismatch {
            registry.pattern(C::SingleMismatch, name, PatternModel::SingleMismatch(model), file, &[]);
        }

        registry.pattern(
            C::TandemMismatch,
            "allsanpey",
            PatternModel::TandemMismatch(TandemMismatchModel::AllawiSantaLuciaPeyret),
            "AllawiSantaLuciaPeyret1997_1998_1999tanmm.toml",
            &[C::SingleMismatch],
        );
        registry.pattern(
            C::TandemMismatch,
            "tur06",
            PatternModel::TandemMismatch(TandemMismatchModel::Turner06),
            "Turner1999_2006tanmm.toml",
            &[],
        );

        registry.pattern(
            C::Wobble,
            "tur99",
            PatternModel::Wobble(WobbleModel::Turner99),
            "Turner1999wobble.toml",
            &[],
        );

        let internal_loops: [(&str, InternalLoopModel, &str, &'static [C]); 3] = [
            ("san04", InternalLoopModel::SantaLucia04, "SantaLucia2004longmm.toml", &[C::SingleMismatch]),
            ("tur06", InternalLoopModel::Turner06, "Turner1999_2006longmm.toml", &[]),
            ("zno07", InternalLoopModel::Znosko07, "Znosko20071x2loop.toml", &[]),
        ];
        for (name, model, file, companions) in internal_loops {
            registry.pattern(C::InternalLoop, name, PatternModel::InternalLoop(model), file, companions);
        }

        let sugimoto = [
            ("sugdna02", DanglingModel::SugimotoDna02, "Sugimoto2002longdde.toml"),
            ("sugrna02", DanglingModel::SugimotoRna02, "Sugimoto2002longrde.toml"),
        ];
        let single_dangling = [
            ("bom00", DanglingModel::Bommarito00, "Bommarito2000de.toml"),
            ("ser08", DanglingModel::Serra08, "Serra2006_2008de.toml"),
        ];
        for (name, model, file) in single_dangling.into_iter().chain(sugimoto) {
            registry.pattern(C::SingleDanglingEnd, name, PatternModel::Dangling(model), file, &[]);
        }
        let second_dangling = [
            ("ser05", DanglingModel::Serra05, "Serra2005doublede.toml"),
            ("ser06", DanglingModel::Serra06, "Serra2006doublede.toml"),
        ];
        for (name, model, file) in second_dangling {
            registry.pattern(C::SecondDanglingEnd, name, PatternModel::Dangling(model), file, &[C::SingleDanglingEnd]);
        }
        for (name, model, file) in sugimoto {
            registry.pattern(C::SecondDanglingEnd, name, PatternModel::Dangling(model), file, &[]);
            registry.pattern(C::LongDanglingEnd, name, PatternModel::Dangling(model), file, &[]);
        }

        let single_bulges: [(&str, BulgeModel, &str, &'static [C]); 3] = [
            ("san04", BulgeModel::SantaLucia04Single, "SantaLucia2004longbulge.toml", &[C::NearestNeighbor]),
            ("tur06", BulgeModel::Turner06Single, "Turner1999_2006longbulge.toml", &[C::NearestNeighbor, C::Wobble]),
            ("generic", BulgeModel::GenericSingle, "GenericSingleBulge.toml", &[]),
        ];
        for (name, model, file, companions) in single_bulges {
            registry.pattern(C::SingleBulgeLoop, name, PatternModel::Bulge(model), file, companions);
        }
        let long_bulges = [
            ("san04", BulgeModel::SantaLucia04Long, "SantaLucia2004longbulge.toml"),
            ("tur06", BulgeModel::Turner06Long, "Turner1999_2006longbulge.toml"),
        ];
        for (name, model, file) in long_bulges {
            registry.pattern(C::LongBulgeLoop, name, PatternModel::Bulge(model), file, &[]);
        }

        registry.pattern(C::CngRepeats, "bro05", PatternModel::Repeats(CngModel::Broda05), "Broda2005CNG.toml", &[]);

        let modified: [(C, &str, ModifiedModel, &str, &'static [C]); 5] = [
            (C::Inosine, "san05", ModifiedModel::SantaLucia05Inosine, "SantaLucia2005inomn.toml", &[]),
            (C::Inosine, "zno07", ModifiedModel::Znosko07Inosine, "Znosko2007inomn.toml", &[]),
            (C::Hydroxyadenine, "sug01", ModifiedModel::Sugimoto01Hydroxyadenine, "Sugimoto2001hydroxyAmn.toml", &[C::NearestNeighbor]),
            (C::Azobenzene, "asa05", ModifiedModel::Asanuma05Azobenzene, "Asanuma2005azobenmn.toml", &[]),
            (C::LockedAcid, "mct04", ModifiedModel::McTigue04LockedAcid, "McTigue2004lockedmn.toml", &[C::NearestNeighbor]),
        ];
        for (category, name, model, file, companions) in modified {
            registry.pattern(category, name, PatternModel::Modified(model), file, companions);
        }

        let formulas = [
            ("ahs01", ApproximativeFormula::Ahsen01),
            ("che93", ApproximativeFormula::MarmurChester93),
            ("che93corr", ApproximativeFormula::MarmurChester93Corrected),
            ("schdot", ApproximativeFormula::MarmurSchildkrautDoty),
            ("owe69", ApproximativeFormula::Owen69),
            ("san98", ApproximativeFormula::SantaLucia98),
            ("wetdna91", ApproximativeFormula::WetmurDna91),
            ("wetrna91", ApproximativeFormula::WetmurRna91),
            ("wetdnarna91", ApproximativeFormula::WetmurDnaRna91),
        ];
        for (name, formula) in formulas {
            registry.insert(C::Approximative, name, formula.reference(), MethodKind::Approximative(formula));
        }

        let ion_corrections = [
            ("schlif", IonCorrection::Sodium(SodiumCorrection::SchildkrautLifson65)),
            ("san96", IonCorrection::Sodium(SodiumCorrection::SantaLucia96)),
            ("wet91", IonCorrection::Sodium(SodiumCorrection::Wetmur91)),
            ("kam71", IonCorrection::Sodium(SodiumCorrection::FrankKamenetskii71)),
            ("owc1904", IonCorrection::Sodium(SodiumCorrection::Owczarzy04Eq19)),
            ("owc2004", IonCorrection::Sodium(SodiumCorrection::Owczarzy04Eq20)),
            ("owc2104", IonCorrection::Sodium(SodiumCorrection::Owczarzy04Eq21)),
            ("owc2204", IonCorrection::Sodium(SodiumCorrection::Owczarzy04Eq22)),
            ("ahs01", IonCorrection::Sodium(SodiumCorrection::Ahsen01)),
            ("san04", IonCorrection::Sodium(SodiumCorrection::SantaLucia04)),
            ("tanna06", IonCorrection::Sodium(SodiumCorrection::Tan06)),
            ("tanna07", IonCorrection::Sodium(SodiumCorrection::Tan07)),
            ("owcmg08", IonCorrection::Magnesium(MagnesiumCorrection::Owczarzy08)),
            ("tanmg06", IonCorrection::Magnesium(MagnesiumCorrection::Tan06)),
            ("tanmg07", IonCorrection::Magnesium(MagnesiumCorrection::Tan07)),
            ("owcmix08", IonCorrection::Mixed(MixedCorrection::Owczarzy08)),
            ("tanmix07", IonCorrection::Mixed(MixedCorrection::Tan07)),
        ];
        for (name, correction) in ion_corrections {
            registry.insert(C::IonCorrection, name, correction.reference(), MethodKind::IonCorrection(correction));
        }

        let equivalents = [
            ("ahs01", SodiumEquivalentModel::Ahsen01),
            ("pey00", SodiumEquivalentModel::Peyret00),
            ("mit96", SodiumEquivalentModel::Mitsuhashi96),
        ];
        for (name, model) in equivalents {
            registry.insert(C::SodiumEquivalent, name, model.reference(), MethodKind::SodiumEquivalent(model));
        }

        let dmso = [
            ("ahs01", DmsoCorrection::Ahsen01),
            ("cul76", DmsoCorrection::Cullen76),
            ("esc80", DmsoCorrection::Escara80),
            ("mus81", DmsoCorrection::Musielski81),
        ];
        for (name, correction) in dmso {
            registry.insert(C::Dmso, name, correction.reference(), MethodKind::Dmso(correction));
        }

        for (name, correction) in [("bla96", FormamideCorrection::Blake96), ("lincorr", FormamideCorrection::Linear)] {
            registry.insert(C::Formamide, name, correction.reference(), MethodKind::Formamide(correction));
        }

        registry
    }

    fn pattern(
        &mut self,
        category: MethodCategory,
        name: &'static str,
        model: PatternModel,
        default_file: &'static str,
        companions: &'static [MethodCategory],
    ) {
        self.methods.entry(category).or_default().push(MethodDescriptor {
            name,
            reference: model.reference(),
            kind: MethodKind::Pattern(model),
            default_file: Some(default_file),
            companions,
        });
    }

    fn insert(&mut self, category: MethodCategory, name: &'static str, reference: &'static str, kind: MethodKind) {
        self.methods.entry(category).or_default().push(MethodDescriptor {
            name,
            reference,
            kind,
            default_file: None,
            companions: &[],
        });
    }

    pub fn get(&self, category: MethodCategory, name: &str) -> Option<&MethodDescriptor> {
        self.methods
            .get(&category)?
            .iter()
            .find(|descriptor| descriptor.name == name)
    }

    /// Registered names of one category, in registration order.
    pub fn names(&self, category: MethodCategory) -> Vec<&'static str> {
        self.methods
            .get(&category)
            .map(|descriptors| descriptors.iter().map(|descriptor| descriptor.name).collect())
            .unwrap_or_default()
    }

    pub fn resolve(
        &self,
        category: MethodCategory,
        choice: &MethodChoice,
    ) -> Result<&MethodDescriptor, MeltingError> {
        self.get(category, &choice.name).ok_or_else(|| {
            MeltingError::Configuration(format!(
                "unknown {} method '{}'; expected one of: {}",
                category,
                choice.name,
                self.names(category).join(", ")
            ))
        })
    }

    /// Descriptor of the method the environment selects for `category`, if any.
    pub fn selected(
        &self,
        env: &Environment,
        category: MethodCategory,
    ) -> Result<Option<&MethodDescriptor>, MeltingError> {
        env.method(category)
            .map(|choice| self.resolve(category, choice))
            .transpose()
    }

    pub(crate) fn wrong_kind(&self, category: MethodCategory, name: &str) -> MeltingError {
        MeltingError::Configuration(format!(
            "the method '{}' is registered under {} with an unexpected kind",
            name, category
        ))
    }
}
