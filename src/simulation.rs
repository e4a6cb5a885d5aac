//! Simulation configuration aggregate and its section-eligibility policy.

use std::collections::BTreeMap;
use std::fmt;

use crate::settings::{
    Background, BuildingSettings, Cloud, Facades, FullForcing, InflowAvg, Ivs, Lbc, MainSettings,
    ModelTiming, OutputSettings, ParallelCpu, PlantSetting, SimpleForcing, SoilSettings,
    SolarAdjust, Sor, Sources, TThread, TimeSteps, Turbulence,
};

/// The fixed set of optional sections, declared in emission order.
///
/// The derived `Ord` follows declaration order, so ordered collections keyed
/// by `SectionKind` iterate in the order the engine expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    SimpleForcing,
    TThread,
    ModelTiming,
    Soil,
    Sources,
    Turbulence,
    TimeSteps,
    OutputSettings,
    Clouds,
    Background,
    SolarAdjust,
    Building,
    Ivs,
    Parallel,
    Sor,
    InflowAvg,
    PlantModel,
    Facades,
    Lbc,
    FullForcing,
}

impl SectionKind {
    /// Every optional section in emission order.
    pub const ALL: [Self; 20] = [
        Self::SimpleForcing,
        Self::TThread,
        Self::ModelTiming,
        Self::Soil,
        Self::Sources,
        Self::Turbulence,
        Self::TimeSteps,
        Self::OutputSettings,
        Self::Clouds,
        Self::Background,
        Self::SolarAdjust,
        Self::Building,
        Self::Ivs,
        Self::Parallel,
        Self::Sor,
        Self::InflowAvg,
        Self::PlantModel,
        Self::Facades,
        Self::Lbc,
        Self::FullForcing,
    ];

    /// Element name of the section in the control file.
    pub fn title(self) -> &'static str {
        match self {
            Self::SimpleForcing => "SimpleForcing",
            Self::TThread => "TThread",
            Self::ModelTiming => "ModelTiming",
            Self::Soil => "Soil",
            Self::Sources => "Sources",
            Self::Turbulence => "Turbulence",
            Self::TimeSteps => "TimeSteps",
            Self::OutputSettings => "OutputSettings",
            Self::Clouds => "Clouds",
            Self::Background => "Background",
            Self::SolarAdjust => "SolarAdjust",
            Self::Building => "Building",
            Self::Ivs => "IVS",
            Self::Parallel => "Parallel",
            Self::Sor => "SOR",
            Self::InflowAvg => "InflowAvg",
            Self::PlantModel => "PlantModel",
            Self::Facades => "Facades",
            Self::Lbc => "LBC",
            Self::FullForcing => "FullForcing",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One attached optional section.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    SimpleForcing(SimpleForcing),
    TThread(TThread),
    ModelTiming(ModelTiming),
    Soil(SoilSettings),
    Sources(Sources),
    Turbulence(Turbulence),
    TimeSteps(TimeSteps),
    OutputSettings(OutputSettings),
    Clouds(Cloud),
    Background(Background),
    SolarAdjust(SolarAdjust),
    Building(BuildingSettings),
    Ivs(Ivs),
    Parallel(ParallelCpu),
    Sor(Sor),
    InflowAvg(InflowAvg),
    PlantModel(PlantSetting),
    Facades(Facades),
    Lbc(Lbc),
    FullForcing(FullForcing),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::SimpleForcing(_) => SectionKind::SimpleForcing,
            Self::TThread(_) => SectionKind::TThread,
            Self::ModelTiming(_) => SectionKind::ModelTiming,
            Self::Soil(_) => SectionKind::Soil,
            Self::Sources(_) => SectionKind::Sources,
            Self::Turbulence(_) => SectionKind::Turbulence,
            Self::TimeSteps(_) => SectionKind::TimeSteps,
            Self::OutputSettings(_) => SectionKind::OutputSettings,
            Self::Clouds(_) => SectionKind::Clouds,
            Self::Background(_) => SectionKind::Background,
            Self::SolarAdjust(_) => SectionKind::SolarAdjust,
            Self::Building(_) => SectionKind::Building,
            Self::Ivs(_) => SectionKind::Ivs,
            Self::Parallel(_) => SectionKind::Parallel,
            Self::Sor(_) => SectionKind::Sor,
            Self::InflowAvg(_) => SectionKind::InflowAvg,
            Self::PlantModel(_) => SectionKind::PlantModel,
            Self::Facades(_) => SectionKind::Facades,
            Self::Lbc(_) => SectionKind::Lbc,
            Self::FullForcing(_) => SectionKind::FullForcing,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleForcing(sf) => write!(f, "{sf}"),
            Self::Sources(sources) => write!(f, "{sources}"),
            Self::FullForcing(ff) => write!(f, "{ff}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

macro_rules! impl_from_section {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Section {
                fn from(section: $ty) -> Self {
                    Self::$variant(section)
                }
            }
        )*
    };
}

impl_from_section!(
    SimpleForcing(SimpleForcing),
    TThread(TThread),
    ModelTiming(ModelTiming),
    Soil(SoilSettings),
    Sources(Sources),
    Turbulence(Turbulence),
    TimeSteps(TimeSteps),
    OutputSettings(OutputSettings),
    Clouds(Cloud),
    Background(Background),
    SolarAdjust(SolarAdjust),
    Building(BuildingSettings),
    Ivs(Ivs),
    Parallel(ParallelCpu),
    Sor(Sor),
    InflowAvg(InflowAvg),
    PlantModel(PlantSetting),
    Facades(Facades),
    Lbc(Lbc),
    FullForcing(FullForcing),
);

/// Returns `true` when the forcing sections present in a run suppress `kind`.
///
/// Full forcing replaces simple forcing, clouds and solar adjustment. The
/// lateral boundary section is dropped only when both forcing kinds are
/// attached at the same time; with a single forcing kind it is kept.
pub fn suppressed_by_forcing(kind: SectionKind, simple_forcing: bool, full_forcing: bool) -> bool {
    match kind {
        SectionKind::SimpleForcing | SectionKind::Clouds | SectionKind::SolarAdjust => full_forcing,
        SectionKind::Lbc => simple_forcing && full_forcing,
        _ => false,
    }
}

/// One simulation run: the mandatory main section plus optional sections.
///
/// Sections are attached in any order; attaching a kind twice replaces the
/// earlier value. Exclusivity between sections depends only on which kinds
/// are present, never on their values.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    main: MainSettings,
    sections: BTreeMap<SectionKind, Section>,
}

impl Simulation {
    pub fn new(main: MainSettings) -> Self {
        Self {
            main,
            sections: BTreeMap::new(),
        }
    }

    pub fn main(&self) -> &MainSettings {
        &self.main
    }

    /// Attaches `section`, returning the section of the same kind it replaced.
    pub fn attach(&mut self, section: impl Into<Section>) -> Option<Section> {
        let section = section.into();
        self.sections.insert(section.kind(), section)
    }

    /// Builder form of [`Simulation::attach`].
    #[must_use]
    pub fn with(mut self, section: impl Into<Section>) -> Self {
        self.attach(section);
        self
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(&kind)
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.sections.contains_key(&kind)
    }

    /// Returns `true` when `kind` is attached but silenced by the forcing rules.
    pub fn is_suppressed(&self, kind: SectionKind) -> bool {
        self.contains(kind)
            && suppressed_by_forcing(
                kind,
                self.contains(SectionKind::SimpleForcing),
                self.contains(SectionKind::FullForcing),
            )
    }

    /// Returns `true` when `kind` is attached and not suppressed.
    pub fn is_eligible(&self, kind: SectionKind) -> bool {
        self.contains(kind) && !self.is_suppressed(kind)
    }

    /// Attached sections that will be written, in emission order.
    pub fn eligible_sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.sections
            .values()
            .filter(|section| self.is_eligible(section.kind()))
    }

    /// Number of attached optional sections, eligible or not.
    pub fn attached_count(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Active, BoundaryCondition};

    fn main_settings() -> MainSettings {
        MainSettings::new("Test1", "C:/proj/Test1.inx").expect("valid main")
    }

    fn simple() -> SimpleForcing {
        SimpleForcing::new(&[20.0, 21.0], &[50.0, 55.0]).expect("valid forcing")
    }

    fn full() -> FullForcing {
        FullForcing::new("Test1.FOX").expect("valid forcing")
    }

    fn lbc() -> Lbc {
        Lbc::new(BoundaryCondition::Open, BoundaryCondition::Forced)
    }

    #[test]
    fn emission_order_matches_ord() {
        let mut sorted = SectionKind::ALL;
        sorted.sort();
        assert_eq!(sorted, SectionKind::ALL);
        assert_eq!(SectionKind::ALL[0], SectionKind::SimpleForcing);
        assert_eq!(SectionKind::ALL[19], SectionKind::FullForcing);
    }

    #[test]
    fn section_summaries() {
        assert_eq!(Section::from(full()).to_string(), "FullForcing Test1.FOX");
        assert_eq!(Section::from(simple()).to_string(), "SimpleForcing count 2");
        assert_eq!(Section::from(lbc()).to_string(), "LBC");
    }

    #[test]
    fn attach_is_last_write_wins() {
        let mut sim = Simulation::new(main_settings());
        assert!(sim.attach(TThread::new(Active::No)).is_none());
        let replaced = sim.attach(TThread::new(Active::Yes));
        assert_eq!(replaced, Some(Section::TThread(TThread::new(Active::No))));
        assert_eq!(
            sim.section(SectionKind::TThread),
            Some(&Section::TThread(TThread::new(Active::Yes)))
        );
        assert_eq!(sim.attached_count(), 1);
    }

    #[test]
    fn full_forcing_suppresses_simple_forcing_clouds_and_solar() {
        let sim = Simulation::new(main_settings())
            .with(simple())
            .with(Cloud::default())
            .with(SolarAdjust::new(1.0).expect("valid factor"))
            .with(full());
        assert!(!sim.is_eligible(SectionKind::SimpleForcing));
        assert!(!sim.is_eligible(SectionKind::Clouds));
        assert!(!sim.is_eligible(SectionKind::SolarAdjust));
        assert!(sim.is_eligible(SectionKind::FullForcing));
        assert!(sim.is_suppressed(SectionKind::Clouds));
    }

    #[test]
    fn simple_forcing_alone_is_eligible() {
        let sim = Simulation::new(main_settings()).with(simple()).with(Cloud::default());
        assert!(sim.is_eligible(SectionKind::SimpleForcing));
        assert!(sim.is_eligible(SectionKind::Clouds));
    }

    #[test]
    fn lbc_dropped_only_with_both_forcings() {
        let none = Simulation::new(main_settings()).with(lbc());
        assert!(none.is_eligible(SectionKind::Lbc));

        let simple_only = none.clone().with(simple());
        assert!(simple_only.is_eligible(SectionKind::Lbc));

        let full_only = Simulation::new(main_settings()).with(lbc()).with(full());
        assert!(full_only.is_eligible(SectionKind::Lbc));

        let both = simple_only.with(full());
        assert!(!both.is_eligible(SectionKind::Lbc));
    }

    #[test]
    fn absent_sections_are_neither_eligible_nor_suppressed() {
        let sim = Simulation::new(main_settings()).with(full());
        assert!(!sim.is_eligible(SectionKind::Clouds));
        assert!(!sim.is_suppressed(SectionKind::Clouds));
    }

    #[test]
    fn eligible_sections_follow_emission_order() {
        let sim = Simulation::new(main_settings())
            .with(lbc())
            .with(ParallelCpu)
            .with(TThread::new(Active::Yes))
            .with(simple());
        let kinds: Vec<SectionKind> = sim.eligible_sections().map(Section::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::SimpleForcing,
                SectionKind::TThread,
                SectionKind::Parallel,
                SectionKind::Lbc
            ]
        );
    }

    #[test]
    fn suppression_policy_table() {
        for kind in SectionKind::ALL {
            assert!(!suppressed_by_forcing(kind, false, false), "{kind}");
        }
        assert!(suppressed_by_forcing(SectionKind::SolarAdjust, false, true));
        assert!(!suppressed_by_forcing(SectionKind::Lbc, true, false));
        assert!(!suppressed_by_forcing(SectionKind::Lbc, false, true));
        assert!(suppressed_by_forcing(SectionKind::Lbc, true, true));
        assert!(!suppressed_by_forcing(SectionKind::Background, true, true));
    }
}
