//! Validated configuration sections of a `.simx` run.
//!
//! Every section checks its fields when it is built, so a value that
//! exists is a value the engine accepts.

/// Lateral boundaries, simple and full meteorological forcing.
pub mod forcing;
/// Run identity, start time and initial atmosphere.
pub mod main_data;
/// Turbulence, radiation, buildings, plants and solver switches.
pub mod model;
/// Emission sources and background concentrations.
pub mod pollution;
/// Soil temperature and moisture profile.
pub mod soil;
/// Threading, time steps and module update intervals.
pub mod timing;
pub mod validation;

use std::fmt;

use serde::Deserialize;

pub use forcing::{
    BoundaryCondition, Cloud, ForcingFileConverter, FullForcing, Lbc, SimpleForcing, SolarAdjust,
};
pub use main_data::MainSettings;
pub use model::{
    BuildingSettings, FacadeMode, Facades, InflowAvg, Ivs, OutputSettings, ParallelCpu,
    PlantSetting, Sor, Turbulence, TurbulenceModel,
};
pub use pollution::{Background, Pollutant, Sources};
pub use soil::SoilSettings;
pub use timing::{ModelTiming, TThread, TimeSteps};

/// Two-valued switch written as `0`/`1` in the control file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "bool")]
pub enum Active {
    /// Off, encoded as `0`.
    #[default]
    No,
    /// On, encoded as `1`.
    Yes,
}

impl Active {
    /// Integer code used by the engine.
    pub fn code(self) -> u8 {
        match self {
            Self::No => 0,
            Self::Yes => 1,
        }
    }
}

impl From<bool> for Active {
    fn from(on: bool) -> Self {
        if on { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
