use serde::Deserialize;

use crate::error::{Result, SimxError};
use crate::settings::Active;
use crate::settings::validation::{require_non_negative_int, require_temperature};

/// Turbulence closure used by the flow solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbulenceModel {
    MellorYamada,
    KatoLaunder,
    Lopez,
    Bruse,
}

impl TurbulenceModel {
    pub fn code(self) -> u8 {
        match self {
            Self::MellorYamada => 0,
            Self::KatoLaunder => 1,
            Self::Lopez => 2,
            Self::Bruse => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turbulence {
    model: TurbulenceModel,
}

impl Turbulence {
    pub fn new(model: TurbulenceModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> TurbulenceModel {
        self.model
    }
}

/// Output intervals (minutes) and NetCDF switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    main_files: u32,
    text_files: u32,
    netcdf: Active,
    netcdf_all_data_in_one_file: Active,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            main_files: 60,
            text_files: 60,
            netcdf: Active::No,
            netcdf_all_data_in_one_file: Active::No,
        }
    }
}

impl OutputSettings {
    /// Nesting grids are never included in the output.
    pub const NESTING_GRIDS: u8 = 0;

    pub fn new(
        main_files: i64,
        text_files: i64,
        netcdf: Active,
        netcdf_all_data_in_one_file: Active,
    ) -> Result<Self> {
        Ok(Self {
            main_files: require_non_negative_int("output.main_files", main_files)?,
            text_files: require_non_negative_int("output.text_files", text_files)?,
            netcdf,
            netcdf_all_data_in_one_file,
        })
    }

    pub fn main_files(&self) -> u32 {
        self.main_files
    }

    pub fn text_files(&self) -> u32 {
        self.text_files
    }

    pub fn netcdf(&self) -> Active {
        self.netcdf
    }

    pub fn netcdf_all_data_in_one_file(&self) -> Active {
        self.netcdf_all_data_in_one_file
    }
}

/// Indoor climate defaults for buildings.
///
/// The indoor temperature arrives in Celsius and is kept in Kelvin. Whether
/// it stays constant is decided once, after construction; until then it
/// reads as [`Active::No`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingSettings {
    indoor_temp_k: f64,
    indoor_const: Option<Active>,
}

impl BuildingSettings {
    pub fn new(indoor_temp: f64) -> Result<Self> {
        Ok(Self {
            indoor_temp_k: require_temperature("building.indoor_temp", indoor_temp)?,
            indoor_const: None,
        })
    }

    /// Binds the constant-indoor-temperature flag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the flag was already set.
    pub fn set_indoor_const(&mut self, indoor_const: Active) -> Result<()> {
        if self.indoor_const.is_some() {
            return Err(SimxError::invalid_argument(
                "building.indoor_const",
                "already set",
            ));
        }
        self.indoor_const = Some(indoor_const);
        Ok(())
    }

    /// Indoor temperature in Kelvin.
    pub fn indoor_temp(&self) -> f64 {
        self.indoor_temp_k
    }

    pub fn indoor_const(&self) -> Active {
        self.indoor_const.unwrap_or_default()
    }
}

/// Indoor view-sphere (IVS) radiation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ivs {
    on: Active,
    memory: Active,
}

impl Ivs {
    pub fn new(on: Active, memory: Active) -> Self {
        Self { on, memory }
    }

    pub fn on(&self) -> Active {
        self.on
    }

    pub fn memory(&self) -> Active {
        self.memory
    }
}

/// CPU usage policy; the engine is always told to use every core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParallelCpu;

impl ParallelCpu {
    pub const CPU_DEMAND: &'static str = "ALL";
}

/// Successive over-relaxation pressure solver switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sor {
    mode: Active,
}

impl Sor {
    pub fn new(mode: Active) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Active {
        self.mode
    }
}

/// Averaging of the inflow profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflowAvg {
    avg: Active,
}

impl InflowAvg {
    pub fn new(avg: Active) -> Self {
        Self { avg }
    }

    pub fn avg(&self) -> Active {
        self.avg
    }
}

/// Facade heat-transfer formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacadeMode {
    Mo,
    #[serde(rename = "din6946")]
    Din6946,
}

impl FacadeMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Mo => 0,
            Self::Din6946 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facades {
    mode: FacadeMode,
}

impl Facades {
    pub fn new(mode: FacadeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FacadeMode {
        self.mode
    }
}

/// Plant physiology options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantSetting {
    co2_ppm: u32,
    leaf_transmittance: Active,
    tree_calendar: Active,
}

impl PlantSetting {
    /// Creates the plant section. A negative CO2 background is clamped to zero.
    pub fn new(leaf_transmittance: Active, tree_calendar: Active, co2_ppm: i64) -> Self {
        let co2_ppm = u32::try_from(co2_ppm.max(0)).unwrap_or(u32::MAX);
        Self {
            co2_ppm,
            leaf_transmittance,
            tree_calendar,
        }
    }

    /// Background CO2 concentration (ppm).
    pub fn co2_ppm(&self) -> u32 {
        self.co2_ppm
    }

    pub fn leaf_transmittance(&self) -> Active {
        self.leaf_transmittance
    }

    pub fn tree_calendar(&self) -> Active {
        self.tree_calendar
    }
}
