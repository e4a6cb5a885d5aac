use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimxError};
use crate::settings::Active;
use crate::settings::validation::{
    require_in_range, require_non_negative, require_non_negative_int, require_percentage,
    require_temperature,
};

/// Hourly air temperature and humidity series entered by hand.
///
/// Temperatures arrive in Celsius and are kept in Kelvin, element by element.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleForcing {
    temperature_k: Vec<f64>,
    relative_humidity: Vec<f64>,
}

impl SimpleForcing {
    /// Builds the series from paired temperature (°C) and humidity (%) values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the lists are empty or differ in length,
    /// and `InvalidValue` if any reading is outside its domain.
    pub fn new(temperature: &[f64], relative_humidity: &[f64]) -> Result<Self> {
        if temperature.len() != relative_humidity.len() {
            return Err(SimxError::invalid_argument(
                "simple_forcing",
                format!(
                    "temperature list has {} values but relative humidity list has {}",
                    temperature.len(),
                    relative_humidity.len()
                ),
            ));
        }
        if temperature.is_empty() {
            return Err(SimxError::invalid_argument(
                "simple_forcing",
                "series must contain at least one value",
            ));
        }

        let temperature_k = temperature
            .iter()
            .map(|&t| require_temperature("simple_forcing.temperature", t))
            .collect::<Result<Vec<_>>>()?;
        let relative_humidity = relative_humidity
            .iter()
            .map(|&rh| require_percentage("simple_forcing.relative_humidity", rh))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            temperature_k,
            relative_humidity,
        })
    }

    /// Temperatures in Kelvin.
    pub fn temperature(&self) -> &[f64] {
        &self.temperature_k
    }

    pub fn relative_humidity(&self) -> &[f64] {
        &self.relative_humidity
    }

    /// Number of time steps in the series.
    pub fn count(&self) -> usize {
        self.temperature_k.len()
    }
}

impl fmt::Display for SimpleForcing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleForcing count {}", self.count())
    }
}

/// Cloud cover in oktas for the low, middle and high layers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cloud {
    low: f64,
    middle: f64,
    high: f64,
}

impl Cloud {
    /// Maximum cover in oktas.
    pub const MAX_OKTAS: f64 = 8.0;

    /// Creates a cloud section; each layer must lie in `[0, 8]`.
    pub fn new(low: f64, middle: f64, high: f64) -> Result<Self> {
        Ok(Self {
            low: require_in_range("clouds.low", low, 0.0, Self::MAX_OKTAS)?,
            middle: require_in_range("clouds.middle", middle, 0.0, Self::MAX_OKTAS)?,
            high: require_in_range("clouds.high", high, 0.0, Self::MAX_OKTAS)?,
        })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn middle(&self) -> f64 {
        self.middle
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

/// Scaling of the computed shortwave radiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAdjust {
    sw_factor: f64,
}

impl SolarAdjust {
    /// Creates the adjustment; `sw_factor` must lie in `[0.5, 1.5]`.
    pub fn new(sw_factor: f64) -> Result<Self> {
        Ok(Self {
            sw_factor: require_in_range("solar_adjust.sw_factor", sw_factor, 0.5, 1.5)?,
        })
    }

    pub fn sw_factor(&self) -> f64 {
        self.sw_factor
    }
}

/// Lateral boundary condition for a transported quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    Open,
    Forced,
    Cyclic,
}

impl BoundaryCondition {
    pub fn code(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Forced => 2,
            Self::Cyclic => 3,
        }
    }
}

/// Lateral boundary conditions for temperature/humidity and turbulence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lbc {
    temperature_humidity: BoundaryCondition,
    turbulence: BoundaryCondition,
}

impl Lbc {
    pub fn new(temperature_humidity: BoundaryCondition, turbulence: BoundaryCondition) -> Self {
        Self {
            temperature_humidity,
            turbulence,
        }
    }

    /// Condition for temperature and humidity (`LBC_TQ`).
    pub fn temperature_humidity(&self) -> BoundaryCondition {
        self.temperature_humidity
    }

    /// Condition for turbulence (`LBC_TKE`).
    pub fn turbulence(&self) -> BoundaryCondition {
        self.turbulence
    }
}

/// Produces the engine's forcing file from a source weather file.
///
/// Implemented by the weather-file converter that sits outside this crate;
/// the returned name is stored verbatim in the `FullForcing` section.
pub trait ForcingFileConverter {
    /// Converts `weather_file` and returns the forcing file name.
    ///
    /// # Arguments
    ///
    /// * `weather_file` - Source weather file (e.g., EPW)
    /// * `project_folder` - Folder holding the project files
    /// * `engine_folder` - Installation folder of the simulation engine
    fn convert(
        &self,
        weather_file: &Path,
        project_folder: &Path,
        engine_folder: &Path,
    ) -> Result<String>;
}

/// Time-resolved meteorological forcing read from a forcing file.
///
/// When attached to a run it replaces simple forcing, clouds and solar
/// adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct FullForcing {
    file_name: String,
    limit_wind_2500: Active,
    max_wind_2500: f64,
    min_flow_steps: u32,
    force_temperature: Active,
    force_wind: Active,
    force_relative_humidity: Active,
    force_precipitation: Active,
    force_rad_clouds: Active,
}

impl FullForcing {
    pub const INTERPOLATION_METHOD: &'static str = "linear";
    pub const NUDGING: &'static str = "1";
    pub const NUDGING_FACTOR: &'static str = "1.00000";
    pub const Z_0: &'static str = "0.10000";

    /// Creates full forcing from an already converted forcing file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `file_name` is blank.
    pub fn new(file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(SimxError::invalid_value(
                "full_forcing.file_name",
                "must not be empty",
            ));
        }
        Ok(Self {
            file_name,
            limit_wind_2500: Active::No,
            max_wind_2500: 20.0,
            min_flow_steps: 50,
            force_temperature: Active::Yes,
            force_wind: Active::Yes,
            force_relative_humidity: Active::Yes,
            force_precipitation: Active::No,
            force_rad_clouds: Active::Yes,
        })
    }

    /// Converts `weather_file` with `converter` and creates full forcing from the result.
    pub fn from_weather_file(
        converter: &dyn ForcingFileConverter,
        weather_file: &Path,
        project_folder: &Path,
        engine_folder: &Path,
    ) -> Result<Self> {
        let file_name = converter.convert(weather_file, project_folder, engine_folder)?;
        Self::new(file_name)
    }

    /// Sets the minimum number of flow steps between forcing updates.
    pub fn with_min_flow_steps(mut self, steps: i64) -> Result<Self> {
        self.min_flow_steps = require_non_negative_int("full_forcing.min_flow_steps", steps)?;
        Ok(self)
    }

    /// Enables or disables the wind limit at 2500 m.
    pub fn with_limit_wind_2500(mut self, limit: Active) -> Self {
        self.limit_wind_2500 = limit;
        self
    }

    /// Sets the wind speed cap at 2500 m (m/s).
    pub fn with_max_wind_2500(mut self, speed: f64) -> Result<Self> {
        self.max_wind_2500 = require_non_negative("full_forcing.max_wind_2500", speed)?;
        Ok(self)
    }

    pub fn with_force_temperature(mut self, force: Active) -> Self {
        self.force_temperature = force;
        self
    }

    pub fn with_force_wind(mut self, force: Active) -> Self {
        self.force_wind = force;
        self
    }

    pub fn with_force_relative_humidity(mut self, force: Active) -> Self {
        self.force_relative_humidity = force;
        self
    }

    pub fn with_force_precipitation(mut self, force: Active) -> Self {
        self.force_precipitation = force;
        self
    }

    pub fn with_force_rad_clouds(mut self, force: Active) -> Self {
        self.force_rad_clouds = force;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn limit_wind_2500(&self) -> Active {
        self.limit_wind_2500
    }

    pub fn max_wind_2500(&self) -> f64 {
        self.max_wind_2500
    }

    pub fn min_flow_steps(&self) -> u32 {
        self.min_flow_steps
    }

    pub fn force_temperature(&self) -> Active {
        self.force_temperature
    }

    pub fn force_wind(&self) -> Active {
        self.force_wind
    }

    pub fn force_relative_humidity(&self) -> Active {
        self.force_relative_humidity
    }

    pub fn force_precipitation(&self) -> Active {
        self.force_precipitation
    }

    pub fn force_rad_clouds(&self) -> Active {
        self.force_rad_clouds
    }
}

impl fmt::Display for FullForcing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FullForcing {}", self.file_name)
    }
}
