use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SimxError};
use crate::settings::validation::{
    require_angle, require_date, require_non_negative, require_non_negative_int,
    require_percentage, require_temperature, require_time, to_kelvin,
};

/// Mandatory run parameters: identity, start time and the initial atmosphere.
///
/// Built with [`MainSettings::new`], which seeds the defaults of a summer
/// morning run, then refined with the `with_*` methods. Each method validates
/// its input and consumes `self`, so a rejected value never becomes visible.
///
/// The initial temperature is taken in degrees Celsius and kept in Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct MainSettings {
    name: String,
    inx: PathBuf,
    start_date: String,
    start_time: String,
    wind_speed: f64,
    wind_dir: f64,
    roughness: f64,
    initial_temperature_k: f64,
    sim_duration: u32,
    specific_humidity: f64,
    relative_humidity: f64,
}

impl MainSettings {
    /// Creates the main section for run `name` backed by project file `inx`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `name` is blank or is not a plain file stem
    /// (contains a path separator or is `.`/`..`), or if `inx` has no file name.
    pub fn new(name: impl Into<String>, inx: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SimxError::invalid_value("main.name", "must not be empty"));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(SimxError::invalid_value(
                "main.name",
                format!("\"{name}\" must not contain path components"),
            ));
        }
        let inx = inx.into();
        if inx.file_name().is_none() {
            return Err(SimxError::invalid_value(
                "main.inx",
                format!("\"{}\" does not name a project file", inx.display()),
            ));
        }

        Ok(Self {
            name,
            inx,
            start_date: "23.06.2018".to_string(),
            start_time: "06:00:00".to_string(),
            wind_speed: 2.5,
            wind_dir: 0.0,
            roughness: 0.01,
            initial_temperature_k: to_kelvin(19.0),
            sim_duration: 24,
            specific_humidity: 7.0,
            relative_humidity: 50.0,
        })
    }

    /// Sets the start date (`DD.MM.YYYY`).
    pub fn with_start_date(mut self, date: &str) -> Result<Self> {
        self.start_date = require_date("main.start_date", date)?;
        Ok(self)
    }

    /// Sets the start time (`HH:MM:SS`).
    pub fn with_start_time(mut self, time: &str) -> Result<Self> {
        self.start_time = require_time("main.start_time", time)?;
        Ok(self)
    }

    /// Sets the inflow wind speed at 10 m (m/s).
    pub fn with_wind_speed(mut self, speed: f64) -> Result<Self> {
        self.wind_speed = require_non_negative("main.wind_speed", speed)?;
        Ok(self)
    }

    /// Sets the inflow wind direction in degrees, `[0, 360)`.
    pub fn with_wind_dir(mut self, degrees: f64) -> Result<Self> {
        self.wind_dir = require_angle("main.wind_dir", degrees)?;
        Ok(self)
    }

    /// Sets the roughness length z0 (m).
    pub fn with_roughness(mut self, z0: f64) -> Result<Self> {
        self.roughness = require_non_negative("main.roughness", z0)?;
        Ok(self)
    }

    /// Sets the initial atmospheric temperature from degrees Celsius.
    pub fn with_initial_temperature(mut self, celsius: f64) -> Result<Self> {
        self.initial_temperature_k = require_temperature("main.initial_temperature", celsius)?;
        Ok(self)
    }

    /// Sets the simulated duration in hours.
    pub fn with_sim_duration(mut self, hours: i64) -> Result<Self> {
        self.sim_duration = require_non_negative_int("main.sim_duration", hours)?;
        Ok(self)
    }

    /// Sets the specific humidity at 2500 m (g/kg).
    pub fn with_specific_humidity(mut self, q: f64) -> Result<Self> {
        self.specific_humidity = require_non_negative("main.specific_humidity", q)?;
        Ok(self)
    }

    /// Sets the relative humidity at 2 m (%).
    pub fn with_relative_humidity(mut self, rh: f64) -> Result<Self> {
        self.relative_humidity = require_percentage("main.relative_humidity", rh)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing project (`.inx`) file.
    pub fn inx(&self) -> &Path {
        &self.inx
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn wind_dir(&self) -> f64 {
        self.wind_dir
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    /// Initial temperature in Kelvin.
    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature_k
    }

    pub fn sim_duration(&self) -> u32 {
        self.sim_duration
    }

    pub fn specific_humidity(&self) -> f64 {
        self.specific_humidity
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }
}

impl fmt::Display for MainSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mainData {} {} {}",
            self.name, self.start_date, self.start_time
        )
    }
}
