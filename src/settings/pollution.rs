use std::fmt;

use serde::Deserialize;

use crate::error::Result;
use crate::settings::Active;
use crate::settings::validation::require_non_negative;

/// User-defined pollutant species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pollutant {
    Pm,
    Co,
    Co2,
    No,
    No2,
    So2,
    Nh3,
    H2o2,
    Spray,
}

impl Pollutant {
    pub fn code(self) -> u8 {
        match self {
            Self::Pm => 0,
            Self::Co => 1,
            Self::Co2 => 2,
            Self::No => 3,
            Self::No2 => 4,
            Self::So2 => 5,
            Self::Nh3 => 6,
            Self::H2o2 => 7,
            Self::Spray => 8,
        }
    }
}

/// Emission source settings for the user pollutant.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    user_pollutant_name: String,
    user_pollutant_type: Pollutant,
    user_particle_diameter: f64,
    user_particle_density: f64,
    multiple_sources: Active,
    active_chemistry: Active,
}

impl Sources {
    /// Isoprene emission switch; always written as `"0"`.
    pub const ISOPRENE: &'static str = "0";

    /// Creates the sources section with a 10 µm, 1 g/cm³ particle.
    pub fn new(
        user_pollutant_name: impl Into<String>,
        user_pollutant_type: Pollutant,
        multiple_sources: Active,
        active_chemistry: Active,
    ) -> Self {
        Self {
            user_pollutant_name: user_pollutant_name.into(),
            user_pollutant_type,
            user_particle_diameter: 10.0,
            user_particle_density: 1.0,
            multiple_sources,
            active_chemistry,
        }
    }

    /// Sets the particle diameter (µm).
    pub fn with_particle_diameter(mut self, diameter: f64) -> Result<Self> {
        self.user_particle_diameter = require_non_negative("sources.particle_diameter", diameter)?;
        Ok(self)
    }

    /// Sets the particle density (g/cm³).
    pub fn with_particle_density(mut self, density: f64) -> Result<Self> {
        self.user_particle_density = require_non_negative("sources.particle_density", density)?;
        Ok(self)
    }

    pub fn user_pollutant_name(&self) -> &str {
        &self.user_pollutant_name
    }

    pub fn user_pollutant_type(&self) -> Pollutant {
        self.user_pollutant_type
    }

    pub fn particle_diameter(&self) -> f64 {
        self.user_particle_diameter
    }

    pub fn particle_density(&self) -> f64 {
        self.user_particle_density
    }

    pub fn multiple_sources(&self) -> Active {
        self.multiple_sources
    }

    pub fn active_chemistry(&self) -> Active {
        self.active_chemistry
    }
}

impl fmt::Display for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sources {}", self.user_pollutant_name)
    }
}

/// Background concentrations at the inflow boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Background {
    user_spec: f64,
    no: f64,
    no2: f64,
    o3: f64,
    pm10: f64,
    pm25: f64,
}

impl Background {
    /// Creates the background; every concentration must be non-negative.
    pub fn new(user_spec: f64, no: f64, no2: f64, o3: f64, pm10: f64, pm25: f64) -> Result<Self> {
        Ok(Self {
            user_spec: require_non_negative("background.user_spec", user_spec)?,
            no: require_non_negative("background.no", no)?,
            no2: require_non_negative("background.no2", no2)?,
            o3: require_non_negative("background.o3", o3)?,
            pm10: require_non_negative("background.pm10", pm10)?,
            pm25: require_non_negative("background.pm25", pm25)?,
        })
    }

    /// Concentrations in wire order: user species, NO, NO2, O3, PM10, PM2.5.
    pub fn concentrations(&self) -> [f64; 6] {
        [self.user_spec, self.no, self.no2, self.o3, self.pm10, self.pm25]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimxError;

    #[test]
    fn pollutant_codes_follow_declaration_order() {
        assert_eq!(Pollutant::Pm.code(), 0);
        assert_eq!(Pollutant::No2.code(), 4);
        assert_eq!(Pollutant::Spray.code(), 8);
    }

    #[test]
    fn sources_default_particle() {
        let s = Sources::new("Dust", Pollutant::Pm, Active::No, Active::Yes);
        assert_eq!(s.particle_diameter(), 10.0);
        assert_eq!(s.particle_density(), 1.0);
        assert_eq!(s.to_string(), "Sources Dust");
    }

    #[test]
    fn sources_reject_negative_particle() {
        let s = Sources::new("Dust", Pollutant::Pm, Active::No, Active::No);
        assert!(s.clone().with_particle_diameter(-1.0).is_err());
        assert!(s.with_particle_density(-0.5).is_err());
    }

    #[test]
    fn background_rejects_negative() {
        assert!(Background::new(0.0, 1.0, 2.0, 3.0, 4.0, 5.0).is_ok());
        assert!(matches!(
            Background::new(0.0, 0.0, 0.0, -3.0, 0.0, 0.0),
            Err(SimxError::InvalidValue {
                field: "background.o3",
                ..
            })
        ));
    }
}
