use crate::error::Result;
use crate::settings::Active;
use crate::settings::validation::{require_non_negative, require_non_negative_int};

/// Threaded execution of the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TThread {
    use_threading: Active,
}

impl TThread {
    /// Thread priority requested from the engine.
    pub const PRIORITY: u8 = 5;

    pub fn new(use_threading: Active) -> Self {
        Self { use_threading }
    }

    pub fn use_threading(&self) -> Active {
        self.use_threading
    }
}

/// Dynamic time-step thresholds.
///
/// The sun-height thresholds (degrees) select which of the three time steps
/// (seconds) the flow solver uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSteps {
    sunheight_step01: f64,
    sunheight_step02: f64,
    dt_step00: f64,
    dt_step01: f64,
    dt_step02: f64,
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self {
            sunheight_step01: 40.0,
            sunheight_step02: 50.0,
            dt_step00: 2.0,
            dt_step01: 2.0,
            dt_step02: 1.0,
        }
    }
}

impl TimeSteps {
    /// Creates the thresholds; every value must be non-negative.
    pub fn new(
        sunheight_step01: f64,
        sunheight_step02: f64,
        dt_step00: f64,
        dt_step01: f64,
        dt_step02: f64,
    ) -> Result<Self> {
        Ok(Self {
            sunheight_step01: require_non_negative(
                "time_steps.sunheight_step01",
                sunheight_step01,
            )?,
            sunheight_step02: require_non_negative(
                "time_steps.sunheight_step02",
                sunheight_step02,
            )?,
            dt_step00: require_non_negative("time_steps.dt_step00", dt_step00)?,
            dt_step01: require_non_negative("time_steps.dt_step01", dt_step01)?,
            dt_step02: require_non_negative("time_steps.dt_step02", dt_step02)?,
        })
    }

    pub fn sunheight_step01(&self) -> f64 {
        self.sunheight_step01
    }

    pub fn sunheight_step02(&self) -> f64 {
        self.sunheight_step02
    }

    pub fn dt_step00(&self) -> f64 {
        self.dt_step00
    }

    pub fn dt_step01(&self) -> f64 {
        self.dt_step01
    }

    pub fn dt_step02(&self) -> f64 {
        self.dt_step02
    }
}

/// Update intervals (seconds) of the model sub-systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTiming {
    surface_steps: u32,
    flow_steps: u32,
    radiation_steps: u32,
    plant_steps: u32,
    sources_steps: u32,
}

impl Default for ModelTiming {
    fn default() -> Self {
        Self {
            surface_steps: 30,
            flow_steps: 900,
            radiation_steps: 600,
            plant_steps: 600,
            sources_steps: 600,
        }
    }
}

impl ModelTiming {
    /// Creates the intervals; every value must be non-negative.
    pub fn new(
        surface_steps: i64,
        flow_steps: i64,
        radiation_steps: i64,
        plant_steps: i64,
        sources_steps: i64,
    ) -> Result<Self> {
        Ok(Self {
            surface_steps: require_non_negative_int("model_timing.surface_steps", surface_steps)?,
            flow_steps: require_non_negative_int("model_timing.flow_steps", flow_steps)?,
            radiation_steps: require_non_negative_int(
                "model_timing.radiation_steps",
                radiation_steps,
            )?,
            plant_steps: require_non_negative_int("model_timing.plant_steps", plant_steps)?,
            sources_steps: require_non_negative_int("model_timing.sources_steps", sources_steps)?,
        })
    }

    pub fn surface_steps(&self) -> u32 {
        self.surface_steps
    }

    pub fn flow_steps(&self) -> u32 {
        self.flow_steps
    }

    pub fn radiation_steps(&self) -> u32 {
        self.radiation_steps
    }

    pub fn plant_steps(&self) -> u32 {
        self.plant_steps
    }

    pub fn sources_steps(&self) -> u32 {
        self.sources_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimxError;

    #[test]
    fn time_steps_defaults_are_valid() {
        let d = TimeSteps::default();
        let rebuilt = TimeSteps::new(40.0, 50.0, 2.0, 2.0, 1.0);
        assert_eq!(rebuilt.ok(), Some(d));
    }

    #[test]
    fn time_steps_reject_each_negative_field() {
        assert!(TimeSteps::new(-1.0, 50.0, 2.0, 2.0, 1.0).is_err());
        assert!(TimeSteps::new(40.0, -1.0, 2.0, 2.0, 1.0).is_err());
        assert!(TimeSteps::new(40.0, 50.0, -2.0, 2.0, 1.0).is_err());
        assert!(TimeSteps::new(40.0, 50.0, 2.0, -2.0, 1.0).is_err());
        assert!(matches!(
            TimeSteps::new(40.0, 50.0, 2.0, 2.0, -1.0),
            Err(SimxError::InvalidValue {
                field: "time_steps.dt_step02",
                ..
            })
        ));
    }

    #[test]
    fn model_timing_rejects_negative() {
        assert!(ModelTiming::new(30, 900, 600, 600, 600).is_ok());
        assert!(ModelTiming::new(30, -900, 600, 600, 600).is_err());
        assert!(ModelTiming::new(30, 900, 600, 600, -1).is_err());
    }

    #[test]
    fn model_timing_defaults() {
        let t = ModelTiming::default();
        assert_eq!(t.surface_steps(), 30);
        assert_eq!(t.flow_steps(), 900);
        assert_eq!(t.sources_steps(), 600);
    }
}
