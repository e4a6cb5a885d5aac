use crate::error::Result;
use crate::settings::validation::{require_percentage, require_temperature, to_kelvin};

/// Initial soil profile: one temperature (Kelvin) and one water content (%)
/// per layer, from the upper layer down to the bedrock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilSettings {
    temp_upper_layer: f64,
    temp_middle_layer: f64,
    temp_deep_layer: f64,
    temp_bedrock_layer: f64,
    water_upper_layer: f64,
    water_middle_layer: f64,
    water_deep_layer: f64,
    water_bedrock_layer: f64,
}

impl Default for SoilSettings {
    fn default() -> Self {
        Self {
            temp_upper_layer: to_kelvin(19.85),
            temp_middle_layer: to_kelvin(19.85),
            temp_deep_layer: to_kelvin(19.85),
            temp_bedrock_layer: to_kelvin(19.85),
            water_upper_layer: 70.0,
            water_middle_layer: 75.0,
            water_deep_layer: 75.0,
            water_bedrock_layer: 75.0,
        }
    }
}

impl SoilSettings {
    /// Creates a soil profile from layer temperatures (°C) and water contents (%).
    ///
    /// Both arrays are ordered upper, middle, deep, bedrock.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for a non-finite temperature or a water content
    /// outside `[0, 100]`.
    pub fn new(temperature: [f64; 4], water: [f64; 4]) -> Result<Self> {
        let [t_upper, t_middle, t_deep, t_bedrock] = temperature;
        let [w_upper, w_middle, w_deep, w_bedrock] = water;
        Ok(Self {
            temp_upper_layer: require_temperature("soil.temp_upper_layer", t_upper)?,
            temp_middle_layer: require_temperature("soil.temp_middle_layer", t_middle)?,
            temp_deep_layer: require_temperature("soil.temp_deep_layer", t_deep)?,
            temp_bedrock_layer: require_temperature("soil.temp_bedrock_layer", t_bedrock)?,
            water_upper_layer: require_percentage("soil.water_upper_layer", w_upper)?,
            water_middle_layer: require_percentage("soil.water_middle_layer", w_middle)?,
            water_deep_layer: require_percentage("soil.water_deep_layer", w_deep)?,
            water_bedrock_layer: require_percentage("soil.water_bedrock_layer", w_bedrock)?,
        })
    }

    /// Layer temperatures in Kelvin, upper to bedrock.
    pub fn temperatures(&self) -> [f64; 4] {
        [
            self.temp_upper_layer,
            self.temp_middle_layer,
            self.temp_deep_layer,
            self.temp_bedrock_layer,
        ]
    }

    /// Layer water contents in percent, upper to bedrock.
    pub fn water_contents(&self) -> [f64; 4] {
        [
            self.water_upper_layer,
            self.water_middle_layer,
            self.water_deep_layer,
            self.water_bedrock_layer,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimxError;

    #[test]
    fn temperatures_are_kelvin() {
        let soil = SoilSettings::new([0.0, -40.0, 10.0, 10.0], [50.0; 4]).expect("valid soil");
        let t = soil.temperatures();
        assert!((t[0] - 273.15).abs() < 1e-9);
        assert!((t[1] - 233.15).abs() < 1e-9);
    }

    #[test]
    fn water_content_is_a_percentage() {
        assert!(SoilSettings::new([20.0; 4], [0.0, 100.0, 50.0, 50.0]).is_ok());
        assert!(matches!(
            SoilSettings::new([20.0; 4], [50.0, 50.0, 100.1, 50.0]),
            Err(SimxError::InvalidValue {
                field: "soil.water_deep_layer",
                ..
            })
        ));
        assert!(SoilSettings::new([20.0; 4], [-1.0, 50.0, 50.0, 50.0]).is_err());
    }

    #[test]
    fn default_profile() {
        let soil = SoilSettings::default();
        assert_eq!(soil.water_contents(), [70.0, 75.0, 75.0, 75.0]);
        assert!((soil.temperatures()[3] - 293.0).abs() < 1e-9);
    }
}
