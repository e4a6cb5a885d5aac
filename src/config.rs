//! TOML run descriptions.
//!
//! A run file has a mandatory `[main]` table and one optional table per
//! section. Omitted fields take the section defaults. Every value goes
//! through the section constructors, so a run file is held to the same
//! domain rules as programmatic construction.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SimxError};
use crate::settings::{
    Active, Background, BoundaryCondition, BuildingSettings, Cloud, FacadeMode, Facades,
    FullForcing, InflowAvg, Ivs, Lbc, MainSettings, ModelTiming, OutputSettings, ParallelCpu,
    PlantSetting, Pollutant, SimpleForcing, SoilSettings, SolarAdjust, Sor, Sources, TThread,
    TimeSteps, Turbulence, TurbulenceModel,
};
use crate::settings::validation::KELVIN_OFFSET;
use crate::simulation::Simulation;

/// Top-level run description parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Run identity and initial atmosphere.
    pub main: MainConfig,
    pub simple_forcing: Option<SimpleForcingConfig>,
    pub tthread: Option<TThreadConfig>,
    pub model_timing: Option<ModelTimingConfig>,
    pub soil: Option<SoilConfig>,
    pub sources: Option<SourcesConfig>,
    pub turbulence: Option<TurbulenceConfig>,
    pub time_steps: Option<TimeStepsConfig>,
    pub output: Option<OutputConfig>,
    pub clouds: Option<CloudConfig>,
    pub background: Option<BackgroundConfig>,
    pub solar_adjust: Option<SolarAdjustConfig>,
    pub building: Option<BuildingConfig>,
    pub ivs: Option<IvsConfig>,
    pub parallel: Option<ParallelConfig>,
    pub sor: Option<SorConfig>,
    pub inflow_avg: Option<InflowAvgConfig>,
    pub plant: Option<PlantConfig>,
    pub facades: Option<FacadesConfig>,
    pub lbc: Option<LbcConfig>,
    pub full_forcing: Option<FullForcingConfig>,
}

/// `[main]`: only `name` and `inx` are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MainConfig {
    pub name: String,
    /// Project (`.inx`) file; the control file is written next to it.
    pub inx: PathBuf,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    /// Wind speed at 10 m (m/s).
    pub wind_speed: Option<f64>,
    /// Wind direction (degrees, `[0, 360)`).
    pub wind_dir: Option<f64>,
    /// Roughness length (m).
    pub roughness: Option<f64>,
    /// Initial temperature (°C).
    pub initial_temperature: Option<f64>,
    /// Simulated hours.
    pub sim_duration: Option<i64>,
    /// Specific humidity at 2500 m (g/kg).
    pub specific_humidity: Option<f64>,
    /// Relative humidity at 2 m (%).
    pub relative_humidity: Option<f64>,
}

/// `[simple_forcing]`: paired hourly series.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleForcingConfig {
    /// Air temperature (°C).
    pub temperature: Vec<f64>,
    /// Relative humidity (%).
    pub relative_humidity: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TThreadConfig {
    pub use_threading: Active,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelTimingConfig {
    pub surface_steps: Option<i64>,
    pub flow_steps: Option<i64>,
    pub radiation_steps: Option<i64>,
    pub plant_steps: Option<i64>,
    pub sources_steps: Option<i64>,
}

/// `[soil]`: layer arrays ordered upper, middle, deep, bedrock.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoilConfig {
    /// Layer temperatures (°C).
    pub temperature: Option<[f64; 4]>,
    /// Layer water contents (%).
    pub water: Option<[f64; 4]>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    pub pollutant_name: String,
    pub pollutant: Pollutant,
    #[serde(default)]
    pub multiple_sources: Active,
    #[serde(default)]
    pub active_chemistry: Active,
    /// Particle diameter (µm).
    pub particle_diameter: Option<f64>,
    /// Particle density (g/cm³).
    pub particle_density: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurbulenceConfig {
    pub model: TurbulenceModel,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeStepsConfig {
    pub sunheight_step01: Option<f64>,
    pub sunheight_step02: Option<f64>,
    pub dt_step00: Option<f64>,
    pub dt_step01: Option<f64>,
    pub dt_step02: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Main output interval (minutes).
    pub main_files: Option<i64>,
    /// Text output interval (minutes).
    pub text_files: Option<i64>,
    pub netcdf: Active,
    pub netcdf_all_data_in_one_file: Active,
}

/// `[clouds]`: cover in oktas.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudConfig {
    pub low: f64,
    pub middle: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub user_spec: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm10: f64,
    pub pm25: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarAdjustConfig {
    pub sw_factor: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingConfig {
    /// Indoor temperature (°C).
    pub indoor_temp: f64,
    pub indoor_const: Option<Active>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IvsConfig {
    pub on: Active,
    pub memory: Active,
}

/// `[parallel]` takes no keys; its presence enables the section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelConfig {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SorConfig {
    pub mode: Active,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InflowAvgConfig {
    pub avg: Active,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// Background CO2 (ppm); negative values are clamped to zero.
    pub co2_ppm: i64,
    #[serde(default)]
    pub leaf_transmittance: Active,
    #[serde(default)]
    pub tree_calendar: Active,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacadesConfig {
    pub mode: FacadeMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LbcConfig {
    pub temperature_humidity: BoundaryCondition,
    pub turbulence: BoundaryCondition,
}

/// `[full_forcing]`: the forcing file must already exist next to the project.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FullForcingConfig {
    pub file_name: String,
    pub min_flow_steps: Option<i64>,
    pub limit_wind_2500: Option<Active>,
    pub max_wind_2500: Option<f64>,
    pub force_temperature: Option<Active>,
    pub force_wind: Option<Active>,
    pub force_relative_humidity: Option<Active>,
    pub force_precipitation: Option<Active>,
    pub force_rad_clouds: Option<Active>,
}

impl RunConfig {
    /// Parses a run description from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Configuration` if the
    /// TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SimxError::Configuration(msg) => {
                SimxError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parses a run description from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the TOML is invalid, lacks `[main]`, or
    /// contains unknown keys or selector names.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SimxError::Configuration(e.to_string()))
    }

    /// Builds the validated simulation aggregate.
    ///
    /// # Errors
    ///
    /// Returns the first domain violation found, section by section.
    pub fn to_simulation(&self) -> Result<Simulation> {
        let mut sim = Simulation::new(self.main.to_settings()?);

        if let Some(sf) = &self.simple_forcing {
            sim.attach(SimpleForcing::new(&sf.temperature, &sf.relative_humidity)?);
        }
        if let Some(t) = &self.tthread {
            sim.attach(TThread::new(t.use_threading));
        }
        if let Some(t) = &self.model_timing {
            let d = ModelTiming::default();
            sim.attach(ModelTiming::new(
                t.surface_steps.unwrap_or(d.surface_steps().into()),
                t.flow_steps.unwrap_or(d.flow_steps().into()),
                t.radiation_steps.unwrap_or(d.radiation_steps().into()),
                t.plant_steps.unwrap_or(d.plant_steps().into()),
                t.sources_steps.unwrap_or(d.sources_steps().into()),
            )?);
        }
        if let Some(soil) = &self.soil {
            let d = SoilSettings::default();
            let temperature = match soil.temperature {
                Some(t) => t,
                None => d.temperatures().map(|k| k - KELVIN_OFFSET),
            };
            sim.attach(SoilSettings::new(
                temperature,
                soil.water.unwrap_or(d.water_contents()),
            )?);
        }
        if let Some(s) = &self.sources {
            let mut sources = Sources::new(
                s.pollutant_name.clone(),
                s.pollutant,
                s.multiple_sources,
                s.active_chemistry,
            );
            if let Some(diameter) = s.particle_diameter {
                sources = sources.with_particle_diameter(diameter)?;
            }
            if let Some(density) = s.particle_density {
                sources = sources.with_particle_density(density)?;
            }
            sim.attach(sources);
        }
        if let Some(t) = &self.turbulence {
            sim.attach(Turbulence::new(t.model));
        }
        if let Some(t) = &self.time_steps {
            let d = TimeSteps::default();
            sim.attach(TimeSteps::new(
                t.sunheight_step01.unwrap_or(d.sunheight_step01()),
                t.sunheight_step02.unwrap_or(d.sunheight_step02()),
                t.dt_step00.unwrap_or(d.dt_step00()),
                t.dt_step01.unwrap_or(d.dt_step01()),
                t.dt_step02.unwrap_or(d.dt_step02()),
            )?);
        }
        if let Some(o) = &self.output {
            let d = OutputSettings::default();
            sim.attach(OutputSettings::new(
                o.main_files.unwrap_or(d.main_files().into()),
                o.text_files.unwrap_or(d.text_files().into()),
                o.netcdf,
                o.netcdf_all_data_in_one_file,
            )?);
        }
        if let Some(c) = &self.clouds {
            sim.attach(Cloud::new(c.low, c.middle, c.high)?);
        }
        if let Some(b) = &self.background {
            sim.attach(Background::new(b.user_spec, b.no, b.no2, b.o3, b.pm10, b.pm25)?);
        }
        if let Some(s) = &self.solar_adjust {
            sim.attach(SolarAdjust::new(s.sw_factor)?);
        }
        if let Some(b) = &self.building {
            let mut building = BuildingSettings::new(b.indoor_temp)?;
            if let Some(indoor_const) = b.indoor_const {
                building.set_indoor_const(indoor_const)?;
            }
            sim.attach(building);
        }
        if let Some(ivs) = &self.ivs {
            sim.attach(Ivs::new(ivs.on, ivs.memory));
        }
        if self.parallel.is_some() {
            sim.attach(ParallelCpu);
        }
        if let Some(sor) = &self.sor {
            sim.attach(Sor::new(sor.mode));
        }
        if let Some(avg) = &self.inflow_avg {
            sim.attach(InflowAvg::new(avg.avg));
        }
        if let Some(p) = &self.plant {
            sim.attach(PlantSetting::new(
                p.leaf_transmittance,
                p.tree_calendar,
                p.co2_ppm,
            ));
        }
        if let Some(f) = &self.facades {
            sim.attach(Facades::new(f.mode));
        }
        if let Some(lbc) = &self.lbc {
            sim.attach(Lbc::new(lbc.temperature_humidity, lbc.turbulence));
        }
        if let Some(ff) = &self.full_forcing {
            sim.attach(ff.to_settings()?);
        }

        Ok(sim)
    }
}

impl MainConfig {
    fn to_settings(&self) -> Result<MainSettings> {
        let mut main = MainSettings::new(self.name.clone(), self.inx.clone())?;
        if let Some(date) = &self.start_date {
            main = main.with_start_date(date)?;
        }
        if let Some(time) = &self.start_time {
            main = main.with_start_time(time)?;
        }
        if let Some(speed) = self.wind_speed {
            main = main.with_wind_speed(speed)?;
        }
        if let Some(dir) = self.wind_dir {
            main = main.with_wind_dir(dir)?;
        }
        if let Some(z0) = self.roughness {
            main = main.with_roughness(z0)?;
        }
        if let Some(t) = self.initial_temperature {
            main = main.with_initial_temperature(t)?;
        }
        if let Some(hours) = self.sim_duration {
            main = main.with_sim_duration(hours)?;
        }
        if let Some(q) = self.specific_humidity {
            main = main.with_specific_humidity(q)?;
        }
        if let Some(rh) = self.relative_humidity {
            main = main.with_relative_humidity(rh)?;
        }
        Ok(main)
    }
}

impl FullForcingConfig {
    fn to_settings(&self) -> Result<FullForcing> {
        let mut ff = FullForcing::new(self.file_name.clone())?;
        if let Some(steps) = self.min_flow_steps {
            ff = ff.with_min_flow_steps(steps)?;
        }
        if let Some(limit) = self.limit_wind_2500 {
            ff = ff.with_limit_wind_2500(limit);
        }
        if let Some(speed) = self.max_wind_2500 {
            ff = ff.with_max_wind_2500(speed)?;
        }
        if let Some(force) = self.force_temperature {
            ff = ff.with_force_temperature(force);
        }
        if let Some(force) = self.force_wind {
            ff = ff.with_force_wind(force);
        }
        if let Some(force) = self.force_relative_humidity {
            ff = ff.with_force_relative_humidity(force);
        }
        if let Some(force) = self.force_precipitation {
            ff = ff.with_force_precipitation(force);
        }
        if let Some(force) = self.force_rad_clouds {
            ff = ff.with_force_rad_clouds(force);
        }
        Ok(ff)
    }
}
