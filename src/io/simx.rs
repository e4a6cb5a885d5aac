//! `.simx` control-file serialization.
//!
//! Writes the header, the main section and every eligible optional section,
//! in the fixed order the engine reads them. Measurements (temperatures,
//! water contents, cloud cover, shortwave factor, time steps, concentrations)
//! use six-decimal fixed point; other reals use at most fifteen significant
//! digits; counts, switches and selectors are plain integers.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{Result, SimxError};
use crate::io::emitter::{Field, SectionEmitter, XmlSectionWriter};
use crate::settings::{FullForcing, MainSettings, OutputSettings, ParallelCpu, Sources, TThread};
use crate::simulation::{Section, SectionKind, Simulation};

/// Root element of the control file.
pub const ROOT: &str = "ENVI-MET_Datafile";
/// File extension of the control file.
pub const EXTENSION: &str = "simx";
/// `chrono` format of the header revision date.
pub const REVISION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FILE_TYPE: &str = "SIMX";
const FORMAT_VERSION: &str = "2";
const REMARK: &str = "Created with envimet-simx";
const ENCRYPTION_LEVEL: &str = "0";

/// Current local time in the header's revision-date format.
pub fn revision_date_now() -> String {
    Local::now().format(REVISION_DATE_FORMAT).to_string()
}

/// Output path: `<directory of the project file>/<run name>.simx`.
///
/// # Errors
///
/// Returns `Configuration` if the project path has no parent directory.
pub fn simx_path(main: &MainSettings) -> Result<PathBuf> {
    let dir = main.inx().parent().ok_or_else(|| {
        SimxError::Configuration(format!(
            "project file \"{}\" has no parent directory",
            main.inx().display()
        ))
    })?;
    Ok(dir.join(format!("{}.{EXTENSION}", main.name())))
}

/// Writes the document for `simulation` to its derived path, stamped with
/// the current local time.
///
/// Returns the path written.
pub fn export_simx(simulation: &Simulation) -> Result<PathBuf> {
    let path = simx_path(simulation.main())?;
    export_simx_to(simulation, &path, &revision_date_now())?;
    Ok(path)
}

/// Writes the document for `simulation` to `path`.
///
/// The file is flushed and closed on every exit path. If writing fails, the
/// partial file is removed before the error is returned.
///
/// # Errors
///
/// Returns `Io` if the file cannot be created or written.
pub fn export_simx_to(simulation: &Simulation, path: &Path, revision_date: &str) -> Result<()> {
    let file = File::create(path)?;
    let written = write_simx(simulation, BufWriter::new(file), revision_date)
        .and_then(|mut writer| writer.flush().map_err(SimxError::from));

    if let Err(err) = written {
        warn!(path = %path.display(), error = %err, "discarding partial control file");
        if let Err(rm_err) = fs::remove_file(path) {
            if rm_err.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %rm_err, "could not remove partial control file");
            }
        }
        return Err(err);
    }

    info!(
        run = %simulation.main(),
        path = %path.display(),
        sections = simulation.eligible_sections().count() + 2,
        "control file written"
    );
    Ok(())
}

/// Writes the complete document to `writer` and hands it back unflushed.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn write_simx<W: Write>(simulation: &Simulation, writer: W, revision_date: &str) -> Result<W> {
    let mut xml = XmlSectionWriter::start(writer, ROOT)?;
    emit_document(simulation, &mut xml, revision_date)?;
    xml.finish()
}

/// Drives `emitter` through the header, the main section and every eligible
/// optional section. Returns the number of sections emitted.
pub fn emit_document(
    simulation: &Simulation,
    emitter: &mut impl SectionEmitter,
    revision_date: &str,
) -> Result<usize> {
    emitter.emit("Header", &header_fields(revision_date))?;
    emitter.emit("mainData", &main_fields(simulation.main()))?;
    let mut emitted = 2;

    for kind in SectionKind::ALL {
        let Some(section) = simulation.section(kind) else {
            continue;
        };
        if simulation.is_suppressed(kind) {
            debug!(section = %kind, "suppressed by forcing");
            continue;
        }
        debug!(%section, "emitting");
        emitter.emit(kind.title(), &section_fields(section))?;
        emitted += 1;
    }

    Ok(emitted)
}

/// Header fields; only the revision date varies.
pub fn header_fields(revision_date: &str) -> Vec<Field> {
    vec![
        ("filetype", FILE_TYPE.to_string()),
        ("version", FORMAT_VERSION.to_string()),
        ("revisiondate", revision_date.to_string()),
        ("remark", REMARK.to_string()),
        ("encryptionlevel", ENCRYPTION_LEVEL.to_string()),
    ]
}

/// The thirteen `mainData` fields.
pub fn main_fields(main: &MainSettings) -> Vec<Field> {
    let inx_file = main
        .inx()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    vec![
        ("simName", main.name().to_string()),
        ("INXFile", inx_file),
        ("filebaseName", main.name().to_string()),
        ("outDir", " ".to_string()),
        ("startDate", main.start_date().to_string()),
        ("startTime", main.start_time().to_string()),
        ("simDuration", main.sim_duration().to_string()),
        ("windSpeed", natural(main.wind_speed())),
        ("windDir", natural(main.wind_dir())),
        ("z0", natural(main.roughness())),
        ("T_H", natural(main.initial_temperature())),
        ("Q_H", natural(main.specific_humidity())),
        ("Q_2m", natural(main.relative_humidity())),
    ]
}

/// Encodes the fields of one optional section.
pub fn section_fields(section: &Section) -> Vec<Field> {
    match section {
        Section::SimpleForcing(sf) => vec![
            ("TAir", joined(sf.temperature())),
            ("Qrel", joined(sf.relative_humidity())),
        ],
        Section::TThread(t) => vec![
            ("UseTThread_CallMain", t.use_threading().to_string()),
            ("TThreadPRIO", TThread::PRIORITY.to_string()),
        ],
        Section::ModelTiming(t) => vec![
            ("surfaceSteps", t.surface_steps().to_string()),
            ("flowSteps", t.flow_steps().to_string()),
            ("radiationSteps", t.radiation_steps().to_string()),
            ("plantSteps", t.plant_steps().to_string()),
            ("sourcesSteps", t.sources_steps().to_string()),
        ],
        Section::Soil(soil) => {
            let [t_upper, t_middle, t_deep, t_bedrock] = soil.temperatures();
            let [w_upper, w_middle, w_deep, w_bedrock] = soil.water_contents();
            vec![
                ("tempUpperlayer", fixed6(t_upper)),
                ("tempMiddlelayer", fixed6(t_middle)),
                ("tempDeeplayer", fixed6(t_deep)),
                ("tempBedrockLayer", fixed6(t_bedrock)),
                ("waterUpperlayer", fixed6(w_upper)),
                ("waterMiddlelayer", fixed6(w_middle)),
                ("waterDeeplayer", fixed6(w_deep)),
                ("waterBedrockLayer", fixed6(w_bedrock)),
            ]
        }
        Section::Sources(s) => vec![
            ("userPolluName", s.user_pollutant_name().to_string()),
            ("userPolluType", s.user_pollutant_type().code().to_string()),
            ("userPartDiameter", natural(s.particle_diameter())),
            ("userPartDensity", natural(s.particle_density())),
            ("multipleSources", s.multiple_sources().to_string()),
            ("activeChem", s.active_chemistry().to_string()),
            ("isoprene", Sources::ISOPRENE.to_string()),
        ],
        Section::Turbulence(t) => vec![("turbulenceModel", t.model().code().to_string())],
        Section::TimeSteps(t) => vec![
            ("sunheight_step01", fixed6(t.sunheight_step01())),
            ("sunheight_step02", fixed6(t.sunheight_step02())),
            ("dt_step00", fixed6(t.dt_step00())),
            ("dt_step01", fixed6(t.dt_step01())),
            ("dt_step02", fixed6(t.dt_step02())),
        ],
        Section::OutputSettings(o) => vec![
            ("mainFiles", o.main_files().to_string()),
            ("textFiles", o.text_files().to_string()),
            ("netCDF", o.netcdf().to_string()),
            (
                "netCDFAllDataInOneFile",
                o.netcdf_all_data_in_one_file().to_string(),
            ),
            ("inclNestingGrids", OutputSettings::NESTING_GRIDS.to_string()),
        ],
        Section::Clouds(c) => vec![
            ("lowClouds", fixed6(c.low())),
            ("middleClouds", fixed6(c.middle())),
            ("highClouds", fixed6(c.high())),
        ],
        Section::Background(b) => {
            let [user_spec, no, no2, o3, pm10, pm25] = b.concentrations();
            vec![
                ("userSpec", fixed6(user_spec)),
                ("NO", fixed6(no)),
                ("NO2", fixed6(no2)),
                ("O3", fixed6(o3)),
                ("PM_10", fixed6(pm10)),
                ("PM_2_5", fixed6(pm25)),
            ]
        }
        Section::SolarAdjust(s) => vec![("SWFactor", fixed6(s.sw_factor()))],
        Section::Building(b) => vec![
            ("indoorTemp", fixed6(b.indoor_temp())),
            ("indoorConst", b.indoor_const().to_string()),
        ],
        Section::Ivs(ivs) => vec![
            ("IVSOn", ivs.on().to_string()),
            ("IVSMem", ivs.memory().to_string()),
        ],
        Section::Parallel(_) => vec![("CPUdemand", ParallelCpu::CPU_DEMAND.to_string())],
        Section::Sor(sor) => vec![("SORMode", sor.mode().to_string())],
        Section::InflowAvg(avg) => vec![("inflowAvg", avg.avg().to_string())],
        Section::PlantModel(p) => vec![
            ("CO2BackgroundPPM", p.co2_ppm().to_string()),
            ("LeafTransmittance", p.leaf_transmittance().to_string()),
            ("TreeCalendar", p.tree_calendar().to_string()),
        ],
        Section::Facades(f) => vec![("FacadeMode", f.mode().code().to_string())],
        Section::Lbc(lbc) => vec![
            ("LBC_TQ", lbc.temperature_humidity().code().to_string()),
            ("LBC_TKE", lbc.turbulence().code().to_string()),
        ],
        Section::FullForcing(ff) => vec![
            ("fileName", ff.file_name().to_string()),
            ("forceT", ff.force_temperature().to_string()),
            ("forceQ", ff.force_relative_humidity().to_string()),
            ("forceWind", ff.force_wind().to_string()),
            ("forcePrecip", ff.force_precipitation().to_string()),
            ("forceRadClouds", ff.force_rad_clouds().to_string()),
            (
                "interpolationMethod",
                FullForcing::INTERPOLATION_METHOD.to_string(),
            ),
            ("nudging", FullForcing::NUDGING.to_string()),
            ("nudgingFactor", FullForcing::NUDGING_FACTOR.to_string()),
            ("minFlowsteps", ff.min_flow_steps().to_string()),
            ("limitWind2500", ff.limit_wind_2500().to_string()),
            ("maxWind2500", natural(ff.max_wind_2500())),
            ("z_0", FullForcing::Z_0.to_string()),
        ],
    }
}

fn fixed6(value: f64) -> String {
    format!("{value:.6}")
}

/// Fifteen significant digits with trailing zeros dropped (`233.15`, `2.5`,
/// `20`), so Celsius to Kelvin conversion noise never reaches the document.
fn natural(value: f64) -> String {
    format!("{value:.14e}")
        .parse::<f64>()
        .unwrap_or(value)
        .to_string()
}

fn joined(values: &[f64]) -> String {
    values
        .iter()
        .copied()
        .map(natural)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{
        Active, BoundaryCondition, Cloud, Lbc, SimpleForcing, SoilSettings, SolarAdjust, TimeSteps,
    };

    #[derive(Default)]
    struct Recorder {
        sections: Vec<(String, Vec<Field>)>,
    }

    impl SectionEmitter for Recorder {
        fn emit(&mut self, title: &str, fields: &[Field]) -> Result<()> {
            self.sections.push((title.to_string(), fields.to_vec()));
            Ok(())
        }
    }

    impl Recorder {
        fn titles(&self) -> Vec<&str> {
            self.sections.iter().map(|(t, _)| t.as_str()).collect()
        }

        fn value(&self, title: &str, field: &str) -> Option<&str> {
            self.sections
                .iter()
                .find(|(t, _)| t == title)
                .and_then(|(_, fields)| fields.iter().find(|(n, _)| *n == field))
                .map(|(_, v)| v.as_str())
        }
    }

    fn test1() -> Simulation {
        let main = MainSettings::new("Test1", "C:/proj/Test1.inx")
            .and_then(|m| m.with_start_date("23.06.2018"))
            .and_then(|m| m.with_start_time("06:00:00"))
            .and_then(|m| m.with_wind_speed(2.5))
            .and_then(|m| m.with_sim_duration(24))
            .expect("valid main");
        Simulation::new(main)
    }

    fn record(sim: &Simulation) -> Recorder {
        let mut rec = Recorder::default();
        emit_document(sim, &mut rec, "2024-01-01 00:00:00").expect("recording never fails");
        rec
    }

    #[test]
    fn main_only_emits_header_then_main() {
        let rec = record(&test1());
        assert_eq!(rec.titles(), vec!["Header", "mainData"]);
        assert_eq!(rec.value("mainData", "simDuration"), Some("24"));
        assert_eq!(rec.value("mainData", "windSpeed"), Some("2.5"));
        assert_eq!(rec.value("mainData", "INXFile"), Some("Test1.inx"));
        assert_eq!(rec.value("mainData", "outDir"), Some(" "));
        assert_eq!(rec.value("Header", "encryptionlevel"), Some("0"));
        assert_eq!(rec.value("Header", "revisiondate"), Some("2024-01-01 00:00:00"));
    }

    #[test]
    fn main_fields_are_in_wire_order() {
        let names: Vec<&str> = main_fields(test1().main()).iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "simName",
                "INXFile",
                "filebaseName",
                "outDir",
                "startDate",
                "startTime",
                "simDuration",
                "windSpeed",
                "windDir",
                "z0",
                "T_H",
                "Q_H",
                "Q_2m"
            ]
        );
    }

    #[test]
    fn measurements_use_six_decimals() {
        let sim = test1()
            .with(SoilSettings::new([0.0; 4], [70.0, 75.0, 75.0, 75.0]).expect("valid soil"))
            .with(Cloud::new(8.0, 0.0, 2.5).expect("valid clouds"))
            .with(SolarAdjust::new(1.0).expect("valid factor"))
            .with(TimeSteps::default());
        let rec = record(&sim);
        assert_eq!(rec.value("Soil", "tempUpperlayer"), Some("273.150000"));
        assert_eq!(rec.value("Soil", "waterUpperlayer"), Some("70.000000"));
        assert_eq!(rec.value("Clouds", "lowClouds"), Some("8.000000"));
        assert_eq!(rec.value("Clouds", "highClouds"), Some("2.500000"));
        assert_eq!(rec.value("SolarAdjust", "SWFactor"), Some("1.000000"));
        assert_eq!(rec.value("TimeSteps", "dt_step02"), Some("1.000000"));
    }

    #[test]
    fn simple_forcing_is_joined_kelvin() {
        let sf = SimpleForcing::new(&[0.0, 0.0], &[50.0, 62.5]).expect("valid forcing");
        let rec = record(&test1().with(sf));
        assert_eq!(rec.value("SimpleForcing", "TAir"), Some("273.15,273.15"));
        assert_eq!(rec.value("SimpleForcing", "Qrel"), Some("50,62.5"));
    }

    #[test]
    fn kelvin_values_carry_no_conversion_noise() {
        let main = MainSettings::new("Test1", "C:/proj/Test1.inx")
            .and_then(|m| m.with_initial_temperature(-40.0))
            .expect("valid main");
        let sf = SimpleForcing::new(&[-40.0, 21.3, 18.0, 19.5, 27.0], &[50.0; 5])
            .expect("valid forcing");
        let rec = record(&Simulation::new(main).with(sf));
        assert_eq!(rec.value("mainData", "T_H"), Some("233.15"));
        assert_eq!(
            rec.value("SimpleForcing", "TAir"),
            Some("233.15,294.45,291.15,292.65,300.15")
        );
    }

    #[test]
    fn natural_numbers_drop_trailing_zeros() {
        assert_eq!(natural(2.5), "2.5");
        assert_eq!(natural(20.0), "20");
        assert_eq!(natural(0.01), "0.01");
        assert_eq!(natural(-40.0 + 273.15), "233.15");
    }

    #[test]
    fn full_forcing_suppresses_simple_forcing_clouds_and_solar() {
        let sim = test1()
            .with(SimpleForcing::new(&[20.0], &[50.0]).expect("valid forcing"))
            .with(Cloud::default())
            .with(SolarAdjust::new(1.2).expect("valid factor"))
            .with(FullForcing::new("Test1.FOX").expect("valid forcing"));
        let rec = record(&sim);
        assert_eq!(rec.titles(), vec!["Header", "mainData", "FullForcing"]);
        assert_eq!(rec.value("FullForcing", "fileName"), Some("Test1.FOX"));
        assert_eq!(rec.value("FullForcing", "maxWind2500"), Some("20"));
        assert_eq!(rec.value("FullForcing", "z_0"), Some("0.10000"));
    }

    #[test]
    fn lbc_suppressed_only_with_both_forcings() {
        let lbc = Lbc::new(BoundaryCondition::Forced, BoundaryCondition::Cyclic);
        let with_full = test1()
            .with(lbc)
            .with(FullForcing::new("Test1.FOX").expect("valid forcing"));
        assert_eq!(record(&with_full).value("LBC", "LBC_TQ"), Some("2"));
        assert_eq!(record(&with_full).value("LBC", "LBC_TKE"), Some("3"));

        let with_both = with_full.with(SimpleForcing::new(&[20.0], &[50.0]).expect("valid"));
        assert!(!record(&with_both).titles().contains(&"LBC"));
    }

    #[test]
    fn every_section_in_fixed_order() {
        use crate::settings::*;

        let sim = test1()
            .with(FullForcing::new("f.FOX").expect("valid"))
            .with(Lbc::new(BoundaryCondition::Open, BoundaryCondition::Open))
            .with(Facades::new(FacadeMode::Din6946))
            .with(PlantSetting::new(Active::Yes, Active::No, 400))
            .with(InflowAvg::new(Active::Yes))
            .with(Sor::new(Active::No))
            .with(ParallelCpu)
            .with(Ivs::new(Active::Yes, Active::No))
            .with(BuildingSettings::new(20.0).expect("valid"))
            .with(Background::default())
            .with(OutputSettings::default())
            .with(TimeSteps::default())
            .with(Turbulence::new(TurbulenceModel::KatoLaunder))
            .with(Sources::new("Dust", Pollutant::Pm, Active::No, Active::No))
            .with(SoilSettings::default())
            .with(ModelTiming::default())
            .with(TThread::new(Active::Yes));
        let rec = record(&sim);
        assert_eq!(
            rec.titles(),
            vec![
                "Header",
                "mainData",
                "TThread",
                "ModelTiming",
                "Soil",
                "Sources",
                "Turbulence",
                "TimeSteps",
                "OutputSettings",
                "Background",
                "Building",
                "IVS",
                "Parallel",
                "SOR",
                "InflowAvg",
                "PlantModel",
                "Facades",
                "LBC",
                "FullForcing"
            ]
        );
        assert_eq!(rec.value("TThread", "TThreadPRIO"), Some("5"));
        assert_eq!(rec.value("Turbulence", "turbulenceModel"), Some("1"));
        assert_eq!(rec.value("Sources", "userPartDiameter"), Some("10"));
        assert_eq!(rec.value("Sources", "isoprene"), Some("0"));
        assert_eq!(rec.value("OutputSettings", "inclNestingGrids"), Some("0"));
        assert_eq!(rec.value("Background", "PM_2_5"), Some("0.000000"));
        assert_eq!(rec.value("Parallel", "CPUdemand"), Some("ALL"));
        assert_eq!(rec.value("PlantModel", "CO2BackgroundPPM"), Some("400"));
        assert_eq!(rec.value("Facades", "FacadeMode"), Some("1"));
        assert_eq!(rec.value("FullForcing", "forcePrecip"), Some("0"));
    }

    #[test]
    fn xml_document_shape() {
        let bytes = write_simx(&test1(), Vec::new(), "2024-01-01 00:00:00").expect("in-memory write");
        let xml = String::from_utf8(bytes).expect("utf-8");
        assert!(xml.starts_with("<ENVI-MET_Datafile>"));
        assert!(xml.trim_end().ends_with("</ENVI-MET_Datafile>"));
        assert!(xml.contains("<simDuration>24</simDuration>"));
        assert!(xml.find("<Header>") < xml.find("<mainData>"));
    }

    #[test]
    fn simx_path_uses_project_directory() {
        let path = simx_path(test1().main()).expect("has parent");
        assert_eq!(path, PathBuf::from("C:/proj").join("Test1.simx"));
    }

    #[test]
    fn revision_date_has_expected_shape() {
        let now = revision_date_now();
        assert!(
            chrono::NaiveDateTime::parse_from_str(&now, REVISION_DATE_FORMAT).is_ok(),
            "{now}"
        );
    }
}
