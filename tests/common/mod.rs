//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use envimet_simx::Simulation;
use envimet_simx::settings::{
    Active, BoundaryCondition, Cloud, FullForcing, Lbc, MainSettings, SimpleForcing, SolarAdjust,
};

/// Fixed header date so documents can be compared byte for byte.
pub const REVISION_DATE: &str = "2024-01-01 12:00:00";

/// Main section of the reference run `Test1`, with its project file in `dir`.
pub fn test1_main(dir: &Path) -> MainSettings {
    MainSettings::new("Test1", dir.join("Test1.inx"))
        .and_then(|m| m.with_start_date("23.06.2018"))
        .and_then(|m| m.with_start_time("06:00:00"))
        .and_then(|m| m.with_wind_speed(2.5))
        .and_then(|m| m.with_sim_duration(24))
        .expect("reference main section is valid")
}

/// Two-hour simple forcing at 20 °C and 25 °C.
pub fn simple_forcing() -> SimpleForcing {
    SimpleForcing::new(&[20.0, 25.0], &[50.0, 40.0]).expect("valid simple forcing")
}

/// Full forcing referencing `Test1.FOX`.
pub fn full_forcing() -> FullForcing {
    FullForcing::new("Test1.FOX").expect("valid full forcing")
}

/// `Test1` with every forcing-related section attached.
pub fn forced_run(dir: &Path) -> Simulation {
    Simulation::new(test1_main(dir))
        .with(simple_forcing())
        .with(Cloud::new(2.0, 1.0, 0.0).expect("valid clouds"))
        .with(SolarAdjust::new(1.0).expect("valid factor"))
        .with(Lbc::new(BoundaryCondition::Forced, BoundaryCondition::Open))
        .with(full_forcing().with_force_precipitation(Active::Yes))
}

/// Element names directly below the root, in document order.
pub fn section_titles(xml: &str) -> Vec<String> {
    xml.lines()
        .filter(|line| line.starts_with("  <") && !line.starts_with("  </") && !line.starts_with("    "))
        .filter_map(|line| {
            let tag = line.trim_start().strip_prefix('<')?;
            tag.split('>').next().map(str::to_string)
        })
        .collect()
}

/// Text of the first `<field>` element inside `<section>`.
pub fn field_value<'a>(xml: &'a str, section: &str, field: &str) -> Option<&'a str> {
    let start = xml.find(&format!("<{section}>"))?;
    let end = xml[start..].find(&format!("</{section}>"))? + start;
    let body = &xml[start..end];
    let open = format!("<{field}>");
    let from = body.find(&open)? + open.len();
    let to = body[from..].find(&format!("</{field}>"))? + from;
    Some(&body[from..to])
}
