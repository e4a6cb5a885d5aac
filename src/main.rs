//! envimet-simx entry point: loads a TOML run description and writes the control file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use envimet_simx::config::RunConfig;
use envimet_simx::io::simx::{export_simx, revision_date_now, write_simx};

/// Parsed CLI arguments.
struct CliArgs {
    run_path: Option<String>,
    name_override: Option<String>,
    inx_override: Option<PathBuf>,
    stdout: bool,
}

fn print_help() {
    eprintln!("envimet-simx - ENVI-met simulation control file writer");
    eprintln!();
    eprintln!("Usage: envimet-simx --run <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --run <path>      Load the run description from a TOML file");
    eprintln!("  --name <name>     Override the run name");
    eprintln!("  --inx <path>      Override the project (.inx) file");
    eprintln!("  --stdout          Write the document to stdout instead of next to the project");
    eprintln!("  --help            Show this help message");
    eprintln!();
    eprintln!("Logging is controlled by RUST_LOG (default: info).");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        run_path: None,
        name_override: None,
        inx_override: None,
        stdout: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--run" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --run requires a path argument");
                    process::exit(1);
                }
                cli.run_path = Some(args[i].clone());
            }
            "--name" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --name requires a name argument");
                    process::exit(1);
                }
                cli.name_override = Some(args[i].clone());
            }
            "--inx" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --inx requires a path argument");
                    process::exit(1);
                }
                cli.inx_override = Some(PathBuf::from(&args[i]));
            }
            "--stdout" => {
                cli.stdout = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = parse_args();
    init_tracing();

    let Some(run_path) = cli.run_path else {
        eprintln!("error: --run is required");
        print_help();
        process::exit(1);
    };

    let mut run = match RunConfig::from_toml_file(Path::new(&run_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if let Some(name) = cli.name_override {
        run.main.name = name;
    }
    if let Some(inx) = cli.inx_override {
        run.main.inx = inx;
    }

    let simulation = match run.to_simulation() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.stdout {
        let stdout = io::stdout().lock();
        let written = write_simx(&simulation, stdout, &revision_date_now())
            .and_then(|mut out| out.flush().map_err(Into::into));
        if let Err(e) = written {
            eprintln!("error: failed to write control file: {e}");
            process::exit(1);
        }
        return;
    }

    match export_simx(&simulation) {
        Ok(path) => eprintln!("Control file written to {}", path.display()),
        Err(e) => {
            eprintln!("error: failed to write control file: {e}");
            process::exit(1);
        }
    }
}
