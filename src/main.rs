use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gear_core::{StageInput, WorkspaceError};
use gearflow::api::wire;
use gearflow::{AppConfig, AppError, GearService, StageSlot};
use log::{debug, info};
use serde_json::json;

#[derive(Debug, Parser)]
#[command(name = "gearflow", version, about = "Pipeline de inspección de engranajes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lee peticiones JSON (una por línea) de stdin y escribe envelopes en stdout.
    Serve,
    /// Ejecuta create-project -> upload -> detection -> modeling -> simulation.
    Pipeline {
        #[arg(long)]
        project_name: String,
        #[arg(long)]
        project_path: PathBuf,
        /// Imagen(es) a subir e inspeccionar.
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
        #[arg(long, default_value = "1")]
        group: String,
        #[arg(long, default_value = "medium")]
        precision: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let cfg = AppConfig::from_env()?;
    debug!("config: {cfg:?}");
    let service = GearService::from_config(&cfg);
    match cli.command {
        Command::Serve => serve(&service),
        Command::Pipeline { project_name,
                            project_path,
                            images,
                            group,
                            precision,
                            seed } => pipeline(&service, &project_name, &project_path, &images, &group, &precision, seed),
    }
}

fn serve(service: &GearService) -> Result<(), AppError> {
    info!("serving requests on stdin");
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let resp = match wire::parse_line(&line) {
            Ok(req) => service.handle(req),
            Err(err) => gearflow::Response::error(&err),
        };
        serde_json::to_writer(&mut out, &wire::to_envelope(resp))?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}

fn pipeline(service: &GearService,
            project_name: &str,
            project_path: &Path,
            images: &[PathBuf],
            group: &str,
            precision: &str,
            seed: Option<u64>)
            -> Result<(), AppError> {
    let ws = service.create_project(project_name, &project_path.to_string_lossy())?;
    info!("project {} at {}", ws.name, ws.root.display());

    let mut uploaded = Vec::with_capacity(images.len());
    for path in images {
        let file_name = path.file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .ok_or_else(|| AppError::Config(format!("not a file: {}", path.display())))?;
        let mut file = File::open(path)?;
        uploaded.push(service.upload(&file_name, &mut file)?.name);
    }

    let detection = service.run(StageSlot::Detection,
                                &StageInput::new(uploaded, json!({ "precision": precision, "seed": seed })))?;
    let is_damage = detection.summary
                             .get("isDamage")
                             .and_then(|v| v.as_bool())
                             .ok_or_else(|| WorkspaceError::StorageFailure("detection summary without isDamage".into()))?;

    let modeling = service.run(StageSlot::Modeling,
                               &StageInput::params_only(json!({ "groupNumber": group, "isDamage": is_damage })))?;
    let model_name = modeling.outputs.values().map(|a| a.name.clone()).collect::<Vec<_>>();
    let simulation = service.run(StageSlot::Simulation,
                                 &StageInput::new(model_name, json!({ "gearGroupNumber": group, "isDamage": is_damage })))?;

    let report = json!({
        "project": ws,
        "detection": detection,
        "modeling": modeling,
        "simulation": simulation,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
