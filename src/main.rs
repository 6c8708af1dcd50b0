//! Command line frontend of the beam path visualization
use std::io::{stdin, stdout};

use beampath::{
    config::BeamPathConfig,
    console::{create_intro, run_shell, Args},
    error::BpResult,
    export::CsvRenderer,
    plottable::PlotRenderer,
    session::{Renderer, Session},
};
use clap::Parser;
use env_logger::Env;
use log::info;

fn main() -> BpResult<()> {
    let args = Args::parse();
    let level = if args.verbose { "info" } else { "warn" };
    env_logger::init_from_env(Env::default().default_filter_or(level));

    let config = match &args.config {
        Some(path) => BeamPathConfig::from_file(path)?,
        None => {
            info!("No configuration file given. Using reference configuration.");
            BeamPathConfig::default()
        }
    };
    let mut renderers: Vec<Box<dyn Renderer>> = vec![Box::new(PlotRenderer::new(&args.output)?)];
    if let Some(csv_path) = &args.csv {
        renderers.push(Box::new(CsvRenderer::new(csv_path)));
    }
    let mut session = Session::new(config, renderers);
    session.configuration_changed()?;
    if args.batch {
        return Ok(());
    }
    print!("{}", create_intro());
    run_shell(&mut session, &mut stdin().lock(), &mut stdout())
}
