use clap::Parser;
use log::info;
use simview::config::Args;
use simview::pendulum::DoublePendulum;
use simview::state::AppState;
use simview::{widget, ViewerError};
use std::fs::File;

/// Sends logs to `--log-file` when given, so they do not tear the terminal UI
fn init_logging(args: &Args) -> Result<(), ViewerError> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &args.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

/// Main function
pub fn main() -> Result<(), ViewerError> {
    let args = Args::parse();
    init_logging(&args)?;
    let settings = args.validate()?;

    let sim = DoublePendulum::new(settings.pendulum.clone())?;
    info!(
        "double pendulum loaded: timestep {}s, damping {}, plotting `{}`",
        settings.pendulum.timestep, settings.pendulum.damping, settings.channel
    );

    let mut app = AppState::new(sim, &settings)?;
    widget::run(&mut app)
}
