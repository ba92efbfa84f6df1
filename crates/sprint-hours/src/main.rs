mod bootstrap;

use std::io::{self, Write};

use anyhow::Result;
use hours_core::settings::Settings;
use hours_data::analysis::{analyze_hours, AnalysisOptions};
use hours_ui::app::{App, ViewMode};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sprint Hours v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data file: {}, Year: {}, View: {}, Theme: {}",
        settings.data_file.display(),
        settings.year,
        settings.view,
        settings.theme
    );

    let options = AnalysisOptions {
        year: settings.year,
        span_end: settings.span_end_rule(),
    };
    let chart = analyze_hours(&settings.data_file, &options)?;

    match settings.view.as_str() {
        "json" => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &chart)?;
            writeln!(out)?;
        }
        view => {
            let app = App::new(
                &settings.theme,
                ViewMode::from_name(view),
                settings.data_file.display().to_string(),
                settings.year,
            );
            app.run(&chart)?;
        }
    }

    Ok(())
}
