use clap::Parser;
use folio::core::config::{self, CliOverrides, FolioConfig};
use folio::core::state::Section;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "folio", about = "Terminal portfolio with an AI assistant")]
struct Args {
    /// Gemini model to chat with
    #[arg(short, long)]
    model: Option<String>,

    /// Section to open on start
    #[arg(short, long, value_enum)]
    section: Option<Section>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to folio.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("folio.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, falling back to defaults", e);
        FolioConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            model: args.model,
            section: args.section,
        },
    );

    log::info!(
        "folio starting up: model={}, section={:?}",
        resolved.model_name,
        resolved.start_section
    );

    folio::tui::run(resolved)
}
