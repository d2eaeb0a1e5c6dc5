#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tracing_subscriber::{EnvFilter, fmt};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = native::run() {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use dawg_viz_core::{ViewerConfig, parsers};
    use dawg_viz_ui::DawgApp;

    const DEFAULT_DOCUMENT: &str = "dawg_data.json";

    /// `dawg-viz [document] [config.json]`
    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_DOCUMENT.to_owned()));
        let config = match args.next() {
            Some(config_path) => {
                let json = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("failed to read config {config_path}"))?;
                ViewerConfig::from_json(&json)
                    .with_context(|| format!("invalid config {config_path}"))?
            }
            None => ViewerConfig::default(),
        };

        let data = std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let dawg = parsers::parse_auto(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = data.len(), "read document");

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title("dawg-viz")
                .with_inner_size([1200.0, 800.0]),
            ..Default::default()
        };
        eframe::run_native(
            "dawg-viz",
            options,
            Box::new(move |cc| Ok(Box::new(DawgApp::new(cc, config, Some(dawg))))),
        )
        .map_err(|e| anyhow!("eframe: {e}"))
    }
}
