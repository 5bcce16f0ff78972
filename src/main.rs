// src/main.rs
use std::env;
use std::process;

use eframe::egui as eg;
use movie_picker::app::{catalog, PickerApp};
use movie_picker::config::load_config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("MOVIE_PICKER_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            { eframe::Renderer::Wgpu }
            #[cfg(not(target_os = "windows"))]
            { eframe::Renderer::Glow }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = load_config();
    info!("Catalog: {}", cfg.catalog_path.display());

    // Load once, up front; a bad file stops startup before any window opens.
    let mut rng = rand::thread_rng();
    let catalog = match catalog::load_catalog(&cfg.catalog_path, &cfg.load_options(), &mut rng) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load movie list: {e}");
            eprintln!("movie-picker: {e}");
            process::exit(1);
        }
    };
    if cfg.persist_watched {
        info!("Watched toggles will be written back to {}", cfg.catalog_path.display());
    }

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        multisampling: 0,
        viewport: eg::ViewportBuilder::default()
            .with_title("Movie Pick App")
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    let app = PickerApp::new(catalog, cfg.persist_watched);
    eframe::run_native(
        "Movie Pick App",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .inspect_err(|e| {
        error!("eframe failed to start: {e:?}");
        error!("Hint: try MOVIE_PICKER_RENDERER=glow or MOVIE_PICKER_RENDERER=wgpu.");
    })
}
