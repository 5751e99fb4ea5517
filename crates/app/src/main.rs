use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use narrative_lens_core::{
    get_lens_config, get_model, list_models, AppConfig, LayoutEngine, Renderer,
};
use tracing_subscriber::EnvFilter;

fn main() -> narrative_lens_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let renderer = Renderer::new(config.canvas);

    match cli.command {
        Commands::List => run_list(),
        Commands::Lenses => run_lenses(),
        Commands::Layout { model, layout } => run_layout(renderer.layout_engine(), &model, layout),
        Commands::Render { model, output } => {
            let svg = renderer.generate_document(&model)?;
            emit(&svg, output.as_deref())
        }
        Commands::Compare { models, output } => {
            let svg = renderer.render_comparison(models.as_slice())?;
            emit(&svg, output.as_deref())
        }
        Commands::Json { model, output } => {
            let json = narrative_lens_core::to_json(renderer.layout_engine(), &model)?;
            emit(&json, output.as_deref())
        }
        Commands::Lens {
            model,
            lens,
            output,
        } => {
            let svg = renderer.render_with_lens(&model, &lens)?;
            emit(&svg, output.as_deref())
        }
    }
}

fn load_config(cli: &Cli) -> narrative_lens_core::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(width) = cli.width {
        config.canvas.width = width;
    }
    if let Some(height) = cli.height {
        config.canvas.height = height;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn run_list() -> narrative_lens_core::Result<()> {
    for name in list_models() {
        let model = get_model(name)?;
        println!(
            "{:<18} {:<22} {:>2} stages  {}",
            model.name,
            model.display_name,
            model.stage_count(),
            model.description
        );
    }
    Ok(())
}

fn run_lenses() -> narrative_lens_core::Result<()> {
    for name in narrative_lens_core::available_lenses() {
        let config = get_lens_config(name)?;
        println!("{:<12} {}", name, config.description);
    }
    Ok(())
}

fn run_layout(
    engine: &LayoutEngine,
    model: &str,
    layout: Option<String>,
) -> narrative_lens_core::Result<()> {
    let positions = match layout.as_deref() {
        Some(layout) => engine.compute_layout_as(model, layout)?,
        None => engine.compute_layout(model)?,
    };
    for position in positions {
        println!(
            "{:<26} x={:>8.1} y={:>8.1} r={:>4.1} {}",
            position.name, position.x, position.y, position.radius, position.color
        );
    }
    Ok(())
}

fn emit(contents: &str, output: Option<&Path>) -> narrative_lens_core::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(?path, bytes = contents.len(), "wrote output");
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Narrative structures as node-and-edge diagrams", long_about = None)]
struct Cli {
    /// JSON configuration file with canvas settings.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the canvas width.
    #[arg(long, global = true)]
    width: Option<u32>,
    /// Override the canvas height.
    #[arg(long, global = true)]
    height: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available narrative models.
    List,
    /// List the available lenses.
    Lenses,
    /// Print computed stage positions for a model.
    Layout {
        model: String,
        /// Use a different layout shape than the model declares.
        #[arg(short, long)]
        layout: Option<String>,
    },
    /// Render a standalone SVG document for one model.
    Render {
        model: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render several models side by side.
    Compare {
        #[arg(required = true)]
        models: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a model and its layout as JSON.
    Json {
        model: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a model through a lens.
    Lens {
        model: String,
        lens: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
