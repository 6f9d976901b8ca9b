use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cardforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card per CSV row and write an HTML gallery.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input CSV with a `Cards` column.
    #[arg(long)]
    csv: PathBuf,

    /// Frame catalog JSON.
    #[arg(long)]
    frames: PathBuf,

    /// Root directory that asset URIs resolve against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Output directory for `gallery.html` and downloads.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Batch configuration JSON. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write one PNG per card into the output directory.
    #[arg(long)]
    download: bool,

    /// Use only the default frame instead of color-based frames.
    #[arg(long)]
    force_default_frame: bool,

    /// Fail rows whose art does not load instead of using blank art.
    #[arg(long)]
    strict_art: bool,

    /// Rules-text column preset.
    #[arg(long, value_enum)]
    rules: Option<RulesChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RulesChoice {
    Quote,
    Flavour,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args).await,
    }
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &GenerateArgs) -> anyhow::Result<cardforge::BatchConfig> {
    let mut cfg = match &args.config {
        Some(path) => cardforge::BatchConfig::from_path(path)?,
        None => cardforge::BatchConfig::default(),
    };
    if args.download {
        cfg.download_dir = Some(args.out.clone());
    }
    if args.force_default_frame {
        cfg.force_default_frame = true;
    }
    if args.strict_art {
        cfg.art_policy = cardforge::ArtPolicy::Strict;
    }
    if let Some(rules) = args.rules {
        cfg.rules_preset = match rules {
            RulesChoice::Quote => cardforge::RulesPreset::Quote,
            RulesChoice::Flavour => cardforge::RulesPreset::Flavour,
        };
        cfg.rules_columns.clear();
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;

    let text = tokio::fs::read_to_string(&args.csv)
        .await
        .with_context(|| format!("read csv '{}'", args.csv.display()))?;
    let rows = cardforge::parse_csv(&text);
    tracing::info!(rows = rows.len(), csv = %args.csv.display(), "csv loaded");

    let (signal, mut ready) = cardforge::CatalogSignal::channel();
    let catalog_path = args.frames.clone();
    tokio::spawn(async move {
        match cardforge::FrameCatalog::load(&catalog_path).await {
            Ok(catalog) => {
                tracing::info!(frames = catalog.len(), "frame catalog loaded");
                signal.publish(catalog);
            }
            Err(e) => tracing::error!("frame catalog unavailable: {e:#}"),
        }
    });

    let mut renderer = cardforge::CpuRenderer::new(cfg.layout.clone())?
        .with_font_dir(args.assets.join("fonts"));
    for dir in &cfg.font_dirs {
        renderer = renderer.with_font_dir(dir.clone());
    }

    let fetcher = cardforge::FsFetcher::new(&args.assets);
    let mut batch = cardforge::Batch::new(renderer, fetcher, cfg);
    let mut ctx = cardforge::RenderContext::new();
    let report = batch
        .run(&rows, &mut ctx, &mut ready)
        .await
        .context("card batch aborted")?;

    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    let gallery = args.out.join("gallery.html");
    tokio::fs::write(&gallery, cardforge::gallery_html(&report.gallery))
        .await
        .with_context(|| format!("write gallery '{}'", gallery.display()))?;

    for failure in &report.failures {
        eprintln!(
            "failed: row {} '{}' ({}): {}",
            failure.index, failure.title, failure.state, failure.error
        );
    }
    println!(
        "generated {} cards ({} failed, {} skipped) -> {}",
        report.gallery.len(),
        report.failures.len(),
        report.skipped,
        gallery.display()
    );
    Ok(())
}
