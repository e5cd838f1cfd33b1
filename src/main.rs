use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::FutureExt;
use log::info;

use booklet_studio::activity::{AGE_BANDS, LANGUAGES};
use booklet_studio::form::{run_session, Form};
use booklet_studio::rendering::{render_booklet, PageSurface};
use booklet_studio::{
    generate_booklet, ActivityType, Booklet, Controller, ExportConfig, GeminiClient, GeneratorConfig, PrintablePage,
    UserInputs,
};

#[derive(Parser)]
#[command(name = "booklet-studio", version)]
#[command(about = "Generate printable activity booklets for kids", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalOpts {
    /// Model API key (falls back to GEMINI_API_KEY)
    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, default_value = booklet_studio::DEFAULT_MODEL, global = true)]
    model: String,

    /// REST root of the model API
    #[arg(long, default_value = booklet_studio::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 60000, global = true)]
    timeout_ms: u64,

    /// Capture scale used for PDF pages
    #[arg(long, default_value_t = 2.0, global = true)]
    scale: f32,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a booklet and export it
    Generate {
        /// Theme of the activities
        #[arg(long)]
        theme: String,

        /// Student or class name shown on the cover
        #[arg(long)]
        name: String,

        #[arg(long, default_value = LANGUAGES[0])]
        language: String,

        #[arg(long, default_value = AGE_BANDS[1])]
        age: String,

        #[arg(long, value_enum, default_value_t = ActivityType::ConnectTheDots)]
        activity: ActivityType,

        #[command(flatten)]
        output: OutputOpts,

        /// Also save the generated activities as JSON
        #[arg(long)]
        save_json: Option<PathBuf>,
    },

    /// Render a previously saved booklet without calling the model
    Render {
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputOpts,
    },

    /// Fill the form interactively
    Interactive {
        #[command(flatten)]
        output: OutputOpts,
    },

    /// List the accepted languages, age bands and activity types
    Options,
}

#[derive(Args, Clone)]
struct OutputOpts {
    /// PDF path (default: activity-booklet.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one PNG per page into this directory
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Write one SVG per page into this directory
    #[arg(long)]
    svg_dir: Option<PathBuf>,
}

impl GlobalOpts {
    fn generator_config(&self) -> GeneratorConfig {
        let from_env = GeneratorConfig::from_env();
        GeneratorConfig {
            api_key: self.api_key.clone().or(from_env.api_key),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    fn export_config(&self) -> ExportConfig {
        ExportConfig { scale: self.scale, ..Default::default() }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_svgs(surfaces: &[PageSurface], dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (i, s) in surfaces.iter().enumerate() {
        std::fs::write(dir.join(format!("page-{}.svg", i)), &s.svg)?;
    }
    Ok(())
}

#[cfg(feature = "export")]
async fn write_outputs(pages: &[PrintablePage], opts: &OutputOpts, cfg: &ExportConfig) -> anyhow::Result<()> {
    let surfaces = render_booklet(pages);
    if let Some(dir) = &opts.svg_dir {
        write_svgs(&surfaces, dir)?;
    }
    if let Some(dir) = &opts.png_dir {
        booklet_studio::export::write_png_previews(&surfaces, cfg, dir)?;
    }
    let path = booklet_studio::export::output_path(cfg, opts.output.as_deref());
    let bytes = booklet_studio::export::export_booklet_async(surfaces, cfg.clone()).await?;
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(not(feature = "export"))]
async fn write_outputs(pages: &[PrintablePage], opts: &OutputOpts, _cfg: &ExportConfig) -> anyhow::Result<()> {
    let surfaces = render_booklet(pages);
    match &opts.svg_dir {
        Some(dir) if opts.output.is_none() && opts.png_dir.is_none() => write_svgs(&surfaces, dir),
        _ => anyhow::bail!("built without the `export` feature; only --svg-dir is available"),
    }
}

async fn interactive(global: &GlobalOpts, opts: &OutputOpts) -> anyhow::Result<()> {
    let client = GeminiClient::new(&global.generator_config())?;
    let cfg = global.export_config();
    let opts = opts.clone();

    let stdin = std::io::stdin().lock();
    let mut form = Form::new(stdin, std::io::stdout());
    let mut controller = Controller::new(UserInputs::default());

    run_session(&mut form, &mut controller, &client, move |pages| {
        let cfg = cfg.clone();
        let opts = opts.clone();
        async move {
            write_outputs(&pages, &opts, &cfg)
                .await
                .map_err(|e| booklet_studio::Error::ExportError(format!("{:#}", e)))?;
            Ok(booklet_studio::export::output_path(&cfg, opts.output.as_deref())
                .display()
                .to_string())
        }
        .boxed()
    })
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        Command::Generate { theme, name, language, age, activity, output, save_json } => {
            let client = GeminiClient::new(&cli.global.generator_config())?;
            let inputs = UserInputs {
                theme: theme.clone(),
                language: language.clone(),
                age_band: age.clone(),
                activity_type: *activity,
                recipient_name: name.clone(),
            };
            let booklet = match generate_booklet(&client, inputs).await {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    return Err(e.into());
                }
            };
            if let Some(path) = save_json {
                booklet.save(path).with_context(|| format!("saving {}", path.display()))?;
                info!("saved booklet to {}", path.display());
            }
            write_outputs(&booklet.pages(), output, &cli.global.export_config()).await
        }
        Command::Render { input, output } => {
            let booklet = Booklet::load(input).with_context(|| format!("loading {}", input.display()))?;
            write_outputs(&booklet.pages(), output, &cli.global.export_config()).await
        }
        Command::Interactive { output } => interactive(&cli.global, output).await,
        Command::Options => {
            println!("Idiomas:");
            LANGUAGES.iter().for_each(|l| println!("  {}", l));
            println!("Faixas etárias:");
            AGE_BANDS.iter().for_each(|a| println!("  {}", a));
            println!("Atividades:");
            for t in ActivityType::ALL {
                println!("  {:<18} {}", t.key(), t.label());
            }
            Ok(())
        }
    }
}
