//! Entry point for the `i18n` command line tool.

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use i18n_sync::config::{
    self,
    CONFIG_FILE_NAME,
};
use i18n_sync::pipeline::{
    self,
    LocaleOutcome,
};
use i18n_sync::provider::OpenAiProvider;
use i18n_sync::{
    Project,
    SyncError,
    db,
    sheet,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{
    EnvFilter,
    Layer,
    fmt,
};

/// Directory holding the log file and the default sheet.
const WORK_DIR: &str = ".i18n";

#[derive(Parser, Debug)]
#[command(name = "i18n", version, about = "Incremental machine translation of JSON i18n bundles")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Translate, update the cache and write every target bundle, then check
    Run,

    /// Compare target bundles with the source bundle
    Check,

    /// Export the cache to CSV for proofreading
    Export {
        #[arg(long, default_value = "i18n.db.json")]
        db: PathBuf,
        #[arg(short, long, default_value = ".i18n/i18n.csv")]
        output: PathBuf,
    },

    /// Apply a proofread CSV to the cache
    Import {
        #[arg(short, long)]
        sheet: PathBuf,
        #[arg(long, default_value = "i18n.db.json")]
        db: PathBuf,
        /// Where to write the updated cache (default: overwrite --db)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Console layer filtered by `RUST_LOG` plus a plain file layer under [`WORK_DIR`].
fn init_tracing() -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (file, guard) = match std::fs::create_dir_all(WORK_DIR) {
        Ok(()) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(WORK_DIR, "log"));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

fn project_root(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn load_project(config_path: &Path) -> Result<Project, SyncError> {
    let config = config::load_config(config_path)?;
    tracing::info!("Loaded config from {:?}", config_path);
    Ok(Project::new(project_root(config_path), config))
}

async fn execute(cli: Cli) -> Result<ExitCode, SyncError> {
    match cli.command {
        Command::Init { force } => {
            config::write_default_config(&cli.config, force)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Run => {
            let project = load_project(&cli.config)?;
            let provider = OpenAiProvider::new(&project.config.service);
            let summary = pipeline::run(&project, &provider).await?;

            for outcome in &summary.locales {
                if let LocaleOutcome::Failed { locale, error } = outcome {
                    tracing::error!(locale = %locale, %error, "Locale was not updated");
                }
            }

            Ok(if summary.is_clean() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }

        Command::Check => {
            let project = load_project(&cli.config)?;
            let issues = pipeline::check(&project)?;
            Ok(if issues.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }

        Command::Export { db: db_path, output } => {
            let database = db::load(&db_path)?;
            sheet::export_sheet(&database, &output)?;
            tracing::info!("Export completed: {:?}", output);
            Ok(ExitCode::SUCCESS)
        }

        Command::Import { sheet: sheet_path, db: db_path, output } => {
            let database = db::load(&db_path)?;
            let updated = sheet::import_sheet(&sheet_path, &database)?;
            let output = output.unwrap_or(db_path);
            db::save(&output, &updated)?;
            tracing::info!("Import completed, updated db written to {:?}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_tracing();

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
