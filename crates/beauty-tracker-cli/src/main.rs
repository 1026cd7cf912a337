use beauty_tracker_core::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "beauty-tracker", version, about = "Beauty Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrollment: start, inspect or cancel a program
    Program {
        #[command(subcommand)]
        action: commands::program::ProgramAction,
    },
    /// Day sequencing within the active program
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Mark habits of the open day
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Progress and streak of the active program
    Progress {
        /// User id
        #[arg(long)]
        user: i64,
    },
    /// Catalog seeding and public views
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Program template administration
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Habit administration
    HabitAdmin {
        #[command(subcommand)]
        action: commands::habit_admin::HabitAdminAction,
    },
    /// Template day administration
    TemplateDay {
        #[command(subcommand)]
        action: commands::template_day::TemplateDayAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays machine-readable. RUST_LOG wins over the
/// configured filter.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&Config::load_or_default());

    let result = match cli.command {
        Commands::Program { action } => commands::program::run(action),
        Commands::Day { action } => commands::day::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Progress { user } => commands::progress::run(user),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Template { action } => commands::template::run(action),
        Commands::HabitAdmin { action } => commands::habit_admin::run(action),
        Commands::TemplateDay { action } => commands::template_day::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
