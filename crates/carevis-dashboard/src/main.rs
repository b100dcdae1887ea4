//! Main entry point for the carevis dashboard.

use carevis_commands::{Selection, Visualization};
use carevis_common::init_logging;
use carevis_config::{Config, ConfigLoader, ConfigSource, ConfigValidator};
use carevis_dashboard::{menu_entries, Dashboard, DashboardError, DashboardResult, Shown};
use carevis_i18n::{fluent_args, Localizer};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, env = "CAREVIS_CONFIG", default_value = "carevis.yaml")]
    config: PathBuf,

    /// Visit register CSV, overriding the configuration
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output directory, overriding the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the visualizations
    Menu,
    /// List the selectable services, nationalities, and family numbers
    Options,
    /// Render one visualization
    Show(ShowArgs),
    /// Render every visualization that needs no selection
    All,
}

#[derive(clap::Args, Debug)]
struct ShowArgs {
    /// Menu slug or number, e.g. `clinic-map` or `4`
    visualization: Visualization,

    /// Service for the age distribution
    #[arg(long)]
    service: Option<String>,

    /// Nationality for the age distribution
    #[arg(long)]
    nationality: Option<String>,

    /// Family number for the family view
    #[arg(long)]
    family: Option<u32>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data.path.clone_from(data);
        }
        if let Some(output) = &self.output {
            config.output.directory.clone_from(output);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DashboardResult<()> {
    let cli = Cli::parse();

    let (mut config, source) = ConfigLoader::new(&cli.config).load_with_source().await?;
    cli.apply_overrides(&mut config);
    ConfigValidator::validate(&config)?;
    init_logging(&config.logging)?;
    match &source {
        ConfigSource::File(path) => info!(config = %path.display(), "Starting carevis"),
        ConfigSource::Defaults => info!(
            config = %cli.config.display(),
            "No configuration file found, using defaults"
        ),
    }

    let result = run(cli.command, config).await;
    match &result {
        Err(DashboardError::Carevis(e)) if !e.is_fatal() => warn!("Selection rejected: {e}"),
        Err(e) => error!("Dashboard failed: {e}"),
        Ok(()) => {}
    }
    result
}

async fn run(command: Command, config: Config) -> DashboardResult<()> {
    match command {
        Command::Menu => {
            let localizer = Localizer::new(&config.locale)?;
            println!("{}", localizer.text("menu-prompt"));
            for (entry, label) in menu_entries(&localizer, &config) {
                println!("  {label}  [{entry}]");
            }
        }
        Command::Options => {
            let dashboard = Dashboard::start(config).await?;
            let localizer = dashboard.router().localizer();
            let options = dashboard.options();
            println!("{}:", localizer.text("options-services"));
            for service in &options.services {
                println!("  {service}");
            }
            println!("{}:", localizer.text("options-nationalities"));
            for nationality in &options.nationalities {
                println!("  {nationality}");
            }
            let range = fluent_args(&[
                ("min", options.family_min.into()),
                ("max", options.family_max.into()),
            ]);
            println!("{}", localizer.text_with("options-family-range", &range));
        }
        Command::Show(args) => {
            let dashboard = Dashboard::start(config).await?;
            let selection = Selection {
                service: args.service,
                nationality: args.nationality,
                family: args.family,
            };
            let request = dashboard.request(args.visualization, selection)?;
            let shown = dashboard.show(&request).await?;
            report(dashboard.router().localizer(), args.visualization, &shown);
        }
        Command::All => {
            let dashboard = Dashboard::start(config).await?;
            for (entry, shown) in dashboard.show_all().await? {
                report(dashboard.router().localizer(), entry, &shown);
            }
        }
    }
    Ok(())
}

fn report(localizer: &Localizer, entry: Visualization, shown: &Shown) {
    match shown {
        Shown::Written(paths) => {
            for path in paths {
                let args = fluent_args(&[("path", path.display().to_string().into())]);
                println!("{}", localizer.text_with("notice-written", &args));
            }
        }
        Shown::Notice(text) => println!("{entry}: {text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_arguments() {
        let cli = Cli::try_parse_from([
            "carevis",
            "--data",
            "visits.csv",
            "show",
            "age-distribution",
            "--service",
            "Dental",
            "--nationality",
            "Syrian",
        ])
        .unwrap();

        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.visualization, Visualization::AgeDistribution);
        assert_eq!(args.service.as_deref(), Some("Dental"));

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.data.path, PathBuf::from("visits.csv"));
    }

    #[test]
    fn test_menu_number_is_accepted() {
        let cli = Cli::try_parse_from(["carevis", "show", "5", "--family", "3"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.visualization, Visualization::FamilyServices);
        assert_eq!(args.family, Some(3));
    }

    #[test]
    fn test_unknown_visualization_is_rejected() {
        assert!(Cli::try_parse_from(["carevis", "show", "heatmap"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
