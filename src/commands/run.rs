//! Command dispatch logic for packagist-survey

use super::{InitArgs, SurveyArgs, init_config, process_survey};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "packagist-survey", version, author, long_about = None)]
#[command(about = "Harvest code-quality metrics across Packagist packages")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: SurveySubcommand,
}

#[derive(Subcommand, Debug)]
enum SurveySubcommand {
    /// Survey packages and write the metrics report
    Run(Box<SurveyArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);

    match &cli.command {
        SurveySubcommand::Run(survey_args) => process_survey(host, survey_args).await,
        SurveySubcommand::Init(init_args) => init_config(host, init_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_with_flags() {
        let cli = Cli::parse_from(["packagist-survey", "run", "--limit", "5", "--workers", "2", "--keep-repos"]);
        match cli.command {
            SurveySubcommand::Run(args) => {
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.workers, Some(2));
                assert!(args.keep_repos);
            }
            SurveySubcommand::Init(_) => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_init() {
        let cli = Cli::parse_from(["packagist-survey", "init", "custom.toml"]);
        match cli.command {
            SurveySubcommand::Init(args) => assert_eq!(args.output.as_deref().map(camino::Utf8Path::as_str), Some("custom.toml")),
            SurveySubcommand::Run(_) => panic!("expected init subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["packagist-survey", "bogus"]).is_err());
    }
}
