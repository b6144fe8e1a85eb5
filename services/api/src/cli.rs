use crate::report::{run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use digital_diagnostic::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Digital Maturity Diagnostic",
    about = "Serve the digital maturity questionnaire or render a report from saved answers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the diagnostic report for a saved answer set and optionally write the PDF
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["digital-diagnostic-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_requires_company_details() {
        let missing = Cli::try_parse_from(["digital-diagnostic-api", "report", "--answers", "a.json"]);
        assert!(missing.is_err());

        let cli = Cli::try_parse_from([
            "digital-diagnostic-api",
            "report",
            "--answers",
            "a.json",
            "--company-name",
            "Hexacube",
            "--email",
            "contact@hexacube.fr",
            "--output",
            "rapport.pdf",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.company_name, "Hexacube");
                assert_eq!(args.output.as_deref(), Some(std::path::Path::new("rapport.pdf")));
                assert!(args.size.is_none());
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }
}
