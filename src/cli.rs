use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "jar-license-inspector",
    about = "Resolve the licenses of a directory of JAR files via Maven Central",
    version
)]
pub struct Cli {
    /// Directory containing the JAR files to inspect
    pub directory: PathBuf,

    /// Config file [default: ./.jar-license-inspector/config.toml, fallback ~/.config/jar-license-inspector/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Folder for downloaded license texts (overrides config)
    #[arg(long, value_name = "DIR")]
    pub licenses_dir: Option<PathBuf>,

    /// HTML report path (overrides config)
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Format of the report printed on stdout
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// More diagnostics (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the report and errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positional_directory() {
        let cli = Cli::try_parse_from(["jar-license-inspector", "libs"]).unwrap();
        assert_eq!(cli.directory, PathBuf::from("libs"));
        assert_eq!(cli.report, ReportFormat::Terminal);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        assert!(Cli::try_parse_from(["jar-license-inspector"]).is_err());
        assert!(Cli::try_parse_from(["jar-license-inspector", "a", "b"]).is_err());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "jar-license-inspector",
            "libs",
            "--report",
            "json",
            "--html",
            "out/report.html",
            "--licenses-dir",
            "out/licenses",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.report, ReportFormat::Json);
        assert_eq!(cli.html, Some(PathBuf::from("out/report.html")));
        assert_eq!(cli.licenses_dir, Some(PathBuf::from("out/licenses")));
        assert_eq!(cli.verbose, 2);
    }
}
