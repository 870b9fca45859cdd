mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "posebridge", version, about = "Headset pose bridge CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "POSEBRIDGE_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "POSEBRIDGE_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "posebridge",
            "listen",
            "--endpoint",
            "/tmp/test.sock",
            "--planes",
            "cockpit",
            "--convention",
            "vulkan",
            "--recentre-first",
        ])
        .expect("listen args should parse");

        match cli.command {
            Command::Listen(args) => {
                assert!(args.recentre_first);
                assert_eq!(args.server_startup, "None");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_server_startup_flag_yields_empty_value() {
        let cli = Cli::try_parse_from(["posebridge", "listen", "--server-startup"])
            .expect("flag without value should parse");
        match cli.command {
            Command::Listen(args) => assert_eq!(args.server_startup, ""),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn project_accepts_negative_angles() {
        let cli = Cli::try_parse_from([
            "posebridge",
            "project",
            "--fov",
            "-0.1,0.5,0.6,0.7",
        ])
        .expect("project args should parse");
        match cli.command {
            Command::Project(args) => assert_eq!(args.fov.up, -0.1),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_plane_args() {
        let err = Cli::try_parse_from([
            "posebridge",
            "project",
            "--fov",
            "0.5,0.5,0.5,0.5",
            "--near",
            "0.1",
            "--far",
            "10",
            "--planes",
            "cockpit",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn near_requires_far() {
        let err = Cli::try_parse_from([
            "posebridge",
            "project",
            "--fov",
            "0.5,0.5,0.5,0.5",
            "--near",
            "0.1",
        ])
        .expect_err("near alone should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
