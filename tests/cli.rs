use clap::Parser;
use epwatch::presentation::{Cli, Commands};

#[test]
fn parse_without_subcommand_watches() {
    let cli = Cli::parse_from(["epwatch"]);
    assert!(cli.command.is_none());
    assert!(cli.output.is_none());
    assert!(cli.season.is_none());
}

#[test]
fn parse_check_with_episode() {
    let cli = Cli::parse_from(["epwatch", "check", "12"]);
    match cli.command {
        Some(Commands::Check { episode }) => assert_eq!(episode, Some(12)),
        _ => panic!("Se esperaba subcomando check"),
    }
}

#[test]
fn parse_check_without_episode() {
    let cli = Cli::parse_from(["epwatch", "check"]);
    match cli.command {
        Some(Commands::Check { episode }) => assert!(episode.is_none()),
        _ => panic!("Se esperaba subcomando check"),
    }
}

#[test]
fn parse_fetch() {
    let cli = Cli::parse_from([
        "epwatch",
        "fetch",
        "https://cdn.example.com/master.m3u8",
        "~/Videos/S01E1.mp4",
    ]);
    match cli.command {
        Some(Commands::Fetch { url, output_path }) => {
            assert_eq!(url, "https://cdn.example.com/master.m3u8");
            assert_eq!(output_path, "~/Videos/S01E1.mp4");
        }
        _ => panic!("Se esperaba subcomando fetch"),
    }
}

#[test]
fn parse_global_options_after_subcommand() {
    let cli = Cli::parse_from([
        "epwatch", "watch", "-o", "/tmp/show", "--season", "02", "--downloader", "/usr/bin/ffmpeg",
    ]);
    assert!(matches!(cli.command, Some(Commands::Watch)));
    assert_eq!(cli.output.as_deref(), Some("/tmp/show"));
    assert_eq!(cli.season.as_deref(), Some("02"));
    assert_eq!(cli.downloader.as_deref(), Some("/usr/bin/ffmpeg"));
}

#[test]
fn parse_config_and_catalog_url() {
    let cli = Cli::parse_from([
        "epwatch",
        "--config",
        "mi.toml",
        "--catalog-url",
        "https://server/my-show-season-2",
        "next",
    ]);
    assert!(matches!(cli.command, Some(Commands::Next)));
    assert_eq!(cli.config.as_deref(), Some("mi.toml"));
    assert_eq!(
        cli.catalog_url.as_deref(),
        Some("https://server/my-show-season-2")
    );
}

#[test]
fn rejects_non_numeric_episode() {
    assert!(Cli::try_parse_from(["epwatch", "check", "doce"]).is_err());
}
