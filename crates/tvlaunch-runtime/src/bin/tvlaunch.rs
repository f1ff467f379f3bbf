use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tvlaunch_core::config::AppConfig;
use tvlaunch_core::host::RecordingHost;
use tvlaunch_core::models::Extras;
use tvlaunch_runtime::{logging, PlayArgs, PlayListArgs, PlaybackResultDto, Runtime};

/// Dry-run inspector: shows what would be sent to an external player
/// and how a player's reply would be interpreted. Nothing is launched.
#[derive(Debug, Parser)]
#[command(name = "tvlaunch", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the launch descriptor for a single video.
    DescribePlay {
        url: String,
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Resume position in seconds.
        #[arg(long)]
        position: Option<i64>,
    },
    /// Print the launch descriptor for a playlist.
    DescribePlaylist {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Entry name; repeat once per URL.
        #[arg(long = "name")]
        names: Vec<String>,
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start_index: Option<i64>,
        #[arg(long)]
        position: Option<i64>,
    },
    /// Read player result extras as JSON from stdin and print the normalized result.
    Normalize,
    /// List the enabled player profiles.
    Players,
    /// Write the built-in defaults to the user config file.
    InitConfig {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
}

const DRY_RUN_PACKAGE: &str = "dev.tvlaunch.dryrun";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = match cli.command {
        Command::InitConfig { force } => return init_config(force),
        other => other,
    };

    let config = AppConfig::load()?;
    logging::init(&config.general);

    let host = Arc::new(RecordingHost::new(DRY_RUN_PACKAGE));
    let runtime = Runtime::with_config(host.clone(), config)?;

    match command {
        Command::DescribePlay {
            url,
            package,
            title,
            position,
        } => {
            runtime.play(PlayArgs {
                url,
                package,
                title,
                position,
            })?;
            print_last_launch(&host)?;
        }
        Command::DescribePlaylist {
            urls,
            names,
            package,
            title,
            start_index,
            position,
        } => {
            runtime.play_list(PlayListArgs {
                urls,
                names: (!names.is_empty()).then_some(names),
                package,
                title,
                start_index,
                position,
            })?;
            print_last_launch(&host)?;
        }
        Command::Normalize => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let value: serde_json::Value = if input.trim().is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&input)?
            };
            let extras = Extras::from_json(&value);
            let result = runtime
                .config()
                .playback
                .normalizer()
                .normalize(extras.as_ref());
            println!(
                "{}",
                serde_json::to_string_pretty(&PlaybackResultDto::from(result))?
            );
        }
        Command::Players => {
            for player in runtime.registry().enabled_players() {
                println!("{:<12} {}", player.name, player.fragments.join(", "));
            }
        }
        Command::InitConfig { .. } => {}
    }
    Ok(())
}

fn init_config(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        let message = format!("{} already exists, pass --force to overwrite", path.display());
        return Err(message.into());
    }
    AppConfig::defaults()?.save()?;
    println!("{}", path.display());
    Ok(())
}

fn print_last_launch(host: &RecordingHost) -> Result<(), Box<dyn std::error::Error>> {
    let launch = host
        .launches()
        .pop()
        .ok_or("no launch was recorded")?;
    println!("{}", serde_json::to_string_pretty(&launch.descriptor)?);
    Ok(())
}
