use anyhow::{bail, Context, Result};
use pcmwrap::{logging::ConversionFormatter, wav, ConfigManager, ConvertError};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: pcmwrap [--config PATH] [--inspect FILE] [INPUT [OUTPUT]]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    inspect: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--config" => {
                    let value = args.next().context("--config requires a path")?;
                    parsed.config = Some(PathBuf::from(value));
                }
                "--inspect" => {
                    let value = args.next().context("--inspect requires a path")?;
                    parsed.inspect = Some(PathBuf::from(value));
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    bail!("unknown option '{flag}'\n{USAGE}")
                }
                _ => positional.push(PathBuf::from(&arg)),
            }
        }

        if positional.len() > 2 {
            bail!("too many arguments\n{USAGE}");
        }
        let mut positional = positional.into_iter();
        parsed.input = positional.next();
        parsed.output = positional.next();

        Ok(parsed)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pcmwrap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().event_format(ConversionFormatter::new()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ConvertError>() {
                Some(convert_err) => error!("{}: {}", convert_err.kind(), convert_err),
                None => error!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1))?;

    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    if let Some(path) = args.inspect {
        let header = wav::inspect(&path)?;
        info!("{:?}", path);
        info!("   Channels: {}", header.channels);
        info!("   Sample rate: {} Hz", header.sample_rate);
        info!("   Bits per sample: {}", header.bits_per_sample);
        info!("   Byte rate: {}", header.byte_rate);
        info!("   Block align: {}", header.block_align);
        info!("   Data: {} bytes", header.data_len);
        return Ok(());
    }

    let config_manager = match &args.config {
        Some(path) => ConfigManager::load_from(path)?,
        None => ConfigManager::load()?,
    };
    let written = wav::convert_with_config(
        &config_manager.get(),
        args.input.as_deref(),
        args.output.as_deref(),
    )?;
    info!("WAV file saved as {}", written.display());

    Ok(())
}
