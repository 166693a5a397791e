use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use procsentry::config::{self, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "procsentry",
    about = "Statistical anomaly detection for host /proc metrics",
    version,
    long_about = None
)]
struct Cli {
    /// Sampling interval in seconds
    #[arg(short = 'i', long = "interval", default_value_t = config::DEFAULT_SAMPLING_INTERVAL_SECS)]
    interval: u64,

    /// Rolling window size in data points
    #[arg(short = 'w', long = "window", default_value_t = config::DEFAULT_WINDOW_SIZE)]
    window: usize,

    /// N-sigma factor
    #[arg(short = 's', long = "sigma", default_value_t = config::DEFAULT_SIGMA_FACTOR)]
    sigma: f64,

    /// Anomaly log file path
    #[arg(short = 'l', long = "log-file", default_value = config::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Disk device name (e.g. sda)
    #[arg(short = 'd', long = "device", default_value = config::DEFAULT_DISK_DEVICE)]
    device: String,

    /// Network interface name (e.g. eth0)
    #[arg(short = 'n', long = "interface", default_value = config::DEFAULT_NET_INTERFACE)]
    interface: String,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            sampling_interval: self.interval,
            window_size: self.window,
            sigma_factor: self.sigma,
            log_file: self.log_file,
            disk_device: self.device,
            net_interface: self.interface,
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Help and version exit 0; every other parse failure exits 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let config = cli.into_config();
    config.validate()?;

    tracing::info!(
        interval_secs = config.sampling_interval,
        window = config.window_size,
        sigma_factor = config.sigma_factor,
        log_file = %config.log_file.display(),
        disk_device = %config.disk_device,
        net_interface = %config.net_interface,
        "starting procsentry"
    );

    procsentry::run(config).await
}
