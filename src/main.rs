use anyhow::Context;
use k40kit::{emulator_server, init_logging, Config, RecordingInterpreter, BUILD_DATE, VERSION};
use std::path::PathBuf;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("k40kit {} (built {})", VERSION, BUILD_DATE);

    // Optional first argument: path to a .toml or .json config
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => Config::default_path()?,
    };
    let config = Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let (width, height) = config.device.bed_size_mils();
    tracing::info!("Bed {:.0} x {:.0} mils", width, height);

    let server = emulator_server(&config, RecordingInterpreter::without_history());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Interrupt received"),
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    server.run(shutdown_rx).await?;
    Ok(())
}
