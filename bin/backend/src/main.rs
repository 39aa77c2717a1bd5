//! Durachok Backend Binary
//!
//! Auth handshake, matchmaking, and live room hosting in a single server.
//! Runs on BIND_ADDR (e.g. 0.0.0.0:8888).

use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::ConfigBuilder;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

#[tokio::main]
async fn main() {
    logging();
    interrupts();
    drk_server::run().await.unwrap();
}

/// INFO to the terminal, DEBUG to a timestamped file under `logs/`.
fn logging() {
    let config = ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    std::fs::create_dir_all("logs").expect("create logs directory");
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_secs();
    let file =
        std::fs::File::create(format!("logs/backend-{}.log", stamp)).expect("create log file");
    CombinedLogger::init(vec![
        TermLogger::new(
            log::LevelFilter::Info,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(log::LevelFilter::Debug, config, file),
    ])
    .expect("initialize logger");
}

/// Ctrl+C exits immediately; room snapshots are durable, so nothing needs a
/// graceful drain.
fn interrupts() {
    tokio::spawn(async {
        tokio::signal::ctrl_c().await.expect("ctrl-c handler");
        log::warn!("interrupt received, shutting down");
        std::process::exit(0);
    });
}
