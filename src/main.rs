use anyhow::Context;
use mdsync::{logging, SyncOptions, TuiApplication};

fn main() -> anyhow::Result<()> {
    let options = SyncOptions::from_env().context("invalid environment configuration")?;

    // 全画面描画と競合するため stderr には出さない
    if let Err(err) = logging::init(&options, false) {
        eprintln!("logger already initialized: {err}");
    }

    log::info!("mdsync {} starting", env!("CARGO_PKG_VERSION"));

    let mut app = TuiApplication::new(&options).context("failed to initialize")?;
    app.run().context("terminal session failed")?;

    log::info!("mdsync exiting");
    Ok(())
}
