use std::sync::mpsc;
use std::thread;

use anyhow::Result;

use divtrader_core::controller::SessionController;
use divtrader_core::platform::stub::StubWorld;
use divtrader_core::settings::Settings;
use divtrader_core::{logger, sleep};

const TICK_MS: u64 = 50;

fn main() -> Result<()> {
    let cwd = std::env::current_dir()?;
    logger::init(&cwd.join("logs"))?;

    // Mirror every log line to stdout
    let (log_tx, log_rx) = mpsc::channel::<String>();
    logger::set_sink(log_tx);
    thread::spawn(move || {
        for line in log_rx {
            println!("{line}");
        }
    });

    let settings_path = cwd.join("settings.json");
    let mut settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        settings.save(&settings_path);
    }
    // The enable toggle is for embedding hosts; the demo always runs.
    settings.enabled = true;

    logger::info("divtrader started (simulated world)");

    let world = StubWorld::demo();
    let mut controller = SessionController::new(world.game(), world.input());

    // Script a single press of the start hotkey, then supervise the run.
    world.press_key(settings.turn_in_key);
    let mut started = false;
    loop {
        controller.tick(&settings);
        world.release_key(settings.turn_in_key);
        if controller.is_active() {
            started = true;
        } else if started {
            break;
        }
        sleep::sleep_ms(TICK_MS);
    }

    logger::info("demo run finished");
    sleep::sleep_ms(100); // let the stdout printer drain
    Ok(())
}
