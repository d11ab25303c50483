use anyhow::{Context, Result};
use std::{env, path::PathBuf};

use lte::app::{App, HELP_MESSAGE};
use lte::config::Config;
use lte::logging;
use lte::terminal::{restore_terminal, setup_terminal, ChannelBytes, Tui};
use lte::ui;
use lte_core::KeyDecoder;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init()?;

    let config = Config::from_env();
    let input_timeout = config.input_timeout;
    let mut app = App::new(config);

    // A file that cannot be opened is fatal, reported before raw mode.
    if let Some(arg) = env::args_os().nth(1) {
        let path = PathBuf::from(arg);
        app.open(path.clone())
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        log::info!("Loaded {}", path.display());
    } else {
        log::info!("No file specified, starting with empty buffer");
    }
    app.status.set_info(HELP_MESSAGE.to_string());

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, app, input_timeout).await;
    restore_terminal()?;

    if let Err(err) = &res {
        log::error!("Application error: {:#}", err);
    }
    res
}

async fn run_app(
    terminal: &mut Tui,
    mut app: App,
    input_timeout: std::time::Duration,
) -> Result<()> {
    let mut keys = KeyDecoder::new(ChannelBytes::stdin(input_timeout)?);

    loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            log::error!("Terminal draw error: {}", e);
        }

        app.update_status();

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        // A timeout yields no key; the loop redraws and reads again.
        let Some(key) = keys.read_key()? else {
            continue;
        };
        if let Err(e) = app.handle_key(key).await {
            log::error!("Key handling error: {:#}", e);
            app.status.set_error(format!("{:#}", e));
        }
    }

    terminal.clear()?;
    log::info!("Application loop ended successfully");
    Ok(())
}
