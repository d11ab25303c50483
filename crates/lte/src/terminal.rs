//! Host terminal plumbing: raw mode, the alternate screen, and a byte
//! source over stdin whose reads time out.

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Read, Stdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use lte_core::ByteSource;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen.
pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("failed to enter the alternate screen");
    }
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    // Attempt to show cursor, but don't fail if it errors
    let _ = execute!(stdout, cursor::Show);
    Ok(())
}

/// Bytes delivered over a channel, read with a per-byte timeout.
pub struct ChannelBytes {
    rx: Receiver<io::Result<u8>>,
    timeout: Duration,
}

impl ChannelBytes {
    pub fn new(rx: Receiver<io::Result<u8>>, timeout: Duration) -> Self {
        Self { rx, timeout }
    }

    /// Starts a reader thread that forwards stdin one byte at a time.
    pub fn stdin(timeout: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut buf = [0u8; 1];
                loop {
                    match stdin.read(&mut buf) {
                        Ok(0) => {
                            log::info!("stdin closed");
                            break;
                        }
                        Ok(_) => {
                            if tx.send(Ok(buf[0])).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
            })
            .context("failed to start the input thread")?;
        Ok(Self::new(rx, timeout))
    }
}

impl ByteSource for ChannelBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.rx.recv_timeout(self.timeout) {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            )),
        }
    }
}
