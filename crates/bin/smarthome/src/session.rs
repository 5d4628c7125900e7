//! Session loop: feeds input lines to the console and, in realtime mode,
//! wakes up on a fixed tick to announce timers as they fire.

use std::time::Duration;

use smarthome_app::ports::Clock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;

use crate::config::SimulationConfig;
use crate::console::Console;

/// How the loop paces timer announcements.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Announce timers between commands instead of only when a line arrives.
    pub realtime: bool,
    pub tick: Duration,
}

impl From<&SimulationConfig> for SessionOptions {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            realtime: config.realtime,
            tick: Duration::from_secs(config.tick_seconds),
        }
    }
}

/// Drive `console` until the operator quits or `input` ends.
///
/// # Errors
///
/// Returns an error if reading a line or writing output fails.
pub async fn run<C, R, W>(
    console: &mut Console<C>,
    input: R,
    mut output: W,
    options: SessionOptions,
) -> std::io::Result<()>
where
    C: Clock,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!(realtime = options.realtime, "session started");
    emit(&mut output, &console.banner()).await?;
    output.write_all(console.prompt().as_bytes()).await?;
    output.flush().await?;

    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(options.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("input closed");
                    break;
                };
                let response = console.handle_line(&line);
                emit(&mut output, &response.text).await?;
                if response.quit {
                    break;
                }
                output.write_all(console.prompt().as_bytes()).await?;
                output.flush().await?;
            }
            _ = ticker.tick(), if options.realtime => {
                let response = console.tick();
                if !response.text.is_empty() {
                    output.write_all(b"\n").await?;
                    emit(&mut output, &response.text).await?;
                    output.write_all(console.prompt().as_bytes()).await?;
                    output.flush().await?;
                }
            }
        }
    }

    tracing::info!("session ended");
    output.flush().await
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}
