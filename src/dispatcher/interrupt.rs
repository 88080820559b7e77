use crate::executor::shutdown::ShutdownSignal;

use std::future::Future;
use std::io;
use tokio::signal;
use tokio::task::JoinHandle;

/// Exit status used when a second interrupt cuts shutdown short.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Listens for Ctrl-C in the background.
///
/// The first interrupt triggers `shutdown`, so workers finish their current job and the
/// dispatcher drains. A second one exits the process on the spot.
pub fn listen_for_interrupt(shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = relay_interrupt(signal::ctrl_c(), &shutdown).await {
            tracing::error!("Unable to listen for interrupts: {}", e);
            return;
        }

        if signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt received, exiting without draining");
            std::process::exit(FORCED_EXIT_CODE);
        }
    })
}

/// Waits for `interrupt` and converts it into a shutdown.
pub async fn relay_interrupt<I>(interrupt: I, shutdown: &ShutdownSignal) -> io::Result<()>
where
    I: Future<Output = io::Result<()>>,
{
    interrupt.await?;
    tracing::info!("Interrupt received, closing..");
    shutdown.trigger();
    Ok(())
}
