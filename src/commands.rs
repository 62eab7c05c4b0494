//! Async command pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Screens return commands, and the App spawns them and notifies the screen
//! when they complete.

use async_trait::async_trait;
use color_eyre::Result;

/// Async command that performs side effects.
///
/// Commands are spawned by the App. They send their results back to the
/// screen via the screen's own message channel.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logging.
    /// Include context like provider ids or dates.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>) -> Result<()>;
}
