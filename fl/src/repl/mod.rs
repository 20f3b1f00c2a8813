//! Interactive shell for FashionLabs
//!
//! A line-editing front end over [`App`]: pick preferences, generate an
//! outfit, swap slots for alternatives and manage the closet.

pub mod render;
mod shell;

pub use shell::{Shell, ShellCommand};

use eyre::Result;

use crate::app::App;
use crate::config::Config;

/// Run the interactive shell
///
/// This is the entry point for `fl` and `fl shell`.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let app = App::from_config(config)?;
    let mut shell = Shell::new(app);
    shell.run().await
}
