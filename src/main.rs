use clap::Parser;

mod catalog;
mod cli;
mod commands;
mod docx;
mod domain;
mod services;

pub use catalog::*;
pub use cli::*;
pub use domain::constants::*;
pub use domain::models::*;
pub use services::amount::*;
pub use services::canonical::*;
pub use services::output::*;
pub use services::progress::*;
pub use services::render::*;
pub use services::router::*;
pub use services::semantics::*;
pub use services::storage::*;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::load()?;

    if commands::handle_setup_commands(&cli, &catalog)? {
        return Ok(());
    }
    commands::handle_runtime_commands(&cli, &catalog)
}
