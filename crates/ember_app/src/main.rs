mod app;
mod logger;
mod settings;

use anyhow::Result;
use logger::create_logger;

fn main() -> Result<()> {
    create_logger()?;
    app::run()?;
    Ok(())
}
