//! Forget the stored session.

use anyhow::Result;
use colored::Colorize;

use crate::config::{Config, Credentials};

pub fn run(config: &Config) -> Result<()> {
    Credentials::clear(config)?;
    println!("{} signed out", "✓".green());
    Ok(())
}
