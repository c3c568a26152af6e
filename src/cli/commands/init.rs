use std::path::{Path, PathBuf};

use crate::config::Config;

pub fn cmd_init(path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.map_or_else(Config::default_config_path, PathBuf::from);

    if Config::create_default_if_missing(&path)? {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists, leaving it untouched.", path.display());
    }

    Ok(())
}
