use std::{fs, path::Path};

use crate::{
    config::Config,
    error::{ConfigError, Result},
    utils,
};

pub fn edit(config_file: &Path) -> Result<()> {
    let status = utils::open_editor(config_file)?;

    if status.success() {
        println!("Config edited successfully.");
    } else {
        eprintln!("Editor exited with non-zero status code.");
    }

    Ok(())
}

pub fn show(config_file: &Path) -> Result<()> {
    let config = Config::load_from(config_file)?;

    println!("{config}");
    if let Some(warning) = utils::check_permissions(config_file, false) {
        eprintln!("{warning}");
    }
    Ok(())
}

pub fn init(config_file: &Path) -> Result<()> {
    if config_file.exists() {
        println!("Config file already exists: {}", config_file.display());
        return Ok(());
    }

    if let Some(config_dir) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteFailed {
            path: config_dir.to_path_buf(),
            source,
        })?;
    }

    let serialized_config = toml::to_string(&Config::template())?;
    let write_failed = |source| ConfigError::WriteFailed {
        path: config_file.to_path_buf(),
        source,
    };
    utils::write_private(config_file, serialized_config.as_bytes()).map_err(write_failed)?;

    println!("Config file created at: {}", config_file.display());
    println!("Please edit the file and fill in your username, email and password.");
    Ok(())
}

pub fn validate(config_file: &Path) -> Result<()> {
    let config = Config::load_from(config_file)?;
    config.validate()?;

    if config == Config::template() {
        eprintln!("Config still holds the template values. Run: twitter-run config --edit");
    }
    if let Some(warning) = utils::check_permissions(config_file, false) {
        eprintln!("{warning}");
    }

    println!("Config is valid.");
    Ok(())
}
