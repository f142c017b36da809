use std::{
    fs::create_dir_all,
    io::{self, ErrorKind},
    path::PathBuf,
};

use xdg::BaseDirectories;

/// Returns the path to the devlinks configuration directory. If it doesn't exist when this
/// function is called, it will be created.
pub fn config_dir() -> io::Result<PathBuf> {
    ensure(xdg_prefix().get_config_home())
}

/// Returns the path to the devlinks data directory. If it doesn't exist when this function is
/// called, it will be created.
pub fn data_dir() -> io::Result<PathBuf> {
    ensure(xdg_prefix().get_data_home())
}

/// Returns the path to the devlinks state directory. If it doesn't exist when this function is
/// called, it will be created.
pub fn state_dir() -> io::Result<PathBuf> {
    ensure(xdg_prefix().get_state_home())
}

fn ensure(path: Option<PathBuf>) -> io::Result<PathBuf> {
    let path = path.ok_or_else(|| io::Error::new(ErrorKind::NotFound, "$HOME must exist"))?;

    create_dir_all(&path)?;

    Ok(path)
}

fn xdg_prefix() -> BaseDirectories {
    BaseDirectories::with_prefix("devlinks")
}
