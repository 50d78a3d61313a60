use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

/// Small per-user file so the email field comes prefilled on the next
/// launch.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default)]
pub struct LocalData {
    pub email: String,
}

pub fn get_localdata() -> LocalData {
    data_path()
        .ok()
        .and_then(|path| load_from_disk(&path))
        .unwrap_or_default()
}

pub fn remember(data: &LocalData) {
    if let Err(err) = write_to_disk(data) {
        println!("Failed to store local data: {err}");
    }
}

fn data_path() -> Result<PathBuf> {
    let mut path = dirs::home_dir().context("unsupported os")?;
    path.push(".activity_board");
    Ok(path)
}

fn load_from_disk(path: &PathBuf) -> Option<LocalData> {
    let raw_data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw_data).ok()
}

fn write_to_disk(data: &LocalData) -> Result<()> {
    fs::write(data_path()?, serde_json::to_string(data)?)?;
    Ok(())
}
