use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use silverdict_config::Config;

fn silverdict_root() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir().context("No user config directory on this platform")?;
    Ok(base.join("silverdict"))
}

fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(silverdict_root()?.join("profiles"))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Malformed profile {}", path.display()))?;
    Ok(profile.value)
}

fn write_profile(dir: &Path, name: &str, config: Config) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let file = dir.join(format!("{name}.json"));
    let profile = Profile {
        name: name.into(),
        value: config,
    };
    fs::write(&file, serde_json::to_string_pretty(&profile)?)?;
    Ok(file)
}

/// Profile `name` from `dir`, then `main`, then the environment
pub fn load_profile_from(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = dir.join(format!("{name}.json"));
    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or environment");
    let main_file = dir.join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::new())
    }
}

pub fn load_user_profile(name: &str) -> anyhow::Result<Config> {
    load_profile_from(&profiles_dir()?, name)
}

/// Write the main profile from the environment if there is none yet
pub fn init_user_config() -> anyhow::Result<()> {
    let dir = profiles_dir()?;
    if !dir.join("main.json").exists() {
        write_profile(&dir, "main", Config::new())?;
        tracing::info!("Created main profile in {}", dir.display());
    }
    Ok(())
}

/// Add a new profile cloned from main
pub fn add_profile_from_default(new_name: &str) -> anyhow::Result<PathBuf> {
    let dir = profiles_dir()?;
    let config = load_profile_from(&dir, "main")?;
    let file = write_profile(&dir, new_name, config)?;
    tracing::info!("Created new profile: {new_name}");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("silverdict-profiles-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn named_profile_wins_over_main() {
        let dir = scratch_dir("named");
        let mut main = Config::default();
        main.network.api_prefix = "http://main.local/api".into();
        write_profile(&dir, "main", main).unwrap();
        let mut work = Config::default();
        work.network.api_prefix = "http://work.local/api".into();
        write_profile(&dir, "work", work).unwrap();

        let config = load_profile_from(&dir, "work").unwrap();
        assert_eq!(config.network.api_prefix, "http://work.local/api");

        let config = load_profile_from(&dir, "missing").unwrap();
        assert_eq!(config.network.api_prefix, "http://main.local/api");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_profile_is_an_error() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.json"), "{ not json").unwrap();

        let error = load_profile_from(&dir, "main").unwrap_err();
        assert!(error.to_string().contains("Malformed profile"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
