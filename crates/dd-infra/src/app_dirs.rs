use std::path::PathBuf;

use dd_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "dailydrop";
pub const PROFILE_ENV: &str = "DAILYDROP_PROFILE";

/// Directory name for `profile`; an empty profile means the default one.
fn app_dir_name(profile: Option<&str>) -> String {
    match profile {
        Some(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves application directories from the platform conventions.
///
/// `DAILYDROP_PROFILE` gives each profile its own directories, so several
/// accounts can be used side by side. It is read once, when the adapter is
/// created.
pub struct DirsAppDirsAdapter {
    base_dir_override: Option<PathBuf>,
    profile: Option<String>,
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_dir_override: None,
            profile: std::env::var(PROFILE_ENV).ok(),
        }
    }

    /// Use `base` instead of both system directories.
    #[cfg(test)]
    fn with_base_dir(base: PathBuf, profile: Option<&str>) -> Self {
        Self {
            base_dir_override: Some(base),
            profile: profile.map(str::to_string),
        }
    }

    fn base_dir(&self, system: fn() -> Option<PathBuf>) -> Option<PathBuf> {
        match &self.base_dir_override {
            Some(base) => Some(base.clone()),
            None => system(),
        }
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_dir(dirs::data_local_dir)
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_dir(dirs::config_dir)
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let name = app_dir_name(self.profile.as_deref());

        Ok(AppDirs {
            app_data_root: base_data.join(&name),
            app_config_root: base_config.join(&name),
        })
    }
}
