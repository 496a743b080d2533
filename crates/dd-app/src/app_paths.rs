use std::path::PathBuf;

use dd_core::app_dirs::AppDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub session_file: PathBuf,
    pub config_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            session_file: dirs.app_data_root.join("session.json"),
            config_file: dirs.app_config_root.join("config.toml"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_paths_derives_concrete_locations_from_app_dirs() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/dailydrop"),
            app_config_root: PathBuf::from("/tmp/config/dailydrop"),
        };

        let paths = AppPaths::from_app_dirs(&dirs);

        assert_eq!(paths.session_file, PathBuf::from("/tmp/dailydrop/session.json"));
        assert_eq!(paths.config_file, PathBuf::from("/tmp/config/dailydrop/config.toml"));
        assert_eq!(paths.logs_dir, PathBuf::from("/tmp/dailydrop/logs"));
    }
}
