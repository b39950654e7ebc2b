use std::env;

/// Configuration for file ownership and mode changes
#[derive(Debug, Clone)]
pub struct Config {
    /// User (and its primary group) that converted files are handed to
    pub owner: String,
    /// Mode applied to converted files, as an octal permission set
    pub file_mode: u32,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let file_mode = match env::var("PLEXMV_FILE_MODE") {
            Ok(mode) => match u32::from_str_radix(&mode, 8) {
                Ok(mode) => mode,
                Err(_) => {
                    tracing::warn!("PLEXMV_FILE_MODE {:?} is not an octal mode, using 660", mode);
                    0o660
                }
            },
            Err(_) => 0o660,
        };

        Self {
            owner: env::var("PLEXMV_OWNER").unwrap_or_else(|_| "plex".to_string()),
            file_mode,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "plex".to_string(),
            file_mode: 0o660,
        }
    }
}
