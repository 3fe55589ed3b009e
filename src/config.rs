use crate::image_store::ImageStore;
use crate::services::GeneratorSettings;
use crate::state::{ControllerSettings, IdleMonitor};
use crate::styles::ThemeType;
use crate::utils::{expand_path, get_home_dir};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File holding the picture on display (`~` is expanded)
    pub image_path: PathBuf,
    /// External generator invocation
    pub generator: GeneratorConfig,
    /// Screensaver timing
    pub idle: IdleConfig,
    /// Presentation tweaks
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generator executable
    pub program: PathBuf,
    /// Model weights directory
    pub models_path: PathBuf,
    /// Inference steps
    pub steps: u32,
    /// Flags passed ahead of the standard arguments
    pub extra_args: Vec<String>,
    /// Wall-clock limit for one generation
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Inactivity before the screensaver starts
    pub threshold_secs: u64,
    /// How often inactivity is checked
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long transient status messages stay up
    pub status_timeout_secs: u64,
    /// Pause on the success message before showing the new picture
    pub success_delay_ms: u64,
    /// Turn off the X11 screensaver and DPMS on start
    pub disable_host_screensaver: bool,
    /// "dark", "light" or "nocolor"
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: get_home_dir().join("ai-pictures").join("current_image.png"),
            generator: GeneratorConfig::default(),
            idle: IdleConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let base = get_home_dir().join("ai-image-gen");
        Self {
            program: base.join("OnnxStream").join("src").join("build").join("sd"),
            models_path: base.join("stable-diffusion-xl-turbo-1.0-onnxstream"),
            steps: 1,
            extra_args: vec![
                "--turbo".to_string(),
                "--rpi".to_string(),
                "--not-tiled".to_string(),
            ],
            timeout_secs: 300,
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            threshold_secs: 300,
            poll_interval_secs: IdleMonitor::DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            status_timeout_secs: 3,
            success_delay_ms: 1000,
            disable_host_screensaver: true,
            theme: "dark".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or create and save the default one
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from an existing file
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file with owner-only permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }

    /// Reject values that would make the frame unusable
    pub fn validate(&self) -> Result<()> {
        if self.generator.timeout_secs == 0 {
            bail!("generator.timeout_secs must be greater than zero");
        }
        if self.generator.steps == 0 {
            bail!("generator.steps must be greater than zero");
        }
        if self.idle.poll_interval_secs == 0 {
            bail!("idle.poll_interval_secs must be greater than zero");
        }
        if self.image_path.file_name().is_none() {
            bail!("image_path must name a file: {:?}", self.image_path);
        }
        Ok(())
    }

    /// The current-image store
    pub fn image_store(&self) -> ImageStore {
        ImageStore::new(expand_path(&self.image_path))
    }

    /// Generator invocation settings
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            program: expand_path(&self.generator.program),
            models_path: expand_path(&self.generator.models_path),
            steps: self.generator.steps,
            extra_args: self.generator.extra_args.clone(),
            timeout: Duration::from_secs(self.generator.timeout_secs),
        }
    }

    /// Mode controller timing
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            idle_threshold: Duration::from_secs(self.idle.threshold_secs),
            status_timeout: Duration::from_secs(self.display.status_timeout_secs),
            success_delay: Duration::from_millis(self.display.success_delay_ms),
        }
    }

    /// Interval between idle checks
    pub fn idle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.idle.poll_interval_secs)
    }

    /// Theme selected in the config (unknown names fall back to dark)
    pub fn theme_type(&self) -> ThemeType {
        self.display.theme.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.generator.timeout_secs, 300);
        assert_eq!(config.idle.threshold_secs, 300);
        assert_eq!(config.idle.poll_interval_secs, 30);
        assert!(config.image_path.ends_with("ai-pictures/current_image.png"));
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.generator.steps = 4;
        config.save(&config_path).unwrap();

        let loaded = Config::load_or_create(&config_path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "image_path = \"/srv/frame/now.png\"\n\n[idle]\nthreshold_secs = 60\n",
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.image_path, PathBuf::from("/srv/frame/now.png"));
        assert_eq!(config.idle.threshold_secs, 60);
        assert_eq!(config.idle.poll_interval_secs, 30);
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.generator.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_conversion() {
        let mut config = Config::default();
        config.display.success_delay_ms = 250;
        let settings = config.controller_settings();
        assert_eq!(settings.success_delay, Duration::from_millis(250));
        assert_eq!(settings.idle_threshold, Duration::from_secs(300));
        assert_eq!(
            config.generator_settings().timeout,
            Duration::from_secs(300)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Config::default().save(&config_path).unwrap();
        let mode = std::fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
