use std::path::Path;

use figa::Figa;
use gpick::{
    vulkan::Validation, DeviceFeatures, Extent2, PresentMode, Requirements, SurfaceFormat,
    SwapchainPreferences,
};
use miette::{Context, IntoDiagnostic};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

#[derive(Default, serde::Serialize, serde::Deserialize, figa::Figa)]
pub struct Config {
    // Device extensions required in addition to the swapchain extension.
    #[figa(append)]
    pub extensions: Vec<String>,

    // Device features required from a suitable device.
    #[figa(append)]
    pub features: Option<DeviceFeatures>,

    // Score added for discrete devices.
    #[figa(append)]
    pub discrete_bonus: Option<i64>,

    #[figa(append)]
    pub surface_format: Option<SurfaceFormat>,

    #[figa(append)]
    pub present_mode: Option<PresentMode>,

    // Initial window size in logical pixels.
    #[figa(append)]
    pub width: Option<u32>,

    #[figa(append)]
    pub height: Option<u32>,

    // Set explicitly, validation is required or off.
    // Unset, it is enabled in debug builds when installed.
    #[figa(append)]
    pub validation: Option<bool>,
}

/// Resolved configuration.
pub struct Settings {
    pub requirements: Requirements,
    pub preferences: SwapchainPreferences,
    pub window_size: Extent2,
    pub validation: Validation,
}

fn read_config(path: &Path) -> std::io::Result<String> {
    let r = std::fs::read_to_string(path);

    match r {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && path.extension().is_none() => {
            std::fs::read_to_string(path.with_extension("toml"))
        }
        r => r,
    }
}

fn update_config_from_str(config: &mut Config, s: &str, path: &Path) -> miette::Result<()> {
    config
        .update(toml::Deserializer::new(s))
        .into_diagnostic()
        .with_context(|| format!("Failed to update config from {}", path.display()))
}

fn update_config_from_path(config: &mut Config, path: &Path) -> miette::Result<()> {
    let r = read_config(path);

    if let Err(err) = &r {
        if err.kind() == std::io::ErrorKind::NotFound {
            tracing::debug!("No config found at {}", path.display());
            return Ok(());
        }
    }

    let s = r
        .into_diagnostic()
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    update_config_from_str(config, &s, path)
}

fn update_config_from_env(config: &mut Config) -> miette::Result<()> {
    config
        .update(
            denvars::Deserializer::from_prefixed_env_vars("GPICK_")
                .with_options(denvars::Options::toml()),
        )
        .into_diagnostic()
        .context("Failed to update config from environment variables")
}

impl Config {
    /// Loads the user config, then environment variables,
    /// then the explicitly given file. Later sources win.
    pub fn load(explicit: Option<&Path>) -> miette::Result<Self> {
        let mut config = Config::default();
        if let Some(dir) = dirs::config_local_dir() {
            update_config_from_path(&mut config, &dir.join("gpick/config"))?;
        }
        update_config_from_env(&mut config)?;

        if let Some(path) = explicit {
            // Explicit file must exist.
            let s = read_config(path)
                .into_diagnostic()
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            update_config_from_str(&mut config, &s, path)?;
        }

        Ok(config)
    }

    pub fn settings(&self) -> Settings {
        let mut requirements = Requirements::default();
        for extension in &self.extensions {
            if !requirements.extensions.contains(extension) {
                requirements.extensions.push(extension.clone());
            }
        }
        if let Some(features) = self.features {
            requirements.features = features;
        }
        if let Some(bonus) = self.discrete_bonus {
            requirements.discrete_bonus = bonus;
        }

        let mut preferences = SwapchainPreferences::default();
        if let Some(format) = self.surface_format {
            preferences.surface_format = format;
        }
        if let Some(mode) = self.present_mode {
            preferences.present_mode = mode;
        }

        Settings {
            requirements,
            preferences,
            window_size: Extent2::new(
                self.width.unwrap_or(DEFAULT_WIDTH),
                self.height.unwrap_or(DEFAULT_HEIGHT),
            ),
            validation: match self.validation {
                Some(true) => Validation::Required,
                Some(false) => Validation::Disabled,
                None if cfg!(debug_assertions) => Validation::IfAvailable,
                None => Validation::Disabled,
            },
        }
    }
}
