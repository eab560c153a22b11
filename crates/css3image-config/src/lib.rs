//! Configuration management for the css3image directive.
//!
//! Parses `css3image.toml` with serde and provides auto-discovery of the
//! config file in parent directories.
//!
//! ```toml
//! [directive]
//! name = "css3image"
//! profile = "extended"
//!
//! [images]
//! source_dir = "docs"
//! image_path = "_images"
//! dimension_lookup = true
//!
//! [images.rewrites]
//! "figures/photo.jpg" = "photo-3f2a.jpg"
//!
//! [style]
//! vendor_prefixes = ["", "-ms-", "-moz-", "-webkit-"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `images.source_dir` and `images.image_path` support `${VAR}` and
//! `${VAR:-default}` expansion before path resolution.

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "css3image.toml";

/// Option table selected for the directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Base option set: size, scale, align, rotate, translation, per-side margins.
    Minimal,
    /// Base set plus margin shorthand, border-radius, transform-origin and 3D transforms.
    #[default]
    Extended,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directive registration settings.
    pub directive: DirectiveConfig,
    /// Image lookup settings (paths are relative strings from TOML).
    images: ImagesConfigRaw,
    /// Style emission settings.
    pub style: StyleConfig,

    /// Resolved image settings (set after loading).
    #[serde(skip)]
    pub images_resolved: ImagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Directive registration settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DirectiveConfig {
    /// Name the directive is registered under.
    pub name: String,
    /// Recognized option table.
    pub profile: Profile,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            name: "css3image".to_owned(),
            profile: Profile::default(),
        }
    }
}

/// Raw image settings as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ImagesConfigRaw {
    source_dir: Option<String>,
    image_path: Option<String>,
    dimension_lookup: Option<bool>,
    rewrites: HashMap<String, String>,
}

/// Resolved image settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagesConfig {
    /// Directory source image URIs are relative to (used for dimension lookup).
    pub source_dir: PathBuf,
    /// URL prefix for images copied to the output tree.
    pub image_path: String,
    /// Whether intrinsic image dimensions may be read from disk.
    pub dimension_lookup: bool,
    /// Source URI to output file name.
    pub rewrites: HashMap<String, String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            image_path: "_images".to_owned(),
            dimension_lookup: true,
            rewrites: HashMap::new(),
        }
    }
}

/// Style emission settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Prefixes applied to `transform` and `transform-origin`, in emission order.
    pub vendor_prefixes: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            vendor_prefixes: ["", "-ms-", "-moz-", "-webkit-"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`images.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `css3image.toml` in the current directory and its parents, falling
    /// back to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            directive: DirectiveConfig::default(),
            images: ImagesConfigRaw::default(),
            style: StyleConfig::default(),
            images_resolved: ImagesConfig {
                source_dir: base.to_path_buf(),
                ..ImagesConfig::default()
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_directive()?;
        self.validate_images()?;
        self.validate_style()
    }

    fn validate_directive(&self) -> Result<(), ConfigError> {
        let name = &self.directive.name;
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "directive.name cannot be empty".to_owned(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "directive.name \"{name}\" may only contain ASCII letters, digits, '-' and '_'"
            )));
        }
        Ok(())
    }

    fn validate_images(&self) -> Result<(), ConfigError> {
        if self.images_resolved.image_path.is_empty() {
            return Err(ConfigError::Validation(
                "images.image_path cannot be empty".to_owned(),
            ));
        }
        if let Some((uri, _)) = self
            .images_resolved
            .rewrites
            .iter()
            .find(|(_, file)| file.is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "images.rewrites entry for \"{uri}\" has an empty file name"
            )));
        }
        Ok(())
    }

    fn validate_style(&self) -> Result<(), ConfigError> {
        if self.style.vendor_prefixes.is_empty() {
            return Err(ConfigError::Validation(
                "style.vendor_prefixes needs at least one entry (use \"\" for unprefixed)"
                    .to_owned(),
            ));
        }
        for prefix in &self.style.vendor_prefixes {
            let well_formed = prefix.is_empty()
                || (prefix.len() > 2
                    && prefix.starts_with('-')
                    && prefix.ends_with('-')
                    && prefix[1..prefix.len() - 1]
                        .chars()
                        .all(|c| c.is_ascii_lowercase()));
            if !well_formed {
                return Err(ConfigError::Validation(format!(
                    "style.vendor_prefixes entry \"{prefix}\" must look like \"-webkit-\" or be empty"
                )));
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.images.source_dir {
            self.images.source_dir = Some(expand::expand_env(dir, "images.source_dir")?);
        }
        if let Some(ref path) = self.images.image_path {
            self.images.image_path = Some(expand::expand_env(path, "images.image_path")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = ImagesConfig::default();
        self.images_resolved = ImagesConfig {
            source_dir: config_dir.join(self.images.source_dir.as_deref().unwrap_or(".")),
            image_path: self
                .images
                .image_path
                .clone()
                .unwrap_or(defaults.image_path),
            dimension_lookup: self
                .images
                .dimension_lookup
                .unwrap_or(defaults.dimension_lookup),
            rewrites: std::mem::take(&mut self.images.rewrites),
        };
    }
}
