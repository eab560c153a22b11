//! Where images live on disk and where they end up in the output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use css3image_config::ImagesConfig;

/// Image locations for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEnvironment {
    source_dir: PathBuf,
    image_path: String,
    rewrites: HashMap<String, String>,
}

impl ImageEnvironment {
    /// Environment rooted at `source_dir` with the default `_images` output path.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            image_path: "_images".to_owned(),
            rewrites: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ImagesConfig) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            image_path: config.image_path.clone(),
            rewrites: config.rewrites.clone(),
        }
    }

    #[must_use]
    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    /// Record that `source_uri` is copied to `file` under the image path.
    #[must_use]
    pub fn with_rewrite(mut self, source_uri: impl Into<String>, file: impl Into<String>) -> Self {
        self.rewrites.insert(source_uri.into(), file.into());
        self
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// URI to emit for `uri`: `image_path/<file>` when a rewrite is known.
    ///
    /// ```
    /// use css3image::environment::ImageEnvironment;
    ///
    /// let env = ImageEnvironment::new("docs").with_rewrite("img/a.png", "a1.png");
    /// assert_eq!(env.output_uri("img/a.png"), "_images/a1.png");
    /// assert_eq!(env.output_uri("img/b.png"), "img/b.png");
    /// ```
    #[must_use]
    pub fn output_uri(&self, uri: &str) -> String {
        let Some(file) = self.rewrites.get(uri) else {
            return uri.to_owned();
        };
        let rewritten = posix_join(&self.image_path, file);
        tracing::trace!(from = %uri, to = %rewritten, "Rewrote image URI");
        rewritten
    }

    /// Path of the source file, for dimension lookup.
    #[must_use]
    pub fn source_path(&self, uri: &str) -> PathBuf {
        let decoded = percent_decode_str(uri).decode_utf8_lossy();
        self.source_dir.join(decoded.as_ref())
    }
}

fn posix_join(base: &str, file: &str) -> String {
    if base.is_empty() || file.starts_with('/') {
        file.to_owned()
    } else if base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}
