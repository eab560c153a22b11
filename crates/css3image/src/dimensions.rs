//! Intrinsic image size lookup used when `scale` needs a missing dimension.

use std::path::Path;

/// Source of intrinsic pixel dimensions.
///
/// Lookups never fail loudly: an unreadable or unknown file yields `None` and
/// the resolver scales only the dimensions it already has.
pub trait DimensionLookup {
    /// `(width, height)` in pixels, or `None` if unknown.
    fn lookup(&self, path: &Path) -> Option<(u32, u32)>;
}

impl<F> DimensionLookup for F
where
    F: Fn(&Path) -> Option<(u32, u32)>,
{
    fn lookup(&self, path: &Path) -> Option<(u32, u32)> {
        self(path)
    }
}

/// Reads dimensions from the image file header.
#[cfg(feature = "dimensions")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileDimensions;

#[cfg(feature = "dimensions")]
impl DimensionLookup for ImageFileDimensions {
    fn lookup(&self, path: &Path) -> Option<(u32, u32)> {
        match image::image_dimensions(path) {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Image dimensions unavailable");
                None
            }
        }
    }
}
