//! Visual asset resolution.
//!
//! Each element asks the loader for a visual once, at setup. A failed load is
//! logged and replaced by a tinted placeholder; the scene always starts.

use std::path::PathBuf;

use arbora_choreography::VisualRef;
use arbora_formation::ElementClass;

use crate::error::{InstallationError, InstallationResult};

/// Placeholder tints per class.
const PLACEHOLDER_TINTS: u32 = 8;

/// Loads the visual for one element.
pub trait VisualAssetLoader {
    /// Returns a renderer handle for element `index` of `class`.
    ///
    /// # Errors
    ///
    /// [`InstallationError::AssetLoad`] or [`InstallationError::Io`] when the
    /// asset is missing or unreadable.
    fn load(&mut self, class: ElementClass, index: usize) -> InstallationResult<u32>;
}

/// Running tally of resolved visuals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetReport {
    /// Real assets.
    pub loaded: usize,
    /// Placeholders substituted after a failure.
    pub placeholders: usize,
}

/// Placeholder for element `index` of `class`.
#[must_use]
pub fn placeholder_for(class: ElementClass, index: usize) -> VisualRef {
    let tint = (class.tag() as u32) * PLACEHOLDER_TINTS + (index as u32 % PLACEHOLDER_TINTS);
    VisualRef::Placeholder(tint)
}

/// Loads one visual, substituting a placeholder on failure.
pub fn resolve_visual(
    loader: &mut dyn VisualAssetLoader,
    class: ElementClass,
    index: usize,
    report: &mut AssetReport,
) -> VisualRef {
    match loader.load(class, index) {
        Ok(handle) => {
            report.loaded += 1;
            VisualRef::Asset(handle)
        }
        Err(err) => {
            report.placeholders += 1;
            tracing::warn!("Using placeholder for {} #{}: {}", class.name(), index, err);
            placeholder_for(class, index)
        }
    }
}

/// Built-in meshes for decorations, photo files from a directory.
///
/// Photo card `i` is `photo_{i:02}.jpg` under the root. Handles are the
/// class tag in the high byte and the index below it.
#[derive(Clone, Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Loader reading photos from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn handle(class: ElementClass, index: usize) -> u32 {
        ((class.tag() as u32) << 24) | (index as u32 & 0x00FF_FFFF)
    }
}

impl VisualAssetLoader for DirectoryAssets {
    fn load(&mut self, class: ElementClass, index: usize) -> InstallationResult<u32> {
        if class != ElementClass::PhotoCard {
            return Ok(Self::handle(class, index));
        }
        let path = self.root.join(format!("photo_{index:02}.jpg"));
        let meta = std::fs::metadata(&path).map_err(|source| InstallationError::Io {
            path: path.clone(),
            source,
        })?;
        if meta.len() == 0 {
            return Err(InstallationError::AssetLoad {
                name: path.display().to_string(),
                reason: "empty file".to_owned(),
            });
        }
        Ok(Self::handle(class, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingPhotos;

    impl VisualAssetLoader for FailingPhotos {
        fn load(&mut self, class: ElementClass, index: usize) -> InstallationResult<u32> {
            match class {
                ElementClass::PhotoCard if index % 2 == 1 => Err(InstallationError::AssetLoad {
                    name: format!("photo {index}"),
                    reason: "decode failed".to_owned(),
                }),
                _ => Ok(index as u32),
            }
        }
    }

    #[test]
    fn test_failures_become_placeholders() {
        let mut loader = FailingPhotos;
        let mut report = AssetReport::default();
        let visuals: Vec<_> = (0..4)
            .map(|i| resolve_visual(&mut loader, ElementClass::PhotoCard, i, &mut report))
            .collect();
        assert_eq!(visuals[0], VisualRef::Asset(0));
        assert!(visuals[1].is_placeholder());
        assert_eq!(report, AssetReport { loaded: 2, placeholders: 2 });
    }

    #[test]
    fn test_missing_photo_directory() {
        let mut loader = DirectoryAssets::new("/nonexistent/photos");
        assert!(loader.load(ElementClass::Gem, 3).is_ok());
        assert!(matches!(
            loader.load(ElementClass::PhotoCard, 0),
            Err(InstallationError::Io { .. })
        ));
    }

    #[test]
    fn test_placeholder_tint_per_class() {
        assert_ne!(
            placeholder_for(ElementClass::Gem, 0),
            placeholder_for(ElementClass::Box, 0)
        );
    }
}
