use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::assets::AssetRoot;
use crate::assets::decode::decode_image;
use crate::foundation::core::FigSize;
use crate::foundation::error::{VignetteError, VignetteResult};
use crate::surface::{Caption, Surface};

/// Recognized display options for [`Illustrator::show`].
///
/// `size` is the only recognized option. [`ShowOpts::from_json`] ignores
/// unrecognized fields rather than erroring.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShowOpts {
    /// Figure size in figure units; defaults to `(7.0, 4.0)`.
    pub size: FigSize,
}

impl ShowOpts {
    /// Parse options from JSON, ignoring unknown fields.
    pub fn from_json(json: &str) -> VignetteResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| VignetteError::serde(format!("invalid show options: {e}")))
    }
}

/// Tag identifying how a [`ShowOutcome`] degraded, if at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Rendered,
    ImageNotFound,
    ImageDecodeFailed,
    CaptionNotFound,
    CaptionUnreadable,
}

/// Result of [`Illustrator::show`].
///
/// Every failure is non-fatal and carries the best partial result. A
/// missing image file yields no surface at all, while a present but
/// undecodable image still yields the already-created surface without image
/// content; check the variant before using the handles.
#[derive(Clone, Debug, PartialEq)]
pub enum ShowOutcome {
    /// Image decoded and displayed; caption attached when one was requested
    /// and readable.
    Rendered(Surface),
    /// The resolved image path does not exist; no surface was created.
    ImageNotFound {
        attempted: PathBuf,
        assets_root: PathBuf,
    },
    /// Image present but unreadable or undecodable; the surface exists
    /// without image content.
    ImageDecodeFailed { surface: Surface, detail: String },
    /// Caption path missing; captioning skipped, surface intact.
    CaptionNotFound { surface: Surface, attempted: PathBuf },
    /// Caption present but unreadable (I/O or UTF-8); captioning skipped,
    /// surface intact.
    CaptionUnreadable { surface: Surface, detail: String },
}

impl ShowOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Rendered(_) => OutcomeKind::Rendered,
            Self::ImageNotFound { .. } => OutcomeKind::ImageNotFound,
            Self::ImageDecodeFailed { .. } => OutcomeKind::ImageDecodeFailed,
            Self::CaptionNotFound { .. } => OutcomeKind::CaptionNotFound,
            Self::CaptionUnreadable { .. } => OutcomeKind::CaptionUnreadable,
        }
    }

    /// The surface pair, when one was created.
    pub fn surface(&self) -> Option<&Surface> {
        match self {
            Self::Rendered(surface)
            | Self::ImageDecodeFailed { surface, .. }
            | Self::CaptionNotFound { surface, .. }
            | Self::CaptionUnreadable { surface, .. } => Some(surface),
            Self::ImageNotFound { .. } => None,
        }
    }

    pub fn into_surface(self) -> Option<Surface> {
        match self {
            Self::Rendered(surface)
            | Self::ImageDecodeFailed { surface, .. }
            | Self::CaptionNotFound { surface, .. }
            | Self::CaptionUnreadable { surface, .. } => Some(surface),
            Self::ImageNotFound { .. } => None,
        }
    }
}

/// Loads illustration images from an asset root and builds display
/// surfaces.
#[derive(Clone, Debug)]
pub struct Illustrator {
    assets: AssetRoot,
}

impl Illustrator {
    /// Renderer over an explicit assets root.
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        Self {
            assets: AssetRoot::new(assets_root),
        }
    }

    /// Renderer over the environment-configured assets root
    /// (`VIGNETTE_ASSETS_DIR`, default `docs/assets`).
    pub fn from_env() -> Self {
        Self {
            assets: AssetRoot::from_env(),
        }
    }

    pub fn assets_root(&self) -> &Path {
        self.assets.path()
    }

    /// Display the image at `image_rel`, optionally captioned from
    /// `caption_rel`, both resolved against the assets root.
    ///
    /// Never returns an error; see [`ShowOutcome`] for the degradation
    /// rules. The surface has its axes hidden and the image content set on
    /// success, and a caption attached when requested and readable.
    pub fn show(
        &self,
        image_rel: &str,
        caption_rel: Option<&str>,
        opts: &ShowOpts,
    ) -> ShowOutcome {
        let assets_root = self.assets.path().to_path_buf();

        let attempted = match self.assets.resolve(image_rel) {
            Ok(path) => path,
            Err(err) => {
                error!(
                    path = image_rel,
                    assets_root = %assets_root.display(),
                    %err,
                    "image path rejected"
                );
                return ShowOutcome::ImageNotFound {
                    attempted: assets_root.join(image_rel),
                    assets_root,
                };
            }
        };
        if !attempted.exists() {
            error!(
                attempted = %attempted.display(),
                assets_root = %assets_root.display(),
                "image file not found"
            );
            return ShowOutcome::ImageNotFound {
                attempted,
                assets_root,
            };
        }

        let mut surface = Surface::new(opts.size);
        surface.axes.set_axis_visible(false);

        let decoded = std::fs::read(&attempted)
            .map_err(|e| format!("failed to read '{}': {e}", attempted.display()))
            .and_then(|bytes| decode_image(&bytes).map_err(|e| e.to_string()));
        match decoded {
            Ok(image) => surface.axes.set_image(image),
            Err(detail) => {
                error!(
                    attempted = %attempted.display(),
                    detail = %detail,
                    "failed to load image"
                );
                return ShowOutcome::ImageDecodeFailed { surface, detail };
            }
        }

        if let Some(rel) = caption_rel {
            let attempted = match self.assets.resolve(rel) {
                Ok(path) => path,
                Err(err) => {
                    warn!(path = rel, %err, "caption path rejected");
                    return ShowOutcome::CaptionNotFound {
                        surface,
                        attempted: self.assets.path().join(rel),
                    };
                }
            };
            if !attempted.exists() {
                warn!(
                    attempted = %attempted.display(),
                    assets_root = %self.assets.path().display(),
                    "caption text file not found"
                );
                return ShowOutcome::CaptionNotFound { surface, attempted };
            }
            match std::fs::read_to_string(&attempted) {
                Ok(text) => surface.figure.set_caption(Caption::source(&text)),
                Err(e) => {
                    let detail =
                        format!("failed to read caption '{}': {e}", attempted.display());
                    warn!(detail = %detail, "caption skipped");
                    return ShowOutcome::CaptionUnreadable { surface, detail };
                }
            }
        }

        ShowOutcome::Rendered(surface)
    }
}
