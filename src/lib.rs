//! Vignette loads illustration images from a configured assets directory and
//! represents each as an in-memory drawing surface, optionally with a source
//! citation rendered beneath the image.
//!
//! The public API is renderer-oriented:
//!
//! - Construct an [`Illustrator`] over an assets root
//! - Call [`Illustrator::show`] and match on the returned [`ShowOutcome`]
//! - Optionally [`rasterize`] the [`Surface`] and export it as PNG
//!
//! Every failure mode of `show` is non-fatal: missing files, undecodable
//! images, and unreadable captions degrade to a tagged outcome plus a
//! `tracing` diagnostic instead of an error.
//!
//! ```no_run
//! use vignette::{Illustrator, ShowOpts};
//!
//! let renderer = Illustrator::new("docs/assets");
//! let outcome = renderer.show(
//!     "illustrations/perceptron.ppm",
//!     Some("illustrations/perceptron_source.txt"),
//!     &ShowOpts::default(),
//! );
//! if let Some(surface) = outcome.surface() {
//!     let frame = vignette::rasterize(surface)?;
//!     frame.write_png(std::path::Path::new("perceptron.png"))?;
//! }
//! # Ok::<(), vignette::VignetteError>(())
//! ```
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod illustrate;
mod render;
mod surface;

pub use crate::assets::AssetRoot;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::foundation::core::{DEFAULT_DPI, FigSize};
pub use crate::foundation::error::{VignetteError, VignetteResult};
pub use crate::illustrate::{Illustrator, OutcomeKind, ShowOpts, ShowOutcome};
pub use crate::render::cpu::{FrameRgba, rasterize};
pub use crate::surface::{Axes, Caption, Figure, SOURCE_PREFIX, Surface};
