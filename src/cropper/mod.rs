//! Cover cropper selection seam
//!
//! Cover post-processing lives behind one trait so the engine is swappable
//! from configuration. Selection is a pure function from the configured
//! [`CropEngine`] to a strategy instance: no state, and an engine this build
//! does not carry falls back to the default passthrough rather than erroring.

use crate::config::CropEngine;

/// A cover cropping strategy
pub trait Cropper: Send + Sync {
    /// Engine name, for logs
    fn name(&self) -> &'static str;

    /// Crops raw image bytes toward the given width/height ratio
    fn crop(&self, image: Vec<u8>, aspect_ratio: f32) -> Vec<u8>;
}

/// Passthrough strategy: hands the image back untouched
pub struct DefaultCropper;

impl Cropper for DefaultCropper {
    fn name(&self) -> &'static str {
        "default"
    }

    fn crop(&self, image: Vec<u8>, _aspect_ratio: f32) -> Vec<u8> {
        image
    }
}

/// Selects the cropping strategy for the configured engine
pub fn get_cropper(engine: CropEngine) -> Box<dyn Cropper> {
    match engine {
        CropEngine::Default => Box::new(DefaultCropper),
        CropEngine::Face => {
            // Face detection is not built into this binary
            tracing::warn!("face crop engine unavailable, falling back to default");
            Box::new(DefaultCropper)
        }
    }
}
