//! Render engine seam and invoker

use std::time::Instant;

use thiserror::Error;

use super::RasterImage;
use crate::scene::SceneDescription;

/// Render failures; all of them abandon the current cycle only
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Frame resolution cannot be rendered
    #[error("Invalid frame resolution {width}x{height}")]
    InvalidFrame {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A scene entity names another entity that does not exist
    #[error("Unresolved reference from {from} to {to}")]
    UnresolvedReference {
        /// Referencing entity
        from: String,
        /// Missing entity
        to: String,
    },

    /// Camera transform cannot be inverted
    #[error("Camera transform is singular")]
    SingularCamera,

    /// Engine finished without producing an image
    #[error("Engine produced no image: {0}")]
    NoImage(String),
}

/// Synchronous, single-shot renderer
pub trait RenderEngine {
    /// Render `scene` to completion
    ///
    /// Called through [`invoke`], which has already rejected zero-sized frames.
    fn render(&mut self, scene: &SceneDescription) -> Result<RasterImage, RenderError>;
}

impl<T: RenderEngine + ?Sized> RenderEngine for Box<T> {
    fn render(&mut self, scene: &SceneDescription) -> Result<RasterImage, RenderError> {
        (**self).render(scene)
    }
}

/// Drive `engine` against `scene` and check what comes back
///
/// An image whose dimensions disagree with the frame is treated as no image.
pub fn invoke<E: RenderEngine + ?Sized>(
    engine: &mut E,
    scene: &SceneDescription,
) -> Result<RasterImage, RenderError> {
    let (width, height) = scene.frame.resolution;
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidFrame { width, height });
    }

    let started = Instant::now();
    let image = engine.render(scene)?;

    if (image.width(), image.height()) != (width, height) {
        return Err(RenderError::NoImage(format!(
            "expected {width}x{height}, engine returned {}x{}",
            image.width(),
            image.height()
        )));
    }

    log::debug!("Rendered {width}x{height} frame in {:?}", started.elapsed());
    Ok(image)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pose::PoseSample;
    use crate::render::mesh::tests::quad;
    use crate::scene::{placement, palette, ObjectInstance};

    struct Fixed(u32, u32);

    impl RenderEngine for Fixed {
        fn render(&mut self, _scene: &SceneDescription) -> Result<RasterImage, RenderError> {
            Ok(RasterImage::filled(self.0, self.1, [0, 0, 0]))
        }
    }

    struct Failing;

    impl RenderEngine for Failing {
        fn render(&mut self, _scene: &SceneDescription) -> Result<RasterImage, RenderError> {
            Err(RenderError::NoImage("engine crashed".to_string()))
        }
    }

    pub(crate) fn scene() -> SceneDescription {
        SceneDescription {
            colors: palette::colors(),
            bsdfs: palette::bsdfs(),
            edfs: palette::edfs(),
            surface_shaders: vec![palette::SURFACE_SHADER.to_string()],
            materials: palette::materials(),
            instances: vec![ObjectInstance {
                name: palette::DYNAMIC_INSTANCE.to_string(),
                mesh: quad(palette::DYNAMIC_OBJECT),
                placement: placement(&PoseSample::identity()),
                material: palette::OBJECT_MATERIAL.to_string(),
            }],
            light: palette::sun_light(),
            environment: palette::environment(),
            camera: palette::camera(),
            frame: palette::frame(),
            quality: palette::quality(),
        }
    }

    #[test]
    fn test_invoke_passes_matching_image() {
        let image = invoke(&mut Fixed(640, 480), &scene()).unwrap();
        assert_eq!((image.width(), image.height()), (640, 480));
    }

    #[test]
    fn test_wrong_dimensions_count_as_no_image() {
        let err = invoke(&mut Fixed(10, 10), &scene()).unwrap_err();
        assert!(matches!(err, RenderError::NoImage(_)));
    }

    #[test]
    fn test_engine_failure_is_surfaced() {
        let mut engine: Box<dyn RenderEngine> = Box::new(Failing);
        assert!(matches!(invoke(&mut engine, &scene()), Err(RenderError::NoImage(_))));
    }

    #[test]
    fn test_zero_resolution_rejected_before_engine_runs() {
        let mut scene = scene();
        scene.frame.resolution = (0, 480);
        assert_eq!(
            invoke(&mut Fixed(0, 480), &scene),
            Err(RenderError::InvalidFrame { width: 0, height: 480 })
        );
    }
}
