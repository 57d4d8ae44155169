//! CPU software renderer
//!
//! Z-buffered, flat-shaded triangle rasteriser with ordered-grid
//! supersampling. Radiometric multipliers on colors and lights are carried in
//! the scene for engines that understand them; this one renders a normalised
//! preview: emitters at their normalised color, diffuse surfaces at
//! `albedo * cos(theta)` under a unit-intensity sun, plus the environment
//! radiance as ambient term.

use crate::foundation::math::{Point3, Vec3};
use crate::scene::{ObjectInstance, SceneDescription};

use super::material::linear_to_srgb;
use super::{Bsdf, RasterImage, RenderEngine, RenderError};

/// Largest supersampling grid side used by default (4x4 samples per pixel)
pub const DEFAULT_MAX_GRID: u32 = 4;

/// Deterministic CPU implementation of [`RenderEngine`]
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    max_grid: u32,
}

impl SoftwareRenderer {
    /// Create a renderer with the default supersampling cap
    pub const fn new() -> Self {
        Self { max_grid: DEFAULT_MAX_GRID }
    }

    /// Grid side used for a given sample count
    pub fn grid_for(&self, samples: u32) -> u32 {
        let mut grid = 1;
        while (grid + 1) * (grid + 1) <= samples && grid < self.max_grid {
            grid += 1;
        }
        grid
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Shading {
    Emissive([f32; 3]),
    Diffuse([f32; 3]),
}

struct Target {
    width: usize,
    height: usize,
    color: Vec<[f32; 3]>,
    inv_depth: Vec<f64>,
}

impl Target {
    fn new(width: u32, height: u32, background: [f32; 3]) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            color: vec![background; width * height],
            inv_depth: vec![0.0; width * height],
        }
    }

    /// Rasterise one triangle given in target pixel coordinates and depths
    fn fill(&mut self, screen: [(f64, f64); 3], depth: [f64; 3], color: [f32; 3]) {
        let [(x0, y0), (x1, y1), (x2, y2)] = screen;
        let area = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
        if area.abs() < f64::EPSILON {
            return;
        }

        let min_x = x0.min(x1).min(x2).floor().max(0.0);
        let max_x = x0.max(x1).max(x2).ceil().min(self.width as f64);
        let min_y = y0.min(y1).min(y2).floor().max(0.0);
        let max_y = y0.max(y1).max(y2).ceil().min(self.height as f64);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        for py in (min_y as usize)..(max_y as usize) {
            let sy = py as f64 + 0.5;
            for px in (min_x as usize)..(max_x as usize) {
                let sx = px as f64 + 0.5;

                let w0 = ((x1 - sx) * (y2 - sy) - (x2 - sx) * (y1 - sy)) / area;
                let w1 = ((x2 - sx) * (y0 - sy) - (x0 - sx) * (y2 - sy)) / area;
                let w2 = 1.0 - w0 - w1;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let inv = w0 / depth[0] + w1 / depth[1] + w2 / depth[2];
                let idx = py * self.width + px;
                if inv > self.inv_depth[idx] {
                    self.inv_depth[idx] = inv;
                    self.color[idx] = color;
                }
            }
        }
    }

    /// Box-filter down by `grid` and encode to sRGB bytes
    fn resolve(&self, grid: usize, width: u32, height: u32) -> Option<RasterImage> {
        let samples = (grid * grid) as f32;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);

        for y in 0..height as usize {
            for x in 0..width as usize {
                let mut sum = [0.0f32; 3];
                for sy in 0..grid {
                    let row = (y * grid + sy) * self.width;
                    for sx in 0..grid {
                        let c = self.color[row + x * grid + sx];
                        for (acc, v) in sum.iter_mut().zip(c) {
                            *acc += v;
                        }
                    }
                }
                for acc in sum {
                    data.push(encode_channel(acc / samples));
                }
            }
        }

        RasterImage::from_raw(width, height, data)
    }
}

fn encode_channel(linear: f32) -> u8 {
    let v = linear_to_srgb(linear.clamp(0.0, 1.0));
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn normalised(rgb: [f32; 3]) -> [f32; 3] {
    let peak = rgb.iter().copied().fold(0.0f32, f32::max);
    if peak > 0.0 {
        rgb.map(|c| c / peak)
    } else {
        [0.0; 3]
    }
}

fn unresolved(from: &str, to: &str) -> RenderError {
    RenderError::UnresolvedReference {
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn shading_for(scene: &SceneDescription, instance: &ObjectInstance) -> Result<Shading, RenderError> {
    let material = scene
        .material(&instance.material)
        .ok_or_else(|| unresolved(&instance.name, &instance.material))?;

    if let Some(edf_name) = &material.edf {
        let edf = scene.edf(edf_name).ok_or_else(|| unresolved(&material.name, edf_name))?;
        let color = scene
            .color(&edf.radiance)
            .ok_or_else(|| unresolved(&edf.name, &edf.radiance))?;
        return Ok(Shading::Emissive(normalised(color.linear_rgb())));
    }

    let bsdf = scene
        .bsdf(&material.bsdf)
        .ok_or_else(|| unresolved(&material.name, &material.bsdf))?;
    let albedo = match bsdf {
        Bsdf::Lambertian { name, reflectance } => {
            let color = scene.color(reflectance).ok_or_else(|| unresolved(name, reflectance))?;
            color.linear_rgb().map(|c| c.clamp(0.0, 1.0))
        }
        Bsdf::Glossy { reflectance, .. } => [reflectance.clamp(0.0, 1.0); 3],
    };
    Ok(Shading::Diffuse(albedo))
}

impl RenderEngine for SoftwareRenderer {
    fn render(&mut self, scene: &SceneDescription) -> Result<RasterImage, RenderError> {
        let (width, height) = scene.frame.resolution;
        if scene.frame.camera != scene.camera.name {
            return Err(unresolved(&scene.frame.name, &scene.frame.camera));
        }

        let grid = self.grid_for(scene.quality.samples);
        let (sw, sh) = (width * grid, height * grid);

        let view = scene.camera.view_matrix().ok_or(RenderError::SingularCamera)?;
        let eye = scene.camera.transform.transform_point(&Point3::origin());

        let ambient = {
            let env = &scene.environment;
            let color = scene
                .color(&env.radiance)
                .ok_or_else(|| unresolved(&env.name, &env.radiance))?;
            color.linear_rgb().map(|c| c * color.multiplier as f32)
        };
        let to_light: Vec3 = -scene.light.direction;

        let mut target = Target::new(sw, sh, ambient);

        for instance in &scene.instances {
            let shading = shading_for(scene, instance)?;
            let mut drawn = 0usize;

            for tri in instance.mesh.triangles() {
                let world = tri.map(|v| {
                    let [x, y, z] = v.position.map(f64::from);
                    instance.placement.apply(&Point3::new(x, y, z))
                });

                let Some(mut normal) = (world[1] - world[0])
                    .cross(&(world[2] - world[0]))
                    .try_normalize(f64::EPSILON)
                else {
                    continue;
                };
                let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
                if normal.dot(&(eye - centroid)) < 0.0 {
                    normal = -normal;
                }

                let color = match shading {
                    Shading::Emissive(rgb) => rgb,
                    Shading::Diffuse(albedo) => {
                        let lambert = normal.dot(&to_light).max(0.0) as f32;
                        [0, 1, 2].map(|i| albedo[i] * (lambert + ambient[i]))
                    }
                };

                let mut screen = [(0.0, 0.0); 3];
                let mut depth = [0.0; 3];
                let mut visible = true;
                for (i, p) in world.iter().enumerate() {
                    let cam = view.transform_point(p);
                    match scene.camera.project(&cam) {
                        Some((nx, ny)) => {
                            screen[i] = ((nx + 1.0) * 0.5 * f64::from(sw), (1.0 - ny) * 0.5 * f64::from(sh));
                            depth[i] = -cam.z;
                        }
                        None => {
                            visible = false;
                            break;
                        }
                    }
                }
                if !visible {
                    continue;
                }

                target.fill(screen, depth, color);
                drawn += 1;
            }

            log::trace!("{}: rasterised {drawn} triangles", instance.name);
        }

        target
            .resolve(grid as usize, width, height)
            .ok_or_else(|| RenderError::NoImage("framebuffer size mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseSample;
    use crate::render::engine::tests::scene;
    use crate::scene::{palette, placement};

    fn small_scene(position: [f64; 3]) -> SceneDescription {
        let mut scene = scene();
        scene.frame.resolution = (64, 48);
        scene.quality.samples = 4;
        // Light the front faces head-on
        scene.light.direction = Vec3::new(0.0, 0.0, -1.0);
        scene.instances[0].placement = placement(&PoseSample::from_wire([0.0, 0.0, 0.0, 1.0], position));
        scene
    }

    #[test]
    fn test_grid_from_samples() {
        let renderer = SoftwareRenderer::new();
        assert_eq!(renderer.grid_for(0), 1);
        assert_eq!(renderer.grid_for(1), 1);
        assert_eq!(renderer.grid_for(4), 2);
        assert_eq!(renderer.grid_for(32), 4);
        assert_eq!(renderer.grid_for(1000), DEFAULT_MAX_GRID);
    }

    #[test]
    fn test_object_in_front_of_camera_is_visible() {
        let image = SoftwareRenderer::new().render(&small_scene([0.0, 0.0, -3000.0])).unwrap();

        assert_eq!((image.width(), image.height()), (64, 48));
        let centre = image.pixel(32, 24).unwrap();
        assert!(centre.iter().all(|&c| c > 0), "centre pixel {centre:?}");
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn test_object_behind_camera_is_culled() {
        let image = SoftwareRenderer::new().render(&small_scene([0.0, 0.0, 3000.0])).unwrap();
        assert!(image.as_raw().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = small_scene([1.0, -0.5, -2500.0]);
        let mut renderer = SoftwareRenderer::new();
        assert_eq!(renderer.render(&scene).unwrap(), renderer.render(&scene).unwrap());
    }

    #[test]
    fn test_emissive_material_renders_white() {
        let mut scene = small_scene([0.0, 0.0, -3000.0]);
        scene.instances[0].material = palette::SUN_MATERIAL.to_string();
        let image = SoftwareRenderer::new().render(&scene).unwrap();
        assert_eq!(image.pixel(32, 24), Some([255, 255, 255]));
    }

    #[test]
    fn test_unknown_material_is_error() {
        let mut scene = small_scene([0.0, 0.0, -3000.0]);
        scene.instances[0].material = "chrome".to_string();
        let err = SoftwareRenderer::new().render(&scene).unwrap_err();
        assert!(matches!(err, RenderError::UnresolvedReference { .. }));
    }
}
