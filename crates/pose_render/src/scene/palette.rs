//! Fixed scene content
//!
//! Everything here is constant across cycles; only the dynamic object's
//! placement depends on the incoming pose.

use crate::render::{
    Bsdf, ColorEntity, ColorSpace, Edf, Environment, FrameSettings, Material, Mdf,
    PinholeCamera, QualitySettings, SunLight,
};

use super::placement::sun_placement;

/// Name of the diffuse material bound to the dynamic object
pub const OBJECT_MATERIAL: &str = "gray_material";
/// Name of the emissive material bound to the sun object
pub const SUN_MATERIAL: &str = "light_material";
/// Object name of the sun mesh
pub const SUN_OBJECT: &str = "sun";
/// Object name of the dynamic mesh
pub const DYNAMIC_OBJECT: &str = "satellite";
/// Instance name of the dynamic object
pub const DYNAMIC_INSTANCE: &str = "satellite_inst";
/// Instance name of the sun object
pub const SUN_INSTANCE: &str = "sun_inst";
/// Surface shader shared by all materials
pub const SURFACE_SHADER: &str = "physical_surface_shader";

/// Output resolution
pub const RESOLUTION: (u32, u32) = (640, 480);
/// Samples per pixel of the final quality configuration
pub const SAMPLES: u32 = 32;
/// Camera film `(width, height)`
pub const FILM_DIMENSIONS: (f64, f64) = (0.024_892, 0.018_669);
/// Camera focal length
pub const FOCAL_LENGTH: f64 = 3.5;

/// Sun spectral radiance samples
pub const SUN_RADIANCE: [f32; 31] = [
    21127.5, 25888.2, 25829.1, 24232.3,
    26760.5, 29658.3, 30545.4, 30057.5,
    30663.7, 28830.4, 28712.1, 27825.0,
    27100.6, 27233.6, 26361.3, 25503.8,
    25060.2, 25311.6, 25355.9, 25134.2,
    24631.5, 24173.2, 23685.3, 23212.1,
    22827.7, 22339.8, 21970.2, 21526.7,
    21097.9, 20728.3, 20240.4,
];

/// Named colors
pub fn colors() -> Vec<ColorEntity> {
    vec![
        ColorEntity::srgb("red", [1.0, 0.0, 0.0]),
        ColorEntity::srgb("gray", [0.5, 0.5, 0.5]),
        ColorEntity::srgb("white", [1.0, 1.0, 1.0]).with_multiplier(110_000.0),
        ColorEntity::spectral("light_intensity", &SUN_RADIANCE).with_multiplier(1e21),
        ColorEntity::srgb("sky_radiance", [0.0, 0.0, 0.0]).with_multiplier(0.0),
    ]
}

/// Reflectance models
pub fn bsdfs() -> Vec<Bsdf> {
    vec![
        Bsdf::Glossy {
            name: "diffuse_gray_brdf".to_string(),
            reflectance: 0.25,
            ior: 0.9034,
            roughness: 0.43,
            fresnel_weight: 0.9,
            mdf: Mdf::Ggx,
        },
        Bsdf::Lambertian {
            name: "diffuse_white_brdf".to_string(),
            reflectance: "white".to_string(),
        },
    ]
}

/// Emission models
pub fn edfs() -> Vec<Edf> {
    vec![
        Edf {
            name: "diffuse_white_edf".to_string(),
            radiance: "white".to_string(),
        },
        Edf {
            name: "diffuse_red_edf".to_string(),
            radiance: "red".to_string(),
        },
    ]
}

/// Materials: one diffuse, one emissive
pub fn materials() -> Vec<Material> {
    vec![
        Material::new(OBJECT_MATERIAL, SURFACE_SHADER, "diffuse_gray_brdf"),
        Material::new(SUN_MATERIAL, SURFACE_SHADER, "diffuse_white_brdf")
            .with_edf("diffuse_white_edf"),
    ]
}

/// Sun light, travelling from the sun object towards the origin
pub fn sun_light() -> SunLight {
    SunLight::new("light", -sun_placement().translation())
        .with_turbidity(0.0)
        .with_radiance_multiplier(1.516_516_516_51e26)
}

/// Black constant environment
pub fn environment() -> Environment {
    Environment {
        name: "sky".to_string(),
        edf: "sky_edf".to_string(),
        shader: "sky_shader".to_string(),
        radiance: "sky_radiance".to_string(),
    }
}

/// Pinhole camera at the origin looking down −Z
pub fn camera() -> PinholeCamera {
    PinholeCamera::new("camera", FILM_DIMENSIONS, FOCAL_LENGTH)
}

/// Output frame
pub fn frame() -> FrameSettings {
    FrameSettings {
        name: "beauty".to_string(),
        camera: "camera".to_string(),
        resolution: RESOLUTION,
        color_space: ColorSpace::Srgb,
    }
}

/// Final quality configuration
pub fn quality() -> QualitySettings {
    QualitySettings {
        name: "final".to_string(),
        samples: SAMPLES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sun_light_points_away_from_sun() {
        let light = sun_light();
        assert!(light.direction.x > 0.99);
        assert_relative_eq!(light.direction.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_material_references_resolve() {
        let colors = colors();
        let bsdfs = bsdfs();
        let edfs = edfs();
        for material in materials() {
            assert!(bsdfs.iter().any(|b| b.name() == material.bsdf));
            if let Some(edf) = &material.edf {
                let edf = edfs.iter().find(|e| &e.name == edf).unwrap();
                assert!(colors.iter().any(|c| c.name == edf.radiance));
            }
        }
    }

    #[test]
    fn test_frame_matches_camera() {
        assert_eq!(frame().camera, camera().name);
        assert_eq!(frame().resolution, (640, 480));
        assert_eq!(quality().samples, 32);
    }
}
