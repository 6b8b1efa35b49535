//! Path tracing renderer: the recursive integrator and the sampling loop.

use std::f32::consts::PI;
use std::time::Instant;

use log::info;
use nalgebra::Vector3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::config::{RenderConfig, DIFFUSE_DAMPING, PIXEL_JITTER_SPREAD, REFRACTIVE_GAIN};
use crate::sampler::HaltonSampler;
use crate::scene::{Brdf, Scene};

/// A ray in 3D space.
///
/// The integrator advances it in place as the path walks the scene: after
/// each bounce the origin is the hit point and the direction is the new
/// scatter direction. Every top-level sample owns a private instance, and
/// recursion receives a copy, so no state is shared between paths.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }
}

/// Cosine-weighted hemisphere direction from two unit-interval coordinates.
fn hemisphere(u1: f32, u2: f32) -> Vector3<f32> {
    let r = (1.0 - u1 * u1).sqrt();
    let phi = 2.0 * PI * u2;
    Vector3::new(phi.cos() * r, phi.sin() * r, u1)
}

/// Uniform random direction on the unit sphere.
fn random_unit_vector(rng: &mut SmallRng) -> Vector3<f32> {
    let theta = 2.0 * PI * rng.gen::<f32>();
    let z = 2.0 * rng.gen::<f32>() - 1.0;
    let r = (1.0 - z * z).sqrt();
    Vector3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Recursively integrate radiance along `ray` into `accum`.
///
/// Stops before any intersection work once `depth` reaches the bounce cap,
/// and contributes nothing when no sphere is hit at positive distance. On a
/// hit the emitted light `color * emission` is always added, whatever the
/// material kind, then the path continues per the kind's scattering rule.
pub fn trace(
    mut ray: Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    halton: &mut HaltonSampler,
    rng: &mut SmallRng,
    accum: &mut Vector3<f32>,
) {
    if depth >= config.max_depth {
        return;
    }

    let Some((index, t)) = scene.nearest_hit(&ray) else {
        return;
    };
    let sphere = scene.spheres[index];
    let material = sphere.material;

    let hit_point = ray.origin + ray.direction * t;
    let mut normal = sphere.surface_normal(hit_point);
    ray.origin = hit_point;

    *accum += material.color * material.emission;

    match material.kind {
        Brdf::Diffuse => {
            // The hemisphere sample is added to the normal and the sum used
            // unnormalized; the 0.1 damping stands in for the missing PDF
            // normalization. Changing either alters the image.
            ray.direction = normal + hemisphere(halton.next(3), halton.next(2));
            let cos_t = ray.direction.dot(&normal);

            let mut bounced = Vector3::zeros();
            trace(ray, scene, depth + 1, config, halton, rng, &mut bounced);
            *accum += bounced.component_mul(&material.color) * (cos_t * DIFFUSE_DAMPING);
        }
        Brdf::Specular => {
            let cos_t = ray.direction.dot(&normal);
            ray.direction -= normal * (2.0 * cos_t);
            ray.direction += random_unit_vector(rng) * (sphere.radius * material.roughness);
            ray.direction.normalize_mut();

            // Mirrors are colorless: the bounce passes through untinted.
            let mut bounced = Vector3::zeros();
            trace(ray, scene, depth + 1, config, halton, rng, &mut bounced);
            *accum += bounced;
        }
        Brdf::Refractive => {
            let mut ratio = config.refractive_index;
            let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
            if normal.dot(&ray.direction) > 0.0 {
                // Travelling with the normal: the ray is leaving the sphere.
                normal = -normal;
                ratio = 1.0 / ratio;
            }
            ratio = 1.0 / ratio;

            let cos_in = -normal.dot(&ray.direction);
            let reflect_prob = r0 + (1.0 - r0) * (1.0 - cos_in).powi(5);
            let cos2_out = 1.0 - ratio * ratio * (1.0 - cos_in * cos_in);

            if cos2_out > 0.0 && rng.gen::<f32>() > reflect_prob {
                ray.direction = ray.direction * ratio + normal * (ratio * cos_in - cos2_out.sqrt());
            } else {
                // Fresnel reflection, or total internal reflection when the
                // discriminant goes non-positive.
                ray.direction += normal * (2.0 * cos_in);
            }
            ray.direction += random_unit_vector(rng) * (sphere.radius * material.roughness);
            ray.direction.normalize_mut();

            let mut bounced = Vector3::zeros();
            trace(ray, scene, depth + 1, config, halton, rng, &mut bounced);
            *accum += bounced * REFRACTIVE_GAIN;
        }
    }
}

/// Accumulates radiance for every pixel of a frame.
pub struct Renderer {
    config: RenderConfig,
    camera: Camera,
    framebuffer: Vec<Vector3<f32>>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            camera: Camera::new(config.width, config.height, config.fov),
            framebuffer: vec![Vector3::zeros(); config.width * config.height],
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Raw accumulated radiance, row-major, origin top-left.
    pub fn framebuffer(&self) -> &[Vector3<f32>] {
        &self.framebuffer
    }

    /// Render the scene into the framebuffer, sharding rows across worker
    /// threads. Each pixel owns an independent sampler and RNG seeded from
    /// its coordinates, so output is identical whatever the thread
    /// schedule. Tone mapping may only run once this returns.
    pub fn render(&mut self, scene: &Scene) {
        let config = self.config;
        let camera = self.camera;

        info!(
            "rendering {}x{} at {} spp on {} threads",
            config.width,
            config.height,
            config.samples_per_pixel,
            rayon::current_num_threads()
        );
        let start = Instant::now();

        let rows: Vec<Vec<Vector3<f32>>> = (0..config.height)
            .into_par_iter()
            .map(|y| {
                (0..config.width)
                    .map(|x| render_pixel(x, y, scene, &camera, &config))
                    .collect()
            })
            .collect();

        self.framebuffer = rows.into_iter().flatten().collect();
        info!("render finished in {:.2?}", start.elapsed());
    }
}

/// Average `samples_per_pixel` integrated paths through one pixel.
fn render_pixel(
    x: usize,
    y: usize,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Vector3<f32> {
    let seed = (y * config.width + x) as u64;
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(12345));
    let mut halton = HaltonSampler::new();
    let spp = config.samples_per_pixel as f32;

    let mut pixel = Vector3::zeros();
    for _ in 0..config.samples_per_pixel {
        let mut direction = camera.project(x as f32, y as f32);
        direction.x += (rng.gen::<f32>() - 0.5) * PIXEL_JITTER_SPREAD;
        direction.y += (rng.gen::<f32>() - 0.5) * PIXEL_JITTER_SPREAD;

        let ray = Ray::new(Vector3::zeros(), direction.normalize());
        let mut sample = Vector3::zeros();
        trace(ray, scene, 0, config, &mut halton, &mut rng, &mut sample);
        pixel += sample / spp;
    }
    pixel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> (HaltonSampler, SmallRng) {
        (HaltonSampler::new(), SmallRng::seed_from_u64(7))
    }

    #[test]
    fn test_empty_scene_contributes_nothing() {
        let scene = Scene::default();
        let config = RenderConfig::default();
        let (mut halton, mut rng) = sample_state();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));

        let mut accum = Vector3::zeros();
        trace(ray, &scene, 0, &config, &mut halton, &mut rng, &mut accum);
        assert_eq!(accum, Vector3::zeros());
    }

    #[test]
    fn test_depth_cap_leaves_accumulator_untouched() {
        let scene = Scene::reference();
        let config = RenderConfig::default();
        let (mut halton, mut rng) = sample_state();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));

        let mut accum = Vector3::zeros();
        trace(
            ray,
            &scene,
            config.max_depth,
            &config,
            &mut halton,
            &mut rng,
            &mut accum,
        );
        assert_eq!(accum, Vector3::zeros());
    }

    #[test]
    fn test_hemisphere_sample_is_unit_length() {
        let dir = hemisphere(0.3, 0.7);
        assert!((dir.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_random_unit_vector_is_unit_length() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..16 {
            let dir = random_unit_vector(&mut rng);
            assert!((dir.norm() - 1.0).abs() < 1e-5);
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 8,
            samples_per_pixel: 16,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_reference_render_is_not_degenerate() {
        let mut renderer = Renderer::new(small_config());
        renderer.render(&Scene::reference());

        let frame = renderer.framebuffer();
        let lit = frame.iter().any(|px| px.norm() > 0.0);
        let uniform = frame.iter().all(|px| px == &frame[0]);
        assert!(lit, "frame should not be all black");
        assert!(!uniform, "frame should not be flat");
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut first = Renderer::new(small_config());
        let mut second = Renderer::new(small_config());
        first.render(&Scene::reference());
        second.render(&Scene::reference());
        assert_eq!(first.framebuffer(), second.framebuffer());
    }
}
