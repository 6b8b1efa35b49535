//! Scene description: materials, sphere primitives, and the built-in scenes.

use nalgebra::Vector3;

use crate::renderer::Ray;

/// How a surface scatters light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brdf {
    Diffuse,
    Specular,
    Refractive,
}

/// Surface description attached to each sphere.
///
/// `color` channels live in [0, 255] and double as the emitted spectrum:
/// a surface radiates `color * emission`. `roughness` perturbs the bounce
/// direction of the specular and refractive kinds only; mirrors ignore
/// their color entirely.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub color: Vector3<f32>,
    pub emission: f32,
    pub roughness: f32,
    pub kind: Brdf,
}

impl Material {
    pub fn diffuse(color: Vector3<f32>) -> Self {
        Self {
            color,
            emission: 0.0,
            roughness: 0.0,
            kind: Brdf::Diffuse,
        }
    }

    pub fn emissive(color: Vector3<f32>, emission: f32) -> Self {
        Self {
            color,
            emission,
            roughness: 0.0,
            kind: Brdf::Diffuse,
        }
    }

    pub fn specular(color: Vector3<f32>, roughness: f32) -> Self {
        Self {
            color,
            emission: 0.0,
            roughness,
            kind: Brdf::Specular,
        }
    }

    pub fn refractive(color: Vector3<f32>, roughness: f32) -> Self {
        Self {
            color,
            emission: 0.0,
            roughness,
            kind: Brdf::Refractive,
        }
    }
}

/// Sphere primitive. Immutable once the scene is built.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vector3<f32>,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Panics when the radius is not positive; degenerate spheres are
    /// rejected here rather than inside the integrator.
    pub fn new(center: Vector3<f32>, radius: f32, material: Material) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive");
        Self {
            center,
            radius,
            material,
        }
    }

    /// Smallest positive hit distance along the ray, if any.
    ///
    /// The full quadratic is solved because bounce directions are not
    /// always unit length. A ray starting inside the sphere hits the far
    /// root, which matters for refraction.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&oc);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let near = (-b - sqrt_d) / (2.0 * a);
        if near > 0.0 {
            return Some(near);
        }
        let far = (-b + sqrt_d) / (2.0 * a);
        if far > 0.0 {
            return Some(far);
        }
        None
    }

    /// Outward unit normal at a point on the surface.
    pub fn surface_normal(&self, point: Vector3<f32>) -> Vector3<f32> {
        (point - self.center).normalize()
    }
}

/// Fixed ordered sphere list. Iteration order is the tie-break for equal
/// hit distances, so it is part of the scene's identity.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Green diffuse sphere flanked by two blue ones, lit from above.
    pub fn reference() -> Self {
        let green = Material::diffuse(Vector3::new(32.0, 128.0, 32.0));
        let blue = Material::diffuse(Vector3::new(32.0, 32.0, 128.0));
        let light = Material::emissive(Vector3::new(128.0, 128.0, 128.0), 0.2);

        Self::new(vec![
            Sphere::new(Vector3::new(0.0, 0.0, -9.0), 2.75, green),
            Sphere::new(Vector3::new(2.0, 0.0, -7.0), 0.5, blue),
            Sphere::new(Vector3::new(-2.0, 0.0, -7.0), 0.5, blue),
            Sphere::new(Vector3::new(0.0, 6.0, -6.0), 1.0, light),
        ])
    }

    /// Mirror, brushed metal and glass around the green sphere, so all
    /// three scattering kinds show up in one frame.
    pub fn showcase() -> Self {
        let green = Material::diffuse(Vector3::new(32.0, 128.0, 32.0));
        let mirror = Material::specular(Vector3::new(128.0, 128.0, 128.0), 0.0);
        let metal = Material::specular(Vector3::new(200.0, 200.0, 200.0), 0.5);
        let glass = Material::refractive(Vector3::new(128.0, 128.0, 128.0), 0.2);
        let light = Material::emissive(Vector3::new(128.0, 128.0, 128.0), 0.2);

        Self::new(vec![
            Sphere::new(Vector3::new(0.0, 0.0, -9.0), 2.75, green),
            Sphere::new(Vector3::new(-2.0, 0.0, -7.0), 0.5, mirror),
            Sphere::new(Vector3::new(2.0, 0.0, -7.0), 0.5, metal),
            Sphere::new(Vector3::new(0.0, -1.5, -6.5), 0.75, glass),
            Sphere::new(Vector3::new(0.0, 6.0, -6.0), 1.0, light),
        ])
    }

    /// Nearest intersection over the fixed sphere order: index and
    /// distance of the closest positive hit.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some(t) = sphere.intersect(ray) {
                if t > 0.0 && best.map_or(true, |(_, nearest)| t < nearest) {
                    best = Some((index, t));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Material {
        Material::diffuse(Vector3::new(128.0, 128.0, 128.0))
    }

    #[test]
    fn test_head_on_intersection() {
        let sphere = Sphere::new(Vector3::new(0.0, 0.0, -3.0), 1.0, plain());
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_returns_none() {
        let sphere = Sphere::new(Vector3::new(0.0, 5.0, -3.0), 1.0, plain());
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_behind_origin_returns_none() {
        let sphere = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, plain());
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_inside_sphere_hits_far_wall() {
        let sphere = Sphere::new(Vector3::zeros(), 2.0, plain());
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_surface_normal_points_outward() {
        let sphere = Sphere::new(Vector3::new(0.0, 0.0, -3.0), 1.0, plain());
        let normal = sphere.surface_normal(Vector3::new(0.0, 0.0, -2.0));
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_tie_goes_to_first_sphere() {
        let a = Sphere::new(Vector3::new(0.0, 0.0, -3.0), 1.0, plain());
        let scene = Scene::new(vec![a, a]);
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        let (index, _) = scene.nearest_hit(&ray).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_nearest_of_two() {
        let far = Sphere::new(Vector3::new(0.0, 0.0, -9.0), 1.0, plain());
        let near = Sphere::new(Vector3::new(0.0, 0.0, -4.0), 1.0, plain());
        let scene = Scene::new(vec![far, near]);
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0));
        let (index, t) = scene.nearest_hit(&ray).unwrap();
        assert_eq!(index, 1);
        assert!((t - 3.0).abs() < 1e-5);
    }

    #[test]
    #[should_panic]
    fn test_rejects_degenerate_radius() {
        Sphere::new(Vector3::zeros(), 0.0, plain());
    }

    #[test]
    fn test_reference_scene_layout() {
        let scene = Scene::reference();
        assert_eq!(scene.spheres.len(), 4);
        assert!(scene.spheres.iter().any(|s| s.material.emission > 0.0));
    }

    #[test]
    fn test_showcase_covers_all_kinds() {
        let scene = Scene::showcase();
        for kind in [Brdf::Diffuse, Brdf::Specular, Brdf::Refractive] {
            assert!(scene.spheres.iter().any(|s| s.material.kind == kind));
        }
    }
}
