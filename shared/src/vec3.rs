/// 3D vector utilities for arena positions.
/// The arena floor is the XZ plane; Y is up.

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Shorthand constructor
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Dot product
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Vector length
pub fn length(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Normalize vector to unit length
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len < 1e-10 {
        return Vec3::new(1.0, 0.0, 0.0);
    }
    Vec3::new(v.x / len, v.y / len, v.z / len)
}

/// Scale vector by scalar
pub fn scale(v: Vec3, s: f64) -> Vec3 {
    Vec3::new(v.x * s, v.y * s, v.z * s)
}

/// Add two vectors
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

/// Subtract vectors (a - b)
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

/// Euclidean distance between two points
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(sub(a, b))
}

/// Unit direction on the floor plane for a heading in radians (0 = +Z).
pub fn heading_xz(heading: f64) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn length_of_3_4_0_is_5() {
        assert_close(length(vec3(3.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn normalize_returns_unit_vector() {
        let n = normalize(vec3(2.0, -3.0, 6.0));
        assert_close(length(n), 1.0);
    }

    #[test]
    fn normalize_zero_returns_arbitrary_unit() {
        assert_eq!(normalize(Vec3::ZERO), vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = vec3(-20.0, 0.0, 20.0);
        let b = vec3(20.0, 0.0, 20.0);
        assert_close(distance(a, b), 40.0);
        assert_close(distance(b, a), 40.0);
    }

    #[test]
    fn add_scale_sub_compose() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = add(a, scale(a, 2.0));
        assert_eq!(b, vec3(3.0, 6.0, 9.0));
        assert_eq!(sub(b, a), vec3(2.0, 4.0, 6.0));
    }

    #[test]
    fn heading_zero_points_along_z() {
        let d = heading_xz(0.0);
        assert_close(d.x, 0.0);
        assert_close(d.z, 1.0);
        let d = heading_xz(std::f64::consts::FRAC_PI_2);
        assert_close(d.x, 1.0);
        assert_close(d.z, 0.0);
    }
}
