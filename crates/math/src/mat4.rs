use std::ops::Mul;

use crate::Vec3;

/// A 4x4 transform matrix stored as 16 floats in column-major order,
/// the layout GPU uniform and instance buffers consume directly.
///
/// `translate`, `scale`, and `rotate_y` right-multiply an elementary
/// matrix onto the receiver, so a chain reads in model-transform order:
/// `Mat4::IDENTITY.translate(tx, ty, tz).scale(sx, sy, sz)` scales local
/// coordinates first, then translates the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::IDENTITY;
        t.m[12] = x;
        t.m[13] = y;
        t.m[14] = z;
        t
    }

    fn scaling(x: f32, y: f32, z: f32) -> Self {
        let mut s = Self::IDENTITY;
        s.m[0] = x;
        s.m[5] = y;
        s.m[10] = z;
        s
    }

    fn rotation_y(deg: f32) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        let mut r = Self::IDENTITY;
        r.m[0] = c;
        r.m[2] = s;
        r.m[8] = -s;
        r.m[10] = c;
        r
    }

    /// Right-multiplies a translation by `(x, y, z)`.
    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        self * Self::translation(x, y, z)
    }

    /// Right-multiplies a non-uniform scale by `(x, y, z)`.
    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        self * Self::scaling(x, y, z)
    }

    /// Right-multiplies a rotation of `deg` degrees about the Y axis.
    pub fn rotate_y(self, deg: f32) -> Self {
        self * Self::rotation_y(deg)
    }

    /// GL-style perspective projection from a vertical field of view in
    /// degrees. Maps the near plane to clip depth -1 and the far plane
    /// to +1.
    pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_deg.to_radians() / 2.0).tan();
        let nf = 1.0 / (near - far);
        Self {
            m: [
                f / aspect,
                0.0,
                0.0,
                0.0,
                0.0,
                f,
                0.0,
                0.0,
                0.0,
                0.0,
                (far + near) * nf,
                -1.0,
                0.0,
                0.0,
                2.0 * far * near * nf,
                0.0,
            ],
        }
    }

    /// Right-handed view matrix looking from `eye` toward `at`.
    pub fn look_at(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        let z = (eye - at).normalized();
        let x = Vec3::cross(up, z).normalized();
        let y = Vec3::cross(z, x).normalized();
        Self {
            m: [
                x.x,
                y.x,
                z.x,
                0.0,
                x.y,
                y.y,
                z.y,
                0.0,
                x.z,
                y.z,
                z.z,
                0.0,
                -x.dot(eye),
                -y.dot(eye),
                -z.dot(eye),
                1.0,
            ],
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let a = &self.m;
        let b = &rhs.m;
        let mut m = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                m[col * 4 + row] = a[row] * b[col * 4]
                    + a[4 + row] * b[col * 4 + 1]
                    + a[8 + row] * b[col * 4 + 2]
                    + a[12 + row] * b[col * 4 + 3];
            }
        }
        Mat4 { m }
    }
}
