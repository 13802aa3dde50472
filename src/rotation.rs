//! Euler-angle rotation of packed coordinate buffers.
//!
//! Surface vertices and track points arrive from the scanner with the
//! superior axis on Z, while the viewer orients its scene with Y up. The
//! decoders therefore accept an optional [`Rotation`] and apply it to every
//! decoded point; this module holds that rotation and the in-place buffer
//! transform.

use glam::{EulerRot, Mat3, Vec3};

use std::f32::consts::FRAC_PI_2;

/// A rotation expressed as three Euler angles in radians, applied
/// intrinsically in X, Y, Z order. The combined matrix is `Rx * Ry * Rz`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    /// The no-op rotation.
    pub const IDENTITY: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// The alignment the companion viewer applies while loading: -90
    /// degrees about X followed by +90 degrees about Z, which brings the
    /// scanner's superior axis onto the renderer's Y-up axis.
    pub const SCANNER_TO_VIEW: Rotation = Rotation {
        x: -FRAC_PI_2,
        y: 0.0,
        z: FRAC_PI_2,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Rotation {
        Rotation { x, y, z }
    }

    /// The combined 3x3 rotation matrix.
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }

    /// Whether every angle is exactly zero radians.
    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Rotate every complete `[x, y, z]` run of `points` in place.
///
/// Trailing elements that do not form a full triple are left untouched. A
/// zero rotation returns without touching the buffer at all, so it is an
/// exact no-op.
pub fn rotate_points(points: &mut [f32], rotation: Rotation) {
    if rotation.is_identity() {
        return;
    }
    let matrix = rotation.matrix();
    for point in points.chunks_exact_mut(3) {
        let rotated = matrix * Vec3::new(point[0], point[1], point[2]);
        point[0] = rotated.x;
        point[1] = rotated.y;
        point[2] = rotated.z;
    }
}
