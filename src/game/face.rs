//! Up-face resolution for a settled die
//!
//! The face whose local normal ends up most aligned with world up is the
//! rolled result. Normal order matches the face-value assignment order in
//! [`FaceSet`](super::dice::FaceSet).

use glam::{Quat, Vec3};

use crate::consts::FACE_COUNT;

/// Local face normals in canonical order: +X, −X, +Y, −Y, +Z, −Z
pub const FACE_NORMALS: [Vec3; FACE_COUNT] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Index of the face pointing up for a body with the given orientation.
///
/// Strict comparison keeps the first-encountered face on an exact tie,
/// which only a degenerate orientation can produce for a cube.
#[inline]
pub fn resolve_up_face(orientation: Quat) -> usize {
    let mut top_face = 0;
    let mut max_dot = f32::NEG_INFINITY;
    for (i, normal) in FACE_NORMALS.iter().enumerate() {
        let dot = (orientation * *normal).dot(Vec3::Y);
        if dot > max_dot {
            max_dot = dot;
            top_face = i;
        }
    }
    top_face
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_is_plus_y() {
        assert_eq!(resolve_up_face(Quat::IDENTITY), 2);
    }

    #[test]
    fn test_half_turn_about_x_is_minus_y() {
        assert_eq!(resolve_up_face(Quat::from_rotation_x(PI)), 3);
    }

    #[test]
    fn test_quarter_turns_reach_every_face() {
        // +X up: rotating +90° about Z carries +X onto +Y.
        assert_eq!(resolve_up_face(Quat::from_rotation_z(FRAC_PI_2)), 0);
        // −X up
        assert_eq!(resolve_up_face(Quat::from_rotation_z(-FRAC_PI_2)), 1);
        // +Z up: rotating −90° about X carries +Z onto +Y.
        assert_eq!(resolve_up_face(Quat::from_rotation_x(-FRAC_PI_2)), 4);
        // −Z up
        assert_eq!(resolve_up_face(Quat::from_rotation_x(FRAC_PI_2)), 5);
    }

    #[test]
    fn test_slight_tilt_keeps_top_face() {
        // 20° tilt is nowhere near enough to change the winner.
        let tilt = Quat::from_rotation_z(20f32.to_radians());
        assert_eq!(resolve_up_face(tilt), 2);
    }
}
