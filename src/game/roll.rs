//! Hold-to-roll power gesture and impulse generation
//!
//! Holding the roll control accumulates power; the hold ratio linearly
//! interpolates both impulse and torque magnitude. Direction, impulse
//! point and spin axis stay random so equal power still gives distinct
//! rolls.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::consts::{MAX_FORCE, MAX_HOLD_MS, MAX_TORQUE, MIN_FORCE, MIN_TORQUE};

/// Impulse and spin magnitudes computed from the hold ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollPower {
    pub force: f32,
    pub torque: f32,
}

/// Magnitudes for a hold ratio in [0, 1]
pub fn power_for_ratio(ratio: f32) -> RollPower {
    let ratio = ratio.clamp(0.0, 1.0);
    RollPower {
        force: MIN_FORCE + (MAX_FORCE - MIN_FORCE) * ratio,
        torque: MIN_TORQUE + (MAX_TORQUE - MIN_TORQUE) * ratio,
    }
}

/// One periodic sample of a held gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldSample {
    /// Not currently held
    Idle,
    /// Held; current ratio in [0, 1) for the power-bar fill
    Charging(f32),
    /// Hold ceiling reached; the gauge released itself
    AutoRelease(RollPower),
}

/// Press/hold/release state for the roll control
#[derive(Debug, Default)]
pub struct HoldGauge {
    pressed_at: Option<f64>,
}

impl HoldGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Begin accumulating power
    pub fn press(&mut self, now_ms: f64) {
        self.pressed_at = Some(now_ms);
    }

    /// Hold ratio in [0, 1], or None when not held
    pub fn ratio(&self, now_ms: f64) -> Option<f64> {
        self.pressed_at
            .map(|start| ((now_ms - start) / MAX_HOLD_MS).clamp(0.0, 1.0))
    }

    /// Periodic sample while held. Auto-releases at the ceiling.
    pub fn sample(&mut self, now_ms: f64) -> HoldSample {
        match self.ratio(now_ms) {
            None => HoldSample::Idle,
            Some(ratio) if ratio >= 1.0 => {
                self.pressed_at = None;
                HoldSample::AutoRelease(power_for_ratio(1.0))
            }
            Some(ratio) => HoldSample::Charging(ratio as f32),
        }
    }

    /// Explicit release; None when there was no press to release
    pub fn release(&mut self, now_ms: f64) -> Option<RollPower> {
        let ratio = self.ratio(now_ms)?;
        self.pressed_at = None;
        Some(power_for_ratio(ratio as f32))
    }

    /// Cancel-gesture (pointer left the control): discard the hold
    pub fn cancel(&mut self) {
        self.pressed_at = None;
    }
}

/// A single die roll: impulse vector, application point, angular velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollImpulse {
    pub impulse: Vec3,
    pub point: Vec3,
    pub angular_velocity: Vec3,
}

/// Randomize a roll with the given magnitudes. The impulse direction is
/// biased upward, the point lands inside the die, and the spin axis is
/// uniform.
pub fn random_roll<R: Rng + ?Sized>(power: RollPower, die_size: f32, rng: &mut R) -> RollImpulse {
    let point = Vec3::new(
        (rng.random::<f32>() - 0.5) * die_size * 0.5,
        (rng.random::<f32>() - 0.5) * die_size * 0.5,
        (rng.random::<f32>() - 0.5) * die_size * 0.5,
    );
    let direction = Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        rng.random::<f32>() * 0.5 + 0.5,
        (rng.random::<f32>() - 0.5) * 2.0,
    )
    .normalize_or(Vec3::Y);
    let spin_axis = Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
    )
    .normalize_or(Vec3::X);
    RollImpulse {
        impulse: direction * power.force,
        point,
        angular_velocity: spin_axis * power.torque,
    }
}

/// Resting pose for a die between rolls: scattered near the arena
/// center, just above the floor, with a random orientation
pub fn scatter_pose<R: Rng + ?Sized>(die_size: f32, rng: &mut R) -> (Vec3, Quat) {
    let position = Vec3::new(
        (rng.random::<f32>() * 2.0 - 1.0) * 3.0,
        die_size / 2.0 + 0.1 + rng.random::<f32>() * 0.2,
        (rng.random::<f32>() * 2.0 - 1.0) * 3.0,
    );
    let orientation = Quat::from_euler(
        glam::EulerRot::XYZ,
        rng.random::<f32>() * std::f32::consts::TAU,
        rng.random::<f32>() * std::f32::consts::TAU,
        rng.random::<f32>() * std::f32::consts::TAU,
    );
    (position, orientation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_power_interpolation_endpoints() {
        let low = power_for_ratio(0.0);
        assert_eq!(low.force, MIN_FORCE);
        assert_eq!(low.torque, MIN_TORQUE);
        let high = power_for_ratio(1.0);
        assert_eq!(high.force, MAX_FORCE);
        assert_eq!(high.torque, MAX_TORQUE);
        // Out-of-range ratios clamp.
        assert_eq!(power_for_ratio(3.0), high);
        assert_eq!(power_for_ratio(-1.0), low);
    }

    #[test]
    fn test_release_scales_with_hold_duration() {
        let mut gauge = HoldGauge::new();
        gauge.press(1000.0);
        let power = gauge.release(1000.0 + MAX_HOLD_MS / 2.0).unwrap();
        assert!((power.force - (MIN_FORCE + MAX_FORCE) / 2.0).abs() < 1e-3);
        assert!(!gauge.is_held());
    }

    #[test]
    fn test_release_without_press_is_none() {
        let mut gauge = HoldGauge::new();
        assert_eq!(gauge.release(100.0), None);
    }

    #[test]
    fn test_auto_release_at_ceiling() {
        let mut gauge = HoldGauge::new();
        gauge.press(0.0);
        assert!(matches!(gauge.sample(100.0), HoldSample::Charging(_)));
        let sample = gauge.sample(MAX_HOLD_MS);
        assert_eq!(sample, HoldSample::AutoRelease(power_for_ratio(1.0)));
        // Gauge is idle afterwards; a late release finds nothing.
        assert_eq!(gauge.sample(MAX_HOLD_MS + 50.0), HoldSample::Idle);
        assert_eq!(gauge.release(MAX_HOLD_MS + 50.0), None);
    }

    #[test]
    fn test_cancel_discards_hold() {
        let mut gauge = HoldGauge::new();
        gauge.press(0.0);
        gauge.cancel();
        assert!(!gauge.is_held());
        assert_eq!(gauge.release(700.0), None);
    }

    #[test]
    fn test_random_roll_magnitudes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let power = power_for_ratio(0.5);
        for _ in 0..50 {
            let roll = random_roll(power, 1.3, &mut rng);
            assert!((roll.impulse.length() - power.force).abs() < 1e-3);
            assert!((roll.angular_velocity.length() - power.torque).abs() < 1e-3);
            // Upward bias on the impulse direction.
            assert!(roll.impulse.y > 0.0);
            // Point stays inside the die.
            assert!(roll.point.abs().max_element() <= 1.3 * 0.25 + 1e-6);
        }
    }

    #[test]
    fn test_scatter_pose_above_floor() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let (pos, _) = scatter_pose(1.0, &mut rng);
            assert!(pos.y >= 0.6 && pos.y <= 0.8 + 1e-6);
            assert!(pos.x.abs() <= 3.0 && pos.z.abs() <= 3.0);
        }
    }
}
