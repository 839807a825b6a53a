//! Dice arena physics using `Rapier3D`
//!
//! The engine is an opaque collaborator: game logic sees bodies only
//! through the [`DieBody`] trait. This module owns the world (floor,
//! four walls, ceiling), die creation/placement, and fixed stepping.

use glam::{Quat, Vec3};
use rand::Rng;
use rapier3d::prelude::*;

use crate::consts::{ARENA_SIZE, PHYSICS_DT};
use crate::game::roll::scatter_pose;
use crate::game::settle::DieBody;

/// Wall slab half-thickness
const WALL_HALF: f32 = 0.5;
/// Die/ground contact properties: slick table, lively bounce
const DIE_FRICTION: f32 = 0.1;
const DIE_RESTITUTION: f32 = 0.5;

/// Downward gravity
fn default_gravity() -> Vector {
    Vector::new(0.0, -9.82, 0.0)
}

/// Physics world containing all `Rapier3D` components for the dice box
pub struct DiceArena {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
}

impl Default for DiceArena {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceArena {
    /// World with the enclosing box already in place
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..Default::default()
        };

        let mut arena = Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: default_gravity(),
        };
        arena.build_box();
        arena
    }

    /// Static floor, four walls and a ceiling enclosing the dice
    fn build_box(&mut self) {
        let half = ARENA_SIZE / 2.0;
        let slabs = [
            // floor (top surface at y = 0) and ceiling
            (Vector::new(0.0, -WALL_HALF, 0.0), (half, WALL_HALF, half)),
            (Vector::new(0.0, ARENA_SIZE + WALL_HALF, 0.0), (half, WALL_HALF, half)),
            // ±X walls
            (Vector::new(half + WALL_HALF, half, 0.0), (WALL_HALF, half, half)),
            (Vector::new(-half - WALL_HALF, half, 0.0), (WALL_HALF, half, half)),
            // ±Z walls
            (Vector::new(0.0, half, half + WALL_HALF), (half, half, WALL_HALF)),
            (Vector::new(0.0, half, -half - WALL_HALF), (half, half, WALL_HALF)),
        ];
        for (translation, (hx, hy, hz)) in slabs {
            let collider = ColliderBuilder::cuboid(hx, hy, hz)
                .translation(translation)
                .friction(DIE_FRICTION)
                .restitution(DIE_RESTITUTION)
                .build();
            self.collider_set.insert(collider);
        }
    }

    /// Create a die of the given edge length, asleep just above the
    /// floor until its first roll
    pub fn add_die(&mut self, size: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(0.0, size / 2.0 + 0.1, 0.0))
            .linear_damping(0.1)
            .angular_damping(0.5)
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(size / 2.0, size / 2.0, size / 2.0)
            .mass(1.0)
            .friction(DIE_FRICTION)
            .restitution(DIE_RESTITUTION)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.rigid_body_set[handle].sleep();
        handle
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Borrow a die through the narrow game-facing interface
    pub fn die(&mut self, handle: RigidBodyHandle) -> Option<ArenaDie<'_>> {
        self.rigid_body_set.get_mut(handle).map(|body| ArenaDie { body })
    }

    /// Re-rack a die for the next roll: zero velocities, random pose
    /// near the arena center, awake and ready for the impulse
    pub fn reset_die<R: Rng + ?Sized>(
        &mut self,
        handle: RigidBodyHandle,
        size: f32,
        rng: &mut R,
    ) {
        let (position, orientation) = scatter_pose(size, rng);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(Vector::ZERO, false);
            body.set_angvel(Vector::ZERO, false);
            body.set_translation(Vector::new(position.x, position.y, position.z), false);
            body.set_rotation(to_rapier_rotation(orientation), false);
            body.wake_up(true);
        }
    }

    /// Park a die at rest (hidden between games)
    pub fn sleep_die(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(Vector::ZERO, false);
            body.set_angvel(Vector::ZERO, false);
            body.sleep();
        }
    }

    /// Move a die sideways to its rolling lane without disturbing the
    /// rest of its pose
    pub fn place_die_x(&mut self, handle: RigidBodyHandle, x: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let mut translation = body.translation();
            translation.x = x;
            body.set_translation(translation, false);
        }
    }
}

fn to_rapier_rotation(q: Quat) -> Rotation {
    Rotation::from_xyzw(q.x, q.y, q.z, q.w)
}

/// A die borrowed from the arena, seen through the game's interface
pub struct ArenaDie<'a> {
    body: &'a mut RigidBody,
}

impl DieBody for ArenaDie<'_> {
    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        self.body.apply_impulse_at_point(
            Vector::new(impulse.x, impulse.y, impulse.z),
            Vector::new(point.x, point.y, point.z),
            true,
        );
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.body
            .set_angvel(Vector::new(velocity.x, velocity.y, velocity.z), true);
    }

    fn position(&self) -> Vec3 {
        let translation = self.body.translation();
        Vec3::new(translation.x, translation.y, translation.z)
    }

    fn orientation(&self) -> Quat {
        let r = self.body.rotation();
        Quat::from_xyzw(r.x, r.y, r.z, r.w)
    }

    fn linear_velocity_sq(&self) -> f32 {
        self.body.linvel().length_squared()
    }

    fn angular_velocity_sq(&self) -> f32 {
        self.body.angvel().length_squared()
    }

    fn is_quiescent(&self) -> bool {
        self.body.is_sleeping()
    }

    fn wake(&mut self) {
        self.body.wake_up(true);
    }
}
