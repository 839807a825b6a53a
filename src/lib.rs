//! Chore Dice - a physics-dice chore picker
//!
//! Core modules:
//! - `rooms`: Candidate room pool with per-room exclusion
//! - `fragment`: URL-fragment codec for shareable pool state
//! - `game`: Pure game logic (dice selection, settle detection, face
//!   resolution, session state machine)
//! - `physics`: Rapier binding for the dice arena
//! - `settings`: User preferences persisted in LocalStorage

pub mod fragment;
pub mod game;
pub mod physics;
pub mod rooms;
pub mod settings;

pub use rooms::RoomPool;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Minimum rooms that must stay available for a roll
    pub const MIN_ROOMS: usize = 6;
    /// Faces on a die
    pub const FACE_COUNT: usize = 6;

    /// Label shown on padded room faces when fewer than 6 rooms remain
    pub const EMPTY_FACE_LABEL: &str = "Empty";
    /// Duration faces in minutes
    pub const DURATIONS_MIN: [u32; FACE_COUNT] = [5, 10, 15, 20, 25, 30];
    /// Padding value for short duration lists (minutes)
    pub const DEFAULT_DURATION_MIN: u32 = 5;

    /// Hold-to-roll power gesture ceiling
    pub const MAX_HOLD_MS: f64 = 1500.0;
    pub const MIN_FORCE: f32 = 20.0;
    pub const MAX_FORCE: f32 = 70.0;
    pub const MIN_TORQUE: f32 = 20.0;
    pub const MAX_TORQUE: f32 = 50.0;
    /// Power-bar sampling cadence while the button is held
    pub const HOLD_SAMPLE_MS: i32 = 50;

    /// Delay after the impulse before settle sampling begins
    pub const SETTLE_DELAY_MS: f64 = 500.0;
    /// Settle sampling cadence
    pub const SETTLE_POLL_MS: f64 = 100.0;
    /// Grace delay between rest detection and face resolution
    pub const SETTLE_GRACE_MS: f64 = 500.0;
    /// Squared-velocity threshold below which a die counts as at rest
    pub const SETTLE_SPEED_SQ: f32 = 0.2;
    /// Poll ceiling before a die is force-settled (60 s at the cadence)
    pub const MAX_SETTLE_POLLS: u32 = 600;

    /// Stagger between the first and second die roll
    pub const SECOND_DIE_DELAY_MS: i32 = 150;

    /// Fixed physics timestep (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 3;

    /// Arena interior extent (square floor, walls this high)
    pub const ARENA_SIZE: f32 = 10.0;
    /// Room die edge length; the duration die uses [`TIME_DIE_SIZE`]
    pub const ROOM_DIE_SIZE: f32 = 1.3;
    pub const TIME_DIE_SIZE: f32 = 1.0;

    /// Celebration window after a chore completes
    pub const CELEBRATION_MS: f64 = 60_000.0;
}
