//! Pure game logic module
//!
//! Everything in here must be platform-free and unit-testable:
//! - Advanced by explicit timestamps, never by real timers
//! - Seeded RNG only in tests
//! - The physics engine is reached exclusively through the narrow
//!   [`DieBody`](settle::DieBody) trait
//! - No DOM or rendering dependencies

pub mod dice;
pub mod face;
pub mod roll;
pub mod session;
pub mod settle;

pub use dice::{FaceSet, duration_faces, select_rooms};
pub use face::{FACE_NORMALS, resolve_up_face};
pub use roll::{HoldGauge, HoldSample, RollImpulse, RollPower, power_for_ratio, random_roll, scatter_pose};
pub use session::{DieId, GamePhase, GameSession, RollResult, SessionEvent, TimerCommand, TimerState};
pub use settle::{DieBody, SettleDetector, SettlePhase, SettleUpdate};
