//! Game session state machine
//!
//! Drives ROLL_DICE → TIMER → COMPLETE. The session owns no timers and
//! no physics bodies: the driver applies impulses, feeds settle polls,
//! delivers countdown ticks, and obeys the [`TimerCommand`]s this module
//! emits so interval lifecycle stays in one place.

use rand::Rng;

use crate::consts::{DEFAULT_DURATION_MIN, SECOND_DIE_DELAY_MS};
use crate::game::dice::{FaceSet, duration_faces, select_rooms};
use crate::game::face::resolve_up_face;
use crate::game::settle::{DieBody, SettleDetector, SettleUpdate};
use crate::rooms::RoomPool;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for (or executing) a roll
    RollDice,
    /// Chore assigned, countdown owned by the player
    Timer,
    /// Chore done, celebration running
    Complete,
}

/// Which of the two dice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DieId {
    Room = 0,
    Time = 1,
}

/// Countdown state within the TIMER phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Assigned but not started
    #[default]
    Idle,
    Running,
    Paused,
}

/// Chore picked by the settled dice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub room: String,
    pub minutes: u32,
}

/// Interval instructions for the scheduling driver. Cancelling on
/// StopTicking (rather than letting a dead interval fire and no-op) is
/// required so no callback outlives pause/zero/reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    StartTicking,
    StopTicking,
}

/// Notable outcomes of feeding a settle poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    DieSettled(DieId),
    /// Both dice down; the session just moved to TIMER
    BothSettled,
}

/// One page-session of the game
#[derive(Debug)]
pub struct GameSession {
    phase: GamePhase,
    room_faces: FaceSet<String>,
    time_faces: FaceSet<u32>,
    rolling: bool,
    detectors: [Option<SettleDetector>; 2],
    settled: u8,
    selected_room: Option<String>,
    selected_minutes: Option<u32>,
    remaining_secs: u32,
    timer: TimerState,
}

impl GameSession {
    pub fn new<R: Rng + ?Sized>(pool: &RoomPool, rng: &mut R) -> Self {
        Self {
            phase: GamePhase::RollDice,
            room_faces: select_rooms(pool, rng),
            time_faces: duration_faces(),
            rolling: false,
            detectors: [None, None],
            settled: 0,
            selected_room: None,
            selected_minutes: None,
            remaining_secs: 0,
            timer: TimerState::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// Face values currently assigned to the room die
    pub fn room_faces(&self) -> &FaceSet<String> {
        &self.room_faces
    }

    /// Face values assigned to the duration die
    pub fn time_faces(&self) -> &FaceSet<u32> {
        &self.time_faces
    }

    /// The assigned chore, once both dice have settled
    pub fn result(&self) -> Option<RollResult> {
        Some(RollResult {
            room: self.selected_room.clone()?,
            minutes: self.selected_minutes?,
        })
    }

    /// Redraw the room die's faces after a pool mutation, so the next
    /// roll always reflects the pool
    pub fn reselect_rooms<R: Rng + ?Sized>(&mut self, pool: &RoomPool, rng: &mut R) {
        self.room_faces = select_rooms(pool, rng);
    }

    /// Begin a roll. Returns false (and changes nothing) while a roll is
    /// already in flight or outside the ROLL_DICE phase. The second die's
    /// impulse is staggered, so its detector starts on the stagger too.
    pub fn begin_roll(&mut self, now_ms: f64) -> bool {
        if self.rolling || self.phase != GamePhase::RollDice {
            return false;
        }
        self.rolling = true;
        self.settled = 0;
        self.selected_room = None;
        self.selected_minutes = None;
        self.detectors = [
            Some(SettleDetector::new(now_ms)),
            Some(SettleDetector::new(now_ms + f64::from(SECOND_DIE_DELAY_MS))),
        ];
        true
    }

    /// Feed one settle poll for a die. The two dice settle independently
    /// and in either order; the TIMER transition fires exactly once when
    /// the second one resolves.
    pub fn poll_die<B: DieBody + ?Sized>(
        &mut self,
        die: DieId,
        body: &mut B,
        now_ms: f64,
    ) -> Option<SessionEvent> {
        let detector = self.detectors[die as usize].as_mut()?;
        match detector.poll(body, now_ms) {
            SettleUpdate::Pending => None,
            SettleUpdate::Resolved => {
                let face = resolve_up_face(body.orientation());
                match die {
                    DieId::Room => {
                        self.selected_room = Some(self.room_faces[face].clone());
                    }
                    DieId::Time => {
                        self.selected_minutes = Some(self.time_faces[face]);
                    }
                }
                log::info!("{die:?} die settled on face {face}");
                self.settled += 1;
                if self.settled == 2 {
                    self.finish_roll();
                    Some(SessionEvent::BothSettled)
                } else {
                    Some(SessionEvent::DieSettled(die))
                }
            }
        }
    }

    fn finish_roll(&mut self) {
        self.rolling = false;
        self.detectors = [None, None];
        let minutes = self.selected_minutes.unwrap_or(DEFAULT_DURATION_MIN);
        self.remaining_secs = minutes * 60;
        self.timer = TimerState::Idle;
        self.phase = GamePhase::Timer;
    }

    /// The start/pause/resume control: first activation starts the
    /// countdown, later ones toggle pause without touching remaining time
    pub fn timer_control(&mut self) -> Option<TimerCommand> {
        if self.phase != GamePhase::Timer {
            return None;
        }
        match self.timer {
            TimerState::Idle => {
                self.timer = TimerState::Running;
                Some(TimerCommand::StartTicking)
            }
            TimerState::Running => self.pause(),
            TimerState::Paused => self.resume(),
        }
    }

    /// No-op unless the countdown is running
    pub fn pause(&mut self) -> Option<TimerCommand> {
        if self.phase == GamePhase::Timer && self.timer == TimerState::Running {
            self.timer = TimerState::Paused;
            Some(TimerCommand::StopTicking)
        } else {
            None
        }
    }

    /// No-op unless the countdown is paused
    pub fn resume(&mut self) -> Option<TimerCommand> {
        if self.phase == GamePhase::Timer && self.timer == TimerState::Paused {
            self.timer = TimerState::Running;
            Some(TimerCommand::StartTicking)
        } else {
            None
        }
    }

    /// One-second countdown tick. A tick delivered after pause, zero or
    /// reset is ignored, so a late-firing interval cannot double-count.
    pub fn tick_second(&mut self) -> Option<TimerCommand> {
        if self.phase != GamePhase::Timer || self.timer != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = GamePhase::Complete;
            self.timer = TimerState::Idle;
            Some(TimerCommand::StopTicking)
        } else {
            None
        }
    }

    /// Remaining time as mm:ss for the timer display
    pub fn timer_display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Elapsed share of the countdown in [0, 100] for the progress fill
    pub fn elapsed_percent(&self) -> f32 {
        let total = self.selected_minutes.unwrap_or(0) * 60;
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_secs) as f32 / total as f32 * 100.0
    }

    /// Replay: back to ROLL_DICE with a fresh room selection. The driver
    /// also cancels any live interval and re-racks the physics bodies.
    pub fn reset<R: Rng + ?Sized>(&mut self, pool: &RoomPool, rng: &mut R) {
        *self = Self::new(pool, rng);
    }

    /// Debug shortcut: jump straight to COMPLETE with placeholder
    /// results, bypassing dice and timer
    pub fn debug_complete(&mut self) {
        if self.selected_room.is_none() {
            self.selected_room = Some("Debug Room".to_string());
        }
        if self.selected_minutes.is_none() {
            self.selected_minutes = Some(1);
        }
        self.rolling = false;
        self.detectors = [None, None];
        self.remaining_secs = 0;
        self.timer = TimerState::Idle;
        self.phase = GamePhase::Complete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SETTLE_DELAY_MS, SETTLE_GRACE_MS};
    use glam::{Quat, Vec3};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct StillBody {
        orientation: Quat,
    }

    impl StillBody {
        fn upright() -> Self {
            Self {
                orientation: Quat::IDENTITY,
            }
        }
    }

    impl DieBody for StillBody {
        fn apply_impulse(&mut self, _impulse: Vec3, _point: Vec3) {}
        fn set_angular_velocity(&mut self, _velocity: Vec3) {}
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn orientation(&self) -> Quat {
            self.orientation
        }
        fn linear_velocity_sq(&self) -> f32 {
            0.0
        }
        fn angular_velocity_sq(&self) -> f32 {
            0.0
        }
        fn is_quiescent(&self) -> bool {
            true
        }
        fn wake(&mut self) {}
    }

    fn new_session() -> GameSession {
        let pool = RoomPool::new();
        let mut rng = Pcg32::seed_from_u64(11);
        GameSession::new(&pool, &mut rng)
    }

    /// Drive both dice to rest with identity orientation and return the
    /// session in the TIMER phase.
    fn settle_both(session: &mut GameSession) {
        assert!(session.begin_roll(0.0));
        let mut room = StillBody::upright();
        let mut time = StillBody::upright();
        let mut now = 0.0;
        while session.phase() == GamePhase::RollDice {
            session.poll_die(DieId::Room, &mut room, now);
            session.poll_die(DieId::Time, &mut time, now);
            now += 100.0;
            assert!(now < 10_000.0, "dice never settled");
        }
    }

    #[test]
    fn test_begin_roll_reentrancy_guard() {
        let mut session = new_session();
        assert!(session.begin_roll(0.0));
        assert!(session.is_rolling());
        assert!(!session.begin_roll(50.0));
    }

    #[test]
    fn test_both_settled_enters_timer_with_duration() {
        let mut session = new_session();
        settle_both(&mut session);
        assert_eq!(session.phase(), GamePhase::Timer);
        assert!(!session.is_rolling());
        // Identity orientation puts the +Y face (index 2) up: 15 minutes.
        let result = session.result().unwrap();
        assert_eq!(result.minutes, 15);
        assert_eq!(session.remaining_secs(), 15 * 60);
        assert_eq!(session.timer(), TimerState::Idle);
    }

    #[test]
    fn test_settle_order_does_not_matter() {
        let mut session = new_session();
        assert!(session.begin_roll(0.0));
        let mut room = StillBody::upright();
        let mut time = StillBody::upright();
        // The time die's detector starts later but gets polled far in the
        // future first, so it resolves before the room die.
        let late = SETTLE_DELAY_MS + SETTLE_GRACE_MS + 1000.0;
        assert_eq!(
            session.poll_die(DieId::Time, &mut time, late),
            None,
            "first poll only samples rest"
        );
        let mut events = Vec::new();
        for step in 1..20 {
            let now = late + step as f64 * 600.0;
            if let Some(e) = session.poll_die(DieId::Time, &mut time, now) {
                events.push(e);
            }
            if let Some(e) = session.poll_die(DieId::Room, &mut room, now) {
                events.push(e);
            }
        }
        assert_eq!(
            events,
            vec![
                SessionEvent::DieSettled(DieId::Time),
                SessionEvent::BothSettled
            ]
        );
        assert_eq!(session.phase(), GamePhase::Timer);
    }

    #[test]
    fn test_timer_control_start_pause_resume() {
        let mut session = new_session();
        settle_both(&mut session);

        assert_eq!(session.timer_control(), Some(TimerCommand::StartTicking));
        assert_eq!(session.timer(), TimerState::Running);
        session.tick_second();
        session.tick_second();
        let remaining = session.remaining_secs();
        assert_eq!(remaining, 15 * 60 - 2);

        // Pause stops ticking; a second pause is a no-op.
        assert_eq!(session.pause(), Some(TimerCommand::StopTicking));
        assert_eq!(session.pause(), None);
        assert_eq!(session.timer(), TimerState::Paused);
        // Late-delivered ticks while paused change nothing.
        assert_eq!(session.tick_second(), None);
        assert_eq!(session.remaining_secs(), remaining);

        assert_eq!(session.resume(), Some(TimerCommand::StartTicking));
        assert_eq!(session.resume(), None);
        assert_eq!(session.timer(), TimerState::Running);
    }

    #[test]
    fn test_countdown_completes_exactly_once() {
        let mut session = new_session();
        settle_both(&mut session);
        session.timer_control();

        let mut stop_commands = 0;
        for _ in 0..(15 * 60 + 10) {
            if session.tick_second() == Some(TimerCommand::StopTicking) {
                stop_commands += 1;
            }
        }
        assert_eq!(stop_commands, 1);
        assert_eq!(session.phase(), GamePhase::Complete);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn test_timer_control_outside_timer_phase() {
        let mut session = new_session();
        assert_eq!(session.timer_control(), None);
        assert_eq!(session.tick_second(), None);
    }

    #[test]
    fn test_reset_returns_to_roll_dice() {
        let pool = RoomPool::new();
        let mut rng = Pcg32::seed_from_u64(23);
        let mut session = GameSession::new(&pool, &mut rng);
        settle_both(&mut session);
        session.timer_control();
        session.reset(&pool, &mut rng);
        assert_eq!(session.phase(), GamePhase::RollDice);
        assert_eq!(session.result(), None);
        assert_eq!(session.remaining_secs(), 0);
        assert!(!session.is_rolling());
    }

    #[test]
    fn test_debug_complete_uses_placeholders() {
        let mut session = new_session();
        session.debug_complete();
        assert_eq!(session.phase(), GamePhase::Complete);
        let result = session.result().unwrap();
        assert_eq!(result.room, "Debug Room");
        assert_eq!(result.minutes, 1);
    }

    #[test]
    fn test_timer_display_formats() {
        let mut session = new_session();
        settle_both(&mut session);
        assert_eq!(session.timer_display(), "15:00");
        session.timer_control();
        session.tick_second();
        assert_eq!(session.timer_display(), "14:59");
    }
}
