//! Chore Dice entry point
//!
//! Handles platform-specific initialization, DOM wiring and the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, MouseEvent};

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use rapier3d::prelude::RigidBodyHandle;

    use chore_dice::consts::*;
    use chore_dice::fragment;
    use chore_dice::game::{
        DieBody, DieId, GamePhase, GameSession, HoldGauge, HoldSample, RollPower, SessionEvent,
        TimerCommand, TimerState, random_roll,
    };
    use chore_dice::physics::DiceArena;
    use chore_dice::rooms::RoomPool;
    use chore_dice::settings::Settings;

    /// Game instance holding all state
    struct Game {
        pool: RoomPool,
        session: GameSession,
        arena: DiceArena,
        room_die: RigidBodyHandle,
        time_die: RigidBodyHandle,
        gauge: HoldGauge,
        rng: Pcg32,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        // Scheduled-callback handles; cancelled on their terminal events
        hold_interval: Option<i32>,
        countdown_interval: Option<i32>,
        celebration_timeout: Option<i32>,
    }

    impl Game {
        fn new(seed: u64, pool: RoomPool) -> Self {
            let mut rng = Pcg32::seed_from_u64(seed);
            let session = GameSession::new(&pool, &mut rng);
            let mut arena = DiceArena::new();
            let room_die = arena.add_die(ROOM_DIE_SIZE);
            let time_die = arena.add_die(TIME_DIE_SIZE);
            Self {
                pool,
                session,
                arena,
                room_die,
                time_die,
                gauge: HoldGauge::new(),
                rng,
                settings: Settings::load(),
                accumulator: 0.0,
                last_time: 0.0,
                hold_interval: None,
                countdown_interval: None,
                celebration_timeout: None,
            }
        }

        /// Step physics and poll the settle detectors. Returns true when
        /// the session just moved to the TIMER phase.
        fn update(&mut self, dt: f32) -> bool {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= PHYSICS_DT && substeps < MAX_SUBSTEPS {
                self.arena.step();
                self.accumulator -= PHYSICS_DT;
                substeps += 1;
            }

            if !self.session.is_rolling() {
                return false;
            }
            let now = js_sys::Date::now();
            let mut both_settled = false;
            for (id, handle) in [(DieId::Room, self.room_die), (DieId::Time, self.time_die)] {
                if let Some(mut die) = self.arena.die(handle) {
                    match self.session.poll_die(id, &mut die, now) {
                        Some(SessionEvent::BothSettled) => both_settled = true,
                        Some(SessionEvent::DieSettled(_)) | None => {}
                    }
                }
            }
            both_settled
        }

        /// Re-rack both dice and launch the first one. The second die's
        /// impulse is applied by the caller on the stagger delay.
        fn start_roll(&mut self, power: RollPower) -> bool {
            let now = js_sys::Date::now();
            if !self.session.begin_roll(now) {
                return false;
            }
            self.arena.reset_die(self.room_die, ROOM_DIE_SIZE, &mut self.rng);
            self.arena.reset_die(self.time_die, TIME_DIE_SIZE, &mut self.rng);
            // Each die rolls in its own lane.
            self.arena.place_die_x(self.room_die, -2.0);
            self.arena.place_die_x(self.time_die, 2.0);

            let roll = random_roll(power, ROOM_DIE_SIZE, &mut self.rng);
            if let Some(mut die) = self.arena.die(self.room_die) {
                die.apply_impulse(roll.impulse, roll.point);
                die.set_angular_velocity(roll.angular_velocity);
            }
            log::info!(
                "rolling with force {:.1} / torque {:.1}",
                power.force,
                power.torque
            );
            true
        }

        fn roll_second_die(&mut self, power: RollPower) {
            let roll = random_roll(power, TIME_DIE_SIZE, &mut self.rng);
            if let Some(mut die) = self.arena.die(self.time_die) {
                die.apply_impulse(roll.impulse, roll.point);
                die.set_angular_velocity(roll.angular_velocity);
            }
        }

        /// Replay: fresh session, dice parked asleep
        fn reset(&mut self) {
            let Self {
                pool,
                session,
                rng,
                gauge,
                ..
            } = self;
            session.reset(pool, rng);
            gauge.cancel();
            self.arena.reset_die(self.room_die, ROOM_DIE_SIZE, &mut self.rng);
            self.arena.sleep_die(self.room_die);
            self.arena.reset_die(self.time_die, TIME_DIE_SIZE, &mut self.rng);
            self.arena.sleep_die(self.time_die);
        }
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn clear_interval(handle: Option<i32>) {
        if let (Some(id), Some(window)) = (handle, web_sys::window()) {
            window.clear_interval_with_handle(id);
        }
    }

    fn clear_timeout(handle: Option<i32>) {
        if let (Some(id), Some(window)) = (handle, web_sys::window()) {
            window.clear_timeout_with_handle(id);
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Write pool state to the address bar without adding history entries
    fn update_fragment(pool: &RoomPool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let encoded = fragment::encode(pool);
        let url = if encoded.is_empty() {
            let location = window.location();
            let path = location.pathname().unwrap_or_default();
            let search = location.search().unwrap_or_default();
            format!("{path}{search}")
        } else {
            encoded
        };
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
        }
    }

    /// Pool to start the session with: restored from the URL fragment
    /// when it decodes, canonical defaults otherwise
    fn initial_pool() -> RoomPool {
        let hash = web_sys::window()
            .map(|w| w.location())
            .and_then(|l| l.hash().ok())
            .unwrap_or_default();
        match fragment::decode(&hash) {
            Ok(pool) => {
                log::info!("restored {} rooms from URL fragment", pool.len());
                pool
            }
            Err(err) => {
                log::info!("using default rooms ({err})");
                RoomPool::new()
            }
        }
    }

    /// Rebuild the room list UI from the pool
    fn populate_room_list(game: &Game) {
        let document = document();
        let Some(list) = document.get_element_by_id("all-rooms-list") else {
            return;
        };
        set_text(
            &document,
            "all-rooms-title",
            &format!("{} Possible Rooms", game.pool.len()),
        );

        list.set_inner_html("");
        let mut rooms: Vec<&String> = game.pool.rooms().iter().collect();
        rooms.sort();
        for room in rooms {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            let _ = item.set_attribute("class", "room-item");
            let _ = item.set_attribute("data-room", room);

            if let Ok(name) = document.create_element("span") {
                let name_class = if game.pool.is_excluded(room) {
                    "room-name excluded-room"
                } else {
                    "room-name"
                };
                let _ = name.set_attribute("class", name_class);
                name.set_text_content(Some(room));
                let _ = item.append_child(&name);
            }

            if let Ok(delete) = document.create_element("button") {
                let _ = delete.set_attribute("class", "delete-room-btn");
                delete.set_text_content(Some("\u{00d7}"));
                if game.pool.can_delete() {
                    let _ = delete.set_attribute("title", "Delete room");
                } else {
                    let _ = delete.set_attribute("disabled", "");
                    let _ = delete
                        .set_attribute("title", "Cannot delete: minimum of 6 rooms required");
                }
                let _ = item.append_child(&delete);
            }

            let _ = list.append_child(&item);
        }
    }

    /// After a roll starts: highlight the rooms that made it onto the die,
    /// cross out the included rooms that did not
    fn mark_roll_selection(game: &Game) {
        let document = document();
        let Ok(items) = document.query_selector_all(".room-item") else {
            return;
        };
        let faces = game.session.room_faces();
        for i in 0..items.length() {
            let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(room) = item.get_attribute("data-room") else {
                continue;
            };
            let class = if game.pool.is_excluded(&room) {
                "room-item"
            } else if faces.values().iter().any(|f| f == &room) {
                "room-item active-room"
            } else {
                "room-item crossed-out"
            };
            let _ = item.set_attribute("class", class);
        }
    }

    fn clear_roll_selection() {
        let document = document();
        if let Ok(items) = document.query_selector_all(".room-item") {
            for i in 0..items.length() {
                if let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    let _ = item.set_attribute("class", "room-item");
                }
            }
        }
    }

    /// Reflect session state in the DOM
    fn update_hud(game: &Game) {
        let document = document();
        match game.session.phase() {
            GamePhase::RollDice => {
                set_class(&document, "state-roll-room", "");
                set_class(&document, "state-timer", "hidden");
                set_class(&document, "state-complete", "hidden");
                set_class(&document, "timer-control-btn", "hidden");
                set_class(&document, "timer-display", "inactive-timer");
            }
            GamePhase::Timer => {
                set_class(&document, "state-roll-room", "hidden");
                set_class(&document, "state-timer", "");
                set_class(&document, "state-complete", "hidden");
                if let Some(result) = game.session.result() {
                    set_text(
                        &document,
                        "chore-details",
                        &format!("{} for {} minutes", result.room, result.minutes),
                    );
                }
                set_text(&document, "timer-display", &game.session.timer_display());
                if let Some(el) = document.get_element_by_id("timer-display") {
                    let _ = el.set_attribute(
                        "style",
                        &format!("background-size: {:.1}% 100%", game.session.elapsed_percent()),
                    );
                }
                let (label, button_class, display_class) = match game.session.timer() {
                    TimerState::Idle => ("Start Timer", "pulsing", "inactive-timer"),
                    TimerState::Running => ("Pause", "", ""),
                    TimerState::Paused => ("Resume", "pulsing", "inactive-timer"),
                };
                set_text(&document, "timer-control-btn", label);
                set_class(&document, "timer-control-btn", button_class);
                set_class(&document, "timer-display", display_class);
            }
            GamePhase::Complete => {
                set_class(&document, "state-roll-room", "hidden");
                set_class(&document, "state-timer", "hidden");
                set_class(&document, "state-complete", "");
                set_class(&document, "timer-control-btn", "hidden");
            }
        }

        if let Some(btn) = document
            .get_element_by_id("roll-room-btn")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_disabled(
                game.session.is_rolling() || game.session.phase() != GamePhase::RollDice,
            );
        }
    }

    /// Pool mutations atomically re-select dice faces and re-serialize
    /// the URL before the UI is rebuilt
    fn after_pool_change(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let Game {
                pool, session, rng, ..
            } = &mut *g;
            session.reselect_rooms(pool, rng);
            update_fragment(pool);
        }
        populate_room_list(&game.borrow());
    }

    fn set_power_fill(percent: f64) {
        let document = document();
        if let Some(btn) = document.get_element_by_id("roll-room-btn") {
            let _ = btn.set_attribute("style", &format!("background-size: {percent:.0}% 100%"));
        }
    }

    /// Launch a roll with the given power and schedule the second die
    fn launch_roll(game: &Rc<RefCell<Game>>, power: RollPower) {
        {
            let mut g = game.borrow_mut();
            if !g.start_roll(power) {
                return;
            }
        }
        set_power_fill(0.0);
        mark_roll_selection(&game.borrow());
        update_hud(&game.borrow());

        let Some(window) = web_sys::window() else {
            return;
        };
        let game = game.clone();
        let closure = Closure::once(move || {
            game.borrow_mut().roll_second_die(power);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SECOND_DIE_DELAY_MS,
        );
        closure.forget();
    }

    /// Hold-gauge sampling interval: drives the power bar and the
    /// auto-release at the ceiling. Cancelled on release/cancel/auto.
    fn start_hold_sampling(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let cb_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let sample = cb_game.borrow_mut().gauge.sample(now_ms());
            match sample {
                HoldSample::Charging(ratio) => set_power_fill(f64::from(ratio) * 100.0),
                HoldSample::AutoRelease(power) => {
                    log::info!("max power reached, auto-releasing");
                    let handle = cb_game.borrow_mut().hold_interval.take();
                    clear_interval(handle);
                    launch_roll(&cb_game, power);
                }
                HoldSample::Idle => {}
            }
        });
        if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            HOLD_SAMPLE_MS,
        ) {
            game.borrow_mut().hold_interval = Some(id);
        }
        closure.forget();
    }

    /// Countdown interval: one tick per second while the timer runs.
    /// Cancelled on pause, on reaching zero, and on reset.
    fn start_countdown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let cb_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let finished = {
                let mut g = cb_game.borrow_mut();
                if g.session.tick_second() == Some(TimerCommand::StopTicking) {
                    let handle = g.countdown_interval.take();
                    clear_interval(handle);
                    true
                } else {
                    false
                }
            };
            update_hud(&cb_game.borrow());
            if finished {
                celebrate(&cb_game);
            }
        });
        if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            game.borrow_mut().countdown_interval = Some(id);
        }
        closure.forget();
    }

    /// Chore complete: kick off the celebration window. The effect
    /// content itself (confetti/audio assets) lives outside the game.
    fn celebrate(game: &Rc<RefCell<Game>>) {
        let doc = document();
        let (effects, sound) = {
            let g = game.borrow();
            (g.settings.effective_celebration(), g.settings.sound)
        };
        log::info!("chore complete!");
        if effects {
            set_class(&doc, "celebration", "celebrating");
        }
        if sound {
            if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src("applause.mp3") {
                let _ = audio.play();
            }
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let handle = game.borrow_mut().celebration_timeout.take();
            clear_timeout(handle);
        }
        let cb_game = game.clone();
        let closure = Closure::once(move || {
            set_class(&document(), "celebration", "");
            cb_game.borrow_mut().celebration_timeout = None;
        });
        if let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CELEBRATION_MS as i32,
        ) {
            game.borrow_mut().celebration_timeout = Some(id);
        }
        closure.forget();
    }

    fn setup_roll_control(game: Rc<RefCell<Game>>) {
        let document = document();
        let Some(btn) = document.get_element_by_id("roll-room-btn") else {
            return;
        };

        // Press: start accumulating power
        for event in ["mousedown", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                {
                    let mut g = game.borrow_mut();
                    if g.session.is_rolling() || g.session.phase() != GamePhase::RollDice {
                        return;
                    }
                    g.gauge.press(now_ms());
                    let handle = g.hold_interval.take();
                    clear_interval(handle);
                }
                set_power_fill(0.0);
                start_hold_sampling(game.clone());
            });
            let _ = btn.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release: roll with the accumulated power
        for event in ["mouseup", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let power = {
                    let mut g = game.borrow_mut();
                    let handle = g.hold_interval.take();
                    clear_interval(handle);
                    g.gauge.release(now_ms())
                };
                set_power_fill(0.0);
                if let Some(power) = power {
                    launch_roll(&game, power);
                }
            });
            let _ = btn.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Cancel-gesture: pointer left the control while held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let was_held = {
                    let mut g = game.borrow_mut();
                    let handle = g.hold_interval.take();
                    clear_interval(handle);
                    let was_held = g.gauge.is_held();
                    g.gauge.cancel();
                    was_held
                };
                if was_held {
                    log::info!("roll cancelled (pointer left button)");
                    set_power_fill(0.0);
                }
            });
            let _ =
                btn.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_timer_control(game: Rc<RefCell<Game>>) {
        let document = document();
        let Some(btn) = document.get_element_by_id("timer-control-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let command = game.borrow_mut().session.timer_control();
            match command {
                Some(TimerCommand::StartTicking) => start_countdown(game.clone()),
                Some(TimerCommand::StopTicking) => {
                    let handle = game.borrow_mut().countdown_interval.take();
                    clear_interval(handle);
                }
                None => {}
            }
            update_hud(&game.borrow());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_replay(game: Rc<RefCell<Game>>) {
        let doc = document();
        let Some(btn) = doc.get_element_by_id("play-again-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            {
                let mut g = game.borrow_mut();
                let countdown = g.countdown_interval.take();
                clear_interval(countdown);
                let hold = g.hold_interval.take();
                clear_interval(hold);
                let celebration = g.celebration_timeout.take();
                clear_timeout(celebration);
                g.reset();
            }
            set_class(&document(), "celebration", "");
            set_power_fill(0.0);
            clear_roll_selection();
            update_hud(&game.borrow());
            log::info!("game reset, ready to roll again");
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_room_list(game: Rc<RefCell<Game>>) {
        let document = document();
        let Some(list) = document.get_element_by_id("all-rooms-list") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            let Some(room) = target
                .closest(".room-item")
                .ok()
                .flatten()
                .and_then(|item| item.get_attribute("data-room"))
            else {
                return;
            };
            let class = target.get_attribute("class").unwrap_or_default();

            if class.contains("delete-room-btn") {
                let result = game.borrow_mut().pool.delete(&room);
                match result {
                    Ok(()) => after_pool_change(&game),
                    Err(err) => {
                        log::warn!("delete rejected: {err}");
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&err.to_string());
                        }
                    }
                }
            } else if class.contains("room-name") {
                let result = game.borrow_mut().pool.toggle_exclude(&room);
                match result {
                    Ok(excluded) => {
                        log::info!(
                            "room \"{room}\" is now {}",
                            if excluded { "excluded" } else { "included" }
                        );
                        after_pool_change(&game);
                    }
                    Err(err) => {
                        // Transient rejection flash, no state change.
                        log::warn!("exclude rejected: {err}");
                        let _ = target.set_attribute("class", "room-name rejected");
                        let restore = target.clone();
                        let closure = Closure::once(move || {
                            let _ = restore.set_attribute("class", "room-name");
                        });
                        if let Some(window) = web_sys::window() {
                            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                                closure.as_ref().unchecked_ref(),
                                300,
                            );
                        }
                        closure.forget();
                    }
                }
            }
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_add_room(game: Rc<RefCell<Game>>) {
        let doc = document();
        let Some(form) = doc.get_element_by_id("add-room-form") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Some(input) = document()
                .get_element_by_id("new-room-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let result = game.borrow_mut().pool.add(&input.value());
            match result {
                Ok(()) => {
                    input.set_value("");
                    after_pool_change(&game);
                }
                Err(err) => {
                    log::warn!("add rejected: {err}");
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&err.to_string());
                    }
                }
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reset_rooms(game: Rc<RefCell<Game>>) {
        let document = document();
        let Some(btn) = document.get_element_by_id("reset-rooms-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message(
                        "Reset room list to default? This will remove any custom rooms you added.",
                    )
                    .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            game.borrow_mut().pool.reset_to_default();
            after_pool_change(&game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_debug_skip(game: Rc<RefCell<Game>>) {
        let document = document();
        let Some(btn) = document.get_element_by_id("debug-skip-timer-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            log::info!("debug: skipping straight to COMPLETE");
            {
                let mut g = game.borrow_mut();
                let handle = g.countdown_interval.take();
                clear_interval(handle);
                g.session.debug_complete();
            }
            update_hud(&game.borrow());
            celebrate(&game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let both_settled = {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                PHYSICS_DT
            };
            g.last_time = time;
            g.update(dt)
        };
        if both_settled {
            update_hud(&game.borrow());
        }
        request_animation_frame(game);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Chore Dice starting...");

        let document = document();

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let pool = initial_pool();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, pool)));
        log::info!("Game initialized with seed: {seed}");

        populate_room_list(&game.borrow());
        update_hud(&game.borrow());

        setup_roll_control(game.clone());
        setup_timer_control(game.clone());
        setup_replay(game.clone());
        setup_room_list(game.clone());
        setup_add_room(game.clone());
        setup_reset_rooms(game.clone());
        setup_debug_skip(game.clone());

        request_animation_frame(game);

        log::info!("Chore Dice running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chore Dice (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    // Run a headless roll as a smoke test
    println!("\nRolling a headless die...");
    roll_headless_die();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn roll_headless_die() {
    use chore_dice::consts::*;
    use chore_dice::game::{
        SettleDetector, SettleUpdate, power_for_ratio, random_roll, resolve_up_face,
    };
    use chore_dice::game::settle::DieBody;
    use chore_dice::physics::DiceArena;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let mut rng = Pcg32::seed_from_u64(0xD1CE);
    let mut arena = DiceArena::new();
    let handle = arena.add_die(TIME_DIE_SIZE);
    arena.reset_die(handle, TIME_DIE_SIZE, &mut rng);

    let roll = random_roll(power_for_ratio(0.8), TIME_DIE_SIZE, &mut rng);
    {
        let mut die = arena.die(handle).expect("die exists");
        die.apply_impulse(roll.impulse, roll.point);
        die.set_angular_velocity(roll.angular_velocity);
    }

    let mut detector = SettleDetector::new(0.0);
    let mut now = 0.0;
    loop {
        arena.step();
        now += f64::from(PHYSICS_DT) * 1000.0;
        let mut die = arena.die(handle).expect("die exists");
        if detector.poll(&mut die, now) == SettleUpdate::Resolved {
            let face = resolve_up_face(die.orientation());
            println!("✓ Die settled on face {face} after {:.1}s", now / 1000.0);
            break;
        }
    }
}
