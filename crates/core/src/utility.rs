//! Utility room - derived game state on top of room events
//!
//! Tracks whether a game is running or paused, who touched the ball last and
//! second to last, and whether a goal was scored since the last kick-off.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::event::TypedEvent;
use crate::host::HostRoom;
use crate::invariants::assert_game_state_invariants;
use crate::models::{Player, Team, HOST_PLAYER_ID};
use crate::room::Room;

/// Player disc radius used when the host does not report one
pub const DEFAULT_PLAYER_RADIUS: f64 = 15.0;
/// Ball radius used when the host does not report one
pub const DEFAULT_BALL_RADIUS: f64 = 10.0;
const TOUCH_EPSILON: f64 = 0.01;
const BALL_DISC_INDEX: usize = 0;

/// A goal together with the touchers as they stood when it went in
#[derive(Debug, Clone, PartialEq)]
pub struct GoalScored {
    pub team: Team,
    pub last_touch_by: Option<Player>,
    pub penultimate_touch_by: Option<Player>,
}

/// Game state derived from room events
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub in_progress: bool,
    /// None while no game has been started
    pub paused: Option<bool>,
    pub last_touch_by: Option<Player>,
    pub penultimate_touch_by: Option<Player>,
    pub goal_scored_before_positions_reset: bool,
    /// Ball to player distance that counts as a touch
    pub trigger_distance: f64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            in_progress: false,
            paused: None,
            last_touch_by: None,
            penultimate_touch_by: None,
            goal_scored_before_positions_reset: false,
            trigger_distance: trigger_distance(DEFAULT_PLAYER_RADIUS, DEFAULT_BALL_RADIUS),
        }
    }

    pub fn on_game_start(&mut self, trigger_distance: f64) {
        self.in_progress = true;
        self.paused = Some(false);
        self.last_touch_by = None;
        self.penultimate_touch_by = None;
        self.goal_scored_before_positions_reset = false;
        self.trigger_distance = trigger_distance;
    }

    pub fn on_game_stop(&mut self) {
        self.in_progress = false;
        self.paused = None;
    }

    pub fn on_pause(&mut self) {
        self.in_progress = false;
        self.paused = Some(true);
    }

    pub fn on_unpause(&mut self) {
        self.in_progress = true;
        self.paused = Some(false);
    }

    /// Record a ball touch. Returns false if `player` already holds the last touch.
    pub fn touch(&mut self, player: &Player) -> bool {
        if let Some(last) = &self.last_touch_by {
            if last.same_touch_context(player) {
                return false;
            }
        }
        self.penultimate_touch_by = self.last_touch_by.replace(player.clone());
        true
    }

    /// Snapshot the touchers for a goal and mark the kick-off as pending
    pub fn on_goal(&mut self, team: Team) -> GoalScored {
        let goal = GoalScored {
            team,
            last_touch_by: self.last_touch_by.clone(),
            penultimate_touch_by: self.penultimate_touch_by.clone(),
        };
        self.goal_scored_before_positions_reset = true;
        goal
    }

    pub fn on_positions_reset(&mut self) {
        self.last_touch_by = None;
        self.penultimate_touch_by = None;
        self.goal_scored_before_positions_reset = false;
    }
}

fn trigger_distance(player_radius: f64, ball_radius: f64) -> f64 {
    player_radius + ball_radius + TOUCH_EPSILON
}

/// Touch distance from the discs currently in play
fn measure_trigger_distance(host: &dyn HostRoom) -> f64 {
    let ball_radius = host
        .get_disc_properties(BALL_DISC_INDEX)
        .and_then(|disc| disc.radius)
        .unwrap_or(DEFAULT_BALL_RADIUS);

    let player_radius = host
        .get_player_list()
        .iter()
        .filter(|p| p.id != HOST_PLAYER_ID && p.team.is_playing())
        .find_map(|p| host.get_player_disc_properties(p.id).and_then(|d| d.radius))
        .unwrap_or(DEFAULT_PLAYER_RADIUS);

    trigger_distance(player_radius, ball_radius)
}

type SharedState = Arc<Mutex<GameState>>;

fn lock(state: &Mutex<GameState>) -> MutexGuard<'_, GameState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!("Game state mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn update(state: &Mutex<GameState>, f: impl FnOnce(&mut GameState)) {
    let mut guard = lock(state);
    f(&mut guard);
    assert_game_state_invariants(&guard);
}

/// Room with derived game state
pub struct UtilityRoom {
    room: Arc<Room>,
    state: SharedState,
    on_goal_scored: Arc<TypedEvent<GoalScored>>,
}

impl UtilityRoom {
    /// Wrap a room and subscribe to the events the derived state needs
    pub fn new(room: Room) -> Self {
        let room = Arc::new(room);
        let state: SharedState = Arc::default();
        let on_goal_scored: Arc<TypedEvent<GoalScored>> = Arc::default();
        let events = room.events();

        {
            let state = state.clone();
            let weak: Weak<Room> = Arc::downgrade(&room);
            events.game_start.subscribe(move |_: &Option<Player>| {
                let distance = weak
                    .upgrade()
                    .and_then(|room| room.host().map(|host| measure_trigger_distance(host.as_ref())))
                    .unwrap_or_else(|| trigger_distance(DEFAULT_PLAYER_RADIUS, DEFAULT_BALL_RADIUS));
                tracing::debug!(trigger_distance = distance, "Game started");
                update(&state, |s| s.on_game_start(distance));
            });
        }
        {
            let state = state.clone();
            events
                .game_stop
                .subscribe(move |_: &Option<Player>| update(&state, GameState::on_game_stop));
        }
        {
            let state = state.clone();
            events
                .game_pause
                .subscribe(move |_: &Option<Player>| update(&state, GameState::on_pause));
        }
        {
            let state = state.clone();
            events
                .game_unpause
                .subscribe(move |_: &Option<Player>| update(&state, GameState::on_unpause));
        }
        {
            let state = state.clone();
            events.player_ball_kick.subscribe(move |player: &Player| {
                update(&state, |s| {
                    s.touch(player);
                });
            });
        }
        {
            let state = state.clone();
            let weak: Weak<Room> = Arc::downgrade(&room);
            events.game_tick.subscribe(move |_: &()| {
                if let Some(room) = weak.upgrade() {
                    check_touches(&room, &state);
                }
            });
        }
        {
            let state = state.clone();
            let goal_event = on_goal_scored.clone();
            events.team_goal.subscribe(move |team: &Team| {
                let mut goal = None;
                update(&state, |s| goal = Some(s.on_goal(*team)));
                if let Some(goal) = goal {
                    tracing::info!(
                        team = ?goal.team,
                        scorer = ?goal.last_touch_by.as_ref().map(|p| p.id),
                        "Goal scored"
                    );
                    goal_event.invoke(&goal);
                }
            });
        }
        {
            let state = state.clone();
            events
                .positions_reset
                .subscribe(move |_: &()| update(&state, GameState::on_positions_reset));
        }

        Self {
            room,
            state,
            on_goal_scored,
        }
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Raised on every team goal with the touchers snapshotted before kick-off
    pub fn on_goal_scored(&self) -> &TypedEvent<GoalScored> {
        &self.on_goal_scored
    }

    /// Copy of the derived state
    pub fn state(&self) -> GameState {
        lock(&self.state).clone()
    }

    pub fn is_game_in_progress(&self) -> bool {
        lock(&self.state).in_progress
    }

    pub fn is_game_paused(&self) -> Option<bool> {
        lock(&self.state).paused
    }

    pub fn last_touch_by(&self) -> Option<Player> {
        lock(&self.state).last_touch_by.clone()
    }

    pub fn penultimate_touch_by(&self) -> Option<Player> {
        lock(&self.state).penultimate_touch_by.clone()
    }

    pub fn goal_scored_before_positions_reset(&self) -> bool {
        lock(&self.state).goal_scored_before_positions_reset
    }

    /// Players in the room, the host left out unless asked for
    pub fn get_player_list(&self, include_host: bool) -> Vec<Player> {
        self.room
            .get_player_list()
            .into_iter()
            .filter(|p| include_host || !p.is_host())
            .collect()
    }

    /// Non-host players on any of `teams`
    pub fn get_players_in(&self, teams: &[Team]) -> Vec<Player> {
        self.get_player_list(false)
            .into_iter()
            .filter(|p| teams.contains(&p.team))
            .collect()
    }

    /// Move every red player to blue and every blue player to red
    pub fn swap_teams(&self) {
        match self.room.host() {
            Some(host) => swap_teams(host.as_ref()),
            None => tracing::warn!("Cannot swap teams before the room is initialized"),
        }
    }

    /// Stop and start again. Does nothing when no game is running.
    pub fn restart_game(&self) {
        if !self.is_game_in_progress() {
            return;
        }
        if let Some(host) = self.room.host() {
            host.stop_game();
            host.start_game();
        }
    }
}

/// Send every player on the field to the other team, the host included
pub fn swap_teams(host: &dyn HostRoom) {
    for player in host.get_player_list() {
        if player.team.is_playing() {
            host.set_player_team(player.id, player.team.opposite());
        }
    }
}

/// Proximity pass run on every tick
fn check_touches(room: &Room, state: &Mutex<GameState>) {
    let Some(host) = room.host() else {
        return;
    };
    let Some(ball) = host.get_ball_position() else {
        return;
    };
    let trigger = lock(state).trigger_distance;

    for raw in host.get_player_list() {
        if raw.id == HOST_PLAYER_ID || !raw.team.is_playing() {
            continue;
        }
        let Some(position) = raw.position else {
            continue;
        };
        if position.distance_to(&ball) <= trigger {
            let player = room.players().cast(&raw);
            update(state, |s| {
                s.touch(&player);
            });
        }
    }
}

impl Deref for UtilityRoom {
    type Target = Room;

    fn deref(&self) -> &Room {
        &self.room
    }
}

impl From<Room> for UtilityRoom {
    fn from(room: Room) -> Self {
        Self::new(room)
    }
}
