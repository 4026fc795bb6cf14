//! Announcer - presence and goal announcements
//!
//! Greets players, says goodbye with how long they stayed, and calls out
//! who scored. Short neutral lines, picked at random from a few templates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use haxroom_core::{
    Announcement, AnnouncementStyle, GoalScored, HostRoom, Player, PlayerId, Room, Team, UtilityRoom,
};
use rand::seq::SliceRandom;

const RATE_LIMIT: Duration = Duration::from_secs(10);
const GOAL_COLOR: u32 = 0xFFD700;

#[derive(Debug, Default)]
struct Presence {
    joined_at: HashMap<PlayerId, Instant>,
    last_announced: HashMap<PlayerId, Instant>,
}

#[derive(Debug, Default)]
pub struct Announcer {
    presence: Mutex<Presence>,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    fn presence(&self) -> MutexGuard<'_, Presence> {
        match self.presence.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Announcer mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Subscribe to the room's join, leave and goal events
    pub fn attach(self: &Arc<Self>, room: &UtilityRoom) {
        let events = room.events();

        let (announcer, weak) = (self.clone(), Arc::downgrade(room.room()));
        events.player_join.subscribe(move |player: &Player| {
            if let Some(message) = announcer.on_join(player, Instant::now()) {
                with_host(&weak, |host| host.send_chat(&message, None));
            }
        });

        let (announcer, weak) = (self.clone(), Arc::downgrade(room.room()));
        events.player_leave.subscribe(move |player: &Player| {
            if let Some(message) = announcer.on_leave(player, Instant::now()) {
                with_host(&weak, |host| host.send_chat(&message, None));
            }
        });

        let weak = Arc::downgrade(room.room());
        room.on_goal_scored().subscribe(move |goal: &GoalScored| {
            let message = goal_message(goal);
            let style = Announcement::colored(GOAL_COLOR).with_style(AnnouncementStyle::Bold);
            with_host(&weak, |host| host.send_announcement(&message, None, &style));
        });
    }

    fn should_announce(presence: &mut Presence, player_id: PlayerId, now: Instant) -> bool {
        if let Some(last) = presence.last_announced.get(&player_id) {
            if now.duration_since(*last) < RATE_LIMIT {
                return false;
            }
        }
        presence
            .last_announced
            .retain(|_, last| now.duration_since(*last) < RATE_LIMIT);
        presence.last_announced.insert(player_id, now);
        true
    }

    fn on_join(&self, player: &Player, now: Instant) -> Option<String> {
        let mut presence = self.presence();
        presence.joined_at.insert(player.id, now);
        Self::should_announce(&mut presence, player.id, now).then(|| join_message(&player.name))
    }

    fn on_leave(&self, player: &Player, now: Instant) -> Option<String> {
        let mut presence = self.presence();
        let stayed = presence
            .joined_at
            .remove(&player.id)
            .map(|joined| now.duration_since(joined));
        Self::should_announce(&mut presence, player.id, now)
            .then(|| leave_message(&player.name, stayed))
    }
}

fn with_host(room: &Weak<Room>, f: impl FnOnce(&dyn HostRoom)) {
    if let Some(host) = room.upgrade().and_then(|room| room.host().cloned()) {
        f(host.as_ref());
    }
}

fn pick(templates: Vec<String>) -> String {
    let mut rng = rand::thread_rng();
    templates.choose(&mut rng).cloned().unwrap_or_default()
}

fn join_message(name: &str) -> String {
    pick(vec![
        format!("{name} joined."),
        format!("{name} is here."),
        format!("Welcome, {name}."),
    ])
}

fn leave_message(name: &str, stayed: Option<Duration>) -> String {
    match stayed {
        Some(duration) => pick(vec![
            format!("{name} left after {}.", format_duration(duration)),
            format!("{name} signed off. Played {}.", format_duration(duration)),
        ]),
        None => pick(vec![format!("{name} left."), format!("{name} stepped out.")]),
    }
}

fn team_name(team: Team) -> &'static str {
    match team {
        Team::Red => "Red",
        Team::Blue => "Blue",
        Team::Spectators => "Spectators",
    }
}

/// Describe a goal from the touchers captured when it went in
fn goal_message(goal: &GoalScored) -> String {
    let team = team_name(goal.team);
    let Some(scorer) = &goal.last_touch_by else {
        return format!("Goal for {team}!");
    };

    if scorer.team != goal.team {
        return format!("Own goal by {}! Point to {team}.", scorer.name);
    }

    match &goal.penultimate_touch_by {
        Some(assist) if assist.team == goal.team && assist.id != scorer.id => {
            format!("Goal for {team}! {} scores, assisted by {}.", scorer.name, assist.name)
        }
        _ => format!("Goal for {team}! {} scores.", scorer.name),
    }
}

/// Human-readable duration, never showing seconds
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        return "less than a minute".to_string();
    }

    let minutes = secs / 60;
    let hours = secs / 3600;
    if hours >= 1 {
        let remaining = minutes % 60;
        let hours_str = if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{hours} hours")
        };
        match remaining {
            0 => hours_str,
            1 => format!("{hours_str} 1 minute"),
            n => format!("{hours_str} {n} minutes"),
        }
    } else if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haxroom_core::testing::{player, raw_player, HostCall, MockHostFactory};
    use haxroom_core::HostEvent;

    fn on_team(id: PlayerId, name: &str, team: Team) -> Player {
        Player {
            team,
            ..player(id, name)
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(59)), "less than a minute");
        assert_eq!(format_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(format_duration(Duration::from_secs(3599)), "59 minutes");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1 hour");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1 hour 1 minute");
        assert_eq!(format_duration(Duration::from_secs(9000)), "2 hours 30 minutes");
    }

    #[test]
    fn test_goal_messages() {
        let amy = on_team(1, "amy", Team::Red);
        let bo = on_team(2, "bo", Team::Red);
        let cy = on_team(3, "cy", Team::Blue);

        let goal = |last: Option<&Player>, penultimate: Option<&Player>| GoalScored {
            team: Team::Red,
            last_touch_by: last.cloned(),
            penultimate_touch_by: penultimate.cloned(),
        };

        assert_eq!(goal_message(&goal(None, None)), "Goal for Red!");
        assert_eq!(
            goal_message(&goal(Some(&amy), Some(&bo))),
            "Goal for Red! amy scores, assisted by bo."
        );
        assert_eq!(
            goal_message(&goal(Some(&amy), Some(&cy))),
            "Goal for Red! amy scores."
        );
        assert_eq!(
            goal_message(&goal(Some(&cy), Some(&amy))),
            "Own goal by cy! Point to Red."
        );
    }

    #[test]
    fn test_rejoin_is_rate_limited() {
        let announcer = Announcer::new();
        let amy = player(1, "amy");
        let start = Instant::now();

        assert!(announcer.on_join(&amy, start).is_some());
        let leave = announcer.on_leave(&amy, start + Duration::from_secs(120));
        assert!(leave.unwrap().contains("2 minutes"));

        assert!(announcer.on_join(&amy, start + Duration::from_secs(125)).is_none());
        assert!(announcer.on_join(&amy, start + Duration::from_secs(131)).is_some());
    }

    #[test]
    fn test_stale_rate_limits_are_pruned() {
        let announcer = Announcer::new();
        let start = Instant::now();

        for id in 1..=5 {
            assert!(announcer.on_join(&player(id, "p"), start).is_some());
        }
        assert_eq!(announcer.presence().last_announced.len(), 5);

        assert!(announcer
            .on_join(&player(6, "late"), start + Duration::from_secs(11))
            .is_some());
        let presence = announcer.presence();
        assert_eq!(presence.last_announced.len(), 1);
        assert!(presence.last_announced.contains_key(&6));
    }

    #[test]
    fn test_attached_announcer_speaks_through_host() {
        let room = UtilityRoom::new(Room::builder().build().unwrap());
        let factory = MockHostFactory::new();
        room.initialize_room(&factory).unwrap();
        Arc::new(Announcer::new()).attach(&room);

        room.dispatch(HostEvent::PlayerJoin {
            player: raw_player(5, "eve"),
        })
        .unwrap();
        room.dispatch(HostEvent::TeamGoal { team: Team::Blue }).unwrap();

        let calls = factory.host.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], HostCall::SendChat { message, target: None } if message.contains("eve")));
        assert_eq!(
            calls[1],
            HostCall::SendAnnouncement {
                message: "Goal for Blue!".to_string(),
                target: None
            }
        );
    }
}
