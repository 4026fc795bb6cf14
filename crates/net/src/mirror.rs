//! Local copy of host world state
//!
//! Host queries are synchronous but the host lives across a socket, so
//! queries are answered from the latest snapshot plus whatever the event
//! stream has told us since.

use std::sync::{Mutex, MutexGuard};

use haxroom_core::{DiscProperties, HostEvent, PlayerId, Position, RawPlayer, Scores};

use crate::protocol::WorldSnapshot;

#[derive(Debug, Default)]
pub struct HostMirror {
    world: Mutex<WorldSnapshot>,
}

impl HostMirror {
    pub fn new() -> Self {
        Self::default()
    }

    fn world(&self) -> MutexGuard<'_, WorldSnapshot> {
        match self.world.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Host mirror mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn apply_snapshot(&self, snapshot: WorldSnapshot) {
        *self.world() = snapshot;
    }

    /// Fold player and score changes carried by an event
    pub fn apply_event(&self, event: &HostEvent) {
        let mut world = self.world();
        match event {
            HostEvent::PlayerJoin { player }
            | HostEvent::PlayerAdminChange {
                changed_player: player,
                ..
            }
            | HostEvent::PlayerTeamChange {
                changed_player: player,
                ..
            } => upsert(&mut world.players, player),
            HostEvent::PlayerLeave { player } => {
                world.players.retain(|p| p.id != player.id);
                world.player_discs.retain(|d| d.player_id != player.id);
            }
            HostEvent::TeamVictory { scores } => world.scores = Some(*scores),
            HostEvent::GameStop { .. } => {
                world.scores = None;
                world.ball = None;
            }
            _ => {}
        }
    }

    pub fn player(&self, player_id: PlayerId) -> Option<RawPlayer> {
        self.world().players.iter().find(|p| p.id == player_id).cloned()
    }

    pub fn players(&self) -> Vec<RawPlayer> {
        self.world().players.clone()
    }

    pub fn scores(&self) -> Option<Scores> {
        self.world().scores
    }

    pub fn ball(&self) -> Option<Position> {
        self.world().ball
    }

    pub fn disc(&self, index: usize) -> Option<DiscProperties> {
        self.world().discs.get(index).copied()
    }

    pub fn disc_count(&self) -> usize {
        self.world().discs.len()
    }

    pub fn player_disc(&self, player_id: PlayerId) -> Option<DiscProperties> {
        self.world()
            .player_discs
            .iter()
            .find(|d| d.player_id == player_id)
            .map(|d| d.properties)
    }
}

fn upsert(players: &mut Vec<RawPlayer>, player: &RawPlayer) {
    match players.iter_mut().find(|p| p.id == player.id) {
        Some(existing) => *existing = player.clone(),
        None => players.push(player.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayerDisc;
    use haxroom_core::Team;

    fn raw(id: PlayerId, team: Team) -> RawPlayer {
        RawPlayer {
            id,
            name: format!("p{id}"),
            team,
            admin: false,
            position: None,
            conn: String::new(),
            auth: None,
        }
    }

    #[test]
    fn test_events_track_player_list() {
        let mirror = HostMirror::new();
        mirror.apply_event(&HostEvent::PlayerJoin {
            player: raw(1, Team::Spectators),
        });
        mirror.apply_event(&HostEvent::PlayerJoin {
            player: raw(2, Team::Spectators),
        });
        mirror.apply_event(&HostEvent::PlayerTeamChange {
            changed_player: raw(1, Team::Red),
            by_player: None,
        });
        mirror.apply_event(&HostEvent::PlayerLeave {
            player: raw(2, Team::Spectators),
        });

        let players = mirror.players();
        assert_eq!(players.len(), 1);
        assert_eq!(mirror.player(1).map(|p| p.team), Some(Team::Red));
        assert!(mirror.player(2).is_none());
    }

    #[test]
    fn test_snapshot_answers_disc_queries() {
        let mirror = HostMirror::new();
        mirror.apply_snapshot(WorldSnapshot {
            players: vec![raw(1, Team::Blue)],
            ball: Some(Position::new(3.0, 4.0)),
            discs: vec![DiscProperties {
                radius: Some(10.0),
                ..DiscProperties::default()
            }],
            player_discs: vec![PlayerDisc {
                player_id: 1,
                properties: DiscProperties {
                    radius: Some(15.0),
                    ..DiscProperties::default()
                },
            }],
            ..WorldSnapshot::default()
        });

        assert_eq!(mirror.disc_count(), 1);
        assert_eq!(mirror.disc(0).and_then(|d| d.radius), Some(10.0));
        assert!(mirror.disc(1).is_none());
        assert_eq!(mirror.player_disc(1).and_then(|d| d.radius), Some(15.0));
        assert_eq!(mirror.ball(), Some(Position::new(3.0, 4.0)));

        mirror.apply_event(&HostEvent::GameStop { by_player: None });
        assert!(mirror.ball().is_none());
    }
}
