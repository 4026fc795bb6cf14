//! Room - the façade over one host room handle
//!
//! The room acquires the host handle once, turns every host callback into a
//! typed event carrying cast players, and drives the interceptor chain for
//! each chat line.

mod events;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

pub use events::{KickRateLimit, PlayerChange, PlayerKick, RoomEvents, StadiumChange};

use crate::command::{Command, CommandResolver, DeclaredCommand, PrefixCommandResolver};
use crate::config::{AppConfig, RoomConfig};
use crate::error::{Error, Result};
use crate::host::{HostEvent, HostFactory, HostRoom};
use crate::interceptor::{CommandSettingInterceptor, InterceptorChain, MessageInterceptor};
use crate::models::{ChatMessage, Player, PlayerId, RawPlayer};
use crate::players::{PlayerService, RolePlayerService};
use crate::registry::{CommandCatalog, CommandRegistry};

/// Replacement for the default chat processing. Returns whether to relay the line.
pub type ChatHandler = Arc<dyn Fn(&Player, &str) -> Result<bool> + Send + Sync>;

type ResolverFactory = Box<dyn FnOnce(CommandCatalog) -> Arc<dyn CommandResolver>>;

/// Room handle
pub struct Room {
    config: RoomConfig,
    host: OnceLock<Arc<dyn HostRoom>>,
    events: RoomEvents,
    players: Arc<dyn PlayerService>,
    resolver: Arc<dyn CommandResolver>,
    chain: InterceptorChain,
    chat_handler: Mutex<Option<ChatHandler>>,
}

impl Room {
    pub fn builder() -> RoomBuilder {
        RoomBuilder::new()
    }

    /// Acquire the host room handle.
    ///
    /// Only the first call creates a room; later calls return None.
    pub fn initialize_room(&self, factory: &dyn HostFactory) -> Option<Arc<dyn HostRoom>> {
        let mut created = false;
        let host = self.host.get_or_init(|| {
            created = true;
            factory.create_room(&self.config)
        });

        if created {
            tracing::info!(room_name = %self.config.room_name, "Room initialized");
            Some(host.clone())
        } else {
            tracing::warn!("Room already initialized, ignoring");
            None
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.host.get().is_some()
    }

    /// Host handle, once initialized
    pub fn host(&self) -> Option<&Arc<dyn HostRoom>> {
        self.host.get()
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn events(&self) -> &RoomEvents {
        &self.events
    }

    pub fn players(&self) -> &Arc<dyn PlayerService> {
        &self.players
    }

    pub fn command_resolver(&self) -> &Arc<dyn CommandResolver> {
        &self.resolver
    }

    /// Every player in the room, cast, the host included
    pub fn get_player_list(&self) -> Vec<Player> {
        self.host()
            .map(|host| {
                host.get_player_list()
                    .iter()
                    .map(|raw| self.players.cast(raw))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_player(&self, player_id: PlayerId) -> Option<Player> {
        let raw = self.host()?.get_player(player_id)?;
        Some(self.players.cast(&raw))
    }

    /// Replace chat processing entirely. The interceptor chain no longer runs.
    pub fn set_chat_handler(&self, handler: ChatHandler) {
        *self.chat_slot() = Some(handler);
    }

    /// Go back to the interceptor chain
    pub fn reset_chat_handler(&self) {
        *self.chat_slot() = None;
    }

    fn chat_slot(&self) -> MutexGuard<'_, Option<ChatHandler>> {
        match self.chat_handler.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Chat handler mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn cast(&self, raw: &RawPlayer) -> Player {
        self.players.cast(raw)
    }

    fn cast_opt(&self, raw: &Option<RawPlayer>) -> Option<Player> {
        raw.as_ref().map(|r| self.cast(r))
    }

    /// Deliver one host callback.
    ///
    /// Returns the relay decision for chat events and None for everything
    /// else. Errors and panics raised by handlers propagate to the caller.
    pub fn dispatch(&self, event: HostEvent) -> Result<Option<bool>> {
        tracing::trace!(callback = event.callback_name(), "Host event");
        match event {
            HostEvent::PlayerChat { player, message } => {
                return self.handle_chat(&player, &message).map(Some);
            }
            HostEvent::PlayerJoin { player } => {
                self.events.player_join.invoke(&self.cast(&player));
            }
            HostEvent::PlayerLeave { player } => {
                self.events.player_leave.invoke(&self.cast(&player));
                self.players.forget(player.id);
            }
            HostEvent::TeamVictory { scores } => {
                self.events.team_victory.invoke(&scores);
            }
            HostEvent::PlayerBallKick { player } => {
                self.events.player_ball_kick.invoke(&self.cast(&player));
            }
            HostEvent::TeamGoal { team } => {
                self.events.team_goal.invoke(&team);
            }
            HostEvent::GameStart { by_player } => {
                self.events.game_start.invoke(&self.cast_opt(&by_player));
            }
            HostEvent::GameStop { by_player } => {
                self.events.game_stop.invoke(&self.cast_opt(&by_player));
            }
            HostEvent::PlayerAdminChange {
                changed_player,
                by_player,
            } => {
                self.events.player_admin_change.invoke(&PlayerChange {
                    player: self.cast(&changed_player),
                    by: self.cast_opt(&by_player),
                });
            }
            HostEvent::PlayerTeamChange {
                changed_player,
                by_player,
            } => {
                self.events.player_team_change.invoke(&PlayerChange {
                    player: self.cast(&changed_player),
                    by: self.cast_opt(&by_player),
                });
            }
            HostEvent::PlayerKicked {
                kicked_player,
                reason,
                ban,
                by_player,
            } => {
                self.events.player_kicked.invoke(&PlayerKick {
                    player: self.cast(&kicked_player),
                    reason,
                    ban,
                    by: self.cast_opt(&by_player),
                });
            }
            HostEvent::GameTick => {
                self.events.game_tick.invoke(&());
            }
            HostEvent::GamePause { by_player } => {
                self.events.game_pause.invoke(&self.cast_opt(&by_player));
            }
            HostEvent::GameUnpause { by_player } => {
                self.events.game_unpause.invoke(&self.cast_opt(&by_player));
            }
            HostEvent::PositionsReset => {
                self.events.positions_reset.invoke(&());
            }
            HostEvent::PlayerActivity { player } => {
                self.events.player_activity.invoke(&self.cast(&player));
            }
            HostEvent::StadiumChange {
                new_stadium_name,
                by_player,
            } => {
                self.events.stadium_change.invoke(&StadiumChange {
                    stadium_name: new_stadium_name,
                    by: self.cast_opt(&by_player),
                });
            }
            HostEvent::RoomLink { url } => {
                tracing::info!(url = %url, "Room link available");
                self.events.room_link.invoke(&url);
            }
            HostEvent::KickRateLimitSet {
                min,
                rate,
                burst,
                by_player,
            } => {
                self.events.kick_rate_limit_set.invoke(&KickRateLimit {
                    min,
                    rate,
                    burst,
                    by: self.cast_opt(&by_player),
                });
            }
        }
        Ok(None)
    }

    /// Handle one chat line and return whether the host should relay it
    pub fn handle_chat(&self, raw: &RawPlayer, text: &str) -> Result<bool> {
        let player = self.cast(raw);
        let custom = self.chat_slot().clone();
        if let Some(handler) = custom {
            return handler(&player, text);
        }

        let mut message = ChatMessage::new(player, text);
        self.process_message(&mut message)
    }

    /// Run the interceptor chain over an already built message
    pub fn process_message(&self, message: &mut ChatMessage) -> Result<bool> {
        let host = self.host().ok_or(Error::RoomNotInitialized)?;
        self.chain.run(message, host.as_ref())
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("room_name", &self.config.room_name)
            .field("initialized", &self.is_initialized())
            .field("interceptors", &self.chain.len())
            .finish_non_exhaustive()
    }
}

/// Collects everything a room needs and validates it once
pub struct RoomBuilder {
    config: RoomConfig,
    prefix: String,
    case_sensitive: bool,
    registry: CommandRegistry,
    interceptors: Vec<Arc<dyn MessageInterceptor>>,
    players: Option<Arc<dyn PlayerService>>,
    resolver: Option<ResolverFactory>,
}

impl Default for RoomBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomBuilder {
    pub fn new() -> Self {
        Self {
            config: RoomConfig::default(),
            prefix: "!".to_string(),
            case_sensitive: false,
            registry: CommandRegistry::new(),
            interceptors: Vec::new(),
            players: None,
            resolver: None,
        }
    }

    /// Start from a loaded configuration file
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .room_config(config.room.clone())
            .prefix(config.commands.prefix.clone())
            .case_sensitive(config.commands.case_sensitive)
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config = config;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Register a self-describing command
    pub fn command<C: DeclaredCommand>(mut self) -> Self {
        self.registry.register::<C>();
        self
    }

    /// Register a command under explicit names
    pub fn command_with<C, F>(mut self, names: &[&str], factory: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.registry.register_with(names, factory);
        self
    }

    /// Append an interceptor. They run in the order added, after command resolution.
    pub fn interceptor(mut self, interceptor: impl MessageInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn player_service(mut self, service: Arc<dyn PlayerService>) -> Self {
        self.players = Some(service);
        self
    }

    /// Use a custom command resolver built from the validated catalog
    pub fn command_resolver<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(CommandCatalog) -> Arc<dyn CommandResolver> + 'static,
    {
        self.resolver = Some(Box::new(factory));
        self
    }

    /// Validate commands and assemble the room.
    ///
    /// Configuration errors surface here, before any event is handled.
    pub fn build(self) -> Result<Room> {
        let catalog = self
            .registry
            .build(&self.prefix, self.case_sensitive)
            .inspect_err(|e| tracing::error!(error = %e, "Invalid command configuration"))?;

        tracing::info!(
            prefix = %catalog.options().prefix(),
            commands = catalog.options().names().len(),
            interceptors = self.interceptors.len(),
            "Building room"
        );

        let resolver: Arc<dyn CommandResolver> = match self.resolver {
            Some(factory) => factory(catalog),
            None => Arc::new(PrefixCommandResolver::new(catalog)),
        };

        let mut interceptors: Vec<Arc<dyn MessageInterceptor>> =
            Vec::with_capacity(self.interceptors.len() + 1);
        interceptors.push(Arc::new(CommandSettingInterceptor::new(resolver.clone())));
        interceptors.extend(self.interceptors);

        Ok(Room {
            config: self.config,
            host: OnceLock::new(),
            events: RoomEvents::default(),
            players: self
                .players
                .unwrap_or_else(|| Arc::new(RolePlayerService::new())),
            resolver,
            chain: InterceptorChain::new(interceptors),
            chat_handler: Mutex::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::{CommandExecutionInterceptor, DeniedCommand};
    use crate::models::{Role, Scores, Team};
    use crate::testing::{raw_player, HostCall, MockHostFactory};

    const ADMIN: Role = Role::new(1, "admin");
    const SUPER_ADMIN: Role = Role::new(2, "super-admin");

    struct GiveAdmin;

    impl Command for GiveAdmin {
        fn required_roles(&self) -> &[Role] {
            &[ADMIN, SUPER_ADMIN]
        }

        fn execute(&self, host: &dyn HostRoom, sender: &Player, _params: &[String]) -> Result<()> {
            host.set_player_admin(sender.id, true);
            Ok(())
        }
    }

    struct Info;

    impl Command for Info {
        fn execute(&self, host: &dyn HostRoom, sender: &Player, _: &[String]) -> Result<()> {
            host.send_chat("info", Some(sender.id));
            Ok(())
        }
    }

    impl DeclaredCommand for Info {
        const NAMES: &'static [&'static str] = &["info"];

        fn create() -> Self {
            Info
        }
    }

    struct Broken;

    impl Command for Broken {
        fn execute(&self, _: &dyn HostRoom, _: &Player, _: &[String]) -> Result<()> {
            Err(Error::Command("broken".to_string()))
        }
    }

    fn admin_room(service: Arc<RolePlayerService>) -> (Room, MockHostFactory) {
        let room = Room::builder()
            .prefix("!")
            .player_service(service)
            .command_with(&["admin"], || GiveAdmin)
            .interceptor(
                CommandExecutionInterceptor::new()
                    .on_denied(DeniedCommand::Swallow { notify: false }),
            )
            .build()
            .unwrap();
        let factory = MockHostFactory::new();
        room.initialize_room(&factory).unwrap();
        (room, factory)
    }

    #[test]
    fn test_initialize_only_once() {
        let room = Room::builder().build().unwrap();
        let factory = MockHostFactory::new();

        assert!(!room.is_initialized());
        assert!(room.initialize_room(&factory).is_some());
        assert!(room.initialize_room(&factory).is_none());
        assert_eq!(factory.created(), 1);
        assert!(room.is_initialized());
    }

    #[test]
    fn test_duplicate_name_fails_at_build() {
        struct Other;
        impl Command for Other {
            fn execute(&self, _: &dyn HostRoom, _: &Player, _: &[String]) -> Result<()> {
                Ok(())
            }
        }

        let result = Room::builder()
            .command::<Info>()
            .command_with(&["info"], || Other)
            .build();

        match result {
            Err(e) => assert!(e.is_configuration()),
            Ok(_) => panic!("duplicate name accepted"),
        }
    }

    #[test]
    fn test_chat_before_initialize_fails() {
        let room = Room::builder().build().unwrap();
        let result = room.handle_chat(&raw_player(1, "p"), "hello");
        assert!(matches!(result, Err(Error::RoomNotInitialized)));
    }

    #[test]
    fn test_admin_command_denied_without_role() {
        let service = Arc::new(RolePlayerService::new());
        let (room, factory) = admin_room(service);

        let relay = room
            .dispatch(HostEvent::PlayerChat {
                player: raw_player(4, "guest"),
                message: "!admin password".to_string(),
            })
            .unwrap();

        assert_eq!(relay, Some(false));
        assert!(factory.host.calls().is_empty());
    }

    #[test]
    fn test_admin_command_granted_with_role() {
        let service = Arc::new(RolePlayerService::new());
        service.grant_role(4, SUPER_ADMIN);
        let (room, factory) = admin_room(service);

        let relay = room
            .dispatch(HostEvent::PlayerChat {
                player: raw_player(4, "boss"),
                message: "!admin password".to_string(),
            })
            .unwrap();

        assert_eq!(relay, Some(false));
        assert_eq!(
            factory.host.calls(),
            vec![HostCall::SetPlayerAdmin {
                player_id: 4,
                admin: true
            }]
        );
    }

    #[test]
    fn test_plain_chat_is_relayed() {
        let (room, _factory) = admin_room(Arc::new(RolePlayerService::new()));
        let relay = room.handle_chat(&raw_player(4, "p"), "gg").unwrap();
        assert!(relay);
    }

    #[test]
    fn test_command_error_propagates() {
        let room = Room::builder()
            .command_with(&["broken"], || Broken)
            .interceptor(CommandExecutionInterceptor::new())
            .build()
            .unwrap();
        room.initialize_room(&MockHostFactory::new());

        let result = room.handle_chat(&raw_player(1, "p"), "!broken");
        assert!(matches!(result, Err(Error::Command(_))));
    }

    #[test]
    fn test_custom_chat_handler_bypasses_chain() {
        let room = Room::builder()
            .command::<Info>()
            .interceptor(CommandExecutionInterceptor::new())
            .build()
            .unwrap();
        let factory = MockHostFactory::new();
        room.initialize_room(&factory);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        room.set_chat_handler(Arc::new(move |player: &Player, text: &str| {
            sink.lock().unwrap().push((player.id, text.to_string()));
            Ok(false)
        }));

        assert!(!room.handle_chat(&raw_player(2, "p"), "!info").unwrap());
        assert!(factory.host.calls().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![(2, "!info".to_string())]);

        room.reset_chat_handler();
        assert!(!room.handle_chat(&raw_player(2, "p"), "!info").unwrap());
        assert_eq!(factory.host.calls().len(), 1);
    }

    #[test]
    fn test_join_event_carries_cast_player() {
        let service = Arc::new(RolePlayerService::new());
        service.grant_role(7, ADMIN);
        let room = Room::builder().player_service(service).build().unwrap();

        let joined = Arc::new(Mutex::new(Vec::new()));
        let sink = joined.clone();
        room.events()
            .player_join
            .subscribe(move |p: &Player| sink.lock().unwrap().push(p.clone()));

        let outcome = room
            .dispatch(HostEvent::PlayerJoin {
                player: raw_player(7, "amy"),
            })
            .unwrap();

        assert_eq!(outcome, None);
        let joined = joined.lock().unwrap();
        assert_eq!(joined.len(), 1);
        assert!(joined[0].has_role(ADMIN));
    }

    #[test]
    fn test_leave_drops_side_table_after_event() {
        let service = Arc::new(RolePlayerService::new());
        service.grant_role(7, ADMIN);
        let room = Room::builder()
            .player_service(service.clone())
            .build()
            .unwrap();

        let had_role = Arc::new(Mutex::new(None));
        let sink = had_role.clone();
        room.events()
            .player_leave
            .subscribe(move |p: &Player| *sink.lock().unwrap() = Some(p.has_role(ADMIN)));

        room.dispatch(HostEvent::PlayerLeave {
            player: raw_player(7, "amy"),
        })
        .unwrap();

        assert_eq!(*had_role.lock().unwrap(), Some(true));
        assert!(service.roles_of(7).is_empty());
    }

    #[test]
    fn test_argument_shapes_are_translated() {
        let room = Room::builder().build().unwrap();
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let sink = log.clone();
        room.events().player_kicked.subscribe(move |k: &PlayerKick| {
            sink.lock().unwrap().push(format!(
                "kick {} {} {} {:?}",
                k.player.id,
                k.reason,
                k.ban,
                k.by.as_ref().map(|p| p.id)
            ))
        });
        let sink = log.clone();
        room.events()
            .game_tick
            .subscribe(move |_: &()| sink.lock().unwrap().push("tick".to_string()));
        let sink = log.clone();
        room.events()
            .team_victory
            .subscribe(move |s: &Scores| sink.lock().unwrap().push(format!("win {}-{}", s.red, s.blue)));
        let sink = log.clone();
        room.events()
            .team_goal
            .subscribe(move |t: &Team| sink.lock().unwrap().push(format!("goal {:?}", t)));

        let events = vec![
            HostEvent::PlayerKicked {
                kicked_player: raw_player(3, "troll"),
                reason: "spam".to_string(),
                ban: true,
                by_player: Some(raw_player(1, "mod")),
            },
            HostEvent::GameTick,
            HostEvent::TeamGoal { team: Team::Blue },
            HostEvent::TeamVictory {
                scores: Scores {
                    red: 1,
                    blue: 3,
                    ..Scores::default()
                },
            },
        ];
        for event in events {
            room.dispatch(event).unwrap();
        }

        assert_eq!(
            *log.lock().unwrap(),
            vec!["kick 3 spam true Some(1)", "tick", "goal Blue", "win 1-3"]
        );
    }

    fn tag(p: &Player) -> String {
        let marker = if p.roles.is_empty() { "" } else { "+" };
        format!("{}{}", p.id, marker)
    }

    fn tag_by(by: &Option<Player>) -> String {
        by.as_ref().map(tag).unwrap_or_else(|| "-".to_string())
    }

    #[test]
    fn test_every_callback_fires_its_own_event_with_cast_players() {
        let service = Arc::new(RolePlayerService::new());
        service.grant_role(7, ADMIN);
        service.grant_role(9, SUPER_ADMIN);
        let room = Room::builder()
            .player_service(service.clone())
            .build()
            .unwrap();
        let factory = MockHostFactory::new();
        room.initialize_room(&factory);

        let log: Arc<Mutex<Vec<String>>> = Arc::default();

        macro_rules! record {
            ($field:ident, |$arg:ident: $ty:ty| $body:expr) => {{
                let sink = log.clone();
                room.events().$field.subscribe(move |$arg: &$ty| {
                    sink.lock()
                        .unwrap()
                        .push(format!("{}({})", stringify!($field), $body));
                });
            }};
        }

        record!(player_join, |p: Player| tag(p));
        record!(player_leave, |p: Player| tag(p));
        record!(team_victory, |s: Scores| format!("{}-{}", s.red, s.blue));
        record!(player_ball_kick, |p: Player| tag(p));
        record!(team_goal, |t: Team| format!("{:?}", t));
        record!(game_start, |by: Option<Player>| tag_by(by));
        record!(game_stop, |by: Option<Player>| tag_by(by));
        record!(player_admin_change, |c: PlayerChange| format!(
            "{} by {}",
            tag(&c.player),
            tag_by(&c.by)
        ));
        record!(player_team_change, |c: PlayerChange| format!(
            "{} by {}",
            tag(&c.player),
            tag_by(&c.by)
        ));
        record!(player_kicked, |k: PlayerKick| format!(
            "{} {} {} by {}",
            tag(&k.player),
            k.reason,
            k.ban,
            tag_by(&k.by)
        ));
        record!(game_tick, |_t: ()| "");
        record!(game_pause, |by: Option<Player>| tag_by(by));
        record!(game_unpause, |by: Option<Player>| tag_by(by));
        record!(positions_reset, |_r: ()| "");
        record!(player_activity, |p: Player| tag(p));
        record!(stadium_change, |c: StadiumChange| format!(
            "{} by {}",
            c.stadium_name,
            tag_by(&c.by)
        ));
        record!(room_link, |url: String| url);
        record!(kick_rate_limit_set, |k: KickRateLimit| format!(
            "{}/{}/{} by {}",
            k.min,
            k.rate,
            k.burst,
            tag_by(&k.by)
        ));

        let cases = vec![
            (
                HostEvent::PlayerJoin {
                    player: raw_player(7, "amy"),
                },
                "player_join(7+)",
            ),
            (
                HostEvent::TeamVictory {
                    scores: Scores {
                        red: 2,
                        blue: 1,
                        ..Scores::default()
                    },
                },
                "team_victory(2-1)",
            ),
            (
                HostEvent::PlayerBallKick {
                    player: raw_player(7, "amy"),
                },
                "player_ball_kick(7+)",
            ),
            (HostEvent::TeamGoal { team: Team::Red }, "team_goal(Red)"),
            (
                HostEvent::GameStart {
                    by_player: Some(raw_player(9, "boss")),
                },
                "game_start(9+)",
            ),
            (HostEvent::GameStop { by_player: None }, "game_stop(-)"),
            (
                HostEvent::PlayerAdminChange {
                    changed_player: raw_player(3, "bo"),
                    by_player: Some(raw_player(9, "boss")),
                },
                "player_admin_change(3 by 9+)",
            ),
            (
                HostEvent::PlayerTeamChange {
                    changed_player: raw_player(7, "amy"),
                    by_player: None,
                },
                "player_team_change(7+ by -)",
            ),
            (
                HostEvent::PlayerKicked {
                    kicked_player: raw_player(3, "bo"),
                    reason: "afk".to_string(),
                    ban: false,
                    by_player: Some(raw_player(7, "amy")),
                },
                "player_kicked(3 afk false by 7+)",
            ),
            (HostEvent::GameTick, "game_tick()"),
            (
                HostEvent::GamePause {
                    by_player: Some(raw_player(9, "boss")),
                },
                "game_pause(9+)",
            ),
            (
                HostEvent::GameUnpause {
                    by_player: Some(raw_player(3, "bo")),
                },
                "game_unpause(3)",
            ),
            (HostEvent::PositionsReset, "positions_reset()"),
            (
                HostEvent::PlayerActivity {
                    player: raw_player(7, "amy"),
                },
                "player_activity(7+)",
            ),
            (
                HostEvent::StadiumChange {
                    new_stadium_name: "Big".to_string(),
                    by_player: Some(raw_player(9, "boss")),
                },
                "stadium_change(Big by 9+)",
            ),
            (
                HostEvent::RoomLink {
                    url: "https://host.test/play?c=abc".to_string(),
                },
                "room_link(https://host.test/play?c=abc)",
            ),
            (
                HostEvent::KickRateLimitSet {
                    min: 2,
                    rate: 0,
                    burst: 5,
                    by_player: None,
                },
                "kick_rate_limit_set(2/0/5 by -)",
            ),
            (
                HostEvent::PlayerLeave {
                    player: raw_player(7, "amy"),
                },
                "player_leave(7+)",
            ),
        ];
        assert_eq!(cases.len(), 18);

        for (event, expected) in cases {
            let callback = event.callback_name();
            assert_eq!(room.dispatch(event).unwrap(), None, "{callback}");
            let fired = std::mem::take(&mut *log.lock().unwrap());
            assert_eq!(fired, vec![expected.to_string()], "{callback}");
        }
        assert!(service.roles_of(7).is_empty());
        assert_eq!(service.roles_of(9), vec![SUPER_ADMIN]);

        let relay = room
            .dispatch(HostEvent::PlayerChat {
                player: raw_player(9, "boss"),
                message: "hello".to_string(),
            })
            .unwrap();
        assert_eq!(relay, Some(true));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_interceptors_run_after_command_resolution() {
        struct SeesCommand(Arc<Mutex<Option<bool>>>);

        impl MessageInterceptor for SeesCommand {
            fn intercept(&self, message: &mut ChatMessage, _: &dyn HostRoom) -> Result<bool> {
                *self.0.lock().unwrap() = Some(message.is_command());
                Ok(true)
            }
        }

        let seen = Arc::new(Mutex::new(None));
        let room = Room::builder()
            .command::<Info>()
            .interceptor(SeesCommand(seen.clone()))
            .build()
            .unwrap();
        room.initialize_room(&MockHostFactory::new());

        assert!(room.handle_chat(&raw_player(1, "p"), "!INFO please").unwrap());
        assert_eq!(*seen.lock().unwrap(), Some(true));
    }
}
