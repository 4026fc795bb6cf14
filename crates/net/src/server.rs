//! Bridge server: accepts the host shim and pumps its events into a room
//!
//! The shim connects over TCP, receives the room configuration, then streams
//! host callbacks and world snapshots. Each callback is dispatched into the
//! room before the next frame is read, so host ordering is preserved.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, WriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use haxroom_core::{HostEvent, Room};

use crate::bridge::BridgeHostFactory;
use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::mirror::HostMirror;
use crate::protocol::BridgeMessage;

/// Outbound messages buffered per connection
const OUTBOUND_CAPACITY: usize = 256;

/// Listening socket for host shim connections
pub struct BridgeServer {
    listener: TcpListener,
}

impl BridgeServer {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Bridge listening");
        Ok(Self { listener })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Wait for the next shim connection
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, addr) = self.listener.accept().await?;
        stream.set_nodelay(true)?;
        info!(addr = %addr, "Host shim connected");
        Ok((stream, addr))
    }
}

/// Initialize `room` over this connection and serve it until the shim leaves.
///
/// A room can be initialized once, so a second connection for the same room
/// is refused with [`Error::RoomAlreadyInitialized`].
pub async fn serve_connection<S>(stream: S, room: Arc<Room>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
    let mirror = Arc::new(HostMirror::new());

    let factory = BridgeHostFactory::new(tx.clone(), mirror.clone());
    if room.initialize_room(&factory).is_none() {
        return Err(Error::RoomAlreadyInitialized);
    }

    let writer_handle = tokio::spawn(writer_task(writer, rx));

    let result = loop {
        match read_frame(&mut reader).await {
            Ok(msg) => handle_message(msg, &room, &mirror, &tx).await,
            Err(Error::ConnectionClosed) => {
                debug!("Shim closed the connection");
                break Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Read error");
                break Err(e);
            }
        }
    };

    // The room keeps a sender alive through its host handle
    writer_handle.abort();
    info!("Host shim disconnected");
    result
}

/// Writer task - sends queued messages to the shim
async fn writer_task<S: AsyncWrite>(mut writer: WriteHalf<S>, mut rx: mpsc::Receiver<BridgeMessage>) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = write_frame(&mut writer, &msg).await {
            debug!(error = %e, "Write failed");
            break;
        }
    }
}

async fn handle_message(
    msg: BridgeMessage,
    room: &Room,
    mirror: &HostMirror,
    tx: &mpsc::Sender<BridgeMessage>,
) {
    match msg {
        BridgeMessage::Event(event) => {
            mirror.apply_event(&event);
            if let Some(reply) = dispatch(room, event) {
                reply_to_shim(tx, reply).await;
            }
        }
        BridgeMessage::Snapshot(snapshot) => {
            mirror.apply_snapshot(snapshot);
        }
        BridgeMessage::Ping => {
            reply_to_shim(tx, BridgeMessage::Pong).await;
        }
        BridgeMessage::Pong => {}
        other => {
            debug!(message = ?other, "Ignoring unexpected message type");
        }
    }
}

/// Run one host callback through the room and build the answer, if any
fn dispatch(room: &Room, event: HostEvent) -> Option<BridgeMessage> {
    let callback = event.callback_name();
    let chatter = match &event {
        HostEvent::PlayerChat { player, .. } => Some(player.id),
        _ => None,
    };

    match room.dispatch(event) {
        Ok(Some(broadcast)) => chatter.map(|player_id| BridgeMessage::ChatDecision {
            player_id,
            broadcast,
        }),
        Ok(None) => None,
        Err(e) => {
            error!(callback, error = %e, "Host callback failed");
            Some(BridgeMessage::Failure {
                callback: callback.to_string(),
                message: e.to_string(),
            })
        }
    }
}

async fn reply_to_shim(tx: &mpsc::Sender<BridgeMessage>, msg: BridgeMessage) {
    if tx.send(msg).await.is_err() {
        debug!("Writer gone, dropping reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HostCommand, WorldSnapshot};
    use haxroom_core::{
        Command, CommandExecutionInterceptor, HostRoom, Player, PlayerId, RawPlayer, Team,
    };
    use tokio::io::DuplexStream;

    struct Ready;

    impl Command for Ready {
        fn execute(&self, host: &dyn HostRoom, sender: &Player, _: &[String]) -> haxroom_core::Result<()> {
            let count = host.get_player_list().len();
            host.send_chat(&format!("{count} players"), Some(sender.id));
            Ok(())
        }
    }

    struct Explode;

    impl Command for Explode {
        fn execute(&self, _: &dyn HostRoom, _: &Player, _: &[String]) -> haxroom_core::Result<()> {
            Err(haxroom_core::Error::Command("boom".to_string()))
        }
    }

    fn raw(id: PlayerId) -> RawPlayer {
        RawPlayer {
            id,
            name: format!("p{id}"),
            team: Team::Red,
            admin: false,
            position: None,
            conn: String::new(),
            auth: None,
        }
    }

    fn room() -> Arc<Room> {
        let room = Room::builder()
            .command_with(&["ready"], || Ready)
            .command_with(&["explode"], || Explode)
            .interceptor(CommandExecutionInterceptor::new())
            .build()
            .unwrap();
        Arc::new(room)
    }

    async fn send(shim: &mut DuplexStream, msg: BridgeMessage) {
        write_frame(shim, &msg).await.unwrap();
    }

    async fn recv(shim: &mut DuplexStream) -> BridgeMessage {
        read_frame(shim).await.unwrap()
    }

    #[tokio::test]
    async fn test_server_binds_random_port() {
        let server = BridgeServer::bind("127.0.0.1:0").await.unwrap();
        assert!(server.addr().unwrap().port() > 0);
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let (mut shim, bridge) = tokio::io::duplex(64 * 1024);
        let handle = tokio::spawn(serve_connection(bridge, room()));

        assert!(matches!(recv(&mut shim).await, BridgeMessage::Open(_)));

        send(
            &mut shim,
            BridgeMessage::Snapshot(WorldSnapshot {
                players: vec![raw(1), raw(2)],
                ..WorldSnapshot::default()
            }),
        )
        .await;
        send(
            &mut shim,
            BridgeMessage::Event(HostEvent::PlayerChat {
                player: raw(2),
                message: "!ready".to_string(),
            }),
        )
        .await;

        assert_eq!(
            recv(&mut shim).await,
            BridgeMessage::Command(HostCommand::SendChat {
                message: "2 players".to_string(),
                target: Some(2),
            })
        );
        assert_eq!(
            recv(&mut shim).await,
            BridgeMessage::ChatDecision {
                player_id: 2,
                broadcast: false
            }
        );

        send(
            &mut shim,
            BridgeMessage::Event(HostEvent::PlayerChat {
                player: raw(1),
                message: "hello".to_string(),
            }),
        )
        .await;
        assert_eq!(
            recv(&mut shim).await,
            BridgeMessage::ChatDecision {
                player_id: 1,
                broadcast: true
            }
        );

        drop(shim);
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_failures_are_reported_and_serving_continues() {
        let (mut shim, bridge) = tokio::io::duplex(64 * 1024);
        tokio::spawn(serve_connection(bridge, room()));
        recv(&mut shim).await;

        send(
            &mut shim,
            BridgeMessage::Event(HostEvent::PlayerChat {
                player: raw(1),
                message: "!explode".to_string(),
            }),
        )
        .await;
        match recv(&mut shim).await {
            BridgeMessage::Failure { callback, message } => {
                assert_eq!(callback, "onPlayerChat");
                assert!(message.contains("boom"));
            }
            other => panic!("Wrong message: {other:?}"),
        }

        send(&mut shim, BridgeMessage::Ping).await;
        assert_eq!(recv(&mut shim).await, BridgeMessage::Pong);
    }

    #[tokio::test]
    async fn test_second_connection_is_refused() {
        let room = room();
        let (_first_shim, first) = tokio::io::duplex(1024);
        let (_second_shim, second) = tokio::io::duplex(1024);

        let serving = tokio::spawn(serve_connection(first, room.clone()));
        while !room.is_initialized() {
            tokio::task::yield_now().await;
        }

        let result = serve_connection(second, room).await;
        assert!(matches!(result, Err(Error::RoomAlreadyInitialized)));
        serving.abort();
    }
}
