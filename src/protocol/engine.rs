//local shortcuts
use crate::*;

//third-party shortcuts
use serde::Deserialize;

//standard shortcuts
use core::fmt::Debug;
use std::collections::VecDeque;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Lifecycle stage of a [`ProtocolEngine`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState
{
    Disconnected,
    Connected,
    Handshaking,
    /// Handshake done and the heartbeat is running.
    Ready,
    JoinedRoom,
    InGame,
    Leaving,
    Closed,
}

//-------------------------------------------------------------------------------------------------------------------

/// Drives one protocol session: connect, handshake, heartbeat, join, dispatch, leave, close.
///
/// The engine owns the inbound half of the connection, so all inbound messages are dispatched in order on the task
/// calling [`Self::play()`]. Outbound messages from that task, the heartbeat task, and scheduled player actions share
/// one [`Outbound`].
#[derive(Debug)]
pub struct ProtocolEngine
{
    game_config: GameConfig,
    config: EngineConfig,
    state: SessionState,
    player: PlayerStrategy,

    session: Option<SessionHandle>,
    stream: Option<FrameStream>,
    heartbeat: Option<Heartbeat>,
    /// messages received in a frame but not dispatched yet
    pending: VecDeque<Envelope>,
}

impl ProtocolEngine
{
    /// Make an engine for a game.
    ///
    /// Fails if the game config is invalid or no strategy exists for the game id.
    pub fn new(game_config: GameConfig, config: EngineConfig) -> Result<ProtocolEngine, SessionError>
    {
        let Some(player) = PlayerStrategy::for_game(&game_config.id, &config.strategy)
        else { return Err(SessionError::UnknownGame(game_config.id.clone())); };

        Self::with_player(game_config, config, player)
    }

    /// Make an engine that plays with a specific strategy, ignoring the game id.
    pub fn with_player(
        game_config : GameConfig,
        config      : EngineConfig,
        player      : PlayerStrategy,
    ) -> Result<ProtocolEngine, SessionError>
    {
        game_config.validate()?;

        Ok(ProtocolEngine{
                game_config,
                config,
                state     : SessionState::Disconnected,
                player,
                session   : None,
                stream    : None,
                heartbeat : None,
                pending   : VecDeque::new(),
            })
    }

    /// Run the whole session lifecycle. The session is always closed when this returns.
    pub async fn play(&mut self, connector: &dyn Connector) -> Result<(), SessionError>
    {
        let result = self.run_lifecycle(connector).await;
        if let Err(err) = &result
        {
            tracing::debug!(?err, state = ?self.state, "session failed");
        }
        self.close().await;

        result
    }

    async fn run_lifecycle(&mut self, connector: &dyn Connector) -> Result<(), SessionError>
    {
        self.connect(connector).await?;
        self.handshake().await?;
        self.start_heartbeat()?;
        self.join_room().await?;
        self.run_dispatch_loop().await?;
        self.leave_room()?;

        Ok(())
    }

    /// Open the connection to the game server.
    pub async fn connect(&mut self, connector: &dyn Connector) -> Result<(), SessionError>
    {
        if self.state != SessionState::Disconnected
        {
            return Err(SessionError::Protocol(format!("cannot connect in state {:?}", self.state)));
        }

        let url = self.config.endpoint_url(&self.game_config.server)?;
        tracing::debug!(%url, "connecting to game server");
        let connection = connector.connect(url).await?;

        self.session = Some(SessionHandle::new(Arc::new(Outbound::new(connection.sink))));
        self.stream = Some(connection.stream);
        self.state = SessionState::Connected;

        Ok(())
    }

    /// Negotiate the session and obtain a client id.
    pub async fn handshake(&mut self) -> Result<(), SessionError>
    {
        let outbound = self.session()?.outbound().clone();
        self.state = SessionState::Handshaking;
        outbound.send(OutboundMessage::Handshake)?;

        let mut reply = self.receive_frame("handshake").await?.into_iter();
        let Some(first) = reply.next()
        else { return Err(SessionError::Protocol(String::from("handshake msg format error: empty frame"))); };

        validate_channel(&first, "handshake", HANDSHAKE_CHANNEL)?;
        if first.successful == Some(false)
        {
            return Err(SessionError::Protocol(String::from("handshake failed: reply not successful")));
        }
        let Some(client_id) = first.client_id.filter(|client_id| !client_id.is_empty())
        else { return Err(SessionError::Protocol(String::from("handshake reply missing client id"))); };

        outbound.set_client_id(client_id)?;
        self.pending.extend(reply);
        tracing::debug!(client_id = ?outbound.client_id(), "handshake completed");

        Ok(())
    }

    /// Start the background heartbeat.
    pub fn start_heartbeat(&mut self) -> Result<(), SessionError>
    {
        let outbound = self.session()?.outbound().clone();
        if outbound.client_id().is_none()
        {
            return Err(SessionError::Protocol(String::from("heartbeat requested before the handshake completed")));
        }
        if self.heartbeat.is_some() { return Ok(()); }

        self.heartbeat = Some(Heartbeat::spawn(outbound, self.config.heartbeat_interval)?);
        self.state = SessionState::Ready;

        Ok(())
    }

    /// Join the configured room, then wait for the game to be set up.
    pub async fn join_room(&mut self) -> Result<(), SessionError>
    {
        let channel = room_service_channel(&self.game_config.room_id);
        self.publish(channel.clone(), &RoomAction::join(&self.game_config))?;

        if self.config.await_join_ack
        {
            let _ = self.wait_for_reply("join room", &channel).await?;
        }
        self.state = SessionState::JoinedRoom;
        tracing::debug!(room = %self.game_config.room_id, player = self.game_config.player_id, "joined room");

        if !self.config.game_setup_delay.is_zero()
        {
            tokio::time::sleep(self.config.game_setup_delay).await;
        }

        Ok(())
    }

    /// Dispatch inbound messages until the game or the session ends.
    pub async fn run_dispatch_loop(&mut self) -> Result<(), SessionError>
    {
        self.state = SessionState::InGame;

        loop
        {
            let Some(envelope) = self.pending.pop_front()
            else
            {
                let frame = self.receive_frame("dispatch").await?;
                self.pending.extend(frame);
                continue;
            };

            if self.dispatch(envelope)?
            {
                tracing::debug!("dispatch loop exiting");
                return Ok(());
            }
        }
    }

    /// Leave the room without waiting for an acknowledgment.
    pub fn leave_room(&mut self) -> Result<(), SessionError>
    {
        self.state = SessionState::Leaving;
        let channel = room_service_channel(&self.game_config.room_id);
        self.publish(channel, &RoomAction::leave(&self.game_config))?;

        Ok(())
    }

    /// Stop the heartbeat, cancel pending player actions, and close the connection.
    ///
    /// Idempotent. Safe to call on a session that never connected.
    pub async fn close(&mut self)
    {
        if self.state == SessionState::Closed { return; }

        if let Some(mut heartbeat) = self.heartbeat.take()
        {
            heartbeat.shutdown().await;
        }
        if let Some(session) = &self.session
        {
            session.cancel_scheduled();
            session.outbound().close();
        }
        self.stream = None;
        self.pending.clear();
        self.state = SessionState::Closed;
        tracing::trace!("session closed");
    }

    pub fn state(&self) -> SessionState
    {
        self.state
    }

    pub fn game_config(&self) -> &GameConfig
    {
        &self.game_config
    }

    /// Client id assigned at handshake.
    pub fn client_id(&self) -> Option<String>
    {
        self.session.as_ref().and_then(|session| session.outbound().client_id())
    }

    /// Current round, or 0 before the game starts.
    pub fn round(&self) -> i64
    {
        self.session.as_ref().map(|session| session.round()).unwrap_or_default()
    }

    pub fn game_session_id(&self) -> Option<String>
    {
        self.session.as_ref().and_then(|session| session.game_session_id())
    }

    fn session(&self) -> Result<&SessionHandle, SessionError>
    {
        self.session.as_ref().ok_or(SessionError::Connection(TransportError::Closed))
    }

    fn publish<T: serde::Serialize>(&self, channel: String, payload: &T) -> Result<u64, SessionError>
    {
        let data = serde_json::to_value(payload)
            .map_err(|err| SessionError::Decode(format!("failed serializing payload for {}: {}", channel, err)))?;
        self.session()?.outbound().send(OutboundMessage::Publish{ channel, data })
    }

    async fn receive_frame(&mut self, action: &str) -> Result<Vec<Envelope>, SessionError>
    {
        let Some(stream) = self.stream.as_mut()
        else { return Err(SessionError::Connection(TransportError::Closed)); };
        let text = stream.receive().await?;
        tracing::trace!(action, %text, "received frame");

        decode_frame(&text, action)
    }

    /// Read until a reply on `channel` arrives. Heartbeat replies that arrive first are handed off.
    async fn wait_for_reply(&mut self, action: &str, channel: &str) -> Result<Envelope, SessionError>
    {
        loop
        {
            let mut frame = self.receive_frame(action).await?.into_iter();
            while let Some(envelope) = frame.next()
            {
                if envelope.is_heartbeat()
                {
                    self.handoff_heartbeat(envelope);
                    continue;
                }
                validate_channel(&envelope, action, channel)?;
                self.pending.extend(frame);

                return Ok(envelope);
            }
        }
    }

    fn handoff_heartbeat(&self, envelope: Envelope)
    {
        match &self.heartbeat
        {
            Some(heartbeat) => heartbeat.handoff(envelope),
            None            => tracing::debug!("dropping heartbeat reply, heartbeat not running"),
        }
    }

    /// Dispatch one inbound message. Returns `true` when the session should stop.
    fn dispatch(&mut self, envelope: Envelope) -> Result<bool, SessionError>
    {
        if envelope.is_heartbeat()
        {
            self.handoff_heartbeat(envelope);
            return Ok(false);
        }
        if envelope.channel == ERROR_CHANNEL
        {
            return Err(SessionError::TransportLevel(envelope.data_or_null().to_string()));
        }
        if envelope.channel == self.config.room_channel
        {
            return self.dispatch_room_event(envelope.data_or_null());
        }
        if envelope.channel == self.config.game_channel
        {
            return self.dispatch_game_event(envelope.data_or_null());
        }

        tracing::debug!(channel = %envelope.channel, "ignoring message on unhandled channel");
        Ok(false)
    }

    fn dispatch_room_event(&mut self, data: &serde_json::Value) -> Result<bool, SessionError>
    {
        if let Err(err) = EventHeader::deserialize(data)
        {
            tracing::warn!(?err, "skipping malformed game room event");
            return Ok(false);
        }
        let session = self.session()?.clone();

        match RoomEvent::decode(data)?
        {
            RoomEvent::Unavailable => Err(SessionError::GameUnavailable),
            RoomEvent::UserJoined(msg) =>
            {
                if !msg.active { return Err(SessionError::JoinRejected); }
                self.player.user_joined(&session, &msg);
                Ok(false)
            }
            RoomEvent::SessionEnded(msg) =>
            {
                self.player.session_ended(&session, &msg);
                Ok(true)
            }
            RoomEvent::Unknown(event) =>
            {
                tracing::debug!(%event, "ignoring unknown game room event");
                Ok(false)
            }
        }
    }

    fn dispatch_game_event(&mut self, data: &serde_json::Value) -> Result<bool, SessionError>
    {
        let header = match EventHeader::deserialize(data)
        {
            Ok(header) => header,
            Err(err) =>
            {
                tracing::warn!(?err, "skipping malformed game event");
                return Ok(false);
            }
        };
        let session = self.session()?.clone();

        match GameEvent::decode(&header)?
        {
            GameEvent::GameStarted(msg) =>
            {
                if msg.status != STATUS_RUNNING
                {
                    return Err(SessionError::UnexpectedState(
                            format!("game status error, expected {} but got {}", STATUS_RUNNING, msg.status)
                        ));
                }
                session.set_round(msg.round);
                session.set_game_session_id(msg.game_id.clone());
                tracing::debug!(game = %msg.game_id, round = msg.round, "game started");
                self.player.game_started(&session, &msg);
            }
            GameEvent::PlayerUpdated(msg) => self.player.player_updated(&session, &msg),
            GameEvent::GameRoundStarted(msg) =>
            {
                session.set_round(msg.round);
                self.player.game_round_started(&session, &msg);
            }
            GameEvent::GameRoundEnded(msg) =>
            {
                session.set_round(msg.round);
                self.player.game_round_ended(&session, &msg);
            }
            GameEvent::GameEnded =>
            {
                tracing::debug!(game = ?session.game_session_id(), "game ended");
                return Ok(true);
            }
            GameEvent::Unknown(event) => tracing::debug!(%event, "ignoring unknown game event"),
        }

        Ok(false)
    }
}

impl Drop for ProtocolEngine
{
    fn drop(&mut self)
    {
        let Some(session) = &self.session else { return; };
        session.cancel_scheduled();
        session.outbound().close();
    }
}

//-------------------------------------------------------------------------------------------------------------------
