//local shortcuts
use cometd_stress::*;

//third-party shortcuts
use serde_json::{json, Value};
use tokio::sync::mpsc;

//standard shortcuts
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

//-------------------------------------------------------------------------------------------------------------------

pub const CLIENT_ID: &str = "client-1";
pub const ROOM_ID: &str = "room-1";
pub const GAME_SESSION_ID: &str = "game-1";

/// Lets a script push frames to the client.
#[derive(Debug, Clone)]
pub struct Replies(mpsc::UnboundedSender<TransportEvent>);

impl Replies
{
    /// Send one frame holding `messages`.
    pub fn frame(&self, messages: Vec<Value>)
    {
        let _ = self.0.send(TransportEvent::Text(Value::Array(messages).to_string()));
    }

    /// Send one single-message frame.
    pub fn send(&self, message: Value)
    {
        self.frame(vec![message]);
    }

    pub fn raw(&self, text: &str)
    {
        let _ = self.0.send(TransportEvent::Text(String::from(text)));
    }
}

/// Reacts to each message the client sends.
pub type Script = Box<dyn FnMut(&Value, &Replies) + Send>;

//-------------------------------------------------------------------------------------------------------------------

/// In-memory server side of one connection. Records every message sent by the client.
pub struct MockSink
{
    sent: Arc<Mutex<Vec<Value>>>,
    script: Mutex<Script>,
    replies: Replies,
    closed: AtomicBool,
}

impl std::fmt::Debug for MockSink
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "MockSink")
    }
}

impl MockSink
{
    pub fn new(script: Script) -> (Arc<MockSink>, FrameStream)
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = Arc::new(MockSink{
                sent    : Arc::new(Mutex::new(Vec::new())),
                script  : Mutex::new(script),
                replies : Replies(sender),
                closed  : AtomicBool::new(false),
            });
        (sink, FrameStream::new(receiver))
    }

    pub fn sent(&self) -> Vec<Value>
    {
        self.sent.lock().unwrap().clone()
    }

    pub fn log(&self) -> Arc<Mutex<Vec<Value>>>
    {
        self.sent.clone()
    }

    pub fn is_closed(&self) -> bool
    {
        self.closed.load(Ordering::Acquire)
    }
}

impl FrameSink for MockSink
{
    fn send_text(&self, text: String) -> Result<(), TransportError>
    {
        if self.is_closed() { return Err(TransportError::SendFailed); }

        let frame: Value = serde_json::from_str(&text).unwrap();
        let message = frame.as_array().unwrap()[0].clone();
        self.sent.lock().unwrap().push(message.clone());
        let mut script = self.script.lock().unwrap();
        (*script)(&message, &self.replies);

        Ok(())
    }

    fn close(&self)
    {
        if self.closed.swap(true, Ordering::AcqRel) { return; }
        let _ = self.replies.0.send(TransportEvent::Closed);
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Hands out one scripted connection per connect.
pub struct MockConnector
{
    scripts: Box<dyn Fn() -> Script + Send + Sync>,
    fail: bool,
    sessions: Mutex<Vec<Arc<Mutex<Vec<Value>>>>>,
}

impl std::fmt::Debug for MockConnector
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "MockConnector")
    }
}

impl MockConnector
{
    pub fn new(scripts: impl Fn() -> Script + Send + Sync + 'static) -> MockConnector
    {
        MockConnector{ scripts: Box::new(scripts), fail: false, sessions: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> MockConnector
    {
        MockConnector{ scripts: Box::new(silent_script), fail: true, sessions: Mutex::new(Vec::new()) }
    }

    /// Messages sent on each connection, in connect order.
    pub fn sessions(&self) -> Vec<Vec<Value>>
    {
        self.sessions.lock().unwrap().iter().map(|log| log.lock().unwrap().clone()).collect()
    }
}

#[async_trait::async_trait]
impl Connector for MockConnector
{
    async fn connect(&self, _url: url::Url) -> Result<Connection, TransportError>
    {
        if self.fail { return Err(TransportError::ConnectFailed(String::from("connection refused"))); }

        let (sink, stream) = MockSink::new((self.scripts)());
        self.sessions.lock().unwrap().push(sink.log());

        Ok(Connection{ sink, stream })
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Never answers.
pub fn silent_script() -> Script
{
    Box::new(|_: &Value, _: &Replies| ())
}

pub fn test_game_config(game_id: &str) -> GameConfig
{
    GameConfig{
            id           : String::from(game_id),
            player_id    : 7,
            room_id      : String::from(ROOM_ID),
            server       : String::from("127.0.0.1:8080"),
            game_url     : String::from("default"),
            phone_number : String::default(),
        }
}

pub fn test_engine_config() -> EngineConfig
{
    EngineConfig{
            with_tls         : false,
            game_setup_delay : std::time::Duration::ZERO,
            strategy         : StrategyConfig::immediate(),
            ..Default::default()
        }
}

pub fn channel(message: &Value) -> &str
{
    message["channel"].as_str().unwrap_or_default()
}

pub fn message_id(message: &Value) -> u64
{
    message["id"].as_str().unwrap().parse().unwrap()
}

pub fn room_channel() -> String
{
    format!("/service/gameroom/{}", ROOM_ID)
}

pub fn game_channel() -> String
{
    format!("/service/game/{}", GAME_SESSION_ID)
}

pub fn is_join(message: &Value) -> bool
{
    channel(message) == room_channel() && message["data"]["action"] == "join"
}

pub fn is_leave(message: &Value) -> bool
{
    channel(message) == room_channel() && message["data"]["action"] == "leave"
}

pub fn handshake_reply() -> Value
{
    json!({ "channel": "/meta/handshake", "successful": true, "clientId": CLIENT_ID, "id": "1" })
}

pub fn join_ack() -> Value
{
    json!({ "channel": room_channel(), "successful": true })
}

pub fn room_event(event: &str, fields: Value) -> Value
{
    let mut data = json!({ "event": event });
    if let (Some(data), Some(fields)) = (data.as_object_mut(), fields.as_object())
    {
        data.extend(fields.clone());
    }
    json!({ "channel": "/gameroom", "data": data })
}

pub fn game_event(event: &str, data: Value) -> Value
{
    json!({ "channel": "/game", "data": { "event": event, "data": data } })
}

pub fn game_started(status: &str, round: i64) -> Value
{
    game_event("GAME_STARTED", json!({ "status": status, "round": round, "gameId": GAME_SESSION_ID }))
}

pub fn player_updated(moves: &[&str]) -> Value
{
    game_event("PLAYER_UPDATED", json!({ "playerNumber": 2, "moves": moves }))
}

/// Answers the handshake and the join, then runs `on_join` and `on_game_action` for later traffic.
pub fn game_script(
    on_join        : impl Fn(&Replies) + Send + 'static,
    on_game_action : impl Fn(&Value, &Replies) + Send + 'static,
) -> Script
{
    Box::new(move |message: &Value, replies: &Replies|
        {
            if channel(message) == "/meta/handshake" { replies.send(handshake_reply()); }
            else if is_join(message) { replies.send(join_ack()); on_join(replies); }
            else if channel(message) == game_channel() { on_game_action(message, replies); }
        }
    )
}

/// A backpack game that ends as soon as the player quits.
pub fn backpack_script() -> Script
{
    game_script(
            |replies|
            {
                replies.send(room_event("USER_JOINED", json!({ "active": true, "room": ROOM_ID, "user": 7 })));
                replies.send(game_started("RUNNING", 1));
                replies.send(player_updated(&["ADD", "QUIT"]));
            },
            |message, replies|
            {
                if message["data"]["action"] == "QUIT" { replies.send(game_event("GAME_ENDED", json!({}))); }
            }
        )
}

//-------------------------------------------------------------------------------------------------------------------
