//local shortcuts
use crate::*;

//third-party shortcuts
use serde::{Serialize, Deserialize};
use serde_json::Value;

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

pub const EVENT_UNAVAILABLE: &str = "UNAVAILABLE";
pub const EVENT_USER_JOINED: &str = "USER_JOINED";
pub const EVENT_SESSION_ENDED: &str = "SESSION_ENDED";
pub const EVENT_GAME_STARTED: &str = "GAME_STARTED";
pub const EVENT_PLAYER_UPDATED: &str = "PLAYER_UPDATED";
pub const EVENT_GAME_ROUND_STARTED: &str = "GAME_ROUND_STARTED";
pub const EVENT_GAME_ROUND_ENDED: &str = "GAME_ROUND_ENDED";
pub const EVENT_GAME_ENDED: &str = "GAME_ENDED";

/// Game status required by `GAME_STARTED`.
pub const STATUS_RUNNING: &str = "RUNNING";

//-------------------------------------------------------------------------------------------------------------------

/// Common shape of room and game channel payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventHeader
{
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// `USER_JOINED` payload. Fields sit at the top level of the room payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserJoinedMsg
{
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub user: Option<i64>,
}

/// `SESSION_ENDED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionEndedMsg
{
    #[serde(default)]
    pub room: Option<String>,
}

/// `GAME_STARTED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameStartedMsg
{
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub round: i64,
    #[serde(rename = "gameId", default)]
    pub game_id: String,
}

/// `PLAYER_UPDATED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerUpdatedMsg
{
    #[serde(rename = "playerNumber", default)]
    pub player_number: i64,
    /// Moves the player may make now.
    #[serde(default)]
    pub moves: Vec<String>,
}

impl PlayerUpdatedMsg
{
    /// Tests if `action` is among the offered moves.
    pub fn offers(&self, action: &str) -> bool
    {
        self.moves.iter().any(|m| m == action)
    }
}

/// `GAME_ROUND_STARTED` and `GAME_ROUND_ENDED` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameRoundMsg
{
    #[serde(default)]
    pub round: i64,
}

//-------------------------------------------------------------------------------------------------------------------

fn decode_payload<T: for<'de> Deserialize<'de>>(value: &Value, event: &str) -> Result<T, SessionError>
{
    T::deserialize(value).map_err(|err| SessionError::Decode(format!("{} json unmarshal failed: {}", event, err)))
}

/// Events published on the room channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent
{
    Unavailable,
    UserJoined(UserJoinedMsg),
    SessionEnded(SessionEndedMsg),
    Unknown(String),
}

impl RoomEvent
{
    /// Decode a room channel payload.
    pub fn decode(data: &Value) -> Result<RoomEvent, SessionError>
    {
        let header: EventHeader = decode_payload(data, "game room event")?;

        let event = match header.event.as_str()
        {
            EVENT_UNAVAILABLE   => RoomEvent::Unavailable,
            EVENT_USER_JOINED   => RoomEvent::UserJoined(decode_payload(data, EVENT_USER_JOINED)?),
            EVENT_SESSION_ENDED => RoomEvent::SessionEnded(decode_payload(data, EVENT_SESSION_ENDED)?),
            _                   => RoomEvent::Unknown(header.event),
        };

        Ok(event)
    }
}

/// Events published on the game channel.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent
{
    GameStarted(GameStartedMsg),
    PlayerUpdated(PlayerUpdatedMsg),
    GameRoundStarted(GameRoundMsg),
    GameRoundEnded(GameRoundMsg),
    GameEnded,
    Unknown(String),
}

impl GameEvent
{
    /// Decode a game event from its header. Typed payloads live under the header's `data` field.
    pub fn decode(header: &EventHeader) -> Result<GameEvent, SessionError>
    {
        let data = &header.data;
        let event = match header.event.as_str()
        {
            EVENT_GAME_STARTED       => GameEvent::GameStarted(decode_payload(data, EVENT_GAME_STARTED)?),
            EVENT_PLAYER_UPDATED     => GameEvent::PlayerUpdated(decode_payload(data, EVENT_PLAYER_UPDATED)?),
            EVENT_GAME_ROUND_STARTED => GameEvent::GameRoundStarted(decode_payload(data, EVENT_GAME_ROUND_STARTED)?),
            EVENT_GAME_ROUND_ENDED   => GameEvent::GameRoundEnded(decode_payload(data, EVENT_GAME_ROUND_ENDED)?),
            EVENT_GAME_ENDED         => GameEvent::GameEnded,
            _                        => GameEvent::Unknown(header.event.clone()),
        };

        Ok(event)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Join or leave a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAction
{
    pub action: String,
    pub room: String,
    pub user: i64,
}

impl RoomAction
{
    pub fn join(config: &GameConfig) -> RoomAction
    {
        RoomAction{ action: String::from("join"), room: config.room_id.clone(), user: config.player_id }
    }

    pub fn leave(config: &GameConfig) -> RoomAction
    {
        RoomAction{ action: String::from("leave"), room: config.room_id.clone(), user: config.player_id }
    }
}

/// A player move inside a game.
///
/// By convention the first element of `data` is the round the decision was made in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAction
{
    pub action: String,
    pub player: i64,
    pub data: Vec<Value>,
}

impl PlayerAction
{
    pub fn new(action: &str, player: i64, data: Vec<Value>) -> PlayerAction
    {
        PlayerAction{ action: String::from(action), player, data }
    }
}

//-------------------------------------------------------------------------------------------------------------------
