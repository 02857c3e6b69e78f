//local shortcuts
use crate::*;

//third-party shortcuts
use serde::{Serialize, Deserialize};

//standard shortcuts
use core::fmt::Debug;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Everything a session needs to know about the game it will play.
///
/// Produced by the HTTP bootstrap or by CLI flags. Immutable for the duration of a session.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameConfig
{
    /// Game id. Selects the [`PlayerStrategy`].
    #[serde(default)]
    pub id: String,
    /// Player id inside the room. Must be positive.
    #[serde(rename = "playerId", default)]
    pub player_id: i64,
    /// Room to join.
    #[serde(rename = "roomId", default)]
    pub room_id: String,
    /// Game server address, optionally with a path prefix (e.g. `gameserver.example.com/gameserver-0`).
    #[serde(default)]
    pub server: String,
    /// Front-end url of the game. Informational only, never used by the protocol engine.
    #[serde(rename = "gameurl", default)]
    pub game_url: String,
    /// Phone number of the signed-in user. Informational only.
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
}

impl GameConfig
{
    /// Check the invariants a session relies on before connecting.
    pub fn validate(&self) -> Result<(), SessionError>
    {
        if self.player_id <= 0
        {
            return Err(SessionError::InvalidConfig(format!("player id must be positive, got {}", self.player_id)));
        }
        if self.server.trim().is_empty()
        {
            return Err(SessionError::InvalidConfig(String::from("server address is empty")));
        }

        Ok(())
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Tunables for the built-in player strategies.
#[derive(Debug, Clone)]
pub struct StrategyConfig
{
    /// Shortest delay before a backpack player quits a round. Defaults to 5 seconds.
    pub backpack_delay_min: Duration,
    /// Longest delay before a backpack player quits a round. Defaults to 9 seconds.
    pub backpack_delay_max: Duration,
    /// Delay before an airport player submits its choice. Defaults to 10 seconds.
    pub airport_delay: Duration,
}

impl StrategyConfig
{
    /// Strategies react without any delay.
    pub fn immediate() -> StrategyConfig
    {
        StrategyConfig{
                backpack_delay_min : Duration::ZERO,
                backpack_delay_max : Duration::ZERO,
                airport_delay      : Duration::ZERO,
            }
    }
}

impl Default for StrategyConfig
{
    fn default() -> StrategyConfig
    {
        StrategyConfig{
                backpack_delay_min : Duration::from_secs(5),
                backpack_delay_max : Duration::from_secs(9),
                airport_delay      : Duration::from_secs(10),
            }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Config for the [`ProtocolEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig
{
    /// Connect with `wss` instead of `ws`. Defaults to `true`.
    pub with_tls: bool,
    /// Path of the CometD endpoint, appended to the game server address. Defaults to `/game-server/cometd`.
    pub endpoint_path: String,
    /// Cadence of the background heartbeat. Defaults to 15 seconds.
    ///
    /// Must stay below the server's connect timeout (60 seconds in the handshake advice).
    pub heartbeat_interval: Duration,
    /// Wait for the server to acknowledge the room join before dispatching events. Defaults to `true`.
    pub await_join_ack: bool,
    /// Blocking wait after joining, while the server sets the game up. Defaults to 1 second.
    pub game_setup_delay: Duration,
    /// Channel carrying room lifecycle events. Defaults to `/gameroom`.
    pub room_channel: String,
    /// Channel carrying game lifecycle events. Defaults to `/game`.
    pub game_channel: String,
    /// Player strategy tunables.
    pub strategy: StrategyConfig,
}

impl EngineConfig
{
    /// Make the endpoint url for a game server: `{ws, wss}://<server><endpoint_path>`.
    pub fn endpoint_url(&self, server: &str) -> Result<url::Url, SessionError>
    {
        let scheme = match self.with_tls { true => "wss", false => "ws" };
        let server = server.trim().trim_end_matches('/');
        url::Url::parse(&format!("{}://{}{}", scheme, server, self.endpoint_path))
            .map_err(|err| SessionError::InvalidConfig(format!("invalid server address {}: {}", server, err)))
    }
}

impl Default for EngineConfig
{
    fn default() -> EngineConfig
    {
        EngineConfig{
                with_tls           : true,
                endpoint_path      : String::from("/game-server/cometd"),
                heartbeat_interval : Duration::from_secs(15),
                await_join_ack     : true,
                game_setup_delay   : Duration::from_secs(1),
                room_channel       : String::from(DEFAULT_ROOM_CHANNEL),
                game_channel       : String::from(DEFAULT_GAME_CHANNEL),
                strategy           : StrategyConfig::default(),
            }
    }
}

//-------------------------------------------------------------------------------------------------------------------
