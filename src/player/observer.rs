//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

/// A strategy callback observed by [`ObserverPlayer`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCallback
{
    UserJoined(UserJoinedMsg),
    SessionEnded(SessionEndedMsg),
    GameStarted(GameStartedMsg),
    PlayerUpdated(PlayerUpdatedMsg),
    GameRoundStarted(GameRoundMsg),
    GameRoundEnded(GameRoundMsg),
}

//-------------------------------------------------------------------------------------------------------------------

/// Spectator that never acts. Records every callback it receives in order.
#[derive(Debug, Clone, Default)]
pub struct ObserverPlayer
{
    log: Arc<Mutex<Vec<PlayerCallback>>>,
}

impl ObserverPlayer
{
    /// Shared access to the callback log. Clones of the observer see the same log.
    pub fn log(&self) -> Vec<PlayerCallback>
    {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, callback: PlayerCallback)
    {
        let Ok(mut log) = self.log.lock() else { return; };
        log.push(callback);
    }

    pub fn user_joined(&mut self, _session: &SessionHandle, msg: &UserJoinedMsg)
    {
        self.record(PlayerCallback::UserJoined(msg.clone()));
    }

    pub fn session_ended(&mut self, _session: &SessionHandle, msg: &SessionEndedMsg)
    {
        self.record(PlayerCallback::SessionEnded(msg.clone()));
    }

    pub fn game_started(&mut self, _session: &SessionHandle, msg: &GameStartedMsg)
    {
        self.record(PlayerCallback::GameStarted(msg.clone()));
    }

    pub fn player_updated(&mut self, _session: &SessionHandle, msg: &PlayerUpdatedMsg)
    {
        self.record(PlayerCallback::PlayerUpdated(msg.clone()));
    }

    pub fn game_round_started(&mut self, _session: &SessionHandle, msg: &GameRoundMsg)
    {
        self.record(PlayerCallback::GameRoundStarted(msg.clone()));
    }

    pub fn game_round_ended(&mut self, _session: &SessionHandle, msg: &GameRoundMsg)
    {
        self.record(PlayerCallback::GameRoundEnded(msg.clone()));
    }
}

//-------------------------------------------------------------------------------------------------------------------
