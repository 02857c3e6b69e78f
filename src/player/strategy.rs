//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

pub const GAME_BACKPACK: &str = "backpack";
pub const GAME_AIRPORT: &str = "minimum_effort_airport";
pub const GAME_AIRPORT_TARGET: &str = "minimum_effort_airport_target";

/// Game ids with a built-in strategy.
pub const KNOWN_GAMES: [&str; 3] = [GAME_BACKPACK, GAME_AIRPORT, GAME_AIRPORT_TARGET];

//-------------------------------------------------------------------------------------------------------------------

/// Decision logic of one virtual player, selected by game id.
///
/// Callbacks run on the session's dispatch loop and must not block. Reactions that need a delay go through
/// [`SessionHandle::schedule_game_action()`]. Add a game by adding a variant.
#[derive(Debug)]
pub enum PlayerStrategy
{
    Backpack(BackpackPlayer),
    Airport(AirportPlayer),
    Observer(ObserverPlayer),
}

impl PlayerStrategy
{
    /// Make the strategy for a game id. Returns `None` for unknown games.
    ///
    /// [`ObserverPlayer`] has no game id; install it with [`ProtocolEngine::with_player()`].
    pub fn for_game(game_id: &str, config: &StrategyConfig) -> Option<PlayerStrategy>
    {
        match game_id
        {
            GAME_BACKPACK                      => Some(PlayerStrategy::Backpack(BackpackPlayer::new(config))),
            GAME_AIRPORT | GAME_AIRPORT_TARGET => Some(PlayerStrategy::Airport(AirportPlayer::new(config))),
            _                                  => None,
        }
    }

    pub fn user_joined(&mut self, session: &SessionHandle, msg: &UserJoinedMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(_) => (),
            PlayerStrategy::Airport(_)  => (),
            PlayerStrategy::Observer(p) => p.user_joined(session, msg),
        }
    }

    pub fn session_ended(&mut self, session: &SessionHandle, msg: &SessionEndedMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(_) => (),
            PlayerStrategy::Airport(_)  => (),
            PlayerStrategy::Observer(p) => p.session_ended(session, msg),
        }
    }

    pub fn game_started(&mut self, session: &SessionHandle, msg: &GameStartedMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(_) => (),
            PlayerStrategy::Airport(_)  => (),
            PlayerStrategy::Observer(p) => p.game_started(session, msg),
        }
    }

    pub fn player_updated(&mut self, session: &SessionHandle, msg: &PlayerUpdatedMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(p) => p.player_updated(session, msg),
            PlayerStrategy::Airport(p)  => p.player_updated(session, msg),
            PlayerStrategy::Observer(p) => p.player_updated(session, msg),
        }
    }

    pub fn game_round_started(&mut self, session: &SessionHandle, msg: &GameRoundMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(_) => (),
            PlayerStrategy::Airport(_)  => (),
            PlayerStrategy::Observer(p) => p.game_round_started(session, msg),
        }
    }

    pub fn game_round_ended(&mut self, session: &SessionHandle, msg: &GameRoundMsg)
    {
        match self
        {
            PlayerStrategy::Backpack(_) => (),
            PlayerStrategy::Airport(p)  => p.game_round_ended(session, msg),
            PlayerStrategy::Observer(p) => p.game_round_ended(session, msg),
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
