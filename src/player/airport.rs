//local shortcuts
use crate::*;

//third-party shortcuts
use rand::Rng;

//standard shortcuts
use core::fmt::Debug;
use std::time::{Duration, Instant};

//-------------------------------------------------------------------------------------------------------------------

pub const AIRPORT_CHOOSE: &str = "CHOOSE";

//-------------------------------------------------------------------------------------------------------------------

/// Minimum effort airport player: picks a random effort level from 1 to 6 once per round.
#[derive(Debug)]
pub struct AirportPlayer
{
    delay: Duration,
    /// last round a choice was scheduled for
    current_round: i64,
    /// when the last choice was scheduled
    chosen_at: Option<Instant>,
}

impl AirportPlayer
{
    pub fn new(config: &StrategyConfig) -> AirportPlayer
    {
        AirportPlayer{ delay: config.airport_delay, current_round: -1, chosen_at: None }
    }

    pub fn player_updated(&mut self, session: &SessionHandle, msg: &PlayerUpdatedMsg)
    {
        if !msg.offers(AIRPORT_CHOOSE) { return; }

        let round = session.round();
        if self.current_round == round { return; }
        self.current_round = round;
        self.chosen_at = Some(Instant::now());

        let effort: i64 = rand::thread_rng().gen_range(1..=6);
        let action = PlayerAction::new(
                AIRPORT_CHOOSE,
                msg.player_number,
                vec![serde_json::json!(round), serde_json::json!(effort)]
            );
        session.schedule_game_action(action, round, self.delay);
    }

    pub fn game_round_ended(&mut self, _session: &SessionHandle, msg: &GameRoundMsg)
    {
        let Some(chosen_at) = self.chosen_at.take() else { return; };
        tracing::debug!(round = msg.round, elapsed_ms = chosen_at.elapsed().as_millis() as u64, "round ended after choice");
    }
}

//-------------------------------------------------------------------------------------------------------------------
