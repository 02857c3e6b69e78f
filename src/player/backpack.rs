//local shortcuts
use crate::*;

//third-party shortcuts
use rand::Rng;

//standard shortcuts
use core::fmt::Debug;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

pub const BACKPACK_ADD: &str = "ADD";
pub const BACKPACK_QUIT: &str = "QUIT";

//-------------------------------------------------------------------------------------------------------------------

/// Backpack player: quits every round it is offered the chance to, after a random delay.
#[derive(Debug)]
pub struct BackpackPlayer
{
    delay_min: Duration,
    delay_max: Duration,
    /// last round a quit was scheduled for
    current_round: i64,
}

impl BackpackPlayer
{
    pub fn new(config: &StrategyConfig) -> BackpackPlayer
    {
        BackpackPlayer{
                delay_min     : config.backpack_delay_min,
                delay_max     : config.backpack_delay_max.max(config.backpack_delay_min),
                current_round : -1,
            }
    }

    pub fn player_updated(&mut self, session: &SessionHandle, msg: &PlayerUpdatedMsg)
    {
        if !msg.offers(BACKPACK_QUIT) { return; }

        let round = session.round();
        if self.current_round == round
        {
            tracing::trace!(round, "quit already scheduled for this round");
            return;
        }
        self.current_round = round;

        let delay = rand::thread_rng().gen_range(self.delay_min..=self.delay_max);
        let action = PlayerAction::new(
                BACKPACK_QUIT,
                msg.player_number,
                vec![serde_json::json!(round), serde_json::json!(0)]
            );
        session.schedule_game_action(action, round, delay);
    }
}

//-------------------------------------------------------------------------------------------------------------------
