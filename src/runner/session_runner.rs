//local shortcuts
use crate::*;

//third-party shortcuts
use tracing::Instrument;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Plays one full session per call and reports it as a [`TaskResult`].
#[derive(Debug, Clone)]
pub struct SessionRunner
{
    connector: Arc<dyn Connector>,
    config: EngineConfig,
}

impl SessionRunner
{
    pub fn new(connector: Arc<dyn Connector>, config: EngineConfig) -> SessionRunner
    {
        SessionRunner{ connector, config }
    }

    pub fn config(&self) -> &EngineConfig
    {
        &self.config
    }

    /// Play a session. Any engine failure becomes a failed result carrying the error text.
    pub async fn run(&self, game_config: GameConfig) -> TaskResult
    {
        let category = format!("play:{}", game_config.id);
        let span = tracing::info_span!("session", player = game_config.player_id, room = %game_config.room_id);

        TaskResult::timed(category,
                async move {
                    let mut engine = ProtocolEngine::new(game_config, self.config.clone())?;
                    engine.play(self.connector.as_ref()).await
                }
                .instrument(span)
            ).await
    }
}

//-------------------------------------------------------------------------------------------------------------------
