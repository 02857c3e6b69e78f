//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

#[derive(Debug)]
struct SessionShared
{
    outbound: Arc<Outbound>,
    round: AtomicI64,
    game_session_id: Mutex<Option<String>>,
    scheduled: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

//-------------------------------------------------------------------------------------------------------------------

/// The view of a running session handed to player strategies.
///
/// Lets strategies read the current round and send game actions without blocking the dispatch loop.
#[derive(Debug, Clone)]
pub struct SessionHandle
{
    inner: Arc<SessionShared>,
}

impl SessionHandle
{
    pub(crate) fn new(outbound: Arc<Outbound>) -> SessionHandle
    {
        SessionHandle{
                inner: Arc::new(SessionShared{
                        outbound,
                        round           : AtomicI64::new(0),
                        game_session_id : Mutex::new(None),
                        scheduled       : Mutex::new(Vec::new()),
                    })
            }
    }

    pub(crate) fn outbound(&self) -> &Arc<Outbound>
    {
        &self.inner.outbound
    }

    /// The round active right now.
    pub fn round(&self) -> i64
    {
        self.inner.round.load(Ordering::Acquire)
    }

    pub(crate) fn set_round(&self, round: i64)
    {
        self.inner.round.store(round, Ordering::Release);
    }

    /// Game session id assigned by `GAME_STARTED`.
    pub fn game_session_id(&self) -> Option<String>
    {
        self.inner.game_session_id.lock().ok().and_then(|id| id.clone())
    }

    pub(crate) fn set_game_session_id(&self, game_session_id: String)
    {
        let Ok(mut id) = self.inner.game_session_id.lock() else { return; };
        *id = Some(game_session_id);
    }

    /// Send a game action decided during `round`.
    ///
    /// Returns `Ok(false)` and sends nothing if the round has advanced since the decision.
    pub fn send_game_action(&self, action: &PlayerAction, round: i64) -> Result<bool, SessionError>
    {
        let current = self.round();
        if current != round
        {
            tracing::debug!(action = %action.action, round, current, "discarding stale game action");
            return Ok(false);
        }

        let Some(game_session_id) = self.game_session_id()
        else { return Err(SessionError::Protocol(String::from("game action sent before the game started"))); };

        let data = serde_json::to_value(action)
            .map_err(|err| SessionError::Decode(format!("failed serializing game action: {}", err)))?;
        self.inner.outbound.send(OutboundMessage::Publish{ channel: game_service_channel(&game_session_id), data })?;
        tracing::debug!(action = %action.action, round, "sent game action");

        Ok(true)
    }

    /// Send a game action after `delay` without blocking the caller.
    ///
    /// The action goes through [`Self::send_game_action()`] once the delay elapses, so it is dropped if the round
    /// moved on. Pending actions are cancelled when the session closes.
    pub fn schedule_game_action(&self, action: PlayerAction, round: i64, delay: Duration)
    {
        let session = self.clone();
        let task = tokio::spawn(async move {
                if !delay.is_zero() { tokio::time::sleep(delay).await; }
                if let Err(err) = session.send_game_action(&action, round)
                {
                    tracing::debug!(?err, action = %action.action, round, "scheduled game action failed");
                }
            });

        let Ok(mut scheduled) = self.inner.scheduled.lock()
        else { tracing::error!("game action scheduler experienced a critical internal error"); return; };
        scheduled.retain(|task| !task.is_finished());
        scheduled.push(task);
    }

    /// Cancel every scheduled action that has not run yet.
    pub(crate) fn cancel_scheduled(&self)
    {
        let Ok(mut scheduled) = self.inner.scheduled.lock() else { return; };
        for task in scheduled.drain(..)
        {
            task.abort();
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
