//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Keeps a session's `/meta/connect` heartbeat flowing while the session's main loop is blocked on reads.
///
/// The first heartbeat goes out before the task is spawned. The task then owns a timer and sends a heartbeat on
/// every tick, one interval apart. The main loop
/// hands heartbeat replies over with [`Heartbeat::handoff()`]; each reply fires the next heartbeat right away and
/// restarts the timer, so the client follows the server's long-poll cadence.
#[derive(Debug)]
pub struct Heartbeat
{
    /// heartbeat replies from the main loop
    handoff: mpsc::UnboundedSender<Envelope>,
    /// stop signal; dropping it also stops the task
    stop: Option<oneshot::Sender<()>>,
    /// the heartbeat task
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Heartbeat
{
    /// Send the first heartbeat, then spawn the heartbeat task on the current tokio runtime.
    pub fn spawn(outbound: Arc<Outbound>, interval: Duration) -> Result<Heartbeat, SessionError>
    {
        outbound.send(OutboundMessage::Connect)?;

        let (handoff, handoff_receiver) = mpsc::unbounded_channel();
        let (stop, stop_receiver) = oneshot::channel();
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(heartbeat_loop(outbound, interval, handoff_receiver, stop_receiver));

        Ok(Heartbeat{ handoff, stop: Some(stop), task: Some(task) })
    }

    /// Forward a heartbeat reply received by the main loop.
    pub fn handoff(&self, reply: Envelope)
    {
        if self.handoff.send(reply).is_err()
        {
            tracing::debug!("heartbeat task already stopped, dropping heartbeat reply");
        }
    }

    /// Tests if the heartbeat task has ended.
    pub fn is_stopped(&self) -> bool
    {
        self.task.as_ref().map(|task| task.is_finished()).unwrap_or(true)
    }

    /// Stop the heartbeat task and wait for it to end.
    pub async fn shutdown(&mut self)
    {
        if let Some(stop) = self.stop.take() { let _ = stop.send(()); }
        let Some(task) = self.task.take() else { return; };
        if let Err(err) = task.await
        {
            tracing::error!(?err, "heartbeat task failed");
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

async fn heartbeat_loop(
    outbound         : Arc<Outbound>,
    interval         : Duration,
    mut handoff      : mpsc::UnboundedReceiver<Envelope>,
    mut stop         : oneshot::Receiver<()>,
){
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop
    {
        tokio::select!{
            biased;
            _ = &mut stop =>
            {
                tracing::debug!("heartbeat stopping");
                return;
            }
            reply = handoff.recv() =>
            {
                let Some(reply) = reply else { return; };
                if reply.successful == Some(false)
                {
                    tracing::warn!(data = ?reply.data, "heartbeat reply reported failure");
                }
                tracing::trace!("heartbeat triggered by server reply");
                ticker.reset();
            }
            _ = ticker.tick() =>
            {
                tracing::trace!("heartbeat triggered by timer");
            }
        }

        if let Err(err) = outbound.send(OutboundMessage::Connect)
        {
            tracing::debug!(?err, "heartbeat send failed, stopping");
            return;
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
