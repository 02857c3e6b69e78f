//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use core::fmt::Debug;
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
struct OutboundState
{
    /// id of the last message handed to the sink; 0 before the first send
    last_id: u64,
    /// assigned by the server at handshake
    client_id: Option<String>,
    /// set once the session closes
    closed: bool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Serializes every outbound message of one connection.
///
/// Message ids are assigned and frames are handed to the sink inside one lock zone, so the ids observed on the
/// wire increase by exactly one per message even when the session's main flow and its heartbeat task send
/// concurrently. A failed send does not consume an id.
#[derive(Debug)]
pub struct Outbound
{
    sink: Arc<dyn FrameSink>,
    state: Mutex<OutboundState>,
}

impl Outbound
{
    /// Wrap the outbound half of a connection.
    pub fn new(sink: Arc<dyn FrameSink>) -> Outbound
    {
        Outbound{ sink, state: Mutex::new(OutboundState::default()) }
    }

    /// Send a message. Returns the id it was sent with.
    pub fn send(&self, message: OutboundMessage) -> Result<u64, SessionError>
    {
        let Ok(mut state) = self.state.lock()
        else
        {
            tracing::error!("outbound message counter experienced a critical internal error");
            return Err(SessionError::Connection(TransportError::SendFailed));
        };

        if state.closed { return Err(SessionError::Connection(TransportError::Closed)); }

        let client_id = match (&state.client_id, message.needs_client_id())
        {
            (Some(client_id), _) => client_id.as_str(),
            (None, false)        => "",
            (None, true)         =>
            {
                return Err(SessionError::Protocol(String::from("tried to send before the handshake completed")));
            }
        };

        let id = state.last_id + 1;
        let frame = message.encode(id, client_id)?;
        self.sink.send_text(frame)?;
        state.last_id = id;
        tracing::trace!(id, ?message, "sent message");

        Ok(id)
    }

    /// Store the client id assigned at handshake. The first assignment is kept.
    pub fn set_client_id(&self, client_id: String) -> Result<(), SessionError>
    {
        let Ok(mut state) = self.state.lock()
        else { return Err(SessionError::Connection(TransportError::SendFailed)); };

        if let Some(existing) = &state.client_id
        {
            if *existing != client_id
            {
                return Err(SessionError::Protocol(format!("client id already assigned: {}", existing)));
            }
            return Ok(());
        }
        state.client_id = Some(client_id);

        Ok(())
    }

    /// Access the client id, if assigned.
    pub fn client_id(&self) -> Option<String>
    {
        self.state.lock().ok().and_then(|state| state.client_id.clone())
    }

    /// Id of the last message sent, or 0 if nothing was sent.
    pub fn last_id(&self) -> u64
    {
        self.state.lock().map(|state| state.last_id).unwrap_or_default()
    }

    /// Tests if [`Self::close()`] was called.
    pub fn is_closed(&self) -> bool
    {
        self.state.lock().map(|state| state.closed).unwrap_or(true)
    }

    /// Refuse further sends and close the connection.
    ///
    /// Returns `false` if already closed.
    pub fn close(&self) -> bool
    {
        {
            let Ok(mut state) = self.state.lock() else { return false; };
            if state.closed { return false; }
            state.closed = true;
        }

        self.sink.close();
        true
    }
}

//-------------------------------------------------------------------------------------------------------------------
