//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::mpsc;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Events forwarded from a transport backend to its [`FrameStream`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TransportEvent
{
    /// The connection opened.
    Connected,
    /// The connection could not be opened.
    ConnectFailed(String),
    /// A text frame arrived.
    Text(String),
    /// The connection closed. No more events will arrive.
    Closed,
}

//-------------------------------------------------------------------------------------------------------------------

/// Outbound half of a connection.
pub trait FrameSink: Debug + Send + Sync + 'static
{
    /// Hand a text frame to the connection.
    fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Close the connection. Safe to call more than once.
    fn close(&self);
}

//-------------------------------------------------------------------------------------------------------------------

/// Inbound half of a connection.
///
/// Reads block until a frame arrives or the connection closes. Closing the matching [`FrameSink`] unblocks a
/// pending read with [`TransportError::Closed`].
#[derive(Debug)]
pub struct FrameStream
{
    events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl FrameStream
{
    /// Make a stream that drains transport events.
    pub fn new(events: mpsc::UnboundedReceiver<TransportEvent>) -> FrameStream
    {
        FrameStream{ events }
    }

    /// Wait for the connection to open.
    pub async fn wait_connected(&mut self) -> Result<(), TransportError>
    {
        match self.events.recv().await
        {
            Some(TransportEvent::Connected)             => Ok(()),
            Some(TransportEvent::ConnectFailed(reason)) => Err(TransportError::ConnectFailed(reason)),
            Some(TransportEvent::Text(_)) =>
            {
                tracing::warn!("received text before the connection opened");
                Err(TransportError::ConnectFailed(String::from("text frame before connect")))
            }
            Some(TransportEvent::Closed) | None =>
            {
                Err(TransportError::ConnectFailed(String::from("closed before connecting")))
            }
        }
    }

    /// Read the next text frame.
    pub async fn receive(&mut self) -> Result<String, TransportError>
    {
        loop
        {
            match self.events.recv().await
            {
                Some(TransportEvent::Text(text))            => return Ok(text),
                Some(TransportEvent::Connected)             => tracing::trace!("ignoring duplicate connect report"),
                Some(TransportEvent::ConnectFailed(reason)) => return Err(TransportError::ConnectFailed(reason)),
                Some(TransportEvent::Closed) | None         => return Err(TransportError::Closed),
            }
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// An open connection.
#[derive(Debug)]
pub struct Connection
{
    pub sink: Arc<dyn FrameSink>,
    pub stream: FrameStream,
}

//-------------------------------------------------------------------------------------------------------------------

/// Opens connections to game servers.
#[async_trait::async_trait]
pub trait Connector: Debug + Send + Sync + 'static
{
    /// Open a persistent connection to `url`.
    async fn connect(&self, url: url::Url) -> Result<Connection, TransportError>;
}

//-------------------------------------------------------------------------------------------------------------------
