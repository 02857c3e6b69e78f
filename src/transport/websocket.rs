//local shortcuts
use crate::*;

//third-party shortcuts
use enfync::AdoptOrDefault;
use tokio::sync::mpsc;

//standard shortcuts
use core::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Forwards socket callbacks into a [`FrameStream`].
#[derive(Debug)]
pub(crate) struct WebsocketHandler
{
    /// send transport events to the session
    pub(crate) event_sender: mpsc::UnboundedSender<TransportEvent>,
}

impl WebsocketHandler
{
    fn forward(&self, event: TransportEvent) -> Result<(), ezsockets::Error>
    {
        if let Err(err) = self.event_sender.send(event)
        {
            tracing::debug!(?err, "failed to forward transport event to session");
            return Err(Box::new(TransportError::Closed));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ezsockets::ClientExt for WebsocketHandler
{
    type Call = ();

    /// Text from server.
    async fn on_text(&mut self, text: String) -> Result<(), ezsockets::Error>
    {
        tracing::trace!("received text from server");
        self.forward(TransportEvent::Text(text))
    }

    /// Binary from server.
    ///
    /// CometD frames are JSON text, so binary frames are only accepted if they hold UTF-8.
    async fn on_binary(&mut self, bytes: Vec<u8>) -> Result<(), ezsockets::Error>
    {
        match String::from_utf8(bytes)
        {
            Ok(text) => self.forward(TransportEvent::Text(text)),
            Err(_) =>
            {
                tracing::warn!("received binary from server that is not utf-8 (not handled)");
                Ok(())
            }
        }
    }

    /// Call from associated client.
    ///
    /// Does nothing.
    async fn on_call(&mut self, _msg: ()) -> Result<(), ezsockets::Error>
    {
        tracing::error!("on_call() invocation (not handled)");
        Ok(())
    }

    /// Respond to the client acquiring a connection.
    async fn on_connect(&mut self) -> Result<(), ezsockets::Error>
    {
        tracing::debug!("connected");
        self.forward(TransportEvent::Connected)
    }

    /// Respond to the client failing a connection attempt.
    ///
    /// Sessions never reconnect.
    async fn on_connect_fail(
        &mut self,
        error: ezsockets::WSError
    ) -> Result<ezsockets::client::ClientCloseMode, ezsockets::Error>
    {
        tracing::debug!(?error, "connection attempt failed");
        let _ = self.forward(TransportEvent::ConnectFailed(error.to_string()));
        Ok(ezsockets::client::ClientCloseMode::Close)
    }

    /// Respond to the client being disconnected.
    async fn on_disconnect(&mut self) -> Result<ezsockets::client::ClientCloseMode, ezsockets::Error>
    {
        tracing::debug!("disconnected");
        let _ = self.forward(TransportEvent::Closed);
        Ok(ezsockets::client::ClientCloseMode::Close)
    }

    /// Respond to the client being closed by the server.
    async fn on_close(
        &mut self,
        close_frame: Option<ezsockets::CloseFrame>
    ) -> Result<ezsockets::client::ClientCloseMode, ezsockets::Error>
    {
        tracing::debug!(?close_frame, "closed by server");
        let _ = self.forward(TransportEvent::Closed);
        Ok(ezsockets::client::ClientCloseMode::Close)
    }
}

impl Drop for WebsocketHandler
{
    fn drop(&mut self)
    {
        // the session may already be gone
        let _ = self.event_sender.send(TransportEvent::Closed);
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Outbound half of a websocket connection.
#[derive(Debug)]
pub(crate) struct WebsocketSink
{
    /// core websockets client
    client: ezsockets::Client<WebsocketHandler>,
    /// flag indicating the sink closed itself
    closed: AtomicBool,
}

impl FrameSink for WebsocketSink
{
    fn send_text(&self, text: String) -> Result<(), TransportError>
    {
        if self.closed.load(Ordering::Acquire) { return Err(TransportError::Closed); }

        match self.client.text(text)
        {
            Ok(_signal) =>
            {
                tracing::trace!("sending text to server");
                Ok(())
            }
            Err(_) =>
            {
                tracing::debug!("tried to send text to dead client");
                Err(TransportError::SendFailed)
            }
        }
    }

    fn close(&self)
    {
        if self.closed.swap(true, Ordering::AcqRel) { return; }

        let closure_frame =
            ezsockets::CloseFrame{
                code   : ezsockets::CloseCode::Normal,
                reason : String::from("session done")
            };
        if self.client.close(Some(closure_frame)).is_err()
        {
            tracing::debug!("tried to close an already dead client");
        }
    }
}

impl Drop for WebsocketSink
{
    fn drop(&mut self)
    {
        self.close();
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Opens websocket connections with `ezsockets`.
///
/// Each connection is attempted once. Sessions treat a dropped connection as fatal, so reconnects are disabled.
#[derive(Debug, Clone)]
pub struct WebsocketConnector
{
    /// runtime that drives the socket backends
    runtime_handle: enfync::builtin::Handle,
    /// duration between socket-level pings if the connection is inactive
    ping_interval: Duration,
    /// duration after which an inactive socket shuts down
    keepalive_timeout: Duration,
}

impl WebsocketConnector
{
    /// Make a connector that drives sockets on the given runtime.
    pub fn new(runtime_handle: enfync::builtin::Handle) -> WebsocketConnector
    {
        WebsocketConnector{
                runtime_handle,
                ping_interval     : Duration::from_secs(5),
                keepalive_timeout : Duration::from_secs(90),
            }
    }
}

impl Default for WebsocketConnector
{
    fn default() -> WebsocketConnector
    {
        WebsocketConnector::new(enfync::builtin::Handle::adopt_or_default())
    }
}

#[async_trait::async_trait]
impl Connector for WebsocketConnector
{
    async fn connect(&self, url: url::Url) -> Result<Connection, TransportError>
    {
        tracing::debug!(%url, "connecting");

        let client_config = ezsockets::ClientConfig::new(url)
            .max_initial_connect_attempts(1)
            .max_reconnect_attempts(0);

        let mut socket_config = ezsockets::SocketConfig::default();
        socket_config.heartbeat = self.ping_interval;
        socket_config.timeout   = self.keepalive_timeout;
        let client_config = client_config.socket_config(socket_config);

        // prepare event channel that points into the session
        let (event_sender, event_receiver) = mpsc::unbounded_channel::<TransportEvent>();
        let client_connector = ezsockets::ClientConnectorTokio::from(self.runtime_handle.clone());

        let (client, _client_task_handle) = ezsockets::connect_with(
                move |_client| WebsocketHandler{ event_sender },
                client_config,
                client_connector,
            );

        let sink = WebsocketSink{ client, closed: AtomicBool::new(false) };
        let mut stream = FrameStream::new(event_receiver);

        // dropping the sink on failure closes the client
        stream.wait_connected().await?;

        Ok(Connection{ sink: Arc::new(sink), stream })
    }
}

//-------------------------------------------------------------------------------------------------------------------
