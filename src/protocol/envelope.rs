//local shortcuts
use crate::*;

//third-party shortcuts
use serde::{Serialize, Deserialize};
use serde_json::Value;

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

/// Capability negotiation channel.
pub const HANDSHAKE_CHANNEL: &str = "/meta/handshake";
/// Heartbeat channel.
pub const CONNECT_CHANNEL: &str = "/meta/connect";
/// Channel the server uses to report errors outside the Bayeux error field.
pub const ERROR_CHANNEL: &str = "error";
/// Default channel for room lifecycle events.
pub const DEFAULT_ROOM_CHANNEL: &str = "/gameroom";
/// Default channel for game lifecycle events.
pub const DEFAULT_GAME_CHANNEL: &str = "/game";

/// Channel for room join/leave actions.
pub fn room_service_channel(room_id: &str) -> String
{
    format!("/service/gameroom/{}", room_id)
}

/// Channel for in-game player actions.
pub fn game_service_channel(game_id: &str) -> String
{
    format!("/service/game/{}", game_id)
}

//-------------------------------------------------------------------------------------------------------------------

/// One inbound Bayeux message. Frames on the wire are arrays of these.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope
{
    /// Selects dispatch.
    #[serde(default)]
    pub channel: String,
    /// Echo of the outbound message id, if the server sent one.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "clientId", default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub successful: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ext: Option<Value>,
    /// Protocol-level failure, independent of transport errors.
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope
{
    /// Tests if this message is a heartbeat reply.
    pub fn is_heartbeat(&self) -> bool
    {
        self.channel == CONNECT_CHANNEL
    }

    /// Access the payload, or `null` if absent.
    pub fn data_or_null(&self) -> &Value
    {
        self.data.as_ref().unwrap_or(&Value::Null)
    }
}

/// Decode an inbound frame.
/// - Fails with [`SessionError::Decode`] if the frame is not an array of messages.
/// - Fails with [`SessionError::Protocol`] if the array is empty or any message carries an error field.
pub fn decode_frame(text: &str, action: &str) -> Result<Vec<Envelope>, SessionError>
{
    let envelopes: Vec<Envelope> = serde_json::from_str(text)
        .map_err(|err| SessionError::Decode(format!("{} msg parsing failed: {}", action, err)))?;

    if envelopes.is_empty()
    {
        return Err(SessionError::Protocol(format!("{} msg format error: empty frame", action)));
    }

    if let Some(error) = envelopes.iter().filter_map(|envelope| envelope.error.as_ref()).find(|e| !e.is_empty())
    {
        return Err(SessionError::Protocol(format!("{} failed: {}", action, error)));
    }

    Ok(envelopes)
}

/// Fail with [`SessionError::Protocol`] if a control reply arrived on the wrong channel.
pub fn validate_channel(envelope: &Envelope, action: &str, channel: &str) -> Result<(), SessionError>
{
    if envelope.channel != channel
    {
        return Err(SessionError::Protocol(format!("{} receive channel incorrect: {}", action, envelope.channel)));
    }

    Ok(())
}

//-------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HandshakeAdvice
{
    timeout: u64,
    interval: u64,
}

#[derive(Debug, Serialize)]
struct HandshakeRequest<'a>
{
    id: String,
    version: &'a str,
    #[serde(rename = "minimumVersion")]
    minimum_version: &'a str,
    channel: &'a str,
    #[serde(rename = "supportedConnectionTypes")]
    supported_connection_types: [&'a str; 3],
    advice: HandshakeAdvice,
    ext: Value,
}

#[derive(Debug, Serialize)]
struct ConnectRequest<'a>
{
    id: String,
    channel: &'a str,
    #[serde(rename = "clientId")]
    client_id: &'a str,
    #[serde(rename = "connectionType")]
    connection_type: &'a str,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a>
{
    id: String,
    channel: &'a str,
    #[serde(rename = "clientId")]
    client_id: &'a str,
    data: &'a Value,
}

/// Outbound messages. Ids and the client id are stamped by [`Outbound`] at send time.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage
{
    /// Capability negotiation. The only message sent without a client id.
    Handshake,
    /// Heartbeat.
    Connect,
    /// Publish a payload on a service channel.
    Publish{ channel: String, data: Value },
}

impl OutboundMessage
{
    /// Tests if this message may only be sent once a client id is assigned.
    pub fn needs_client_id(&self) -> bool
    {
        !matches!(self, OutboundMessage::Handshake)
    }

    /// Encode as a one-element frame.
    pub fn encode(&self, id: u64, client_id: &str) -> Result<String, SessionError>
    {
        let id = id.to_string();
        let encoded = match self
        {
            OutboundMessage::Handshake =>
            {
                serde_json::to_string(&[HandshakeRequest{
                        id,
                        version                    : "1.0",
                        minimum_version            : "1.0",
                        channel                    : HANDSHAKE_CHANNEL,
                        supported_connection_types : ["websocket", "long-polling", "callback-polling"],
                        advice                     : HandshakeAdvice{ timeout: 60000, interval: 0 },
                        ext                        : serde_json::json!({ "ack": true }),
                    }])
            }
            OutboundMessage::Connect =>
            {
                serde_json::to_string(&[ConnectRequest{
                        id,
                        channel         : CONNECT_CHANNEL,
                        client_id,
                        connection_type : "websocket",
                    }])
            }
            OutboundMessage::Publish{ channel, data } =>
            {
                serde_json::to_string(&[PublishRequest{ id, channel, client_id, data }])
            }
        };

        encoded.map_err(|err| SessionError::Decode(format!("failed serializing outbound message: {}", err)))
    }
}

//-------------------------------------------------------------------------------------------------------------------
