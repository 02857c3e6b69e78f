//local shortcuts

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by transports.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TransportError
{
    /// The connection could not be opened.
    ConnectFailed(String),
    /// A frame could not be handed to the connection.
    SendFailed,
    /// The connection is closed.
    Closed,
}

impl std::fmt::Display for TransportError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "TransportError::");
        match self
        {
            TransportError::ConnectFailed(reason) => write!(f, "ConnectFailed({})", reason),
            TransportError::SendFailed            => write!(f, "SendFailed"),
            TransportError::Closed                => write!(f, "Closed"),
        }
    }
}
impl std::error::Error for TransportError {}

//-------------------------------------------------------------------------------------------------------------------

/// Errors that end a protocol session.
///
/// Every variant is fatal to the session that produced it. Sibling sessions are never affected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionError
{
    /// The transport failed. Never retried within a session.
    Connection(TransportError),
    /// A protocol control message had an unexpected channel or shape, or carried an error field.
    Protocol(String),
    /// The server reported the room join as inactive.
    JoinRejected,
    /// The server reported the game as unavailable.
    GameUnavailable,
    /// The game reported a status other than `RUNNING` when it started.
    UnexpectedState(String),
    /// A payload for an expected message type failed to decode.
    Decode(String),
    /// The server published on the `error` channel. Holds the raw payload.
    TransportLevel(String),
    /// No player strategy exists for the configured game id.
    UnknownGame(String),
    /// The game config cannot be used to open a session.
    InvalidConfig(String),
}

impl From<TransportError> for SessionError
{
    fn from(err: TransportError) -> Self
    {
        SessionError::Connection(err)
    }
}

impl std::fmt::Display for SessionError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "SessionError::");
        match self
        {
            SessionError::Connection(err)         => write!(f, "Connection({})", err),
            SessionError::Protocol(reason)        => write!(f, "Protocol({})", reason),
            SessionError::JoinRejected            => write!(f, "JoinRejected"),
            SessionError::GameUnavailable         => write!(f, "GameUnavailable"),
            SessionError::UnexpectedState(reason) => write!(f, "UnexpectedState({})", reason),
            SessionError::Decode(reason)          => write!(f, "Decode({})", reason),
            SessionError::TransportLevel(payload) => write!(f, "TransportLevel({})", payload),
            SessionError::UnknownGame(game_id)    => write!(f, "UnknownGame({})", game_id),
            SessionError::InvalidConfig(reason)   => write!(f, "InvalidConfig({})", reason),
        }
    }
}
impl std::error::Error for SessionError {}

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted while bootstrapping a game over HTTP.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BootstrapError
{
    /// The request could not be sent or its body could not be read.
    Request(String),
    /// The service answered with an unexpected status.
    Status(u16, String),
    /// The response body had an unexpected shape.
    Decode(String),
    /// Sign-in did not hand out a session cookie.
    MissingCookie,
    /// A call that needs a signed-in user was made before signing in.
    NotSignedIn,
    /// The user list could not be read.
    UserList(String),
}

impl From<reqwest::Error> for BootstrapError
{
    fn from(err: reqwest::Error) -> Self
    {
        BootstrapError::Request(err.to_string())
    }
}

impl std::fmt::Display for BootstrapError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "BootstrapError::");
        match self
        {
            BootstrapError::Request(reason)      => write!(f, "Request({})", reason),
            BootstrapError::Status(code, body)   => write!(f, "Status({}, {})", code, body),
            BootstrapError::Decode(reason)       => write!(f, "Decode({})", reason),
            BootstrapError::MissingCookie        => write!(f, "MissingCookie"),
            BootstrapError::NotSignedIn          => write!(f, "NotSignedIn"),
            BootstrapError::UserList(reason)     => write!(f, "UserList({})", reason),
        }
    }
}
impl std::error::Error for BootstrapError {}

//-------------------------------------------------------------------------------------------------------------------
