//local shortcuts
use crate::*;

//third-party shortcuts
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

//standard shortcuts
use core::fmt::Debug;

//-------------------------------------------------------------------------------------------------------------------

const SIGN_IN_PATH: &str = "/zhilian/login";
const INFORMATION_PATH: &str = "/student/information?ignoreTrait=true";
const SESSION_COOKIE: &str = "this.sid";

//-------------------------------------------------------------------------------------------------------------------

/// Where the bootstrap service lives.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BootstrapConfig
{
    /// Base url every path is appended to. Defaults to `https://talent.test.moblab-us.cn/api/1`.
    pub service_endpoint: String,
    /// Sent with every sign-in. Defaults to `111111`.
    pub access_id: String,
}

impl Default for BootstrapConfig
{
    fn default() -> BootstrapConfig
    {
        BootstrapConfig{
                service_endpoint : String::from("https://talent.test.moblab-us.cn/api/1"),
                access_id        : String::from("111111"),
            }
    }
}

/// Make an HTTP client for the bootstrap service. Redirects are not followed, since sign-in answers with one.
pub fn http_client() -> Result<reqwest::Client, BootstrapError>
{
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(1024)
        .build()?;

    Ok(client)
}

//-------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InformationUser
{
    id: String,
}

#[derive(Debug, Deserialize)]
struct Information
{
    user: InformationUser,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct StartGameInfo
{
    #[serde(default)]
    id: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "playerId")]
    player_id: i64,
    #[serde(rename = "roomId", default)]
    room_id: String,
    #[serde(default)]
    server: String,
    #[serde(default)]
    gameurl: String,
}

#[derive(Debug, Deserialize)]
struct StartGameData
{
    data: StartGameInfo,
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str, what: &str) -> Result<T, BootstrapError>
{
    serde_json::from_str(body).map_err(|err| BootstrapError::Decode(format!("{} response: {}", what, err)))
}

/// Decode a start-game response body. `playerId` may arrive as a number or a numeric string.
pub fn decode_start_game(body: &str, phone_number: &str) -> Result<GameConfig, BootstrapError>
{
    let start: StartGameData = decode(body, "start game")?;

    Ok(GameConfig{
            id           : start.data.id,
            player_id    : start.data.player_id,
            room_id      : start.data.room_id,
            server       : start.data.server,
            game_url     : start.data.gameurl,
            phone_number : String::from(phone_number),
        })
}

async fn consume(response: reqwest::Response) -> Result<String, BootstrapError>
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() && !status.is_redirection()
    {
        return Err(BootstrapError::Status(status.as_u16(), body));
    }

    Ok(body)
}

//-------------------------------------------------------------------------------------------------------------------

/// One user's conversation with the bootstrap service: sign in, look up the user, start a game.
#[derive(Debug, Clone)]
pub struct TalentApi
{
    http: reqwest::Client,
    config: BootstrapConfig,
    /// `this.sid=<value>` once signed in
    cookie: Option<String>,
    user_id: Option<String>,
    phone_number: String,
}

impl TalentApi
{
    pub fn new(http: reqwest::Client, config: BootstrapConfig) -> TalentApi
    {
        TalentApi{ http, config, cookie: None, user_id: None, phone_number: String::default() }
    }

    fn url(&self, path: &str) -> String
    {
        format!("{}{}", self.config.service_endpoint.trim_end_matches('/'), path)
    }

    fn cookie(&self) -> Result<&str, BootstrapError>
    {
        self.cookie.as_deref().ok_or(BootstrapError::NotSignedIn)
    }

    /// Sign in with the user's credentials and keep the session cookie.
    pub async fn sign_in(&mut self, user: &UserRecord) -> Result<(), BootstrapError>
    {
        let mut query: Vec<(&str, &str)> = user.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        query.push(("accessId", self.config.access_id.as_str()));

        let response = self.http
            .get(self.url(SIGN_IN_PATH))
            .header("x-forwarded-proto", "https")
            .query(&query)
            .send()
            .await?;

        let cookie = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| format!("{}={}", SESSION_COOKIE, cookie.value()));
        let _ = consume(response).await?;

        let Some(cookie) = cookie else { return Err(BootstrapError::MissingCookie); };
        tracing::debug!("signed in");
        self.cookie = Some(cookie);
        self.phone_number = user.get("phoneNumber").cloned().unwrap_or_default();

        Ok(())
    }

    /// Look up the signed-in user's id.
    pub async fn information(&mut self) -> Result<String, BootstrapError>
    {
        let response = self.http
            .get(self.url(INFORMATION_PATH))
            .header(COOKIE, self.cookie()?)
            .send()
            .await?;

        let info: Information = decode(&consume(response).await?, "information")?;
        tracing::debug!(user_id = %info.user.id, "fetched user information");
        self.user_id = Some(info.user.id.clone());

        Ok(info.user.id)
    }

    /// Start a game for the signed-in user and return the config needed to play it.
    pub async fn start_game(&self, game_id: &str) -> Result<GameConfig, BootstrapError>
    {
        let Some(user_id) = &self.user_id else { return Err(BootstrapError::NotSignedIn); };

        let response = self.http
            .get(self.url(&format!("/startGame/{}/{}", user_id, game_id)))
            .header(CONTENT_TYPE, "application/json")
            .header(COOKIE, self.cookie()?)
            .send()
            .await?;

        let game_config = decode_start_game(&consume(response).await?, &self.phone_number)?;
        tracing::debug!(game = %game_config.id, room = %game_config.room_id, "game started");

        Ok(game_config)
    }

    /// Id of the signed-in user, once looked up.
    pub fn user_id(&self) -> Option<&str>
    {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool
    {
        self.cookie.is_some()
    }
}

//-------------------------------------------------------------------------------------------------------------------
