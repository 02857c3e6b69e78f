//local shortcuts
use cometd_stress::*;

//third-party shortcuts
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

//standard shortcuts
use std::path::{Path, PathBuf};
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "cometd-stress")]
#[command(about = "Drive concurrent virtual players against a CometD game backend")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct LoadArgs
{
    /// Number of tasks to run
    #[arg(short = 'n', long, default_value_t = 1)]
    number: usize,

    /// Number of parallel workers
    #[arg(short = 'c', long, default_value_t = 1)]
    concurrency: usize,

    /// Max task starts per second, 0 for no limit
    #[arg(short = 'l', long, default_value_t = 0)]
    limit: u32,
}

impl LoadArgs
{
    fn stress_config(&self, total: usize) -> StressConfig
    {
        StressConfig{
                total,
                concurrency : self.concurrency,
                rate_limit  : (self.limit > 0).then(|| RateLimitConfig::per_second(self.limit)),
                ..Default::default()
            }
    }
}

#[derive(Args, Debug, Clone)]
struct EngineArgs
{
    /// Connect with ws:// instead of wss://
    #[arg(long)]
    no_tls: bool,

    /// Do not wait for the server to acknowledge the room join
    #[arg(long)]
    no_join_ack: bool,

    /// Heartbeat interval in seconds
    #[arg(long, default_value_t = 15)]
    heartbeat_secs: u64,
}

impl EngineArgs
{
    fn engine_config(&self) -> EngineConfig
    {
        EngineConfig{
                with_tls           : !self.no_tls,
                await_join_ack     : !self.no_join_ack,
                heartbeat_interval : std::time::Duration::from_secs(self.heartbeat_secs),
                ..Default::default()
            }
    }
}

#[derive(Subcommand, Debug)]
enum Command
{
    /// Play game sessions against a known server, room and player
    Play
    {
        /// Game id
        #[arg(short = 'g', long, default_value = GAME_BACKPACK)]
        game: String,

        /// Game server address, e.g. gameserver.example.com/gameserver-0
        #[arg(long)]
        server: String,

        #[arg(long)]
        player_id: i64,

        #[arg(long)]
        room_id: String,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Sign in each user, start a game for them and play it
    Talent
    {
        /// JSON file with the user list
        #[arg(short = 'f', long)]
        filepath: PathBuf,

        /// Game id
        #[arg(short = 'g', long, default_value = GAME_BACKPACK)]
        game: String,

        /// Bootstrap service base url
        #[arg(long, env = "TALENT_ENDPOINT")]
        endpoint: Option<String>,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Sign in each user
    Signin
    {
        /// JSON file with the user list
        #[arg(short = 'f', long)]
        filepath: PathBuf,

        /// Bootstrap service base url
        #[arg(long, env = "TALENT_ENDPOINT")]
        endpoint: Option<String>,

        #[command(flatten)]
        load: LoadArgs,
    },
}

//-------------------------------------------------------------------------------------------------------------------

fn bootstrap_config(endpoint: Option<String>) -> BootstrapConfig
{
    let mut config = BootstrapConfig::default();
    if let Some(endpoint) = endpoint { config.service_endpoint = endpoint; }
    config
}

fn load_user_list(path: &Path) -> anyhow::Result<Arc<Vec<UserRecord>>>
{
    if !path.exists() { bail!("file not exists <{}>", path.display()); }
    let users = load_users(path).context("open user list failed")?;
    if users.is_empty() { bail!("no user loaded"); }
    tracing::info!("loaded {} users", users.len());

    Ok(Arc::new(users))
}

fn connector() -> Arc<dyn Connector>
{
    Arc::new(WebsocketConnector::default())
}

//-------------------------------------------------------------------------------------------------------------------

async fn play(game_config: GameConfig, engine_config: EngineConfig, load: LoadArgs) -> anyhow::Result<SerialTaskResult>
{
    // fail fast on configs no session could use
    game_config.validate()?;
    if PlayerStrategy::for_game(&game_config.id, &engine_config.strategy).is_none()
    {
        bail!("unknown game <{}>, expected one of {:?}", game_config.id, KNOWN_GAMES);
    }

    let client = StressClient::new(load.stress_config(load.number));
    println!("{}\n", client.header());

    let runner = Arc::new(SessionRunner::new(connector(), engine_config));
    let game_config = Arc::new(game_config);
    let totals = client.run(move |_|
        {
            let runner = runner.clone();
            let game_config = game_config.clone();
            async move { runner.run((*game_config).clone()).await }
        }
    ).await;

    Ok(totals)
}

async fn talent(
    users         : Arc<Vec<UserRecord>>,
    game_id       : String,
    bootstrap     : BootstrapConfig,
    engine_config : EngineConfig,
    load          : LoadArgs,
) -> anyhow::Result<SerialTaskResult>
{
    let http = http_client()?;
    let client = StressClient::new(load.stress_config(users.len()));
    println!("{}\n", client.header());

    let runner = Arc::new(SessionRunner::new(connector(), engine_config));
    let totals = client.run_multi(move |context: WorkerContext|
        {
            let users = users.clone();
            let runner = runner.clone();
            let http = http.clone();
            let bootstrap = bootstrap.clone();
            let game_id = game_id.clone();
            async move {
                while let Some(index) = context.next_task().await
                {
                    let mut api = TalentApi::new(http.clone(), bootstrap.clone());

                    let result = TaskResult::timed("signin", api.sign_in(&users[index])).await;
                    let success = result.success;
                    context.submit(result).await;
                    if !success { continue; }

                    let result = TaskResult::timed("information", async { api.information().await.map(|_| ()) }).await;
                    let success = result.success;
                    context.submit(result).await;
                    if !success { continue; }

                    let mut game_config = None;
                    let result = TaskResult::timed("startGame",
                            async { api.start_game(&game_id).await.map(|config| { game_config = Some(config); }) }
                        ).await;
                    context.submit(result).await;
                    let Some(game_config) = game_config else { continue; };

                    context.submit(runner.run(game_config).await).await;
                }
            }
        }
    ).await;

    Ok(totals)
}

async fn signin(users: Arc<Vec<UserRecord>>, bootstrap: BootstrapConfig, load: LoadArgs) -> anyhow::Result<SerialTaskResult>
{
    let http = http_client()?;
    let client = StressClient::new(load.stress_config(users.len()));
    println!("{}\n", client.header());

    let totals = client.run(move |index|
        {
            let users = users.clone();
            let mut api = TalentApi::new(http.clone(), bootstrap.clone());
            async move { TaskResult::timed("signin", api.sign_in(&users[index])).await }
        }
    ).await;

    Ok(totals)
}

//-------------------------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let _totals = match cli.command
    {
        Command::Play{ game, server, player_id, room_id, engine, load } =>
        {
            let game_config = GameConfig{
                    id       : game,
                    player_id,
                    room_id,
                    server,
                    game_url : String::from("default"),
                    ..Default::default()
                };
            play(game_config, engine.engine_config(), load).await?
        }
        Command::Talent{ filepath, game, endpoint, engine, load } =>
        {
            let users = load_user_list(&filepath)?;
            if PlayerStrategy::for_game(&game, &StrategyConfig::default()).is_none()
            {
                bail!("unknown game <{}>, expected one of {:?}", game, KNOWN_GAMES);
            }
            talent(users, game, bootstrap_config(endpoint), engine.engine_config(), load).await?
        }
        Command::Signin{ filepath, endpoint, load } =>
        {
            let users = load_user_list(&filepath)?;
            signin(users, bootstrap_config(endpoint), load).await?
        }
    };

    Ok(())
}

//-------------------------------------------------------------------------------------------------------------------
