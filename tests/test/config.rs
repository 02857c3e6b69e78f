//local shortcuts
use cometd_stress::*;

//third-party shortcuts
use serde_json::json;

//standard shortcuts
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn game_config_uses_wire_names()
{
    let config: GameConfig = serde_json::from_value(json!({
            "id"          : "backpack",
            "playerId"    : 3,
            "roomId"      : "r-1",
            "server"      : "gs.example.com/gameserver-0",
            "gameurl"     : "https://games.example.com/backpack",
            "phoneNumber" : "5550100",
        })).unwrap();

    assert_eq!(config.id, "backpack");
    assert_eq!(config.player_id, 3);
    assert_eq!(config.room_id, "r-1");
    assert_eq!(config.game_url, "https://games.example.com/backpack");
    assert_eq!(config.phone_number, "5550100");
    assert!(config.validate().is_ok());
    assert_eq!(serde_json::to_value(&config).unwrap()["playerId"], 3);
}

#[test]
fn game_config_validation()
{
    let config = GameConfig{ player_id: 1, server: String::from("gs"), ..Default::default() };
    assert!(config.validate().is_ok());
    assert!(matches!(GameConfig{ player_id: -1, ..config.clone() }.validate(), Err(SessionError::InvalidConfig(_))));
    assert!(matches!(GameConfig{ server: String::new(), ..config }.validate(), Err(SessionError::InvalidConfig(_))));
}

#[test]
fn endpoint_url_appends_the_cometd_path()
{
    let config = EngineConfig::default();
    assert_eq!(
            config.endpoint_url("gs.example.com/gameserver-0").unwrap().as_str(),
            "wss://gs.example.com/gameserver-0/game-server/cometd"
        );

    let config = EngineConfig{ with_tls: false, ..Default::default() };
    assert_eq!(config.endpoint_url("127.0.0.1:8080/").unwrap().as_str(), "ws://127.0.0.1:8080/game-server/cometd");
    assert!(matches!(config.endpoint_url("bad host"), Err(SessionError::InvalidConfig(_))));
}

#[test]
fn engine_defaults()
{
    let config = EngineConfig::default();
    assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
    assert_eq!(config.game_setup_delay, Duration::from_secs(1));
    assert!(config.await_join_ack);
    assert_eq!(config.room_channel, DEFAULT_ROOM_CHANNEL);
    assert_eq!(config.game_channel, DEFAULT_GAME_CHANNEL);
    assert_eq!(config.strategy.backpack_delay_min, Duration::from_secs(5));
    assert_eq!(config.strategy.backpack_delay_max, Duration::from_secs(9));
    assert_eq!(config.strategy.airport_delay, Duration::from_secs(10));
}

//-------------------------------------------------------------------------------------------------------------------
