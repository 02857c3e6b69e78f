//local shortcuts
use cometd_stress::*;

//third-party shortcuts
use serde_json::{json, Value};

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn decode_frame_with_several_messages()
{
    let text = r#"[
            {"channel":"/meta/connect","successful":true,"id":"4"},
            {"channel":"/game","data":{"event":"GAME_ENDED"},"ext":{"x":1}}
        ]"#;
    let envelopes = decode_frame(text, "test").unwrap();
    assert_eq!(envelopes.len(), 2);
    assert!(envelopes[0].is_heartbeat());
    assert_eq!(envelopes[0].successful, Some(true));
    assert_eq!(envelopes[0].id, Some(json!("4")));
    assert!(!envelopes[1].is_heartbeat());
    assert_eq!(envelopes[1].data_or_null()["event"], "GAME_ENDED");
    assert_eq!(envelopes[1].ext, Some(json!({ "x": 1 })));
}

#[test]
fn decode_frame_failures()
{
    assert!(matches!(decode_frame("{", "test"), Err(SessionError::Decode(_))));
    assert!(matches!(decode_frame(r#"{"channel":"/game"}"#, "test"), Err(SessionError::Decode(_))));
    assert!(matches!(decode_frame("[]", "test"), Err(SessionError::Protocol(_))));
    assert!(matches!(
            decode_frame(r#"[{"channel":"/game"},{"channel":"/game","error":"402::unknown"}]"#, "test"),
            Err(SessionError::Protocol(_))
        ));

    // an empty error field is not an error
    assert!(decode_frame(r#"[{"channel":"/game","error":""}]"#, "test").is_ok());
}

#[test]
fn missing_data_reads_as_null()
{
    let envelopes = decode_frame(r#"[{"channel":"/gameroom"}]"#, "test").unwrap();
    assert_eq!(envelopes[0].data_or_null(), &Value::Null);
}

#[test]
fn channel_validation_names_the_received_channel()
{
    let envelope = Envelope{ channel: String::from("/meta/connect"), ..Default::default() };
    assert!(validate_channel(&envelope, "handshake", "/meta/connect").is_ok());
    assert_eq!(
            validate_channel(&envelope, "handshake", "/meta/handshake"),
            Err(SessionError::Protocol(String::from("handshake receive channel incorrect: /meta/connect")))
        );
}

#[test]
fn encoded_handshake_negotiates_websocket()
{
    let frame: Value = serde_json::from_str(&OutboundMessage::Handshake.encode(1, "").unwrap()).unwrap();
    let message = &frame.as_array().unwrap()[0];
    assert_eq!(frame.as_array().unwrap().len(), 1);
    assert_eq!(message["id"], "1");
    assert_eq!(message["channel"], HANDSHAKE_CHANNEL);
    assert_eq!(message["version"], "1.0");
    assert_eq!(message["minimumVersion"], "1.0");
    assert_eq!(message["supportedConnectionTypes"][0], "websocket");
    assert_eq!(message["advice"]["timeout"], 60000);
    assert_eq!(message["ext"]["ack"], true);
    assert!(message.get("clientId").is_none());
}

#[test]
fn encoded_publish_carries_client_id_and_payload()
{
    let action = PlayerAction::new("QUIT", 3, vec![json!(2), json!(0)]);
    let message = OutboundMessage::Publish{
            channel : game_service_channel("g-9"),
            data    : serde_json::to_value(&action).unwrap(),
        };
    let frame: Value = serde_json::from_str(&message.encode(12, "abc").unwrap()).unwrap();
    assert_eq!(frame, json!([{
            "id"       : "12",
            "channel"  : "/service/game/g-9",
            "clientId" : "abc",
            "data"     : { "action": "QUIT", "player": 3, "data": [2, 0] },
        }]));
}

#[test]
fn room_actions_name_room_and_player()
{
    let config = GameConfig{ room_id: String::from("r-1"), player_id: 5, ..Default::default() };
    assert_eq!(room_service_channel("r-1"), "/service/gameroom/r-1");
    assert_eq!(serde_json::to_value(RoomAction::join(&config)).unwrap(), json!({ "action": "join", "room": "r-1", "user": 5 }));
    assert_eq!(serde_json::to_value(RoomAction::leave(&config)).unwrap(), json!({ "action": "leave", "room": "r-1", "user": 5 }));
}

#[test]
fn room_event_fields_sit_beside_the_event_name()
{
    let data = json!({ "event": "USER_JOINED", "active": true, "room": "r-1", "user": 5 });
    assert_eq!(
            RoomEvent::decode(&data).unwrap(),
            RoomEvent::UserJoined(UserJoinedMsg{ active: true, room: Some(String::from("r-1")), user: Some(5) })
        );
    assert_eq!(RoomEvent::decode(&json!({ "event": "UNAVAILABLE" })).unwrap(), RoomEvent::Unavailable);
    assert_eq!(
            RoomEvent::decode(&json!({ "event": "NEW_THING" })).unwrap(),
            RoomEvent::Unknown(String::from("NEW_THING"))
        );
}

#[test]
fn game_event_payloads_sit_under_data()
{
    let header: EventHeader = serde_json::from_value(json!({
            "event" : "PLAYER_UPDATED",
            "data"  : { "playerNumber": 4, "moves": ["ADD", "QUIT"] },
        })).unwrap();
    let GameEvent::PlayerUpdated(msg) = GameEvent::decode(&header).unwrap() else { panic!("expected player update") };
    assert_eq!(msg.player_number, 4);
    assert!(msg.offers("QUIT"));
    assert!(!msg.offers("CHOOSE"));

    let header: EventHeader = serde_json::from_value(json!({ "event": "GAME_ENDED" })).unwrap();
    assert_eq!(GameEvent::decode(&header).unwrap(), GameEvent::GameEnded);
}

//-------------------------------------------------------------------------------------------------------------------
