//local shortcuts
use crate::mock_server::*;
use cometd_stress::*;

//third-party shortcuts

//standard shortcuts
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

fn publish(n: u64) -> OutboundMessage
{
    OutboundMessage::Publish{ channel: room_channel(), data: serde_json::json!({ "n": n }) }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn only_the_handshake_goes_out_before_a_client_id()
{
    let (sink, _stream) = MockSink::new(silent_script());
    let outbound = Outbound::new(sink.clone());

    assert!(matches!(outbound.send(OutboundMessage::Connect), Err(SessionError::Protocol(_))));
    assert!(matches!(outbound.send(publish(0)), Err(SessionError::Protocol(_))));
    assert_eq!(outbound.last_id(), 0);

    assert_eq!(outbound.send(OutboundMessage::Handshake), Ok(1));
    outbound.set_client_id(String::from(CLIENT_ID)).unwrap();
    assert_eq!(outbound.send(OutboundMessage::Connect), Ok(2));
    assert_eq!(outbound.client_id().as_deref(), Some(CLIENT_ID));

    let sent = sink.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1]["clientId"], CLIENT_ID);
    assert_eq!(sent[1]["connectionType"], "websocket");
}

#[test]
fn client_id_is_fixed_once_assigned()
{
    let (sink, _stream) = MockSink::new(silent_script());
    let outbound = Outbound::new(sink);

    outbound.set_client_id(String::from(CLIENT_ID)).unwrap();
    outbound.set_client_id(String::from(CLIENT_ID)).unwrap();
    assert!(matches!(outbound.set_client_id(String::from("other")), Err(SessionError::Protocol(_))));
    assert_eq!(outbound.client_id().as_deref(), Some(CLIENT_ID));
}

#[test]
fn failed_send_does_not_consume_an_id()
{
    let (sink, _stream) = MockSink::new(silent_script());
    let outbound = Outbound::new(sink.clone());
    assert_eq!(outbound.send(OutboundMessage::Handshake), Ok(1));

    // the transport dies underneath the session
    FrameSink::close(sink.as_ref());
    assert!(outbound.send(OutboundMessage::Handshake).is_err());
    assert_eq!(outbound.last_id(), 1);
    assert!(!outbound.is_closed());
}

#[test]
fn closed_outbound_refuses_sends()
{
    let (sink, _stream) = MockSink::new(silent_script());
    let outbound = Outbound::new(sink.clone());

    assert!(outbound.close());
    assert!(!outbound.close());
    assert!(outbound.is_closed());
    assert!(sink.is_closed());
    assert_eq!(
            outbound.send(OutboundMessage::Handshake),
            Err(SessionError::Connection(TransportError::Closed))
        );
}

#[test]
fn concurrent_senders_get_contiguous_ids()
{
    let (sink, _stream) = MockSink::new(silent_script());
    let outbound = Arc::new(Outbound::new(sink.clone()));
    outbound.set_client_id(String::from(CLIENT_ID)).unwrap();

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let outbound = outbound.clone();
            std::thread::spawn(move || for n in 0..100 { outbound.send(publish(n)).unwrap(); })
        })
        .collect();
    for thread in threads { thread.join().unwrap(); }

    // the sink sees frames in the order ids were assigned
    let ids: Vec<u64> = sink.sent().iter().map(message_id).collect();
    assert_eq!(ids, (1..=400).collect::<Vec<u64>>());
    assert_eq!(outbound.last_id(), 400);
}

//-------------------------------------------------------------------------------------------------------------------
