use std::net::SocketAddr;
use std::time::Duration;

use findash::event::{AppEvent, WsConnectionStatus};
use findash::kite::packet::{mode_message, subscribe_message, TickerMode, LTP_PACKET_LEN};
use findash::kite::KiteTicker;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

fn ltp_frame(token: u32, price_paise: i32) -> Vec<u8> {
    let mut packet = vec![0u8; LTP_PACKET_LEN];
    packet[0..4].copy_from_slice(&token.to_be_bytes());
    packet[4..8].copy_from_slice(&price_paise.to_be_bytes());

    let mut out = Vec::new();
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&(packet.len() as u16).to_be_bytes());
    out.extend_from_slice(&packet);
    out
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr should succeed");
    (listener, addr)
}

async fn next_event(rx: &mut mpsc::Receiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event should arrive in time")
        .expect("event channel should stay open")
}

fn ticker(addr: SocketAddr, tokens: Vec<u32>) -> KiteTicker {
    KiteTicker::new(&format!("ws://{}", addr), "key", "token", tokens)
        .expect("ticker should build")
        .with_session(7)
}

#[tokio::test]
/// Verifies the full session: control frames on connect, ticks and error frames, then shutdown.
async fn ticker_subscribes_streams_and_shuts_down() {
    let (listener, addr) = bind().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept should succeed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");

        let mut control = Vec::new();
        for _ in 0..2 {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => control.push(text),
                other => panic!("expected a text frame, got {:?}", other),
            }
        }
        ws.send(Message::Binary(ltp_frame(408065, 150_025)))
            .await
            .expect("binary send should succeed");
        ws.send(Message::Text(
            r#"{"type":"error","data":"Invalid access token"}"#.to_string(),
        ))
        .await
        .expect("text send should succeed");

        let mut closed = false;
        while let Some(msg) = ws.next().await {
            if let Ok(Message::Close(_)) = msg {
                closed = true;
                break;
            }
        }
        (control, closed)
    });

    let (tx, mut rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = ticker(addr, vec![408065]);
    let client = tokio::spawn(async move { ticker.connect_and_run(tx, shutdown_rx).await });

    match next_event(&mut rx).await {
        AppEvent::WsStatus {
            session: 7,
            status: WsConnectionStatus::Connected,
        } => {}
        other => panic!("expected connected, got {:?}", other),
    }
    match next_event(&mut rx).await {
        AppEvent::Ticks { session, ticks } => {
            assert_eq!(session, 7);
            assert_eq!(ticks.len(), 1);
            assert_eq!(ticks[0].instrument_token, 408065);
            assert!((ticks[0].last_price - 1500.25).abs() < 1e-9);
        }
        other => panic!("expected ticks, got {:?}", other),
    }
    match next_event(&mut rx).await {
        AppEvent::Error(msg) => assert_eq!(msg, "Ticker: Invalid access token"),
        other => panic!("expected ticker error, got {:?}", other),
    }

    shutdown_tx.send(true).expect("shutdown should succeed");
    match next_event(&mut rx).await {
        AppEvent::WsStatus {
            session: 7,
            status: WsConnectionStatus::Disconnected,
        } => {}
        other => panic!("expected disconnected, got {:?}", other),
    }

    client
        .await
        .expect("ticker task should not panic")
        .expect("ticker should stop cleanly");
    let (control, closed) = server.await.expect("server task should not panic");
    assert_eq!(control[0], subscribe_message(&[408065]));
    assert_eq!(control[1], mode_message(TickerMode::Full, &[408065]));
    assert!(closed);
}

#[tokio::test]
async fn empty_token_list_sends_no_control_frames() {
    let (listener, addr) = bind().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept should succeed");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");
        ws.next().await
    });

    let (tx, mut rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = ticker(addr, Vec::new());
    let client = tokio::spawn(async move { ticker.connect_and_run(tx, shutdown_rx).await });

    assert!(matches!(
        next_event(&mut rx).await,
        AppEvent::WsStatus {
            status: WsConnectionStatus::Connected,
            ..
        }
    ));
    shutdown_tx.send(true).expect("shutdown should succeed");

    // the close frame is the first thing the server hears
    let first = server.await.expect("server task should not panic");
    assert!(matches!(first, Some(Ok(Message::Close(_)))), "got {:?}", first);
    client
        .await
        .expect("ticker task should not panic")
        .expect("ticker should stop cleanly");
}

#[tokio::test]
/// Verifies a dropped connection schedules a reconnect after one second and shutdown cancels the wait.
async fn dropped_connection_backs_off_until_shutdown() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept should succeed");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed");
        drop(ws);
    });

    let (tx, mut rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = ticker(addr, Vec::new());
    let client = tokio::spawn(async move { ticker.connect_and_run(tx, shutdown_rx).await });

    assert!(matches!(
        next_event(&mut rx).await,
        AppEvent::WsStatus {
            status: WsConnectionStatus::Connected,
            ..
        }
    ));
    assert!(matches!(
        next_event(&mut rx).await,
        AppEvent::WsStatus {
            status: WsConnectionStatus::Disconnected,
            ..
        }
    ));
    match next_event(&mut rx).await {
        AppEvent::LogMessage(msg) => assert!(msg.starts_with("Ticker error:"), "{}", msg),
        other => panic!("expected error log, got {:?}", other),
    }
    match next_event(&mut rx).await {
        AppEvent::WsStatus {
            session: 7,
            status: WsConnectionStatus::Reconnecting { attempt, delay_ms },
        } => {
            assert_eq!(attempt, 1);
            assert_eq!(delay_ms, 1_000);
        }
        other => panic!("expected reconnecting, got {:?}", other),
    }

    shutdown_tx.send(true).expect("shutdown should succeed");
    match next_event(&mut rx).await {
        AppEvent::LogMessage(msg) => assert_eq!(msg, "Ticker stopped during reconnect"),
        other => panic!("expected stop log, got {:?}", other),
    }
    client
        .await
        .expect("ticker task should not panic")
        .expect("ticker should stop cleanly");
}
