//! End-to-end session tests against a local WebSocket peer.
//!
//! Each test binds a throwaway `tokio-tungstenite` peer on an ephemeral port,
//! runs a short scripted exchange and reports what the peer saw.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message;
use webchat::{ChatSession, CloseReason, Layout, MessageList, RenderConfig, ScrollStrategy, SessionState, SubmitOutcome};

/// What the peer observed from the client.
#[derive(Debug, Default)]
struct PeerLog {
    texts: Vec<String>,
    saw_close: bool,
}

/// Peer that greets, echoes each client text back with a fixed timestamp
/// `echo_limit` times, then closes.
async fn spawn_echo_peer(greeting: &'static str, echo_limit: usize) -> (String, JoinHandle<PeerLog>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
        let mut log = PeerLog::default();

        ws.send(Message::Text(greeting.into())).await.expect("greet");

        while log.texts.len() < echo_limit {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let body = text.as_str().to_owned();
                    ws.send(Message::Text(frames::encode_frame("12:01", &body).into())).await.expect("echo");
                    log.texts.push(body);
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                    log.saw_close = true;
                    return log;
                }
                Some(Ok(_)) => {}
            }
        }

        ws.close(None).await.expect("close");
        while let Some(Ok(_)) = ws.next().await {}
        log
    });

    (format!("ws://{addr}/ws/"), handle)
}

/// Peer that greets, then records everything until the client goes away.
async fn spawn_listening_peer(greeting: &'static str) -> (String, JoinHandle<PeerLog>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
        let mut log = PeerLog::default();

        ws.send(Message::Text(greeting.into())).await.expect("greet");

        while let Some(message) = ws.next().await {
            match message {
                Ok(Message::Text(text)) => log.texts.push(text.as_str().to_owned()),
                Ok(Message::Close(_)) | Err(_) => {
                    log.saw_close = true;
                    break;
                }
                Ok(_) => {}
            }
        }
        log
    });

    (format!("ws://{addr}/ws/"), handle)
}

async fn step(session: &mut ChatSession<MessageList>) -> bool {
    timeout(Duration::from_secs(5), session.process_next())
        .await
        .expect("inbound event timed out")
}

#[tokio::test]
async fn connect_receive_submit_and_peer_close() {
    let (url, peer) = spawn_echo_peer("12:00|Hi", 1).await;

    let mut session = ChatSession::new(RenderConfig::bubble(), MessageList::new(Layout::Bubble));
    let closes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&closes);
    session.on_close(move |reason| sink.lock().expect("lock").push(reason.clone()));

    session.open(&url).await.expect("open");
    assert_eq!(session.state(), SessionState::Connected);

    // Server greeting renders as one entry with time label and body.
    assert!(step(&mut session).await);
    assert_eq!(session.view().len(), 1);
    let first = session.view().last().expect("entry");
    assert_eq!(first.element.find_by_class("message-data-time").map(|e| e.text.as_str()), Some("12:00"));
    assert_eq!(first.element.find_by_class("my-message").map(|e| e.text.as_str()), Some("Hi"));
    let scroll = session.view().scroll_state();
    assert_eq!(scroll.revealed, Some(0));
    assert_eq!(scroll.last_strategy, Some(ScrollStrategy::IntoView));

    // Submitting sends the raw text and clears the input.
    session.input_mut().set_value("hello");
    assert_eq!(session.submit(), SubmitOutcome::Sent);
    assert_eq!(session.input().value(), "");

    assert!(step(&mut session).await);
    assert_eq!(session.view().len(), 2);
    assert_eq!(session.view().entries()[1].meta, "12:01");
    assert_eq!(session.view().entries()[1].body, "hello");

    // Peer close ends the session for good.
    assert!(!step(&mut session).await);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(session.submit_text("late"), SubmitOutcome::NotConnected);
    assert!(matches!(closes.lock().expect("lock").as_slice(), [CloseReason::PeerClosed { .. }]));

    let log = timeout(Duration::from_secs(5), peer).await.expect("peer timed out").expect("peer task");
    assert_eq!(log.texts, ["hello"]);
}

#[tokio::test]
async fn frames_render_in_delivery_order_over_the_wire() {
    let (url, peer) = spawn_echo_peer("#112233|start", 3).await;

    let mut session = ChatSession::new(RenderConfig::flat(), MessageList::new(Layout::Flat));
    session.open(&url).await.expect("open");
    assert!(step(&mut session).await);

    for body in ["one", "two", "three"] {
        assert!(session.submit_text(body).is_sent());
    }
    for _ in 0..3 {
        assert!(step(&mut session).await);
    }

    let bodies: Vec<_> = session.view().entries().iter().map(|e| e.body.as_str()).collect();
    assert_eq!(bodies, ["start", "one", "two", "three"]);
    assert_eq!(session.view().entries()[0].element.style.as_deref(), Some("color: #112233"));

    session.run().await;
    let log = timeout(Duration::from_secs(5), peer).await.expect("peer timed out").expect("peer task");
    assert_eq!(log.texts, ["one", "two", "three"]);
}

#[tokio::test]
async fn client_close_flushes_and_sends_close_frame() {
    let (url, peer) = spawn_listening_peer("12:00|Hi").await;

    let mut session = ChatSession::new(RenderConfig::bubble(), MessageList::new(Layout::Bubble));
    session.open(&url).await.expect("open");
    assert!(step(&mut session).await);

    assert!(session.submit_text("bye").is_sent());
    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);

    let log = timeout(Duration::from_secs(5), peer).await.expect("peer timed out").expect("peer task");
    assert_eq!(log.texts, ["bye"]);
    assert!(log.saw_close);
}

#[tokio::test]
async fn open_failure_leaves_session_disconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut session = ChatSession::new(RenderConfig::bubble(), MessageList::new(Layout::Bubble));
    assert!(session.open(&format!("ws://{addr}/ws/")).await.is_err());
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(session.submit_text("x"), SubmitOutcome::NotConnected);
}
