//! End-to-end session tests against an in-process WebSocket server.
//!
//! The server side plays the hosted agent service: it accepts the
//! conversation, requests client tool invocations, and checks the results
//! that come back over the wire.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use murmur::config::AgentConfig;
use murmur::session::{AgentMode, ConversationSession, SessionEvent};
use murmur::tools::notes::note_tool_registry;
use murmur::vault::Vault;

const WAIT: Duration = Duration::from_secs(5);

/// Bind a local listener and return it with an agent config pointed at it.
async fn local_agent() -> (TcpListener, AgentConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let agent = AgentConfig {
        agent_id: "agent-e2e".into(),
        endpoint: format!("ws://{addr}/ws"),
        new_note_name: "New Note.md".into(),
    };
    (listener, agent)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(WAIT, rx.recv()).await.unwrap().unwrap()
}

/// Read the next text frame from the server's side of the socket.
async fn next_text<S>(read: &mut S) -> serde_json::Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = timeout(WAIT, read.next()).await.unwrap().unwrap().unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn full_session_flow() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(Vault::open(dir.path()).unwrap());
    vault
        .create_file(Path::new("Grocery List.md"), "milk, eggs")
        .unwrap();

    let (listener, agent) = local_agent().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (mut write, mut read) = ws.split();

        // The client opens with the initiation message.
        let initiation = next_text(&mut read).await;
        assert_eq!(initiation["type"], "conversation_initiation");
        assert_eq!(initiation["agent_id"], "agent-e2e");

        write
            .send(Message::Text(
                r#"{"type":"conversation_initiation_metadata","conversation_id":"c-1"}"#.into(),
            ))
            .await
            .unwrap();

        // getNote round trip.
        write
            .send(Message::Text(
                r#"{"type":"client_tool_call","tool_name":"getNote","tool_call_id":"t-1","parameters":{"noteName":"Grocery List"}}"#.into(),
            ))
            .await
            .unwrap();
        let result = next_text(&mut read).await;
        assert_eq!(result["type"], "client_tool_result");
        assert_eq!(result["tool_call_id"], "t-1");
        assert_eq!(result["result"], "milk, eggs");
        assert_eq!(result["is_error"], false);

        // saveNote writes into the vault.
        write
            .send(Message::Text(
                r#"{"type":"client_tool_call","tool_name":"saveNote","tool_call_id":"t-2","parameters":{"message":"buy flowers"}}"#.into(),
            ))
            .await
            .unwrap();
        let result = next_text(&mut read).await;
        assert_eq!(result["tool_call_id"], "t-2");
        assert_eq!(result["is_error"], false);

        // getListOfNotes sees both files.
        write
            .send(Message::Text(
                r#"{"type":"client_tool_call","tool_name":"getListOfNotes","tool_call_id":"t-3"}"#
                    .into(),
            ))
            .await
            .unwrap();
        let result = next_text(&mut read).await;
        let titles = result["result"].as_str().unwrap().to_owned();
        assert_eq!(titles.split(", ").count(), 2);
        assert!(titles.contains("Grocery List"));
        assert!(titles.contains("New Note"));

        // Mode change and keepalive.
        write
            .send(Message::Text(
                r#"{"type":"mode_change","mode":"speaking"}"#.into(),
            ))
            .await
            .unwrap();
        write
            .send(Message::Text(r#"{"type":"ping","event_id":7}"#.into()))
            .await
            .unwrap();
        let pong = next_text(&mut read).await;
        assert_eq!(pong["type"], "pong");
        assert_eq!(pong["event_id"], 7);

        // Server ends the conversation.
        write.send(Message::Close(None)).await.unwrap();
    });

    let tools = Arc::new(note_tool_registry(Arc::clone(&vault), "New Note.md"));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _session = ConversationSession::start(&agent, tools, tx).await.unwrap();

    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Connected {
            conversation_id: "c-1".into()
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::ModeChanged(AgentMode::Speaking)
    );
    assert_eq!(next_event(&mut rx).await, SessionEvent::Disconnected);

    timeout(WAIT, server).await.unwrap().unwrap();

    // The saveNote tool call landed in the vault.
    assert_eq!(
        vault.read_file(Path::new("New Note.md")).unwrap(),
        "buy flowers"
    );
}

#[tokio::test]
async fn end_session_closes_connection() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(Vault::open(dir.path()).unwrap());
    let (listener, agent) = local_agent().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (_write, mut read) = ws.split();

        // Initiation, then the close triggered by end_session.
        let initiation = next_text(&mut read).await;
        assert_eq!(initiation["type"], "conversation_initiation");
        loop {
            match timeout(WAIT, read.next()).await.unwrap() {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            }
        }
    });

    let tools = Arc::new(note_tool_registry(vault, "New Note.md"));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = ConversationSession::start(&agent, tools, tx).await.unwrap();

    session.end_session();
    // Ending again is a no-op.
    session.end_session();

    assert_eq!(next_event(&mut rx).await, SessionEvent::Disconnected);
    timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn dropping_session_handle_ends_it() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Arc::new(Vault::open(dir.path()).unwrap());
    let (listener, agent) = local_agent().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    let tools = Arc::new(note_tool_registry(vault, "New Note.md"));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ConversationSession::start(&agent, tools, tx).await.unwrap();

    drop(session);
    assert_eq!(next_event(&mut rx).await, SessionEvent::Disconnected);
}
