//! End-to-end agent tests against a fake streaming server

use std::time::Duration;

use integration_tests::{
    count_commands, is_command, note_event, reacted_event, spawn_agent, unreacted_event,
    wait_until, FakeServer, TEST_TOKEN,
};

const WAIT: Duration = Duration::from_secs(10);

async fn connected_server(extra: &[(&str, &str)]) -> (FakeServer, tokio::task::JoinHandle<()>) {
    let server = FakeServer::start().await.expect("Failed to start fake server");
    let config = server.config(extra).expect("Failed to build config");
    let agent = spawn_agent(tally_bot::run(config));

    assert!(
        wait_until(WAIT, || count_commands(&server.commands(), "connect") == 1).await,
        "agent never joined the timeline"
    );
    (server, agent)
}

fn has_report(server: &FakeServer, text: &str) -> bool {
    server.notes().iter().any(|n| n["text"] == text)
}

#[tokio::test]
async fn test_joins_local_timeline_with_token() {
    let (server, agent) = connected_server(&[]).await;

    let commands = server.commands();
    assert_eq!(commands[0]["type"], "connect");
    assert_eq!(commands[0]["body"]["channel"], "localTimeline");
    assert!(commands[0]["body"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(server.tokens(), vec![TEST_TOKEN.to_string()]);

    agent.abort();
}

#[tokio::test]
async fn test_new_note_is_subscribed() {
    let (server, agent) = connected_server(&[]).await;

    server.push(note_event("n1"));

    assert!(
        wait_until(WAIT, || server
            .commands()
            .iter()
            .any(|c| is_command(c, "subNote", "n1")))
        .await
    );

    agent.abort();
}

/// Push `frames` at the start of a fresh window and return that window's report
///
/// The burst takes milliseconds against a window of seconds, so starting it
/// right after a report lands keeps it inside one window.
async fn report_for_burst(server: &FakeServer, frames: &[String]) -> Option<serde_json::Value> {
    let closed = server.notes().len();
    if !wait_until(WAIT, || server.notes().len() > closed).await {
        return None;
    }

    let start = server.notes().len();
    for frame in frames {
        server.push(frame.clone());
    }
    if !wait_until(WAIT, || server.notes().len() > start).await {
        return None;
    }
    server.notes().get(start).cloned()
}

#[tokio::test]
async fn test_reactions_are_reported() {
    let (server, agent) = connected_server(&[("REPORT_INTERVAL_SECS", "3")]).await;

    let frames = [
        note_event("n1"),
        reacted_event("n1", ":fire:"),
        reacted_event("n1", ":fire@remote.example:"),
        reacted_event("n1", ":smile:"),
        reacted_event("n1", ":star:"),
        unreacted_event("n1", ":star:"),
    ];
    let report = report_for_burst(&server, &frames).await.expect("no report");

    assert_eq!(report["text"], "count=2");
    assert_eq!(report["i"], TEST_TOKEN);
    assert_eq!(report["visibility"], "public");
    assert!(server
        .commands()
        .iter()
        .any(|c| is_command(c, "subNote", "n1")));
    assert!(has_report(&server, "count=0"));

    agent.abort();
}

#[tokio::test]
async fn test_local_only_ignores_remote_reactions() {
    let (server, agent) = connected_server(&[
        ("COUNT_ALL_ORIGINS", "false"),
        ("REPORT_INTERVAL_SECS", "3"),
    ])
    .await;

    let frames = [
        note_event("n1"),
        reacted_event("n1", ":fire:"),
        reacted_event("n1", ":fire@remote.example:"),
    ];
    let report = report_for_burst(&server, &frames).await.expect("no report");

    assert_eq!(report["text"], "count=1");

    agent.abort();
}

#[tokio::test]
async fn test_failed_publish_keeps_agent_running() {
    let (server, agent) = connected_server(&[]).await;
    server.set_note_status(500);

    assert!(wait_until(WAIT, || !server.notes().is_empty()).await);
    let attempts = server.notes().len();

    // Still reporting and still following the timeline
    assert!(wait_until(WAIT, || server.notes().len() > attempts).await);
    server.push(note_event("n2"));
    assert!(
        wait_until(WAIT, || server
            .commands()
            .iter()
            .any(|c| is_command(c, "subNote", "n2")))
        .await
    );
    assert!(!agent.is_finished());
    assert_eq!(server.connections(), 1);

    agent.abort();
}

#[tokio::test]
async fn test_reconnect_replays_subscriptions() {
    let (server, agent) = connected_server(&[]).await;

    server.push(note_event("n1"));
    assert!(
        wait_until(WAIT, || server
            .commands()
            .iter()
            .any(|c| is_command(c, "subNote", "n1")))
        .await
    );

    server.drop_connections();

    assert!(
        wait_until(WAIT, || server.connections() == 2
            && count_commands(&server.commands(), "connect") == 2)
        .await,
        "agent did not reconnect"
    );
    assert!(
        wait_until(WAIT, || server
            .commands()
            .iter()
            .filter(|c| is_command(c, "subNote", "n1"))
            .count()
            == 2)
        .await,
        "subscription was not replayed"
    );

    let commands = server.commands();
    let connect_ids: Vec<_> = commands
        .iter()
        .filter(|c| c["type"] == "connect")
        .map(|c| c["body"]["id"].clone())
        .collect();
    assert_eq!(connect_ids[0], connect_ids[1]);
    assert!(!agent.is_finished());

    agent.abort();
}

#[tokio::test]
async fn test_large_replay_while_streaming() {
    const POSTS: usize = 1000;
    let (server, agent) = connected_server(&[("REPORT_INTERVAL_SECS", "3600")]).await;

    for i in 0..POSTS {
        server.push(note_event(&format!("n{i}")));
    }
    assert!(
        wait_until(WAIT, || count_commands(&server.commands(), "subNote") == POSTS).await,
        "initial subscriptions incomplete"
    );

    server.drop_connections();
    assert!(wait_until(WAIT, || server.connections() == 2).await);

    // Keep the event side busy while the replay goes out
    for i in 0..POSTS {
        server.push(reacted_event(&format!("n{i}"), ":fire:"));
    }

    assert!(
        wait_until(WAIT, || count_commands(&server.commands(), "subNote") == 2 * POSTS).await,
        "replay stalled at {} of {}",
        count_commands(&server.commands(), "subNote").saturating_sub(POSTS),
        POSTS
    );
    assert_eq!(count_commands(&server.commands(), "connect"), 2);
    assert!(!agent.is_finished());

    agent.abort();
}
