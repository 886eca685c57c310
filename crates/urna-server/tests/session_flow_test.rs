//! End-to-end session tests over loopback TCP.
//!
//! Each test binds a real server on an ephemeral port and drives it with
//! raw protocol clients, exercising the full acceptor → session → tally
//! path the way production connections do.

use std::net::SocketAddr;

use tokio::net::TcpStream;
use urna_proto::{ServerMessage, WireError, wire};
use urna_server::{Server, ServerConfig};

/// Bind a server on an ephemeral loopback port and run it in the
/// background. The task dies with the test runtime.
async fn start_server(candidates: &[&str]) -> SocketAddr {
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        candidates: candidates.iter().map(ToString::to_string).collect(),
    };

    let server = Server::bind(config).await.expect("server should bind");
    let addr = server.local_addr().expect("server should report its address");

    tokio::spawn(server.run());

    addr
}

/// A raw protocol client for driving the server in tests.
struct TestClient {
    stream: TcpStream,
}

impl TestClient {
    /// Connect and send the name announce.
    async fn connect(addr: SocketAddr, name: &str) -> Self {
        let mut stream = TcpStream::connect(addr).await.expect("client should connect");
        wire::write_string(&mut stream, name).await.expect("name announce should send");
        Self { stream }
    }

    async fn send_selector(&mut self, selector: i32) {
        wire::write_i32(&mut self.stream, selector).await.expect("selector should send");
    }

    async fn send_choice(&mut self, choice: i32) {
        wire::write_i32(&mut self.stream, choice).await.expect("choice should send");
    }

    async fn read_message(&mut self) -> ServerMessage {
        ServerMessage::read_from(&mut self.stream).await.expect("server should send a message")
    }

    /// Request the ballot, returning the labels.
    async fn request_options(&mut self) -> Vec<String> {
        self.send_selector(1).await;
        match self.read_message().await {
            ServerMessage::Options(labels) => labels,
            other => panic!("expected options header, got {other:?}"),
        }
    }

    /// Request results, returning the formatted line.
    async fn request_results(&mut self) -> String {
        self.send_selector(2).await;
        match self.read_message().await {
            ServerMessage::Results(line) => line,
            other => panic!("expected results header, got {other:?}"),
        }
    }

    /// Cast a full vote and assert the `OK` + `ENDED` acknowledgement.
    async fn vote(&mut self, choice: i32) {
        self.request_options().await;
        self.send_choice(choice).await;
        assert_eq!(self.read_message().await, ServerMessage::VoteAccepted);
        assert_eq!(self.read_message().await, ServerMessage::TurnEnded);
    }

    /// Assert the server has closed this connection.
    async fn assert_closed(&mut self) {
        let result = ServerMessage::read_from(&mut self.stream).await;
        assert!(
            matches!(result, Err(WireError::ConnectionClosed)),
            "expected closed connection, got {result:?}"
        );
    }
}

#[tokio::test]
async fn full_vote_flow_receives_ok_then_ended_then_close() {
    let addr = start_server(&["Pepe", "Isra", "Luison"]).await;
    let mut client = TestClient::connect(addr, "ana").await;

    let labels = client.request_options().await;
    assert_eq!(labels, ["1. Pepe", "2. Isra", "3. Luison"]);

    client.send_choice(1).await;
    assert_eq!(client.read_message().await, ServerMessage::VoteAccepted);
    assert_eq!(client.read_message().await, ServerMessage::TurnEnded);

    // One vote per connection: the session is gone after ENDED, so a
    // further selector is never answered.
    client.send_selector(2).await;
    client.assert_closed().await;
}

#[tokio::test]
async fn results_before_voting_are_all_zero_and_session_can_still_vote() {
    let addr = start_server(&["Pepe", "Isra", "Luison"]).await;
    let mut client = TestClient::connect(addr, "bruno").await;

    let line = client.request_results().await;
    assert_eq!(line, "Pepe: 0.00%  Isra: 0.00%  Luison: 0.00%");

    client.vote(2).await;
    client.assert_closed().await;
}

#[tokio::test]
async fn invalid_menu_selector_is_answered_and_session_continues() {
    let addr = start_server(&["Pepe", "Isra"]).await;
    let mut client = TestClient::connect(addr, "carla").await;

    client.send_selector(9).await;
    assert!(matches!(client.read_message().await, ServerMessage::Error(_)));

    client.send_selector(0).await;
    assert!(matches!(client.read_message().await, ServerMessage::Error(_)));

    // Still in the menu loop.
    let line = client.request_results().await;
    assert_eq!(line, "Pepe: 0.00%  Isra: 0.00%");
}

#[tokio::test]
async fn out_of_range_vote_choice_recovers_to_menu() {
    let addr = start_server(&["Pepe", "Isra", "Luison"]).await;
    let mut client = TestClient::connect(addr, "dani").await;

    client.request_options().await;
    client.send_choice(0).await;
    assert!(matches!(client.read_message().await, ServerMessage::Error(_)));

    client.request_options().await;
    client.send_choice(4).await;
    assert!(matches!(client.read_message().await, ServerMessage::Error(_)));

    // Nothing was counted by the rejected attempts.
    let line = client.request_results().await;
    assert_eq!(line, "Pepe: 0.00%  Isra: 0.00%  Luison: 0.00%");

    // The same session may still vote.
    client.vote(3).await;
    client.assert_closed().await;
}

#[tokio::test]
async fn concurrent_voters_are_all_counted() {
    let addr = start_server(&["Pepe", "Isra", "Luison"]).await;

    let voter = |name: &'static str, choice: i32| async move {
        let mut client = TestClient::connect(addr, name).await;
        client.vote(choice).await;
        client.assert_closed().await;
    };

    tokio::join!(voter("ana", 1), voter("bruno", 2), voter("carla", 1));

    let mut observer = TestClient::connect(addr, "diego").await;
    let line = observer.request_results().await;
    assert_eq!(line, "Pepe: 66.67%  Isra: 33.33%  Luison: 0.00%");
}

#[tokio::test]
async fn each_connection_gets_its_own_session() {
    let addr = start_server(&["Pepe", "Isra"]).await;

    // A voter finishing its session does not disturb a session that is
    // mid-menu on another connection.
    let mut watcher = TestClient::connect(addr, "eva").await;
    assert_eq!(watcher.request_results().await, "Pepe: 0.00%  Isra: 0.00%");

    let mut voter = TestClient::connect(addr, "fran").await;
    voter.vote(1).await;
    voter.assert_closed().await;

    assert_eq!(watcher.request_results().await, "Pepe: 100.00%  Isra: 0.00%");
    watcher.vote(2).await;
    watcher.assert_closed().await;
}

#[tokio::test]
async fn client_disconnect_mid_session_leaves_server_serving() {
    let addr = start_server(&["Pepe", "Isra"]).await;

    // Disconnect right after the announce, mid-menu.
    let client = TestClient::connect(addr, "ghost").await;
    drop(client);

    // Disconnect mid-vote, after receiving the ballot.
    let mut half_voter = TestClient::connect(addr, "半票").await;
    half_voter.request_options().await;
    drop(half_voter);

    // The server keeps serving and the aborted attempts counted nothing.
    let mut client = TestClient::connect(addr, "hugo").await;
    assert_eq!(client.request_results().await, "Pepe: 0.00%  Isra: 0.00%");
    client.vote(1).await;
}
