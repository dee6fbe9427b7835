//! End-to-end command tests: drive the bot server through its gateway
//! channels and assert on the reply surface, the way a connector would.

use std::time::Duration;

use forgebot::bot::BotServer;
use forgebot::game::EconomyEngine;
use forgebot::gateway::{ChatEvent, GatewayChannels, OutgoingReply};
use forgebot::storage::Storage;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct Bot {
    events: mpsc::UnboundedSender<ChatEvent>,
    replies: mpsc::UnboundedReceiver<OutgoingReply>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn spawn_bot(dir: &TempDir) -> Bot {
    let storage = Storage::new(dir.path().to_str().unwrap()).await.unwrap();
    let engine = EconomyEngine::load(storage).await.unwrap();
    let (server, channels) = BotServer::new(engine, '-');
    let GatewayChannels { events, replies } = channels;
    let handle = tokio::spawn(server.run());
    Bot {
        events,
        replies,
        handle,
    }
}

fn event(content: &str) -> ChatEvent {
    ChatEvent {
        user_id: "u1".to_string(),
        username: "alice".to_string(),
        content: content.to_string(),
    }
}

impl Bot {
    /// Send a command and wait for its reply.
    async fn ask(&mut self, content: &str) -> String {
        self.events.send(event(content)).unwrap();
        timeout(Duration::from_secs(5), self.replies.recv())
            .await
            .expect("reply timeout")
            .expect("reply channel closed")
            .text
    }

    /// Send a message that must not produce a reply (chat, unknown).
    fn tell(&mut self, content: &str) {
        self.events.send(event(content)).unwrap();
    }
}

#[tokio::test]
async fn attendance_once_per_day() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = spawn_bot(&dir).await;

    let reply = bot.ask("-출석").await;
    assert!(reply.contains("출석 완료"), "got: {reply}");
    assert!(reply.contains("1000"), "got: {reply}");

    let reply = bot.ask("-출석").await;
    assert!(reply.contains("이미 출석"), "got: {reply}");

    // Balance reflects exactly one bonus.
    let reply = bot.ask("-지갑").await;
    assert!(reply.contains("11000"), "got: {reply}");
}

#[tokio::test]
async fn chat_earns_reward_and_commands_do_not() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = spawn_bot(&dir).await;

    bot.tell("안녕하세요");
    bot.tell("hello");
    // Unknown prefixed commands earn nothing and stay silent.
    bot.tell("-없는명령");

    let reply = bot.ask("-지갑").await;
    assert!(reply.contains("10020"), "got: {reply}");
}

#[tokio::test]
async fn enhance_surface() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = spawn_bot(&dir).await;

    let reply = bot.ask("-강화").await;
    assert!(reply.contains("강화할 물품 이름"), "got: {reply}");

    // The roll is random; either way the reply names the item.
    let reply = bot.ask("-강화 검").await;
    assert!(
        reply.contains("강화 성공") || reply.contains("파괴"),
        "got: {reply}"
    );
    assert!(reply.contains("검"), "got: {reply}");

    // One attempt was paid for regardless of outcome.
    let reply = bot.ask("-지갑").await;
    assert!(reply.contains("9950"), "got: {reply}");

    // The track now exists either way.
    let reply = bot.ask("-정보 검").await;
    assert!(reply.contains("강화 단계"), "got: {reply}");
    assert!(reply.contains("판매 가능"), "got: {reply}");
}

#[tokio::test]
async fn info_and_sell_guards() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = spawn_bot(&dir).await;

    let reply = bot.ask("-정보 유령검").await;
    assert!(reply.contains("강화 기록이 없습니다"), "got: {reply}");

    let reply = bot.ask("-판매").await;
    assert!(reply.contains("판매할 물품 이름"), "got: {reply}");

    let reply = bot.ask("-판매 유령검").await;
    assert!(reply.contains("보유하고 있지 않습니다"), "got: {reply}");
}

#[tokio::test]
async fn ranking_market_and_help() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = spawn_bot(&dir).await;

    let reply = bot.ask("-랭킹").await;
    assert!(reply.contains("역대 최고 강화 기록"), "got: {reply}");
    assert!(reply.contains("없음"), "fresh server has no records: {reply}");

    let reply = bot.ask("-시세").await;
    assert!(reply.contains("배율: x"), "got: {reply}");
    assert!(reply.contains("30분"), "got: {reply}");

    let reply = bot.ask("-도움").await;
    assert!(reply.contains("명령어 안내"), "got: {reply}");
}

#[tokio::test]
async fn server_stops_when_event_source_closes() {
    let dir = tempfile::tempdir().unwrap();
    let bot = spawn_bot(&dir).await;

    drop(bot.events);
    drop(bot.replies);
    let result = timeout(Duration::from_secs(5), bot.handle)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
    assert!(result.is_ok());
}
