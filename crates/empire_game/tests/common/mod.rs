//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use empire_game::{
    GameConfig, GameEvent, GameSession, Messenger, MessagingError, PlayerId, RandomSource, RoomId,
};
use std::sync::{Arc, Mutex};

/// Puts players in a scripted turn order and leaves aliases unshuffled.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    order: Vec<PlayerId>,
}

impl ScriptedRandom {
    pub fn new(order: &[&str]) -> Self {
        Self {
            order: order.iter().map(|p| PlayerId::new(*p)).collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn shuffle_players(&mut self, players: &mut [PlayerId]) {
        players.sort_by_key(|p| {
            self.order
                .iter()
                .position(|o| o == p)
                .unwrap_or(usize::MAX)
        });
    }

    fn shuffle_aliases(&mut self, _aliases: &mut [String]) {}
}

pub fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// An open session hosted by `host` with `players` joined in order.
pub fn setup_session(players: &[&str], order: &[&str]) -> GameSession {
    let mut session = GameSession::new(
        RoomId::new("room"),
        pid("host"),
        GameConfig::default(),
        Box::new(ScriptedRandom::new(order)),
    );
    session.open().expect("open failed");
    for player in players {
        session.join(pid(player)).expect("join failed");
    }
    session
}

/// A session in the guessing phase with the given `(player, alias)` pairs
/// and turn order.
pub fn guessing_session(aliases: &[(&str, &str)], order: &[&str]) -> GameSession {
    let players: Vec<&str> = aliases.iter().map(|(p, _)| *p).collect();
    let mut session = setup_session(&players, order);
    session.start(&pid("host")).expect("start failed");
    for (player, alias) in aliases {
        session
            .submit_alias(&pid(player), alias)
            .expect("alias failed");
    }
    session
}

/// Stamp of the session's pending deadline.
pub fn pending(session: &GameSession) -> empire_game::DeadlineStamp {
    session.pending_deadline().expect("no pending deadline")
}

pub fn current(session: &GameSession) -> String {
    session
        .current_player()
        .expect("no current player")
        .to_string()
}

pub fn contains_game_over(events: &[GameEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { .. }))
}

/// One collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Notify(String),
    Prompt {
        player: String,
        players: Vec<String>,
        aliases: Vec<String>,
    },
    Restrict {
        player: String,
        allowed: bool,
    },
}

/// Messenger that records calls and can be told to fail or to yield to
/// the scheduler before each delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<Sent>>>,
    fail: bool,
    yields: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn yielding() -> Self {
        Self {
            yields: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("lock").clone()
    }

    pub fn prompts_for(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Prompt { player, .. } => Some(player),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Notify(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, sent: Sent) -> Result<(), MessagingError> {
        if self.yields {
            tokio::task::yield_now().await;
        }
        self.sent.lock().expect("lock").push(sent);
        if self.fail {
            Err(MessagingError::new("delivery failed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn notify(&self, _room: &RoomId, content: &str) -> Result<(), MessagingError> {
        self.record(Sent::Notify(content.to_string())).await
    }

    async fn prompt_turn(
        &self,
        _room: &RoomId,
        player: &PlayerId,
        players: &[String],
        aliases: &[String],
    ) -> Result<(), MessagingError> {
        self.record(Sent::Prompt {
            player: player.to_string(),
            players: players.to_vec(),
            aliases: aliases.to_vec(),
        })
        .await
    }

    async fn restrict_write(
        &self,
        _room: &RoomId,
        player: &PlayerId,
        allowed: bool,
    ) -> Result<(), MessagingError> {
        self.record(Sent::Restrict {
            player: player.to_string(),
            allowed,
        })
        .await
    }
}
