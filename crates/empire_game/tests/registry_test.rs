//! Tests for the session registry, real deadline timers and the command
//! surface.

mod common;

use common::{RecordingMessenger, ScriptedRandom, Sent, pid};
use empire_game::{
    CommandLine, GameConfig, GameError, Outcome, Phase, RandomSource, Reply, RoomId,
    SessionRegistry, StaticDirectory, execute,
};
use std::sync::Arc;
use std::time::Duration;

fn room() -> RoomId {
    RoomId::new("room")
}

/// Produces a turn order that repeats the first player.
#[derive(Debug)]
struct DuplicatingRandom;

impl RandomSource for DuplicatingRandom {
    fn shuffle_players(&mut self, players: &mut [empire_game::PlayerId]) {
        if players.len() > 1 {
            players[1] = players[0].clone();
        }
    }

    fn shuffle_aliases(&mut self, _aliases: &mut [String]) {}
}

fn registry(messenger: &RecordingMessenger, order: &[&str]) -> SessionRegistry {
    let order: Vec<String> = order.iter().map(|s| s.to_string()).collect();
    SessionRegistry::with_random(
        GameConfig::default(),
        Arc::new(messenger.clone()),
        Arc::new(StaticDirectory::new()),
        Arc::new(move || {
            let refs: Vec<&str> = order.iter().map(String::as_str).collect();
            Box::new(ScriptedRandom::new(&refs)) as Box<dyn RandomSource>
        }),
    )
}

/// Creates a session with `a` and `b` and registers both aliases.
async fn guessing_pair(registry: &SessionRegistry) {
    registry
        .create_session(room(), pid("host"))
        .await
        .expect("create failed");
    registry.join(&room(), pid("a")).await.expect("join a");
    registry.join(&room(), pid("b")).await.expect("join b");
    registry.start(&room(), &pid("host")).await.expect("start");
    registry
        .submit_alias(&room(), &pid("a"), "fox")
        .await
        .expect("alias a");
    registry
        .submit_alias(&room(), &pid("b"), "owl")
        .await
        .expect("alias b");
}

#[tokio::test(start_paused = true)]
async fn test_one_session_per_room() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &[]);

    registry
        .create_session(room(), pid("host"))
        .await
        .expect("create failed");
    assert!(matches!(
        registry.create_session(room(), pid("other")).await,
        Err(GameError::SessionExists)
    ));
    assert!(matches!(
        registry.join(&RoomId::new("elsewhere"), pid("a")).await,
        Err(GameError::NoSession)
    ));
    assert_eq!(registry.room_ids(), vec![room()]);
    assert!(
        messenger
            .notices()
            .iter()
            .any(|n| n.contains("setting up an Empire Game"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_alias_phase_close_prompts_first_player() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["b", "a"]);
    guessing_pair(&registry).await;

    assert_eq!(messenger.prompts_for(), vec!["b".to_string()]);
    let prompt = messenger
        .sent()
        .into_iter()
        .find(|s| matches!(s, Sent::Prompt { .. }))
        .expect("prompt");
    assert_eq!(
        prompt,
        Sent::Prompt {
            player: "b".to_string(),
            players: vec!["a".to_string(), "b".to_string()],
            aliases: vec!["fox".to_string(), "owl".to_string()],
        }
    );
    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.phase, Phase::Guessing);
}

#[tokio::test(start_paused = true)]
async fn test_winning_guess_discards_session() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    let events = registry
        .guess(&room(), &pid("a"), &pid("b"), "owl")
        .await
        .expect("guess failed");

    assert!(events.iter().any(|e| matches!(
        e,
        empire_game::GameEvent::GameOver { outcome: Outcome::Winner(w) } if *w == pid("a")
    )));
    assert!(registry.room_ids().is_empty());
    assert!(matches!(
        registry.snapshot(&room()).await,
        Err(GameError::NoSession)
    ));
    assert!(messenger.sent().contains(&Sent::Restrict {
        player: "b".to_string(),
        allowed: false,
    }));
    assert!(
        messenger
            .notices()
            .iter()
            .any(|n| n.contains("Congratulations a"))
    );

    // The room can host a fresh game straight away.
    registry
        .create_session(room(), pid("host"))
        .await
        .expect("recreate failed");
}

#[tokio::test(start_paused = true)]
async fn test_turn_timeouts_fire_and_eliminate() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    tokio::time::sleep(Duration::from_secs(61)).await;
    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.current_player, Some(pid("b")));
    assert_eq!(messenger.prompts_for(), vec!["a", "b"]);
    assert!(
        messenger
            .notices()
            .iter()
            .any(|n| n.contains("a took too long"))
    );

    // B misses at 120s, A misses a second time at 180s.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(registry.room_ids().is_empty());
    assert!(messenger.sent().contains(&Sent::Restrict {
        player: "a".to_string(),
        allowed: false,
    }));
    let notices = messenger.notices();
    assert!(notices.iter().any(|n| n.contains("missed too many turns")));
    assert!(notices.iter().any(|n| n.contains("Congratulations b")));
}

#[tokio::test(start_paused = true)]
async fn test_acting_replaces_turn_timer() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    registry
        .guess(&room(), &pid("a"), &pid("b"), "fox")
        .await
        .expect("guess failed");

    // A's first deadline would have fired at 60s.
    tokio::time::sleep(Duration::from_secs(40)).await;
    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.current_player, Some(pid("b")));
    assert!(snapshot.players.iter().all(|p| p.missed_turns == 0));
    assert!(!messenger.notices().iter().any(|n| n.contains("took too long")));

    // B's own deadline fires at 90s.
    tokio::time::sleep(Duration::from_secs(25)).await;
    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.current_player, Some(pid("a")));
}

#[tokio::test(start_paused = true)]
async fn test_alias_deadline_disqualifies_stragglers() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b", "c"]);
    registry
        .create_session(room(), pid("host"))
        .await
        .expect("create failed");
    for id in ["a", "b", "c"] {
        registry.join(&room(), pid(id)).await.expect("join");
    }
    registry.start(&room(), &pid("host")).await.expect("start");
    registry
        .submit_alias(&room(), &pid("a"), "fox")
        .await
        .expect("alias a");
    registry
        .submit_alias(&room(), &pid("c"), "cat")
        .await
        .expect("alias c");

    tokio::time::sleep(Duration::from_secs(61)).await;

    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.phase, Phase::Guessing);
    assert_eq!(snapshot.turn_order, vec![pid("a"), pid("c")]);
    assert!(messenger.sent().contains(&Sent::Restrict {
        player: "b".to_string(),
        allowed: false,
    }));
    assert_eq!(messenger.prompts_for(), vec!["a"]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_timers_and_discards() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    assert!(matches!(
        registry.cancel(&room(), &pid("a")).await,
        Err(GameError::NotHost)
    ));
    registry
        .cancel(&room(), &pid("host"))
        .await
        .expect("cancel failed");
    assert!(registry.room_ids().is_empty());
    let sent_after_cancel = messenger.sent().len();

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(messenger.sent().len(), sent_after_cancel);
    assert!(
        messenger
            .notices()
            .iter()
            .any(|n| n.contains("has been cancelled"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_teardown_room_drops_session() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    assert!(registry.teardown_room(&room()).await);
    assert!(!registry.teardown_room(&room()).await);
    let sent_after_teardown = messenger.sent().len();

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(messenger.sent().len(), sent_after_teardown);
    assert!(matches!(
        registry.guess(&room(), &pid("a"), &pid("b"), "owl").await,
        Err(GameError::NoSession)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_messenger_failure_keeps_state() {
    let messenger = RecordingMessenger::failing();
    let registry = registry(&messenger, &["a", "b"]);
    guessing_pair(&registry).await;

    let snapshot = registry.snapshot(&room()).await.expect("snapshot");
    assert_eq!(snapshot.phase, Phase::Guessing);
    assert_eq!(snapshot.current_player, Some(pid("a")));
    assert!(!messenger.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_commands_drive_a_game() {
    let messenger = RecordingMessenger::default();
    let registry = registry(&messenger, &["bob", "alice"]);

    let script = [
        "r1 host create_session",
        "r1 alice join",
        "r1 bob join",
        "r1 host start",
        "r1 alice submit_alias red fox",
        "r1 bob submit_alias owl",
    ];
    for line in script {
        let parsed: CommandLine = line.parse().expect("parse failed");
        let reply = execute(&registry, parsed).await.expect("command failed");
        assert!(matches!(reply, Reply::Ack(_)));
    }

    let status = execute(&registry, "r1 alice status".parse().expect("parse"))
        .await
        .expect("status failed");
    let Reply::Status(snapshot) = status else {
        panic!("expected status reply");
    };
    assert_eq!(snapshot.current_player, Some(pid("bob")));

    let out_of_turn = execute(
        &registry,
        "r1 alice guess bob owl".parse().expect("parse"),
    )
    .await;
    assert!(matches!(out_of_turn, Err(GameError::OutOfTurn)));

    execute(&registry, "r1 bob guess alice red fox".parse().expect("parse"))
        .await
        .expect("winning guess failed");
    assert!(registry.room_ids().is_empty());

    let rules = execute(&registry, "r1 alice rules".parse().expect("parse"))
        .await
        .expect("rules failed");
    assert!(matches!(rules, Reply::Text(text) if text.contains("60 seconds")));
}

#[tokio::test(start_paused = true)]
async fn test_invariant_violation_aborts_only_that_room() {
    let messenger = RecordingMessenger::default();
    let registry = SessionRegistry::with_random(
        GameConfig::default(),
        Arc::new(messenger.clone()),
        Arc::new(StaticDirectory::new()),
        Arc::new(|| Box::new(DuplicatingRandom) as Box<dyn RandomSource>),
    );
    let broken = RoomId::new("r1");
    let healthy = RoomId::new("r2");
    for room in [&broken, &healthy] {
        registry
            .create_session(room.clone(), pid("host"))
            .await
            .expect("create failed");
        registry.join(room, pid("a")).await.expect("join a");
        registry.join(room, pid("b")).await.expect("join b");
    }

    let result = registry.start(&broken, &pid("host")).await;

    assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    assert_eq!(registry.room_ids(), vec![healthy.clone()]);
    assert_eq!(
        messenger.notices().last().map(String::as_str),
        Some("The game was stopped because of an internal error.")
    );
    assert!(matches!(
        registry.join(&broken, pid("c")).await,
        Err(GameError::NoSession)
    ));

    // The other room keeps accepting commands.
    registry.join(&healthy, pid("c")).await.expect("join c");
    let snapshot = registry.snapshot(&healthy).await.expect("snapshot");
    assert_eq!(snapshot.phase, Phase::Setup);
    assert_eq!(snapshot.players.len(), 3);

    // No deadline from the aborted room fires later.
    let sent_after_abort = messenger.sent().len();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(messenger.sent().len(), sent_after_abort);
}

#[tokio::test(start_paused = true)]
async fn test_setup_announced_before_racing_join() {
    let messenger = RecordingMessenger::yielding();
    let registry = registry(&messenger, &[]);

    let joiner = registry.clone();
    let joining = tokio::spawn(async move {
        loop {
            match joiner.join(&room(), pid("a")).await {
                Err(GameError::NoSession) => tokio::task::yield_now().await,
                other => return other,
            }
        }
    });
    registry
        .create_session(room(), pid("host"))
        .await
        .expect("create failed");
    joining
        .await
        .expect("join task panicked")
        .expect("join failed");

    let notices = messenger.notices();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].contains("setting up an Empire Game"));
    assert!(notices[1].contains("a joined the game"));
}
