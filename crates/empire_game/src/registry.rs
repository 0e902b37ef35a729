//! Session registry: one live game per room.
//!
//! Every operation on a room runs while holding that room's async mutex,
//! including the collaborator calls and timer bookkeeping it triggers, so
//! operations on one session never interleave. The room map itself sits
//! behind a synchronous mutex that is only held for lookups and updates.

use crate::render::announcement;
use crate::timer::{DeadlineFired, DeadlineScheduler, TimerHandle};
use crate::{
    Directory, GameConfig, GameError, GameEvent, GameSession, Messenger, PlayerId, RandomSource,
    RoomId, SeededRandom, SessionSnapshot,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Produces the random source for each new session.
pub type RandomFactory = Arc<dyn Fn() -> Box<dyn RandomSource> + Send + Sync>;

type Slot = Arc<tokio::sync::Mutex<RoomSlot>>;

/// A session plus the timer currently armed for it.
#[derive(Debug)]
struct RoomSlot {
    session: GameSession,
    timer: Option<TimerHandle>,
}

impl RoomSlot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

struct RegistryInner {
    rooms: Mutex<HashMap<RoomId, Slot>>,
    config: GameConfig,
    messenger: Arc<dyn Messenger>,
    directory: Arc<dyn Directory>,
    scheduler: DeadlineScheduler,
    random: RandomFactory,
}

/// Maps rooms to their live session and drives deadlines.
///
/// Cheap to clone; clones share the same rooms.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("rooms", &self.rooms().len())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Default factory: seeded sources derived from the configured seed, or
/// entropy when none is set.
fn default_random(config: &GameConfig) -> RandomFactory {
    let seed = *config.seed();
    let sessions = Arc::new(AtomicU64::new(0));
    Arc::new(move || -> Box<dyn RandomSource> {
        let n = sessions.fetch_add(1, Ordering::Relaxed);
        Box::new(SeededRandom::from_seed(seed.map(|s| s.wrapping_add(n))))
    })
}

impl SessionRegistry {
    /// Creates a registry. Must be called inside a tokio runtime.
    #[instrument(skip(messenger, directory))]
    pub fn new(
        config: GameConfig,
        messenger: Arc<dyn Messenger>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        let random = default_random(&config);
        Self::with_random(config, messenger, directory, random)
    }

    /// Creates a registry whose sessions draw randomness from `random`.
    #[instrument(skip(messenger, directory, random))]
    pub fn with_random(
        config: GameConfig,
        messenger: Arc<dyn Messenger>,
        directory: Arc<dyn Directory>,
        random: RandomFactory,
    ) -> Self {
        info!("Creating session registry");
        let (scheduler, rx) = DeadlineScheduler::channel();
        let inner = Arc::new(RegistryInner {
            rooms: Mutex::new(HashMap::new()),
            config,
            messenger,
            directory,
            scheduler,
            random,
        });
        spawn_deadline_pump(Arc::downgrade(&inner), rx);
        Self { inner }
    }

    /// Rules every new session plays by.
    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<RoomId, Slot>> {
        self.inner
            .rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, room: &RoomId) -> Result<Slot, GameError> {
        self.rooms().get(room).cloned().ok_or(GameError::NoSession)
    }

    /// Removes `room` from the map if it still maps to `slot`.
    fn discard(&self, room: &RoomId, slot: &Slot) {
        let mut rooms = self.rooms();
        if rooms.get(room).is_some_and(|live| Arc::ptr_eq(live, slot)) {
            rooms.remove(room);
            info!(room = %room, "Session discarded");
        }
    }

    /// Rooms with a live session.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<_> = self.rooms().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Opens a new session in `room` hosted by `host`.
    #[instrument(skip(self))]
    pub async fn create_session(
        &self,
        room: RoomId,
        host: PlayerId,
    ) -> Result<SessionSnapshot, GameError> {
        let mut session = GameSession::new(
            room.clone(),
            host,
            self.inner.config.clone(),
            (self.inner.random)(),
        );
        let events = session.open()?;
        let slot: Slot = Arc::new(tokio::sync::Mutex::new(RoomSlot {
            session,
            timer: None,
        }));
        // Locked before publishing: the setup announcement precedes any other
        // command on this room.
        let mut guard = slot.clone().try_lock_owned().map_err(|_| {
            GameError::InvariantViolation("New room slot was already locked".to_string())
        })?;
        {
            let mut rooms = self.rooms();
            if rooms.contains_key(&room) {
                warn!(room = %room, "Room already has a session");
                return Err(GameError::SessionExists);
            }
            rooms.insert(room.clone(), slot);
        }

        self.dispatch(&room, &mut guard, &events).await;
        info!(room = %room, "Session created");
        Ok(guard.session.snapshot())
    }

    /// Adds `player` to the room's roster.
    pub async fn join(&self, room: &RoomId, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.join(player)).await
    }

    /// Removes `player` from the room's roster.
    pub async fn leave(&self, room: &RoomId, player: &PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.leave(player)).await
    }

    /// Starts the room's game.
    pub async fn start(
        &self,
        room: &RoomId,
        requester: &PlayerId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.start(requester)).await
    }

    /// Cancels the room's game.
    pub async fn cancel(
        &self,
        room: &RoomId,
        requester: &PlayerId,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.cancel(requester)).await
    }

    /// Registers `player`'s alias.
    pub async fn submit_alias(
        &self,
        room: &RoomId,
        player: &PlayerId,
        alias: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.submit_alias(player, alias)).await
    }

    /// Guesses that `target` registered `alias`.
    pub async fn guess(
        &self,
        room: &RoomId,
        guesser: &PlayerId,
        target: &PlayerId,
        alias: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.apply(room, |s| s.guess(guesser, target, alias)).await
    }

    /// Returns a read-only view of the room's session.
    pub async fn snapshot(&self, room: &RoomId) -> Result<SessionSnapshot, GameError> {
        let slot = self.slot(room)?;
        let guard = slot.lock().await;
        Ok(guard.session.snapshot())
    }

    /// Applies a fired deadline. Stale deadlines change nothing.
    #[instrument(skip(self), fields(room = %fired.room))]
    pub async fn fire_deadline(&self, fired: DeadlineFired) {
        let stamp = fired.stamp;
        match self.apply(&fired.room, |s| s.on_deadline(stamp)).await {
            Ok(events) if events.is_empty() => debug!(?stamp, "Deadline was stale"),
            Ok(_) => debug!(?stamp, "Deadline applied"),
            Err(GameError::NoSession) => debug!(?stamp, "Deadline for a finished session"),
            Err(e) => warn!(?stamp, error = %e, "Deadline failed"),
        }
    }

    /// Drops the room's session because the room itself went away.
    ///
    /// Returns true if a session was live.
    #[instrument(skip(self))]
    pub async fn teardown_room(&self, room: &RoomId) -> bool {
        let Some(slot) = self.rooms().remove(room) else {
            return false;
        };
        let mut guard = slot.lock().await;
        if !guard.session.phase().is_ended() {
            guard.session.abort();
        }
        guard.cancel_timer();
        info!(room = %room, "Room torn down");
        true
    }

    /// Runs one operation under the room's lock and dispatches its events.
    async fn apply<F>(&self, room: &RoomId, op: F) -> Result<Vec<GameEvent>, GameError>
    where
        F: FnOnce(&mut GameSession) -> Result<Vec<GameEvent>, GameError> + Send,
    {
        let slot = self.slot(room)?;
        let mut guard = slot.lock().await;
        if guard.session.phase().is_ended() {
            return Err(GameError::NoSession);
        }

        let result = op(&mut guard.session);
        let events = match result {
            Ok(events) => events,
            Err(err) if err.is_fatal() => {
                let events = guard.session.abort();
                self.dispatch(room, &mut guard, &events).await;
                self.notify(room, "The game was stopped because of an internal error.")
                    .await;
                guard.cancel_timer();
                self.discard(room, &slot);
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        self.dispatch(room, &mut guard, &events).await;
        if guard.session.phase().is_ended() {
            guard.cancel_timer();
            self.discard(room, &slot);
        }
        Ok(events)
    }

    /// Turns events into timer changes and collaborator calls.
    async fn dispatch(&self, room: &RoomId, slot: &mut RoomSlot, events: &[GameEvent]) {
        let messenger = &self.inner.messenger;
        let directory = self.inner.directory.as_ref();

        for event in events {
            match event {
                GameEvent::DeadlineArmed { stamp, after } => {
                    slot.cancel_timer();
                    slot.timer = Some(self.inner.scheduler.arm(room.clone(), *stamp, *after));
                }
                GameEvent::DeadlineCleared => slot.cancel_timer(),
                GameEvent::TurnStarted {
                    player,
                    players,
                    aliases,
                } => {
                    let names: Vec<String> = players
                        .iter()
                        .map(|p| directory.resolve_display_name(p))
                        .collect();
                    if let Err(e) = messenger.prompt_turn(room, player, &names, aliases).await {
                        warn!(room = %room, player = %player, error = %e, "Turn prompt failed");
                    }
                }
                GameEvent::PlayerEliminated { player, .. } => {
                    if let Some(text) = announcement(event, directory) {
                        self.notify(room, &text).await;
                    }
                    self.revoke_write(room, player).await;
                }
                GameEvent::PlayersDisqualified { players } => {
                    if let Some(text) = announcement(event, directory) {
                        self.notify(room, &text).await;
                    }
                    for player in players {
                        self.revoke_write(room, player).await;
                    }
                }
                other => {
                    if let Some(text) = announcement(other, directory) {
                        self.notify(room, &text).await;
                    }
                }
            }
        }
    }

    async fn notify(&self, room: &RoomId, content: &str) {
        if let Err(e) = self.inner.messenger.notify(room, content).await {
            warn!(room = %room, error = %e, "Notification failed");
        }
    }

    async fn revoke_write(&self, room: &RoomId, player: &PlayerId) {
        if let Err(e) = self.inner.messenger.restrict_write(room, player, false).await {
            warn!(room = %room, player = %player, error = %e, "Could not revoke write access");
        }
    }
}

/// Forwards fired deadlines to the registry until it is dropped.
fn spawn_deadline_pump(inner: Weak<RegistryInner>, mut rx: mpsc::UnboundedReceiver<DeadlineFired>) {
    tokio::spawn(async move {
        while let Some(fired) = rx.recv().await {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            let registry = SessionRegistry { inner };
            tokio::spawn(async move { registry.fire_deadline(fired).await });
        }
        debug!("Deadline pump stopped");
    });
}
