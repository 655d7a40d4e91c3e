//! Drives whole sessions through the lifecycle hub the way a platform shell would.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geoguess_application::{
    BootstrapOutcome, LifecycleHub, LifecycleObserver, SessionController, SessionPhase,
    SessionServices,
};
use geoguess_core::clock::ManualClock;
use geoguess_core::config::GameConfig;
use geoguess_core::error::Result;
use geoguess_core::lifecycle::AppStateChange;
use geoguess_core::navigation::Navigator;
use geoguess_core::round::{Country, RoundPayload, RoundSource};
use geoguess_core::session::{ScoreStats, ScoreSubmitter, SessionRegistrar};
use geoguess_core::snapshot::ScreenKind;
use geoguess_infrastructure::{InMemoryKeyValueStorage, SnapshotStore};
use tokio::sync::Mutex;

struct RotatingRounds {
    served: AtomicUsize,
}

#[async_trait]
impl RoundSource for RotatingRounds {
    async fn fetch_round(&self, _exclude: &[String]) -> Result<Option<RoundPayload>> {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        let country = match n % 3 {
            0 => Country::new("Iceland", "IS"),
            1 => Country::new("Ghana", "GH"),
            _ => Country::new("Uruguay", "UY"),
        };
        Ok(Some(RoundPayload::new(format!("r{}", n), country)))
    }
}

struct FixedRegistrar;

#[async_trait]
impl SessionRegistrar for FixedRegistrar {
    async fn start_session(&self, screen: ScreenKind) -> Result<String> {
        Ok(format!("{}-session", screen))
    }
}

#[derive(Default)]
struct CountingSubmitter {
    scores: std::sync::Mutex<Vec<i32>>,
}

#[async_trait]
impl ScoreSubmitter for CountingSubmitter {
    async fn submit(&self, _session_id: &str, score: i32, _stats: &ScoreStats) -> Result<()> {
        self.scores.lock().unwrap().push(score);
        Ok(())
    }
}

#[derive(Default)]
struct CountingNavigator {
    calls: AtomicUsize,
}

impl Navigator for CountingNavigator {
    fn return_to_menu(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct App {
    storage: InMemoryKeyValueStorage,
    clock: ManualClock,
    rounds: Arc<RotatingRounds>,
    submitter: Arc<CountingSubmitter>,
    navigator: Arc<CountingNavigator>,
    config: GameConfig,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            storage: InMemoryKeyValueStorage::new(),
            clock: ManualClock::new(1_700_000_000_000),
            rounds: Arc::new(RotatingRounds {
                served: AtomicUsize::new(0),
            }),
            submitter: Arc::new(CountingSubmitter::default()),
            navigator: Arc::new(CountingNavigator::default()),
            config,
        }
    }

    async fn open(&self, screen: ScreenKind) -> (Arc<Mutex<SessionController>>, BootstrapOutcome) {
        let services = SessionServices {
            rounds: self.rounds.clone(),
            registrar: Arc::new(FixedRegistrar),
            submitter: self.submitter.clone(),
            navigator: self.navigator.clone(),
            opponent: None,
            store: SnapshotStore::new(Arc::new(self.storage.clone()), Arc::new(self.clock.clone())),
        };
        let mut controller = SessionController::new(screen, self.config.clone(), services);
        let outcome = controller.bootstrap().await.unwrap();
        controller.settle_prefetch().await;
        (Arc::new(Mutex::new(controller)), outcome)
    }
}

async fn answer(controller: &Arc<Mutex<SessionController>>) -> String {
    let controller = controller.lock().await;
    controller.state().round.as_ref().unwrap().country.name.clone()
}

#[tokio::test]
async fn test_session_survives_app_restart() {
    let app = App::new(GameConfig::default());
    let hub = LifecycleHub::new();

    let (controller, outcome) = app.open(ScreenKind::Classic).await;
    assert_eq!(outcome, BootstrapOutcome::Started);
    let subscription = LifecycleObserver::attach(&hub, controller.clone());

    {
        let mut c = controller.lock().await;
        let guess = c.state().round.as_ref().unwrap().country.name.clone();
        c.submit_guess(&guess).await.unwrap();
        c.advance().await.unwrap();
        c.submit_guess("atlantis").await.unwrap();
    }
    let before = controller.lock().await.state().clone();

    hub.app_state(AppStateChange::Background);
    hub.teardown();
    subscription.closed().await;
    assert!(app.storage.contains_key(ScreenKind::Classic.storage_key()).await);

    app.clock.advance(60 * 60 * 1000);
    let (resumed, outcome) = app.open(ScreenKind::Classic).await;
    assert_eq!(outcome, BootstrapOutcome::Restored);

    let resumed = resumed.lock().await;
    assert_eq!(resumed.state(), &before);
    assert_eq!(resumed.phase(), SessionPhase::AwaitingInput);
    assert_eq!(resumed.state().round_index, 2);
    assert_eq!(resumed.state().score, 3);
}

#[tokio::test]
async fn test_quit_is_not_written_back_on_teardown() {
    let app = App::new(GameConfig::default());
    let hub = LifecycleHub::new();

    let (controller, _) = app.open(ScreenKind::Panorama).await;
    let subscription = LifecycleObserver::attach(&hub, controller.clone());

    let guess = answer(&controller).await;
    controller.lock().await.submit_guess(&guess).await.unwrap();

    // Backgrounded once, then the user quits from the menu.
    hub.app_state(AppStateChange::Inactive);
    while !app.storage.contains_key(ScreenKind::Panorama.storage_key()).await {
        tokio::task::yield_now().await;
    }
    controller.lock().await.abandon().await;
    hub.teardown();
    subscription.closed().await;

    assert!(app.storage.is_empty().await);
    assert_eq!(app.navigator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*app.submitter.scores.lock().unwrap(), vec![3]);

    let (_, outcome) = app.open(ScreenKind::Panorama).await;
    assert_eq!(outcome, BootstrapOutcome::Started);
}

#[tokio::test(start_paused = true)]
async fn test_summary_pending_at_background_is_shown_on_return() {
    let app = App::new(GameConfig {
        session_length: 1,
        ..GameConfig::default()
    });
    let hub = LifecycleHub::new();

    let (controller, _) = app.open(ScreenKind::Duel).await;
    let subscription = LifecycleObserver::attach(&hub, controller.clone());

    let guess = answer(&controller).await;
    controller.lock().await.submit_guess(&guess).await.unwrap();
    assert_eq!(controller.lock().await.phase(), SessionPhase::RoundComplete);

    hub.app_state(AppStateChange::Background);
    hub.app_state(AppStateChange::Active);
    hub.teardown();
    subscription.closed().await;

    let controller = controller.lock().await;
    assert_eq!(controller.phase(), SessionPhase::SessionComplete);
    assert!(controller.state().summary_shown);
}
