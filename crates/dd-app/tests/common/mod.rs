#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use dd_app::{ClaimSequencer, RewardEngine, SessionOrchestrator};
use dd_core::claim::ClaimTiming;
use dd_core::credentials::{PhoneNumber, Pin};
use dd_core::identity::{Identity, UserId};
use dd_core::ports::{
    AuthGatewayPort, ClockPort, GatewayError, RewardServicePort, SessionStoreError,
    SessionStorePort,
};
use dd_core::reward::{ClaimReceipt, RewardStats};
use dd_core::security::SecretString;

pub const PHONE: &str = "+14155550123";

pub fn identity() -> Identity {
    Identity {
        id: UserId::from("user-42"),
        phone: PHONE.to_string(),
        name: Some("Ada".to_string()),
        created_at: Some("2023-11-02T08:00:00Z".to_string()),
        last_login: None,
    }
}

pub fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

pub fn stats_last_claimed(date: Option<&str>) -> RewardStats {
    RewardStats {
        total_rewards: 4,
        last_reward_claim: date.map(|d| d.parse().unwrap()),
        join_date: Some("2023-11-02".to_string()),
        last_login: None,
    }
}

pub struct FakeGateway {
    pub login_calls: AtomicUsize,
    pub pin_calls: AtomicUsize,
    pub login_result: Mutex<Result<(), GatewayError>>,
    pub pin_result: Mutex<Result<Identity, GatewayError>>,
    pub last_login_phone: Mutex<Option<String>>,
    /// When set, `login` waits for a permit before answering.
    pub login_gate: Option<Arc<Notify>>,
}

impl FakeGateway {
    pub fn accepting() -> Self {
        Self {
            login_calls: AtomicUsize::new(0),
            pin_calls: AtomicUsize::new(0),
            login_result: Mutex::new(Ok(())),
            pin_result: Mutex::new(Ok(identity())),
            last_login_phone: Mutex::new(None),
            login_gate: None,
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            login_gate: Some(gate),
            ..Self::accepting()
        }
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn pins(&self) -> usize {
        self.pin_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthGatewayPort for FakeGateway {
    async fn login(&self, phone: &PhoneNumber, _password: &SecretString) -> Result<(), GatewayError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_login_phone.lock().unwrap() = Some(phone.to_string());
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }
        self.login_result.lock().unwrap().clone()
    }

    async fn verify_pin(&self, _phone: &PhoneNumber, _pin: &Pin) -> Result<Identity, GatewayError> {
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        self.pin_result.lock().unwrap().clone()
    }
}

pub struct FakeRewards {
    pub stats_calls: AtomicUsize,
    pub collect_calls: AtomicUsize,
    pub stats_result: Mutex<Result<RewardStats, GatewayError>>,
    pub collect_result: Mutex<Result<ClaimReceipt, GatewayError>>,
}

impl FakeRewards {
    pub fn with_stats(stats: RewardStats) -> Self {
        let receipt = ClaimReceipt {
            total_rewards: stats.total_rewards + 1,
            last_claimed: None,
        };
        Self {
            stats_calls: AtomicUsize::new(0),
            collect_calls: AtomicUsize::new(0),
            stats_result: Mutex::new(Ok(stats)),
            collect_result: Mutex::new(Ok(receipt)),
        }
    }

    pub fn collects(&self) -> usize {
        self.collect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardServicePort for FakeRewards {
    async fn get_user_stats(&self, _phone: &str) -> Result<RewardStats, GatewayError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats_result.lock().unwrap().clone()
    }

    async fn collect_reward(&self, _phone: &str) -> Result<ClaimReceipt, GatewayError> {
        self.collect_calls.fetch_add(1, Ordering::SeqCst);
        self.collect_result.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub identity: Mutex<Option<Identity>>,
    pub corrupt: Mutex<bool>,
    pub clear_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn holding(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<Identity> {
        self.identity.lock().unwrap().clone()
    }
}

impl SessionStorePort for MemoryStore {
    fn load(&self) -> Result<Option<Identity>, SessionStoreError> {
        if *self.corrupt.lock().unwrap() {
            return Err(SessionStoreError::Corrupt("not json".to_string()));
        }
        Ok(self.stored())
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionStoreError> {
        *self.identity.lock().unwrap() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        *self.corrupt.lock().unwrap() = false;
        *self.identity.lock().unwrap() = None;
        Ok(())
    }
}

pub struct FixedClock(pub Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct Harness {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub gateway: Arc<FakeGateway>,
    pub rewards: Arc<FakeRewards>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

pub fn harness(gateway: FakeGateway, rewards: FakeRewards, store: MemoryStore) -> Harness {
    let gateway = Arc::new(gateway);
    let rewards = Arc::new(rewards);
    let store = Arc::new(store);
    let clock = Arc::new(FixedClock::at(noon(10)));
    let orchestrator = SessionOrchestrator::new(
        gateway.clone(),
        store.clone(),
        Arc::new(RewardEngine::new(rewards.clone())),
        ClaimSequencer::new(ClaimTiming::default()),
        clock.clone(),
    );
    Harness {
        orchestrator,
        gateway,
        rewards,
        store,
        clock,
    }
}
