use std::{
    collections::HashMap,
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use paddock_user::{
    Clock, Command, NewUser, RegisterInput, Role, Session, SessionManager, SqliteStore, Store,
    User,
};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

/// Start of 2025, in milliseconds.
#[allow(dead_code)]
pub const EPOCH: i64 = 1_735_689_600_000;

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Arc<AtomicI64>);

#[allow(dead_code)]
impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(Arc::new(AtomicI64::new(now)))
    }

    pub fn set(&self, now: i64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    sessions: HashMap<String, Session>,
}

/// Store kept in a map, with switches to make reads, updates or deletes fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_reads: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn session(&self, id: &str) -> Option<Session> {
        self.tables.lock().unwrap().sessions.get(id).cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.tables.lock().unwrap().sessions.values().cloned().collect()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, input: NewUser) -> paddock_shared::Result<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == input.email) {
            paddock_shared::user!("Email already exists");
        }

        let user = User {
            id: ulid::Ulid::new().to_string(),
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            created_at: 0,
        };
        tables.users.insert(user.id.to_owned(), user.clone());

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> paddock_shared::Result<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> paddock_shared::Result<Option<User>> {
        let tables = self.tables.lock().unwrap();

        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn set_user_role(&self, id: &str, role: Role) -> paddock_shared::Result<()> {
        if let Some(user) = self.tables.lock().unwrap().users.get_mut(id) {
            user.role = role;
        }

        Ok(())
    }

    async fn get_session_with_user(
        &self,
        id: &str,
    ) -> paddock_shared::Result<Option<(Session, User)>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            paddock_shared::server!("disk I/O error");
        }

        let tables = self.tables.lock().unwrap();
        let found = tables.sessions.get(id).and_then(|session| {
            tables
                .users
                .get(&session.user_id)
                .map(|user| (session.clone(), user.clone()))
        });

        Ok(found)
    }

    async fn create_session(&self, session: &Session) -> paddock_shared::Result<()> {
        self.tables
            .lock()
            .unwrap()
            .sessions
            .insert(session.id.to_owned(), session.clone());

        Ok(())
    }

    async fn update_session_expiry(
        &self,
        id: &str,
        expires_at: i64,
    ) -> paddock_shared::Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            paddock_shared::server!("database is locked");
        }

        if let Some(session) = self.tables.lock().unwrap().sessions.get_mut(id) {
            session.expires_at = expires_at;
        }

        Ok(())
    }

    async fn delete_session(&self, id: &str) -> paddock_shared::Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            paddock_shared::server!("database is locked");
        }

        self.tables.lock().unwrap().sessions.remove(id);

        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &str) -> paddock_shared::Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.user_id != user_id);

        Ok((before - tables.sessions.len()) as u64)
    }

    async fn delete_expired_sessions(&self, now: i64) -> paddock_shared::Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.expires_at > now);

        Ok((before - tables.sessions.len()) as u64)
    }
}

#[allow(dead_code)]
pub fn memory_command() -> (Command<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
    let store = MemoryStore::default();
    let clock = ManualClock::new(EPOCH);
    let command = Command::with_sessions(SessionManager::with_clock(store.clone(), clock.clone()));

    (command, store, clock)
}

pub struct TestState {
    pub pool: SqlitePool,
    pub store: SqliteStore,
}

#[allow(dead_code)]
pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    paddock_db::migrate(&pool).await?;

    Ok(TestState {
        store: pool.clone().into(),
        pool,
    })
}

#[allow(dead_code)]
pub async fn register<S: Store, C: Clock>(
    command: &Command<S, C>,
    name: &str,
) -> anyhow::Result<User> {
    Ok(command
        .register(RegisterInput {
            email: format!("{name}@paddock.localhost"),
            password: "my_password".to_owned(),
            first_name: Some(name.to_owned()),
            last_name: None,
        })
        .await?)
}
