use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::animation::AccordionSettings;
use super::catalog::{CategoryCatalog, CategoryId};
use super::draft::AddressField;
use super::geolocation::{locate_address, GeolocationGateway};
use super::navigation::NavigationCommand;
use super::publisher::{ListingPublisher, PublishAcknowledgement, SubmissionGateway};
use super::selection::CategorySelector;
use super::session::{ListingSession, SessionError, SessionView};

/// Identifier wrapper for in-flight listing sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Partial update of the details form; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("listing session {0} not found")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Open sessions kept before the oldest is evicted.
pub const DEFAULT_SESSION_LIMIT: usize = 10_000;

/// Open sessions in creation order, bounded by `limit`.
struct SessionStore {
    sessions: HashMap<SessionId, ListingSession>,
    order: VecDeque<SessionId>,
    limit: usize,
}

impl SessionStore {
    fn new(limit: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    fn insert(&mut self, id: SessionId, session: ListingSession) {
        while self.sessions.len() >= self.limit {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.sessions.remove(&oldest).is_some() {
                tracing::debug!(session = %oldest, "evicted oldest listing session");
            }
        }
        self.order.push_back(id.clone());
        self.sessions.insert(id, session);
    }

    fn get_mut(&mut self, id: &SessionId) -> Option<&mut ListingSession> {
        self.sessions.get_mut(id)
    }

    fn remove(&mut self, id: &SessionId) -> Option<ListingSession> {
        let session = self.sessions.remove(id)?;
        self.order.retain(|open| open != id);
        Some(session)
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// In-process store of listing sessions sharing one catalog and set of gateways.
///
/// Sessions leave the store once published, once backed out to home, when
/// discarded, or when evicted as the oldest past the session limit.
pub struct ListingService<S: ?Sized, G: ?Sized> {
    catalog: CategoryCatalog,
    settings: AccordionSettings,
    sessions: Mutex<SessionStore>,
    publisher: ListingPublisher<S>,
    geolocation: Arc<G>,
    clock: fn() -> NaiveDateTime,
}

impl<S, G> ListingService<S, G>
where
    S: SubmissionGateway + ?Sized + 'static,
    G: GeolocationGateway + ?Sized + 'static,
{
    pub fn new(
        catalog: CategoryCatalog,
        settings: AccordionSettings,
        submissions: Arc<S>,
        geolocation: Arc<G>,
    ) -> Self {
        Self {
            catalog,
            settings,
            sessions: Mutex::new(SessionStore::new(DEFAULT_SESSION_LIMIT)),
            publisher: ListingPublisher::new(submissions),
            geolocation,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used to seed the details step times.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Caps how many sessions stay open; the oldest are evicted first.
    pub fn with_session_limit(mut self, limit: usize) -> Self {
        self.sessions = Mutex::new(SessionStore::new(limit));
        self
    }

    pub fn open_sessions(&self) -> usize {
        self.lock_sessions().len()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn create_session(&self) -> (SessionId, SessionView) {
        let selector = CategorySelector::new(self.catalog.clone(), self.settings);
        let session = ListingSession::new(selector);
        let view = session.view();
        let id = next_session_id();

        self.lock_sessions().insert(id.clone(), session);
        tracing::debug!(session = %id, "listing session created");
        (id, view)
    }

    pub fn view(&self, id: &SessionId) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| Ok(session.view()))
    }

    pub fn toggle_category(
        &self,
        id: &SessionId,
        category_id: &CategoryId,
    ) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| {
            session.toggle_category(category_id)?;
            Ok(session.view())
        })
    }

    pub fn toggle_subcategory(
        &self,
        id: &SessionId,
        name: &str,
    ) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| {
            session.toggle_subcategory(name)?;
            Ok(session.view())
        })
    }

    pub fn continue_to_details(
        &self,
        id: &SessionId,
    ) -> Result<(NavigationCommand, SessionView), ListingServiceError> {
        let now = (self.clock)();
        self.with_session(id, |session| {
            let command = session.continue_to_details(now)?;
            Ok((command, session.view()))
        })
    }

    /// Backing out of the category step leaves the flow and closes the session.
    pub fn back(
        &self,
        id: &SessionId,
    ) -> Result<(NavigationCommand, SessionView), ListingServiceError> {
        let (command, view) = self.with_session(id, |session| {
            let command = session.back();
            Ok((command, session.view()))
        })?;
        if command == NavigationCommand::Home {
            self.discard(id)?;
        }
        Ok((command, view))
    }

    pub fn discard(&self, id: &SessionId) -> Result<(), ListingServiceError> {
        self.lock_sessions()
            .remove(id)
            .ok_or_else(|| ListingServiceError::SessionNotFound(id.clone()))?;
        tracing::debug!(session = %id, "listing session closed");
        Ok(())
    }

    pub fn update_details(
        &self,
        id: &SessionId,
        update: DetailsUpdate,
    ) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| {
            if let Some(title) = update.title {
                session.set_title(title)?;
            }
            if let Some(description) = update.description {
                session.set_description(description)?;
            }
            let fields = [
                (AddressField::Street, update.street),
                (AddressField::City, update.city),
                (AddressField::State, update.state),
                (AddressField::Zip, update.zip),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    session.set_address_field(field, value)?;
                }
            }
            Ok(session.view())
        })
    }

    pub fn tap_day(&self, id: &SessionId, day: NaiveDate) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| {
            session.tap_day(day)?;
            Ok(session.view())
        })
    }

    /// Start is applied before end so one request can move both forward.
    pub fn set_times(
        &self,
        id: &SessionId,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Result<SessionView, ListingServiceError> {
        self.with_session(id, |session| {
            if let Some(start) = start {
                session.set_start_time(start)?;
            }
            if let Some(end) = end {
                session.set_end_time(end)?;
            }
            Ok(session.view())
        })
    }

    /// The lookup runs outside the session lock; whichever lookup lands last wins.
    pub fn locate_address(&self, id: &SessionId) -> Result<SessionView, ListingServiceError> {
        self.view(id)?;
        let lookup = locate_address(self.geolocation.as_ref());
        self.with_session(id, |session| {
            session.apply_address_lookup(lookup)?;
            Ok(session.view())
        })
    }

    pub fn validation(&self, id: &SessionId) -> Result<Vec<&'static str>, ListingServiceError> {
        self.with_session(id, |session| Ok(session.validate()))
    }

    /// The session is taken out of the store while the gateway runs, so the
    /// submission holds no lock. A failed publish puts it back; a successful one
    /// closes it.
    pub fn publish(&self, id: &SessionId) -> Result<PublishAcknowledgement, ListingServiceError> {
        let mut session = self
            .lock_sessions()
            .remove(id)
            .ok_or_else(|| ListingServiceError::SessionNotFound(id.clone()))?;

        match session.publish(&self.publisher) {
            Ok((acknowledgement, _)) => {
                tracing::debug!(
                    session = %id,
                    listing_id = %acknowledgement.listing_id,
                    "listing session closed"
                );
                Ok(acknowledgement)
            }
            Err(err) => {
                self.lock_sessions().insert(id.clone(), session);
                Err(err.into())
            }
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, SessionStore> {
        self.sessions.lock().expect("session mutex poisoned")
    }

    fn with_session<T>(
        &self,
        id: &SessionId,
        action: impl FnOnce(&mut ListingSession) -> Result<T, SessionError>,
    ) -> Result<T, ListingServiceError> {
        let mut guard = self.lock_sessions();
        let session = guard
            .get_mut(id)
            .ok_or_else(|| ListingServiceError::SessionNotFound(id.clone()))?;
        Ok(action(session)?)
    }
}
