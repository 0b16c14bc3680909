//! User-initiated actions: price prediction, viewing booking, comparison
//! and chat.
//!
//! Every action validates its input before any network call, holds a
//! loading flag for its whole duration and reports remote failures through
//! a dismissable [`Notification`] as well as the returned error.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use locafinder_core::logging::targets;
use locafinder_core::{Property, ReadOnlyProperty, Signal};
use locafinder_net::WebhookClient;
use locafinder_net::webhook::{
    BookingRequest, ChatRequest, CompareRequest, Comparison, PredictRequest, Prediction,
};

use crate::error::{Error, Result};
use crate::model::Point;

/// The kinds of user-initiated action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Predict,
    Book,
    Compare,
    Chat,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Predict => "price prediction",
            Self::Book => "booking",
            Self::Compare => "comparison",
            Self::Chat => "chat",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A message shown to the user until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: ActionKind,
    pub level: NotificationLevel,
    pub message: String,
}

/// The viewing booking form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub note: String,
}

impl BookingForm {
    /// Check that name, phone, date and time are filled in.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("date", &self.date),
            ("time", &self.time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::incomplete(missing))
        }
    }

    fn into_request(self, point: &Point, timestamp: String) -> BookingRequest {
        BookingRequest {
            timestamp,
            name: self.name,
            phone: self.phone,
            email: self.email,
            date: self.date,
            time: self.time,
            note: self.note,
            point_name: point.name.clone(),
            address: point.address.clone(),
            price: point.price,
            area: point.area,
        }
    }
}

#[derive(Debug, Default)]
struct LoadingFlags {
    predict: Property<bool>,
    book: Property<bool>,
    compare: Property<bool>,
    chat: Property<bool>,
}

impl LoadingFlags {
    fn get(&self, kind: ActionKind) -> &Property<bool> {
        match kind {
            ActionKind::Predict => &self.predict,
            ActionKind::Book => &self.book,
            ActionKind::Compare => &self.compare,
            ActionKind::Chat => &self.chat,
        }
    }
}

/// Runs actions against the automation webhooks.
pub struct Actions {
    webhooks: WebhookClient,
    loading: LoadingFlags,
    notifications: Mutex<Vec<Notification>>,
    next_notification: AtomicU64,
    /// Emitted when an action's loading flag changes.
    pub loading_changed: Signal<(ActionKind, bool)>,
    /// Emitted for every new notification.
    pub notified: Signal<Notification>,
}

impl Actions {
    pub fn new(webhooks: WebhookClient) -> Self {
        Self {
            webhooks,
            loading: LoadingFlags::default(),
            notifications: Mutex::new(Vec::new()),
            next_notification: AtomicU64::new(1),
            loading_changed: Signal::new(),
            notified: Signal::new(),
        }
    }

    /// Whether an action of `kind` is in progress.
    pub fn is_loading(&self, kind: ActionKind) -> bool {
        self.loading(kind).get()
    }

    /// The loading flag of `kind`, for hosts that bind a control to it.
    pub fn loading(&self, kind: ActionKind) -> ReadOnlyProperty<'_, bool> {
        self.loading.get(kind).view()
    }

    /// Notifications not yet dismissed, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Dismiss a notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut notifications = self.notifications.lock();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        notifications.len() != before
    }

    /// Ask for a price prediction for `point`.
    pub async fn predict(&self, point: &Point) -> Result<Prediction> {
        let _loading = self.begin(ActionKind::Predict);
        let request = PredictRequest {
            name: point.name.clone(),
            address: point.address.clone(),
            area: point.area,
            price: point.price,
        };
        let result = self.webhooks.predict(&request).await.map_err(Error::from);
        self.report(ActionKind::Predict, result, |_| None)
    }

    /// Book a viewing of `point`.
    ///
    /// The form is validated first; an incomplete form sends nothing.
    pub async fn book(&self, point: &Point, form: BookingForm) -> Result<()> {
        form.validate()?;
        let _loading = self.begin(ActionKind::Book);
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let request = form.into_request(point, timestamp);
        let result = self.webhooks.book(&request).await.map_err(Error::from);
        self.report(ActionKind::Book, result, |_| {
            Some("Booking submitted, the owner will contact you soon".to_string())
        })
    }

    /// Compare two points by name.
    pub async fn compare(&self, first: &str, second: &str) -> Result<Comparison> {
        let missing: Vec<&'static str> = [("first point", first), ("second point", second)]
            .into_iter()
            .filter(|(_, name)| name.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(Error::incomplete(missing));
        }

        let _loading = self.begin(ActionKind::Compare);
        let request = CompareRequest {
            prop1: first.to_string(),
            prop2: second.to_string(),
        };
        let result = self.webhooks.compare(&request).await.map_err(Error::from);
        self.report(ActionKind::Compare, result, |_| None)
    }

    /// Send a chat prompt. `Ok(None)` means the assistant had no answer.
    pub async fn chat(&self, prompt: &str) -> Result<Option<String>> {
        if prompt.trim().is_empty() {
            return Err(Error::incomplete(vec!["prompt"]));
        }
        let _loading = self.begin(ActionKind::Chat);
        let request = ChatRequest {
            prompt: prompt.to_string(),
        };
        let result = self.webhooks.chat(&request).await.map_err(Error::from);
        self.report(ActionKind::Chat, result, |_| None)
    }

    fn begin(&self, kind: ActionKind) -> LoadingGuard<'_> {
        self.set_loading(kind, true);
        LoadingGuard {
            actions: self,
            kind,
        }
    }

    fn set_loading(&self, kind: ActionKind, loading: bool) {
        if self.loading.get(kind).set(loading) {
            self.loading_changed.emit((kind, loading));
        }
    }

    fn report<T>(
        &self,
        kind: ActionKind,
        result: Result<T>,
        success: impl FnOnce(&T) -> Option<String>,
    ) -> Result<T> {
        match &result {
            Ok(value) => {
                if let Some(message) = success(value) {
                    self.notify(kind, NotificationLevel::Success, message);
                }
            }
            Err(err) => {
                tracing::warn!(target: targets::ACTIONS, %kind, error = %err, "action failed");
                self.notify(kind, NotificationLevel::Error, format!("The {kind} request failed"));
            }
        }
        result
    }

    fn notify(&self, kind: ActionKind, level: NotificationLevel, message: String) {
        let notification = Notification {
            id: self.next_notification.fetch_add(1, Ordering::SeqCst),
            kind,
            level,
            message,
        };
        self.notifications.lock().push(notification.clone());
        self.notified.emit(notification);
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions")
            .field("endpoints", self.webhooks.endpoints())
            .field("loading", &self.loading)
            .field("notifications", &self.notifications.lock().len())
            .finish_non_exhaustive()
    }
}

/// Clears an action's loading flag when dropped.
struct LoadingGuard<'a> {
    actions: &'a Actions,
    kind: ActionKind,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.actions.set_loading(self.kind, false);
    }
}
