use crate::catalog::Locale;
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

/// Moves the UI to a step's target view.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Surfaces toasts and confirmations to the user.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

pub trait LocaleSource {
    fn current_locale(&self) -> Locale;
}

impl LocaleSource for Locale {
    fn current_locale(&self) -> Locale {
        *self
    }
}

pub struct Collaborators {
    pub navigator: Box<dyn Navigator>,
    pub notifier: Box<dyn Notifier>,
    pub locale: Box<dyn LocaleSource>,
}

impl Collaborators {
    pub fn new(
        navigator: impl Navigator + 'static,
        notifier: impl Notifier + 'static,
        locale: impl LocaleSource + 'static,
    ) -> Self {
        Self {
            navigator: Box::new(navigator),
            notifier: Box::new(notifier),
            locale: Box::new(locale),
        }
    }
}

/// Keeps every navigated path. Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    pub fn last_path(&self) -> Option<String> {
        self.paths().pop()
    }

    pub fn take(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|mut paths| std::mem::take(&mut *paths))
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }
}

/// Keeps every notification. Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|mut items| std::mem::take(&mut *items))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut items) = self.notifications.lock() {
            items.push(notification);
        }
    }
}
