use super::collaborators::{Notification, NotificationKind};
use crate::catalog::Locale;

pub(crate) fn step_blocked(locale: Locale, step: &str, missing: &[String]) -> Notification {
    let missing = missing.join(", ");
    let (title, description) = match locale {
        Locale::De => (
            "Schritt noch gesperrt".to_string(),
            format!(
                "Bitte schließen Sie zuerst ab: {missing}. Danach ist „{step}“ verfügbar."
            ),
        ),
        Locale::En => (
            "Step not available yet".to_string(),
            format!("Please complete first: {missing}. \"{step}\" unlocks afterwards."),
        ),
    };
    Notification {
        kind: NotificationKind::Warning,
        title,
        description,
    }
}

pub(crate) fn step_completed(locale: Locale, step: &str) -> Notification {
    let (title, description) = match locale {
        Locale::De => (
            "Schritt abgeschlossen".to_string(),
            format!("„{step}“ wurde als erledigt markiert."),
        ),
        Locale::En => (
            "Step completed".to_string(),
            format!("\"{step}\" has been marked as done."),
        ),
    };
    Notification {
        kind: NotificationKind::Success,
        title,
        description,
    }
}

pub(crate) fn workflow_completed(locale: Locale, workflow: &str) -> Notification {
    let (title, description) = match locale {
        Locale::De => (
            "Workflow abgeschlossen".to_string(),
            format!("Sie haben alle Schritte von „{workflow}“ durchlaufen."),
        ),
        Locale::En => (
            "Workflow complete".to_string(),
            format!("You have gone through every step of \"{workflow}\"."),
        ),
    };
    Notification {
        kind: NotificationKind::Success,
        title,
        description,
    }
}

pub(crate) fn workflow_reset(locale: Locale, workflow: &str) -> Notification {
    let (title, description) = match locale {
        Locale::De => (
            "Fortschritt zurückgesetzt".to_string(),
            format!("„{workflow}“ beginnt wieder beim ersten Schritt."),
        ),
        Locale::En => (
            "Progress reset".to_string(),
            format!("\"{workflow}\" starts over at the first step."),
        ),
    };
    Notification {
        kind: NotificationKind::Info,
        title,
        description,
    }
}
