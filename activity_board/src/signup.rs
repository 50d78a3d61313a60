use std::sync::{Arc, Mutex};

use activity_board_lib::api::{ApiClient, ApiError};
use egui::{Color32, ComboBox, RichText, TextEdit, Ui};

use crate::localdata::{self, LocalData};

#[derive(Debug, Clone)]
enum OpOutcome {
    SignedUp { message: String, email: String },
    Unregistered(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
enum MessageKind {
    Success,
    Error,
}

/// Transient feedback shown under the form. Overwritten by the next
/// operation, never cleared.
#[derive(Debug, Clone)]
struct UserMessage {
    text: String,
    kind: MessageKind,
}

impl UserMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

/// Owns the signup form and the per-participant unregister requests. Request
/// tasks publish their outcome into a shared slot; `poll` takes it on the UI
/// thread once per frame. A newer publish may overwrite an unconsumed older
/// one (last wins), but consuming and clearing the slot is a single `take`,
/// so a concurrently published outcome is never erased unapplied.
pub struct SignupController {
    api: ApiClient,
    email: String,
    selected: String,
    message: Option<UserMessage>,
    outcome: Arc<Mutex<Option<OpOutcome>>>,
}

impl SignupController {
    pub fn new(api: ApiClient, email: String) -> Self {
        Self {
            api,
            email,
            selected: String::new(),
            message: None,
            outcome: Arc::new(Mutex::new(None)),
        }
    }

    pub fn submit(&mut self) {
        if self.selected.is_empty() {
            self.message = Some(UserMessage::error("Please select an activity"));
            return;
        }
        let api = self.api.clone();
        let outcome = self.outcome.clone();
        let activity = self.selected.clone();
        let email = self.email.clone();
        tokio::spawn(async move {
            let result = match api.signup(&activity, &email).await {
                Ok(message) => OpOutcome::SignedUp { message, email },
                Err(ApiError::Rejected { detail, .. }) => OpOutcome::Failed(detail),
                Err(ApiError::Transport(err)) => {
                    println!("Signup request failed: {err}");
                    OpOutcome::Failed("Error signing up for activity".into())
                }
            };
            *outcome.lock().unwrap() = Some(result);
        });
    }

    pub fn unregister(&self, activity: &str, email: &str) {
        let api = self.api.clone();
        let outcome = self.outcome.clone();
        let activity = activity.to_owned();
        let email = email.to_owned();
        tokio::spawn(async move {
            let result = match api.unregister(&activity, &email).await {
                Ok(message) => OpOutcome::Unregistered(message),
                Err(ApiError::Rejected { detail, .. }) => OpOutcome::Failed(detail),
                Err(ApiError::Transport(err)) => {
                    println!("Unregister request failed: {err}");
                    OpOutcome::Failed("Error unregistering from activity".into())
                }
            };
            *outcome.lock().unwrap() = Some(result);
        });
    }

    /// Applies a pending operation outcome, if any. Returns true when the
    /// activity list should be refreshed.
    pub fn poll(&mut self) -> bool {
        let Some(outcome) = self.outcome.lock().unwrap().take() else {
            return false;
        };
        match outcome {
            OpOutcome::SignedUp { message, email } => {
                self.message = Some(UserMessage::success(message));
                // Persist the email the request was made with, not whatever
                // is in the field by the time the response lands.
                localdata::remember(&LocalData { email });
                self.email.clear();
                self.selected.clear();
                true
            }
            OpOutcome::Unregistered(text) => {
                self.message = Some(UserMessage::success(text));
                true
            }
            OpOutcome::Failed(text) => {
                self.message = Some(UserMessage::error(text));
                false
            }
        }
    }

    pub fn show_form(&mut self, ui: &mut Ui, options: &[String]) {
        ui.strong("Sign up for an activity");
        ui.add(TextEdit::singleline(&mut self.email).hint_text("you@example.com"));

        // The dropdown is rebuilt from the server's names every frame, with
        // the empty-value placeholder always on top.
        ComboBox::from_id_source("activity")
            .width(240.0)
            .selected_text(if self.selected.is_empty() {
                "-- Select an activity --".to_owned()
            } else {
                self.selected.clone()
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.selected, String::new(), "-- Select an activity --");
                for name in options {
                    ui.selectable_value(&mut self.selected, name.clone(), name);
                }
            });

        if ui.button("Sign Up").clicked() {
            self.submit();
        }

        if let Some(message) = &self.message {
            let color = match message.kind {
                MessageKind::Success => Color32::DARK_GREEN,
                MessageKind::Error => Color32::RED,
            };
            ui.label(RichText::new(&message.text).color(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn controller() -> SignupController {
        let api = ApiClient::new(Url::parse("http://localhost:8000/").unwrap());
        SignupController::new(api, String::new())
    }

    fn publish(controller: &SignupController, outcome: OpOutcome) {
        *controller.outcome.lock().unwrap() = Some(outcome);
    }

    #[test]
    fn submit_without_selection_issues_no_request() {
        let mut controller = controller();
        controller.email = "jane@example.com".into();

        controller.submit();

        let message = controller.message.clone().unwrap();
        assert_eq!(message.text, "Please select an activity");
        assert_eq!(message.kind, MessageKind::Error);
        // No task was spawned, so there is nothing to apply.
        assert!(!controller.poll());
        assert_eq!(controller.email, "jane@example.com");
    }

    #[test]
    fn successful_signup_clears_form_and_persists_the_submitted_email() {
        let mut controller = controller();
        // The field was edited while the request was in flight.
        controller.email = "edited@example.com".into();
        controller.selected = "Chess Club".into();
        publish(
            &controller,
            OpOutcome::SignedUp {
                message: "Signed up Jane for Chess Club".into(),
                email: "jane@example.com".into(),
            },
        );

        assert!(controller.poll());

        let message = controller.message.clone().unwrap();
        assert_eq!(message.text, "Signed up Jane for Chess Club");
        assert_eq!(message.kind, MessageKind::Success);
        assert!(controller.email.is_empty());
        assert!(controller.selected.is_empty());
        // What got persisted is the email the request carried.
        assert_eq!(localdata::get_localdata().email, "jane@example.com");
        // The outcome is consumed; no second refresh.
        assert!(!controller.poll());
    }

    #[test]
    fn rejected_signup_shows_detail_without_refresh() {
        let mut controller = controller();
        controller.email = "jane@example.com".into();
        controller.selected = "Chess Club".into();
        publish(&controller, OpOutcome::Failed("Activity full".into()));

        assert!(!controller.poll());

        let message = controller.message.clone().unwrap();
        assert_eq!(message.text, "Activity full");
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(controller.email, "jane@example.com");
    }

    #[test]
    fn unregister_outcome_refreshes_but_keeps_form() {
        let mut controller = controller();
        controller.email = "draft@example.com".into();
        publish(
            &controller,
            OpOutcome::Unregistered("Unregistered a@example.com from Chess Club".into()),
        );

        assert!(controller.poll());

        let message = controller.message.clone().unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(controller.email, "draft@example.com");
    }

    #[test]
    fn outcomes_from_rapid_operations_are_each_applied() {
        // Two unregister clicks in quick succession: consuming the first
        // outcome must not erase the second, whenever it lands.
        let mut controller = controller();
        publish(
            &controller,
            OpOutcome::Unregistered("Unregistered a@example.com from Chess Club".into()),
        );

        assert!(controller.poll());
        assert!(controller.outcome.lock().unwrap().is_none());

        publish(
            &controller,
            OpOutcome::Unregistered("Unregistered b@example.com from Chess Club".into()),
        );

        assert!(controller.poll());
        let message = controller.message.clone().unwrap();
        assert_eq!(message.text, "Unregistered b@example.com from Chess Club");
        assert_eq!(message.kind, MessageKind::Success);
    }
}
