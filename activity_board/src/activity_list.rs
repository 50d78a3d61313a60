use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use activity_board_lib::{api::ApiClient, Activity, ActivityCollection};
use egui::{Color32, RichText, ScrollArea, Ui};
use pinboard::Pinboard;

#[derive(Debug, Clone)]
enum ListState {
    Loading,
    Loaded(ActivityCollection),
    Failed {
        // The previously loaded collection keeps the activity dropdown
        // usable while the list area shows the error.
        stale: Option<ActivityCollection>,
    },
}

impl ListState {
    fn collection(&self) -> Option<&ActivityCollection> {
        match self {
            ListState::Loading => None,
            ListState::Loaded(collection) => Some(collection),
            ListState::Failed { stale } => stale.as_ref(),
        }
    }
}

/// Owns the fetched activity collection and renders it as cards. Holds no
/// state between refreshes beyond the last server response; every refresh
/// replaces the rendered list wholesale.
pub struct ActivityListView {
    api: ApiClient,
    state: Arc<Pinboard<ListState>>,
    generation: Arc<AtomicU64>,
}

impl ActivityListView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(Pinboard::new(ListState::Loading)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Re-fetches the whole collection. Each refresh gets a fresh token that
    /// doubles as the cache buster; a response from an older refresh is
    /// discarded so a late arrival never overwrites a newer one.
    pub fn refresh(&self) {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let api = self.api.clone();
        let state = self.state.clone();
        let generation = self.generation.clone();
        tokio::spawn(async move {
            let result = api.fetch_activities(token).await;
            if generation.load(Ordering::SeqCst) != token {
                return;
            }
            match result {
                Ok(collection) => state.set(ListState::Loaded(collection)),
                Err(err) => {
                    println!("Error loading activities: {err}");
                    let stale = state.read().and_then(|prev| prev.collection().cloned());
                    state.set(ListState::Failed { stale });
                }
            }
        });
    }

    /// Activity names in the order the server returned them, for the signup
    /// form's dropdown. A failed refresh keeps the previous names.
    pub fn options(&self) -> Vec<String> {
        self.state
            .read()
            .and_then(|state| {
                state
                    .collection()
                    .map(|collection| collection.keys().cloned().collect())
            })
            .unwrap_or_default()
    }

    /// Renders the list and reports an unregister click as
    /// `(activity name, participant email)`.
    pub fn show(&self, ui: &mut Ui) -> Option<(String, String)> {
        let mut clicked = None;
        match self.state.read() {
            None | Some(ListState::Loading) => {
                ui.label("Loading activities...");
            }
            Some(ListState::Failed { .. }) => {
                ui.colored_label(Color32::RED, "Error loading activities.");
            }
            Some(ListState::Loaded(collection)) => {
                ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        for (name, activity) in &collection {
                            if let Some(unregister) = show_card(ui, name, activity) {
                                clicked = Some(unregister);
                            }
                            ui.add_space(4.0);
                        }
                    });
            }
        }
        clicked
    }
}

/// Rows under a card's participant header: the single placeholder for an
/// empty roster, otherwise one row per participant carrying the payload its
/// unregister button reports.
#[derive(Debug, Clone, PartialEq)]
enum RosterRow {
    NoParticipants,
    Unregister { activity: String, email: String },
}

fn roster_rows(name: &str, activity: &Activity) -> Vec<RosterRow> {
    if activity.participants.is_empty() {
        return vec![RosterRow::NoParticipants];
    }
    activity
        .participants
        .iter()
        .map(|email| RosterRow::Unregister {
            activity: name.to_owned(),
            email: email.clone(),
        })
        .collect()
}

fn show_card(ui: &mut Ui, name: &str, activity: &Activity) -> Option<(String, String)> {
    let mut clicked = None;
    ui.group(|ui| {
        ui.heading(name);
        ui.label(&activity.description);
        ui.horizontal(|ui| {
            ui.strong("Schedule:");
            ui.label(&activity.schedule);
        });
        ui.horizontal(|ui| {
            ui.strong("Spots available:");
            ui.label(format!(
                "{}/{}",
                activity.spots_available(),
                activity.max_participants
            ));
        });
        ui.strong(format!("Participants ({}):", activity.participants.len()));
        for row in roster_rows(name, activity) {
            match row {
                RosterRow::NoParticipants => {
                    ui.label(RichText::new("No participants yet").italics().weak());
                }
                RosterRow::Unregister { activity, email } => {
                    ui.horizontal(|ui| {
                        ui.label(&email);
                        if ui.small_button("✖").on_hover_text("Unregister").clicked() {
                            clicked = Some((activity, email));
                        }
                    });
                }
            }
        }
    });
    clicked
}
