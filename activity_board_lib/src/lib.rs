use indexmap::IndexMap;

pub mod api;

/// The collection exactly as the server returns it: activity name mapped to
/// its details, in the server's own order. The server order is authoritative
/// and is never re-sorted client-side.
pub type ActivityCollection = IndexMap<String, Activity>;

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity, clamped at zero should the server ever report an
    /// over-capacity roster.
    pub fn spots_available(&self) -> u32 {
        self.max_participants
            .saturating_sub(self.participants.len() as u32)
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct SignupResponse {
    pub message: String,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVITIES_JSON: &str = r#"{
        "Chess Club": {
            "description": "Learn strategies and compete in tournaments",
            "schedule": "Fridays, 3:30 PM - 5:00 PM",
            "max_participants": 12,
            "participants": ["michael@mergington.edu", "daniel@mergington.edu"]
        },
        "Gym Class": {
            "description": "Physical education and sports",
            "schedule": "Mondays, 3:30 PM - 5:00 PM",
            "max_participants": 30,
            "participants": []
        },
        "Art Studio": {
            "description": "Painting and drawing",
            "schedule": "Tuesdays, 3:30 PM - 5:00 PM",
            "max_participants": 10,
            "participants": ["amy@mergington.edu"]
        }
    }"#;

    #[test]
    fn collection_keeps_server_order() {
        let collection: ActivityCollection = serde_json::from_str(ACTIVITIES_JSON).unwrap();
        assert_eq!(collection.len(), 3);

        let names: Vec<&str> = collection.keys().map(String::as_str).collect();
        assert_eq!(names, ["Chess Club", "Gym Class", "Art Studio"]);
    }

    #[test]
    fn spots_available_subtracts_roster() {
        let collection: ActivityCollection = serde_json::from_str(ACTIVITIES_JSON).unwrap();
        assert_eq!(collection["Chess Club"].spots_available(), 10);
        assert_eq!(collection["Gym Class"].spots_available(), 30);
    }

    #[test]
    fn spots_available_clamps_over_capacity() {
        let activity = Activity {
            description: "Overbooked".into(),
            schedule: "Fridays".into(),
            max_participants: 1,
            participants: vec!["a@example.com".into(), "b@example.com".into()],
        };
        assert_eq!(activity.spots_available(), 0);
    }
}
