use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity supplied by the authentication collaborator.
///
/// The editor only cares whether a user is present and what to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}

impl CurrentUser {
    /// Initials shown in the avatar bubble, e.g. "JD" for "John Doe".
    pub fn initials(&self) -> String {
        let source = if self.display_name.trim().is_empty() {
            self.email.as_str()
        } else {
            self.display_name.as_str()
        };
        source
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
