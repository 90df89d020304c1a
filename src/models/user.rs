//! User profile model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Coords;

/// Full user profile record as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Coarse location only
    #[serde(default)]
    pub location: Option<Coords>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize_minimal() {
        let json = r#"{"userID": "u1", "name": "Sam"}"#;
        let user: UserData = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, "u1");
        assert!(user.birthday.is_none());
        assert!(user.location.is_none());
    }

    #[test]
    fn test_user_deserialize_full() {
        let json = r#"{
            "userID": "u1",
            "name": "Sam",
            "gender": "female",
            "birthday": "1990-04-12",
            "location": {"lat": 45.5, "long": -73.6},
            "city": "Montreal"
        }"#;
        let user: UserData = serde_json::from_str(json).unwrap();
        assert_eq!(user.birthday, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(user.location, Some(Coords::new(45.5, -73.6)));
    }
}
