use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Marking status. Serialized lowercase on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

/// One attendance row in a student's history, joined with the session's
/// day and subject.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentHistoryRecord {
    pub id: i32,
    pub student_id: i32,
    pub session_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub marked_by: Option<i32>,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub day_of_week: String,
    pub subject_name: String,
    pub subject_code: String,
}

/// One attendance row for a specific session+date, joined with the student.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionRecord {
    pub id: i32,
    pub student_id: i32,
    pub session_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub marked_by: Option<i32>,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub roll_number: String,
}

/// One row of the global recent-activity feed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentRecord {
    pub id: i32,
    pub student_id: i32,
    pub session_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub marked_by: Option<i32>,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub roll_number: String,
    pub subject_name: String,
    pub day_of_week: String,
}

/// Roster entry for marking: every student in the session's course,
/// left-joined with any record already present for that session+date.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionRosterEntry {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub attendance_status: Option<String>,
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_lowercase() {
        let parsed: AttendanceStatus = serde_json::from_str("\"present\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Present);
        assert_eq!(serde_json::to_string(&AttendanceStatus::Late).unwrap(), "\"late\"");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<AttendanceStatus>("\"excused\"").is_err());
        assert!(serde_json::from_str::<AttendanceStatus>("\"Present\"").is_err());
    }

    #[test]
    fn as_str_matches_wire_format() {
        assert_eq!(AttendanceStatus::Present.as_str(), "present");
        assert_eq!(AttendanceStatus::Absent.as_str(), "absent");
        assert_eq!(AttendanceStatus::Late.as_str(), "late");
    }
}
