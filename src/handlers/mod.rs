pub mod attendance;
pub mod auth;
pub mod courses;
pub mod reports;
pub mod stats;
pub mod students;
pub mod subjects;
pub mod timetable;
