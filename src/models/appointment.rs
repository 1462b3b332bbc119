use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub token_image: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Verified,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Verified => "verified",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "verified" => AppointmentStatus::Verified,
            _ => AppointmentStatus::Pending,
        }
    }
}
