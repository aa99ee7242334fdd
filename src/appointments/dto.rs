use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::appointments::repo::Appointment;
use crate::datetime::sql_datetime;

/// Form body for the public booking endpoint. `time` is optional and
/// minute-precision; `message` is free text.
#[derive(Debug, Deserialize)]
pub struct AppointmentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserAppointmentsQuery {
    #[serde(default)]
    pub email: String,
}

/// Appointment as shown to the visitor who booked it.
#[derive(Debug, Serialize)]
pub struct AppointmentView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "sql_datetime")]
    pub appointment_date: PrimitiveDateTime,
    pub message: Option<String>,
}

impl From<Appointment> for AppointmentView {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            appointment_date: a.appointment_date,
            message: a.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserAppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<AppointmentView>,
}
