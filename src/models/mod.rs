pub mod appointment;
pub mod director;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use director::DirectorGeneral;
pub use user::User;
