pub mod observation;
pub mod site;
pub mod user;

pub use observation::{NewObservation, Observation, ObservationRow};
pub use site::{Site, SiteRef};
pub use user::{NewUser, User, UserRow};
