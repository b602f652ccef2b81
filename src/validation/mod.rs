pub mod observation;

pub use observation::{validate_observation, ObservationPayload};
