//! Match participation integrity: who takes part in a match and with what score.

pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Entity, ParticipationError};
pub use memory::InMemoryStore;
pub use service::ParticipationService;
pub use store::{ParticipantDirectory, ParticipationStore, StoreError};
