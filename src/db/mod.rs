pub mod catalog_queries;
pub mod helpers;
pub mod participation_queries;

pub use catalog_queries::CatalogQueries;
pub use participation_queries::PgParticipationStore;
