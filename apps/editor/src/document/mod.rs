// Resume document ownership: typed mutations, id minting, persistence port.

pub mod handlers;
pub mod ids;
pub mod mutation;
pub mod store;

pub use mutation::{DocumentModel, Mutation, MutationOutcome, Section};
pub use store::{InMemoryStore, ResumeStore};
