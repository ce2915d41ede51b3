// State managers
// Managers own mutable application state.

pub mod collection_store;
