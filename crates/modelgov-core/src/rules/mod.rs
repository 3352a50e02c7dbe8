pub mod integrity;
pub mod invariants;
pub mod validation;
