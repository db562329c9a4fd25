// Adapters layer: the collaborators around the calculation core (input store, report formatting).

pub mod persistence;
pub mod presentation;
