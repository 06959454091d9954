//! Importers from third-party formats

pub mod postman;
