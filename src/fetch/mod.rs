// src/fetch/mod.rs

pub mod people;
pub mod web;

pub use people::PeopleClient;
pub use web::WebSearchClient;
