pub mod core_domain;

pub use core_domain as core;
