//! Corpsman - Physiology-Driven EKG Parameter Engine

pub mod compositor;
pub mod condition;
pub mod core;
pub mod effects;
pub mod engine;
pub mod physiology;
pub mod scenario;
pub mod scheduler;
