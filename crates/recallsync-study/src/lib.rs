//! recallsync Study - Study session state machine
//!
//! Drives one study pass over a deck's due cards: load the queue, reveal
//! the current card, grade it, advance. All review writes go through the
//! mutation coordinator, so the cache sees the same optimistic pipeline
//! as every other mutation.

pub mod controller;

pub use controller::{SessionError, SessionPhase, StudySessionController};
