//! Fake render and write collaborators for integration testing
//!
//! `apply()` only talks to its collaborators through the `Renderer`
//! and `Writer` traits, so these fakes let the tests observe exactly
//! what would be rendered, written, removed and reloaded:
//!
//! plan -> render each fragment -> write once -> notify
//!
//! ## Module layout
//!
//! - `renderer` -- stub templates, optionally failing for one kind
//! - `writer` -- in-memory file table plus an operation log

mod renderer;
mod writer;

pub use renderer::StubRenderer;
pub use writer::{Op, RecordingWriter};
