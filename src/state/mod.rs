//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `SessionPhase`: lifecycle of a crawl session (idle, running, stopped, done)
//! - `CrawlSession`: the frontier, visited set and page budget of one session

mod session;
mod session_phase;

// Re-export main types
pub use session::CrawlSession;
pub use session_phase::SessionPhase;
