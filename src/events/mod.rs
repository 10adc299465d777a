//! # Events Module
//!
//! Event-driven progress and diagnostic reporting.
//!
//! ## Design
//! The matching units emit events through a channel so that any UI
//! (CLI, test harness, GUI) can subscribe without the core touching the
//! console directly.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Match(MatchEvent::CandidateScored {
//!             candidate,
//!             score_percent,
//!             ..
//!         }) = event
//!         {
//!             println!("[{score_percent}%] {}", candidate.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sources, &candidates, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
