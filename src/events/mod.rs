//! # Events Module
//!
//! Event-driven progress reporting for ranking and search.
//!
//! Ranking and search push events into a channel; a front end (the CLI
//! progress bar, a web handler streaming status) drains the other end.
//!
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! let watcher = std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Rank(RankEvent::Progress(p)) = event {
//!             eprintln!("scored {}/{}", p.scored, p.total);
//!         }
//!     }
//! });
//!
//! let report = search.search_with_events(&store, Query::new(&photo), &ids, &sender);
//! drop(sender);
//! watcher.join().ok();
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
