//! Rendering seam between the chat state machine and a presentation layer.
//!
//! - `message`: structured transcript entries (`RenderedMessage`)
//! - `view`: traits a presentation layer implements
//! - `renderer`: turns raw text into escaped, segmented entries (`MessageRenderer`)
//! - `memory`: in-memory view recording every update (`MemoryView`)

mod memory;
mod message;
mod renderer;
mod view;

pub use memory::MemoryView;
pub use message::{Emphasis, MessageHandle, RenderedMessage, Sender};
pub use renderer::{MessageRenderer, escape_text};
pub use view::{DiagnosticsView, NoticeView, TranscriptView};
