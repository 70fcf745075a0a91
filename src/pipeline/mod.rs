//! Pipeline stages for question generation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the network stage can be swapped for a stub.
//!
//! ## Data Flow
//!
//! ```text
//! request ──▶ llm ──▶ extract ──▶ validate
//! (cap+prompt) (HTTP)  (unwrap)    (parse+normalise)
//! ```
//!
//! 1. [`request`]  — reject empty text, cap it, render the prompt
//! 2. [`llm`]      — one chat-completion call; the only stage with network I/O
//! 3. [`extract`]  — strip code fences and chatter around the JSON object
//! 4. [`validate`] — check the shape, drop broken entries, coerce marks
//!
//! Every stage either produces the next stage's input or fails the whole call.

pub mod extract;
pub mod llm;
pub mod request;
pub mod validate;
