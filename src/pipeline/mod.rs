//! Stages of a probe run.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ client ──▶ materialize
//! (--url/--image) (base64) (POST) (files on disk)
//! ```
//!
//! 1. [`input`]       — pick URL, local file or demo image and build the payload
//! 2. [`encode`]      — base64 for local documents out and images back in
//! 3. [`crate::client`] — the single POST; the only stage with network I/O
//! 4. [`materialize`] — write Markdown, images and JSON for every page

pub mod encode;
pub mod input;
pub mod materialize;
