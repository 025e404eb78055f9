//! End-to-end engine scenarios over in-process doubles.

mod fakes;
mod pipeline;
