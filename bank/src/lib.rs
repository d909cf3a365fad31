//! Family screen-time bank: children earn minutes through approved tasks and
//! spend them one metered minute at a time.
//!
//! Everything lives under [`backend`]; a presentation layer builds a
//! [`backend::Backend`] and talks to its `TimeBankApi`.

pub mod backend;
