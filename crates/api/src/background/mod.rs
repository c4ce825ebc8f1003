//! Background jobs spawned at server startup.

pub mod completion;
