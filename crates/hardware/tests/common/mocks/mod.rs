/// System-call handler that records every call.
pub mod handler;
