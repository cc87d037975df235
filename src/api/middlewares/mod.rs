pub mod content_negotiation;
pub mod cors;
