//! Tagged error taxonomy for the router.
//!
//! Kept as a hand-written enum rather than reaching for an error-derive
//! crate: the teacher never depends on one, and `constraint::checker`'s
//! `Result<(), String>` diagnostics are the closest existing pattern --
//! this just gives that pattern a type instead of a bare `String`.
use std::fmt;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum RouterError {
    /// μ outside [0,1], a negative edge weight, or an unknown policy label.
    InvalidArgument(String),
    /// A flow with src==dst, an unknown node id, or net_rate <= 0.
    InvalidFlow(String),
    /// An app with empty peers, priority <= 0, or an unknown host.
    InvalidApp(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            RouterError::InvalidFlow(msg) => write!(f, "invalid flow: {}", msg),
            RouterError::InvalidApp(msg) => write!(f, "invalid app: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_message() {
        let err = RouterError::InvalidFlow("src == dst".to_string());
        assert_eq!(format!("{}", err), "invalid flow: src == dst");
    }
}
