//! The canonical example model: a single-value read/write register.

use std::fmt;

use crate::model::{Model, ModelState};

/// A register's state: the last written value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Register(pub i64);

/// A register call. A read's argument is `None` at invocation time (the
/// value isn't known yet) and `Some(observed)` once its completion has been
/// seen; see [`crate::op::History::resolved_call`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterCall {
    Write(i64),
    Read(Option<i64>),
}

impl fmt::Display for RegisterCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(v) => write!(f, "write({v})"),
            Self::Read(None) => write!(f, "read(?)"),
            Self::Read(Some(v)) => write!(f, "read({v})"),
        }
    }
}

impl Model for Register {
    type Call = RegisterCall;

    fn step(&self, call: &RegisterCall) -> ModelState<Self> {
        match *call {
            RegisterCall::Write(value) => ModelState::Live(Self(value)),
            // A wildcard read never tells us anything new: we don't yet
            // know what it observed, so it can't rule anything out.
            RegisterCall::Read(None) => ModelState::Live(*self),
            RegisterCall::Read(Some(observed)) => {
                if observed == self.0 {
                    ModelState::Live(*self)
                } else {
                    ModelState::Dead(format!(
                        "read observed {observed} but the register holds {}",
                        self.0
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replaces_value() {
        assert!(matches!(Register(0).step(&RegisterCall::Write(5)), ModelState::Live(Register(5))));
    }

    #[test]
    fn matching_read_is_live() {
        assert!(Register(5).step(&RegisterCall::Read(Some(5))).is_live());
    }

    #[test]
    fn mismatched_read_is_dead() {
        assert!(!Register(5).step(&RegisterCall::Read(Some(4))).is_live());
    }

    #[test]
    fn wildcard_read_never_rejects() {
        assert!(Register(5).step(&RegisterCall::Read(None)).is_live());
    }
}
