//! A register supporting compare-and-swap, read and write.

use std::fmt;

use crate::model::{Model, ModelState};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CasRegister(pub i64);

/// `Cas(expected, new)` succeeds (and reports `true`) iff the register
/// currently holds `expected`; otherwise the register is unchanged and the
/// call reports `false`. Both outcomes are only known once the completion is
/// observed, same as a plain read.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CasCall {
    Write(i64),
    Read(Option<i64>),
    /// `Cas(expected, new, observed_success)`.
    Cas(i64, i64, Option<bool>),
}

impl fmt::Display for CasCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(v) => write!(f, "write({v})"),
            Self::Read(None) => write!(f, "read(?)"),
            Self::Read(Some(v)) => write!(f, "read({v})"),
            Self::Cas(expected, new, None) => write!(f, "cas({expected}, {new})=?"),
            Self::Cas(expected, new, Some(ok)) => write!(f, "cas({expected}, {new})={ok}"),
        }
    }
}

impl Model for CasRegister {
    type Call = CasCall;

    fn step(&self, call: &CasCall) -> ModelState<Self> {
        match *call {
            CasCall::Write(value) => ModelState::Live(Self(value)),
            CasCall::Read(None) => ModelState::Live(*self),
            CasCall::Read(Some(observed)) => {
                if observed == self.0 {
                    ModelState::Live(*self)
                } else {
                    ModelState::Dead(format!("read observed {observed} but register holds {}", self.0))
                }
            }
            CasCall::Cas(_, _, None) => ModelState::Live(*self),
            CasCall::Cas(expected, new, Some(reported_success)) => {
                let would_succeed = expected == self.0;
                if would_succeed != reported_success {
                    return ModelState::Dead(format!(
                        "cas({expected}, {new}) reported success={reported_success} but the \
                         register holds {} (would have {})",
                        self.0,
                        if would_succeed { "succeeded" } else { "failed" }
                    ));
                }
                ModelState::Live(if would_succeed { Self(new) } else { *self })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cas_succeeds_when_expectation_matches() {
        let next = CasRegister(1).step(&CasCall::Cas(1, 2, Some(true)));
        assert!(matches!(next, ModelState::Live(CasRegister(2))));
    }

    #[test]
    fn cas_reporting_success_against_mismatch_is_dead() {
        assert!(!CasRegister(1).step(&CasCall::Cas(0, 2, Some(true))).is_live());
    }

    #[test]
    fn cas_reporting_failure_leaves_register_untouched() {
        let next = CasRegister(1).step(&CasCall::Cas(0, 2, Some(false)));
        assert!(matches!(next, ModelState::Live(CasRegister(1))));
    }
}
