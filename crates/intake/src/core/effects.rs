//! Declarative side effects emitted by the reducer.
//!
//! The reducer never talks to the outside world; it returns these and the
//! `EffectExecutor` interprets them.

use std::fmt;

use crate::core::state::SessionId;
use crate::record::SubmissionRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the finished record to the external sink. Emitted at most once per session.
    Deliver {
        session: SessionId,
        record: SubmissionRecord,
    },
    /// Informational message for the log.
    Log(String),
}

impl Effect {
    pub fn log<T: Into<String>>(msg: T) -> Self {
        Effect::Log(msg.into())
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Deliver { session, record } => {
                write!(f, "Deliver(session={session}, client={})", record.client_name)
            }
            Effect::Log(msg) => write!(f, "Log({msg})"),
        }
    }
}
