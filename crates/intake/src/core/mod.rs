//! Session runtime of the intake form.
//!
//! Pipeline:
//!   Intent ──reduce──▶ Session (store + step) ──▶ Vec<Effect> ──EffectExecutor──▶ sink
//!
//! - `state`    : `Session`, the per-user root state
//! - `intent`   : inbound events (`Intent`) and their script wire form
//! - `reducer`  : pure transition function
//! - `effects`  : declarative side effects emitted by the reducer
//! - `executor` : interprets effects against a `SubmissionSink`
//! - `view`     : outbound snapshot for the rendering layer
pub mod effects;
pub mod executor;
pub mod intent;
pub mod reducer;
pub mod state;
pub mod view;

pub use effects::Effect;
pub use executor::{EffectExecutor, JsonFileSink, MemorySink, SubmissionSink};
pub use intent::{Intent, ScriptStep};
pub use state::{Session, SessionId};
pub use view::SessionView;
