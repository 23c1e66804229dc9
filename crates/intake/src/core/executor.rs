/*!
Effect executor.

Interprets the reducer's `Effect`s. `Deliver` goes to a `SubmissionSink`,
`Log` goes to `tracing`. Sinks are the only place where the intake core
touches the outside world; their failures are reported to the caller and
never feed back into the session (the session already counts as submitted).

Sinks shipped here:
- `JsonFileSink`: one pretty-printed JSON file per session in a directory
- `MemorySink`:   collects records in memory (embedding, tests)
*/

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::core::effects::Effect;
use crate::core::state::SessionId;
use crate::error::SinkError;
use crate::record::SubmissionRecord;

/// Receiver of finished submission records (email gateway, storage, ...).
pub trait SubmissionSink {
    fn deliver(&mut self, session: SessionId, record: &SubmissionRecord) -> Result<(), SinkError>;
}

pub struct EffectExecutor<S> {
    sink: S,
    delivered: usize,
}

impl<S: SubmissionSink> EffectExecutor<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, delivered: 0 }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of records handed to the sink so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Run effects in order; stops at the first sink failure.
    pub fn run(&mut self, effects: Vec<Effect>) -> Result<(), SinkError> {
        for effect in effects {
            match effect {
                Effect::Deliver { session, record } => {
                    if let Err(e) = self.sink.deliver(session, &record) {
                        warn!(%session, error = %e, "delivery failed");
                        return Err(e);
                    }
                    self.delivered += 1;
                    info!(%session, "submission delivered");
                }
                Effect::Log(msg) => info!("{msg}"),
            }
        }
        Ok(())
    }
}

/// Writes `submission-<session>.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, session: SessionId) -> PathBuf {
        self.dir.join(format!("submission-{session}.json"))
    }
}

impl SubmissionSink for JsonFileSink {
    fn deliver(&mut self, session: SessionId, record: &SubmissionRecord) -> Result<(), SinkError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.path_for(session);
        let json = record.to_json_pretty()?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "submission written");
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<(SessionId, SubmissionRecord)>,
}

impl SubmissionSink for MemorySink {
    fn deliver(&mut self, session: SessionId, record: &SubmissionRecord) -> Result<(), SinkError> {
        self.records.push((session, record.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Intent, Session};
    use crate::field::{FieldKey, FieldValue, GroupField, GroupIndex};

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("intake_executor_{name}_{nanos}"))
    }

    fn submitted_session() -> (Session, Vec<Effect>) {
        let mut s = Session::default();
        let name = FieldKey::group(GroupIndex::new(0).unwrap(), GroupField::Name);
        for intent in [
            Intent::set(FieldKey::ClientName, FieldValue::text("Acme")),
            Intent::set(FieldKey::Region, FieldValue::choice("USA")),
            Intent::Advance,
            Intent::set(name, FieldValue::text("Butter")),
            Intent::Advance,
            Intent::Advance,
        ] {
            s.apply(intent).unwrap();
        }
        let effects = s.apply(Intent::Submit).unwrap();
        (s, effects)
    }

    #[test]
    fn memory_sink_receives_record_once() {
        let (mut s, effects) = submitted_session();
        let mut exec = EffectExecutor::new(MemorySink::default());
        exec.run(effects).unwrap();
        exec.run(s.apply(Intent::Submit).unwrap()).unwrap();

        assert_eq!(exec.delivered(), 1);
        let sink = exec.into_sink();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].0, s.id());
        assert_eq!(&sink.records[0].1, s.submitted().unwrap());
    }

    #[test]
    fn json_file_sink_writes_one_file_per_session() {
        let dir = unique_temp_dir("json");
        let (s, effects) = submitted_session();
        let mut exec = EffectExecutor::new(JsonFileSink::new(&dir));
        exec.run(effects).unwrap();

        let path = exec.sink().path_for(s.id());
        let content = fs::read_to_string(&path).expect("record file");
        let back: SubmissionRecord = serde_json::from_str(&content).unwrap();
        assert_eq!(&back, s.submitted().unwrap());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn log_effects_need_no_sink() {
        let mut exec = EffectExecutor::new(MemorySink::default());
        exec.run(vec![Effect::log("noop")]).unwrap();
        assert_eq!(exec.delivered(), 0);
    }
}
