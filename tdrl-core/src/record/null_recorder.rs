use super::{Record, Recorder};

/// A recorder that ignores any record.
#[derive(Debug, Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _record: Record) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_recorder_accepts_records() {
        let mut recorder = NullRecorder::default();
        recorder.write(Record::from_scalar("td_error", 0.0));
        recorder.write(Record::empty());
    }
}
