#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total: u64 },
    /// Sent after each processed item: `current` of `total` done, `label` names the item.
    TaskAdvance {
        current: u64,
        total: u64,
        label: String,
    },
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::PhaseStart { name: "Nothing" });
        reporter.report(Progress::TaskStart { total: 3 });
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p: Progress| {
            if let Progress::TaskAdvance { current, total, label } = p {
                sink.lock().unwrap().push((current, total, label));
            }
        }));

        reporter.report(Progress::TaskAdvance {
            current: 1,
            total: 2,
            label: "benzene".to_string(),
        });
        reporter.report(Progress::TaskFinish);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, 2, "benzene".to_string())]
        );
    }
}
