//! Compensation stack: undo actions recorded as the pipeline makes progress.

use anyhow::Result;

type Compensation = Box<dyn FnOnce() -> Result<()>>;

/// Ordered record of undo actions, unwound last-in first-out.
#[derive(Default)]
pub struct CompensationStack {
    actions: Vec<(String, Compensation)>,
}

impl CompensationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an undo action for a step that just succeeded.
    pub fn push(&mut self, label: impl Into<String>, undo: impl FnOnce() -> Result<()> + 'static) {
        self.actions.push((label.into(), Box::new(undo)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Keep everything: drop the recorded actions without running them.
    pub fn disarm(mut self) {
        self.actions.clear();
    }

    /// Run every action, newest first. Keeps going past failures.
    ///
    /// Returns the label and error of each action that failed.
    pub fn unwind(mut self) -> Vec<(String, anyhow::Error)> {
        let mut failures = Vec::new();
        while let Some((label, undo)) = self.actions.pop() {
            tracing::debug!("rollback: {label}");
            if let Err(err) = undo() {
                tracing::error!("rollback step '{label}' failed: {err:#}");
                failures.push((label, err));
            }
        }
        failures
    }
}
