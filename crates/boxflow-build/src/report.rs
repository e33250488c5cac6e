use boxflow_container::ContainerError;
use boxflow_core::BuildTarget;

/// Outcome of one build invocation, in run order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// Targets not built because `PT_SKIP_BUILD` is set
    pub skipped: Vec<String>,
}

impl BuildReport {
    pub fn record(&mut self, name: &str, ok: bool) {
        if ok {
            self.succeeded.push(name.to_string());
        } else {
            self.failed.push(name.to_string());
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Progress callbacks for presenting a build
pub trait BuildReporter {
    fn validating(&self, _name: &str) {}
    fn missing(&self, _name: &str, _error: &ContainerError) {}
    fn skipped(&self, _name: &str) {}
    fn building(&self, _target: &BuildTarget, _image: &str) {}
    fn run_error(&self, _name: &str, _error: &ContainerError) {}
    fn finished(&self, _name: &str, _ok: bool) {}
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl BuildReporter for NoopReporter {}
