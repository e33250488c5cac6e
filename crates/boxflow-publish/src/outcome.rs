use std::process::ExitStatus;

/// Exit code a deploy script uses for a failure the run may continue past
pub const NON_FATAL_EXIT_CODE: i32 = 3;

/// Classified result of one deploy-script invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Succeeded,
    NonFatal,
    Fatal(i32),
}

impl ScriptOutcome {
    /// Killed by a signal counts as fatal with code 1
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ScriptOutcome::Succeeded,
            Some(NON_FATAL_EXIT_CODE) => ScriptOutcome::NonFatal,
            Some(code) => ScriptOutcome::Fatal(code),
            None => ScriptOutcome::Fatal(1),
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        Self::from_code(status.code())
    }
}
