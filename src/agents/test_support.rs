use crate::config::UpdateConfig;
use crate::error::{Result, UpdateError};
use crate::host::{LogLevel, PluginHost};
use std::cell::RefCell;
use std::process::ExitStatus;

type RecordedCommand = (String, Vec<String>);

/// In-memory host that records logs and commands instead of touching the terminal
#[derive(Default)]
pub struct RecordingHost {
    pub config: UpdateConfig,
    pub logs: RefCell<Vec<(LogLevel, String)>>,
    commands: RefCell<Vec<RecordedCommand>>,
    fail_spawn: bool,
    exit_code: i32,
}

impl RecordingHost {
    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Default::default()
        }
    }

    pub fn exiting_with(code: i32) -> Self {
        Self {
            exit_code: code,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.borrow().clone()
    }

    pub fn logged(&self, level: LogLevel, message: &str) -> bool {
        self.logs
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m == message)
    }

    pub fn has_level(&self, level: LogLevel) -> bool {
        self.logs.borrow().iter().any(|(l, _)| *l == level)
    }
}

impl PluginHost for RecordingHost {
    fn read_configuration(&self) -> Result<UpdateConfig> {
        Ok(self.config.clone())
    }

    fn emit_log(&self, level: LogLevel, message: &str) {
        self.logs.borrow_mut().push((level, message.to_string()));
    }

    fn run_child_process_sync(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        if self.fail_spawn {
            return Err(UpdateError::SpawnFailed {
                command: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }

        self.commands.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(exit_status(self.exit_code))
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    // Wait status encodes the exit code in the second byte.
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}
