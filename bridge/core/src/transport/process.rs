//! Editor process command line

use std::process::Stdio;

use tokio::process::Command;

/// Flag selecting the JSON UI
const UI_FLAGS: [&str; 2] = ["-ui", "json"];

/// Which editor session to attach to
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionTarget {
    /// A fresh, unnamed session
    #[default]
    Anonymous,
    /// Join an existing session (`-c <name>`)
    Connect(String),
    /// Start a named session (`-s <name>`)
    Create(String),
}

impl SessionTarget {
    fn args(&self) -> Vec<&str> {
        match self {
            Self::Anonymous => Vec::new(),
            Self::Connect(name) => vec!["-c", name.as_str()],
            Self::Create(name) => vec!["-s", name.as_str()],
        }
    }
}

/// How to start the editor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
    target: SessionTarget,
}

impl Default for EditorCommand {
    fn default() -> Self {
        Self::new("kak")
    }
}

impl EditorCommand {
    /// Run `program` with no extra arguments in an anonymous session
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            target: SessionTarget::Anonymous,
        }
    }

    /// Add arguments placed before the UI flag
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Set the session to attach to
    #[must_use]
    pub fn with_target(mut self, target: SessionTarget) -> Self {
        self.target = target;
        self
    }

    /// The binary to run
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The session target
    #[must_use]
    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    /// Full argument vector, program excluded
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        self.args
            .iter()
            .map(String::as_str)
            .chain(UI_FLAGS)
            .chain(self.target.args())
            .map(str::to_string)
            .collect()
    }

    /// Build the process with all three standard streams piped
    ///
    /// The child is killed if the handle is dropped without a shutdown.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.argv())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}
