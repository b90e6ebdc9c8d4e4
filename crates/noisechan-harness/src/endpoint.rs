use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

use noisechan_bits::Role;
use noisechan_pipeline::ConfigError;

use crate::error::{HarnessError, Result};

/// Prefix stripped from every command argument, so words that look like
/// harness flags can be passed through to the endpoints.
pub const ESCAPE_PREFIX: &str = "___";

/// Flag appended to both endpoint commands in verbose runs.
pub const VERBOSE_FLAG: &str = "--verbose";

/// The command template both endpoints are launched from.
///
/// Each endpoint runs `program args... [--verbose] <role>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointCommand {
    program: String,
    args: Vec<String>,
    verbose: bool,
}

impl EndpointCommand {
    pub fn new<I, S>(command: I) -> std::result::Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = command.into_iter().map(|word| {
            let word = word.as_ref();
            word.strip_prefix(ESCAPE_PREFIX).unwrap_or(word).to_string()
        });
        let program = words.next().ok_or(ConfigError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The full argument vector for `role`, program first.
    pub fn argv(&self, role: Role) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        if self.verbose {
            argv.push(VERBOSE_FLAG.to_string());
        }
        argv.push(role.as_str().to_string());
        argv
    }

    fn command(&self, role: Role) -> Command {
        let argv = self.argv(role);
        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);
        match role {
            // The sender reads its input from the harness's own stdin.
            Role::Sender => command.stdin(Stdio::inherit()),
            Role::Receiver => command.stdin(Stdio::piped()),
        };
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        command
    }
}

/// A running endpoint process.
#[derive(Debug)]
pub struct Endpoint {
    role: Role,
    child: Child,
}

impl Endpoint {
    pub fn spawn(command: &EndpointCommand, role: Role) -> Result<Self> {
        let child = command
            .command(role)
            .spawn()
            .map_err(|source| HarnessError::Launch { role, source })?;
        tracing::debug!(%role, pid = child.id(), "endpoint started");
        Ok(Self { role, child })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn take_stdin(&mut self) -> Result<ChildStdin> {
        self.child.stdin.take().ok_or(HarnessError::MissingPipe {
            role: self.role,
            stream: "stdin",
        })
    }

    pub fn take_stdout(&mut self) -> Result<ChildStdout> {
        self.child.stdout.take().ok_or(HarnessError::MissingPipe {
            role: self.role,
            stream: "stdout",
        })
    }

    pub fn take_stderr(&mut self) -> Result<ChildStderr> {
        self.child.stderr.take().ok_or(HarnessError::MissingPipe {
            role: self.role,
            stream: "stderr",
        })
    }

    /// Kill the process, ignoring one that has already exited.
    pub fn kill(&mut self) {
        if let Err(err) = self.child.kill() {
            tracing::debug!(role = %self.role, error = %err, "kill failed");
        }
    }

    /// The exit status if the process has already exited.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    pub fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait()?;
        if status.success() {
            tracing::debug!(role = %self.role, %status, "endpoint exited");
        } else {
            tracing::warn!(role = %self.role, %status, "endpoint exited unsuccessfully");
        }
        Ok(status)
    }
}

/// Sender and receiver launched from the same command template.
#[derive(Debug)]
pub struct EndpointPair {
    pub sender: Endpoint,
    pub receiver: Endpoint,
}

impl EndpointPair {
    /// Start the sender, then the receiver.
    ///
    /// If the receiver fails to start, the sender is killed and reaped before
    /// the error is returned.
    pub fn launch(command: &EndpointCommand) -> Result<Self> {
        let mut sender = Endpoint::spawn(command, Role::Sender)?;
        let receiver = match Endpoint::spawn(command, Role::Receiver) {
            Ok(receiver) => receiver,
            Err(err) => {
                sender.kill();
                let _ = sender.child.wait();
                return Err(err);
            }
        };
        Ok(Self { sender, receiver })
    }

    pub fn kill(&mut self) {
        self.sender.kill();
        self.receiver.kill();
    }

    /// Kill both endpoints and reap them.
    pub fn shutdown(&mut self) {
        self.kill();
        for endpoint in [&mut self.sender, &mut self.receiver] {
            if let Err(err) = endpoint.wait() {
                tracing::debug!(role = %endpoint.role, error = %err, "reap failed");
            }
        }
    }
}
