//! Access gate: password check before settings-mutating commands.
//!
//! The home service itself knows nothing about authentication. The console
//! asks this gate before it forwards any command that changes the home.

/// Where the gate currently stands for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Granted,
    /// Attempts exhausted for the current request.
    Denied,
}

/// Result of one password attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Granted,
    Retry { remaining: u32 },
    Denied,
}

/// Password gate with a bounded number of attempts per settings request.
///
/// Once granted, the gate stays open for the rest of the session. A denial
/// only refuses the request that used up the attempts; the next request
/// starts over with a full set via [`AccessGate::reopen`].
#[derive(Debug)]
pub struct AccessGate {
    password: String,
    max_attempts: u32,
    failures: u32,
    state: GateState,
}

impl AccessGate {
    pub fn new(password: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            password: password.into(),
            max_attempts: max_attempts.max(1),
            failures: 0,
            state: GateState::Locked,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Start a fresh round of attempts after a denial. Does nothing while
    /// locked or granted.
    pub fn reopen(&mut self) {
        if self.state == GateState::Denied {
            self.failures = 0;
            self.state = GateState::Locked;
            tracing::debug!("access gate reopened");
        }
    }

    /// Check one password attempt. Attempts after a final verdict do not
    /// change it.
    pub fn attempt(&mut self, input: &str) -> Attempt {
        match self.state {
            GateState::Granted => return Attempt::Granted,
            GateState::Denied => return Attempt::Denied,
            GateState::Locked => {}
        }
        if input.trim() == self.password {
            self.state = GateState::Granted;
            tracing::info!("access granted");
            return Attempt::Granted;
        }
        self.failures += 1;
        if self.failures >= self.max_attempts {
            self.state = GateState::Denied;
            tracing::warn!(attempts = self.failures, "access denied");
            Attempt::Denied
        } else {
            tracing::debug!(failures = self.failures, "wrong password");
            Attempt::Retry {
                remaining: self.max_attempts - self.failures,
            }
        }
    }
}
