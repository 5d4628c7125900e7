//! Operator console: turns input lines into home service calls.
//!
//! The console is synchronous and owns the whole session state. Timers
//! that came due since the last line are fired and announced before the
//! line itself is handled, so the home is always current when a command
//! runs.

use smarthome_app::ports::Clock;
use smarthome_app::services::home_service::HomeService;
use smarthome_domain::error::{HomeError, NotFoundError};
use smarthome_domain::id::{DeviceId, RoomId};
use smarthome_domain::timer::TimerFiring;

use crate::access::{AccessGate, Attempt, GateState};
use crate::command::{Command, HELP};
use crate::config::OutputFormat;
use crate::render::{Failure, Reply, render};

/// What the session loop prints after one line or tick.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Text to print, empty when there is nothing to say.
    pub text: String,
    /// The operator asked to leave.
    pub quit: bool,
}

/// A console session over one home.
pub struct Console<C> {
    service: HomeService<C>,
    gate: AccessGate,
    format: OutputFormat,
    /// Mutating command waiting for the password.
    pending: Option<Command>,
}

impl<C: Clock> Console<C> {
    pub fn new(service: HomeService<C>, gate: AccessGate, format: OutputFormat) -> Self {
        Self {
            service,
            gate,
            format,
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn service(&self) -> &HomeService<C> {
        &self.service
    }

    /// Prompt for the next line.
    pub fn prompt(&self) -> &'static str {
        if self.pending.is_some() {
            "Password: "
        } else {
            "> "
        }
    }

    /// Greeting printed once when the session starts.
    pub fn banner(&self) -> String {
        self.show(&Reply::Message(format!(
            "Welcome to mySmart Home ({}). Type `help` for commands.",
            self.service.local_time().format("%c")
        )))
    }

    /// Handle one input line.
    #[tracing::instrument(skip(self, line))]
    pub fn handle_line(&mut self, line: &str) -> Response {
        let mut parts = self.fire_due_timers();
        let (reply, quit) = match self.pending.take() {
            Some(command) => (self.authenticate(command, line), false),
            None => match Command::parse(line) {
                Ok(None) => (None, false),
                Ok(Some(command)) => {
                    let quit = command == Command::Quit;
                    (Some(self.dispatch(command)), quit)
                }
                Err(err) => {
                    tracing::debug!(%err, "unparseable input");
                    (Some(Reply::Failed(err.into())), false)
                }
            },
        };
        parts.extend(reply.map(|reply| self.show(&reply)));
        Response {
            text: parts.join("\n"),
            quit,
        }
    }

    /// Fire and announce timers that came due since the last call.
    pub fn tick(&mut self) -> Response {
        Response {
            text: self.fire_due_timers().join("\n"),
            quit: false,
        }
    }

    fn fire_due_timers(&mut self) -> Vec<String> {
        let now = self.service.now();
        self.service
            .process_due_timers(now)
            .iter()
            .filter_map(|firing| self.announce(firing))
            .map(|message| self.show(&Reply::Message(message)))
            .collect()
    }

    fn announce(&self, firing: &TimerFiring) -> Option<String> {
        let event = &firing.event;
        let (room, device) = self.service.home().device(event.device_id).ok()?;
        Some(format!(
            "[{}] {} in {} is now {}.",
            self.service.to_local(event.at).format("%H:%M"),
            device.name,
            room.name,
            firing.status
        ))
    }

    fn dispatch(&mut self, command: Command) -> Reply {
        if !command.mutates() {
            return self.execute(command);
        }
        self.gate.reopen();
        match self.gate.state() {
            GateState::Granted => self.execute(command),
            GateState::Locked | GateState::Denied => {
                self.pending = Some(command);
                Reply::Message("Password required to change settings.".to_string())
            }
        }
    }

    fn authenticate(&mut self, command: Command, input: &str) -> Option<Reply> {
        Some(match self.gate.attempt(input) {
            Attempt::Granted => self.execute(command),
            Attempt::Retry { remaining } => {
                self.pending = Some(command);
                Reply::Message(format!(
                    "Incorrect password. {remaining} attempt(s) remaining."
                ))
            }
            Attempt::Denied => Reply::Message("Access denied.".to_string()),
        })
    }

    fn execute(&mut self, command: Command) -> Reply {
        match self.try_execute(command) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::debug!(%err, "command refused");
                Reply::Failed(Failure::from(err))
            }
        }
    }

    fn try_execute(&mut self, command: Command) -> Result<Reply, HomeError> {
        let now = self.service.now();
        Ok(match command {
            Command::Help => Reply::Message(HELP.to_string()),
            Command::Quit => Reply::Message("Goodbye.".to_string()),
            Command::AddRooms(names) => {
                let ids = self.service.add_rooms(names)?;
                Reply::Message(format!("{} room(s) added.", ids.len()))
            }
            Command::AddDevice { room, watts, name } => {
                let room_id = self.room_at(room)?;
                self.service.add_device(room_id, &name, watts)?;
                Reply::Message(format!("Device '{name}' added."))
            }
            Command::Toggle { room, device } => {
                let device_id = self.device_at(room, device)?;
                let status = self.service.toggle_device(device_id, now)?;
                Reply::Message(format!("Device is now {status}."))
            }
            Command::Schedule {
                room,
                device,
                on,
                off,
            } => {
                let device_id = self.device_at(room, device)?;
                let status = self.service.schedule_device(device_id, &on, &off, now)?;
                Reply::Message(format!(
                    "Device scheduled from {on} to {off}, currently {status}."
                ))
            }
            Command::Status { room } => {
                let room_id = room.map(|position| self.room_at(position)).transpose()?;
                let entries = self.service.get_status(room_id)?;
                let rooms = self
                    .service
                    .home()
                    .rooms()
                    .iter()
                    .filter(|r| room_id.is_none_or(|id| id == r.id))
                    .map(|r| (r.id, r.name.clone()))
                    .collect();
                Reply::Status { rooms, entries }
            }
            Command::Report => Reply::Report(self.service.get_report()),
            Command::Trends => Reply::Trends(self.service.get_trends()),
            Command::Timers => Reply::Timers {
                pending: self.service.pending_timers(),
                next_due: self.service.next_timer().map(|at| self.service.to_local(at)),
            },
        })
    }

    fn room_at(&self, position: usize) -> Result<RoomId, HomeError> {
        self.service
            .home()
            .rooms()
            .get(position.wrapping_sub(1))
            .map(|room| room.id)
            .ok_or_else(|| not_found("Room", position))
    }

    fn device_at(&self, room: usize, device: usize) -> Result<DeviceId, HomeError> {
        let room_id = self.room_at(room)?;
        self.service
            .home()
            .room(room_id)?
            .devices
            .get(device.wrapping_sub(1))
            .map(|device| device.id)
            .ok_or_else(|| not_found("Device", device))
    }

    fn show(&self, reply: &Reply) -> String {
        render(reply, self.format, self.service.local_time())
    }
}

fn not_found(entity: &'static str, position: usize) -> HomeError {
    NotFoundError {
        entity,
        id: format!("#{position}"),
    }
    .into()
}
