//! Rendering of console replies as operator text or JSON.

use std::fmt::{self, Write as _};

use chrono::NaiveDateTime;
use serde::Serialize;
use smarthome_domain::error::HomeError;
use smarthome_domain::home::StatusEntry;
use smarthome_domain::id::RoomId;
use smarthome_domain::report::EnergyReport;
use smarthome_domain::trends::Trends;

use crate::command::CommandError;
use crate::config::OutputFormat;

const RULE: &str = "####################################################";

/// Something the console has to show.
#[derive(Debug, Clone)]
pub enum Reply {
    Message(String),
    Status {
        /// Rooms covered by the listing, in order, including empty ones.
        rooms: Vec<(RoomId, String)>,
        entries: Vec<StatusEntry>,
    },
    Report(EnergyReport),
    Trends(Trends),
    Timers {
        pending: usize,
        /// Local wall-clock time of the earliest pending event.
        next_due: Option<NaiveDateTime>,
    },
    Failed(Failure),
}

/// A rejected command, either unparsed or refused by the home service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(rename = "error")]
    pub kind: &'static str,
    pub message: String,
}

impl From<HomeError> for Failure {
    fn from(err: HomeError) -> Self {
        let detail = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();
        let (kind, message) = match &err {
            HomeError::InvalidFormat(_) => (
                "invalid_format",
                format!("Invalid time format. Please use HH:MM format ({detail})."),
            ),
            HomeError::InvalidRange(_) => (
                "invalid_range",
                "OFF time must be after ON time.".to_string(),
            ),
            HomeError::InvalidValue(_) => ("invalid_value", format!("Invalid value: {detail}.")),
            HomeError::NotFound(_) => ("not_found", format!("{detail}.")),
        };
        Self { kind, message }
    }
}

impl From<CommandError> for Failure {
    fn from(err: CommandError) -> Self {
        Self {
            kind: "invalid_command",
            message: format!("Invalid command: {err}."),
        }
    }
}

/// Turn `reply` into printable text. `stamp` is the local date-time shown
/// at the foot of every text screen.
pub fn render(reply: &Reply, format: OutputFormat, stamp: NaiveDateTime) -> String {
    match format {
        OutputFormat::Text => render_text(reply, stamp).unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to format reply");
            String::new()
        }),
        OutputFormat::Json => render_json(reply),
    }
}

fn render_text(reply: &Reply, stamp: NaiveDateTime) -> Result<String, fmt::Error> {
    match reply {
        Reply::Message(message) => Ok(message.clone()),
        Reply::Failed(failure) => Ok(failure.message.clone()),
        Reply::Status { rooms, entries } => screen("Device Status", stamp, |out| {
            for (room_id, room) in rooms {
                writeln!(out, "Room: {room}")?;
                for entry in entries.iter().filter(|e| e.room_id == *room_id) {
                    writeln!(out, " - {}: {}", entry.device, entry.status)?;
                }
            }
            Ok(())
        }),
        Reply::Report(report) => screen("Reports", stamp, |out| {
            for room in &report.rooms {
                writeln!(
                    out,
                    "Energy consumed in {}: {:.3} kWh",
                    room.room, room.energy_kwh
                )?;
            }
            writeln!(
                out,
                "Total Energy Consumed: {:.3} kWh",
                report.total_energy_kwh
            )?;
            writeln!(
                out,
                "Total Cost: {:.4} {}",
                report.total_cost, report.currency
            )
        }),
        Reply::Trends(trends) => screen("Trends", stamp, |out| {
            match &trends.top_room {
                Some(top) => writeln!(
                    out,
                    "Room consuming the most energy: {} ({:.3} kWh)",
                    top.room, top.energy_kwh
                )?,
                None => writeln!(out, "No energy consumption data available.")?,
            }
            match &trends.top_device {
                Some(top) => writeln!(
                    out,
                    "Device consuming the most energy: {} ({:.3} kWh)",
                    top.device, top.energy_kwh
                )?,
                None => writeln!(out, "No energy consumption data available.")?,
            }
            match &trends.longest_active_device {
                Some(longest) => writeln!(
                    out,
                    "Device activated for the longest time: {} ({:.2} hours)",
                    longest.device, longest.active_hours
                ),
                None => writeln!(out, "No activation data available."),
            }
        }),
        Reply::Timers { pending, next_due } => Ok(match next_due {
            Some(at) => format!(
                "{pending} timer event(s) pending, next at {}.",
                at.format("%H:%M")
            ),
            None => "No timer events pending.".to_string(),
        }),
    }
}

fn render_json(reply: &Reply) -> String {
    match reply {
        Reply::Message(message) => to_json(&serde_json::json!({ "message": message })),
        Reply::Failed(failure) => to_json(failure),
        Reply::Status { entries, .. } => to_json(entries),
        Reply::Report(report) => to_json(report),
        Reply::Trends(trends) => to_json(trends),
        Reply::Timers { pending, next_due } => to_json(&serde_json::json!({
            "pending": pending,
            "next_due": next_due,
        })),
    }
}

fn to_json(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to serialize reply");
        "{}".to_string()
    })
}

fn screen(
    title: &str,
    stamp: NaiveDateTime,
    body: impl FnOnce(&mut String) -> fmt::Result,
) -> Result<String, fmt::Error> {
    let mut out = format!("{RULE}\n Welcome to mySmart Home\n {title}\n");
    body(&mut out)?;
    write!(out, "{}\n{RULE}", stamp.format("%c"))?;
    Ok(out)
}
