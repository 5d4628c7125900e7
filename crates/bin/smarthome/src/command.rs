//! Console command grammar.
//!
//! Rooms and devices are addressed by their 1-based position in the status
//! listing, the way an operator sees them.

/// Usage text shown by `help`.
pub const HELP: &str = "\
Commands:
  add-rooms <name>[, <name>...]             Add one or more rooms
  add-device <room#> <watts> <name>         Add a device to a room
  toggle <room#> <device#>                  Switch a device on or off
  schedule <room#> <device#> <HH:MM> <HH:MM>  Run a device between two times today
  status [room#]                            Show device status
  report                                    Show energy consumption and cost
  trends                                    Show top consumers
  timers                                    Show pending timer events
  help                                      Show this help
  quit                                      Leave the console";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    AddRooms(Vec<String>),
    AddDevice {
        room: usize,
        watts: f64,
        name: String,
    },
    Toggle {
        room: usize,
        device: usize,
    },
    Schedule {
        room: usize,
        device: usize,
        on: String,
        off: String,
    },
    Status {
        room: Option<usize>,
    },
    Report,
    Trends,
    Timers,
    Quit,
}

impl Command {
    /// Parse one line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for unknown verbs, missing arguments, or
    /// arguments that are not numbers where numbers are expected.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let Some((verb, rest)) = split_word(line) else {
            return Ok(None);
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "report" => Self::Report,
            "trends" => Self::Trends,
            "timers" => Self::Timers,
            "status" => Self::Status {
                room: match rest {
                    "" => None,
                    text => Some(position(text, "room#")?),
                },
            },
            "add-rooms" => {
                let names: Vec<String> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                Self::AddRooms(names)
            }
            "add-device" => {
                const USAGE: &str = "add-device <room#> <watts> <name>";
                let (room, rest) = split_word(rest).ok_or(CommandError::Usage(USAGE))?;
                let (watts, name) = split_word(rest).ok_or(CommandError::Usage(USAGE))?;
                if name.is_empty() {
                    return Err(CommandError::Usage(USAGE));
                }
                Self::AddDevice {
                    room: position(room, "room#")?,
                    watts: watts.parse().map_err(|_| CommandError::InvalidNumber {
                        what: "watts",
                        input: watts.to_string(),
                    })?,
                    name: name.to_string(),
                }
            }
            "toggle" => {
                let [room, device] = words(rest, "toggle <room#> <device#>")?;
                Self::Toggle {
                    room: position(room, "room#")?,
                    device: position(device, "device#")?,
                }
            }
            "schedule" => {
                let [room, device, on, off] =
                    words(rest, "schedule <room#> <device#> <HH:MM> <HH:MM>")?;
                Self::Schedule {
                    room: position(room, "room#")?,
                    device: position(device, "device#")?,
                    on: on.to_string(),
                    off: off.to_string(),
                }
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Whether the command changes the home and so needs the access gate.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::AddRooms(_) | Self::AddDevice { .. } | Self::Toggle { .. } | Self::Schedule { .. }
        )
    }
}

/// First word and the trimmed remainder.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    })
}

/// Exactly `N` whitespace-separated words.
fn words<'a, const N: usize>(
    text: &'a str,
    usage: &'static str,
) -> Result<[&'a str; N], CommandError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts.try_into().map_err(|_| CommandError::Usage(usage))
}

fn position(text: &str, what: &'static str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::InvalidNumber {
            what,
            input: text.to_string(),
        }),
    }
}

/// Console input that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{what} must be a positive number, got {input:?}")]
    InvalidNumber { what: &'static str, input: String },
}
