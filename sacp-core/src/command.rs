//! SACP command definitions
//!
//! A command is addressed by a `(command_set, command_id)` byte pair.

use std::fmt;

use crate::error::{Error, Result};

/// Commands this client knows how to build
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Open a session (client name + application id)
    RequestSession,

    /// Announce an upload job (file name, size, chunk count, digest)
    StartUpload,
}

impl Command {
    /// Command set byte
    pub fn set(self) -> u8 {
        self.parts().0
    }

    /// Command id byte
    pub fn id(self) -> u8 {
        self.parts().1
    }

    /// `(command_set, command_id)` pair
    pub fn parts(self) -> (u8, u8) {
        match self {
            Self::RequestSession => (0x01, 0x05),
            Self::StartUpload => (0xB0, 0x00),
        }
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::RequestSession => "REQUEST_SESSION",
            Self::StartUpload => "START_UPLOAD",
        }
    }
}

impl From<Command> for (u8, u8) {
    fn from(cmd: Command) -> (u8, u8) {
        cmd.parts()
    }
}

impl TryFrom<(u8, u8)> for Command {
    type Error = Error;

    fn try_from((set, id): (u8, u8)) -> Result<Self> {
        match (set, id) {
            (0x01, 0x05) => Ok(Self::RequestSession),
            (0xB0, 0x00) => Ok(Self::StartUpload),
            _ => Err(Error::UnknownCommand { set, id }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X}/0x{:02X})", self.name(), self.set(), self.id())
    }
}
