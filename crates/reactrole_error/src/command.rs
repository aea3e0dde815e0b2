//! Administrative command error types.

/// Specific command error conditions.
///
/// The display text of each kind is what the invoking administrator sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CommandErrorKind {
    /// Caller does not hold the administrator permission.
    #[display("You need the Administrator permission to use this command.")]
    NotAdministrator,

    /// Command was invoked outside of a server.
    #[display("This command can only be used inside a server.")]
    NoServer,

    /// An argument was missing or malformed.
    #[display("Invalid {argument}: {reason}")]
    InvalidArgument {
        /// Argument name
        argument: String,
        /// Why it was rejected
        reason: String,
    },

    /// Channel id does not name a channel of this server.
    #[display("Channel not found. Please use a valid channel ID.")]
    ChannelNotFound(String),

    /// The platform could not be asked whether the channel exists.
    #[display("Could not check that channel right now: {_0}. Please try again.")]
    ChannelLookup(String),

    /// The operation needs at least one mapping.
    #[display("No role mappings set up. Use /addrole to add role mappings first.")]
    NoMappings,

    /// The role could not be found or created.
    #[display("Could not find or create role '{role}': {reason}")]
    RoleProvisioning {
        /// Role name
        role: String,
        /// Underlying failure
        reason: String,
    },

    /// Posting the role selection message failed.
    #[display("Failed to post the role selection message: {_0}")]
    MessageCreation(String),

    /// Persisting the change failed.
    #[display("Failed to save role data: {_0}")]
    Persistence(String),

    /// The event queue is no longer accepting events.
    #[display("The bot is shutting down, please try again later.")]
    QueueClosed,

    /// Command name is not one this bot registers.
    #[display("Unknown command: {_0}")]
    UnknownCommand(String),
}

/// Command error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// Error kind
    pub kind: CommandErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Text shown to the administrator who invoked the command.
    pub fn user_message(&self) -> String {
        self.kind.to_string()
    }
}
