//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "event-board")]
#[command(about = "Live event display agent, admin console and submissions client")]
#[command(version)]
pub struct Config {
    /// Base URL of the event backend
    #[arg(long, global = true, env = "EVENT_BOARD_BACKEND_URL", default_value = "http://127.0.0.1:5000")]
    pub backend_url: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the public display agent
    Display(DisplayArgs),
    /// Drive the admin console
    Admin(AdminArgs),
    /// Submit a project
    Submit(SubmissionFields),
    /// Manage submitted projects
    Submissions(SubmissionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DisplayArgs {
    /// Port to serve the display view on
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// WebSocket push channel (e.g. ws://host/socket.io/?EIO=4&transport=websocket)
    #[arg(long, env = "EVENT_BOARD_WS_URL")]
    pub ws_url: Option<String>,

    /// Seconds between backend polls
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_seconds: u64,

    /// Sound played when the countdown expires; relative paths are fetched from the backend
    #[arg(long, default_value = "/assets/sounds/alert.mp3")]
    pub alert_sound: String,

    /// Command playing a sound; `{}` is replaced by the sound URL
    #[arg(long, env = "EVENT_BOARD_SOUND_COMMAND")]
    pub sound_command: Option<String>,

    /// Command speaking text; `{}` is replaced by the text
    #[arg(long, env = "EVENT_BOARD_SPEECH_COMMAND")]
    pub speech_command: Option<String>,

    /// Layout preset used until the backend sends a layout
    #[arg(long, default_value = "default")]
    pub layout_preset: String,
}

impl DisplayArgs {
    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_seconds)
    }
}

#[derive(Args, Debug)]
pub struct AdminArgs {
    /// Admin account email
    #[arg(long, env = "EVENT_BOARD_ADMIN_EMAIL")]
    pub email: String,

    /// Admin account password
    #[arg(long, env = "EVENT_BOARD_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Control the countdown
    #[command(subcommand)]
    Timer(TimerCommand),
    /// Set the announcement note
    Note(NoteArgs),
    /// Manage the team roster
    #[command(subcommand)]
    Team(TeamCommand),
    /// Trigger a one-shot action on the display
    #[command(subcommand)]
    Action(ActionCommand),
    /// Manage the screen layout
    #[command(subcommand)]
    Layout(LayoutCommand),
    /// Enable or disable roster shuffling
    Shuffle(ShuffleArgs),
    /// Show the latest audit log entries
    Audit,
    /// Show the session status
    Status,
    /// End the session
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum TimerCommand {
    /// Set the countdown length in seconds
    Set { seconds: u64 },
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Stop and rewind to the full duration
    Reset,
    /// Change the countdown font size and colour
    Style {
        #[arg(long)]
        font_size: Option<u32>,
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Note text (empty clears the note)
    pub text: String,
    #[arg(long)]
    pub font_size: Option<u32>,
    #[arg(long)]
    pub glow_color: Option<String>,
    /// Glow intensity in percent
    #[arg(long)]
    pub glow_intensity: Option<u32>,
    #[arg(long, conflicts_with = "no_bold")]
    pub bold: bool,
    #[arg(long)]
    pub no_bold: bool,
}

impl NoteArgs {
    pub fn bold(&self) -> Option<bool> {
        match (self.bold, self.no_bold) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List all teams
    List,
    /// Add a team
    Add { name: String },
    /// Delete a team
    Remove { id: String },
    /// Show a hidden team on the display
    Show { id: String },
    /// Hide a team from the display
    Hide { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ActionCommand {
    /// Play a sound on the display
    Sound {
        #[arg(long, default_value = "/assets/sounds/alert.mp3")]
        url: String,
    },
    /// Speak a message on the display
    Tts { text: String },
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommand {
    /// Apply a named preset
    Preset { name: String },
    /// Print the saved layout
    Show,
}

#[derive(Args, Debug)]
pub struct ShuffleArgs {
    /// `on` or `off`
    #[arg(value_parser = ["on", "off"])]
    pub mode: String,
    /// Seconds between reorders
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SubmissionFields {
    #[arg(long)]
    pub team: String,
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub github: String,
}

#[derive(Args, Debug)]
pub struct SubmissionsArgs {
    /// Submissions account email
    #[arg(long, env = "EVENT_BOARD_SUBMISSIONS_EMAIL")]
    pub email: String,

    /// Submissions account password
    #[arg(long, env = "EVENT_BOARD_SUBMISSIONS_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(subcommand)]
    pub command: SubmissionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SubmissionsCommand {
    /// List submissions grouped by team
    List,
    /// Show one submission
    Get { id: String },
    /// Replace the fields of a submission
    Edit {
        id: String,
        #[command(flatten)]
        fields: SubmissionFields,
    },
    /// Delete a submission
    Delete { id: String },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_display_defaults() {
        let config = Config::try_parse_from(["event-board", "display"]).unwrap();
        match config.command {
            Command::Display(args) => {
                assert_eq!(args.port, 20554);
                assert_eq!(args.poll_interval(), Duration::from_secs(5));
                assert_eq!(args.layout_preset, "default");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_admin_timer_set() {
        let config = Config::try_parse_from([
            "event-board", "admin", "--email", "a@b.c", "--password", "pw", "timer", "set", "300",
        ])
        .unwrap();
        assert!(matches!(
            config.command,
            Command::Admin(AdminArgs { command: AdminCommand::Timer(TimerCommand::Set { seconds: 300 }), .. })
        ));
    }

    #[test]
    fn test_note_bold_flags() {
        let config = Config::try_parse_from([
            "event-board", "admin", "--email", "a", "--password", "b", "note", "Hi", "--no-bold",
        ])
        .unwrap();
        match config.command {
            Command::Admin(AdminArgs { command: AdminCommand::Note(note), .. }) => {
                assert_eq!(note.bold(), Some(false));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
