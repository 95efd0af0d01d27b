//! Parsing of terminal input lines.

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { room: String, text: String },
    Join { room: String },
    SetText { text: String },
    Ready(bool),
    Start,
    Reset,
    Leave,
    Help,
    Quit,
    /// Anything that is not a command is typing input
    Type(String),
    /// A `/command` with missing or unknown arguments
    Invalid(String),
}

pub const HELP: &str = "\
/create <room> <text>  create a room and become its host
/join <room>           join a room
/text <text>           replace the race text (host)
/ready, /unready       toggle readiness
/start                 schedule the race (host)
/reset                 clear the race (host)
/leave                 leave the room
/quit                  exit
anything else          typing input during a race";

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Type(line.to_string());
        };
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match (name, args) {
            ("create", args) => match args.split_once(char::is_whitespace) {
                Some((room, text)) if !text.trim().is_empty() => Self::Create {
                    room: room.to_string(),
                    text: text.trim().to_string(),
                },
                _ => Self::Invalid("usage: /create <room> <text>".to_string()),
            },
            ("join", "") => Self::Invalid("usage: /join <room>".to_string()),
            ("join", room) => Self::Join {
                room: room.to_string(),
            },
            ("text", "") => Self::Invalid("usage: /text <text>".to_string()),
            ("text", text) => Self::SetText {
                text: text.to_string(),
            },
            ("ready", _) => Self::Ready(true),
            ("unready", _) => Self::Ready(false),
            ("start", _) => Self::Start,
            ("reset", _) => Self::Reset,
            ("leave", _) => Self::Leave,
            ("help", _) => Self::Help,
            ("quit", _) | ("exit", _) => Self::Quit,
            (other, _) => Self::Invalid(format!("unknown command: /{}", other)),
        }
    }
}
