/// The two buttons the bot ever shows. The callback data strings are what
/// Telegram echoes back in `callback_query.data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockAction {
    In,
    Out,
}

impl ClockAction {
    pub fn from_callback_data(s: &str) -> Option<Self> {
        match s {
            "enter" => Some(Self::In),
            "exit" => Some(Self::Out),
            _ => None,
        }
    }

    pub fn callback_data(&self) -> &'static str {
        match self {
            ClockAction::In => "enter",
            ClockAction::Out => "exit",
        }
    }
}
