use timeline_core::Msg;

/// One line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Msg(Msg),
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "commands: start | stop | delay <ms> | status | help | quit";

pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let input = match command.to_ascii_lowercase().as_str() {
        "start" => Input::Msg(Msg::StartClicked),
        "stop" => Input::Msg(Msg::StopClicked),
        "delay" => Input::Msg(Msg::DelayInputChanged(rest.to_string())),
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    };
    Some(input)
}

#[cfg(test)]
mod tests {
    use super::{parse_input, Input};
    use timeline_core::Msg;

    #[test]
    fn maps_controls_to_messages() {
        assert_eq!(parse_input("start"), Some(Input::Msg(Msg::StartClicked)));
        assert_eq!(parse_input("  STOP "), Some(Input::Msg(Msg::StopClicked)));
        assert_eq!(
            parse_input("delay  750"),
            Some(Input::Msg(Msg::DelayInputChanged("750".to_string())))
        );
    }

    #[test]
    fn delay_without_value_is_passed_on_for_rejection() {
        assert_eq!(
            parse_input("delay"),
            Some(Input::Msg(Msg::DelayInputChanged(String::new())))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_input("   "), None);
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(parse_input("go now"), Some(Input::Unknown("go now".to_string())));
        assert_eq!(parse_input("exit"), Some(Input::Quit));
    }
}
