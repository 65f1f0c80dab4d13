//! Operator console commands
//!
//! One command per line, whitespace separated. This is the host stand-in
//! for the touch screen: every button press the screen would produce has a
//! command here.
//!
//! ```text
//! trigger <day> <morning|evening> [label...]   time-of-day alarm
//! goto <slot>                                  manual slot pick (0-13)
//! reset                                        rotate to slot 0
//! jog <fwd|rev>                                press a jog button
//! release                                      release the jog button
//! stop | snooze [minutes] | motion             acknowledge the alarm
//! debug <enter|leave>                          maintenance excursion
//! led <on|off> | audio <on|off>                maintenance output tests
//! status | help
//! ```

use core::fmt;

use pillwheel_core::motion::{DayOfWeek, Period};
use pillwheel_core::state::AlarmTrigger;
use pillwheel_core::traits::Direction;

/// Parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Trigger(AlarmTrigger),
    Goto(u8),
    Reset,
    Jog(Direction),
    Release,
    Stop,
    Snooze(Option<u16>),
    Motion,
    Debug(bool),
    Led(bool),
    Audio(bool),
    Status,
    Help,
}

/// Console parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { expected: &'static str, found: String },
    TrailingInput(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::UnknownCommand(c) => write!(f, "unknown command '{}' (try 'help')", c),
            ParseError::MissingArgument(what) => write!(f, "missing {}", what),
            ParseError::InvalidArgument { expected, found } => {
                write!(f, "expected {}, found '{}'", expected, found)
            }
            ParseError::TrailingInput(rest) => write!(f, "unexpected '{}'", rest),
        }
    }
}

impl std::error::Error for ParseError {}

/// Help text for the `help` command
pub const HELP: &str = "\
commands:
  trigger <day> <morning|evening> [label]
  goto <slot 0-13>
  reset
  jog <fwd|rev>
  release
  stop
  snooze [minutes]
  motion
  debug <enter|leave>
  led <on|off>
  audio <on|off>
  status";

/// Parse one console line
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();

    let command = match name.as_str() {
        "trigger" => {
            let day: DayOfWeek = parse_word(words.next(), "day of week")?;
            let period: Period = parse_word(words.next(), "morning or evening")?;
            let label = words.collect::<Vec<_>>().join(" ");
            return Ok(Command::Trigger(AlarmTrigger::new(day, period, &label)));
        }
        "goto" => Command::Goto(parse_word(words.next(), "slot number")?),
        "reset" => Command::Reset,
        "jog" => Command::Jog(parse_direction(words.next())?),
        "release" => Command::Release,
        "stop" => Command::Stop,
        "snooze" => match words.next() {
            Some(word) => Command::Snooze(Some(parse_word(Some(word), "minutes")?)),
            None => Command::Snooze(None),
        },
        "motion" => Command::Motion,
        "debug" => Command::Debug(parse_switch(words.next(), "enter", "leave")?),
        "led" => Command::Led(parse_switch(words.next(), "on", "off")?),
        "audio" => Command::Audio(parse_switch(words.next(), "on", "off")?),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        _ => return Err(ParseError::UnknownCommand(name)),
    };

    match words.next() {
        Some(rest) => Err(ParseError::TrailingInput(rest.to_string())),
        None => Ok(command),
    }
}

fn parse_word<T: core::str::FromStr>(
    word: Option<&str>,
    expected: &'static str,
) -> Result<T, ParseError> {
    let word = word.ok_or(ParseError::MissingArgument(expected))?;
    word.parse().map_err(|_| ParseError::InvalidArgument {
        expected,
        found: word.to_string(),
    })
}

fn parse_direction(word: Option<&str>) -> Result<Direction, ParseError> {
    const EXPECTED: &str = "fwd or rev";
    let word = word.ok_or(ParseError::MissingArgument(EXPECTED))?;
    match word.to_ascii_lowercase().as_str() {
        "fwd" | "forward" | "+" => Ok(Direction::Forward),
        "rev" | "reverse" | "-" => Ok(Direction::Reverse),
        _ => Err(ParseError::InvalidArgument {
            expected: EXPECTED,
            found: word.to_string(),
        }),
    }
}

fn parse_switch(
    word: Option<&str>,
    yes: &'static str,
    no: &'static str,
) -> Result<bool, ParseError> {
    let expected = if yes == "on" { "on or off" } else { "enter or leave" };
    let word = word.ok_or(ParseError::MissingArgument(expected))?;
    if word.eq_ignore_ascii_case(yes) {
        Ok(true)
    } else if word.eq_ignore_ascii_case(no) {
        Ok(false)
    } else {
        Err(ParseError::InvalidArgument {
            expected,
            found: word.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger() {
        let cmd = parse_command("trigger Wednesday morning 08:00 AM").unwrap();
        assert_eq!(
            cmd,
            Command::Trigger(AlarmTrigger::new(
                DayOfWeek::Wednesday,
                Period::Morning,
                "08:00 AM"
            ))
        );

        let Command::Trigger(trigger) = parse_command("TRIGGER sat pm").unwrap() else {
            panic!("expected trigger");
        };
        assert_eq!(trigger.slot().index(), 13);
        assert!(trigger.label.is_empty());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("goto 6"), Ok(Command::Goto(6)));
        assert_eq!(parse_command("  reset "), Ok(Command::Reset));
        assert_eq!(parse_command("jog rev"), Ok(Command::Jog(Direction::Reverse)));
        assert_eq!(parse_command("release"), Ok(Command::Release));
        assert_eq!(parse_command("snooze"), Ok(Command::Snooze(None)));
        assert_eq!(parse_command("snooze 10"), Ok(Command::Snooze(Some(10))));
        assert_eq!(parse_command("debug enter"), Ok(Command::Debug(true)));
        assert_eq!(parse_command("led off"), Ok(Command::Led(false)));
        assert_eq!(parse_command("audio ON"), Ok(Command::Audio(true)));
        assert_eq!(parse_command("?"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_command("spin"),
            Err(ParseError::UnknownCommand("spin".to_string()))
        );
        assert_eq!(
            parse_command("goto"),
            Err(ParseError::MissingArgument("slot number"))
        );
        assert_eq!(
            parse_command("goto six"),
            Err(ParseError::InvalidArgument {
                expected: "slot number",
                found: "six".to_string()
            })
        );
        assert_eq!(
            parse_command("trigger Funday morning"),
            Err(ParseError::InvalidArgument {
                expected: "day of week",
                found: "Funday".to_string()
            })
        );
        assert_eq!(
            parse_command("stop now"),
            Err(ParseError::TrailingInput("now".to_string()))
        );
    }

    #[test]
    fn test_out_of_range_slot_parses() {
        // Range is checked by the coordinator, not the parser
        assert_eq!(parse_command("goto 14"), Ok(Command::Goto(14)));
    }
}
