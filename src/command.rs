//! Text commands of the terminal front end

use crate::{
    dashboard::UiEvent,
    picker::PickerSlot,
    types::{Tab, Theme},
};
use thiserror::Error;

/// Help text printed by the `help` command
pub const HELP: &str = "\
commands:
  refresh                     reload prices now
  tab home|converter|settings switch tab
  currency <code>             change the primary currency
  amount <value>              set the amount to convert
  result <value>              edit the converted amount
  quick <value>               quick-amount button
  convert | swap              run or reverse the conversion
  open from|to                toggle a currency dropdown
  close                       close dropdowns
  pick from|to <id>           select a currency
  search <text>               search coins to track
  select <n>                  choose search result n
  track <coin id>             type a coin id into the search field
  settings-currency <code>    currency to save in settings
  save                        save settings
  interval <secs>|off         auto-refresh interval
  theme dark|light            switch theme
  redraw | help | quit";

/// A parsed line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Events to post, in order
    Ui(Vec<UiEvent>),
    Redraw,
    Help,
    Quit,
}

impl From<UiEvent> for Command {
    fn from(event: UiEvent) -> Self {
        Command::Ui(vec![event])
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument for {command}: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

fn slot(command: &'static str, value: &str) -> Result<PickerSlot, CommandError> {
    match value {
        "from" => Ok(PickerSlot::Source),
        "to" => Ok(PickerSlot::Destination),
        _ => Err(invalid(command, value)),
    }
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

/// Parses one input line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let arg = |command: &'static str| required(rest, command);

    let command: Command = match name.to_ascii_lowercase().as_str() {
        "" | "redraw" => Command::Redraw,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "refresh" | "r" => UiEvent::RefreshRequested.into(),
        "tab" => {
            let value = arg("tab")?;
            let tab = Tab::parse(value).ok_or_else(|| invalid("tab", value))?;
            UiEvent::TabSelected(tab).into()
        }
        "currency" => UiEvent::PrimaryCurrencyChanged(arg("currency")?.to_string()).into(),
        // the field accepts any text; validation happens on convert
        "amount" => UiEvent::AmountChanged(rest.to_string()).into(),
        "result" => UiEvent::DestinationAmountChanged(rest.to_string()).into(),
        "quick" => {
            let value = arg("quick")?;
            let amount: f64 = value.parse().map_err(|_| invalid("quick", value))?;
            UiEvent::QuickAmount(amount).into()
        }
        "convert" => UiEvent::ConvertRequested.into(),
        "swap" => UiEvent::SwapRequested.into(),
        "open" => UiEvent::PickerToggled(slot("open", arg("open")?)?).into(),
        "close" => UiEvent::OutsideClicked.into(),
        "pick" => {
            let value = arg("pick")?;
            let (which, id) = value
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument("pick"))?;
            UiEvent::CurrencySelected {
                slot: slot("pick", which)?,
                id: id.trim().to_lowercase(),
            }
            .into()
        }
        "search" => Command::Ui(vec![
            UiEvent::SearchInputChanged(rest.to_string()),
            UiEvent::SearchSubmitted,
        ]),
        "select" => {
            let value = arg("select")?;
            let index: usize = value
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("select", value))?;
            UiEvent::SearchResultSelected(index - 1).into()
        }
        "track" => UiEvent::SearchInputChanged(rest.to_string()).into(),
        "settings-currency" => {
            UiEvent::SettingsCurrencyChanged(arg("settings-currency")?.to_string()).into()
        }
        "save" => UiEvent::SaveSettings.into(),
        "interval" => {
            let value = arg("interval")?;
            let secs = match value {
                "off" => 0,
                _ => value.parse().map_err(|_| invalid("interval", value))?,
            };
            UiEvent::RefreshIntervalChanged(secs).into()
        }
        "theme" => {
            let value = arg("theme")?;
            let theme = Theme::parse(value).ok_or_else(|| invalid("theme", value))?;
            UiEvent::ThemeSelected(theme).into()
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("refresh").unwrap(), Command::from(UiEvent::RefreshRequested));
        assert_eq!(parse("  quit ").unwrap(), Command::Quit);
        assert_eq!(parse("").unwrap(), Command::Redraw);
        assert_eq!(
            parse("tab Converter").unwrap(),
            Command::from(UiEvent::TabSelected(Tab::Converter))
        );
        assert_eq!(
            parse("interval off").unwrap(),
            Command::from(UiEvent::RefreshIntervalChanged(0))
        );
        assert_eq!(
            parse("theme light").unwrap(),
            Command::from(UiEvent::ThemeSelected(Theme::Light))
        );
    }

    #[test]
    fn test_amount_text_is_passed_through() {
        assert_eq!(
            parse("amount 12abc").unwrap(),
            Command::from(UiEvent::AmountChanged("12abc".into()))
        );
        assert_eq!(parse("amount").unwrap(), Command::from(UiEvent::AmountChanged(String::new())));
    }

    #[test]
    fn test_picker_commands() {
        assert_eq!(
            parse("pick to EUR").unwrap(),
            Command::from(UiEvent::CurrencySelected {
                slot: PickerSlot::Destination,
                id: "eur".into()
            })
        );
        assert_eq!(
            parse("open from").unwrap(),
            Command::from(UiEvent::PickerToggled(PickerSlot::Source))
        );
        assert_eq!(
            parse("pick sideways btc").unwrap_err(),
            CommandError::InvalidArgument {
                command: "pick",
                value: "sideways".into()
            }
        );
    }

    #[test]
    fn test_search_posts_input_then_submit() {
        assert_eq!(
            parse("search bit coin").unwrap(),
            Command::Ui(vec![
                UiEvent::SearchInputChanged("bit coin".into()),
                UiEvent::SearchSubmitted,
            ])
        );
        assert_eq!(
            parse("select 2").unwrap(),
            Command::from(UiEvent::SearchResultSelected(1))
        );
        assert!(parse("select 0").is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("fly").unwrap_err(), CommandError::Unknown("fly".into()));
        assert_eq!(
            parse("currency").unwrap_err(),
            CommandError::MissingArgument("currency")
        );
        assert!(parse("interval soon").is_err());
        assert!(parse("theme blue").is_err());
    }
}
