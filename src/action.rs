use std::fmt;

use ihdathi::coords::ConversionResult;
use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize,
};

use crate::{focus::FocusTarget, mode::Mode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    SwitchMode(Mode),
    FocusNext,
    FocusPrevious,
    Focus(FocusTarget),
    Activate,
    SelectNext,
    SelectPrevious,
    InsertChar(char),
    DeleteChar,
    ClearField,
    Paste(String),
    Convert,
    ConversionFinished(ConversionResult),
    CopyResult,
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ActionVisitor;

        impl<'de> Visitor<'de> for ActionVisitor {
            type Value = Action;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid string representation of Action")
            }

            fn visit_str<E>(self, value: &str) -> Result<Action, E>
            where
                E: de::Error,
            {
                match value {
                    "Tick" => Ok(Action::Tick),
                    "Render" => Ok(Action::Render),
                    "Suspend" => Ok(Action::Suspend),
                    "Resume" => Ok(Action::Resume),
                    "Quit" => Ok(Action::Quit),
                    "FocusNext" => Ok(Action::FocusNext),
                    "FocusPrevious" => Ok(Action::FocusPrevious),
                    "Activate" => Ok(Action::Activate),
                    "SelectNext" => Ok(Action::SelectNext),
                    "SelectPrevious" => Ok(Action::SelectPrevious),
                    "DeleteChar" => Ok(Action::DeleteChar),
                    "ClearField" => Ok(Action::ClearField),
                    "Convert" => Ok(Action::Convert),
                    "CopyResult" => Ok(Action::CopyResult),
                    data if data.starts_with("SwitchMode(") => {
                        let mode = data.trim_start_matches("SwitchMode(").trim_end_matches(')');
                        match mode {
                            "Navigate" => Ok(Action::SwitchMode(Mode::Navigate)),
                            "Insert" => Ok(Action::SwitchMode(Mode::Insert)),
                            _ => Err(E::custom(format!("invalid Action Variant: {:?}", mode))),
                        }
                    }
                    data if data.starts_with("Error(") => {
                        let error_msg = data.trim_start_matches("Error(").trim_end_matches(')');
                        Ok(Action::Error(error_msg.to_string()))
                    }
                    data if data.starts_with("Resize(") => {
                        let parts: Vec<&str> = data
                            .trim_start_matches("Resize(")
                            .trim_end_matches(')')
                            .split(',')
                            .collect();
                        if parts.len() == 2 {
                            let width: u16 = parts[0].trim().parse().map_err(E::custom)?;
                            let height: u16 = parts[1].trim().parse().map_err(E::custom)?;
                            Ok(Action::Resize(width, height))
                        } else {
                            Err(E::custom(format!("Invalid Resize format: {}", value)))
                        }
                    }
                    _ => Err(E::custom(format!("Unknown Action variant: {}", value))),
                }
            }
        }

        deserializer.deserialize_str(ActionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> Result<Action, serde_json::Error> {
        serde_json::from_str(&format!("{raw:?}"))
    }

    #[test]
    fn parses_plain_and_parameterised_actions() {
        assert_eq!(parse("Convert").ok(), Some(Action::Convert));
        assert_eq!(
            parse("SwitchMode(Insert)").ok(),
            Some(Action::SwitchMode(Mode::Insert))
        );
        assert_eq!(parse("Resize(80, 24)").ok(), Some(Action::Resize(80, 24)));
        assert_eq!(
            parse("Error(clipboard)").ok(),
            Some(Action::Error("clipboard".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(parse("Teleport").is_err());
        assert!(parse("SwitchMode(Visual)").is_err());
        assert!(parse("Resize(80)").is_err());
        assert!(parse("Refresh").is_err());
    }
}
