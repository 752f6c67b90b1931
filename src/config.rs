use std::{collections::HashMap, path::PathBuf, time::Duration};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use ihdathi::coords::schedule::DEFAULT_DELAY;
use serde::{de::Deserializer, Deserialize};

use crate::{action::Action, mode::Mode};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConversionConfig {
    /// Pause between a conversion request and its result.
    #[serde(default = "ConversionConfig::default_delay_ms")]
    pub delay_ms: u64,
}

impl ConversionConfig {
    fn default_delay_ms() -> u64 {
        DEFAULT_DELAY.as_millis() as u64
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| config::ConfigError::Message(format!("default config: {e}")))?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file found, using built-in defaults");
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.merge_default_keybindings(default_config.keybindings);
        Ok(cfg)
    }

    /// Fills in every default binding the user config does not override.
    fn merge_default_keybindings(&mut self, defaults: KeyBindings) {
        for (mode, default_bindings) in defaults.0 {
            let user_bindings = self.keybindings.entry(mode).or_default();
            for (key, cmd) in default_bindings {
                user_bindings.entry(key).or_insert(cmd);
            }
        }
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let keybindings = parsed_map
            .into_iter()
            .map(|(mode, inner_map)| {
                let converted_inner_map = inner_map
                    .into_iter()
                    .map(|(key_str, cmd)| {
                        parse_key_sequence(&key_str)
                            .map(|keys| (keys, cmd))
                            .map_err(<D::Error as serde::de::Error>::custom)
                    })
                    .collect::<Result<HashMap<_, _>, D::Error>>()?;
                Ok((mode, converted_inner_map))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;

        Ok(KeyBindings(keybindings))
    }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            }
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            }
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            }
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(
    raw: &str,
    mut modifiers: KeyModifiers,
) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        c if c.len() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        }
        f if f.starts_with('f') && f.len() > 1 => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(c) => {
            char = format!("f{c}");
            &char
        }
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        }
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");
    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);
    key
}

/// Parses `<ctrl-c>` or `<d><d>` style sequences into key events.
pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let inner = raw
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| format!("Unable to parse `{}`", raw))?;

    inner.split("><").map(parse_key_event).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_config() -> Result<()> {
        let c = Config::new()?;
        let bound = |mode: Mode, raw: &str| {
            let keys = parse_key_sequence(raw).unwrap_or_default();
            c.keybindings
                .get(&mode)
                .and_then(|bindings| bindings.get(&keys))
                .cloned()
        };
        assert_eq!(bound(Mode::Navigate, "<q>"), Some(Action::Quit));
        assert_eq!(
            bound(Mode::Insert, "<Esc>"),
            Some(Action::SwitchMode(Mode::Navigate))
        );
        Ok(())
    }

    #[test]
    fn default_delay_is_one_second() -> Result<()> {
        assert_eq!(Config::default().conversion.delay(), Duration::from_millis(1000));
        let embedded: Config = json5::from_str(CONFIG)?;
        assert_eq!(embedded.conversion.delay(), DEFAULT_DELAY);
        Ok(())
    }

    #[test]
    fn user_bindings_override_and_defaults_fill_in() {
        let mut cfg: Config = json5::from_str(
            r#"{ "keybindings": { "Navigate": { "<q>": "Convert" } }, "conversion": { "delay_ms": 250 } }"#,
        )
        .expect("user config parses");
        let defaults: Config = json5::from_str(CONFIG).expect("default config parses");
        cfg.merge_default_keybindings(defaults.keybindings);

        let navigate = &cfg.keybindings[&Mode::Navigate];
        let key = |raw: &str| parse_key_sequence(raw).unwrap_or_default();
        assert_eq!(navigate.get(&key("<q>")), Some(&Action::Convert));
        assert_eq!(navigate.get(&key("<Ctrl-c>")), Some(&Action::Quit));
        assert_eq!(navigate.get(&key("<d><d>")), Some(&Action::ClearField));
        assert!(cfg.keybindings.contains_key(&Mode::Insert));
        assert_eq!(cfg.conversion.delay_ms, 250);
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(
            parse_key_event("a").ok(),
            Some(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()))
        );
        assert_eq!(
            parse_key_event("enter").ok(),
            Some(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()))
        );
        assert_eq!(
            parse_key_event("esc").ok(),
            Some(KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()))
        );
        assert_eq!(
            parse_key_event("f5").ok(),
            Some(KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()))
        );
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(
            parse_key_event("ctrl-a").ok(),
            Some(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key_event("alt-enter").ok(),
            Some(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT))
        );
        assert_eq!(
            parse_key_event("backtab").ok(),
            Some(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        );
    }

    #[test]
    fn test_multiple_modifiers() {
        assert_eq!(
            parse_key_event("ctrl-alt-a").ok(),
            Some(KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            ))
        );
        assert_eq!(
            parse_key_event("ctrl-shift-enter").ok(),
            Some(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            ))
        );
    }

    #[test]
    fn test_reverse_multiple_modifiers() {
        assert_eq!(
            key_event_to_string(&KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )),
            "ctrl-alt-a".to_string()
        );
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            parse_key_sequence("<d><d>").ok(),
            Some(vec![
                KeyEvent::new(KeyCode::Char('d'), KeyModifiers::empty()),
                KeyEvent::new(KeyCode::Char('d'), KeyModifiers::empty()),
            ])
        );
        assert!(parse_key_sequence("<q").is_err());
        assert!(parse_key_sequence("q").is_err());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_event("f13").is_err());
    }

    #[test]
    fn test_case_insensitivity() {
        assert_eq!(
            parse_key_event("CTRL-a").ok(),
            Some(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key_event("AlT-eNtEr").ok(),
            Some(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT))
        );
    }
}
