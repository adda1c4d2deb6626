use crossterm::event::KeyCode;

use crate::ui::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(Tab),
    SymbolUp,
    SymbolDown,
    AddSymbol,
    RemoveSymbol,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicalsCommand {
    PrevParam,
    NextParam,
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCommand {
    FieldUp,
    FieldDown,
    EditField,
    Connect,
    Disconnect,
    ShowLoginUrl,
    EnterRequestToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Tab => Some(UiCommand::NextTab),
        KeyCode::BackTab => Some(UiCommand::PrevTab),
        KeyCode::Up => Some(UiCommand::SymbolUp),
        KeyCode::Down => Some(UiCommand::SymbolDown),
        KeyCode::Delete => Some(UiCommand::RemoveSymbol),
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (*c as u8 - b'1') as usize;
            Tab::ALL.get(idx).copied().map(UiCommand::SelectTab)
        }
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'k' => Some(UiCommand::SymbolUp),
            'j' => Some(UiCommand::SymbolDown),
            'a' => Some(UiCommand::AddSymbol),
            'x' => Some(UiCommand::RemoveSymbol),
            'r' => Some(UiCommand::Refresh),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_technicals_command(key_code: &KeyCode) -> Option<TechnicalsCommand> {
    match key_code {
        KeyCode::Left | KeyCode::Char('[') => Some(TechnicalsCommand::PrevParam),
        KeyCode::Right | KeyCode::Char(']') => Some(TechnicalsCommand::NextParam),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(TechnicalsCommand::Increase),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(TechnicalsCommand::Decrease),
        _ => None,
    }
}

/// Settings keys shadow the watchlist navigation keys while that tab is active.
pub fn parse_settings_command(key_code: &KeyCode) -> Option<SettingsCommand> {
    match key_code {
        KeyCode::Up => Some(SettingsCommand::FieldUp),
        KeyCode::Down => Some(SettingsCommand::FieldDown),
        KeyCode::Enter => Some(SettingsCommand::EditField),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' => Some(SettingsCommand::FieldUp),
            'j' => Some(SettingsCommand::FieldDown),
            'e' => Some(SettingsCommand::EditField),
            'c' => Some(SettingsCommand::Connect),
            'd' => Some(SettingsCommand::Disconnect),
            'l' => Some(SettingsCommand::ShowLoginUrl),
            'g' => Some(SettingsCommand::EnterRequestToken),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_prompt_command(key_code: &KeyCode) -> Option<PromptCommand> {
    match key_code {
        KeyCode::Enter => Some(PromptCommand::Submit),
        KeyCode::Esc => Some(PromptCommand::Cancel),
        KeyCode::Backspace => Some(PromptCommand::Backspace),
        KeyCode::Char(c) if !c.is_control() => Some(PromptCommand::Insert(*c)),
        _ => None,
    }
}
