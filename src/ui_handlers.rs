use super::*;

/// Route one key press. Returns `true` when the user asked to quit.
pub(super) fn handle_key(code: &KeyCode, app_state: &mut AppState, ctx: &mut AppContext) -> bool {
    if app_state.prompt.is_some() {
        if let Some(cmd) = parse_prompt_command(code) {
            handle_prompt_command(cmd, app_state, ctx);
        }
        return false;
    }

    if app_state.tab == Tab::Settings {
        if let Some(cmd) = parse_settings_command(code) {
            handle_settings_command(cmd, app_state, ctx);
            return false;
        }
    }

    if app_state.tab == Tab::Technicals {
        if let Some(cmd) = parse_technicals_command(code) {
            handle_technicals_command(cmd, app_state);
            return false;
        }
    }

    let Some(cmd) = parse_main_command(code) else {
        return false;
    };
    match cmd {
        UiCommand::Quit => return true,
        UiCommand::NextTab => app_state.set_tab(app_state.tab.next()),
        UiCommand::PrevTab => app_state.set_tab(app_state.tab.prev()),
        UiCommand::SelectTab(tab) => app_state.set_tab(tab),
        UiCommand::SymbolUp => app_state.select_prev(),
        UiCommand::SymbolDown => app_state.select_next(),
        UiCommand::AddSymbol => app_state.open_prompt(PromptKind::AddSymbol),
        UiCommand::RemoveSymbol => {
            if app_state.remove_selected().is_some() {
                persist_watchlist(app_state, ctx);
            }
        }
        UiCommand::Refresh => {
            app_state.refresh_current();
            tracing::debug!(tab = app_state.tab.title(), "Refresh requested");
        }
    }
    false
}

fn handle_prompt_command(cmd: PromptCommand, app_state: &mut AppState, ctx: &mut AppContext) {
    match cmd {
        PromptCommand::Insert(c) => app_state.prompt_insert(c),
        PromptCommand::Backspace => app_state.prompt_backspace(),
        PromptCommand::Cancel => {
            app_state.take_prompt();
        }
        PromptCommand::Submit => {
            if let Some(prompt) = app_state.take_prompt() {
                submit_prompt(prompt, app_state, ctx);
            }
        }
    }
}

fn submit_prompt(prompt: Prompt, app_state: &mut AppState, ctx: &mut AppContext) {
    match prompt.kind {
        PromptKind::AddSymbol => {
            if let AddOutcome::Added(symbol) = app_state.add_symbol(&prompt.buffer) {
                persist_watchlist(app_state, ctx);
                if app_state.ticker_running {
                    app_state.push_log(format!(
                        "Reconnect the ticker to stream {}",
                        symbol
                    ));
                }
            }
        }
        PromptKind::EditKey(field) => {
            app_state.api_keys.set(field, prompt.buffer);
            app_state.invalidate_all();
            app_state.push_log(format!("{} updated", field.label()));
        }
        PromptKind::RequestToken => {
            let request_token = prompt.buffer.trim().to_string();
            if request_token.is_empty() {
                app_state.push_log("[WARN] Request token is empty".to_string());
                return;
            }
            spawn_generate_session(request_token, app_state, ctx);
        }
    }
}

fn handle_settings_command(cmd: SettingsCommand, app_state: &mut AppState, ctx: &mut AppContext) {
    match cmd {
        SettingsCommand::FieldUp => app_state.settings_up(),
        SettingsCommand::FieldDown => app_state.settings_down(),
        SettingsCommand::EditField => {
            let field = app_state.settings_field();
            app_state.open_prompt(PromptKind::EditKey(field));
        }
        SettingsCommand::Connect => start_ticker(app_state, ctx),
        SettingsCommand::Disconnect => {
            if app_state.ticker_running {
                stop_ticker(app_state, ctx);
            } else {
                app_state.push_log("Ticker is not running".to_string());
            }
        }
        SettingsCommand::ShowLoginUrl => show_login_url(app_state, ctx),
        SettingsCommand::EnterRequestToken => {
            if app_state.api_keys.has_access_token() {
                app_state.push_log("Access token already present".to_string());
            } else {
                app_state.open_prompt(PromptKind::RequestToken);
            }
        }
    }
}

fn handle_technicals_command(cmd: TechnicalsCommand, app_state: &mut AppState) {
    match cmd {
        TechnicalsCommand::PrevParam => app_state.select_param(false),
        TechnicalsCommand::NextParam => app_state.select_param(true),
        TechnicalsCommand::Increase => app_state.adjust_param(1),
        TechnicalsCommand::Decrease => app_state.adjust_param(-1),
    }
}
