use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    Duplicate(String),
    Empty,
}

/// Ordered, de-duplicated list of upper-case ticker symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new(symbols: Vec<String>) -> Self {
        let mut list = Self::default();
        for sym in symbols {
            let _ = list.add(&sym);
        }
        list
    }

    pub fn add(&mut self, raw: &str) -> AddOutcome {
        let symbol = normalize_symbol(raw);
        if symbol.is_empty() {
            return AddOutcome::Empty;
        }
        if self.contains(&symbol) {
            return AddOutcome::Duplicate(symbol);
        }
        self.symbols.push(symbol.clone());
        AddOutcome::Added(symbol)
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        let before = self.symbols.len();
        self.symbols.retain(|s| s != &symbol);
        self.symbols.len() != before
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// A missing or unreadable watchlist file is treated as an empty list.
pub fn load_watchlist(path: &Path) -> Watchlist {
    let payload = match std::fs::read_to_string(path) {
        Ok(p) => p,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read watchlist");
            }
            return Watchlist::default();
        }
    };
    match serde_json::from_str::<Vec<String>>(&payload) {
        Ok(symbols) => Watchlist::new(symbols),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Watchlist is not a JSON string array");
            Watchlist::default()
        }
    }
}

pub fn save_watchlist(path: &Path, watchlist: &Watchlist) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string(watchlist.symbols()).context("failed to serialize watchlist")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = watchlist.len(), "Watchlist saved");
    Ok(())
}
