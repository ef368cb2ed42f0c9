use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::{debug, warn};

pub static CLIENT_ID_KEY: &str = "TICKTICK_CLIENT_ID";
pub static CLIENT_SECRET_KEY: &str = "TICKTICK_CLIENT_SECRET";
pub static ACCESS_TOKEN_KEY: &str = "TICKTICK_ACCESS_TOKEN";
pub static REFRESH_TOKEN_KEY: &str = "TICKTICK_REFRESH_TOKEN";

/// Key defined by a single dotenv line, if any
fn line_key(line: &str) -> Option<String> {
    dotenvy::from_read_iter(line.as_bytes())
        .next()
        .and_then(Result::ok)
        .map(|(key, _)| key)
}

/// Dotenv file holding the TickTick credentials.
///
/// Writes replace existing keys in place and append new ones: unrelated keys,
/// comments and line order survive every save. There is no locking, a single
/// writer process is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> anyhow::Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to read credential file {}", self.path.display())
            }),
        }
    }

    /// All entries with dotenv semantics (quotes, `export`, inline comments),
    /// in file order. A missing file has no entries, unparsable lines are skipped.
    pub fn entries(&self) -> anyhow::Result<Vec<(String, String)>> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(err) if err.not_found() => return Ok(vec![]),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read credential file {}", self.path.display())
                })
            }
        };

        Ok(entries
            .filter_map(|entry| {
                entry
                    .map_err(|err| {
                        warn!(
                            "Skipping invalid line of credential file {}: {err}",
                            self.path.display()
                        )
                    })
                    .ok()
            })
            .collect())
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value))
    }

    /// Set every `(key, value)` pair, keeping the rest of the file untouched
    pub fn upsert(&self, updates: &[(&str, &str)]) -> anyhow::Result<()> {
        let mut lines = self.read_lines()?;

        for (key, value) in updates {
            let entry = format!("{key}={value}");
            match lines
                .iter()
                .position(|line| line_key(line).as_deref() == Some(*key))
            {
                Some(index) => lines[index] = entry,
                None => lines.push(entry),
            }
        }

        let mut content = String::new();
        for line in &lines {
            content.push_str(line);
            content.push('\n');
        }

        fs::write(&self.path, content).with_context(|| {
            format!("Failed to write credential file {}", self.path.display())
        })?;
        debug!(
            "Saved {} credential entries to {}",
            updates.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Persist a refreshed token pair.
    ///
    /// The access token (and the refresh token when one was issued) always
    /// overwrite the stored ones, client credentials are only written when
    /// the file does not have them yet.
    pub fn save_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> anyhow::Result<()> {
        let existing_keys: Vec<String> =
            self.entries()?.into_iter().map(|(key, _)| key).collect();
        let is_stored = |key: &str| existing_keys.iter().any(|existing| existing == key);

        let mut updates = vec![(ACCESS_TOKEN_KEY, access_token)];
        if let Some(refresh_token) = refresh_token {
            updates.push((REFRESH_TOKEN_KEY, refresh_token));
        }
        if let Some(client_id) = client_id.filter(|_| !is_stored(CLIENT_ID_KEY)) {
            updates.push((CLIENT_ID_KEY, client_id));
        }
        if let Some(client_secret) = client_secret.filter(|_| !is_stored(CLIENT_SECRET_KEY)) {
            updates.push((CLIENT_SECRET_KEY, client_secret));
        }

        self.upsert(&updates)
    }
}
