use std::{env, path::PathBuf};

use config::{Config, Environment};
use secrecy::Secret;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{
    credential_store::CredentialStore,
    error::TickTickError,
    sort_order::{
        SortOrderPolicy, BATCH_SORT_ORDER_SPACING, ROOT_TASK_SORT_ORDER, SUBTASK_SORT_ORDER,
    },
};

pub static DEFAULT_BASE_URL: &str = "https://api.ticktick.com/open/v1";
pub static DEFAULT_TOKEN_URL: &str = "https://ticktick.com/oauth/token";
pub static DEFAULT_CREDENTIALS_FILE: &str = ".env";
static ENV_PREFIX: &str = "TICKTICK";

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub client_id: Option<String>,
    pub client_secret: Option<Secret<String>>,
    pub access_token: Option<Secret<String>>,
    pub refresh_token: Option<Secret<String>>,
    pub base_url: Url,
    pub token_url: Url,
    pub credentials_file: PathBuf,
    pub root_task_sort_order: SortOrderPolicy,
    pub subtask_sort_order: SortOrderPolicy,
    pub batch_sort_order_spacing: i64,
}

impl Settings {
    /// Load settings from the credential file and the `TICKTICK_*` environment.
    ///
    /// Process environment variables win over the file entries.
    pub fn new_from_file(file: Option<PathBuf>) -> Result<Self, TickTickError> {
        let credentials_file = file.unwrap_or_else(|| {
            env::var(format!("{ENV_PREFIX}_CREDENTIALS_FILE"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
        });
        debug!(
            "Loading TickTick settings from {}",
            credentials_file.display()
        );

        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("token_url", DEFAULT_TOKEN_URL)?
            .set_default("root_task_sort_order.gap", ROOT_TASK_SORT_ORDER.gap)?
            .set_default("root_task_sort_order.base", ROOT_TASK_SORT_ORDER.base)?
            .set_default("subtask_sort_order.gap", SUBTASK_SORT_ORDER.gap)?
            .set_default("subtask_sort_order.base", SUBTASK_SORT_ORDER.base)?
            .set_default("batch_sort_order_spacing", BATCH_SORT_ORDER_SPACING)?;

        let prefix = format!("{ENV_PREFIX}_");
        match CredentialStore::new(&credentials_file).entries() {
            Ok(entries) => {
                for (key, value) in entries {
                    if let Some(setting) = key.strip_prefix(&prefix) {
                        builder = builder.set_default(setting.to_lowercase(), value)?;
                    }
                }
            }
            Err(err) => warn!("Ignoring unreadable credential file: {err:#}"),
        }

        let config = builder
            .add_source(Environment::with_prefix(&ENV_PREFIX.to_lowercase()))
            .set_override(
                "credentials_file",
                credentials_file.to_string_lossy().to_string(),
            )?
            .build()?;

        Ok(config.try_deserialize::<Settings>()?)
    }

    pub fn new() -> Result<Self, TickTickError> {
        Settings::new_from_file(None)
    }

    /// Settings with default endpoints and the given access token
    pub fn with_access_token(access_token: &str) -> Result<Self, TickTickError> {
        Ok(Settings {
            client_id: None,
            client_secret: None,
            access_token: Some(Secret::new(access_token.to_string())),
            refresh_token: None,
            base_url: DEFAULT_BASE_URL
                .parse()
                .map_err(|err| TickTickError::Configuration(format!("{err}")))?,
            token_url: DEFAULT_TOKEN_URL
                .parse()
                .map_err(|err| TickTickError::Configuration(format!("{err}")))?,
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            root_task_sort_order: ROOT_TASK_SORT_ORDER,
            subtask_sort_order: SUBTASK_SORT_ORDER,
            batch_sort_order_spacing: BATCH_SORT_ORDER_SPACING,
        })
    }

    /// Base URL without trailing slash, endpoints are appended to it
    pub fn api_base_url(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}
