use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use oauth2::TokenResponse;
use oauth2::basic::{BasicTokenResponse, BasicTokenType};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Access grant as persisted in the token file.
///
/// Field names follow the layout Google's client libraries write, so an
/// existing token file from another quickstart client can be reused.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expiry time as milliseconds since Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Build a token from an authorization server response received at `now`.
    pub fn from_response(response: &BasicTokenResponse, now: DateTime<Utc>) -> Self {
        let token_type = match response.token_type() {
            BasicTokenType::Bearer => "Bearer".to_string(),
            BasicTokenType::Mac => "MAC".to_string(),
            BasicTokenType::Extension(other) => other.clone(),
        };

        let scope = response.scopes().map(|scopes| {
            scopes
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });

        // An expiry chrono cannot represent is dropped rather than wrapped.
        let expiry_date = response
            .expires_in()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .and_then(|d| now.checked_add_signed(d))
            .map(|expiry| expiry.timestamp_millis());

        Self {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            scope,
            token_type,
            expiry_date,
        }
    }

    /// Whether the expiry recorded in the token has passed. Tokens without an
    /// expiry never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date
            .map(|expiry| expiry <= now.timestamp_millis())
            .unwrap_or(false)
    }
}

/// The token file on disk.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is `Ok(None)`; an unreadable or unparseable one is an error.
    pub fn load(&self) -> Result<Option<Token>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Auth(format!("Failed to read token file: {}", e)));
            }
        };

        let token: Token = serde_json::from_str(&contents)
            .map_err(|e| AppError::Auth(format!("Failed to parse token file: {}", e)))?;

        Ok(Some(token))
    }

    /// Write the token, replacing any previous file.
    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Auth(format!("Failed to create token directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string(token)?;

        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        // Only the owner may read the grant.
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .map_err(|e| AppError::Auth(format!("Failed to create token file: {}", e)))?;

        // The mode above only applies to new files.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| AppError::Auth(format!("Failed to restrict token file: {}", e)))?;

        file.write_all(contents.as_bytes())
            .map_err(|e| AppError::Auth(format!("Failed to write token file: {}", e)))?;

        Ok(())
    }

    /// Delete the token file, if any.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Cleared cached token");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cached token to clear");
                Ok(())
            }
            Err(e) => Err(AppError::Auth(format!("Failed to delete token file: {}", e))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_response() {
        let response: BasicTokenResponse = serde_json::from_str(
            r#"{
                "access_token": "ya29.abc",
                "token_type": "bearer",
                "expires_in": 3599,
                "refresh_token": "1//refresh",
                "scope": "https://www.googleapis.com/auth/spreadsheets.readonly"
            }"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();

        let token = Token::from_response(&response, now);

        assert_eq!(
            token,
            Token {
                access_token: "ya29.abc".to_string(),
                refresh_token: Some("1//refresh".to_string()),
                scope: Some(
                    "https://www.googleapis.com/auth/spreadsheets.readonly".to_string()
                ),
                token_type: "Bearer".to_string(),
                expiry_date: Some(now.timestamp_millis() + 3_599_000),
            }
        );
    }

    #[test]
    fn test_from_response_without_optional_fields() {
        let response: BasicTokenResponse =
            serde_json::from_str(r#"{"access_token": "ya29.abc", "token_type": "bearer"}"#)
                .unwrap();

        let token = Token::from_response(&response, Utc::now());

        assert_eq!(token.refresh_token, None);
        assert_eq!(token.scope, None);
        assert_eq!(token.expiry_date, None);
    }

    #[test]
    fn test_from_response_with_oversized_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();

        for expires_in in ["9223372036854775", "18446744073709551615"] {
            let response: BasicTokenResponse = serde_json::from_str(&format!(
                r#"{{"access_token": "ya29.abc", "token_type": "bearer", "expires_in": {}}}"#,
                expires_in
            ))
            .unwrap();

            let token = Token::from_response(&response, now);

            assert_eq!(token.access_token, "ya29.abc");
            assert_eq!(
                token.expiry_date, None,
                "expires_in {} should not produce an expiry",
                expires_in
            );
        }
    }

    #[test]
    fn test_is_expired() {
        let token = test_helpers::mock_token("ya29.abc");
        let before = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 11, 0, 0).unwrap();

        assert!(!token.is_expired(before));
        assert!(token.is_expired(after));

        let no_expiry = Token {
            expiry_date: None,
            ..token
        };
        assert!(!no_expiry.is_expired(after));
    }

    #[test]
    fn test_reads_token_written_by_other_clients() {
        let token: Token = serde_json::from_str(
            r#"{
                "access_token": "ya29.abc",
                "refresh_token": "1//refresh",
                "scope": "https://www.googleapis.com/auth/spreadsheets.readonly",
                "token_type": "Bearer",
                "expiry_date": 1735725600000,
                "refresh_token_expires_in": 604799
            }"#,
        )
        .unwrap();

        assert_eq!(token.access_token, "ya29.abc");
        assert_eq!(token.expiry_date, Some(1_735_725_600_000));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "not a token").unwrap();

        let err = TokenStore::new(path).load().unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }

    #[test]
    fn test_save_overwrites_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token.json"));

        store.save(&test_helpers::mock_token("first")).unwrap();
        store.save(&test_helpers::mock_token("second")).unwrap();

        assert_eq!(store.load().unwrap(), Some(test_helpers::mock_token("second")));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        store.save(&test_helpers::mock_token("ya29.abc")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&test_helpers::mock_token("ya29.abc")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), Some(test_helpers::mock_token("ya29.abc")));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        store.save(&test_helpers::mock_token("ya29.abc")).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Clearing twice is fine
        store.clear().unwrap();
    }
}
