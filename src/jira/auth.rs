use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::PathBuf;

use crate::configuration::{AuthType, Configuration};
use crate::utils::{EnvProvider, non_empty_var};

const API_TOKEN_ENV: &str = "JIRA_API_TOKEN";

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error(
        "No API token found. Set the JIRA_API_TOKEN environment variable or add the server to your .netrc"
    )]
    NoAuth,
    #[error("Basic authentication requires `login` in the configuration")]
    MissingLogin,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Credentials attached to every request as an `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { login: String, token: String },
    Bearer { token: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { login, .. } => write!(f, "Basic({login}, ***)"),
            Credentials::Bearer { .. } => write!(f, "Bearer(***)"),
        }
    }
}

impl Credentials {
    pub fn header(&self) -> String {
        match self {
            Credentials::Basic { login, token } => {
                format!("Basic {}", STANDARD.encode(format!("{login}:{token}")))
            }
            Credentials::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

pub fn resolve_credentials(
    configuration: &Configuration,
    env: &impl EnvProvider,
) -> Result<Credentials, AuthError> {
    let token = get_token(&configuration.server, env)?;

    match configuration.auth_type {
        AuthType::Basic => {
            if configuration.login.is_empty() {
                return Err(AuthError::MissingLogin);
            }
            Ok(Credentials::Basic {
                login: configuration.login.clone(),
                token,
            })
        }
        AuthType::Bearer => Ok(Credentials::Bearer { token }),
    }
}

pub fn get_token(server: &str, env: &impl EnvProvider) -> Result<String, AuthError> {
    if let Some(token) = non_empty_var(env, API_TOKEN_ENV) {
        log::debug!("Using {API_TOKEN_ENV} environment variable");
        return Ok(token);
    }

    match get_netrc_token_with_env(server, env) {
        Ok(token) => {
            log::debug!("Using .netrc file credentials");
            return Ok(token);
        }
        Err(AuthError::Io(e)) => log::warn!("Failed to read .netrc: {}", e),
        Err(_) => {}
    }

    Err(AuthError::NoAuth)
}

fn get_netrc_token_with_env(server: &str, env: &impl EnvProvider) -> Result<String, AuthError> {
    let host = extract_host_from_url(server);
    let netrc_path = get_netrc_path_with_env(env)?;

    if !netrc_path.exists() {
        return Err(AuthError::NoAuth);
    }

    let content = std::fs::read_to_string(&netrc_path)?;

    // machine <host> login <user> password <token>
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i] == "machine" && tokens.get(i + 1) == Some(&host.as_str()) {
            let mut j = i + 2;
            while j < tokens.len() && tokens[j] != "machine" {
                if tokens[j] == "password" {
                    if let Some(password) = tokens.get(j + 1) {
                        return Ok(password.to_string());
                    }
                }
                j += 1;
            }
        }
        i += 1;
    }

    Err(AuthError::NoAuth)
}

fn extract_host_from_url(server: &str) -> String {
    url::Url::parse(server)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| {
            server
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string()
        })
}

fn get_netrc_path_with_env(env: &impl EnvProvider) -> Result<PathBuf, AuthError> {
    if let Some(path) = non_empty_var(env, "NETRC") {
        Ok(PathBuf::from(path))
    } else if let Ok(home_dir) = env.var("HOME") {
        Ok(PathBuf::from(home_dir).join(".netrc"))
    } else if let Ok(user_profile) = env.var("USERPROFILE") {
        let netrc_path = PathBuf::from(&user_profile).join("_netrc");
        if netrc_path.exists() {
            Ok(netrc_path)
        } else {
            Ok(PathBuf::from(user_profile).join(".netrc"))
        }
    } else {
        Err(AuthError::NoAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MockEnvProvider;
    use std::env::VarError;
    use std::fs;
    use tempfile::TempDir;

    fn configuration(auth_type: AuthType, login: &str) -> Configuration {
        Configuration {
            server: "https://example.atlassian.net".to_string(),
            login: login.to_string(),
            auth_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_host_from_url() {
        assert_eq!(
            extract_host_from_url("https://example.atlassian.net"),
            "example.atlassian.net"
        );
        assert_eq!(
            extract_host_from_url("https://jira.company.internal:8443/jira"),
            "jira.company.internal"
        );
        assert_eq!(extract_host_from_url("jira.local/path"), "jira.local");
    }

    #[test]
    fn test_basic_header_encoding() {
        let credentials = Credentials::Basic {
            login: "user@example.com".to_string(),
            token: "secret".to_string(),
        };
        assert_eq!(
            credentials.header(),
            "Basic dXNlckBleGFtcGxlLmNvbTpzZWNyZXQ="
        );
        assert_eq!(format!("{credentials:?}"), "Basic(user@example.com, ***)");
    }

    #[test]
    fn test_bearer_header() {
        let credentials = Credentials::Bearer {
            token: "pat".to_string(),
        };
        assert_eq!(credentials.header(), "Bearer pat");
    }

    #[test]
    fn test_environment_token_has_priority() {
        let mut mock_env = MockEnvProvider::new();
        mock_env
            .expect_var()
            .withf(|key| key == API_TOKEN_ENV)
            .times(1)
            .returning(|_| Ok("env-token".to_string()));

        let credentials =
            resolve_credentials(&configuration(AuthType::Basic, "dev"), &mock_env).unwrap();
        assert_eq!(
            credentials,
            Credentials::Basic {
                login: "dev".to_string(),
                token: "env-token".to_string()
            }
        );
    }

    #[test]
    fn test_netrc_parsing() {
        let temp_dir = TempDir::new().unwrap();
        let netrc_file = temp_dir.path().join(".netrc");

        let netrc_content = r#"
machine other.atlassian.net
login someone
password wrong-token

machine example.atlassian.net
login dev
password netrc-token
"#;
        fs::write(&netrc_file, netrc_content).unwrap();

        let mut mock_env = MockEnvProvider::new();
        mock_env
            .expect_var()
            .withf(|key| key == "NETRC")
            .returning(|_| Err(VarError::NotPresent));
        mock_env
            .expect_var()
            .withf(|key| key == "HOME")
            .times(1)
            .returning(move |_| Ok(temp_dir.path().to_string_lossy().to_string()));

        let token =
            get_netrc_token_with_env("https://example.atlassian.net", &mock_env).unwrap();
        assert_eq!(token, "netrc-token");
    }

    #[test]
    fn test_no_token_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut mock_env = MockEnvProvider::new();
        mock_env
            .expect_var()
            .withf(|key| key == "HOME")
            .returning(move |_| Ok(temp_dir.path().to_string_lossy().to_string()));
        mock_env
            .expect_var()
            .returning(|_| Err(VarError::NotPresent));

        let result = resolve_credentials(&configuration(AuthType::Bearer, ""), &mock_env);
        assert!(matches!(result, Err(AuthError::NoAuth)));
    }

    #[test]
    fn test_basic_auth_requires_login() {
        let mut mock_env = MockEnvProvider::new();
        mock_env
            .expect_var()
            .returning(|_| Ok("env-token".to_string()));

        let result = resolve_credentials(&configuration(AuthType::Basic, ""), &mock_env);
        assert!(matches!(result, Err(AuthError::MissingLogin)));
    }
}
