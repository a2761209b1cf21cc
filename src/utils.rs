#[cfg(test)]
use mockall::automock;

/// Environment lookups used by configuration and credential resolution.
#[cfg_attr(test, automock)]
pub trait EnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct StdEnvProvider;

impl EnvProvider for StdEnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// Returns the variable only when it is set and not blank.
pub(crate) fn non_empty_var(env: &impl EnvProvider, key: &str) -> Option<String> {
    env.var(key).ok().filter(|v| !v.trim().is_empty())
}
