/// Expands a user supplied issue reference into a fully qualified issue key.
///
/// A bare number is prefixed with the configured project key (`12` -> `PROJ-12`).
/// Anything else is treated as already qualified and only upper-cased.
/// Without a configured project the token passes through untouched.
pub fn issue_key(project_key: &str, token: &str) -> String {
    let token = token.trim();
    let project_key = project_key.trim();

    if project_key.is_empty() {
        return token.to_string();
    }

    if token.parse::<u64>().is_ok() {
        format!("{project_key}-{token}")
    } else {
        token.to_uppercase()
    }
}
