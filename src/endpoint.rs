//! Endpoint configuration and the ODBC connection string for the Simba Spark driver.

use std::fmt;

use crate::{AppError, Result};

pub const HOSTNAME_VAR: &str = "DATABRICKS_SERVER_HOSTNAME";
pub const TOKEN_VAR: &str = "DATABRICKS_TOKEN";
pub const HTTP_PATH_VAR: &str = "DATABRICKS_HTTP_PATH";
pub const DRIVER_PATH_VAR: &str = "SIMBA_DRIVER_PATH";

/// Default driver location on Debian
pub const DEFAULT_DRIVER_PATH: &str = "/opt/simba/spark/lib/64/libsparkodbc_sb64.so";

/// Driver default is 10k rows per block; large exports need far fewer round trips.
pub const ROWS_FETCHED_PER_BLOCK: u32 = 1_000_000;

/// Personal access token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Everything needed to reach the SQL warehouse endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub host: String,
    pub token: Token,
    pub http_path: String,
    pub driver_path: String,
}

impl EndpointInfo {
    /// Resolve the endpoint from the process environment
    pub fn from_env() -> Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve the endpoint through an arbitrary variable lookup.
    ///
    /// A variable set to an empty string counts as defined.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |name: &str| lookup(name).ok_or_else(|| AppError::MissingEnvVar(name.to_string()));

        let host = required(HOSTNAME_VAR)?;
        let token = required(TOKEN_VAR)?;
        let http_path = required(HTTP_PATH_VAR)?;
        let driver_path =
            lookup(DRIVER_PATH_VAR).unwrap_or_else(|| DEFAULT_DRIVER_PATH.to_string());

        Ok(Self {
            host,
            token: Token::new(token),
            http_path,
            driver_path,
        })
    }

    /// Build the connection string as per the Simba ODBC driver documentation
    pub fn connection_string(&self) -> ConnectionString {
        ConnectionString {
            pairs: vec![
                ("DRIVER", self.driver_path.clone()),
                ("Host", self.host.clone()),
                ("PORT", "443".to_string()),
                ("HTTPPath", self.http_path.clone()),
                ("AuthMech", "3".to_string()),
                ("Schema", "default".to_string()),
                ("SSL", "1".to_string()),
                ("ThriftTransport", "2".to_string()),
                ("SparkServerType", "3".to_string()),
                ("UID", "token".to_string()),
                ("PWD", self.token.expose_secret().to_string()),
                ("RowsFetchedPerBlock", ROWS_FETCHED_PER_BLOCK.to_string()),
            ],
        }
    }
}

/// Ordered `KEY=value` pairs handed to the ODBC driver manager
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pairs: Vec<(&'static str, String)>,
}

impl ConnectionString {
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(key, _)| *key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The full string including the password. Only the driver should see this.
    pub fn expose_secret(&self) -> String {
        self.render(false)
    }

    /// Same layout with the password masked, safe for logs
    pub fn redacted(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                if redact && *key == "PWD" {
                    format!("{}=***", key)
                } else {
                    format!("{}={}", key, value)
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionString")
            .field(&self.redacted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn full_env() -> HashMap<String, String> {
        HashMap::from([
            (HOSTNAME_VAR.to_string(), "adb-123.azuredatabricks.net".to_string()),
            (TOKEN_VAR.to_string(), "dapi-secret".to_string()),
            (HTTP_PATH_VAR.to_string(), "/sql/1.0/warehouses/abc".to_string()),
        ])
    }

    fn resolve_from(env: &HashMap<String, String>) -> Result<EndpointInfo> {
        EndpointInfo::resolve(|name| env.get(name).cloned())
    }

    #[test]
    fn test_resolve_uses_variables() {
        let info = resolve_from(&full_env()).unwrap();

        assert_eq!(info.host, "adb-123.azuredatabricks.net");
        assert_eq!(info.token.expose_secret(), "dapi-secret");
        assert_eq!(info.http_path, "/sql/1.0/warehouses/abc");
    }

    #[test]
    fn test_resolve_default_driver_path() {
        let info = resolve_from(&full_env()).unwrap();
        assert_eq!(info.driver_path, DEFAULT_DRIVER_PATH);
    }

    #[test]
    fn test_resolve_custom_driver_path() {
        let mut env = full_env();
        env.insert(DRIVER_PATH_VAR.to_string(), "/usr/lib/libspark.so".to_string());

        let info = resolve_from(&env).unwrap();
        assert_eq!(info.driver_path, "/usr/lib/libspark.so");
    }

    #[test]
    fn test_resolve_missing_each_required_variable() {
        for var in [HOSTNAME_VAR, TOKEN_VAR, HTTP_PATH_VAR] {
            let mut env = full_env();
            env.remove(var);

            let err = resolve_from(&env).unwrap_err();
            assert!(matches!(err, AppError::MissingEnvVar(ref name) if name == var));
        }
    }

    #[test]
    fn test_resolve_reports_first_missing_in_order() {
        let env = HashMap::new();
        let err = resolve_from(&env).unwrap_err();
        assert!(matches!(err, AppError::MissingEnvVar(ref name) if name == HOSTNAME_VAR));
    }

    #[test]
    fn test_resolve_empty_value_counts_as_defined() {
        let mut env = full_env();
        env.insert(HTTP_PATH_VAR.to_string(), String::new());

        let info = resolve_from(&env).unwrap();
        assert_eq!(info.http_path, "");
    }

    #[test]
    fn test_connection_string_exact() {
        let info = resolve_from(&full_env()).unwrap();

        assert_eq!(
            info.connection_string().expose_secret(),
            "DRIVER=/opt/simba/spark/lib/64/libsparkodbc_sb64.so\
             ;Host=adb-123.azuredatabricks.net\
             ;PORT=443\
             ;HTTPPath=/sql/1.0/warehouses/abc\
             ;AuthMech=3\
             ;Schema=default\
             ;SSL=1\
             ;ThriftTransport=2\
             ;SparkServerType=3\
             ;UID=token\
             ;PWD=dapi-secret\
             ;RowsFetchedPerBlock=1000000"
        );
    }

    #[test]
    fn test_connection_string_keys_unique_and_ordered() {
        let info = resolve_from(&full_env()).unwrap();
        let conn = info.connection_string();

        let keys: Vec<_> = conn.keys().collect();
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(
            keys,
            vec![
                "DRIVER",
                "Host",
                "PORT",
                "HTTPPath",
                "AuthMech",
                "Schema",
                "SSL",
                "ThriftTransport",
                "SparkServerType",
                "UID",
                "PWD",
                "RowsFetchedPerBlock",
            ]
        );
        assert_eq!(conn.get("PWD"), Some("dapi-secret"));
        assert_eq!(conn.get("Missing"), None);
    }

    #[test]
    fn test_redacted_hides_token() {
        let info = resolve_from(&full_env()).unwrap();
        let conn = info.connection_string();

        let redacted = conn.redacted();
        assert!(redacted.contains("PWD=***"));
        assert!(!redacted.contains("dapi-secret"));
        assert!(!format!("{:?}", conn).contains("dapi-secret"));
    }

    #[test]
    fn test_token_debug_is_masked() {
        let info = resolve_from(&full_env()).unwrap();
        let debug_str = format!("{:?}", info);

        assert!(debug_str.contains("Token(***)"));
        assert!(!debug_str.contains("dapi-secret"));
    }
}
