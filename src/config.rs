use lazy_static::lazy_static;
use rand::RngCore;
use regex::Regex;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_NAME: &str = "songboard";
const DEFAULT_DB_SCHEMA: &str = "public";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_schema: String,
    pub session: SessionConfig,
}

fn is_valid_schema_name(name: &str) -> bool {
    lazy_static! {
        static ref SCHEMA_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    }
    SCHEMA_RE.is_match(name)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // DATABASE_URL wins; otherwise the URL is assembled from
        // per-deployment credentials plus fixed host/database defaults.
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let user = std::env::var("DB_USER")?;
                let pass = std::env::var("DB_PASS")?;
                let host = std::env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.into());
                let name = std::env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.into());
                format!("postgresql://{}:{}@{}/{}", user, pass, host, name)
            }
        };

        let db_schema = std::env::var("DB_SCHEMA").unwrap_or_else(|_| DEFAULT_DB_SCHEMA.into());
        if !is_valid_schema_name(&db_schema) {
            anyhow::bail!("DB_SCHEMA {:?} is not a valid schema name", db_schema);
        }

        let secret = match std::env::var("SESSION_SECRET") {
            Ok(s) => s.into_bytes(),
            Err(_) => {
                // Sessions signed with a generated secret do not survive a
                // restart; set SESSION_SECRET to pin them.
                tracing::warn!("SESSION_SECRET not set; generating a per-process secret");
                let mut secret = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut secret);
                secret
            }
        };

        let session = SessionConfig {
            secret,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "songboard".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "songboard-users".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };

        Ok(Self {
            database_url,
            db_schema,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_are_validated() {
        assert!(is_valid_schema_name("public"));
        assert!(is_valid_schema_name("tc3497"));
        assert!(is_valid_schema_name("_shadow"));
        assert!(!is_valid_schema_name("bad-name"));
        assert!(!is_valid_schema_name("1st"));
        assert!(!is_valid_schema_name("drop table; --"));
        assert!(!is_valid_schema_name(""));
    }
}
