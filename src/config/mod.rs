use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub mode: ServiceMode,
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub completion: CompletionConfig,
    pub retrieval: RetrievalConfig,
}

/// Which variant of the service to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Try the recipe database first, fall back to direct completion
    Full,
    /// Always call the language model directly
    Simple,
}

impl FromStr for ServiceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ServiceMode::Full),
            "simple" | "minimal" => Ok(ServiceMode::Simple),
            other => Err(Error::Config(format!("Invalid SERVICE_MODE value: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub timeout_seconds: u64,
}

// Keep the key out of debug output
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub embeddings_path: PathBuf,
    pub index_path: PathBuf,
    pub default_result_count: usize,
    pub max_result_count: usize,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            Error::Config("OPENAI_API_KEY environment variable not set.".to_string())
        })?;

        let mode = get("SERVICE_MODE")
            .unwrap_or_else(|| "full".to_string())
            .parse()?;

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let max_request_body_size = get("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|| "1048576".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        let model = get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string());
        let embedding_model = get("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|| "text-embedding-3-small".to_string());

        let timeout_seconds = get("OPENAI_TIMEOUT")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid OPENAI_TIMEOUT value".to_string()))?;

        let temperature = get("COMPLETION_TEMPERATURE")
            .unwrap_or_else(|| "0.7".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid COMPLETION_TEMPERATURE value".to_string()))?;

        let max_tokens = get("COMPLETION_MAX_TOKENS")
            .unwrap_or_else(|| "2000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid COMPLETION_MAX_TOKENS value".to_string()))?;

        let embeddings_path = get("EMBEDDINGS_PATH")
            .unwrap_or_else(|| "data/recipes_with_embeddings.json".to_string())
            .into();
        let index_path = get("INDEX_PATH")
            .unwrap_or_else(|| "data/recipe_index.json".to_string())
            .into();

        let default_result_count = get("DEFAULT_RESULT_COUNT")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DEFAULT_RESULT_COUNT value".to_string()))?;

        let max_result_count = get("MAX_RESULT_COUNT")
            .unwrap_or_else(|| "20".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_RESULT_COUNT value".to_string()))?;

        Ok(Settings {
            mode,
            server: ServerConfig {
                host,
                port,
                max_request_body_size,
            },
            openai: OpenAiConfig {
                api_key,
                base_url,
                model,
                embedding_model,
                timeout_seconds,
            },
            completion: CompletionConfig {
                temperature,
                max_tokens,
            },
            retrieval: RetrievalConfig {
                embeddings_path,
                index_path,
                default_result_count,
                max_result_count,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.openai.api_key.trim().is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY environment variable not set.".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(Error::Config(
                "Temperature must be between 0 and 2".to_string(),
            ));
        }

        if self.completion.max_tokens == 0 {
            return Err(Error::Config("Max tokens must be non-zero".to_string()));
        }

        if self.retrieval.default_result_count == 0 {
            return Err(Error::Config(
                "Default result count must be non-zero".to_string(),
            ));
        }

        if self.retrieval.max_result_count == 0 {
            return Err(Error::Config(
                "Max result count must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings suitable for tests and local experiments
    #[doc(hidden)]
    pub fn for_testing(api_key: &str, base_url: &str) -> Self {
        Settings {
            mode: ServiceMode::Full,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_request_body_size: 1_048_576,
            },
            openai: OpenAiConfig {
                api_key: api_key.to_string(),
                base_url: base_url.to_string(),
                model: "gpt-3.5-turbo".to_string(),
                embedding_model: "text-embedding-3-small".to_string(),
                timeout_seconds: 5,
            },
            completion: CompletionConfig {
                temperature: 0.7,
                max_tokens: 2000,
            },
            retrieval: RetrievalConfig {
                embeddings_path: "data/recipes_with_embeddings.json".into(),
                index_path: "data/recipe_index.json".into(),
                default_result_count: 5,
                max_result_count: 20,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::for_testing("sk-test", "http://localhost:1234");
        assert!(settings.validate().is_ok());

        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 5000;
        settings.completion.temperature = 3.5;
        assert!(settings.validate().is_err());

        settings.completion.temperature = 0.7;
        settings.openai.api_key = "  ".to_string();
        assert!(settings.validate().is_err());

        settings.openai.api_key = "sk-test".to_string();
        settings.completion.max_tokens = 0;
        assert!(settings.validate().is_err());

        settings.completion.max_tokens = 2000;
        settings.retrieval.default_result_count = 0;
        assert!(settings.validate().is_err());

        settings.retrieval.default_result_count = 5;
        settings.retrieval.max_result_count = 0;
        assert!(settings.validate().is_err());

        settings.retrieval.max_result_count = 20;
        assert!(settings.validate().is_ok());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let result = Settings::from_lookup(lookup(&[("PORT", "8080")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let settings = Settings::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.mode, ServiceMode::Full);
        assert_eq!(settings.openai.model, "gpt-3.5-turbo");
        assert_eq!(settings.completion.max_tokens, 2000);
        assert_eq!(settings.retrieval.default_result_count, 5);
        assert_eq!(settings.retrieval.max_result_count, 20);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8080"),
            ("SERVICE_MODE", "simple"),
        ]))
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.mode, ServiceMode::Simple);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let result = Settings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("PORT")));

        let result = Settings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SERVICE_MODE", "rag"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_service_mode_parse() {
        assert_eq!("full".parse::<ServiceMode>().unwrap(), ServiceMode::Full);
        assert_eq!("Simple".parse::<ServiceMode>().unwrap(), ServiceMode::Simple);
        assert_eq!("minimal".parse::<ServiceMode>().unwrap(), ServiceMode::Simple);
        assert!("rag".parse::<ServiceMode>().is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let settings = Settings::for_testing("sk-very-secret", "http://localhost:1234");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-very-secret"));
    }
}
