use std::path::PathBuf;

use rand::Rng;

const GENERATED_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone, clap::Parser)]
#[command(about = "Serves the QR mixer game")]
pub struct Config {
    #[arg(long, env = "QR_MIXER_LISTEN", default_value = "0.0.0.0")]
    pub listen: String,

    #[arg(long, env = "QR_MIXER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// The built frontend bundle
    #[arg(long, env = "QR_MIXER_DIST", default_value = "frontend/dist/")]
    pub dist: PathBuf,

    /// JSON file with the game questions, the built-in set is used without it
    #[arg(long, env = "QR_MIXER_QUESTIONS")]
    pub questions: Option<PathBuf>,

    /// Secret for the admin pages, a random one is generated and logged when missing
    #[arg(long, env = "QR_MIXER_ADMIN_TOKEN")]
    pub admin_token: Option<String>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }

    pub fn resolve_admin_token(&self) -> String {
        match self.admin_token.as_deref() {
            Some(token) if !token.is_empty() => token.to_owned(),
            _ => {
                let token: String = rand::thread_rng()
                    .sample_iter(&rand::distributions::Alphanumeric)
                    .take(GENERATED_TOKEN_LENGTH)
                    .map(char::from)
                    .collect();
                tracing::warn!(%token, "No admin token configured, generated one");
                token
            }
        }
    }

    pub async fn load_questions(&self) -> Result<game::QuestionSet, QuestionLoadError> {
        let path = match self.questions.as_ref() {
            Some(p) => p,
            None => {
                tracing::info!("Using built-in questions");
                return Ok(game::QuestionSet::builtin());
            }
        };

        let content = tokio::fs::read_to_string(path).await?;
        let questions = game::QuestionSet::from_json(&content)?;
        tracing::info!(path = %path.display(), count = questions.questions.len(), "Loaded questions");

        Ok(questions)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionLoadError {
    #[error("reading question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing question file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["backend"]).unwrap();

        assert_eq!("0.0.0.0:8080", config.bind_address());
        assert_eq!(None, config.questions);
        assert_eq!(None, config.admin_token);
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "backend",
            "--port",
            "3000",
            "--listen",
            "127.0.0.1",
            "--questions",
            "questions.json",
            "--admin-token",
            "hunter2",
        ])
        .unwrap();

        assert_eq!("127.0.0.1:3000", config.bind_address());
        assert_eq!(Some(PathBuf::from("questions.json")), config.questions);
        assert_eq!("hunter2", config.resolve_admin_token());
    }

    #[test]
    fn generated_admin_token() {
        let config = Config::try_parse_from(["backend", "--admin-token", ""]).unwrap();

        let token = config.resolve_admin_token();
        assert_eq!(GENERATED_TOKEN_LENGTH, token.len());
        assert_ne!(token, config.resolve_admin_token());
    }
}
