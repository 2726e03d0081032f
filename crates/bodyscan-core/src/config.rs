//! Configuration module
//!
//! Configuration is an explicit value. Binaries build it once with [`Config::from_env`] and hand
//! the relevant section to each component at construction; tests build it from
//! [`Config::default`] and override fields directly.

use std::env;
use std::fmt;
use std::str::FromStr;

// Common constants
const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;
const MAX_IMAGE_DIMENSION: u32 = 2048;
const FACE_BLUR_RADIUS: f32 = 30.0;
const IMAGE_QUALITY: u8 = 85;
const FACE_DETECTION_TIMEOUT_SECS: u64 = 15;
const FACE_MIN_CONFIDENCE: f32 = 80.0;
const AI_MAX_TOKENS: u32 = 1000;
const AI_TEMPERATURE: f32 = 0.7;
const AI_REQUEST_TIMEOUT_SECS: u64 = 60;
const SERVER_PORT: u16 = 8000;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

/// External vision-model provider used for analysis. One per deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    OpenAi,
    Anthropic,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }

    /// Human-readable provider name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OpenAI",
            AiProvider::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "anthropic" => Ok(AiProvider::Anthropic),
            other => Err(anyhow::anyhow!(
                "AI_PROVIDER must be 'openai' or 'anthropic', got '{}'",
                other
            )),
        }
    }
}

/// Face detector backend.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceDetectorBackend {
    /// AWS Rekognition `DetectFaces`.
    Rekognition { region: String, min_confidence: f32 },
    /// No detector. Every detection attempt fails, so uploads are stored without blurring.
    Disabled,
}

impl Default for FaceDetectorBackend {
    fn default() -> Self {
        FaceDetectorBackend::Rekognition {
            region: "us-east-1".to_string(),
            min_confidence: FACE_MIN_CONFIDENCE,
        }
    }
}

/// Image intake, normalization and anonymization settings.
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub max_upload_size_bytes: usize,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_dimension: u32,
    pub blur_radius: f32,
    pub jpeg_quality: u8,
    pub face_detection_timeout_secs: u64,
    pub face_detector: FaceDetectorBackend,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_dimension: MAX_IMAGE_DIMENSION,
            blur_radius: FACE_BLUR_RADIUS,
            jpeg_quality: IMAGE_QUALITY,
            face_detection_timeout_secs: FACE_DETECTION_TIMEOUT_SECS,
            face_detector: FaceDetectorBackend::default(),
        }
    }
}

/// Vision-model provider settings.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub provider: AiProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl AnalysisConfig {
    /// Model identifier of the selected provider.
    pub fn model(&self) -> &str {
        match self.provider {
            AiProvider::OpenAi => &self.openai_model,
            AiProvider::Anthropic => &self.anthropic_model,
        }
    }

    /// API key of the selected provider.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            AiProvider::OpenAi => self.openai_api_key.as_deref(),
            AiProvider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_api_key: None,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            max_tokens: AI_MAX_TOKENS,
            temperature: AI_TEMPERATURE,
            request_timeout_secs: AI_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub local_storage_path: String,
    pub local_storage_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_storage_path: "./uploads".to_string(),
            local_storage_base_url: "/uploads".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub mcp_server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            mcp_server_name: "bodyscan".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub image: ImageConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            mcp_server_name: env::var("MCP_SERVER_NAME")
                .unwrap_or_else(|_| "bodyscan".to_string()),
        };

        let face_detector = match env::var("FACE_DETECTOR")
            .unwrap_or_else(|_| "rekognition".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "disabled" | "none" | "off" => FaceDetectorBackend::Disabled,
            "rekognition" => FaceDetectorBackend::Rekognition {
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                min_confidence: env::var("FACE_MIN_CONFIDENCE")
                    .unwrap_or_else(|_| FACE_MIN_CONFIDENCE.to_string())
                    .parse()
                    .unwrap_or(FACE_MIN_CONFIDENCE),
            },
            other => {
                return Err(anyhow::anyhow!(
                    "FACE_DETECTOR must be 'rekognition' or 'disabled', got '{}'",
                    other
                ))
            }
        };

        let image = ImageConfig {
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_UPLOAD_SIZE_BYTES),
            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.join(","))
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            max_dimension: env::var("MAX_IMAGE_DIMENSION")
                .unwrap_or_else(|_| MAX_IMAGE_DIMENSION.to_string())
                .parse()
                .unwrap_or(MAX_IMAGE_DIMENSION),
            blur_radius: env::var("FACE_BLUR_RADIUS")
                .unwrap_or_else(|_| FACE_BLUR_RADIUS.to_string())
                .parse()
                .unwrap_or(FACE_BLUR_RADIUS),
            jpeg_quality: env::var("IMAGE_QUALITY")
                .unwrap_or_else(|_| IMAGE_QUALITY.to_string())
                .parse()
                .unwrap_or(IMAGE_QUALITY),
            face_detection_timeout_secs: env::var("FACE_DETECTION_TIMEOUT_SECS")
                .unwrap_or_else(|_| FACE_DETECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(FACE_DETECTION_TIMEOUT_SECS),
            face_detector,
        };

        let analysis = AnalysisConfig {
            provider: env::var("AI_PROVIDER")
                .unwrap_or_else(|_| "openai".to_string())
                .parse()?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok().filter(|s| !s.is_empty()),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string()),
            anthropic_base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            max_tokens: env::var("AI_MAX_TOKENS")
                .unwrap_or_else(|_| AI_MAX_TOKENS.to_string())
                .parse()
                .unwrap_or(AI_MAX_TOKENS),
            temperature: env::var("AI_TEMPERATURE")
                .unwrap_or_else(|_| AI_TEMPERATURE.to_string())
                .parse()
                .unwrap_or(AI_TEMPERATURE),
            request_timeout_secs: env::var("AI_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| AI_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(AI_REQUEST_TIMEOUT_SECS),
        };

        let storage = StorageConfig {
            local_storage_path: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            local_storage_base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| "/uploads".to_string()),
        };

        let config = Config {
            server,
            image,
            analysis,
            storage,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.image.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE must be greater than 0"));
        }
        if self.image.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }
        if self.image.max_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_DIMENSION must be greater than 0"));
        }
        if !(1..=100).contains(&self.image.jpeg_quality) {
            return Err(anyhow::anyhow!(
                "IMAGE_QUALITY must be between 1 and 100, got {}",
                self.image.jpeg_quality
            ));
        }
        if self.image.blur_radius.is_nan() || self.image.blur_radius <= 0.0 {
            return Err(anyhow::anyhow!("FACE_BLUR_RADIUS must be positive"));
        }
        if self.analysis.max_tokens == 0 {
            return Err(anyhow::anyhow!("AI_MAX_TOKENS must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            return Err(anyhow::anyhow!(
                "AI_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.analysis.temperature
            ));
        }
        if self.analysis.api_key().is_none() {
            return Err(anyhow::anyhow!(
                "{} must be set when AI_PROVIDER={}",
                match self.analysis.provider {
                    AiProvider::OpenAi => "OPENAI_API_KEY",
                    AiProvider::Anthropic => "ANTHROPIC_API_KEY",
                },
                self.analysis.provider.as_str()
            ));
        }
        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.image.max_upload_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.image.allowed_extensions
    }

    pub fn ai_provider(&self) -> AiProvider {
        self.analysis.provider
    }
}
