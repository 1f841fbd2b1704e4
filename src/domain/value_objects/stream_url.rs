use crate::domain::errors::DomainError;
use std::fmt;

const SECURE_SCHEME: &str = "https://";

/// URL de stream validada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUrl(String);

impl StreamUrl {
    /// Crea una URL de stream valida.
    /// # Arguments
    /// - `url`: URL cruda del stream.
    /// # Errors
    /// - `DomainError::InvalidStreamUrl` si el formato es invalido.
    pub fn new(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = url.into().trim().to_string();

        if url.is_empty() {
            return Err(DomainError::InvalidStreamUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if !url.starts_with("http://") && !url.starts_with(SECURE_SCHEME) {
            return Err(DomainError::InvalidStreamUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self(url))
    }

    /// Crea una URL que solo acepta transporte cifrado (`https://`).
    /// # Errors
    /// - `DomainError::InvalidStreamUrl` si la URL no es segura.
    pub fn secure(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = Self::new(url)?;
        if !url.is_secure() {
            return Err(DomainError::InvalidStreamUrl(format!(
                "URL must start with {}: {}",
                SECURE_SCHEME, url.0
            )));
        }
        Ok(url)
    }

    /// Indica si la URL usa transporte cifrado.
    pub fn is_secure(&self) -> bool {
        self.0.starts_with(SECURE_SCHEME)
    }

    /// Devuelve la URL como `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for StreamUrl {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StreamUrl {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for StreamUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_valid_https() {
        let result = StreamUrl::new("https://cdn.example.com/ep7/index.m3u8");
        assert!(result.is_ok());
        assert!(result.unwrap().is_secure());
    }

    #[test]
    fn test_stream_url_trims_whitespace() {
        let url = StreamUrl::new("  https://cdn.example.com/a.m3u8\r\n").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a.m3u8");
    }

    #[test]
    fn test_stream_url_empty_fails() {
        let result = StreamUrl::new("");
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvalidStreamUrl(_)
        ));
    }

    #[test]
    fn test_stream_url_invalid_protocol_fails() {
        assert!(StreamUrl::new("ftp://example.com/stream").is_err());
        assert!(StreamUrl::new("example.com/stream").is_err());
    }

    #[test]
    fn test_secure_rejects_plain_http() {
        assert!(StreamUrl::secure("http://cdn.example.com/a.m3u8").is_err());
        assert!(StreamUrl::secure("https://cdn.example.com/a.m3u8").is_ok());
    }
}
