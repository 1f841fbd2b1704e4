/// Resultado del sondeo al catalogo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// El episodio todavia no aparece en el catalogo.
    NotPublished,
    /// El episodio esta publicado; contiene la URL de su pagina de detalle.
    Published(String),
}

impl ProbeResult {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }

    pub fn detail_url(&self) -> Option<&str> {
        match self {
            Self::Published(url) => Some(url),
            Self::NotPublished => None,
        }
    }
}
