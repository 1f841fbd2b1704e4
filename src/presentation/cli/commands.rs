use clap::{Parser, Subcommand};

/// Parametros de linea de comandos.
#[derive(Parser)]
#[command(name = "epwatch")]
#[command(author, version, about = "Espera el siguiente episodio de una serie y lo descarga")]
pub struct Cli {
    /// Archivo de configuracion TOML (por defecto `config/default.toml`).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directorio de salida de los episodios.
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Temporada (p. ej. 01).
    #[arg(short, long, global = true)]
    pub season: Option<String>,

    /// URL base del catalogo de la serie.
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Programa descargador externo.
    #[arg(long, global = true)]
    pub downloader: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcomandos disponibles.
#[derive(Subcommand)]
pub enum Commands {
    /// Vigila la ventana de estreno y descarga cada episodio nuevo (por defecto).
    Watch,

    /// Consulta una vez si un episodio ya esta publicado.
    Check {
        /// Numero de episodio (por defecto, el siguiente a descargar).
        episode: Option<u32>,
    },

    /// Muestra el siguiente episodio a buscar y su ruta de salida.
    Next,

    /// Descarga manual desde un manifiesto.
    Fetch {
        /// URL del manifiesto HLS.
        url: String,
        /// Ruta del archivo de salida.
        output_path: String,
    },
}
