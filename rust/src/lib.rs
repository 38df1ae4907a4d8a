pub mod config_store;
pub mod extractor;
pub mod main_ui_html;
pub mod normalizer;
pub mod path_utils;
pub mod pyramid;
pub mod renderer;
pub mod server;

/// Id do contêiner da pirâmide dentro do HTML da descrição do produto.
pub const PYRAMID_CONTAINER_ID: &str = "piramide-olfativa";

/// Rótulos dos títulos de camada, comparados por substring no texto do título.
pub const TOP_TIER_LABEL: &str = "Notas de Topo";
pub const HEART_TIER_LABEL: &str = "Notas de Coração";
pub const BASE_TIER_LABEL: &str = "Notas de Base";

/// URL padrão de imagem de nota: prefixo + slug do nome + extensão.
pub const NOTE_IMAGE_BASE_URL: &str = "https://cdn.perfumaria.app/notas/";
pub const NOTE_IMAGE_EXTENSION: &str = ".webp";
