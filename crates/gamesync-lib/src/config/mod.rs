mod loader;
mod model;

pub use loader::load_config;
pub use model::{
    Config, DEFAULT_BASE_URL, DEFAULT_CATALOG_PATH, DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR,
    ReporterKind,
};
