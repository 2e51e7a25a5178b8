use std::path::PathBuf;

pub fn default_name() -> String {
    "devserve".to_string()
}

pub fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_index() -> String {
    "index.html".to_string()
}

pub fn default_livereload_port() -> u16 {
    devserve_inject::middleware::DEFAULT_LIVERELOAD_PORT
}

pub fn default_livereload_protocol() -> String {
    devserve_inject::middleware::DEFAULT_LIVERELOAD_PROTOCOL.to_string()
}

pub fn default_debounce_ms() -> u64 {
    100
}
