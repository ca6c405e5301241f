use forcecheck::workflows::mode::ExecutionMode;

pub struct DefaultsConfig {
    pub log_level: String,
    pub packages: Vec<String>,
    pub modes: Vec<ExecutionMode>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            packages: vec!["OMP".to_string()],
            modes: ExecutionMode::defaults(),
        }
    }
}
