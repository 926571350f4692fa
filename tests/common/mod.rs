use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use zenmedic::config::Config;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Configuration whose completion endpoint and user backend both point at `server_uri`
#[allow(dead_code)]
pub fn mock_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.completion.api_url = format!("{}{}", server_uri, COMPLETIONS_PATH);
    config.completion.api_key = Some("test-key".to_string());
    config.completion.timeout_seconds = 5;
    config.backend.base_url = server_uri.to_string();
    config.backend.timeout_seconds = 5;
    config
}

/// YAML equivalent of [`mock_config`] for driving the binary
#[allow(dead_code)]
pub fn mock_config_yaml(server_uri: &str) -> String {
    format!(
        r#"completion:
  api_url: "{uri}{path}"
  api_key: "test-key"
  timeout_seconds: 5
backend:
  base_url: "{uri}"
  timeout_seconds: 5
"#,
        uri = server_uri,
        path = COMPLETIONS_PATH
    )
}

#[allow(dead_code)]
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-1",
        "object": "chat.completion",
        "model": "mistral-tiny",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
