use std::fs;
use std::time::Duration;

use indexmap::IndexMap;
use routegen_lib::codegen::{same_content, EmitConfig};
use routegen_lib::operation::parse_operations;
use routegen_lib::pipeline::render;
use routegen_lib::{generate, GeneratorConfig, IntrospectionClient, RetryPolicy};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get_user_payload() -> serde_json::Value {
    json!([{
        "name": "GetUser",
        "path": "/api/user",
        "verb": "get",
        "input": { "type": "object", "properties": {} },
        "output": { "type": "object", "properties": {} }
    }])
}

fn client() -> IntrospectionClient {
    let policy = RetryPolicy {
        max_attempts: 1,
        delay: Duration::from_millis(1),
        ..RetryPolicy::default()
    };
    IntrospectionClient::new(policy, IndexMap::new()).unwrap()
}

/// Extracts the body of `export async function <name>(`.
fn function_body<'a>(module: &'a str, name: &str) -> &'a str {
    let start = module
        .find(&format!("export async function {name}("))
        .unwrap_or_else(|| panic!("function {name} not emitted"));
    let rest = &module[start..];
    let end = rest.find("\n}\n").unwrap();
    &rest[..end]
}

#[test]
fn get_user_scenario() {
    let ops = parse_operations(&get_user_payload()).unwrap();
    let module = render(&ops, &EmitConfig::default());

    assert!(module.contains("export const GetUserArgsSchema = z.record(z.string(), z.unknown());"));
    assert!(module.contains("export const GetUserResultSchema = "));
    assert!(module.contains("export type GetUserArgs = Record<string, unknown>;"));

    let get_user = function_body(&module, "getUser");
    assert!(get_user.contains("method: \"GET\""));
    assert!(!get_user.contains("body:"));

    assert!(module.contains("export const schemas = {\n  GetUserArgsSchema,\n  GetUserResultSchema,\n};"));
    assert!(module.contains("export default {\n  configure,\n  schemas,\n  getUser,\n};"));
}

#[test]
fn put_with_path_param_builds_url_and_sends_body() {
    let ops = parse_operations(&json!([{
        "name": "UpdateProfile",
        "path": "/api/profile/:id",
        "verb": "PUT",
        "input": {
            "required": ["id", "name"],
            "properties": { "id": { "type": "string" }, "name": { "type": "string" } }
        },
        "output": { "type": "object", "properties": { "updated": { "type": "boolean" } } }
    }]))
    .unwrap();
    let module = render(&ops, &EmitConfig::default());

    assert!(module.contains(
        "export const UpdateProfileArgsSchema = z.object({ id: z.string(), name: z.string() });"
    ));
    let body = function_body(&module, "updateProfile");
    assert!(body.contains(
        "fetch(`${config.baseUrl}/api/profile/${encodeURIComponent(String(input.id))}`"
    ));
    assert!(body.contains("method: \"PUT\""));
    assert!(body.contains("body: JSON.stringify(input),"));
}

#[test]
fn every_verb_other_than_get_and_head_sends_a_body() {
    for (verb, expects_body) in [
        ("GET", false),
        ("HEAD", false),
        ("POST", true),
        ("PUT", true),
        ("PATCH", true),
        ("DELETE", true),
        ("OPTIONS", true),
    ] {
        let ops = parse_operations(&json!([{
            "name": "Act",
            "path": "/act",
            "verb": verb,
            "input": { "type": "object" },
            "output": { "type": "object" }
        }]))
        .unwrap();
        let module = render(&ops, &EmitConfig::default());
        assert_eq!(
            function_body(&module, "act").contains("body: JSON.stringify(input)"),
            expects_body,
            "{verb}"
        );
    }
}

#[test]
fn repeated_runs_differ_only_in_timestamp() {
    let ops = parse_operations(&get_user_payload()).unwrap();
    let first = render(&ops, &EmitConfig::default());
    std::thread::sleep(Duration::from_millis(1100));
    let second = render(&ops, &EmitConfig::default());
    assert!(same_content(&first, &second));
}

#[tokio::test]
async fn generate_from_file_writes_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ops.json"), get_user_payload().to_string()).unwrap();
    let config_path = dir.path().join("routegen.config.json");
    fs::write(
        &config_path,
        r#"{
            "introspectionFile": "ops.json",
            "baseUrl": "https://api.example.com",
            "outputDir": "generated",
            "outputFile": "client.ts"
        }"#,
    )
    .unwrap();
    let config = GeneratorConfig::load(&config_path).unwrap();

    let report = generate(&config, &client()).await.unwrap();
    assert!(report.written);
    assert_eq!(report.operations, 1);
    assert_eq!(report.path, dir.path().join("generated/client.ts"));

    let written = fs::read_to_string(&report.path).unwrap();
    assert!(written.contains("baseUrl: \"https://api.example.com\","));

    let again = generate(&config, &client()).await.unwrap();
    assert!(!again.written);
}

#[tokio::test]
async fn generate_from_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(get_user_payload()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig {
        introspection_url: Some(format!("{}/__introspect", mock_server.uri())),
        base_url: None,
        output_dir: dir.path().to_path_buf(),
        output_file: "client.ts".to_string(),
        introspection_file: None,
        headers: IndexMap::new(),
    };

    let report = generate(&config, &client()).await.unwrap();
    assert!(report.written);
    let written = fs::read_to_string(dir.path().join("client.ts")).unwrap();
    assert!(written.contains("export async function getUser("));
}

#[tokio::test]
async fn shape_error_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let ops_path = dir.path().join("ops.json");
    fs::write(&ops_path, r#"[{ "name": "Broken", "path": "/x" }]"#).unwrap();
    let config = GeneratorConfig {
        introspection_url: None,
        base_url: None,
        output_dir: dir.path().join("out"),
        output_file: "client.ts".to_string(),
        introspection_file: Some(ops_path),
        headers: IndexMap::new(),
    };

    assert!(generate(&config, &client()).await.is_err());
    assert!(!dir.path().join("out/client.ts").exists());
}
