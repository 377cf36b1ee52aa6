use std::path::Path;

use gear_core::NamingStrategy;
use gearflow::api::wire;
use gearflow::{AppConfig, Envelope, GearService, Request, Response, ResponseBody};
use serde_json::{json, Value};

struct Harness {
    tmp: tempfile::TempDir,
    service: GearService,
}

fn harness() -> Harness {
    harness_with_upload_limit(AppConfig::default().max_upload_bytes)
}

fn harness_with_upload_limit(max_upload_bytes: u64) -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = AppConfig { template_root: tmp.path().join("assets"),
                          naming: NamingStrategy::Unique,
                          latency_scale: 0.0,
                          max_upload_bytes };
    Harness { service: GearService::from_config(&cfg),
              tmp }
}

fn put(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, bytes).expect("write");
}

fn env(resp: &Response) -> &Envelope {
    resp.envelope().expect("json envelope")
}

impl Harness {
    fn projects(&self) -> String {
        self.tmp.path().join("projects").to_string_lossy().into_owned()
    }

    fn create(&self, name: &str) -> Response {
        std::fs::create_dir_all(self.projects()).expect("projects dir");
        self.service
            .handle(Request::CreateProject(json!({ "projectName": name, "projectPath": self.projects() })))
    }

    fn upload(&self, file_name: &str, bytes: &[u8]) -> String {
        let resp = self.service.handle(Request::UploadFile { file_name: file_name.into(),
                                                             bytes: bytes.to_vec() });
        assert_eq!(resp.status, 200, "{resp:?}");
        env(&resp).data["name"].as_str().expect("name").to_string()
    }
}

#[test]
fn operations_before_create_project_are_rejected() {
    let h = harness();
    for req in [Request::ListFiles,
                Request::DownloadFile { file_name: Some("a.png".into()) },
                Request::UploadFile { file_name: "a.png".into(),
                                      bytes: b"img".to_vec() },
                Request::DeleteFile(json!({ "fileName": "a.png" })),
                Request::AiDetection(json!({"input": {"images": ["a.png"]}})),
                Request::GeometryModeling(json!({"input": {"groupNumber": "G1", "isDamage": true}})),
                Request::Simulation(json!({"input": {"gearGroupNumber": "G1", "isDamage": true}})),
                Request::ProjectInfo,
                Request::ProjectLog] {
        let resp = h.service.handle(req);
        assert_eq!(resp.status, 412);
        assert_eq!(env(&resp).msg, "no active project");
    }
}

#[test]
fn create_project_then_duplicate_conflicts() {
    let h = harness();
    let resp = h.create("DemoGear");
    assert_eq!(resp.status, 200);
    assert_eq!(env(&resp).data["projectName"], json!("DemoGear"));
    assert!(Path::new(&h.projects()).join("DemoGear").is_dir());

    let dup = h.create("DemoGear");
    assert_eq!(dup.status, 409);
    assert_eq!(env(&dup).data, json!({}));

    let missing = h.service.handle(Request::CreateProject(json!({ "projectName": "X" })));
    assert_eq!(missing.status, 400);
}

#[test]
fn upload_download_delete_cycle() {
    let h = harness();
    h.create("P");
    let name = h.upload("gear1.png", b"not really a png");
    assert!(name.starts_with("gear1_") && name.ends_with(".png"), "{name}");

    let resp = h.service.handle(Request::DownloadFile { file_name: Some(name.clone()) });
    match resp.body {
        ResponseBody::File { name: n, bytes } => {
            assert_eq!(n, name);
            assert_eq!(bytes, b"not really a png");
        }
        other => panic!("expected file, got {other:?}"),
    }

    let deleted = h.service.handle(Request::DeleteFile(json!({ "fileName": name })));
    assert_eq!(deleted.status, 200);
    let again = h.service.handle(Request::DownloadFile { file_name: Some(name.clone()) });
    assert_eq!(again.status, 404);
    let no_name = h.service.handle(Request::DownloadFile { file_name: None });
    assert_eq!(no_name.status, 400);
    let traversal = h.service.handle(Request::DeleteFile(json!({ "fileName": "../P" })));
    assert_eq!(traversal.status, 400);
}

#[test]
fn demo_gear_full_pipeline() {
    let h = harness();
    let assets = h.tmp.path().join("assets");
    put(&assets.join("model/damaged/G1_damage.stp"), b"STEP damaged");
    put(&assets.join("model/undamaged/G1.STEP"), b"STEP clean");
    for dir in ["damaged", "undamaged"] {
        put(&assets.join(format!("cloudmap/{dir}/stress/G1.png")), b"stress");
        put(&assets.join(format!("cloudmap/{dir}/life/G1.png")), b"life-map");
    }

    h.create("DemoGear");
    let image = h.upload("gear1.png", b"img");

    let det = h.service
               .handle(Request::AiDetection(json!({"input": {"images": [image], "precision": "high", "seed": 7}})));
    assert_eq!(det.status, 200, "{det:?}");
    let data = &env(&det).data;
    let heatmap = data["heatmap"]["name"].as_str().expect("heatmap");
    assert!(heatmap.starts_with("gear1_") && heatmap.ends_with(".png"));
    let is_damage = data["output"]["isDamage"].as_bool().expect("isDamage");
    assert_eq!(data["input"]["artifacts"], json!([image]));

    let model = h.service
                 .handle(Request::GeometryModeling(json!({"input": {"groupNumber": "G1", "isDamage": is_damage}})));
    assert_eq!(model.status, 200, "{model:?}");
    let model_name = env(&model).data["model"]["name"].as_str().expect("model").to_string();

    let sim = h.service.handle(Request::Simulation(json!({"input": {
        "gearGroupNumber": "G1", "isDamage": is_damage, "model": {"name": model_name}
    }})));
    assert_eq!(sim.status, 200, "{sim:?}");
    let sim_data = &env(&sim).data;
    assert_eq!(sim_data["stress_cloudmap"]["size"], json!(6));
    assert_eq!(sim_data["remain_life_cloudmap"]["size"], json!(8));

    let listed = h.service.handle(Request::ListFiles);
    let files = env(&listed).data["files"].as_array().expect("files").len();
    // imagen + heatmap + reporte + modelo + 2 cloudmaps
    assert_eq!(files, 6);

    let log = h.service.handle(Request::ProjectLog);
    let kinds: Vec<Value> = env(&log).data["events"].as_array()
                                                     .expect("events")
                                                     .iter()
                                                     .map(|e| e["kind"]["type"].clone())
                                                     .collect();
    assert_eq!(kinds.first(), Some(&json!("project_created")));
    assert_eq!(kinds.iter().filter(|k| **k == json!("stage_finished")).count(), 3);
}

#[test]
fn modeling_without_template_is_storage_failure() {
    let h = harness();
    h.create("P");
    let resp = h.service
                .handle(Request::GeometryModeling(json!({"input": {"groupNumber": "G1", "isDamage": true}})));
    assert_eq!(resp.status, 500);
    assert_eq!(env(&resp).msg, "template asset unavailable");
}

#[test]
fn upload_limit_applies_to_uploads_only() {
    let h = harness_with_upload_limit(8);
    put(&h.tmp.path().join("assets/model/damaged/G1_damage.stp"), b"ISO-10303-21; HEADER; ENDSEC;");
    h.create("P");

    let big = h.service.handle(Request::UploadFile { file_name: "big.png".into(),
                                                     bytes: vec![0u8; 9] });
    assert_eq!(big.status, 400);

    let model = h.service
                 .handle(Request::GeometryModeling(json!({"input": {"groupNumber": "G1", "isDamage": true}})));
    assert_eq!(model.status, 200, "{model:?}");
    assert_eq!(env(&model).data["model"]["size"], json!(29));
}

#[test]
fn flat_stage_body_is_invalid_input() {
    let h = harness();
    h.create("P");
    let resp = h.service.handle(Request::Simulation(json!({"gearGroupNumber": "G1", "isDamage": true})));
    assert_eq!(resp.status, 400);
}

#[test]
fn simulation_with_unknown_model_is_not_found() {
    let h = harness();
    h.create("P");
    let resp = h.service.handle(Request::Simulation(json!({"input": {
        "gearGroupNumber": "G1", "isDamage": true, "model": {"name": "ghost.stp"}
    }})));
    assert_eq!(resp.status, 404);
}

#[test]
fn wire_lines_drive_the_service() {
    let h = harness();
    std::fs::create_dir_all(h.projects()).expect("dir");
    let line = json!({"endpoint": "create-project", "body": {"projectName": "W", "projectPath": h.projects()}});
    let created = wire::to_envelope(h.service.handle(wire::parse_line(&line.to_string()).expect("parse")));
    assert_eq!(created.code, 200);

    let up = r#"{"endpoint":"upload-file","body":{"fileName":"n.txt","contentBase64":"aGVsbG8="}}"#;
    let stored = wire::to_envelope(h.service.handle(wire::parse_line(up).expect("parse")));
    let name = stored.data["name"].as_str().expect("name").to_string();

    let down = json!({"endpoint": "download-file", "body": {"fileName": name}});
    let got = wire::to_envelope(h.service.handle(wire::parse_line(&down.to_string()).expect("parse")));
    assert_eq!(got.data["contentBase64"], json!("aGVsbG8="));

    let info = wire::to_envelope(h.service.handle(wire::parse_line(r#"{"endpoint":"project-info"}"#).expect("parse")));
    assert_eq!(info.data["name"], json!("W"));
}
