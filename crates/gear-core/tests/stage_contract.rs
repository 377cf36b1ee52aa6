//! Contrato de stage: decodificación de params, precondiciones y journal.

use gear_core::{run_stage, ArtifactStore, InMemoryJournal, ProjectEventKind, ProjectJournal, StageContext, StageInput,
                StageOutcome, TypedStage, Workspace, WorkspaceError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EchoParams {
    #[serde(default)]
    suffix: String,
}

/// Copia cada input concatenando `suffix`.
struct EchoStage;

impl TypedStage for EchoStage {
    type Params = EchoParams;

    fn id(&self) -> &'static str {
        "echo"
    }

    fn output_keys(&self) -> &'static [&'static str] {
        &["copy"]
    }

    fn run_typed(&self, ctx: &StageContext<'_>, artifacts: &[String], params: EchoParams) -> Result<StageOutcome, WorkspaceError> {
        let mut bytes = ctx.store.read_bytes(ctx.workspace, &artifacts[0])?;
        bytes.extend_from_slice(params.suffix.as_bytes());
        let art = ctx.store.save_as(ctx.workspace, "copy", "txt", &mut bytes.as_slice())?;
        StageOutcome::new().output("copy", art).summary(&json!({"len": bytes.len()}))
    }
}

/// Declara una clave pero no produce nada.
struct LazyStage;

impl TypedStage for LazyStage {
    type Params = ();

    fn id(&self) -> &'static str {
        "lazy"
    }

    fn output_keys(&self) -> &'static [&'static str] {
        &["never"]
    }

    fn run_typed(&self, _ctx: &StageContext<'_>, _artifacts: &[String], _params: ()) -> Result<StageOutcome, WorkspaceError> {
        Ok(StageOutcome::new())
    }
}

fn setup() -> (tempfile::TempDir, Workspace, ArtifactStore, InMemoryJournal) {
    let tmp = tempfile::tempdir().unwrap();
    let ws = Workspace::create("proj", tmp.path()).unwrap();
    (tmp, ws, ArtifactStore::default(), InMemoryJournal::new())
}

#[test]
fn typed_stage_runs_through_neutral_contract() {
    let (_tmp, ws, store, journal) = setup();
    let src = store.save_bytes(&ws, "in.txt", b"abc").unwrap();
    let ctx = StageContext::new(&ws, &store);
    let input = StageInput::new(vec![src.name.clone()], json!({"suffix": "!"}));

    let res = run_stage(&EchoStage, &ctx, &input, &journal).unwrap();
    assert_eq!(res.stage, "echo");
    assert_eq!(res.input, input);
    let copy = res.output("copy").unwrap();
    assert_eq!(store.read_bytes(&ws, &copy.name).unwrap(), b"abc!");
    assert_eq!(res.summary, json!({"len": 4}));

    let kinds: Vec<ProjectEventKind> = journal.list(ws.id).into_iter().map(|e| e.kind).collect();
    assert!(matches!(&kinds[0], ProjectEventKind::StageStarted { stage, .. } if stage == "echo"));
    assert!(matches!(&kinds[1], ProjectEventKind::StageFinished { outputs, .. } if outputs == &vec![copy.name.clone()]));
}

#[test]
fn missing_input_artifact_fails_before_running() {
    let (_tmp, ws, store, journal) = setup();
    let ctx = StageContext::new(&ws, &store);
    let err = run_stage(&EchoStage, &ctx, &StageInput::new(vec!["absent.txt".into()], json!({})), &journal).unwrap_err();
    assert_eq!(err, WorkspaceError::NotFound("absent.txt".into()));
    assert!(store.list(&ws).unwrap().is_empty());
}

#[test]
fn undecodable_params_are_invalid_input() {
    let (_tmp, ws, store, journal) = setup();
    let src = store.save_bytes(&ws, "in.txt", b"abc").unwrap();
    let ctx = StageContext::new(&ws, &store);
    let err = run_stage(&EchoStage, &ctx, &StageInput::new(vec![src.name], json!({"suffix": 5})), &journal).unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidInput(m) if m.starts_with("echo:")));
}

#[test]
fn undeclared_outputs_are_rejected() {
    let (_tmp, ws, store, journal) = setup();
    let ctx = StageContext::new(&ws, &store);
    let err = run_stage(&LazyStage, &ctx, &StageInput::params_only(json!(null)), &journal).unwrap_err();
    assert!(matches!(err, WorkspaceError::StorageFailure(_)));
    let last = journal.list(ws.id).pop().unwrap();
    assert!(matches!(last.kind, ProjectEventKind::StageFailed { .. }));
}

#[test]
fn vanished_workspace_is_storage_failure() {
    let (tmp, ws, store, journal) = setup();
    std::fs::remove_dir_all(tmp.path().join("proj")).unwrap();
    let ctx = StageContext::new(&ws, &store);
    let err = run_stage(&LazyStage, &ctx, &StageInput::params_only(json!(null)), &journal).unwrap_err();
    assert!(matches!(err, WorkspaceError::StorageFailure(_)));
}
