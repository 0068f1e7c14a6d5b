//! Integration tests for bower-update
//!
//! These tests verify:
//! - Whole update runs against a real bower.json on disk
//! - Selection policies and their precedence
//! - Resolution cleanup and change counting
//! - Registry log routing and subscription lifetime

use async_trait::async_trait;
use bower_update::console::{Console, MemorySink};
use bower_update::domain::LatestInfo;
use bower_update::error::{AppError, PromptError, RegistryError};
use bower_update::manifest::FsManifestStore;
use bower_update::options::{LogCriteria, UpdateOptions};
use bower_update::orchestrator::{Orchestrator, RunReport};
use bower_update::prompt::{CheckboxQuestion, ListQuestion, Prompter};
use bower_update::registry::{LogBus, LogLevel, RegistryInfo, RegistryService};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write_manifest(dir: &Path, content: &str) {
    fs::write(dir.join("bower.json"), content).unwrap();
}

fn read_manifest(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join("bower.json")).unwrap()).unwrap()
}

/// Registry answering from a fixed table and recording what it saw
#[derive(Default)]
struct FakeRegistry {
    infos: HashMap<String, RegistryInfo>,
    seen_bus: Mutex<Option<LogBus>>,
    lookups: Mutex<Vec<String>>,
}

impl FakeRegistry {
    fn with(mut self, source: &str, versions: &[&str], latest: Option<&str>) -> Self {
        self.infos.insert(
            source.to_string(),
            RegistryInfo {
                versions: versions.iter().map(|v| v.to_string()).collect(),
                latest: latest.map(LatestInfo::new),
            },
        );
        self
    }
}

/// Handle letting a test keep inspecting the registry it hands out
struct SharedRegistry(Arc<FakeRegistry>);

#[async_trait]
impl RegistryService for SharedRegistry {
    fn registry_name(&self) -> &'static str {
        "fake"
    }

    async fn info(&self, source: &str, bus: &LogBus) -> Result<RegistryInfo, RegistryError> {
        let registry = &self.0;
        *registry.seen_bus.lock().unwrap() = Some(bus.clone());
        registry.lookups.lock().unwrap().push(source.to_string());

        bus.log(LogLevel::Info, "resolve", source, format!("Resolving {}", source));
        match registry.infos.get(source) {
            Some(info) => Ok(info.clone()),
            None => {
                bus.log(LogLevel::Error, "lookup", source, "not registered");
                Err(RegistryError::package_not_found(source, "fake"))
            }
        }
    }
}

/// Prompter replaying scripted answers
#[derive(Default)]
struct ScriptedPrompter {
    checkbox_answers: VecDeque<Vec<usize>>,
    list_answers: HashMap<String, String>,
    checkbox_questions: Vec<CheckboxQuestion>,
    list_questions: Vec<ListQuestion>,
    cancel: bool,
}

impl Prompter for ScriptedPrompter {
    fn checkbox(&mut self, question: &CheckboxQuestion) -> Result<Vec<usize>, PromptError> {
        self.checkbox_questions.push(question.clone());
        if self.cancel {
            return Err(PromptError::Cancelled);
        }
        Ok(self
            .checkbox_answers
            .pop_front()
            .unwrap_or_else(|| (0..question.item_count()).collect()))
    }

    fn list_batch(
        &mut self,
        questions: &[ListQuestion],
    ) -> Result<HashMap<String, String>, PromptError> {
        self.list_questions.extend_from_slice(questions);
        if self.cancel {
            return Err(PromptError::Cancelled);
        }
        Ok(questions
            .iter()
            .map(|q| {
                let answer = self
                    .list_answers
                    .get(&q.name)
                    .cloned()
                    .unwrap_or_else(|| q.values().nth(q.default_index()).unwrap().to_string());
                (q.name.clone(), answer)
            })
            .collect())
    }
}

struct Run {
    result: Result<RunReport, AppError>,
    output: MemorySink,
    prompter: ScriptedPrompter,
}

async fn run(
    dir: &Path,
    options: UpdateOptions,
    registry: Arc<FakeRegistry>,
    mut prompter: ScriptedPrompter,
    verbose: bool,
) -> Run {
    let (console, output) = Console::buffered(verbose);
    let orchestrator = Orchestrator::with_services(
        options.with_cwd(dir),
        Box::new(FsManifestStore),
        Box::new(SharedRegistry(registry)),
        Arc::new(console),
    );
    let result = orchestrator.run(&mut prompter).await;
    Run {
        result,
        output,
        prompter,
    }
}

/// Run with no scripted answers and the verbose channel hidden
async fn quiet_run(dir: &Path, options: UpdateOptions, registry: Arc<FakeRegistry>) -> Run {
    run(dir, options, registry, ScriptedPrompter::default(), false).await
}

fn jquery_registry(latest: &str) -> Arc<FakeRegistry> {
    Arc::new(FakeRegistry::default().with("a", &["1.0.0", "1.1.0", "2.0.0"], Some(latest)))
}

mod update_runs {
    use super::*;

    /// Force-latest rewrites the caret target to the latest version
    #[tokio::test]
    async fn test_force_latest_updates_target() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        let report = run.result.unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "^2.0.0");
        assert!(run.output.contents().contains("has been chosen."));
        assert!(run
            .output
            .contents()
            .contains("Successfully updated versions of 1 bower dependencies."));
    }

    /// A package whose lowest satisfying version is the latest is left alone
    #[tokio::test]
    async fn test_latest_equal_to_min_is_not_updated() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.1.0"}}"#);
        let registry =
            Arc::new(FakeRegistry::default().with("a", &["1.0.0", "1.1.0"], Some("1.1.0")));
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        let run = quiet_run(dir.path(), options, registry).await;
        let report = run.result.unwrap();

        assert_eq!(report.updated, 0);
        assert!(report.packages[0].value.is_none());
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "^1.1.0");
        assert!(!run.output.contents().contains("has been chosen."));
    }

    /// Forcing latest twice on the same data chooses the same target
    #[tokio::test]
    async fn test_force_latest_is_repeatable() {
        let mut values = Vec::new();
        for _ in 0..2 {
            let dir = create_test_dir();
            write_manifest(dir.path(), r#"{"dependencies": {"a": "~1.0.0"}}"#);
            let options = UpdateOptions::new()
                .with_pick_all(true)
                .with_force_latest(true);
            let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
            values.push(run.result.unwrap().packages[0].value.clone());
        }
        assert_eq!(values[0], values[1]);
        assert_eq!(values[0].as_deref(), Some("~2.0.0"));
    }

    /// The forced prefix overrides the declared one
    #[tokio::test]
    async fn test_forced_range_char() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true)
            .with_range_char("~");

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        run.result.unwrap();
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "~2.0.0");
    }

    /// Sources survive the rewrite and dev packages stay in their section
    #[tokio::test]
    async fn test_sources_and_sections_preserved() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{
  "name": "app",
  "dependencies": {"lib": "owner/lib#^1.0.0"},
  "devDependencies": {"a": "^1.0.0"}
}"#,
        );
        let registry = Arc::new(
            FakeRegistry::default()
                .with("owner/lib", &["1.0.0", "3.0.0"], Some("3.0.0"))
                .with("a", &["1.0.0", "2.0.0"], Some("2.0.0")),
        );
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        let run = quiet_run(dir.path(), options, Arc::clone(&registry)).await;
        assert_eq!(run.result.unwrap().updated, 2);

        let json = read_manifest(dir.path());
        assert_eq!(json["dependencies"]["lib"], "owner/lib#^3.0.0");
        assert_eq!(json["devDependencies"]["a"], "^2.0.0");
        assert!(json["dependencies"].get("a").is_none());
        let mut lookups = registry.lookups.lock().unwrap().clone();
        lookups.sort();
        assert_eq!(lookups, vec!["a", "owner/lib"]);
    }

    /// The file is pretty printed with a trailing newline and keeps key order
    #[tokio::test]
    async fn test_output_format() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{"name":"app","version":"1.0.0","dependencies":{"a":"^1.0.0"},"private":true}"#,
        );
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        quiet_run(dir.path(), options, jquery_registry("2.0.0"))
            .await
            .result
            .unwrap();

        let content = fs::read_to_string(dir.path().join("bower.json")).unwrap();
        assert_eq!(
            content,
            "{\n  \"name\": \"app\",\n  \"version\": \"1.0.0\",\n  \"dependencies\": {\n    \"a\": \"^2.0.0\"\n  },\n  \"private\": true\n}\n"
        );
    }

    /// A target that is not a range is never a candidate and is kept as is
    #[tokio::test]
    async fn test_invalid_range_kept() {
        for force_latest in [true, false] {
            let dir = create_test_dir();
            write_manifest(dir.path(), r#"{"dependencies": {"a": "not-a-range"}}"#);
            let options = UpdateOptions::new()
                .with_pick_all(true)
                .with_force_latest(force_latest);

            let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
            let report = run.result.unwrap();

            assert!(report.packages[0].range.is_none());
            assert!(report.packages[0].value.is_none());
            assert_eq!(report.updated, 0);
            assert!(run.prompter.list_questions.is_empty());
            assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "not-a-range");
        }
    }

    /// An empty chosen target keeps the declared one
    #[tokio::test]
    async fn test_empty_choice_keeps_target() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_choose(|_, _| Some(String::new()));

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        assert_eq!(run.result.unwrap().updated, 0);
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "^1.0.0");
    }

    /// An empty answer from the prompt keeps the declared target
    #[tokio::test]
    async fn test_empty_answer_keeps_target() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let mut prompter = ScriptedPrompter::default();
        prompter.list_answers.insert("dependencies:a".into(), String::new());
        let options = UpdateOptions::new().with_pick_all(true);

        let run = run(dir.path(), options, jquery_registry("2.0.0"), prompter, false).await;
        assert_eq!(run.result.unwrap().updated, 0);
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], "^1.0.0");
    }
}

mod policies {
    use super::*;

    /// The chooser wins over force-latest
    #[tokio::test]
    async fn test_choose_wins() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true)
            .with_choose(|package, _| package.max.as_ref().map(|max| format!(">={}", max)));

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        run.result.unwrap();
        assert_eq!(read_manifest(dir.path())["dependencies"]["a"], ">=1.1.0");
    }

    /// The filter wins over pick-all and the checkbox is never shown
    #[tokio::test]
    async fn test_filter_wins() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0", "b": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true)
            .with_filter(|package, _| package.name == "a");
        let registry = jquery_registry("2.0.0");

        let run = quiet_run(dir.path(), options, Arc::clone(&registry)).await;
        run.result.unwrap();

        assert_eq!(*registry.lookups.lock().unwrap(), vec!["a"]);
        assert!(run.prompter.checkbox_questions.is_empty());
        let json = read_manifest(dir.path());
        assert_eq!(json["dependencies"]["a"], "^2.0.0");
        assert_eq!(json["dependencies"]["b"], "^1.0.0");
    }

    /// Interactive selection offers grouped packages and per-package targets
    #[tokio::test]
    async fn test_interactive_flow() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"a": "^1.0.0", "b": "^1.0.0"}, "devDependencies": {"c": "^1.0.0"}}"#,
        );
        let registry = Arc::new(
            FakeRegistry::default()
                .with("a", &["1.0.0", "1.1.0", "2.0.0"], Some("2.0.0"))
                .with("c", &["1.0.0", "2.0.0"], Some("2.0.0")),
        );
        let mut prompter = ScriptedPrompter::default();
        // Uncheck b
        prompter.checkbox_answers.push_back(vec![0, 2]);
        prompter.list_answers.insert("dependencies:a".into(), "~1.1.0".into());

        let run = run(dir.path(), UpdateOptions::new(), registry, prompter, false).await;
        let report = run.result.unwrap();

        let checkbox = &run.prompter.checkbox_questions[0];
        assert_eq!(checkbox.message, "Which packages would you like to check? (3 in total)");
        assert_eq!(checkbox.groups[1].title, "devDependencies:");

        let keys: Vec<&str> = run.prompter.list_questions.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(keys, vec!["dependencies:a", "devDependencies:c"]);

        assert_eq!(report.updated, 2);
        let json = read_manifest(dir.path());
        assert_eq!(json["dependencies"]["a"], "~1.1.0");
        assert_eq!(json["dependencies"]["b"], "^1.0.0");
        assert_eq!(json["devDependencies"]["c"], "^2.0.0");
    }

    /// Disabled devDependencies are neither offered nor touched
    #[tokio::test]
    async fn test_dev_dependencies_disabled() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"a": "^1.0.0"}, "devDependencies": {"c": "^1.0.0"}}"#,
        );
        let options = UpdateOptions::new().with_dev_dependencies(false);

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        run.result.unwrap();

        assert_eq!(run.prompter.checkbox_questions[0].item_count(), 1);
        assert_eq!(read_manifest(dir.path())["devDependencies"]["c"], "^1.0.0");
    }
}

mod resolutions {
    use super::*;

    /// Resolutions of processed packages go away even without a change
    #[tokio::test]
    async fn test_cleared_for_processed_packages() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"a": "^2.0.0", "b": "^1.0.0"},
                "resolutions": {"a": "2.0.0", "b": "1.0.0"}}"#,
        );
        let registry = Arc::new(FakeRegistry::default().with("a", &["2.0.0"], Some("2.0.0")));
        let options = UpdateOptions::new()
            .with_force_latest(true)
            .with_filter(|package, _| package.name == "a");

        let run = quiet_run(dir.path(), options, registry).await;
        assert_eq!(run.result.unwrap().updated, 0);

        let json = read_manifest(dir.path());
        assert!(json["resolutions"].get("a").is_none());
        assert_eq!(json["resolutions"]["b"], "1.0.0");
    }

    /// Resolutions are kept when clearing is disabled
    #[tokio::test]
    async fn test_kept_when_disabled() {
        let dir = create_test_dir();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"a": "^1.0.0"}, "resolutions": {"a": "1.0.0"}}"#,
        );
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true)
            .with_clear_resolutions(false);

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        run.result.unwrap();
        assert_eq!(read_manifest(dir.path())["resolutions"]["a"], "1.0.0");
    }
}

mod failures {
    use super::*;

    const MANIFEST: &str = r#"{"dependencies": {"a": "^1.0.0", "missing": "^1.0.0"}}"#;

    /// A failed lookup aborts the run and leaves the manifest untouched
    #[tokio::test]
    async fn test_lookup_failure_no_write() {
        let dir = create_test_dir();
        write_manifest(dir.path(), MANIFEST);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        let err = run.result.unwrap_err();

        assert!(matches!(err, AppError::Registry(RegistryError::LookupFailed { .. })));
        assert!(err.to_string().contains("missing"));
        assert_eq!(fs::read_to_string(dir.path().join("bower.json")).unwrap(), MANIFEST);
    }

    /// Cancelling a prompt aborts the run without writing
    #[tokio::test]
    async fn test_cancel_no_write() {
        let dir = create_test_dir();
        write_manifest(dir.path(), MANIFEST);
        let prompter = ScriptedPrompter {
            cancel: true,
            ..Default::default()
        };

        let registry = jquery_registry("2.0.0");
        let run = run(dir.path(), UpdateOptions::new(), registry, prompter, false).await;
        assert!(matches!(
            run.result,
            Err(AppError::Prompt(PromptError::Cancelled))
        ));
        assert_eq!(fs::read_to_string(dir.path().join("bower.json")).unwrap(), MANIFEST);
    }

    /// A missing manifest fails before anything is looked up
    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = create_test_dir();
        let registry = jquery_registry("2.0.0");

        let run = quiet_run(dir.path(), UpdateOptions::new(), Arc::clone(&registry)).await;
        assert!(run.result.unwrap_err().to_string().contains("manifest file not found"));
        assert!(registry.lookups.lock().unwrap().is_empty());
    }
}

mod registry_logging {
    use super::*;

    /// The subscription is gone once the run is over, on success and failure
    #[tokio::test]
    async fn test_subscription_detached() {
        for manifest in [
            r#"{"dependencies": {"a": "^1.0.0"}}"#,
            r#"{"dependencies": {"missing": "^1.0.0"}}"#,
        ] {
            let dir = create_test_dir();
            write_manifest(dir.path(), manifest);
            let registry = jquery_registry("2.0.0");
            let options = UpdateOptions::new()
                .with_pick_all(true)
                .with_force_latest(true);

            let _ = quiet_run(dir.path(), options, Arc::clone(&registry)).await;

            let bus = registry.seen_bus.lock().unwrap().clone().unwrap();
            assert_eq!(bus.listener_count(), 0);
        }
    }

    /// Events below the threshold stay on the hidden verbose channel
    #[tokio::test]
    async fn test_threshold_routing() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"missing": "^1.0.0"}}"#);
        let options = UpdateOptions::new().with_pick_all(true);

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        let output = run.output.contents();
        assert!(!output.contains("[resolve]"));
        assert!(output.contains("missing: bower error [lookup] - not registered"));
    }

    /// A true flag prints every event
    #[tokio::test]
    async fn test_flag_routing() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true)
            .with_log_bower_info(LogCriteria::Flag(true));

        let run = quiet_run(dir.path(), options, jquery_registry("2.0.0")).await;
        assert!(run.output.contents().contains("a: bower info [resolve] - Resolving a"));
    }

    /// Verbose output reports what the registry returned
    #[tokio::test]
    async fn test_verbose_info_lines() {
        let dir = create_test_dir();
        write_manifest(dir.path(), r#"{"dependencies": {"a": "^1.0.0"}}"#);
        let options = UpdateOptions::new()
            .with_pick_all(true)
            .with_force_latest(true);

        let registry = jquery_registry("2.0.0");
        let run = run(dir.path(), options, registry, ScriptedPrompter::default(), true).await;
        let output = run.output.contents();
        assert!(output.contains("package - latest version is 2.0.0"));
        assert!(output.contains("All packages are picked to update version."));
        assert!(output.contains("Forced latest versions for every package."));
    }
}
