use std::path::{Path, PathBuf};

use bookloc::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// An unpacked source tree plus an output root inside one temp dir
struct Fixture {
    _dir: TempDir,
    source: PathBuf,
    layout: WorkspaceLayout,
    config: PipelineConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let source = dir.path().join("unpacked");
        let mut layout = WorkspaceLayout::new(dir.path().join("out"));
        layout.exclude_names = dir.path().join("exclude_names.json");

        let fixture = Self {
            _dir: dir,
            source,
            layout,
            config: PipelineConfig::default(),
        };
        fixture.write_source(
            "Adventure/Master.chapter.json",
            &json!({
                "settingList": [
                    { "name": "Adventure:Flag", "rows": [ { "strings": ["Key", "npc001", "Wrong"] } ] },
                    { "name": "Adventure:Character", "rows": [
                        { "strings": ["Key", "Id", "Name"] },
                        { "strings": ["", "npc001", "Alice"] },
                        { "strings": ["", "村人", "村人A"] }
                    ] }
                ]
            }),
        );
        fixture
    }

    fn write_source(&self, relative: &str, value: &Value) {
        write(&self.source.join(relative), value);
    }

    fn write_translated(&self, relative: &str, value: &Value) {
        write(&self.layout.translated_dir().join(relative), value);
    }

    fn book(&self, relative: &str, grids: Value) {
        self.write_source(relative, &json!({ "importGridList": grids }));
    }

    fn extract(&self, force: bool) -> ExtractResult {
        let options = ExtractOptions {
            source: self.source.clone(),
            force,
            exclude: None,
        };
        let gate = TranslatedTree::new(self.layout.translated_dir());
        extract(&options, &self.config, &self.layout, &gate, &no_progress).unwrap()
    }

    fn map(&self, force: bool) -> bookloc::Result<MapResult> {
        let gate = TranslatedTree::new(self.layout.translated_dir());
        map(&MapOptions { force }, &self.config, &self.layout, &gate, &no_progress)
    }

    fn package(&self) -> bookloc::Result<PackageResult> {
        package(&PackageOptions::new(&self.source), &self.config, &self.layout, &no_progress)
    }
}

fn write(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn scene_grid(name: &str, rows: &[[&str; 2]]) -> Value {
    let mut all = vec![json!({ "strings": ["Arg1", "Text"] })];
    all.extend(rows.iter().map(|r| json!({ "strings": r })));
    json!({ "name": name, "rows": all })
}

#[test]
fn test_scene_round_trip() {
    let fx = Fixture::new();
    fx.book(
        "Chapter1/CharaScenario/Scene1.book.json",
        json!([scene_grid("Scene1:A", &[["npc001", "Hello"]])]),
    );

    let result = fx.extract(false);
    assert_eq!(result.books_scanned, 1);
    assert_eq!(result.extracted, 1);
    assert_eq!(result.characters, 2);

    let extracted = fx
        .layout
        .for_translation_dir()
        .join("Chapter1/CharaScenario/Scene1.book/A.json");
    assert_eq!(read(&extracted), json!([{ "name": "npc001", "message": "Hello" }]));

    fx.write_translated(
        "Chapter1/CharaScenario/Scene1.book/A.json",
        &json!([{ "name": "npc001", "message": "你好" }]),
    );
    let result = fx.package().unwrap();
    assert_eq!(result.packaged, 1);
    assert_eq!(result.rows_translated, 1);
    assert!(result.warnings.is_empty());

    let output = fx.layout.plugin_data_dir().join("Chapter1/Scene1.chapter.json");
    assert_eq!(
        read(&output),
        json!({ "Scene1:A": [["Arg1", "Text"], ["npc001", "你好"]] })
    );

    // The template on disk is untouched
    let original = read(&fx.source.join("Chapter1/CharaScenario/Scene1.book.json"));
    assert_eq!(original["importGridList"][0]["rows"][1]["strings"][1], json!("Hello"));
}

#[test]
fn test_extraction_is_idempotent() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([
            scene_grid("Scene1:A", &[["npc001", "Hello"], ["アリス", "やあ"]]),
            scene_grid("Scene1:B", &[["村人", "Bye"]]),
        ]),
    );

    let first = fx.extract(false);
    let a = fx.layout.for_translation_dir().join("Scene1.book/A.json");
    let b = fx.layout.for_translation_dir().join("Scene1.book/B.json");
    let snapshot = (read(&a), read(&b), read(&fx.layout.names_file()));

    let second = fx.extract(false);
    assert_eq!(first.extracted, second.extracted);
    assert_eq!(second.names_added, 0);
    assert_eq!(snapshot, (read(&a), read(&b), read(&fx.layout.names_file())));
}

#[test]
fn test_skip_on_existing_translation() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([
            scene_grid("Scene1:A", &[["npc001", "Hello"]]),
            scene_grid("Scene1:B", &[["npc001", "Bye"]]),
        ]),
    );
    fx.write_translated("Scene1.book/A.json", &json!([{ "name": "npc001", "message": "你好" }]));

    let result = fx.extract(false);
    assert_eq!(result.extracted, 1);
    assert_eq!(result.skipped, 1);
    assert!(!fx.layout.for_translation_dir().join("Scene1.book/A.json").exists());
    assert!(fx.layout.for_translation_dir().join("Scene1.book/B.json").exists());

    let forced = fx.extract(true);
    assert_eq!(forced.extracted, 2);
    assert_eq!(forced.skipped, 0);
    assert!(fx.layout.for_translation_dir().join("Scene1.book/A.json").exists());
}

#[test]
fn test_name_registry_is_append_only() {
    let fx = Fixture::new();
    write(&fx.layout.exclude_names, &json!(["ボブ"]));
    fx.book(
        "Scene1.book.json",
        json!([scene_grid(
            "Scene1:A",
            &[["npc001", "Hello"], ["アリス", "やあ"], ["ボブ", "よう"], ["村人", "Hi"]]
        )]),
    );

    let first = fx.extract(false);
    assert_eq!(first.names_added, 2);
    // Non-ASCII ids only; 村人 resolves through the character table
    assert_eq!(
        read(&fx.layout.names_file()),
        json!({ "アリス": "アリス", "村人A": "村人A" })
    );

    // A translator edits a value, and a new speaker shows up
    write(&fx.layout.names_file(), &json!({ "アリス": "Alice", "村人A": "村人A" }));
    fx.book(
        "Scene2.book.json",
        json!([scene_grid("Scene2:A", &[["キャロル", "こんばんは"], ["アリス", "また"]])]),
    );

    let second = fx.extract(false);
    assert_eq!(second.names_added, 1);
    assert_eq!(second.names_total, 3);
    assert_eq!(
        read(&fx.layout.names_file()),
        json!({ "アリス": "Alice", "村人A": "村人A", "キャロル": "キャロル" })
    );
}

#[test]
fn test_grid_without_columns_is_ignored() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([
            { "name": "Scene1:A", "rows": [
                { "strings": ["Arg1", "Message"] },
                { "strings": ["npc001", "Hello"] }
            ] },
            { "name": "Scene1:Empty", "rows": [] }
        ]),
    );

    let result = fx.extract(false);
    assert_eq!(result.extracted, 0);
    assert_eq!(result.grids_skipped, 2);
    assert!(!fx.layout.for_translation_dir().join("Scene1.book/A.json").exists());

    fx.write_translated("Scene1.book/A.json", &json!([{ "name": "npc001", "message": "你好" }]));
    let result = fx.package().unwrap();
    assert_eq!(result.packaged, 0);
    assert_eq!(result.untranslated, 1);
    assert_eq!(result.grids_skipped, 2);
    assert!(!fx.layout.plugin_data_dir().join("Scene1.chapter.json").exists());
}

#[test]
fn test_grid_without_speaker_column_is_not_packaged() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([{ "name": "Scene1:A", "rows": [
            { "strings": ["Text"] },
            { "strings": ["Hello"] }
        ] }]),
    );
    fx.write_translated("Scene1.book/A.json", &json!([{ "message": "你好" }]));

    let result = fx.package().unwrap();
    assert_eq!(result.packaged, 0);
    assert_eq!(result.rows_translated, 0);
    assert_eq!(result.grids_skipped, 1);
    assert!(!fx.layout.plugin_data_dir().join("Scene1.chapter.json").exists());
}

#[test]
fn test_unnamed_setting_grid_does_not_block_extraction() {
    let fx = Fixture::new();
    fx.write_source(
        "Adventure/Master.chapter.json",
        &json!({
            "settingList": [
                { "rows": [] },
                { "name": "Adventure:Character", "rows": [
                    { "strings": ["Key", "Id", "Name"] },
                    { "strings": ["", "npc001", "Alice"] }
                ] }
            ]
        }),
    );
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["npc001", "Hello"]])]));

    let result = fx.extract(false);
    assert_eq!(result.characters, 1);
    assert_eq!(result.extracted, 1);
}

#[test]
fn test_positional_round_trip_skips_empty_rows() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([scene_grid(
            "Scene1:A",
            &[["npc001", "one"], ["", ""], ["npc001", "two"], ["村人", "three"]]
        )]),
    );
    fx.extract(false);

    let extracted = read(&fx.layout.for_translation_dir().join("Scene1.book/A.json"));
    let mut translated = extracted.clone();
    for (i, entry) in translated.as_array_mut().unwrap().iter_mut().enumerate() {
        entry["message"] = json!(format!("translated {i}"));
    }
    fx.write_translated("Scene1.book/A.json", &translated);

    let result = fx.package().unwrap();
    assert_eq!(result.rows_translated, 3);
    let output = read(&fx.layout.plugin_data_dir().join("Scene1.chapter.json"));
    assert_eq!(
        output["Scene1:A"],
        json!([
            ["Arg1", "Text"],
            ["npc001", "translated 0"],
            ["", ""],
            ["npc001", "translated 1"],
            ["村人", "translated 2"]
        ])
    );
}

#[test]
fn test_shortfall_applies_prefix_and_warns_once() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([scene_grid("Scene1:A", &[["a", "one"], ["b", "two"], ["c", "three"]])]),
    );
    fx.write_translated(
        "Scene1.book/A.json",
        &json!([{ "name": "a", "message": "uno" }, { "name": "b", "message": "dos" }]),
    );

    let result = fx.package().unwrap();
    assert_eq!(result.packaged, 1);
    assert_eq!(result.rows_translated, 2);
    assert_eq!(
        result.warnings,
        vec![PackageWarning::TranslationShortfall {
            document: PathBuf::from("Scene1.book.json"),
            grid: "Scene1:A".to_string(),
            expected: 3,
            available: 2,
        }]
    );

    let output = read(&fx.layout.plugin_data_dir().join("Scene1.chapter.json"));
    assert_eq!(
        output["Scene1:A"],
        json!([["Arg1", "Text"], ["a", "uno"], ["b", "dos"], ["c", "three"]])
    );
}

#[test]
fn test_surplus_entries_flag_misalignment() {
    let fx = Fixture::new();
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["a", "one"]])]));
    fx.write_translated(
        "Scene1.book/A.json",
        &json!([{ "name": "a", "message": "uno" }, { "name": "b", "message": "dos" }]),
    );

    let result = fx.package().unwrap();
    assert_eq!(result.rows_translated, 1);
    assert!(matches!(
        result.warnings.as_slice(),
        [PackageWarning::TranslationSurplus { expected: 1, available: 2, .. }]
    ));
}

#[test]
fn test_package_rebuilds_output_tree() {
    let fx = Fixture::new();
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["a", "one"]])]));
    let stale = fx.layout.plugin_data_dir().join("Stale.chapter.json");
    write(&stale, &json!({}));
    std::fs::create_dir_all(fx.layout.translated_dir()).unwrap();

    let result = fx.package().unwrap();
    assert_eq!(result.packaged, 0);
    assert!(!stale.exists());
    assert!(fx.layout.plugin_data_dir().is_dir());
}

#[test]
fn test_package_requires_translated_tree() {
    let fx = Fixture::new();
    let err = fx.package().unwrap_err();
    assert!(matches!(err, Error::NotFound { path } if path == fx.layout.translated_dir()));
}

#[test]
fn test_malformed_book_is_skipped() {
    let fx = Fixture::new();
    std::fs::write(fx.source.join("Broken.book.json"), "{ nope").unwrap();
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["a", "one"]])]));

    let result = fx.extract(false);
    assert_eq!(result.books_scanned, 2);
    assert_eq!(result.books_failed, 1);
    assert_eq!(result.extracted, 1);
    assert_eq!(result.failures.len(), 1);
}

#[test]
fn test_missing_master_is_fatal() {
    let fx = Fixture::new();
    std::fs::remove_file(fx.source.join("Adventure/Master.chapter.json")).unwrap();

    let gate = TranslatedTree::new(fx.layout.translated_dir());
    let err = extract(
        &ExtractOptions::new(&fx.source),
        &fx.config,
        &fx.layout,
        &gate,
        &no_progress,
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn test_force_keeps_output_when_master_is_broken() {
    let fx = Fixture::new();
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["npc001", "Hello"]])]));
    fx.extract(false);
    let extracted = fx.layout.for_translation_dir().join("Scene1.book/A.json");
    assert!(extracted.exists());

    std::fs::write(fx.source.join("Adventure/Master.chapter.json"), "{ nope").unwrap();
    let options = ExtractOptions {
        source: fx.source.clone(),
        force: true,
        exclude: None,
    };
    let gate = TranslatedTree::new(fx.layout.translated_dir());
    let err = extract(&options, &fx.config, &fx.layout, &gate, &no_progress).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { .. }));
    assert!(extracted.exists());
}

#[test]
fn test_map_requires_extraction() {
    let fx = Fixture::new();
    let err = fx.map(false).unwrap_err();
    assert!(matches!(err, Error::MissingPrerequisite { .. }));
}

#[test]
fn test_map_resolves_names_and_respects_gate() {
    let fx = Fixture::new();
    fx.book(
        "Scene1.book.json",
        json!([
            scene_grid("Scene1:A", &[["npc001", "Hello"], ["npc404", "Who?"]]),
            scene_grid("Scene1:B", &[["村人", "Bye"]]),
        ]),
    );
    fx.extract(false);
    fx.write_translated("Scene1.book/B.json", &json!([{ "name": "村人A", "message": "再见" }]));

    let result = fx.map(false).unwrap();
    assert_eq!(result.mapped, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(
        read(&fx.layout.ready_dir().join("Scene1.book/A.json")),
        json!([
            { "name": "Alice", "message": "Hello" },
            { "name": "npc404", "message": "Who?" }
        ])
    );
    assert!(!fx.layout.ready_dir().join("Scene1.book/B.json").exists());

    let forced = fx.map(true).unwrap();
    assert_eq!(forced.mapped, 2);
    assert_eq!(
        read(&fx.layout.ready_dir().join("Scene1.book/B.json")),
        json!([{ "name": "村人A", "message": "Bye" }])
    );
}

#[test]
fn test_map_strict_keys_rejects_file() {
    let mut fx = Fixture::new();
    fx.book("Scene1.book.json", json!([scene_grid("Scene1:A", &[["npc001", "Hello"]])]));
    fx.extract(false);
    write(
        &fx.layout.for_translation_dir().join("Scene1.book/A.json"),
        &json!([{ "message": "Hello" }]),
    );

    let lenient = fx.map(false).unwrap();
    assert_eq!(lenient.mapped, 1);
    assert_eq!(
        read(&fx.layout.ready_dir().join("Scene1.book/A.json")),
        json!([{ "name": "", "message": "Hello" }])
    );

    fx.config.strict_dialogue_keys = true;
    let strict = fx.map(true).unwrap();
    assert_eq!(strict.mapped, 0);
    assert_eq!(strict.failed, 1);
}
