//! End-to-end coverage of the load → resolve → expand → apply pipeline.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use lumen_theme::{component_token_path, Styleable, ThemeConfig, ThemeManager, Value};
use lumen_tokens::TokenFile;
use pretty_assertions::assert_eq;

const COMMON: &str = r##"
BrandStroke: "#123456"
CornerRadius: 4px

Default:
  ButtonForeground: "#000000"
  ButtonBackground: "#EEEEEE"

Dark:
  ButtonForeground: "#FFFFFF"
  ButtonBackground: "#333333"
"##;

const BUTTON_TOKENS: &str = r#"
ButtonForeground: ButtonForeground
ButtonBackground: ButtonBackground
ButtonBorder: "{BrandStroke}"
ButtonShadow: null
"#;

const BUTTON_TEMPLATE: &str = "color: ButtonForeground;\nbackground: ButtonBackground;\n";

struct FakeButton {
    applied: Mutex<Vec<String>>,
}

impl FakeButton {
    fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
        }
    }

    fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }
}

impl Styleable for FakeButton {
    fn set_style_sheet(&self, text: &str) -> anyhow::Result<()> {
        self.applied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    components_root: PathBuf,
    config: ThemeConfig,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let components_root = dir.path().join("components");
    let button_dir = components_root.join("controls/button");
    fs::create_dir_all(&button_dir).unwrap();
    fs::write(button_dir.join("button.yaml"), BUTTON_TOKENS).unwrap();
    fs::write(button_dir.join("button.qss"), BUTTON_TEMPLATE).unwrap();

    let common = dir.path().join("common.yaml");
    fs::write(&common, COMMON).unwrap();

    let config = ThemeConfig::new(&components_root, &common);
    Fixture {
        _dir: dir,
        components_root,
        config,
    }
}

#[test]
fn resolved_value_follows_active_theme() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let value = manager
        .resolved_value("ButtonForeground", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#000000"));

    manager.set_theme("Dark");
    let value = manager
        .resolved_value("ButtonForeground", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#FFFFFF"));
}

#[test]
fn reference_tokens_resolve_against_common_document() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let value = manager
        .resolved_value("ButtonBorder", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#123456"));
}

#[test]
fn register_applies_expanded_template_and_theme_switch_restyles() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let button = Arc::new(FakeButton::new());
    let styleable: Arc<dyn Styleable> = button.clone();
    manager.register(&styleable, "controls", "button").unwrap();

    let applied = button.applied();
    assert_eq!(
        applied,
        vec!["color: #000000;\nbackground: #EEEEEE;\n".to_string()]
    );

    manager.set_theme("Dark");
    let applied = button.applied();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[1], "color: #FFFFFF;\nbackground: #333333;\n");
}

#[test]
fn repeated_theme_set_is_a_no_op() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let button = Arc::new(FakeButton::new());
    let styleable: Arc<dyn Styleable> = button.clone();
    manager.register(&styleable, "controls", "button").unwrap();
    assert_eq!(button.applied().len(), 1);

    manager.set_theme("Default");
    assert_eq!(button.applied().len(), 1, "unchanged theme must not restyle");
}

#[test]
fn resolved_cache_survives_file_changes_until_theme_switch() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let value = manager
        .resolved_value("ButtonBorder", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#123456"));

    // Rewrite the component document on disk and push it through the file
    // cache. The manager's resolved cache must still answer from memory.
    let token_path = component_token_path(&fixture.components_root, "controls", "button");
    fs::write(&token_path, "ButtonBorder: \"#ABCDEF\"\n").unwrap();
    TokenFile::force_reload(&token_path).unwrap();

    let value = manager
        .resolved_value("ButtonBorder", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#123456"));

    // A theme switch invalidates resolution, so the rewrite becomes visible.
    manager.set_theme("Dark");
    let value = manager
        .resolved_value("ButtonBorder", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::from("#ABCDEF"));
}

#[test]
fn default_value_substitutes_exactly_one_level() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("raw.yaml");
    fs::write(
        &raw_path,
        "Stroke: BrandStroke\nDotted: Default.ButtonForeground\nLiteral: 12px\n",
    )
    .unwrap();

    // A raw string naming a top-level common entry is substituted once.
    let value = manager.default_value(&raw_path, "Stroke").unwrap();
    assert_eq!(value, Value::from("#123456"));

    // Dotted paths are deliberately NOT walked here, unlike full component
    // resolution. The literal survives.
    let value = manager.default_value(&raw_path, "Dotted").unwrap();
    assert_eq!(value, Value::from("Default.ButtonForeground"));

    let value = manager.default_value(&raw_path, "Literal").unwrap();
    assert_eq!(value, Value::from("12px"));

    let value = manager.default_value(&raw_path, "Missing").unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn null_component_entry_falls_back_to_raw_default() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    // ButtonShadow is null in both the resolved map and the raw document.
    let value = manager
        .resolved_value("ButtonShadow", "controls", "button")
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn dropped_widgets_are_skipped_on_theme_switch() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    let kept = Arc::new(FakeButton::new());
    let kept_styleable: Arc<dyn Styleable> = kept.clone();
    manager.register(&kept_styleable, "controls", "button").unwrap();

    {
        let dropped = Arc::new(FakeButton::new());
        let dropped_styleable: Arc<dyn Styleable> = dropped.clone();
        manager
            .register(&dropped_styleable, "controls", "button")
            .unwrap();
        assert_eq!(manager.registry().len(), 2);
    }

    // Both strong handles to the second widget are gone; the switch must
    // neither fail nor resurrect it.
    manager.set_theme("Dark");
    assert_eq!(manager.registry().len(), 1);
    assert_eq!(kept.applied().len(), 2);
}

#[test]
fn missing_component_document_resolves_to_defaults_only() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    // No slider.yaml exists: the load succeeds with an empty document and
    // every lookup falls through to the (null) default.
    let value = manager
        .resolved_value("SliderFill", "controls", "slider")
        .unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn widget_without_template_keeps_previous_style() {
    let fixture = fixture();
    let manager = ThemeManager::new(fixture.config.clone()).unwrap();

    // Break the template after first application; the reapply fails and is
    // logged, the widget keeps what it has.
    let button = Arc::new(FakeButton::new());
    let styleable: Arc<dyn Styleable> = button.clone();
    manager.register(&styleable, "controls", "button").unwrap();
    assert_eq!(button.applied().len(), 1);

    let template = fixture
        .components_root
        .join("controls/button/button.qss");
    fs::remove_file(&template).unwrap();
    manager.engine().clear_cache();

    manager.set_theme("Dark");
    assert_eq!(button.applied().len(), 1, "failed reapply must not push text");
}
