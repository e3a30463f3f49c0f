//! Register a few console-backed widgets against the bundled resources and
//! flip the active theme.
//!
//! Run with `cargo run -p lumen_theme --example theme_switch`.

use std::path::Path;
use std::sync::Arc;

use lumen_theme::{StyleKind, Styleable, ThemeConfig, ThemeManager};

struct ConsoleWidget {
    name: &'static str,
}

impl Styleable for ConsoleWidget {
    fn set_style_sheet(&self, text: &str) -> anyhow::Result<()> {
        println!("--- {} ---\n{text}", self.name);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    ThemeManager::init(ThemeConfig::new(
        root.join("components"),
        root.join("resources/common_theme_resources.yaml"),
    ))?;
    let manager = ThemeManager::get();

    let button: Arc<dyn Styleable> = Arc::new(ConsoleWidget { name: "button" });
    let check_box: Arc<dyn Styleable> = Arc::new(ConsoleWidget { name: "check_box" });
    StyleKind::Button.apply(manager, &button)?;
    StyleKind::CheckBox.apply(manager, &check_box)?;

    println!("\nswitching to Dark...\n");
    manager.set_theme("Dark");

    let foreground = StyleKind::Button.resolved_value(manager, "ButtonForeground")?;
    println!("ButtonForeground under Dark: {foreground:?}");
    Ok(())
}
