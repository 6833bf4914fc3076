//! Plain-text rendering of the navigation pane and the content area.

use sailor_modules::{LoaderState, ModuleView, NavigationItem, NavigationView, UserIdentity};
use std::fmt::Write;

pub const RETRY_HINT: &str = "Type 'retry' to try again.";

/// Navigation pane. Collapsed mode keeps glyphs and names only.
pub fn navigation(view: &NavigationView, icons: bool) -> String {
    let mut out = String::new();
    let badge = if view.header.is_admin { " [admin]" } else { "" };
    let _ = writeln!(out, "== {} ==", view.header.title);
    let _ = writeln!(out, "Signed in as {}{badge}", view.header.user);

    if view.items.is_empty() {
        let _ = writeln!(out, "  (no modules available)");
    }
    for item in &view.items {
        let _ = writeln!(out, "{}", entry(item, view.collapsed, icons));
    }
    let _ = writeln!(out, "{}", entry(&view.logout, view.collapsed, icons));
    out
}

fn entry(item: &NavigationItem, collapsed: bool, icons: bool) -> String {
    let marker = if item.active { '>' } else { ' ' };
    let glyph = if icons { format!("{} ", item.glyph) } else { String::new() };
    let mut line = if collapsed {
        format!("{marker} {glyph}{}", item.name)
    } else {
        format!("{marker} {glyph}{} ({})", item.display_name, item.name)
    };
    if item.loading {
        line.push_str(" ...");
    }
    line
}

/// Content area for the current loader state.
pub fn content(state: &LoaderState, user: &UserIdentity) -> String {
    match state {
        LoaderState::Ready(loaded) => module(&loaded.render(user)),
        LoaderState::Denied { reason, .. } => {
            format!("🔒 Access Denied\n{reason}\n")
        },
        LoaderState::Failed { error, .. } if error.is_retryable() => {
            format!("⚠ {error}\n{RETRY_HINT}\n")
        },
        other => format!("{other}\n"),
    }
}

fn module(view: &ModuleView) -> String {
    let mut out = format!("# {}\n", view.title);
    if let Some(subtitle) = &view.subtitle {
        let _ = writeln!(out, "{subtitle}");
    }
    for section in &view.sections {
        let _ = writeln!(out, "\n## {}", section.heading);
        for line in &section.lines {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}
