//! Window queries against the running Wayland compositor (Hyprland, Niri)

use serde::Deserialize;
use std::collections::HashSet;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Window {
    pub id: String,
    pub title: String,
    pub app_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorType {
    Hyprland,
    Niri,
    Unknown,
}

impl CompositorType {
    fn from_env(hyprland: bool, niri: bool) -> Self {
        if hyprland {
            CompositorType::Hyprland
        } else if niri {
            CompositorType::Niri
        } else {
            CompositorType::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    compositor_type: CompositorType,
}

impl Compositor {
    pub fn detect() -> Self {
        let compositor_type = CompositorType::from_env(
            std::env::var("HYPRLAND_INSTANCE_SIGNATURE").is_ok(),
            std::env::var("NIRI_SOCKET").is_ok(),
        );
        info!("Detected compositor: {:?}", compositor_type);
        Self { compositor_type }
    }

    #[must_use]
    pub fn compositor_type(&self) -> CompositorType {
        self.compositor_type
    }

    pub fn list_windows(&self) -> Vec<Window> {
        match self.compositor_type {
            CompositorType::Hyprland => hyprland_list_windows(),
            CompositorType::Niri => niri_list_windows(),
            CompositorType::Unknown => Vec::new(),
        }
    }

    /// Lowercased app ids of every open window.
    pub fn running_app_ids(&self) -> HashSet<String> {
        self.list_windows()
            .into_iter()
            .map(|w| w.app_id.to_lowercase())
            .collect()
    }

    /// Focus the first window belonging to `app_id`. Returns false if the app
    /// has no window or the compositor refused.
    pub fn focus_app(&self, app_id: &str) -> bool {
        let Some(window) = self
            .list_windows()
            .into_iter()
            .find(|w| w.app_id.eq_ignore_ascii_case(app_id))
        else {
            return false;
        };

        debug!("Focusing window {} ({})", window.id, window.title);
        match self.compositor_type {
            CompositorType::Hyprland => run_quiet(
                "hyprctl",
                &["dispatch", "focuswindow", &format!("address:{}", window.id)],
            ),
            CompositorType::Niri => run_quiet(
                "niri",
                &["msg", "action", "focus-window", "--id", &window.id],
            ),
            CompositorType::Unknown => false,
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::detect()
    }
}

fn run_quiet(program: &str, args: &[&str]) -> bool {
    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    matches!(result, Ok(status) if status.success())
}

fn query_json(program: &str, args: &[&str]) -> Option<Vec<u8>> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    let Ok(output) = output else {
        warn!("Failed to run {program}");
        return None;
    };

    if !output.status.success() {
        warn!("{program} failed with status: {}", output.status);
        return None;
    }

    Some(output.stdout)
}

fn parse_hyprland_clients(raw: &[u8]) -> Option<Vec<Window>> {
    #[derive(Deserialize)]
    struct HyprlandClient {
        address: String,
        title: String,
        class: String,
    }

    let clients = serde_json::from_slice::<Vec<HyprlandClient>>(raw).ok()?;
    Some(
        clients
            .into_iter()
            .map(|c| Window {
                id: c.address,
                title: c.title,
                app_id: c.class,
            })
            .collect(),
    )
}

fn parse_niri_windows(raw: &[u8]) -> Option<Vec<Window>> {
    #[derive(Deserialize)]
    struct NiriWindow {
        id: u64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        app_id: Option<String>,
    }

    let windows = serde_json::from_slice::<Vec<NiriWindow>>(raw).ok()?;
    Some(
        windows
            .into_iter()
            .map(|w| Window {
                id: w.id.to_string(),
                title: w.title.unwrap_or_default(),
                app_id: w.app_id.unwrap_or_default(),
            })
            .collect(),
    )
}

fn hyprland_list_windows() -> Vec<Window> {
    let Some(raw) = query_json("hyprctl", &["clients", "-j"]) else {
        return Vec::new();
    };
    parse_hyprland_clients(&raw).unwrap_or_else(|| {
        warn!("Failed to parse hyprctl clients output");
        Vec::new()
    })
}

fn niri_list_windows() -> Vec<Window> {
    let Some(raw) = query_json("niri", &["msg", "--json", "windows"]) else {
        return Vec::new();
    };
    parse_niri_windows(&raw).unwrap_or_else(|| {
        warn!("Failed to parse niri msg windows output");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_env() {
        assert_eq!(CompositorType::from_env(true, true), CompositorType::Hyprland);
        assert_eq!(CompositorType::from_env(false, true), CompositorType::Niri);
        assert_eq!(CompositorType::from_env(false, false), CompositorType::Unknown);
    }

    #[test]
    fn test_unknown_compositor_has_no_windows() {
        let compositor = Compositor {
            compositor_type: CompositorType::Unknown,
        };
        assert!(compositor.running_app_ids().is_empty());
        assert!(!compositor.focus_app("kodi"));
    }

    #[test]
    fn test_parse_hyprland_clients() {
        let raw = br#"[{"address": "0x55", "title": "Kodi", "class": "Kodi", "pid": 4}]"#;
        let windows = parse_hyprland_clients(raw).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].id, "0x55");
        assert_eq!(windows[0].app_id, "Kodi");
    }

    #[test]
    fn test_parse_niri_windows_tolerates_missing_app_id() {
        let raw = br#"[{"id": 7, "title": "x", "app_id": null}, {"id": 8, "app_id": "steam"}]"#;
        let windows = parse_niri_windows(raw).unwrap();
        assert_eq!(windows[0].app_id, "");
        assert_eq!(windows[1].id, "8");
        assert_eq!(windows[1].title, "");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_hyprland_clients(b"nope").is_none());
        assert!(parse_niri_windows(b"{}").is_none());
    }
}
