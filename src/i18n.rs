// i18n.rs — UI strings
//
// Built-in tables for en and zh-Hans. A file at assets/i18n/<lang>.json
// (next to the executable or in the working dir) overrides individual keys.
// Lookup order: selected lang -> built-in selected lang -> en -> the key itself.
//
// Language selection:
// - CLI: --lang <code>
// - Env: SLIDE_DECK_LANG
// - Default: en

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";
const LANG_ENV: &str = "SLIDE_DECK_LANG";

pub const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];

const EN: &[(&str, &str)] = &[
    ("app.title", "Spatial Slide Deck"),
    ("menu.file", "File"),
    ("menu.exit", "Exit"),
    ("menu.view", "View"),
    ("menu.language", "Language"),
    ("view.toggle_camera", "Toggle camera (Space)"),
    ("view.fullscreen.enter", "Enter fullscreen (F11)"),
    ("view.fullscreen.exit", "Exit fullscreen (F11)"),
    ("view.show_fps", "Show FPS"),
    ("mode.perspective", "Perspective"),
    ("mode.orthographic", "Orthographic"),
    ("status.mode_prefix", "Camera:"),
    ("status.transition", "switching to {mode} {pct}%"),
    ("status.fov", "FOV: {value}°"),
    ("status.zoom", "Zoom: {value}"),
    ("status.look", "Look: {yaw}° / {pitch}°"),
    ("status.hint.perspective", "move the pointer to look around"),
    ("status.hint.orthographic", "drag to orbit, right-drag to pan, wheel or middle-drag to zoom"),
];

const ZH_HANS: &[(&str, &str)] = &[
    ("app.title", "空间幻灯片"),
    ("menu.file", "文件"),
    ("menu.exit", "退出"),
    ("menu.view", "视图"),
    ("menu.language", "语言"),
    ("view.toggle_camera", "切换相机 (Space)"),
    ("view.fullscreen.enter", "进入全屏 (F11)"),
    ("view.fullscreen.exit", "退出全屏 (F11)"),
    ("view.show_fps", "显示 FPS"),
    ("mode.perspective", "透视"),
    ("mode.orthographic", "正交"),
    ("status.mode_prefix", "相机:"),
    ("status.transition", "正在切换到{mode} {pct}%"),
    ("status.fov", "视场角: {value}°"),
    ("status.zoom", "缩放: {value}"),
    ("status.look", "视线: {yaw}° / {pitch}°"),
    ("status.hint.perspective", "移动指针环顾四周"),
    ("status.hint.orthographic", "拖动旋转，右键平移，滚轮或中键拖动缩放"),
];

#[derive(Debug, Clone)]
pub struct I18n {
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn builtin(lang: &str) -> HashMap<String, String> {
    let table: &[(&str, &str)] = match lang {
        "en" => EN,
        "zh-Hans" => ZH_HANS,
        _ => &[],
    };
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Find assets/i18n/<lang>.json by searching:
/// 1) <exe_dir>/assets/i18n/<lang>.json
/// 2) ./assets/i18n/<lang>.json
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{}.json", lang);

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join("i18n").join(&file);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join("i18n").join(&file);
    if p.exists() {
        return Some(p);
    }

    None
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let mut map = builtin(lang);
    if let Some(overrides) = find_lang_file(lang).and_then(|p| load_json_map(&p)) {
        map.extend(overrides);
    }
    map
}

/// Initialize global i18n. Safe to call multiple times; later calls replace the current language.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let map = load_lang(&lang);
    if map.is_empty() {
        log::warn!("no strings for language `{}`, using {}", lang, FALLBACK_LANG);
    }
    let fallback_map = if lang == FALLBACK_LANG {
        map.clone()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else if I18N.set(RwLock::new(i)).is_err() {
        log::debug!("i18n initialized concurrently");
    }
}

fn get_locked() -> Option<std::sync::RwLockReadGuard<'static, I18n>> {
    I18N.get().and_then(|l| l.read().ok())
}

/// Get localized text by key. If key missing, returns key itself.
pub fn tr(key: &str) -> String {
    let Some(i) = get_locked() else {
        return builtin(FALLBACK_LANG)
            .remove(key)
            .unwrap_or_else(|| key.to_string());
    };

    if let Some(v) = i.map.get(key) {
        return v.clone();
    }
    if let Some(v) = i.fallback_map.get(key) {
        return v.clone();
    }
    key.to_string()
}

/// Get localized text and substitute `{name}` placeholders.
/// Any placeholder not provided is kept as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(tr(key), args)
}

fn substitute(mut s: String, args: &[(&str, String)]) -> String {
    for (k, v) in args {
        let placeholder = format!("{{{}}}", k);
        s = s.replace(&placeholder, v);
    }
    s
}

fn lang_from_args(args: impl Iterator<Item = String>) -> Option<String> {
    let mut it = args;
    while let Some(a) = it.next() {
        if a == "--lang" {
            return it.next();
        }
    }
    None
}

/// Choose language from CLI/env.
pub fn resolve_lang_from_args() -> String {
    if let Some(v) = lang_from_args(std::env::args()) {
        return v;
    }

    if let Ok(v) = std::env::var(LANG_ENV) {
        if !v.trim().is_empty() {
            return v;
        }
    }

    FALLBACK_LANG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_the_same_keys() {
        let en = builtin("en");
        let zh = builtin("zh-Hans");
        assert_eq!(en.len(), EN.len());
        for k in en.keys() {
            assert!(zh.contains_key(k), "zh-Hans is missing {}", k);
        }
        assert!(builtin("xx").is_empty());
    }

    #[test]
    fn placeholders_are_substituted() {
        let s = substitute(
            "switching to {mode} {pct}%".to_string(),
            &[("mode", "Orthographic".to_string()), ("pct", "40".to_string())],
        );
        assert_eq!(s, "switching to Orthographic 40%");
        assert_eq!(substitute("{missing}".to_string(), &[]), "{missing}");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        assert_eq!(tr("no.such.key"), "no.such.key");
    }

    #[test]
    fn lang_flag_is_read_from_args() {
        let args = ["deck", "--lang", "zh-Hans"].map(String::from);
        assert_eq!(lang_from_args(args.into_iter()), Some("zh-Hans".to_string()));
        assert_eq!(lang_from_args(["deck", "--lang"].map(String::from).into_iter()), None);
    }
}
