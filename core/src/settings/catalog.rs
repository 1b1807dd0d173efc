use super::types::ThemeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemePreview {
    pub bg: &'static str,
    pub fg: &'static str,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSchemeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub kind: ThemeKind,
    pub preview: SchemePreview,
}

const fn font(value: &'static str, label: &'static str) -> FontOption {
    FontOption { value, label }
}

const fn scheme(
    value: &'static str,
    label: &'static str,
    kind: ThemeKind,
    bg: &'static str,
    fg: &'static str,
    accent: &'static str,
) -> ColorSchemeOption {
    ColorSchemeOption {
        value,
        label,
        kind,
        preview: SchemePreview { bg, fg, accent },
    }
}

pub const CODE_FONTS: &[FontOption] = &[
    font("JetBrains Mono", "JetBrains Mono"),
    font("Fira Code", "Fira Code"),
    font("Cascadia Code", "Cascadia Code"),
    font("Source Code Pro", "Source Code Pro"),
    font("Consolas", "Consolas"),
    font("Monaco", "Monaco"),
    font("Menlo", "Menlo"),
];

pub const UI_FONTS: &[FontOption] = &[
    font("Noto Sans SC", "Noto Sans SC (思源黑体)"),
    font("PingFang SC", "PingFang SC (苹方)"),
    font("Microsoft YaHei", "Microsoft YaHei (微软雅黑)"),
    font("Source Han Sans SC", "Source Han Sans (思源黑体)"),
    font("HarmonyOS Sans SC", "HarmonyOS Sans"),
    font("system-ui", "系统默认"),
];

pub const COLOR_SCHEMES: &[ColorSchemeOption] = &[
    scheme("monokai", "Monokai", ThemeKind::Dark, "#272822", "#f8f8f2", "#f92672"),
    scheme("mariana", "Mariana", ThemeKind::Dark, "#303841", "#f8f8f2", "#5fb4b4"),
    scheme("one-dark", "One Dark", ThemeKind::Dark, "#282c34", "#abb2bf", "#61afef"),
    scheme("dracula", "Dracula", ThemeKind::Dark, "#282a36", "#f8f8f2", "#bd93f9"),
    scheme("nord", "Nord", ThemeKind::Dark, "#2e3440", "#d8dee9", "#88c0d0"),
    scheme("tokyo-night", "Tokyo Night", ThemeKind::Dark, "#1a1b26", "#a9b1d6", "#7aa2f7"),
    scheme("github-dark", "GitHub Dark", ThemeKind::Dark, "#0d1117", "#c9d1d9", "#58a6ff"),
    scheme("ayu-dark", "Ayu Dark", ThemeKind::Dark, "#0a0e14", "#b3b1ad", "#ffb454"),
    scheme("synthwave", "Synthwave", ThemeKind::Dark, "#262335", "#ffffff", "#ff7edb"),
    scheme("github-light", "GitHub Light", ThemeKind::Light, "#ffffff", "#24292f", "#0969da"),
    scheme("solarized-light", "Solarized Light", ThemeKind::Light, "#fdf6e3", "#657b83", "#268bd2"),
    scheme("one-light", "One Light", ThemeKind::Light, "#fafafa", "#383a42", "#4078f2"),
    scheme("ayu-light", "Ayu Light", ThemeKind::Light, "#fafafa", "#5c6166", "#ff9940"),
    scheme("quiet-light", "Quiet Light", ThemeKind::Light, "#f5f5f5", "#333333", "#4b83cd"),
];

pub fn color_scheme(value: &str) -> Option<&'static ColorSchemeOption> {
    COLOR_SCHEMES.iter().find(|s| s.value == value)
}
