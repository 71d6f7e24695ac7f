use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    /// Tree separation between two nodes sharing a parent.
    pub sibling_separation: f32,
    /// Tree separation between nodes under different parents.
    pub cousin_separation: f32,
    pub explain_offset: f32,
    pub explain_stagger: f32,
    pub refute_offset: f32,
    pub refute_spacing: f32,
    pub descendant_offset_x: f32,
    pub descendant_offset_y: f32,
    pub descendant_spread: f32,
    pub point_tolerance: f32,
    pub band_tolerance: f32,
    pub global_tolerance: f32,
    pub nudge: f32,
    /// Height of one discretised band when tracking occupied y-levels.
    pub level_unit: f32,
    pub max_nudges: usize,
    pub node_radius: f32,
    pub label_line_height: f32,
    pub max_label_width_chars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_top: 50.0,
            margin_right: 160.0,
            margin_bottom: 60.0,
            margin_left: 160.0,
            sibling_separation: 1.0,
            cousin_separation: 1.25,
            explain_offset: 150.0,
            explain_stagger: 60.0,
            refute_offset: 150.0,
            refute_spacing: 120.0,
            descendant_offset_x: 80.0,
            descendant_offset_y: 80.0,
            descendant_spread: 60.0,
            point_tolerance: 10.0,
            band_tolerance: 100.0,
            global_tolerance: 50.0,
            nudge: 20.0,
            level_unit: 40.0,
            max_nudges: 200,
            node_radius: 20.0,
            label_line_height: 1.2,
            max_label_width_chars: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub no_data_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            background: "#FFFFFF".to_string(),
            no_data_message: "No data to display".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    caption_font_size: Option<f32>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    conclusion_fill: Option<String>,
    explanation_fill: Option<String>,
    refutation_fill: Option<String>,
    text_color: Option<String>,
    caption_color: Option<String>,
    line_color: Option<String>,
    contradict_color: Option<String>,
    refute_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    margin_top: Option<f32>,
    margin_right: Option<f32>,
    margin_bottom: Option<f32>,
    margin_left: Option<f32>,
    sibling_separation: Option<f32>,
    cousin_separation: Option<f32>,
    explain_offset: Option<f32>,
    explain_stagger: Option<f32>,
    refute_offset: Option<f32>,
    refute_spacing: Option<f32>,
    descendant_offset_x: Option<f32>,
    descendant_offset_y: Option<f32>,
    descendant_spread: Option<f32>,
    point_tolerance: Option<f32>,
    band_tolerance: Option<f32>,
    global_tolerance: Option<f32>,
    nudge: Option<f32>,
    level_unit: Option<f32>,
    max_nudges: Option<usize>,
    node_radius: Option<f32>,
    label_line_height: Option<f32>,
    max_label_width_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    no_data_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    match parsed.theme.as_deref() {
        Some("monochrome") => config.theme = Theme::monochrome(),
        Some("classic") | Some("default") => config.theme = Theme::classic(),
        Some(other) => {
            tracing::warn!(theme = other, "unknown theme name, keeping default");
        }
        None => {}
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.caption_font_size {
            config.theme.caption_font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.conclusion_fill {
            config.theme.conclusion_fill = v;
        }
        if let Some(v) = vars.explanation_fill {
            config.theme.explanation_fill = v;
        }
        if let Some(v) = vars.refutation_fill {
            config.theme.refutation_fill = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.caption_color {
            config.theme.caption_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.contradict_color {
            config.theme.contradict_color = v;
        }
        if let Some(v) = vars.refute_color {
            config.theme.refute_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.margin_top {
            target.margin_top = v;
        }
        if let Some(v) = layout.margin_right {
            target.margin_right = v;
        }
        if let Some(v) = layout.margin_bottom {
            target.margin_bottom = v;
        }
        if let Some(v) = layout.margin_left {
            target.margin_left = v;
        }
        if let Some(v) = layout.sibling_separation {
            target.sibling_separation = v;
        }
        if let Some(v) = layout.cousin_separation {
            target.cousin_separation = v;
        }
        if let Some(v) = layout.explain_offset {
            target.explain_offset = v;
        }
        if let Some(v) = layout.explain_stagger {
            target.explain_stagger = v;
        }
        if let Some(v) = layout.refute_offset {
            target.refute_offset = v;
        }
        if let Some(v) = layout.refute_spacing {
            target.refute_spacing = v;
        }
        if let Some(v) = layout.descendant_offset_x {
            target.descendant_offset_x = v;
        }
        if let Some(v) = layout.descendant_offset_y {
            target.descendant_offset_y = v;
        }
        if let Some(v) = layout.descendant_spread {
            target.descendant_spread = v;
        }
        if let Some(v) = layout.point_tolerance {
            target.point_tolerance = v;
        }
        if let Some(v) = layout.band_tolerance {
            target.band_tolerance = v;
        }
        if let Some(v) = layout.global_tolerance {
            target.global_tolerance = v;
        }
        if let Some(v) = layout.nudge {
            target.nudge = v;
        }
        if let Some(v) = layout.level_unit {
            target.level_unit = v;
        }
        if let Some(v) = layout.max_nudges {
            target.max_nudges = v;
        }
        if let Some(v) = layout.node_radius {
            target.node_radius = v;
        }
        if let Some(v) = layout.label_line_height {
            target.label_line_height = v;
        }
        if let Some(v) = layout.max_label_width_chars {
            target.max_label_width_chars = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.no_data_message {
            config.render.no_data_message = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
