use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub caption_font_size: f32,
    pub node_fill: String,
    pub node_stroke: String,
    pub conclusion_fill: String,
    pub explanation_fill: String,
    pub refutation_fill: String,
    pub text_color: String,
    pub caption_color: String,
    pub line_color: String,
    pub contradict_color: String,
    pub refute_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Georgia, \"Times New Roman\", serif".to_string(),
            font_size: 12.0,
            caption_font_size: 10.0,
            node_fill: "#FDFBF4".to_string(),
            node_stroke: "#2E2A24".to_string(),
            conclusion_fill: "#F4E3B5".to_string(),
            explanation_fill: "#E3EEF8".to_string(),
            refutation_fill: "#F8E1DE".to_string(),
            text_color: "#1F1B16".to_string(),
            caption_color: "#6B6358".to_string(),
            line_color: "#2E2A24".to_string(),
            contradict_color: "#8A3B2E".to_string(),
            refute_color: "#B0302A".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn monochrome() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            caption_font_size: 10.0,
            node_fill: "#FFFFFF".to_string(),
            node_stroke: "#000000".to_string(),
            conclusion_fill: "#E6E6E6".to_string(),
            explanation_fill: "#F2F2F2".to_string(),
            refutation_fill: "#F2F2F2".to_string(),
            text_color: "#000000".to_string(),
            caption_color: "#555555".to_string(),
            line_color: "#000000".to_string(),
            contradict_color: "#000000".to_string(),
            refute_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
