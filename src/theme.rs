use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_fill: String,
    pub label_border: String,
    pub label_text_color: String,
    pub keepout_fill: String,
    pub keepout_border: String,
    pub anchor_color: String,
    pub overlap_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            label_fill: "#ECECFF".to_string(),
            label_border: "#9370DB".to_string(),
            label_text_color: "#333333".to_string(),
            keepout_fill: "#FFDEDE".to_string(),
            keepout_border: "#CC3333".to_string(),
            anchor_color: "#333333".to_string(),
            overlap_color: "#FF6600".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            label_fill: "#F8FAFF".to_string(),
            label_border: "#C7D2E5".to_string(),
            label_text_color: "#1C2430".to_string(),
            keepout_fill: "#FDECEC".to_string(),
            keepout_border: "#E07A7A".to_string(),
            anchor_color: "#7A8AA6".to_string(),
            overlap_color: "#F59E0B".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
