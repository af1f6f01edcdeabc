use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use dsarush::highlight::SyntaxClass;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_pending: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
    pub success: String,
    pub syntax_text: String,
    pub syntax_keyword: String,
    pub syntax_type: String,
    pub syntax_number: String,
    pub syntax_function: String,
    pub syntax_string: String,
    pub syntax_comment: String,
}

impl Theme {
    /// User themes in `<config_dir>/dsarush/themes/` shadow bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("dsarush")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => log::warn!("ignoring theme {}: {e}", user_theme_path.display()),
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("default").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#323437".to_string(),
            fg: "#d1d0c5".to_string(),
            text_pending: "#4f5156".to_string(),
            text_incorrect: "#ca4754".to_string(),
            text_incorrect_bg: "#4a2a2e".to_string(),
            text_cursor_bg: "#e2b714".to_string(),
            text_cursor_fg: "#323437".to_string(),
            accent: "#e2b714".to_string(),
            accent_dim: "#646669".to_string(),
            border: "#45474b".to_string(),
            header_bg: "#2c2e31".to_string(),
            header_fg: "#d1d0c5".to_string(),
            error: "#ca4754".to_string(),
            success: "#50fa7b".to_string(),
            syntax_text: "#d1d0c5".to_string(),
            syntax_keyword: "#ff79c6".to_string(),
            syntax_type: "#8be9fd".to_string(),
            syntax_number: "#bd93f9".to_string(),
            syntax_function: "#50fa7b".to_string(),
            syntax_string: "#f1fa8c".to_string(),
            syntax_comment: "#646669".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }

    pub fn syntax(&self, class: SyntaxClass) -> Color {
        let hex = match class {
            SyntaxClass::Text => &self.syntax_text,
            SyntaxClass::Keyword => &self.syntax_keyword,
            SyntaxClass::Type => &self.syntax_type,
            SyntaxClass::Number => &self.syntax_number,
            SyntaxClass::Function => &self.syntax_function,
            SyntaxClass::String => &self.syntax_string,
            SyntaxClass::Comment => &self.syntax_comment,
        };
        Self::parse_color(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"default".to_string()));
        for name in names {
            let theme = Theme::load(&name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_syntax_colors_follow_class() {
        let colors = ThemeColors::default();
        assert_eq!(colors.syntax(SyntaxClass::Keyword), Color::Rgb(0xff, 0x79, 0xc6));
        assert_eq!(colors.syntax(SyntaxClass::Text), colors.fg());
    }
}
