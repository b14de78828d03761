//! Rose Pine Color Palette Module
//! Based on the official Rose Pine theme: https://rosepinetheme.com/

use crate::highlight::TokenKind;
use ratatui::style::Color;

pub struct RosePine;

impl RosePine {
    pub const BASE: Color = Color::Rgb(25, 23, 36);
    pub const SURFACE: Color = Color::Rgb(31, 29, 46);
    pub const TEXT: Color = Color::Rgb(224, 222, 244);
    pub const SUBTLE: Color = Color::Rgb(144, 140, 170);
    pub const MUTED: Color = Color::Rgb(110, 106, 134);
    pub const LOVE: Color = Color::Rgb(235, 111, 146);
    pub const GOLD: Color = Color::Rgb(246, 193, 119);
    pub const ROSE: Color = Color::Rgb(235, 188, 186);
    pub const PINE: Color = Color::Rgb(49, 116, 143);
    pub const FOAM: Color = Color::Rgb(156, 207, 216);
    pub const IRIS: Color = Color::Rgb(196, 167, 231);
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(82, 79, 103);
    pub const HIGHLIGHT_LOW: Color = Color::Rgb(33, 32, 46);
}

/// Badge colour for a category; unknown categories share one colour
pub fn category_color(category: &str) -> Color {
    match category {
        "javascript" => RosePine::GOLD,
        "typescript" => RosePine::PINE,
        "python" => RosePine::FOAM,
        "react" => RosePine::FOAM,
        "css" => RosePine::ROSE,
        "html" => RosePine::LOVE,
        "node" => RosePine::PINE,
        "utility" => RosePine::SUBTLE,
        _ => RosePine::IRIS,
    }
}

pub fn token_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::Plain => RosePine::TEXT,
        TokenKind::Comment => RosePine::MUTED,
        TokenKind::Keyword | TokenKind::Tag => RosePine::IRIS,
        TokenKind::String => RosePine::GOLD,
        TokenKind::Number => RosePine::ROSE,
        TokenKind::Selector => RosePine::FOAM,
        TokenKind::Property | TokenKind::Attribute => RosePine::LOVE,
    }
}
