use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub from: &'static str,
    pub to: &'static str,
}

impl ColorPair {
    const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    pub fn from_color(&self) -> Color {
        token_color(self.from)
    }

    pub fn to_color(&self) -> Color {
        token_color(self.to)
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        PALETTE[0]
    }
}

pub const PALETTE: [ColorPair; 7] = [
    ColorPair::new("purple-400", "indigo-600"),
    ColorPair::new("blue-400", "cyan-600"),
    ColorPair::new("green-400", "emerald-600"),
    ColorPair::new("yellow-400", "orange-600"),
    ColorPair::new("pink-400", "red-600"),
    ColorPair::new("teal-400", "blue-600"),
    ColorPair::new("fuchsia-400", "purple-600"),
];

// Unknown tokens fall back to white.
pub fn token_color(token: &str) -> Color {
    match token {
        "purple-400" => Color::Rgb(0xc0, 0x84, 0xfc),
        "purple-600" => Color::Rgb(0x93, 0x33, 0xea),
        "indigo-600" => Color::Rgb(0x4f, 0x46, 0xe5),
        "blue-400" => Color::Rgb(0x60, 0xa5, 0xfa),
        "blue-600" => Color::Rgb(0x25, 0x63, 0xeb),
        "cyan-600" => Color::Rgb(0x08, 0x91, 0xb2),
        "green-400" => Color::Rgb(0x4a, 0xde, 0x80),
        "emerald-600" => Color::Rgb(0x05, 0x96, 0x69),
        "yellow-400" => Color::Rgb(0xfa, 0xcc, 0x15),
        "orange-600" => Color::Rgb(0xea, 0x58, 0x0c),
        "pink-400" => Color::Rgb(0xf4, 0x72, 0xb6),
        "red-600" => Color::Rgb(0xdc, 0x26, 0x26),
        "teal-400" => Color::Rgb(0x2d, 0xd4, 0xbf),
        "fuchsia-400" => Color::Rgb(0xe8, 0x79, 0xf9),
        _ => Color::White,
    }
}
