/// Parse a color name or `#rrggbb` / `#rrggbbaa` hex string into linear RGBA
pub fn parse_color(text: &str) -> Option<[f32; 4]> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let rgb = match text.to_ascii_lowercase().as_str() {
        "black" => [0.0, 0.0, 0.0],
        "white" => [1.0, 1.0, 1.0],
        "gray" | "grey" => [0.5, 0.5, 0.5],
        "red" => [1.0, 0.0, 0.0],
        "green" => [0.0, 0.5, 0.0],
        "blue" => [0.0, 0.0, 1.0],
        "navy" => [0.0, 0.0, 0.5],
        "darkgray" | "darkgrey" => [0.17, 0.17, 0.17],
        _ => return None,
    };
    Some([rgb[0], rgb[1], rgb[2], 1.0])
}

fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some([
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
        alpha as f32 / 255.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_black() {
        assert_eq!(parse_color("black"), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_color(" White "), Some([1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_parse_hex() {
        let c = parse_color("#ff8000").unwrap();
        assert!((c[0] - 1.0).abs() < 0.01);
        assert!((c[1] - 0.502).abs() < 0.01);
        assert!(c[2].abs() < 0.01);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let c = parse_color("#00000080").unwrap();
        assert!((c[3] - 0.502).abs() < 0.01);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#gggggg").is_none());
        assert!(parse_color("chartreuse-ish").is_none());
    }
}
