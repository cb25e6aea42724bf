// Code page 437 decoding
//
// Guides were written on DOS machines, so every string in them is CP437.
// encoding_rs only covers the WHATWG encodings, which leaves 437 out.

/// Glyphs for the 0x00-0x1F range. 0x00 renders as a space.
const LOW: [char; 32] = [
    ' ', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼', //
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
];

/// Glyphs for the 0x80-0xFF range.
const HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Decode a single CP437 byte as text.
///
/// Control bytes map to their printable DOS glyphs, which is what a `^C`
/// escape inside guide text asks for.
pub fn glyph(byte: u8) -> char {
    match byte {
        0x00..=0x1F => LOW[byte as usize],
        0x7F => '⌂',
        0x20..=0x7E => byte as char,
        _ => HIGH[(byte - 0x80) as usize],
    }
}

/// Decode a run of CP437 bytes that is expected to hold ordinary text.
///
/// Unlike [`glyph`], bytes below 0x20 are kept as-is so that tabs and the
/// like survive decoding.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x00..=0x1F => b as char,
            _ => glyph(b),
        })
        .collect()
}
