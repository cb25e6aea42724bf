// Guide text markup
//
// Entry lines carry inline control sequences introduced by a caret:
// ^A<hex><hex> colour attribute, ^B bold, ^C<hex><hex> literal character,
// ^N normal, ^R reverse, ^U underline and ^^ for a caret.

use super::charset;

/// One piece of a tokenized guide line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, already decoded.
    Text(String),
    /// DOS colour attribute: low nibble foreground, high nibble background.
    Colour(u8),
    Bold,
    Underline,
    Reverse,
    /// Reset every attribute.
    Normal,
}

/// Split a guide line into text and control tokens.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            text.push(c);
            continue;
        }

        let Some(&code) = chars.peek() else {
            text.push('^');
            break;
        };

        let control = match code.to_ascii_uppercase() {
            'A' | 'C' => {
                let digits: Vec<char> = chars.clone().skip(1).take(2).collect();
                if digits.len() == 2 && digits.iter().all(|d| d.is_ascii_hexdigit()) {
                    let hex: String = digits.iter().collect();
                    // Both digits were checked, so this cannot fail.
                    let value = u8::from_str_radix(&hex, 16).unwrap_or_default();
                    chars.next();
                    chars.next();
                    chars.next();
                    if code.eq_ignore_ascii_case(&'A') {
                        Some(Token::Colour(value))
                    } else {
                        text.push(charset::glyph(value));
                        None
                    }
                } else {
                    text.push('^');
                    None
                }
            }
            'B' => Some(Token::Bold),
            'U' => Some(Token::Underline),
            'R' => Some(Token::Reverse),
            'N' => Some(Token::Normal),
            '^' => {
                chars.next();
                text.push('^');
                None
            }
            _ => {
                text.push('^');
                None
            }
        };

        if let Some(token) = control {
            if !matches!(token, Token::Colour(_)) {
                chars.next();
            }
            if !text.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut text)));
            }
            tokens.push(token);
        }
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }

    tokens
}

/// Strip all markup, leaving the text a reader would see.
pub fn to_plain(line: &str) -> String {
    tokenize(line)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Active display attributes while walking a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Attributes {
    colour: Option<u8>,
    bold: bool,
    underline: bool,
    reverse: bool,
}

impl Attributes {
    fn classes(&self) -> Vec<String> {
        let mut classes = Vec::new();
        if let Some(colour) = self.colour {
            classes.push(format!("fg{}", colour & 0x0F));
            classes.push(format!("bg{}", colour >> 4));
        }
        if self.bold {
            classes.push("bold".to_string());
        }
        if self.underline {
            classes.push("underline".to_string());
        }
        if self.reverse {
            classes.push("reverse".to_string());
        }
        classes
    }
}

/// Render a guide line as HTML.
///
/// Attribute changes close the current span and open a new one, so spans
/// never nest. Text is escaped.
pub fn to_html(line: &str) -> String {
    let mut html = String::new();
    let mut attrs = Attributes::default();
    let mut open = false;

    for token in tokenize(line) {
        let before = attrs;
        match token {
            Token::Text(text) => {
                if !open && !attrs.classes().is_empty() {
                    html.push_str(&format!("<span class=\"{}\">", attrs.classes().join(" ")));
                    open = true;
                }
                html.push_str(&escape_html(&text));
                continue;
            }
            Token::Colour(value) => attrs.colour = Some(value),
            Token::Bold => attrs.bold = !attrs.bold,
            Token::Underline => attrs.underline = !attrs.underline,
            Token::Reverse => attrs.reverse = !attrs.reverse,
            Token::Normal => attrs = Attributes::default(),
        }
        if open && attrs != before {
            html.push_str("</span>");
            open = false;
        }
    }

    if open {
        html.push_str("</span>");
    }

    html
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
