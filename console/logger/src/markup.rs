//! The color markup understood by the engine console.
//!
//! A colored span looks like `<color=#RRGGBB>text</color>`. Terminals do not understand it, so this
//! module can also strip the markup or translate it into ANSI escape sequences.

use std::borrow::Cow;
use std::fmt::Write;

use ves_console_common::color::Color;

const OPEN_PREFIX: &str = "<color=#";
/// The closing color tag.
pub const CLOSE_TAG: &str = "</color>";

/// What to do with color markup when text leaves the engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Markup {
    /// Leave the markup in place.
    #[default]
    Keep,
    /// Remove all color tags.
    Strip,
    /// Replace color tags with 24-bit ANSI foreground escapes.
    Ansi,
}

impl std::str::FromStr for Markup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Markup::Keep),
            "strip" => Ok(Markup::Strip),
            "ansi" => Ok(Markup::Ansi),
            _ => Err(format!("Invalid markup mode: {s}.")),
        }
    }
}

/// Writes the opening color tag for a color.
pub fn write_open_tag(out: &mut impl Write, color: &Color) -> std::fmt::Result {
    write!(out, "{OPEN_PREFIX}{}>", color.to_html_rgb())
}

/// Applies a [`Markup`] mode to a text.
pub fn render(text: &str, markup: Markup) -> Cow<'_, str> {
    match markup {
        Markup::Keep => Cow::Borrowed(text),
        Markup::Strip => rewrite(text, |_| String::new()),
        Markup::Ansi => rewrite(text, |tag| match tag {
            Tag::Open(rgb) => format!("\x1b[38;2;{};{};{}m", rgb[0], rgb[1], rgb[2]),
            Tag::Close => "\x1b[39m".to_string(),
        }),
    }
}

enum Tag {
    Open([u8; 3]),
    Close,
}

/// Recognizes a color tag at the start of `text` and returns it together with its length.
fn parse_tag(text: &str) -> Option<(Tag, usize)> {
    if text.starts_with(CLOSE_TAG) {
        return Some((Tag::Close, CLOSE_TAG.len()));
    }

    let hex = text.strip_prefix(OPEN_PREFIX)?;
    let digits = hex.get(..6)?;
    if !hex[6..].starts_with('>') {
        return None;
    }
    let rgb = Color::parse_html(digits).ok()?.to_rgba8();
    Some((Tag::Open([rgb.r, rgb.g, rgb.b]), OPEN_PREFIX.len() + 7))
}

fn rewrite(text: &str, replace: impl Fn(Tag) -> String) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match parse_tag(rest) {
            Some((tag, len)) => {
                out.push_str(&replace(tag));
                rest = &rest[len..];
            }
            None => {
                out.push('<');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "<color=#00FF00>Information: </color> hello";

    #[test]
    fn test_write_open_tag() {
        let mut out = String::new();
        write_open_tag(&mut out, &Color::GREEN).unwrap();
        assert_eq!("<color=#00FF00>", out);
    }

    #[test]
    fn test_keep() {
        assert!(matches!(render(LINE, Markup::Keep), Cow::Borrowed(LINE)));
    }

    #[test]
    fn test_strip() {
        assert_eq!("Information:  hello", render(LINE, Markup::Strip));
    }

    #[test]
    fn test_ansi() {
        assert_eq!(
            "\x1b[38;2;0;255;0mInformation: \x1b[39m hello",
            render(LINE, Markup::Ansi)
        );
    }

    #[test]
    fn test_unknown_tags_are_text() {
        let text = "a < b <color=#XYZ> <b>bold</b> <color=#00FF00";
        assert_eq!(text, render(text, Markup::Strip));
    }

    #[test]
    fn test_signed_digits_are_text() {
        let text = "<color=#+1+2+3>x</color>";
        assert_eq!("<color=#+1+2+3>x", render(text, Markup::Strip));
    }

    #[test]
    fn test_no_markup_is_borrowed() {
        assert!(matches!(render("plain", Markup::Ansi), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Ok(Markup::Ansi), "ANSI".parse());
        assert!("html".parse::<Markup>().is_err());
    }
}
