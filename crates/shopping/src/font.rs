use std::path::Path;

use printpdf::BuiltinFont;

use crate::RenderError;

/// sfnt version tags of TrueType and OpenType files.
const MAGIC: [&[u8]; 3] = [&[0x00, 0x01, 0x00, 0x00], b"true", b"OTTO"];

/// Name of the Unicode font shipped with the crate.
pub const BUNDLED_FONT: &str = "DejaVuSans";

static DEJAVU_SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

/// Font embedded in every exported document. Loaded once at startup.
#[derive(Debug, Clone)]
pub enum FontResource {
    Builtin(BuiltinFont),
    TrueType(Vec<u8>),
}

impl Default for FontResource {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Printable Latin-1, which the standard fonts' WinAnsi encoding covers.
fn win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}')
}

impl FontResource {
    /// DejaVu Sans, covering Latin, Greek and Cyrillic.
    pub fn bundled() -> Self {
        Self::TrueType(DEJAVU_SANS.to_vec())
    }

    /// Whether every char of `text` can be drawn without being dropped.
    /// The standard fonts only encode WinAnsi.
    pub fn encodes(&self, text: &str) -> bool {
        match self {
            Self::Builtin(_) => text.chars().all(win_ansi),
            Self::TrueType(_) => true,
        }
    }

    /// One of the 14 standard PDF fonts, by its PostScript name.
    pub fn builtin(name: &str) -> Result<Self, RenderError> {
        let font = match name {
            "Helvetica" => BuiltinFont::Helvetica,
            "Helvetica-Bold" => BuiltinFont::HelveticaBold,
            "Helvetica-Oblique" => BuiltinFont::HelveticaOblique,
            "Helvetica-BoldOblique" => BuiltinFont::HelveticaBoldOblique,
            "Times-Roman" => BuiltinFont::TimesRoman,
            "Times-Bold" => BuiltinFont::TimesBold,
            "Times-Italic" => BuiltinFont::TimesItalic,
            "Times-BoldItalic" => BuiltinFont::TimesBoldItalic,
            "Courier" => BuiltinFont::Courier,
            "Courier-Bold" => BuiltinFont::CourierBold,
            "Courier-Oblique" => BuiltinFont::CourierOblique,
            "Courier-BoldOblique" => BuiltinFont::CourierBoldOblique,
            "Symbol" => BuiltinFont::Symbol,
            "ZapfDingbats" => BuiltinFont::ZapfDingbats,
            other => {
                return Err(RenderError::FontUnavailable(format!(
                    "unknown builtin font {other}"
                )));
            }
        };

        Ok(Self::Builtin(font))
    }

    /// Reads a TrueType or OpenType file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            RenderError::FontUnavailable(format!("{}: {err}", path.display()))
        })?;

        Self::from_bytes(bytes).map_err(|err| match err {
            RenderError::FontUnavailable(reason) => {
                RenderError::FontUnavailable(format!("{}: {reason}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        if !bytes.get(..4).is_some_and(|magic| MAGIC.contains(&magic)) {
            return Err(RenderError::FontUnavailable(
                "not a TrueType or OpenType font".to_owned(),
            ));
        }

        Ok(Self::TrueType(bytes))
    }

    /// The file at `path` when set, otherwise the bundled or builtin font `name`.
    pub fn load(name: &str, path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) => Self::from_file(path),
            None if name == BUNDLED_FONT => Ok(Self::bundled()),
            None => Self::builtin(name),
        }
    }
}
