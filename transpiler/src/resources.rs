use std::path::Path;

/// Font extensions and the CSS `format()` hint for each.
pub const FONT_EXTENSIONS: &[(&str, &str)] = &[
    (".otf", "opentype"),
    (".ttf", "truetype"),
    (".woff", "woff"),
    (".woff2", "woff2"),
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".apng", ".avif", ".bmp", ".gif", ".jfif", ".jpg", ".jpeg", ".pjpeg", ".pjp", ".png", ".svg",
    ".webp",
];

/// Used for both `sounds/` and `music/`.
pub const SOUND_EXTENSIONS: &[&str] = &[
    ".3gp", ".aac", ".flac", ".m4a", ".mpg", ".mpeg", ".mp3", ".mp4", ".oga", ".ogg", ".wav",
    ".webm",
];

/// Media files found next to a game script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub fonts: Vec<String>,
    pub images: Vec<String>,
    pub sounds: Vec<String>,
    pub music: Vec<String>,
}

impl Resources {
    /// Look in the `fonts`, `images`, `sounds` and `music` folders of `parent`.
    pub fn scan(parent: &Path) -> Self {
        let fonts: Vec<&str> = FONT_EXTENSIONS.iter().map(|(ext, _)| *ext).collect();
        Resources {
            fonts: list_directory(&parent.join("fonts"), &fonts),
            images: list_directory(&parent.join("images"), IMAGE_EXTENSIONS),
            sounds: list_directory(&parent.join("sounds"), SOUND_EXTENSIONS),
            music: list_directory(&parent.join("music"), SOUND_EXTENSIONS),
        }
    }

    /// Each group with its heading, in listing order.
    pub fn groups(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Fonts:", self.fonts.as_slice()),
            ("Images:", self.images.as_slice()),
            ("Sounds:", self.sounds.as_slice()),
            ("Music:", self.music.as_slice()),
        ]
    }
}

/// Whether `name` can be used as a resource name by the game runtime.
///
/// Names start with a letter and otherwise hold lowercase letters, digits
/// and underscores.
pub fn is_valid_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if !first.is_alphabetic() {
        return false;
    }
    let mut cased = false;
    for c in name.chars().filter(|&c| c != '_') {
        if !c.is_alphanumeric() || c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// Split a file name into stem and extension (dot included).
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(i) => file_name.split_at(i),
    }
}

/// File names in `dir` with a valid stem and an accepted extension.
///
/// Extensions compare lowercase; an empty `accepted` list takes every file.
/// A missing or unreadable directory yields nothing. Results are sorted.
pub fn list_directory(dir: &Path, accepted: &[&str]) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut result: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|file_name| {
            let (stem, extension) = split_extension(file_name);
            if !is_valid_name(stem) {
                return false;
            }
            let extension = extension.trim().to_lowercase();
            accepted.is_empty() || accepted.contains(&extension.as_str())
        })
        .collect();
    result.sort();
    result
}

/// The CSS font format for a font file name, if its extension is known.
pub fn font_format(file_name: &str) -> Option<&'static str> {
    let (_, extension) = split_extension(file_name);
    let extension = extension.trim().to_lowercase();
    FONT_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, format)| *format)
}

/// The file name without its extension.
pub fn stem(file_name: &str) -> &str {
    split_extension(file_name).0
}
