use std::path::Path;

use crate::ConfigError;

/// A parsed INI file: sections of key/value pairs.
///
/// Section and key names are lowercased on parse and lookup. Values keep
/// their case. Insertion order is preserved so serialization is stable.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    sections: Vec<Section>,
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text: `[section]` headers, `key = value` entries,
    /// `#`/`;` comments, blank lines.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        let mut current: Option<usize> = None;

        for (lineno, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or(ConfigError::Parse {
                    line: lineno + 1,
                    message: "unterminated section header".into(),
                })?;
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() {
                    return Err(ConfigError::Parse {
                        line: lineno + 1,
                        message: "empty section name".into(),
                    });
                }
                current = Some(config.section_index(&name));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or(ConfigError::Parse {
                line: lineno + 1,
                message: format!("expected 'key = value', got: {line}"),
            })?;
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(ConfigError::Parse {
                    line: lineno + 1,
                    message: "empty key".into(),
                });
            }
            let section = current.ok_or(ConfigError::Parse {
                line: lineno + 1,
                message: "entry before any section header".into(),
            })?;
            config.sections[section]
                .entries
                .push((key, value.trim().to_string()));
        }

        Ok(config)
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Look up a value. The last occurrence wins.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = section.to_ascii_lowercase();
        let key = key.to_ascii_lowercase();
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .entries
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up an integer value.
    pub fn get_int(&self, section: &str, key: &str) -> Option<i64> {
        self.get(section, key)?.parse().ok()
    }

    /// Set a value, replacing any existing occurrence.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let idx = self.section_index(&section.to_ascii_lowercase());
        let key = key.to_ascii_lowercase();
        let value = value.into();
        let entries = &mut self.sections[idx].entries;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => entries.push((key, value)),
        }
    }

    /// Serialize to INI text.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push('\t');
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    /// Write to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    fn section_index(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_core_section() {
        let text = "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n";
        let config = ConfigFile::parse(text).unwrap();
        assert_eq!(config.get_int("core", "repositoryformatversion"), Some(0));
        assert_eq!(config.get("core", "filemode"), Some("true"));
        assert_eq!(config.get("core", "bare"), Some("false"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let config = ConfigFile::parse("[Core]\nFileMode = True\n").unwrap();
        assert_eq!(config.get("core", "filemode"), Some("True"));
        assert_eq!(config.get("CORE", "FILEMODE"), Some("True"));
    }

    #[test]
    fn comments_and_blanks_skipped() {
        let text = "# comment\n\n[user]\n; another\nname = A\n";
        let config = ConfigFile::parse(text).unwrap();
        assert_eq!(config.get("user", "name"), Some("A"));
    }

    #[test]
    fn entry_before_section_rejected() {
        assert!(matches!(
            ConfigFile::parse("orphan = 1\n").unwrap_err(),
            ConfigError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn unterminated_header_rejected() {
        assert!(ConfigFile::parse("[core\n").is_err());
    }

    #[test]
    fn serialize_roundtrip() {
        let mut config = ConfigFile::new();
        config.set("core", "repositoryformatversion", "0");
        config.set("core", "filemode", "true");
        config.set("core", "bare", "false");

        let text = config.serialize();
        assert_eq!(
            text,
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n"
        );
        let reparsed = ConfigFile::parse(&text).unwrap();
        assert_eq!(reparsed.get("core", "bare"), Some("false"));
    }

    #[test]
    fn set_replaces() {
        let mut config = ConfigFile::new();
        config.set("core", "bare", "false");
        config.set("core", "bare", "true");
        assert_eq!(config.get("core", "bare"), Some("true"));
        assert_eq!(config.serialize().matches("bare").count(), 1);
    }

    #[test]
    fn load_and_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        let mut config = ConfigFile::new();
        config.set("core", "repositoryformatversion", "0");
        config.write_to(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.get_int("core", "repositoryformatversion"), Some(0));
    }
}
