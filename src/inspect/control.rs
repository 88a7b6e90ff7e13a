//! Debian control paragraphs (`Key: value` with folded continuation lines).

/// One control paragraph, in the order its fields were read.
///
/// Field names are matched case-insensitively, as dpkg does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFields {
    fields: Vec<(String, String)>,
}

impl ControlFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the first paragraph of `text`.
    ///
    /// Continuation lines (leading space or tab) are kept verbatim, joined to
    /// the previous value with a newline, so multi-line fields such as
    /// `Description` round-trip into a stanza unchanged.
    pub fn parse(text: &str) -> Self {
        let mut fields = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in text.lines() {
            if line.trim().is_empty() {
                if current.is_some() || !fields.is_empty() {
                    break;
                }
                continue;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push('\n');
                    value.push_str(line.trim_end());
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                fields.insert(&name, &value);
            }
            if let Some((name, value)) = line.split_once(':') {
                current = Some((name.trim().to_string(), value.trim().to_string()));
            }
        }

        if let Some((name, value)) = current {
            fields.insert(&name, &value);
        }
        fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set a field, replacing any existing value of the same name
    pub fn insert(&mut self, name: &str, value: &str) {
        match self
            .fields
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
