use common::model::field::Field;

/// Name and size of an uploaded file part, as announced by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub filename: String,
    pub size: u64,
}

/// Form input exactly as submitted: every key may carry several values
/// (checkbox groups such as `topics`), kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    fields: Vec<(String, String)>,
    file: Option<RawFile>,
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    pub fn set_file(&mut self, file: RawFile) {
        self.file = Some(file);
    }

    pub fn with_file(mut self, filename: &str, size: u64) -> Self {
        self.set_file(RawFile {
            filename: filename.to_string(),
            size,
        });
        self
    }

    /// First value submitted under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `key`, in order.
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.first(field.form_key())
    }

    pub fn file(&self) -> Option<&RawFile> {
        self.file.as_ref()
    }

    /// Distinct keys, in order of first appearance.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.fields {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawSubmission::new();
        for (k, v) in iter {
            raw.push(k, v);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_valued_keys_keep_order() {
        let raw: RawSubmission = [
            ("topics", "ai-ml"),
            ("name", "Ada"),
            ("topics", "web-development"),
        ]
        .into_iter()
        .collect();

        assert_eq!(raw.all("topics"), vec!["ai-ml", "web-development"]);
        assert_eq!(raw.first("topics"), Some("ai-ml"));
        assert_eq!(raw.keys(), vec!["topics", "name"]);
        assert_eq!(raw.first("email"), None);
        assert!(raw.all("email").is_empty());
    }
}
