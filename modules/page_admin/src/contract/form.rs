//! Form schema produced for the add and change views

use super::model::{Page, PageId};
use indexmap::IndexMap;

/// Form field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Single line input
    Text,
    /// Plain multi-line input
    TextArea,
    /// Multi-line input edited with the rich text widget
    RichText,
    /// Date and time input
    DateTime,
    /// Dropdown, choices are (value, label)
    Select { choices: Vec<(String, String)> },
    /// Multiple selection, submitted as a comma separated list
    MultiSelect { choices: Vec<(String, String)> },
    /// File upload
    File,
    /// Hidden input
    Hidden,
}

/// A single field of the page form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub help_text: Option<String>,
    pub initial: Option<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            help_text: None,
            initial: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn with_initial(mut self, initial: Option<String>) -> Self {
        self.initial = initial;
        self
    }
}

/// Named group of fields rendered together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fieldset {
    pub name: String,
    pub classes: Vec<String>,
    pub fields: Vec<String>,
}

impl Fieldset {
    pub fn new(name: impl Into<String>, classes: &[&str], fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            fields,
        }
    }
}

/// Request-time form: fieldsets plus the ordered field definitions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSchema {
    pub fieldsets: Vec<Fieldset>,
    pub fields: IndexMap<String, FormField>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Initial value of a field, None when absent or blank
    pub fn initial(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|f| f.initial.as_deref())
    }

    pub fn set_initial(&mut self, name: &str, initial: Option<String>) {
        if let Some(field) = self.fields.get_mut(name) {
            field.initial = initial;
        }
    }

    pub fn insert(&mut self, field: FormField) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Drops a field and its fieldset entry
    pub fn remove(&mut self, name: &str) -> Option<FormField> {
        for fieldset in &mut self.fieldsets {
            fieldset.fields.retain(|f| f != name);
        }
        self.fields.shift_remove(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn fieldset(&self, name: &str) -> Option<&Fieldset> {
        self.fieldsets.iter().find(|fs| fs.name == name)
    }
}

/// Everything the add/change views render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFormContext {
    pub language: String,
    /// Configured (code, name) pairs
    pub page_languages: Vec<(String, String)>,
    pub template: String,
    /// Slot names of the resolved template
    pub placeholders: Vec<String>,
    /// Other languages the page already has a title in
    pub traduction_languages: Vec<String>,
    pub page: Option<Page>,
    pub form: FormSchema,
}

/// Raw submitted form data, field name to value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSubmission {
    pub fields: IndexMap<String, String>,
}

impl PageSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Submitted and not blank
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Builds a move submission for tree repositioning
    pub fn with_move(self, target: PageId, position: &str) -> Self {
        self.with("target", target.to_string())
            .with("position", position)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PageSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
